//! Buckets attacking types by how hard they hit a given defender.
//!
//! Dual-type defenders multiply the two single-type entries; only exact 4x, 2x, 0.5x,
//! 0.25x and 0x results are reported. Everything else, 1x included, counts as neutral.

use crate::error::Result;
use crate::types::{EffectivenessClass, PokemonType, TypeChart};
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Effectiveness {
    pub extremely_effective: BTreeSet<PokemonType>,
    pub super_effective: BTreeSet<PokemonType>,
    pub resistant: BTreeSet<PokemonType>,
    pub highly_resistant: BTreeSet<PokemonType>,
    pub immune: BTreeSet<PokemonType>,
}

impl Effectiveness {
    pub fn is_empty(&self) -> bool {
        self.extremely_effective.is_empty()
            && self.super_effective.is_empty()
            && self.resistant.is_empty()
            && self.highly_resistant.is_empty()
            && self.immune.is_empty()
    }

    pub fn bucket(&self, class: EffectivenessClass) -> Option<&BTreeSet<PokemonType>> {
        match class {
            EffectivenessClass::ExtremelyEffective => Some(&self.extremely_effective),
            EffectivenessClass::SuperEffective => Some(&self.super_effective),
            EffectivenessClass::Resistant => Some(&self.resistant),
            EffectivenessClass::HighlyResistant => Some(&self.highly_resistant),
            EffectivenessClass::Immune => Some(&self.immune),
            EffectivenessClass::Neutral => None,
        }
    }

    /// Class an attacking type landed in; `Neutral` when it is in no bucket.
    pub fn class_of(&self, attacking: PokemonType) -> EffectivenessClass {
        [
            EffectivenessClass::ExtremelyEffective,
            EffectivenessClass::SuperEffective,
            EffectivenessClass::Resistant,
            EffectivenessClass::HighlyResistant,
            EffectivenessClass::Immune,
        ]
        .into_iter()
        .find(|&class| {
            self.bucket(class)
                .map_or(false, |bucket| bucket.contains(&attacking))
        })
        .unwrap_or(EffectivenessClass::Neutral)
    }

    fn bucket_mut(&mut self, class: EffectivenessClass) -> Option<&mut BTreeSet<PokemonType>> {
        match class {
            EffectivenessClass::ExtremelyEffective => Some(&mut self.extremely_effective),
            EffectivenessClass::SuperEffective => Some(&mut self.super_effective),
            EffectivenessClass::Resistant => Some(&mut self.resistant),
            EffectivenessClass::HighlyResistant => Some(&mut self.highly_resistant),
            EffectivenessClass::Immune => Some(&mut self.immune),
            EffectivenessClass::Neutral => None,
        }
    }
}

/// Classifies every attacking type against a one- or two-type defender.
///
/// `candidates` restricts the result to the listed attacking types; `None` keeps all of
/// [`PokemonType::ALL`], while an empty slice yields an empty result. A `secondary` equal to
/// `primary` is treated as a single-type defender.
pub fn classify(
    primary: PokemonType,
    secondary: Option<PokemonType>,
    chart: &TypeChart,
    candidates: Option<&[PokemonType]>,
) -> Effectiveness {
    let secondary = secondary.filter(|&t| t != primary);
    let mut result = Effectiveness::default();
    for attacking in PokemonType::ALL {
        if let Some(allowed) = candidates {
            if !allowed.contains(&attacking) {
                continue;
            }
        }
        let mut multiplier = chart.multiplier(attacking, primary);
        if let Some(second) = secondary {
            multiplier = multiplier * chart.multiplier(attacking, second);
        }
        if let Some(bucket) = result.bucket_mut(multiplier.class()) {
            bucket.insert(attacking);
        }
    }
    result
}

/// Same as [`classify`] for type names coming straight from a battle client.
pub fn classify_names(
    primary: &str,
    secondary: Option<&str>,
    chart: &TypeChart,
    candidates: Option<&[&str]>,
) -> Result<Effectiveness> {
    let primary: PokemonType = primary.parse()?;
    let secondary = secondary.map(str::parse::<PokemonType>).transpose()?;
    let candidates = candidates
        .map(|names| {
            names
                .iter()
                .map(|name| name.parse::<PokemonType>())
                .collect::<Result<Vec<_>>>()
        })
        .transpose()?;
    Ok(classify(primary, secondary, chart, candidates.as_deref()))
}

/// Renders the notable buckets as sentences about `label`; empty when nothing is notable.
pub fn describe(label: &str, result: &Effectiveness) -> String {
    let clauses = [
        (&result.extremely_effective, "extremely-effective (4x damage)"),
        (&result.super_effective, "super-effective (2x damage)"),
        (&result.resistant, "ineffective (0.5x damage)"),
        (&result.highly_resistant, "highly ineffective (0.25x damage)"),
        (&result.immune, "zero effect (0x damage)"),
    ];
    clauses
        .iter()
        .filter(|(bucket, _)| !bucket.is_empty())
        .map(|(bucket, wording)| {
            let names: Vec<&str> = bucket.iter().map(|t| t.display_name()).collect();
            format!("{}-type attack is {wording} to {label}.", names.join(", "))
        })
        .collect::<Vec<_>>()
        .join(" ")
}
