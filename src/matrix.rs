use crate::types::{Multiplier, PokemonType, TypeChart, TYPE_COUNT};
use rayon::prelude::*;

#[derive(Clone, Debug)]
pub struct DefenseRow {
    pub primary: PokemonType,
    pub secondary: Option<PokemonType>,
    /// Indexed like [`PokemonType::ALL`].
    pub multipliers: [Multiplier; TYPE_COUNT],
}

impl DefenseRow {
    pub fn label(&self) -> String {
        match self.secondary {
            Some(second) => format!("{}/{}", self.primary.name(), second.name()),
            None => self.primary.name().to_string(),
        }
    }
}

fn typings() -> Vec<(PokemonType, Option<PokemonType>)> {
    let mut combos = Vec::new();
    for (i, &first) in PokemonType::ALL.iter().enumerate() {
        combos.push((first, None));
        for &second in &PokemonType::ALL[i + 1..] {
            combos.push((first, Some(second)));
        }
    }
    combos
}

/// Every mono- and dual-type defender against every attacking type.
pub fn compute_defense_matrix(chart: &TypeChart) -> Vec<DefenseRow> {
    typings()
        .par_iter()
        .map(|&(primary, secondary)| {
            let mut multipliers = chart.defensive_profile(primary);
            if let Some(second) = secondary {
                let other = chart.defensive_profile(second);
                for (value, other) in multipliers.iter_mut().zip(other) {
                    *value = *value * other;
                }
            }
            DefenseRow {
                primary,
                secondary,
                multipliers,
            }
        })
        .collect()
}

pub fn write_csv(rows: &[DefenseRow], path: &std::path::Path) -> anyhow::Result<()> {
    let mut out = String::from("defender");
    for t in PokemonType::ALL {
        out.push(',');
        out.push_str(t.name());
    }
    for row in rows {
        out.push('\n');
        out.push_str(&row.label());
        for value in row.multipliers {
            out.push_str(&format!(",{}", value.as_f64()));
        }
    }
    out.push('\n');
    std::fs::write(path, out)?;
    Ok(())
}
