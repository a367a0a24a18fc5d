use crate::error::{AdvisorError, Result};
use phf::phf_map;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::ops::Mul;
use std::path::Path;
use std::str::FromStr;

pub const TYPE_COUNT: usize = 18;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[repr(u8)]
pub enum PokemonType {
    Bug,
    Dark,
    Dragon,
    Electric,
    Fairy,
    Fighting,
    Fire,
    Flying,
    Ghost,
    Grass,
    Ground,
    Ice,
    Normal,
    Poison,
    Psychic,
    Rock,
    Steel,
    Water,
}

static TYPE_NAMES: phf::Map<&'static str, PokemonType> = phf_map! {
    "bug" => PokemonType::Bug,
    "dark" => PokemonType::Dark,
    "dragon" => PokemonType::Dragon,
    "electric" => PokemonType::Electric,
    "fairy" => PokemonType::Fairy,
    "fighting" => PokemonType::Fighting,
    "fire" => PokemonType::Fire,
    "flying" => PokemonType::Flying,
    "ghost" => PokemonType::Ghost,
    "grass" => PokemonType::Grass,
    "ground" => PokemonType::Ground,
    "ice" => PokemonType::Ice,
    "normal" => PokemonType::Normal,
    "poison" => PokemonType::Poison,
    "psychic" => PokemonType::Psychic,
    "rock" => PokemonType::Rock,
    "steel" => PokemonType::Steel,
    "water" => PokemonType::Water,
};

impl PokemonType {
    pub const ALL: [PokemonType; TYPE_COUNT] = [
        PokemonType::Bug,
        PokemonType::Dark,
        PokemonType::Dragon,
        PokemonType::Electric,
        PokemonType::Fairy,
        PokemonType::Fighting,
        PokemonType::Fire,
        PokemonType::Flying,
        PokemonType::Ghost,
        PokemonType::Grass,
        PokemonType::Ground,
        PokemonType::Ice,
        PokemonType::Normal,
        PokemonType::Poison,
        PokemonType::Psychic,
        PokemonType::Rock,
        PokemonType::Steel,
        PokemonType::Water,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Upper-case name used by the battle client's data tables, e.g. `FIRE`.
    pub fn name(self) -> &'static str {
        match self {
            PokemonType::Bug => "BUG",
            PokemonType::Dark => "DARK",
            PokemonType::Dragon => "DRAGON",
            PokemonType::Electric => "ELECTRIC",
            PokemonType::Fairy => "FAIRY",
            PokemonType::Fighting => "FIGHTING",
            PokemonType::Fire => "FIRE",
            PokemonType::Flying => "FLYING",
            PokemonType::Ghost => "GHOST",
            PokemonType::Grass => "GRASS",
            PokemonType::Ground => "GROUND",
            PokemonType::Ice => "ICE",
            PokemonType::Normal => "NORMAL",
            PokemonType::Poison => "POISON",
            PokemonType::Psychic => "PSYCHIC",
            PokemonType::Rock => "ROCK",
            PokemonType::Steel => "STEEL",
            PokemonType::Water => "WATER",
        }
    }

    /// Capitalized name for prompts, e.g. `Fire`.
    pub fn display_name(self) -> &'static str {
        match self {
            PokemonType::Bug => "Bug",
            PokemonType::Dark => "Dark",
            PokemonType::Dragon => "Dragon",
            PokemonType::Electric => "Electric",
            PokemonType::Fairy => "Fairy",
            PokemonType::Fighting => "Fighting",
            PokemonType::Fire => "Fire",
            PokemonType::Flying => "Flying",
            PokemonType::Ghost => "Ghost",
            PokemonType::Grass => "Grass",
            PokemonType::Ground => "Ground",
            PokemonType::Ice => "Ice",
            PokemonType::Normal => "Normal",
            PokemonType::Poison => "Poison",
            PokemonType::Psychic => "Psychic",
            PokemonType::Rock => "Rock",
            PokemonType::Steel => "Steel",
            PokemonType::Water => "Water",
        }
    }
}

impl FromStr for PokemonType {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_ascii_lowercase();
        TYPE_NAMES
            .get(key.as_str())
            .copied()
            .ok_or_else(|| AdvisorError::InvalidTypeName(s.to_string()))
    }
}

impl TryFrom<String> for PokemonType {
    type Error = AdvisorError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<PokemonType> for String {
    fn from(value: PokemonType) -> Self {
        value.name().to_string()
    }
}

impl fmt::Display for PokemonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Damage multiplier kept as an exact power of two so products never drift.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Multiplier {
    Zero,
    Pow2(i8),
}

const MIN_EXPONENT: i8 = -4;
const MAX_EXPONENT: i8 = 4;

impl Multiplier {
    pub const IMMUNE: Multiplier = Multiplier::Zero;
    pub const QUARTER: Multiplier = Multiplier::Pow2(-2);
    pub const HALF: Multiplier = Multiplier::Pow2(-1);
    pub const NEUTRAL: Multiplier = Multiplier::Pow2(0);
    pub const DOUBLE: Multiplier = Multiplier::Pow2(1);
    pub const QUADRUPLE: Multiplier = Multiplier::Pow2(2);

    /// Accepts 0 and exact powers of two between 1/16 and 16.
    pub fn from_f64(value: f64) -> Option<Multiplier> {
        if value == 0.0 {
            return Some(Multiplier::Zero);
        }
        (MIN_EXPONENT..=MAX_EXPONENT)
            .find(|&exp| 2f64.powi(exp as i32) == value)
            .map(Multiplier::Pow2)
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Multiplier::Zero => 0.0,
            Multiplier::Pow2(exp) => 2f64.powi(exp as i32),
        }
    }

    pub fn class(self) -> EffectivenessClass {
        match self {
            Multiplier::Zero => EffectivenessClass::Immune,
            Multiplier::Pow2(2) => EffectivenessClass::ExtremelyEffective,
            Multiplier::Pow2(1) => EffectivenessClass::SuperEffective,
            Multiplier::Pow2(-1) => EffectivenessClass::Resistant,
            Multiplier::Pow2(-2) => EffectivenessClass::HighlyResistant,
            // 1x and anything a malformed chart could combine into
            Multiplier::Pow2(_) => EffectivenessClass::Neutral,
        }
    }
}

impl Mul for Multiplier {
    type Output = Multiplier;

    fn mul(self, rhs: Multiplier) -> Multiplier {
        match (self, rhs) {
            (Multiplier::Zero, _) | (_, Multiplier::Zero) => Multiplier::Zero,
            (Multiplier::Pow2(a), Multiplier::Pow2(b)) => Multiplier::Pow2(a.saturating_add(b)),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum EffectivenessClass {
    ExtremelyEffective,
    SuperEffective,
    Neutral,
    Resistant,
    HighlyResistant,
    Immune,
}

/// Attacking-type x defending-type multipliers, total over [`PokemonType::ALL`].
#[derive(Clone, Debug, PartialEq)]
pub struct TypeChart {
    cells: [[Multiplier; TYPE_COUNT]; TYPE_COUNT],
}

impl TypeChart {
    pub fn multiplier(&self, attacking: PokemonType, defending: PokemonType) -> Multiplier {
        self.cells[attacking.index()][defending.index()]
    }

    /// Multiplier of every attacking type against `defending`, in [`PokemonType::ALL`] order.
    pub fn defensive_profile(&self, defending: PokemonType) -> [Multiplier; TYPE_COUNT] {
        PokemonType::ALL.map(|attacking| self.multiplier(attacking, defending))
    }

    // Ref: pokemon-showdown/data/typechart.ts (Gen 6+ chart).
    pub fn standard() -> TypeChart {
        let mut cells = [[Multiplier::NEUTRAL; TYPE_COUNT]; TYPE_COUNT];
        for attacking in PokemonType::ALL {
            for defending in PokemonType::ALL {
                cells[attacking.index()][defending.index()] =
                    standard_multiplier(attacking, defending);
            }
        }
        TypeChart { cells }
    }

    /// Parses the battle client's layout: outer key is the defending type, inner key the
    /// attacking type, e.g. `{"FIRE": {"WATER": 2.0, ...}, ...}`.
    pub fn from_json_str(raw: &str) -> Result<TypeChart> {
        let parsed: HashMap<String, HashMap<String, f64>> = serde_json::from_str(raw)?;
        let mut cells = [[None; TYPE_COUNT]; TYPE_COUNT];
        for (defending_name, row) in &parsed {
            let defending: PokemonType = defending_name.parse()?;
            for (attacking_name, &value) in row {
                let attacking: PokemonType = attacking_name.parse()?;
                let multiplier =
                    Multiplier::from_f64(value).ok_or(AdvisorError::InvalidMultiplier {
                        attacking,
                        defending,
                        value,
                    })?;
                cells[attacking.index()][defending.index()] = Some(multiplier);
            }
        }

        let mut chart = [[Multiplier::NEUTRAL; TYPE_COUNT]; TYPE_COUNT];
        for attacking in PokemonType::ALL {
            for defending in PokemonType::ALL {
                chart[attacking.index()][defending.index()] = cells[attacking.index()]
                    [defending.index()]
                .ok_or(AdvisorError::IncompleteChart {
                    attacking,
                    defending,
                })?;
            }
        }
        Ok(TypeChart { cells: chart })
    }

    pub fn from_path(path: &Path) -> Result<TypeChart> {
        let raw = std::fs::read_to_string(path)?;
        TypeChart::from_json_str(&raw)
    }
}

fn standard_multiplier(attacking: PokemonType, defending: PokemonType) -> Multiplier {
    use PokemonType::*;
    const HALF: Multiplier = Multiplier::HALF;
    const DOUBLE: Multiplier = Multiplier::DOUBLE;
    const IMMUNE: Multiplier = Multiplier::IMMUNE;
    const NEUTRAL: Multiplier = Multiplier::NEUTRAL;

    match attacking {
        Normal => match defending {
            Rock | Steel => HALF,
            Ghost => IMMUNE,
            _ => NEUTRAL,
        },
        Fire => match defending {
            Fire | Water | Rock | Dragon => HALF,
            Grass | Ice | Bug | Steel => DOUBLE,
            _ => NEUTRAL,
        },
        Water => match defending {
            Water | Grass | Dragon => HALF,
            Fire | Ground | Rock => DOUBLE,
            _ => NEUTRAL,
        },
        Electric => match defending {
            Electric | Grass | Dragon => HALF,
            Water | Flying => DOUBLE,
            Ground => IMMUNE,
            _ => NEUTRAL,
        },
        Grass => match defending {
            Fire | Grass | Poison | Flying | Bug | Dragon | Steel => HALF,
            Water | Ground | Rock => DOUBLE,
            _ => NEUTRAL,
        },
        Ice => match defending {
            Fire | Water | Ice | Steel => HALF,
            Grass | Ground | Flying | Dragon => DOUBLE,
            _ => NEUTRAL,
        },
        Fighting => match defending {
            Normal | Ice | Rock | Dark | Steel => DOUBLE,
            Poison | Flying | Psychic | Bug | Fairy => HALF,
            Ghost => IMMUNE,
            _ => NEUTRAL,
        },
        Poison => match defending {
            Grass | Fairy => DOUBLE,
            Poison | Ground | Rock | Ghost => HALF,
            Steel => IMMUNE,
            _ => NEUTRAL,
        },
        Ground => match defending {
            Fire | Electric | Poison | Rock | Steel => DOUBLE,
            Grass | Bug => HALF,
            Flying => IMMUNE,
            _ => NEUTRAL,
        },
        Flying => match defending {
            Grass | Fighting | Bug => DOUBLE,
            Electric | Rock | Steel => HALF,
            _ => NEUTRAL,
        },
        Psychic => match defending {
            Fighting | Poison => DOUBLE,
            Psychic | Steel => HALF,
            Dark => IMMUNE,
            _ => NEUTRAL,
        },
        Bug => match defending {
            Grass | Psychic | Dark => DOUBLE,
            Fire | Fighting | Poison | Flying | Ghost | Steel | Fairy => HALF,
            _ => NEUTRAL,
        },
        Rock => match defending {
            Fire | Ice | Flying | Bug => DOUBLE,
            Fighting | Ground | Steel => HALF,
            _ => NEUTRAL,
        },
        Ghost => match defending {
            Ghost | Psychic => DOUBLE,
            Dark => HALF,
            Normal => IMMUNE,
            _ => NEUTRAL,
        },
        Dragon => match defending {
            Dragon => DOUBLE,
            Steel => HALF,
            Fairy => IMMUNE,
            _ => NEUTRAL,
        },
        Dark => match defending {
            Psychic | Ghost => DOUBLE,
            Fighting | Dark | Fairy => HALF,
            _ => NEUTRAL,
        },
        Steel => match defending {
            Rock | Ice | Fairy => DOUBLE,
            Fire | Water | Electric | Steel => HALF,
            _ => NEUTRAL,
        },
        Fairy => match defending {
            Fighting | Dragon | Dark => DOUBLE,
            Fire | Poison | Steel => HALF,
            _ => NEUTRAL,
        },
    }
}
