use crate::types::PokemonType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum MoveCategory {
    Physical,
    Special,
    Status,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StatusCondition {
    #[serde(alias = "brn")]
    Burn,
    #[serde(alias = "par")]
    Paralysis,
    #[serde(alias = "slp")]
    Sleep,
    #[serde(alias = "psn")]
    Poison,
    #[serde(alias = "tox")]
    Toxic,
    #[serde(alias = "frz")]
    Freeze,
    #[serde(alias = "fnt")]
    Fainted,
}

impl StatusCondition {
    pub fn label(self) -> &'static str {
        match self {
            StatusCondition::Burn => "BRN",
            StatusCondition::Paralysis => "PAR",
            StatusCondition::Sleep => "SLP",
            StatusCondition::Poison => "PSN",
            StatusCondition::Toxic => "TOX",
            StatusCondition::Freeze => "FRZ",
            StatusCondition::Fainted => "FNT",
        }
    }
}

fn default_accuracy() -> f32 {
    100.0
}

fn default_hp_fraction() -> f32 {
    1.0
}

/// One side's active creature as the battle client reports it.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatantView {
    pub species: String,
    pub types: Vec<PokemonType>,
    #[serde(default = "default_hp_fraction")]
    pub hp_fraction: f32,
    #[serde(default)]
    pub status: Option<StatusCondition>,
    #[serde(default)]
    pub boosts: BTreeMap<String, i8>,
}

impl CombatantView {
    pub fn primary_type(&self) -> Option<PokemonType> {
        self.types.first().copied()
    }

    pub fn secondary_type(&self) -> Option<PokemonType> {
        self.types.get(1).copied()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveOption {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub move_type: PokemonType,
    pub category: MoveCategory,
    #[serde(default)]
    pub base_power: u32,
    #[serde(default = "default_accuracy")]
    pub accuracy: f32,
    #[serde(default)]
    pub current_pp: u8,
    #[serde(default)]
    pub max_pp: u8,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchOption {
    pub species: String,
    #[serde(default = "default_hp_fraction")]
    pub hp_fraction: f32,
    #[serde(default)]
    pub status: Option<StatusCondition>,
}

/// Everything the advisor sees at one decision point.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleSnapshot {
    #[serde(default)]
    pub battle_tag: String,
    #[serde(default)]
    pub turn: u32,
    pub active: CombatantView,
    pub opponent: CombatantView,
    #[serde(default)]
    pub available_moves: Vec<MoveOption>,
    #[serde(default)]
    pub available_switches: Vec<SwitchOption>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_accepts_protocol_abbreviations() {
        let raw = r#"{
            "battleTag": "battle-gen1ou-1",
            "turn": 3,
            "active": {"species": "Nidoking", "types": ["POISON", "GROUND"], "hpFraction": 0.5, "status": "par"},
            "opponent": {"species": "Starmie", "types": ["water", "psychic"], "boosts": {"spe": 2}},
            "availableMoves": [
                {"id": "earthquake", "name": "Earthquake", "type": "GROUND", "category": "physical", "basePower": 100, "currentPp": 16, "maxPp": 16}
            ]
        }"#;
        let snapshot: BattleSnapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(snapshot.active.status, Some(StatusCondition::Paralysis));
        assert_eq!(snapshot.active.secondary_type(), Some(PokemonType::Ground));
        assert_eq!(snapshot.opponent.hp_fraction, 1.0);
        assert_eq!(snapshot.opponent.boosts.get("spe"), Some(&2));
        assert_eq!(snapshot.available_moves[0].accuracy, 100.0);
        assert!(snapshot.available_switches.is_empty());
    }

    #[test]
    fn snapshot_rejects_unknown_types() {
        let raw = r#"{
            "active": {"species": "Missingno", "types": ["BIRD"]},
            "opponent": {"species": "Mew", "types": ["PSYCHIC"]}
        }"#;
        assert!(serde_json::from_str::<BattleSnapshot>(raw).is_err());
    }
}
