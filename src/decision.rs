//! Turning a model reply into a legal action.

use crate::model::BattleSnapshot;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Choice {
    Move(String),
    Switch(String),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Decision {
    pub thought: Option<String>,
    pub choice: Choice,
}

#[derive(Debug, Deserialize)]
struct RawDecision {
    #[serde(default)]
    thought: Option<serde_json::Value>,
    #[serde(default, rename = "move")]
    move_name: Option<String>,
    #[serde(default)]
    switch: Option<String>,
}

impl RawDecision {
    fn into_decision(self) -> Option<Decision> {
        let choice = match (self.move_name, self.switch) {
            (Some(name), _) => Choice::Move(name),
            (None, Some(species)) => Choice::Switch(species),
            (None, None) => return None,
        };
        let thought = match self.thought {
            Some(serde_json::Value::String(text)) => Some(text),
            _ => None,
        };
        Some(Decision { thought, choice })
    }
}

/// An order the battle client can send.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Action {
    Move { id: String },
    Switch { species: String },
    /// No move or switch is available; let the client pick its default (Struggle).
    Default,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move { id } => write!(f, "move {id}"),
            Action::Switch { species } => write!(f, "switch {species}"),
            Action::Default => f.write_str("default"),
        }
    }
}

const DECISION_KEYS: [&str; 3] = ["thought", "move", "switch"];

/// Extracts the JSON decision from free text. The whole reply is tried first, then every
/// embedded object carrying one of the decision keys.
pub fn parse_reply(text: &str) -> Option<Decision> {
    if let Ok(raw) = serde_json::from_str::<RawDecision>(text.trim()) {
        return raw.into_decision();
    }
    for (start, _) in text.match_indices('{') {
        let mut stream =
            serde_json::Deserializer::from_str(&text[start..]).into_iter::<serde_json::Value>();
        let Some(Ok(value)) = stream.next() else {
            continue;
        };
        let Some(object) = value.as_object() else {
            continue;
        };
        if !DECISION_KEYS.iter().any(|key| object.contains_key(*key)) {
            continue;
        }
        if let Some(decision) = serde_json::from_value::<RawDecision>(value)
            .ok()
            .and_then(RawDecision::into_decision)
        {
            return Some(decision);
        }
    }
    None
}

/// Battle-protocol id: lowercase with everything but letters and digits removed.
pub fn to_id(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Maps a decision onto what the snapshot actually allows.
pub fn resolve(decision: &Decision, snapshot: &BattleSnapshot) -> Option<Action> {
    match &decision.choice {
        Choice::Move(name) => {
            let name = name.trim();
            let wanted = to_id(name);
            if wanted.is_empty() {
                return None;
            }
            snapshot
                .available_moves
                .iter()
                .find(|mv| {
                    to_id(&mv.id) == wanted
                        || (!mv.name.is_empty() && mv.name.eq_ignore_ascii_case(name))
                })
                .map(|mv| Action::Move { id: mv.id.clone() })
        }
        Choice::Switch(species) => {
            let species = species.trim();
            if species.is_empty() {
                return None;
            }
            snapshot
                .available_switches
                .iter()
                .find(|sw| sw.species.eq_ignore_ascii_case(species))
                .map(|sw| Action::Switch {
                    species: sw.species.clone(),
                })
        }
    }
}

/// Uniform pick over every available move and switch.
pub fn random_action<R: Rng>(snapshot: &BattleSnapshot, rng: &mut R) -> Action {
    let mut options: Vec<Action> = snapshot
        .available_moves
        .iter()
        .map(|mv| Action::Move { id: mv.id.clone() })
        .collect();
    options.extend(snapshot.available_switches.iter().map(|sw| Action::Switch {
        species: sw.species.clone(),
    }));
    options.choose(rng).cloned().unwrap_or(Action::Default)
}
