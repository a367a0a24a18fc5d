pub mod advisor;
pub mod decision;
pub mod effectiveness;
pub mod error;
pub mod journal;
pub mod matrix;
pub mod model;
pub mod prompt;
pub mod types;

use crate::advisor::{Advisor, AdvisorOptions, DecisionSource, ScriptedModel};
use crate::effectiveness::{classify_names, describe};
use crate::journal::Journal;
use crate::matrix::compute_defense_matrix;
use crate::model::BattleSnapshot;
pub use crate::types::{Multiplier, PokemonType, TypeChart};
use anyhow::Context;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub enum Command {
    Matchup {
        defender: Vec<String>,
        against: Option<Vec<String>>,
        label: String,
    },
    Matrix {
        output_path: PathBuf,
    },
    Decide {
        state_path: PathBuf,
        reply_path: Option<PathBuf>,
        journal_path: Option<PathBuf>,
        seed: u64,
    },
}

#[derive(Debug, Clone)]
pub struct CliOptions {
    pub chart_path: Option<PathBuf>,
    pub command: Command,
}

pub fn load_chart(path: Option<&Path>) -> anyhow::Result<TypeChart> {
    match path {
        Some(path) => TypeChart::from_path(path)
            .with_context(|| format!("Failed to load type chart from {}", path.display())),
        None => Ok(TypeChart::standard()),
    }
}

pub fn load_snapshot(path: &Path) -> anyhow::Result<BattleSnapshot> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read battle state at {}", path.display()))?;
    let parsed: BattleSnapshot = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse JSON from {}", path.display()))?;
    Ok(parsed)
}

/// Matchup text for a defender, with the same placeholder the prompt uses.
pub fn matchup_text(
    chart: &TypeChart,
    defender: &[String],
    against: Option<&[String]>,
    label: &str,
) -> anyhow::Result<String> {
    let (primary, secondary) = match defender {
        [primary] => (primary.as_str(), None),
        [primary, secondary] => (primary.as_str(), Some(secondary.as_str())),
        _ => anyhow::bail!("Expected one or two defending types, got {}", defender.len()),
    };
    let against: Option<Vec<&str>> =
        against.map(|names| names.iter().map(String::as_str).collect());
    let result = classify_names(primary, secondary, chart, against.as_deref())?;
    let text = describe(label, &result);
    if text.is_empty() {
        Ok(prompt::NO_OPPONENT_ADVANTAGE.to_string())
    } else {
        Ok(text)
    }
}

pub fn run(opts: CliOptions) -> anyhow::Result<()> {
    let chart = load_chart(opts.chart_path.as_deref())?;
    match opts.command {
        Command::Matchup {
            defender,
            against,
            label,
        } => {
            println!(
                "{}",
                matchup_text(&chart, &defender, against.as_deref(), &label)?
            );
        }
        Command::Matrix { output_path } => {
            let rows = compute_defense_matrix(&chart);
            matrix::write_csv(&rows, &output_path)?;
            println!("Wrote {} defender rows to {}", rows.len(), output_path.display());
        }
        Command::Decide {
            state_path,
            reply_path,
            journal_path,
            seed,
        } => {
            let snapshot = load_snapshot(&state_path)?;
            let replies = match reply_path {
                Some(path) => vec![std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read reply at {}", path.display()))?],
                None => Vec::new(),
            };
            let options = AdvisorOptions {
                seed,
                ..AdvisorOptions::default()
            };
            let mut advisor = Advisor::new(ScriptedModel::new(replies), chart, options);
            if let Some(path) = journal_path {
                advisor = advisor.with_journal(Journal::open(path));
            }
            let outcome = advisor.choose(&snapshot)?;
            println!("{}\n", outcome.prompt.user);
            if let Some(thought) = &outcome.thought {
                println!("Thought: {thought}");
            }
            match &outcome.source {
                DecisionSource::Model => println!("Action: {}", outcome.action),
                DecisionSource::Fallback(reason) => {
                    println!("Action: {} (fallback: {reason})", outcome.action)
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn matchup_text_for_dual_type() {
        let chart = TypeChart::standard();
        let against = names(&["ROCK", "WATER"]);
        let text = matchup_text(
            &chart,
            &names(&["FIRE", "FLYING"]),
            Some(against.as_slice()),
            "Charizard",
        )
        .unwrap();
        assert_eq!(
            text,
            "Rock-type attack is extremely-effective (4x damage) to Charizard. \
             Water-type attack is super-effective (2x damage) to Charizard."
        );
    }

    #[test]
    fn matchup_text_placeholder_when_neutral() {
        let chart = TypeChart::standard();
        let against = names(&["WATER"]);
        let text = matchup_text(&chart, &names(&["NORMAL"]), Some(against.as_slice()), "Snorlax");
        assert_eq!(text.unwrap(), prompt::NO_OPPONENT_ADVANTAGE);
    }

    #[test]
    fn matchup_text_rejects_bad_defenders() {
        let chart = TypeChart::standard();
        let three = names(&["FIRE", "FLYING", "DRAGON"]);
        assert!(matchup_text(&chart, &three, None, "Mew").is_err());
        assert!(matchup_text(&chart, &[], None, "Mew").is_err());
        assert!(matchup_text(&chart, &names(&["SOUND"]), None, "Mew").is_err());
    }
}
