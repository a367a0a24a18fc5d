use crate::effectiveness::{classify, describe};
use crate::journal::TurnRecord;
use crate::model::{BattleSnapshot, CombatantView, MoveOption, StatusCondition};
use crate::types::TypeChart;
use std::fmt::Write;

pub const NO_OPPONENT_ADVANTAGE: &str = "No opponent type advantage.";
pub const NEUTRAL_EFFECTIVENESS: &str = "Neutral effectiveness";

const SYSTEM_PROMPT: &str = "You are a competitive Pokemon battler playing to win. \
Pick the single best action for this turn: use one of the available moves or switch to one \
of the available Pokemon. Weigh type matchups, stat boosts, remaining HP and the chance to \
knock the opponent out before it knocks you out.";

const ANSWER_FORMAT: &str = "Think it through in at most four sentences, then answer with \
JSON only: {\"thought\": \"<reasoning>\", \"move\": \"<move id>\"} to attack or \
{\"thought\": \"<reasoning>\", \"switch\": \"<species>\"} to switch.";

#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// How the opponent's own types hit our active creature.
pub fn threat_summary(snapshot: &BattleSnapshot, chart: &TypeChart) -> String {
    let Some(primary) = snapshot.active.primary_type() else {
        return NO_OPPONENT_ADVANTAGE.to_string();
    };
    let result = classify(
        primary,
        snapshot.active.secondary_type(),
        chart,
        Some(snapshot.opponent.types.as_slice()),
    );
    let text = describe(&snapshot.active.species, &result);
    if text.is_empty() {
        NO_OPPONENT_ADVANTAGE.to_string()
    } else {
        text
    }
}

/// How one of our moves hits the opponent.
pub fn move_summary(mv: &MoveOption, opponent: &CombatantView, chart: &TypeChart) -> String {
    let Some(primary) = opponent.primary_type() else {
        return NEUTRAL_EFFECTIVENESS.to_string();
    };
    let result = classify(
        primary,
        opponent.secondary_type(),
        chart,
        Some(std::slice::from_ref(&mv.move_type)),
    );
    let text = describe(&opponent.species, &result);
    if text.is_empty() {
        NEUTRAL_EFFECTIVENESS.to_string()
    } else {
        text
    }
}

fn status_label(status: Option<StatusCondition>) -> &'static str {
    status.map_or("None", StatusCondition::label)
}

fn format_boosts(view: &CombatantView) -> String {
    if view.boosts.is_empty() {
        return "None".to_string();
    }
    view.boosts
        .iter()
        .map(|(stat, stage)| format!("{stat} {stage:+}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_combatant(heading: &str, view: &CombatantView) -> String {
    let types: Vec<&str> = view.types.iter().map(|t| t.name()).collect();
    format!(
        "{heading}: {}\nType: {}\nHP: {:.1}%\nStatus: {}\nBoosts: {}",
        view.species,
        types.join(" / "),
        view.hp_fraction * 100.0,
        status_label(view.status),
        format_boosts(view)
    )
}

pub fn format_battle_state(snapshot: &BattleSnapshot, chart: &TypeChart) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", format_combatant("Your active Pokemon", &snapshot.active));
    let _ = writeln!(out, "{}\n", threat_summary(snapshot, chart));
    let _ = writeln!(
        out,
        "{}\n",
        format_combatant("Opponent's active Pokemon", &snapshot.opponent)
    );

    out.push_str("Available moves:\n");
    if snapshot.available_moves.is_empty() {
        out.push_str("- None (Must switch or Struggle)\n");
    }
    for mv in &snapshot.available_moves {
        let _ = writeln!(
            out,
            "- {} (Type: {}, Base Power: {}, Accuracy: {}, PP: {}/{}, Category: {:?}) - {}",
            mv.id,
            mv.move_type.name(),
            mv.base_power,
            mv.accuracy,
            mv.current_pp,
            mv.max_pp,
            mv.category,
            move_summary(mv, &snapshot.opponent, chart)
        );
    }

    out.push_str("\nAvailable switches:\n");
    if snapshot.available_switches.is_empty() {
        out.push_str("- None\n");
    }
    for sw in &snapshot.available_switches {
        let _ = writeln!(
            out,
            "- {} (HP: {:.1}%, Status: {})",
            sw.species,
            sw.hp_fraction * 100.0,
            status_label(sw.status)
        );
    }
    out.trim().to_string()
}

pub fn build_prompt(state: &str, recalled: &[TurnRecord]) -> Prompt {
    let mut user = format!("Current battle state:\n{state}\n\n");
    if !recalled.is_empty() {
        user.push_str("Similar past turns:\n");
        for record in recalled {
            let _ = writeln!(
                user,
                "- Turn {} ({} vs {}): chose {}{}",
                record.turn,
                record.active_species,
                record.opponent_species,
                record.action,
                record
                    .thought
                    .as_deref()
                    .map(|t| format!(" because {t}"))
                    .unwrap_or_default()
            );
        }
        user.push('\n');
    }
    user.push_str(ANSWER_FORMAT);
    Prompt {
        system: SYSTEM_PROMPT.to_string(),
        user,
    }
}
