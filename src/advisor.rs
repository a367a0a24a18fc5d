use crate::decision::{parse_reply, random_action, resolve, Action, Choice};
use crate::journal::{Journal, TurnRecord};
use crate::model::BattleSnapshot;
use crate::prompt::{build_prompt, format_battle_state, Prompt};
use crate::types::TypeChart;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;

/// Whatever produces the reply text: a hosted model client, or a script in tests.
pub trait DecisionModel {
    fn complete(&self, prompt: &Prompt) -> anyhow::Result<String>;
}

impl<F> DecisionModel for F
where
    F: Fn(&Prompt) -> anyhow::Result<String>,
{
    fn complete(&self, prompt: &Prompt) -> anyhow::Result<String> {
        self(prompt)
    }
}

/// Replays canned replies in order; errors once they run out.
#[derive(Debug, Default)]
pub struct ScriptedModel {
    replies: RefCell<VecDeque<String>>,
}

impl ScriptedModel {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedModel {
            replies: RefCell::new(replies.into_iter().map(Into::into).collect()),
        }
    }
}

impl DecisionModel for ScriptedModel {
    fn complete(&self, _prompt: &Prompt) -> anyhow::Result<String> {
        self.replies
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("scripted model has no replies left"))
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FallbackReason {
    ModelError(String),
    Unparseable,
    UnavailableMove(String),
    UnavailableSwitch(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::ModelError(err) => write!(f, "model call failed: {err}"),
            FallbackReason::Unparseable => f.write_str("reply had no usable JSON decision"),
            FallbackReason::UnavailableMove(name) => write!(f, "move {name:?} is not available"),
            FallbackReason::UnavailableSwitch(name) => {
                write!(f, "switch {name:?} is not available")
            }
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DecisionSource {
    Model,
    Fallback(FallbackReason),
}

#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub action: Action,
    pub source: DecisionSource,
    pub thought: Option<String>,
    pub prompt: Prompt,
}

impl TurnOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, DecisionSource::Fallback(_))
    }
}

#[derive(Clone, Debug)]
pub struct AdvisorOptions {
    pub seed: u64,
    pub recall_limit: usize,
}

impl Default for AdvisorOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            recall_limit: 3,
        }
    }
}

pub struct Advisor<M> {
    model: M,
    chart: TypeChart,
    journal: Option<Journal>,
    recall_limit: usize,
    rng: SmallRng,
}

impl<M: DecisionModel> Advisor<M> {
    pub fn new(model: M, chart: TypeChart, options: AdvisorOptions) -> Self {
        Advisor {
            model,
            chart,
            journal: None,
            recall_limit: options.recall_limit,
            rng: SmallRng::seed_from_u64(options.seed),
        }
    }

    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Picks this turn's action. Model failures fall back to a random legal action;
    /// only journal I/O can fail the turn.
    pub fn choose(&mut self, snapshot: &BattleSnapshot) -> anyhow::Result<TurnOutcome> {
        let state = format_battle_state(snapshot, &self.chart);
        let recalled = match &self.journal {
            Some(journal) if self.recall_limit > 0 => journal.recall(
                &snapshot.active.species,
                &snapshot.opponent.species,
                self.recall_limit,
            )?,
            _ => Vec::new(),
        };
        let prompt = build_prompt(&state, &recalled);
        tracing::debug!(turn = snapshot.turn, recalled = recalled.len(), "prompting model");

        let (decided, thought) = match self.model.complete(&prompt) {
            Err(err) => (Err(FallbackReason::ModelError(format!("{err:#}"))), None),
            Ok(reply) => match parse_reply(&reply) {
                None => (Err(FallbackReason::Unparseable), None),
                Some(decision) => {
                    let resolved =
                        resolve(&decision, snapshot).ok_or_else(|| match &decision.choice {
                            Choice::Move(name) => FallbackReason::UnavailableMove(name.clone()),
                            Choice::Switch(name) => {
                                FallbackReason::UnavailableSwitch(name.clone())
                            }
                        });
                    (resolved, decision.thought)
                }
            },
        };

        let (action, source) = match decided {
            Ok(action) => {
                tracing::info!(turn = snapshot.turn, %action, "model decision");
                (action, DecisionSource::Model)
            }
            Err(reason) => {
                let action = random_action(snapshot, &mut self.rng);
                tracing::warn!(
                    turn = snapshot.turn,
                    %reason,
                    %action,
                    "falling back to random action"
                );
                (action, DecisionSource::Fallback(reason))
            }
        };

        let outcome = TurnOutcome {
            action,
            source,
            thought,
            prompt,
        };
        if let Some(journal) = &self.journal {
            journal.append(&TurnRecord {
                battle_tag: snapshot.battle_tag.clone(),
                turn: snapshot.turn,
                active_species: snapshot.active.species.clone(),
                opponent_species: snapshot.opponent.species.clone(),
                state,
                thought: outcome.thought.clone(),
                action: outcome.action.clone(),
                fallback: outcome.is_fallback(),
            })?;
        }
        Ok(outcome)
    }
}
