use serde::Serialize;
use tracing::{debug, info, warn};

use super::catalog::{Consequences, Stage, StageOption};
use super::error::GameError;
use super::personas::Journey;
use super::summary::{JourneySummary, summarize};
use super::types::{ChoiceRecord, GameState, Impact, MeterSchema, Meters};

/// Adds `impact` to every meter in `schema`, clamping each result to its range.
pub fn apply_impact(schema: &MeterSchema, meters: &Meters, impact: &Impact) -> Meters {
    schema
        .meters()
        .iter()
        .map(|&meter| {
            let next = meters.get(meter) + impact.delta(meter);
            (meter, meter.clamp_range().apply(next))
        })
        .collect()
}

/// Pure transition for one confirmed choice: meters, stage pointer and history.
///
/// The caller guarantees that `option` belongs to the stage at
/// `state.current_stage_index`; see [`GameSession::resolve`].
pub fn resolve_choice(schema: &MeterSchema, state: &GameState, option: &StageOption) -> GameState {
    let mut history = Vec::with_capacity(state.history.len() + 1);
    history.extend_from_slice(&state.history);
    history.push(ChoiceRecord {
        stage: state.current_stage_index,
        option_id: option.id.clone(),
        choice: option.label.clone(),
        impact: option.consequences.immediate.clone(),
    });

    GameState {
        current_stage_index: state.current_stage_index + 1,
        meters: apply_impact(schema, &state.meters, &option.impact),
        history,
    }
}

/// Projected outcome of an option that has been selected but not confirmed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    pub stage: usize,
    pub option_id: String,
    pub label: String,
    pub consequences: Consequences,
    /// Raw deltas as authored in the catalog.
    pub impact: Impact,
    /// Deltas after clamping, i.e. what confirming would actually change.
    pub effective_impact: Impact,
    pub projected: Meters,
}

/// Owns the state of one playthrough of one journey.
#[derive(Debug, Clone)]
pub struct GameSession<'a> {
    journey: &'a Journey,
    state: GameState,
}

impl<'a> GameSession<'a> {
    pub fn new(journey: &'a Journey) -> Self {
        Self {
            journey,
            state: journey.starting_state(),
        }
    }

    /// Starts a fresh session and resolves `choices` in order.
    pub fn replay<S: AsRef<str>>(journey: &'a Journey, choices: &[S]) -> Result<Self, GameError> {
        let mut session = Self::new(journey);
        for option_id in choices {
            session.resolve(option_id.as_ref())?;
        }
        Ok(session)
    }

    pub fn journey(&self) -> &'a Journey {
        self.journey
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn stage_count(&self) -> usize {
        self.journey.catalog().len()
    }

    pub fn current_stage(&self) -> Option<&'a Stage> {
        let journey: &'a Journey = self.journey;
        journey.catalog().stage(self.state.current_stage_index)
    }

    pub fn is_complete(&self) -> bool {
        self.state.current_stage_index >= self.stage_count()
    }

    pub fn resolve(&mut self, option_id: &str) -> Result<&GameState, GameError> {
        let option = self.current_option(option_id)?;
        let next = resolve_choice(self.journey.schema(), &self.state, option);
        debug!(
            persona = %self.journey.persona(),
            stage = self.state.current_stage_index,
            option = option_id,
            "choice resolved"
        );
        self.state = next;

        if self.is_complete() {
            info!(
                persona = %self.journey.persona(),
                stages = self.stage_count(),
                "journey complete"
            );
        }
        Ok(&self.state)
    }

    pub fn preview(&self, option_id: &str) -> Result<Preview, GameError> {
        let option = self.current_option(option_id)?;
        let schema = self.journey.schema();
        let projected = apply_impact(schema, &self.state.meters, &option.impact);
        let effective_impact = schema
            .meters()
            .iter()
            .map(|&meter| (meter, projected.get(meter) - self.state.meters.get(meter)))
            .collect();

        Ok(Preview {
            stage: self.state.current_stage_index,
            option_id: option.id.clone(),
            label: option.label.clone(),
            consequences: option.consequences.clone(),
            impact: option.impact.clone(),
            effective_impact,
            projected,
        })
    }

    pub fn reset(&mut self) {
        self.state = self.journey.starting_state();
    }

    pub fn summary(&self) -> JourneySummary {
        summarize(self.journey, &self.state)
    }

    fn current_option(&self, option_id: &str) -> Result<&'a StageOption, GameError> {
        let Some(stage) = self.current_stage() else {
            warn!(
                persona = %self.journey.persona(),
                option = option_id,
                "choice rejected: journey already complete"
            );
            return Err(GameError::JourneyComplete {
                stages: self.stage_count(),
            });
        };

        stage.option(option_id).ok_or_else(|| {
            warn!(
                persona = %self.journey.persona(),
                stage = stage.id,
                option = option_id,
                "choice rejected: unknown option"
            );
            GameError::UnknownOption {
                stage: stage.id,
                option_id: option_id.to_string(),
            }
        })
    }
}
