use serde::Serialize;

use super::engine::{GameSession, Preview};
use super::error::GameError;
use super::types::GameState;

/// Where the player is in the select-then-confirm interaction.
///
/// Resolution happens synchronously inside [`ChoiceFlow::confirm`], so there is
/// no observable resolving phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum Phase {
    Browsing,
    #[serde(rename_all = "camelCase")]
    Previewing {
        option_id: String,
    },
    Complete,
}

/// Two-phase commit over a [`GameSession`]: an option is selected and
/// previewed first, and only an explicit confirm resolves it.
#[derive(Debug, Clone)]
pub struct ChoiceFlow<'a> {
    session: GameSession<'a>,
    phase: Phase,
}

impl<'a> ChoiceFlow<'a> {
    pub fn new(session: GameSession<'a>) -> Self {
        let phase = idle_phase(&session);
        Self { session, phase }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn session(&self) -> &GameSession<'a> {
        &self.session
    }

    pub fn state(&self) -> &GameState {
        self.session.state()
    }

    /// Highlights an option, replacing any previous selection.
    pub fn select(&mut self, option_id: &str) -> Result<Preview, GameError> {
        let preview = self.session.preview(option_id)?;
        self.phase = Phase::Previewing {
            option_id: preview.option_id.clone(),
        };
        Ok(preview)
    }

    pub fn clear(&mut self) {
        if matches!(self.phase, Phase::Previewing { .. }) {
            self.phase = Phase::Browsing;
        }
    }

    pub fn confirm(&mut self) -> Result<&GameState, GameError> {
        let option_id = match &self.phase {
            Phase::Browsing => return Err(GameError::NothingSelected),
            Phase::Complete => {
                return Err(GameError::JourneyComplete {
                    stages: self.session.stage_count(),
                });
            }
            Phase::Previewing { option_id } => option_id.clone(),
        };

        self.session.resolve(&option_id)?;
        self.phase = idle_phase(&self.session);
        Ok(self.session.state())
    }

    pub fn reset(&mut self) {
        self.session.reset();
        self.phase = idle_phase(&self.session);
    }
}

fn idle_phase(session: &GameSession<'_>) -> Phase {
    if session.is_complete() {
        Phase::Complete
    } else {
        Phase::Browsing
    }
}
