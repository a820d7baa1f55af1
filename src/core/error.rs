use thiserror::Error;

use super::types::{Meter, Persona};

/// A stage catalog or starting snapshot that cannot be played.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse {persona} catalog: {source}")]
    Parse {
        persona: Persona,
        #[source]
        source: serde_json::Error,
    },
    #[error("{persona} catalog has no stages")]
    Empty { persona: Persona },
    #[error("{persona} stage at position {position} has id {id}")]
    StageId {
        persona: Persona,
        position: usize,
        id: usize,
    },
    #[error("{persona} stage {stage} has {count} options, expected 2 to 4")]
    OptionCount {
        persona: Persona,
        stage: usize,
        count: usize,
    },
    #[error("{persona} stage {stage} repeats option id `{option_id}`")]
    DuplicateOption {
        persona: Persona,
        stage: usize,
        option_id: String,
    },
    #[error("{persona} stage {stage} option `{option_id}` changes {meter}, which {persona} does not track")]
    UnknownMeter {
        persona: Persona,
        stage: usize,
        option_id: String,
        meter: Meter,
    },
    #[error("{persona} stage {stage} option `{option_id}` has a non-finite {meter} delta")]
    NonFiniteDelta {
        persona: Persona,
        stage: usize,
        option_id: String,
        meter: Meter,
    },
    #[error("{persona} starts with {meter} = {value}, outside its range")]
    StartOutOfRange {
        persona: Persona,
        meter: Meter,
        value: f64,
    },
}

/// A game action whose precondition does not hold. State is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("journey is complete after {stages} stages; reset to play again")]
    JourneyComplete { stages: usize },
    #[error("stage {stage} has no option `{option_id}`")]
    UnknownOption { stage: usize, option_id: String },
    #[error("no option is selected")]
    NothingSelected,
}
