mod catalog;
mod engine;
mod error;
mod flow;
mod personas;
mod summary;
mod types;

pub use catalog::{Catalog, Consequences, Stage, StageOption};
pub use engine::{GameSession, Preview, apply_impact, resolve_choice};
pub use error::{CatalogError, GameError};
pub use flow::{ChoiceFlow, Phase};
pub use personas::{Journey, JourneyLibrary};
pub use summary::{JourneySummary, MeterChange, format_meter, format_usd, summarize};
pub use types::{
    ChoiceRecord, ClampRange, GameState, Impact, Meter, MeterSchema, Meters, Persona,
};
