use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::error::CatalogError;
use super::types::{Impact, MeterSchema, Persona};

const MIN_OPTIONS: usize = 2;
const MAX_OPTIONS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consequences {
    pub immediate: String,
    pub short_term: String,
    pub long_term: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageOption {
    pub id: String,
    pub label: String,
    pub description: String,
    #[serde(default)]
    pub impact: Impact,
    pub consequences: Consequences,
}

/// One narrative decision point. `age` and `monthly_income` are display-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub id: usize,
    pub title: String,
    pub situation: String,
    pub context: String,
    pub learning_point: String,
    pub age: u32,
    pub monthly_income: f64,
    pub options: Vec<StageOption>,
}

impl Stage {
    pub fn option(&self, option_id: &str) -> Option<&StageOption> {
        self.options.iter().find(|option| option.id == option_id)
    }
}

/// Ordered, forward-only stage sequence for one persona.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub stages: Vec<Stage>,
}

impl Catalog {
    pub fn from_json(
        persona: Persona,
        schema: &MeterSchema,
        json: &str,
    ) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)
            .map_err(|source| CatalogError::Parse { persona, source })?;
        catalog.validate(persona, schema)?;
        Ok(catalog)
    }

    pub fn validate(&self, persona: Persona, schema: &MeterSchema) -> Result<(), CatalogError> {
        if self.stages.is_empty() {
            return Err(CatalogError::Empty { persona });
        }

        for (position, stage) in self.stages.iter().enumerate() {
            if stage.id != position {
                return Err(CatalogError::StageId {
                    persona,
                    position,
                    id: stage.id,
                });
            }

            let count = stage.options.len();
            if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&count) {
                return Err(CatalogError::OptionCount {
                    persona,
                    stage: stage.id,
                    count,
                });
            }

            let mut seen = BTreeSet::new();
            for option in &stage.options {
                if !seen.insert(option.id.as_str()) {
                    return Err(CatalogError::DuplicateOption {
                        persona,
                        stage: stage.id,
                        option_id: option.id.clone(),
                    });
                }

                for (meter, delta) in option.impact.iter() {
                    if !schema.contains(meter) {
                        return Err(CatalogError::UnknownMeter {
                            persona,
                            stage: stage.id,
                            option_id: option.id.clone(),
                            meter,
                        });
                    }
                    if !delta.is_finite() {
                        return Err(CatalogError::NonFiniteDelta {
                            persona,
                            stage: stage.id,
                            option_id: option.id.clone(),
                            meter,
                        });
                    }
                }
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stage(&self, index: usize) -> Option<&Stage> {
        self.stages.get(index)
    }
}
