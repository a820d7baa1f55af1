use super::catalog::{Catalog, Stage};
use super::engine::GameSession;
use super::error::CatalogError;
use super::types::{GameState, Meter, MeterSchema, Meters, Persona};

const WORKING_PARENT_CATALOG: &str = include_str!("../../data/working_parent.json");
const MID_CAREER_CATALOG: &str = include_str!("../../data/mid_career.json");
const NEW_AMERICAN_CATALOG: &str = include_str!("../../data/new_american.json");
const PRE_RETIREE_CATALOG: &str = include_str!("../../data/pre_retiree.json");
const SMALL_BUSINESS_CATALOG: &str = include_str!("../../data/small_business.json");

// Starting snapshots double as the meter schema: the listed meters, in order,
// are the only ones the persona tracks.
const WORKING_PARENT_START: &[(Meter, f64)] = &[
    (Meter::NetWorth, 45_000.0),
    (Meter::Savings, 25_000.0),
    (Meter::Debt, 15_000.0),
    (Meter::Emotion, 0.0),
    (Meter::Knowledge, 0.0),
    (Meter::Risk, 0.0),
    (Meter::FamilyStability, 0.0),
    (Meter::CareerGrowth, 0.0),
];

const MID_CAREER_START: &[(Meter, f64)] = &[
    (Meter::NetWorth, 180_000.0),
    (Meter::Savings, 40_000.0),
    (Meter::Debt, 60_000.0),
    (Meter::Emotion, 0.0),
    (Meter::Knowledge, 2.0),
    (Meter::Risk, 3.0),
    (Meter::CareerGrowth, 0.0),
    (Meter::Retirement401k, 95_000.0),
];

const NEW_AMERICAN_START: &[(Meter, f64)] = &[
    (Meter::NetWorth, 8_000.0),
    (Meter::Savings, 6_000.0),
    (Meter::Debt, 0.0),
    (Meter::Emotion, 0.0),
    (Meter::Knowledge, 0.0),
    (Meter::Risk, 0.0),
    (Meter::CreditScore, 0.0),
    (Meter::UsCitizenship, 0.0),
];

const PRE_RETIREE_START: &[(Meter, f64)] = &[
    (Meter::NetWorth, 720_000.0),
    (Meter::Savings, 90_000.0),
    (Meter::Debt, 45_000.0),
    (Meter::Emotion, 0.0),
    (Meter::Knowledge, 4.0),
    (Meter::Risk, 5.0),
    (Meter::Retirement401k, 480_000.0),
    (Meter::CatchUpContributions, 0.0),
];

const SMALL_BUSINESS_START: &[(Meter, f64)] = &[
    (Meter::NetWorth, 85_000.0),
    (Meter::Savings, 20_000.0),
    (Meter::Debt, 40_000.0),
    (Meter::Emotion, 0.0),
    (Meter::Knowledge, 2.0),
    (Meter::Risk, 4.0),
    (Meter::BusinessValue, 50_000.0),
    (Meter::TaxOptimization, 0.0),
];

fn persona_data(persona: Persona) -> (&'static [(Meter, f64)], &'static str) {
    match persona {
        Persona::WorkingParent => (WORKING_PARENT_START, WORKING_PARENT_CATALOG),
        Persona::MidCareer => (MID_CAREER_START, MID_CAREER_CATALOG),
        Persona::NewAmerican => (NEW_AMERICAN_START, NEW_AMERICAN_CATALOG),
        Persona::PreRetiree => (PRE_RETIREE_START, PRE_RETIREE_CATALOG),
        Persona::SmallBusiness => (SMALL_BUSINESS_START, SMALL_BUSINESS_CATALOG),
    }
}

/// A persona's meter schema, literal starting snapshot and stage catalog.
#[derive(Debug, Clone)]
pub struct Journey {
    persona: Persona,
    schema: MeterSchema,
    start: Meters,
    catalog: Catalog,
}

impl Journey {
    pub fn load(persona: Persona) -> Result<Self, CatalogError> {
        let (start, catalog_json) = persona_data(persona);
        let schema = MeterSchema::new(start.iter().map(|(meter, _)| *meter).collect());
        let start: Meters = start.iter().copied().collect();
        let catalog = Catalog::from_json(persona, &schema, catalog_json)?;
        Self::new(persona, schema, start, catalog)
    }

    pub fn new(
        persona: Persona,
        schema: MeterSchema,
        start: Meters,
        catalog: Catalog,
    ) -> Result<Self, CatalogError> {
        for &meter in schema.meters() {
            let value = start.get(meter);
            if !meter.clamp_range().contains(value) {
                return Err(CatalogError::StartOutOfRange {
                    persona,
                    meter,
                    value,
                });
            }
        }
        catalog.validate(persona, &schema)?;

        Ok(Self {
            persona,
            schema,
            start,
            catalog,
        })
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    pub fn schema(&self) -> &MeterSchema {
        &self.schema
    }

    pub fn starting_meters(&self) -> &Meters {
        &self.start
    }

    pub fn starting_state(&self) -> GameState {
        GameState::new(self.start.clone())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn stages(&self) -> &[Stage] {
        &self.catalog.stages
    }

    pub fn session(&self) -> GameSession<'_> {
        GameSession::new(self)
    }
}

/// All five persona journeys, loaded once and shared read-only.
#[derive(Debug, Clone)]
pub struct JourneyLibrary {
    journeys: Vec<Journey>,
}

impl JourneyLibrary {
    pub fn load() -> Result<Self, CatalogError> {
        let journeys = Persona::ALL
            .into_iter()
            .map(Journey::load)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { journeys })
    }

    pub fn get(&self, persona: Persona) -> Option<&Journey> {
        self.journeys
            .iter()
            .find(|journey| journey.persona == persona)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Journey> {
        self.journeys.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_bundled_catalog_loads() {
        let library = JourneyLibrary::load().expect("bundled catalogs are valid");
        for persona in Persona::ALL {
            let journey = library.get(persona).expect("persona loaded");
            assert!(!journey.stages().is_empty(), "{persona} has no stages");
            assert_eq!(journey.schema().meters().len(), 8);
        }
    }

    #[test]
    fn working_parent_starts_from_literal_snapshot() {
        let journey = Journey::load(Persona::WorkingParent).expect("journey loads");
        let start = journey.starting_state();
        assert_eq!(start.current_stage_index, 0);
        assert!(start.history.is_empty());
        assert_eq!(start.meters.get(Meter::NetWorth), 45_000.0);
        assert_eq!(start.meters.get(Meter::Savings), 25_000.0);
        assert_eq!(start.meters.get(Meter::Debt), 15_000.0);
        for meter in [
            Meter::Emotion,
            Meter::Knowledge,
            Meter::Risk,
            Meter::FamilyStability,
            Meter::CareerGrowth,
        ] {
            assert_eq!(start.meters.get(meter), 0.0);
        }
    }

    #[test]
    fn persona_specific_meters_are_tracked() {
        let library = JourneyLibrary::load().expect("bundled catalogs are valid");
        let tracks = |persona: Persona, meter: Meter| {
            library
                .get(persona)
                .map(|journey| journey.schema().contains(meter))
                .unwrap_or(false)
        };
        assert!(tracks(Persona::NewAmerican, Meter::CreditScore));
        assert!(tracks(Persona::NewAmerican, Meter::UsCitizenship));
        assert!(tracks(Persona::SmallBusiness, Meter::BusinessValue));
        assert!(tracks(Persona::PreRetiree, Meter::CatchUpContributions));
        assert!(tracks(Persona::MidCareer, Meter::Retirement401k));
        assert!(!tracks(Persona::WorkingParent, Meter::CreditScore));
    }

    #[test]
    fn rejects_starting_snapshot_outside_range() {
        let schema = MeterSchema::new(vec![Meter::Knowledge]);
        let start: Meters = [(Meter::Knowledge, 11.0)].into_iter().collect();
        let catalog = Journey::load(Persona::WorkingParent)
            .expect("journey loads")
            .catalog()
            .clone();
        let err = Journey::new(Persona::WorkingParent, schema, start, catalog)
            .expect_err("knowledge above ceiling");
        assert!(matches!(
            err,
            CatalogError::StartOutOfRange {
                meter: Meter::Knowledge,
                ..
            }
        ));
    }
}
