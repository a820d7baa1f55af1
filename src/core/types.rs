use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Every resource meter any persona can track.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Meter {
    NetWorth,
    Savings,
    Debt,
    Emotion,
    Knowledge,
    Risk,
    FamilyStability,
    CareerGrowth,
    CreditScore,
    UsCitizenship,
    BusinessValue,
    TaxOptimization,
    #[serde(rename = "retirement401k")]
    Retirement401k,
    CatchUpContributions,
}

impl Meter {
    pub const ALL: [Meter; 14] = [
        Meter::NetWorth,
        Meter::Savings,
        Meter::Debt,
        Meter::Emotion,
        Meter::Knowledge,
        Meter::Risk,
        Meter::FamilyStability,
        Meter::CareerGrowth,
        Meter::CreditScore,
        Meter::UsCitizenship,
        Meter::BusinessValue,
        Meter::TaxOptimization,
        Meter::Retirement401k,
        Meter::CatchUpContributions,
    ];

    /// Wire name, matching the catalog and API keys.
    pub fn key(self) -> &'static str {
        match self {
            Meter::NetWorth => "netWorth",
            Meter::Savings => "savings",
            Meter::Debt => "debt",
            Meter::Emotion => "emotion",
            Meter::Knowledge => "knowledge",
            Meter::Risk => "risk",
            Meter::FamilyStability => "familyStability",
            Meter::CareerGrowth => "careerGrowth",
            Meter::CreditScore => "creditScore",
            Meter::UsCitizenship => "usCitizenship",
            Meter::BusinessValue => "businessValue",
            Meter::TaxOptimization => "taxOptimization",
            Meter::Retirement401k => "retirement401k",
            Meter::CatchUpContributions => "catchUpContributions",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Meter::NetWorth => "Net worth",
            Meter::Savings => "Savings",
            Meter::Debt => "Debt",
            Meter::Emotion => "Emotional wellbeing",
            Meter::Knowledge => "Financial knowledge",
            Meter::Risk => "Risk exposure",
            Meter::FamilyStability => "Family stability",
            Meter::CareerGrowth => "Career growth",
            Meter::CreditScore => "Credit score",
            Meter::UsCitizenship => "Citizenship progress",
            Meter::BusinessValue => "Business value",
            Meter::TaxOptimization => "Tax optimization",
            Meter::Retirement401k => "401(k) balance",
            Meter::CatchUpContributions => "Catch-up contributions",
        }
    }

    pub fn clamp_range(self) -> ClampRange {
        match self {
            Meter::NetWorth
            | Meter::Savings
            | Meter::Debt
            | Meter::BusinessValue
            | Meter::Retirement401k
            | Meter::CatchUpContributions => ClampRange::floor(0.0),
            Meter::Emotion | Meter::FamilyStability | Meter::CareerGrowth => {
                ClampRange::bounded(-5.0, 5.0)
            }
            Meter::Knowledge | Meter::Risk | Meter::UsCitizenship | Meter::TaxOptimization => {
                ClampRange::bounded(0.0, 10.0)
            }
            Meter::CreditScore => ClampRange::bounded(0.0, 850.0),
        }
    }

    /// Currency meters are displayed as whole US dollars.
    pub fn is_currency(self) -> bool {
        self.clamp_range().max.is_none()
    }
}

impl fmt::Display for Meter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Valid range of a meter. `max: None` means floored only.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct ClampRange {
    pub min: f64,
    pub max: Option<f64>,
}

impl ClampRange {
    pub const fn floor(min: f64) -> Self {
        Self { min, max: None }
    }

    pub const fn bounded(min: f64, max: f64) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    /// Clamps a resulting meter value, never the delta that produced it.
    pub fn apply(self, value: f64) -> f64 {
        let floored = value.max(self.min);
        match self.max {
            Some(max) => floored.min(max),
            None => floored,
        }
    }

    pub fn contains(self, value: f64) -> bool {
        value >= self.min && self.max.is_none_or(|max| value <= max)
    }
}

/// Meter values of one game state. Meters absent from the map read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(BTreeMap<Meter, f64>);

impl Meters {
    pub fn get(&self, meter: Meter) -> f64 {
        self.0.get(&meter).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Meter, f64)> + '_ {
        self.0.iter().map(|(meter, value)| (*meter, *value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Meter, f64)> for Meters {
    fn from_iter<I: IntoIterator<Item = (Meter, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Signed per-meter deltas carried by an option. Missing meters have no effect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Impact(BTreeMap<Meter, f64>);

impl Impact {
    pub fn delta(&self, meter: Meter) -> f64 {
        self.0.get(&meter).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Meter, f64)> + '_ {
        self.0.iter().map(|(meter, delta)| (*meter, *delta))
    }
}

impl FromIterator<(Meter, f64)> for Impact {
    fn from_iter<I: IntoIterator<Item = (Meter, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The ordered meters a persona tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MeterSchema(Vec<Meter>);

impl MeterSchema {
    pub fn new(meters: Vec<Meter>) -> Self {
        Self(meters)
    }

    pub fn meters(&self) -> &[Meter] {
        &self.0
    }

    pub fn contains(&self, meter: Meter) -> bool {
        self.0.contains(&meter)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Persona {
    #[serde(alias = "workingParent", alias = "working_parent")]
    WorkingParent,
    #[serde(alias = "midCareer", alias = "mid_career")]
    MidCareer,
    #[serde(alias = "newAmerican", alias = "new_american")]
    NewAmerican,
    #[serde(alias = "preRetiree", alias = "pre_retiree")]
    PreRetiree,
    #[serde(alias = "smallBusiness", alias = "small_business")]
    SmallBusiness,
}

impl Persona {
    pub const ALL: [Persona; 5] = [
        Persona::WorkingParent,
        Persona::MidCareer,
        Persona::NewAmerican,
        Persona::PreRetiree,
        Persona::SmallBusiness,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Persona::WorkingParent => "working-parent",
            Persona::MidCareer => "mid-career",
            Persona::NewAmerican => "new-american",
            Persona::PreRetiree => "pre-retiree",
            Persona::SmallBusiness => "small-business",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Persona::WorkingParent => "Working Parent",
            Persona::MidCareer => "Mid-Career Professional",
            Persona::NewAmerican => "New American",
            Persona::PreRetiree => "Pre-Retiree",
            Persona::SmallBusiness => "Small Business Owner",
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// One resolved choice, kept for the completion summary only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceRecord {
    pub stage: usize,
    pub option_id: String,
    pub choice: String,
    pub impact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub current_stage_index: usize,
    pub meters: Meters,
    pub history: Vec<ChoiceRecord>,
}

impl GameState {
    pub fn new(meters: Meters) -> Self {
        Self {
            current_stage_index: 0,
            meters,
            history: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_range_has_no_ceiling() {
        let range = Meter::Savings.clamp_range();
        assert_eq!(range.apply(-400.0), 0.0);
        assert_eq!(range.apply(1.0e12), 1.0e12);
        assert!(Meter::Savings.is_currency());
    }

    #[test]
    fn bounded_ranges_match_meter_rules() {
        assert_eq!(Meter::Knowledge.clamp_range().apply(13.0), 10.0);
        assert_eq!(Meter::Emotion.clamp_range().apply(-9.0), -5.0);
        assert_eq!(Meter::CreditScore.clamp_range().apply(900.0), 850.0);
        assert_eq!(Meter::UsCitizenship.clamp_range().apply(-1.0), 0.0);
        assert!(!Meter::CreditScore.is_currency());
    }

    #[test]
    fn meter_keys_match_serde_names() {
        for meter in Meter::ALL {
            let json = serde_json::to_string(&meter).expect("meter serializes");
            assert_eq!(json, format!("\"{}\"", meter.key()));
        }
    }

    #[test]
    fn impact_defaults_missing_meters_to_zero() {
        let impact: Impact =
            serde_json::from_str(r#"{"savings": -500, "retirement401k": 1200}"#)
                .expect("impact parses");
        assert_eq!(impact.delta(Meter::Savings), -500.0);
        assert_eq!(impact.delta(Meter::Retirement401k), 1200.0);
        assert_eq!(impact.delta(Meter::Debt), 0.0);
    }

    #[test]
    fn persona_accepts_web_aliases() {
        for raw in ["\"working-parent\"", "\"workingParent\"", "\"working_parent\""] {
            let persona: Persona = serde_json::from_str(raw).expect("persona parses");
            assert_eq!(persona, Persona::WorkingParent);
        }
    }
}
