use serde::Serialize;

use super::personas::Journey;
use super::types::{ChoiceRecord, GameState, Meter, Persona};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeterChange {
    pub meter: Meter,
    pub label: &'static str,
    pub start: f64,
    pub end: f64,
    pub delta: f64,
    pub display: String,
}

/// End-of-journey report. Also valid mid-journey as a progress snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneySummary {
    pub persona: Persona,
    pub persona_name: &'static str,
    pub stages_completed: usize,
    pub total_stages: usize,
    pub complete: bool,
    pub meters: Vec<MeterChange>,
    pub choices: Vec<ChoiceRecord>,
}

pub fn summarize(journey: &Journey, state: &GameState) -> JourneySummary {
    let start = journey.starting_meters();
    let meters = journey
        .schema()
        .meters()
        .iter()
        .map(|&meter| {
            let begin = start.get(meter);
            let end = state.meters.get(meter);
            MeterChange {
                meter,
                label: meter.label(),
                start: begin,
                end,
                delta: end - begin,
                display: format_meter(meter, end),
            }
        })
        .collect();

    let total_stages = journey.stages().len();
    JourneySummary {
        persona: journey.persona(),
        persona_name: journey.persona().name(),
        stages_completed: state.current_stage_index,
        total_stages,
        complete: state.current_stage_index >= total_stages,
        meters,
        choices: state.history.clone(),
    }
}

pub fn format_meter(meter: Meter, value: f64) -> String {
    if meter.is_currency() {
        format_usd(value)
    } else {
        // `+ 0.0` turns -0 into 0
        format!("{}", value.round() + 0.0)
    }
}

/// Whole US dollars with thousands separators, e.g. `-$1,234,568`.
pub fn format_usd(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::GameSession;

    #[test]
    fn formats_whole_dollars_with_separators() {
        assert_eq!(format_usd(0.0), "$0");
        assert_eq!(format_usd(999.0), "$999");
        assert_eq!(format_usd(1_000.0), "$1,000");
        assert_eq!(format_usd(45_000.0), "$45,000");
        assert_eq!(format_usd(1_234_567.6), "$1,234,568");
        assert_eq!(format_usd(-1_500.0), "-$1,500");
        assert_eq!(format_usd(-0.4), "$0");
    }

    #[test]
    fn non_currency_meters_render_as_points() {
        assert_eq!(format_meter(Meter::Knowledge, 7.0), "7");
        assert_eq!(format_meter(Meter::CreditScore, 712.0), "712");
        assert_eq!(format_meter(Meter::Emotion, -2.0), "-2");
        assert_eq!(format_meter(Meter::Debt, 14_000.0), "$14,000");
    }

    #[test]
    fn summary_tracks_deltas_from_start_and_history() {
        let journey = Journey::load(Persona::SmallBusiness).expect("journey loads");
        let choices: Vec<String> = journey
            .stages()
            .iter()
            .map(|stage| stage.options[1].id.clone())
            .collect();
        let session = GameSession::replay(&journey, &choices).expect("valid choices");
        let summary = session.summary();

        assert!(summary.complete);
        assert_eq!(summary.persona, Persona::SmallBusiness);
        assert_eq!(summary.stages_completed, journey.stages().len());
        assert_eq!(summary.choices.len(), journey.stages().len());
        assert_eq!(summary.meters.len(), journey.schema().meters().len());
        for change in &summary.meters {
            assert_eq!(change.delta, change.end - change.start);
            assert_eq!(change.end, session.state().meters.get(change.meter));
        }
    }

    #[test]
    fn fresh_session_summary_is_incomplete_with_zero_deltas() {
        let journey = Journey::load(Persona::NewAmerican).expect("journey loads");
        let summary = journey.session().summary();
        assert!(!summary.complete);
        assert_eq!(summary.stages_completed, 0);
        assert!(summary.choices.is_empty());
        assert!(summary.meters.iter().all(|change| change.delta == 0.0));
    }
}
