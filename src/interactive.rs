use std::io::{self, BufRead, Write};

use crate::core::{
    ChoiceFlow, GameError, Journey, JourneySummary, Phase, Preview, Stage, format_meter,
};

/// Terminal walk-through of one journey over the select/confirm flow.
///
/// Input lines: an option number selects and previews it, `c` confirms the
/// selection, `x` clears it, `r` resets the journey and `q` quits. Returns the
/// summary at the point the loop ended.
pub fn play_interactive<R: BufRead, W: Write>(
    journey: &Journey,
    mut input: R,
    mut out: W,
) -> io::Result<JourneySummary> {
    let mut flow = ChoiceFlow::new(journey.session());
    writeln!(out, "{} journey", journey.persona().name())?;

    let mut line = String::new();
    loop {
        match flow.phase() {
            Phase::Complete => break,
            Phase::Browsing => {
                if let Some(stage) = flow.session().current_stage() {
                    print_stage(&mut out, &flow, stage)?;
                }
            }
            Phase::Previewing { .. } => {}
        }
        write!(out, "> ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        match line.trim() {
            "q" => break,
            "c" => match flow.confirm() {
                Ok(_) => {}
                Err(GameError::NothingSelected) => writeln!(out, "Select an option first.")?,
                Err(e) => writeln!(out, "{e}")?,
            },
            "x" => flow.clear(),
            "r" => {
                flow.reset();
                writeln!(out, "Journey reset.")?;
            }
            raw => {
                let picked = raw.parse::<usize>().ok().and_then(|n| {
                    flow.session()
                        .current_stage()
                        .and_then(|stage| n.checked_sub(1).and_then(|i| stage.options.get(i)))
                        .map(|option| option.id.clone())
                });
                match picked {
                    Some(option_id) => match flow.select(&option_id) {
                        Ok(preview) => print_preview(&mut out, &preview)?,
                        Err(e) => writeln!(out, "{e}")?,
                    },
                    None => writeln!(out, "Unknown command `{raw}`.")?,
                }
            }
        }
    }

    let summary = flow.session().summary();
    print_summary(&mut out, &summary)?;
    Ok(summary)
}

fn print_stage<W: Write>(out: &mut W, flow: &ChoiceFlow<'_>, stage: &Stage) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "Stage {}/{}: {} (age {})",
        stage.id + 1,
        flow.session().stage_count(),
        stage.title,
        stage.age
    )?;
    writeln!(out, "{}", stage.situation)?;
    for (meter, value) in flow.state().meters.iter() {
        writeln!(out, "  {:<24}{}", meter.label(), format_meter(meter, value))?;
    }
    for (i, option) in stage.options.iter().enumerate() {
        writeln!(out, "  [{}] {}", i + 1, option.label)?;
    }
    Ok(())
}

fn print_preview<W: Write>(out: &mut W, preview: &Preview) -> io::Result<()> {
    writeln!(out, "{}", preview.label)?;
    writeln!(out, "  now:   {}", preview.consequences.immediate)?;
    writeln!(out, "  soon:  {}", preview.consequences.short_term)?;
    writeln!(out, "  later: {}", preview.consequences.long_term)?;
    for (meter, delta) in preview.effective_impact.iter().filter(|(_, d)| *d != 0.0) {
        let sign = if delta > 0.0 { "+" } else { "-" };
        writeln!(
            out,
            "  {:<24}{sign}{}",
            meter.label(),
            format_meter(meter, delta.abs())
        )?;
    }
    writeln!(out, "Press c to confirm or pick another option.")
}

fn print_summary<W: Write>(out: &mut W, summary: &JourneySummary) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{}: {}/{} stages",
        summary.persona_name, summary.stages_completed, summary.total_stages
    )?;
    for change in &summary.meters {
        writeln!(out, "  {:<24}{}", change.label, change.display)?;
    }
    for choice in &summary.choices {
        writeln!(out, "  {}. {}", choice.stage + 1, choice.choice)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Persona;
    use std::io::Cursor;

    fn run_script(persona: Persona, script: &str) -> (JourneySummary, String) {
        let journey = Journey::load(persona).expect("journey loads");
        let mut out = Vec::new();
        let summary = play_interactive(&journey, Cursor::new(script.to_string()), &mut out)
            .expect("in-memory io");
        (summary, String::from_utf8(out).expect("utf8 output"))
    }

    #[test]
    fn confirms_selected_options_until_complete() {
        let journey = Journey::load(Persona::MidCareer).expect("journey loads");
        let script = "1\nc\n".repeat(journey.stages().len());
        let (summary, output) = run_script(Persona::MidCareer, &script);

        assert!(summary.complete);
        assert_eq!(summary.choices.len(), journey.stages().len());
        assert!(output.contains("Press c to confirm"));
    }

    #[test]
    fn confirm_without_selection_is_refused() {
        let (summary, output) = run_script(Persona::WorkingParent, "c\nq\n");
        assert_eq!(summary.stages_completed, 0);
        assert!(output.contains("Select an option first."));
    }

    #[test]
    fn switching_and_clearing_selection_do_not_advance() {
        let (summary, _) = run_script(Persona::NewAmerican, "1\n2\nx\nc\nq\n");
        assert_eq!(summary.stages_completed, 0);
    }

    #[test]
    fn reset_discards_progress() {
        let (summary, output) = run_script(Persona::PreRetiree, "1\nc\nr\nq\n");
        assert_eq!(summary.stages_completed, 0);
        assert!(summary.choices.is_empty());
        assert!(output.contains("Journey reset."));
    }

    #[test]
    fn out_of_range_option_number_is_unknown() {
        let (_, output) = run_script(Persona::SmallBusiness, "9\nq\n");
        assert!(output.contains("Unknown command `9`."));
    }
}
