//! Text, Markdown and JSON report generation.
//!
//! This module turns calculations and trial reports into the output shown
//! to the user.

use super::chart::{render_bar_chart, Bar, ChartStyle};
use crate::models::{
    Calculation, CalculationReport, ReportMetadata, SimulationReport, TrialReport, TrialSummary,
};
use anyhow::Result;
use std::io::Write;
use std::path::Path;

/// Formats a number, with fixed decimals when `precision` is set.
pub fn format_value(value: f64, precision: Option<usize>) -> String {
    match precision {
        Some(digits) if value.is_finite() => format!("{:.*}", digits, value),
        _ => value.to_string(),
    }
}

/// One-line rendering of a calculation: `a op b = result` or the error message.
pub fn calculation_line(calc: &Calculation, precision: Option<usize>) -> String {
    let expression = calc.operation.expression(calc.a, calc.b);
    match (calc.value, &calc.message) {
        (Some(value), _) => format!("{} = {}", expression, format_value(value, precision)),
        (None, Some(message)) => format!("{}: Error: {}", expression, message),
        (None, None) => format!("{}: no result", expression),
    }
}

/// Generate the plain-text output for a calculation.
pub fn generate_text_calculation(report: &CalculationReport, precision: Option<usize>) -> String {
    format!("{}\n", calculation_line(&report.calculation, precision))
}

/// Generate a Markdown report for a calculation.
pub fn generate_markdown_calculation(
    report: &CalculationReport,
    precision: Option<usize>,
) -> String {
    let calc = &report.calculation;
    let mut output = String::new();

    output.push_str("# CalcLab Calculation\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));

    output.push_str("## Result\n\n");
    output.push_str("| Operation | a | b | Result |\n");
    output.push_str("|:---|---:|---:|:---|\n");

    let result = match (calc.value, &calc.message) {
        (Some(value), _) => format!("`{}`", format_value(value, precision)),
        (None, Some(message)) => format!("**Error:** {}", message),
        (None, None) => "-".to_string(),
    };
    output.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        calc.operation, calc.a, calc.b, result
    ));

    output.push_str(&generate_footer());
    output
}

/// Generate the plain-text output for a trial run: a table and two bar charts.
pub fn generate_text_simulation(report: &SimulationReport, style: &ChartStyle) -> String {
    let trials = &report.trials;
    let mut output = String::new();

    output.push_str(&format!("{}: {} trials\n", trials.kind, trials.total));
    if let Some(requested) = report.requested_trials {
        output.push_str(&format!(
            "(requested {}, clamped to {})\n",
            requested, trials.total
        ));
    }
    output.push('\n');

    output.push_str(&format!("{:<8} {:>8} {:>10}\n", "Outcome", "Count", "Frequency"));
    for tally in &trials.tallies {
        output.push_str(&format!(
            "{:<8} {:>8} {:>10.4}\n",
            tally.outcome.to_string(),
            tally.count,
            tally.frequency
        ));
    }

    output.push_str("\nCounts\n");
    output.push_str(&render_bar_chart(&count_bars(trials), style));
    output.push_str("\nRelative frequency\n");
    output.push_str(&render_bar_chart(&frequency_bars(trials), style));

    output.push('\n');
    output.push_str(&summary_line(&report.summary));
    output.push('\n');
    output
}

/// Generate a Markdown report for a trial run.
pub fn generate_markdown_simulation(report: &SimulationReport, style: &ChartStyle) -> String {
    let trials = &report.trials;
    let mut output = String::new();

    output.push_str(&format!("# CalcLab Simulation: {}\n\n", trials.kind));
    output.push_str(&generate_metadata_section(&report.metadata));

    output.push_str("## Results\n\n");
    output.push_str(&format!("- **Trials:** {}\n", trials.total));
    if let Some(requested) = report.requested_trials {
        output.push_str(&format!("- **Requested:** {} (clamped)\n", requested));
    }
    output.push('\n');
    output.push_str(&generate_table(trials));

    output.push_str("## Counts\n\n```text\n");
    output.push_str(&render_bar_chart(&count_bars(trials), style));
    output.push_str("```\n\n");

    output.push_str("## Relative Frequency\n\n```text\n");
    output.push_str(&render_bar_chart(&frequency_bars(trials), style));
    output.push_str("```\n\n");

    output.push_str("## Statistics\n\n");
    output.push_str(&generate_statistics_section(&report.summary));

    output.push_str(&generate_footer());
    output
}

/// Generate a JSON report for any serializable report.
pub fn generate_json_report<T: serde::Serialize>(report: &T) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write rendered output to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;

    Ok(())
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Version:** {}\n", metadata.tool_version));
    if let Some(seed) = metadata.seed {
        section.push_str(&format!("- **Seed:** {}\n", seed));
    }
    section.push('\n');

    section
}

/// Generate the outcome table.
fn generate_table(trials: &TrialReport) -> String {
    let mut table = String::new();

    table.push_str("| Outcome | Count | Relative Frequency |\n");
    table.push_str("|:---|---:|---:|\n");
    for tally in &trials.tallies {
        table.push_str(&format!(
            "| {} | {} | {:.4} |\n",
            tally.outcome, tally.count, tally.frequency
        ));
    }
    table.push('\n');

    table
}

fn generate_statistics_section(summary: &TrialSummary) -> String {
    let mut section = String::new();

    section.push_str(&format!(
        "- **Expected frequency:** {:.4}\n",
        summary.expected_frequency
    ));
    section.push_str(&format!(
        "- **Max deviation:** {:.4}\n",
        summary.max_deviation
    ));
    section.push_str(&format!("- **Chi-square:** {:.3}\n", summary.chi_square));
    if let Some(outcome) = summary.most_frequent {
        section.push_str(&format!("- **Most frequent:** {}\n", outcome));
    }
    section.push('\n');

    section
}

fn summary_line(summary: &TrialSummary) -> String {
    format!(
        "Expected frequency {:.4}, max deviation {:.4}, chi-square {:.3}",
        summary.expected_frequency, summary.max_deviation, summary.chi_square
    )
}

fn count_bars(trials: &TrialReport) -> Vec<Bar> {
    trials
        .tallies
        .iter()
        .map(|t| Bar {
            label: t.outcome.to_string(),
            value: t.count as f64,
            annotation: t.count.to_string(),
        })
        .collect()
}

fn frequency_bars(trials: &TrialReport) -> Vec<Bar> {
    trials
        .tallies
        .iter()
        .map(|t| Bar {
            label: t.outcome.to_string(),
            value: t.frequency,
            annotation: format!("{:.2}%", t.frequency * 100.0),
        })
        .collect()
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Generated by CalcLab*\n".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalError;
    use crate::models::{ExperimentKind, Operation, DICE_LABELS};
    use crate::simulation::tally;

    fn calc_report(calculation: Calculation) -> CalculationReport {
        CalculationReport {
            metadata: ReportMetadata::now(None),
            calculation,
        }
    }

    fn sim_report() -> SimulationReport {
        let outcomes = DICE_LABELS.iter().copied().chain([DICE_LABELS[5]; 4]);
        let trials = tally(ExperimentKind::Dice, outcomes);
        let summary = TrialSummary::from_report(&trials);
        SimulationReport {
            metadata: ReportMetadata::now(Some(42)),
            trials,
            summary,
            requested_trials: None,
        }
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(2.0, None), "2");
        assert_eq!(format_value(1.0 / 3.0, Some(3)), "0.333");
        assert_eq!(format_value(f64::INFINITY, Some(2)), "inf");
    }

    #[test]
    fn test_calculation_line() {
        let ok = Calculation::new(Operation::Power, 2.0, 10.0, Ok(1024.0));
        assert_eq!(calculation_line(&ok, None), "2 ^ 10 = 1024");

        let err = Calculation::new(Operation::Divide, 1.0, 0.0, Err(EvalError::DivisionByZero));
        assert_eq!(
            calculation_line(&err, None),
            "1 ÷ 0: Error: Cannot divide by zero."
        );
    }

    #[test]
    fn test_generate_markdown_calculation() {
        let report = calc_report(Calculation::new(Operation::Log, 100.0, 10.0, Ok(2.0)));
        let markdown = generate_markdown_calculation(&report, Some(2));

        assert!(markdown.contains("# CalcLab Calculation"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("| Logarithm | 100 | 10 | `2.00` |"));
    }

    #[test]
    fn test_generate_text_simulation() {
        let text = generate_text_simulation(&sim_report(), &ChartStyle::default());

        assert!(text.starts_with("Dice roll: 10 trials\n"));
        assert!(text.contains("Counts\n"));
        assert!(text.contains("Relative frequency\n"));
        assert!(text.contains("50.00%"));
        // Face 6 holds the longest bar.
        assert!(text.contains(&format!("6 | {} 5", "#".repeat(40))));
    }

    #[test]
    fn test_labels_in_order() {
        let text = generate_text_simulation(&sim_report(), &ChartStyle::default());
        let positions: Vec<usize> = ["\n1 ", "\n2 ", "\n3 ", "\n4 ", "\n5 ", "\n6 "]
            .iter()
            .map(|label| text.find(label).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_generate_markdown_simulation() {
        let markdown = generate_markdown_simulation(&sim_report(), &ChartStyle::default());

        assert!(markdown.contains("# CalcLab Simulation: Dice roll"));
        assert!(markdown.contains("- **Seed:** 42"));
        assert!(markdown.contains("| 6 | 5 | 0.5000 |"));
        assert!(markdown.contains("- **Most frequent:** 6"));
    }

    #[test]
    fn test_generate_json_report() {
        let json = generate_json_report(&sim_report()).unwrap();

        assert!(json.contains("\"tallies\""));
        assert!(json.contains("\"chi_square\""));
        assert!(!json.contains("requested_trials"));
    }

    #[test]
    fn test_json_calculation_keeps_overflowed_value() {
        let report = calc_report(Calculation::new(
            Operation::Add,
            f64::MAX,
            f64::MAX,
            Ok(f64::INFINITY),
        ));
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains(r#""value": "inf""#));
        assert!(!json.contains("null"));
        assert!(!json.contains("\"error\""));
    }

    #[test]
    fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.md");
        write_report("hello", &path).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "hello");
    }
}
