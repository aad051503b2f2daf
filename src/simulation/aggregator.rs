//! Trial generation and outcome aggregation.
//!
//! This module draws outcomes for an experiment and tallies counts and
//! relative frequencies per label.

use crate::models::{ExperimentKind, LabelTally, Outcome, TrialReport};
use rand::Rng;
use tracing::debug;

/// Largest trial count the UI boundary lets through.
pub const MAX_TRIALS: usize = 100_000;

/// Clamps a requested trial count into `[1, max]`.
///
/// `max` itself is capped at [`MAX_TRIALS`].
pub fn clamp_trials(requested: usize, max: usize) -> usize {
    requested.clamp(1, max.clamp(1, MAX_TRIALS))
}

/// Runs `n` trials using the thread-local random generator.
pub fn run_trials(kind: ExperimentKind, n: usize) -> TrialReport {
    run_trials_with(kind, n, &mut rand::rng())
}

/// Runs `n` trials drawing from the given random source.
///
/// Each trial picks one of the experiment's labels uniformly. The returned
/// report lists every label in order, including those never drawn.
///
/// # Examples
/// ```
/// use calclab::models::ExperimentKind;
/// use calclab::simulation::{create_rng, run_trials_with};
/// let mut rng = create_rng(42);
/// let report = run_trials_with(ExperimentKind::Dice, 600, &mut rng);
/// assert_eq!(report.tallies.len(), 6);
/// assert_eq!(report.count_sum(), 600);
/// ```
pub fn run_trials_with<R: Rng>(kind: ExperimentKind, n: usize, rng: &mut R) -> TrialReport {
    debug!("Running {} trials: {}", n, kind);

    let labels = kind.labels();
    let draws = (0..n).map(|_| labels[rng.random_range(0..labels.len())]);
    tally(kind, draws)
}

/// Tallies a sequence of outcomes into a report for `kind`.
///
/// Outcomes that are not labels of `kind` are ignored and do not count
/// towards the total.
pub fn tally<I>(kind: ExperimentKind, outcomes: I) -> TrialReport
where
    I: IntoIterator<Item = Outcome>,
{
    let labels = kind.labels();
    let mut counts = vec![0usize; labels.len()];

    for outcome in outcomes {
        if let Some(i) = labels.iter().position(|l| *l == outcome) {
            counts[i] += 1;
        }
    }

    let total: usize = counts.iter().sum();
    let tallies = labels
        .iter()
        .zip(counts)
        .map(|(&outcome, count)| LabelTally {
            outcome,
            count,
            frequency: relative_frequency(count, total),
        })
        .collect();

    TrialReport {
        kind,
        total,
        tallies,
    }
}

fn relative_frequency(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}
