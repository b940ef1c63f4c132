//! Simulation strategies.
//!
//! Both strategies estimate how often an instrument carries the goal
//! to its target, from different evidence: the historical engine
//! replays realized windows of the instrument's own past, while the
//! Monte Carlo engine synthesizes forward paths around calibrated
//! return and volatility assumptions. They share the RNG,
//! statistics and GARCH components rather than re-deriving them, and
//! both produce the same raw per-instrument outcome for the ranker.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use crate::config::ContributionTiming;
use crate::model::{ChartData, StrategyDetail};

pub(crate) mod historical;
pub(crate) mod monte_carlo;

/// Which simulation strategy a run uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationStrategy {
    #[default]
    MonteCarlo,
    HistoricalWindow,
}

impl SimulationStrategy {
    #[must_use]
    pub fn method_name(self) -> &'static str {
        match self {
            Self::MonteCarlo => "monte_carlo",
            Self::HistoricalWindow => "historical_window",
        }
    }
}

/// Progress tracking for a recommendation run.
///
/// Cloned handles share the same counters, so a caller can hold one
/// clone for display or cancellation while the run owns another. The
/// run checks the cancel flag between instrument units.
#[derive(Debug, Clone)]
pub struct RunProgress {
    /// Completed instrument units
    completed: Arc<AtomicUsize>,
    /// Total instrument units
    total: Arc<AtomicUsize>,
    /// Cancellation flag
    cancelled: Arc<AtomicBool>,
}

impl RunProgress {
    /// Create a new progress tracker
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            completed: Arc::new(AtomicUsize::new(0)),
            total: Arc::new(AtomicUsize::new(total)),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create from existing atomics (for host integration)
    pub fn from_atomics(
        completed: Arc<AtomicUsize>,
        total: Arc<AtomicUsize>,
        cancelled: Arc<AtomicBool>,
    ) -> Self {
        Self {
            completed,
            total,
            cancelled,
        }
    }

    /// Get the number of completed instrument units
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    /// Get the total number of instrument units
    #[must_use]
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    /// Increment the completed counter
    pub fn increment(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Reset the progress
    pub fn reset(&self, total: usize) {
        self.completed.store(0, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
    }

    /// Cancel the run
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Check if cancelled
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

impl Default for RunProgress {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Raw per-instrument outcome before ranking.
///
/// Ratios are unrounded fractions here; the ranker normalizes Sharpe
/// figures across the whole run and rounds everything at assembly.
#[derive(Debug, Clone)]
pub(crate) struct SimulatedInstrument {
    pub instrument_id: String,
    pub name: String,
    pub asset_class: Option<String>,
    pub theme: Option<String>,
    /// Percent of trials (or windows) reaching the target.
    pub success_rate: f64,
    pub successes: usize,
    pub trials: usize,
    pub expected_value: f64,
    /// Annualized volatility as a fraction.
    pub volatility: f64,
    pub sharpe: f64,
    pub personal_score: f64,
    pub detail: StrategyDetail,
    pub chart: Option<ChartData>,
}

/// One DCA accounting period: deposit and compound in the configured
/// order.
pub(crate) fn apply_period(
    value: f64,
    contribution: f64,
    timing: ContributionTiming,
    period_return: f64,
) -> f64 {
    match timing {
        ContributionTiming::Start => (value + contribution) * (1.0 + period_return),
        ContributionTiming::End => value * (1.0 + period_return) + contribution,
    }
}
