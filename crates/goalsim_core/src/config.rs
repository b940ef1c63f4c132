//! Engine configuration.
//!
//! One [`EngineSettings`] value is built by the caller and passed into the
//! run entry point; nothing here is read from the environment or mutated
//! after construction. Algorithmic constants that are not operational
//! knobs (quality thresholds, regime tables) live with their modules.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::garch::GarchParams;

/// When the monthly deposit lands relative to return compounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContributionTiming {
    /// Deposit first, then apply the period return.
    Start,
    /// Apply the period return, then deposit.
    #[default]
    End,
}

/// Distribution the per-period shocks are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShockDistribution {
    #[default]
    Normal,
    /// Student-t shocks for heavier tails; 5 degrees of freedom is the
    /// conventional choice for monthly equity returns.
    StudentT { df: u32 },
}

/// Operational knobs for one recommendation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Monte Carlo trials per instrument.
    pub trials: usize,
    /// Annual risk-free rate used by Sharpe ratios.
    pub risk_free_rate: f64,
    /// Single-period move at which the tanh soft cap saturates.
    pub soft_cap_move: f64,
    pub shock: ShockDistribution,
    pub contribution_timing: ContributionTiming,
    /// GARCH parameters assumed when an instrument's history is too
    /// short to estimate its own.
    pub garch_fallback: GarchParams,
    /// Largest accepted goal horizon in years.
    pub max_years: u32,
    /// Cap on sliding windows per instrument in the historical strategy.
    pub window_limit: usize,
    /// Largest number of candidates simulated in one run.
    pub universe_cap: usize,
    /// Length of the returned recommendation list.
    pub top_results: usize,
    /// Confidence level shared by the Wilson interval and VaR/CVaR.
    pub confidence_level: f64,
    /// Randomly chosen paths retained for charting beyond best/worst.
    pub retained_samples: usize,
    /// Chart series longer than this are decimated down to about this
    /// many points.
    pub chart_max_points: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            trials: 2000,
            risk_free_rate: 0.02,
            soft_cap_move: 0.15,
            shock: ShockDistribution::default(),
            contribution_timing: ContributionTiming::default(),
            garch_fallback: GarchParams::DEFAULT,
            max_years: 5,
            window_limit: 40,
            universe_cap: 50,
            top_results: 10,
            confidence_level: 0.95,
            retained_samples: 3,
            chart_max_points: 121,
        }
    }
}

impl EngineSettings {
    /// Rejects settings no run could execute sensibly.
    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(EngineError::Settings("trials must be positive".into()));
        }
        if !self.risk_free_rate.is_finite() || !(0.0..1.0).contains(&self.risk_free_rate) {
            return Err(EngineError::Settings(
                "risk_free_rate must lie in [0, 1)".into(),
            ));
        }
        if !self.soft_cap_move.is_finite() || !(0.0..=1.0).contains(&self.soft_cap_move)
            || self.soft_cap_move == 0.0
        {
            return Err(EngineError::Settings(
                "soft_cap_move must lie in (0, 1]".into(),
            ));
        }
        if let ShockDistribution::StudentT { df: 0 } = self.shock {
            return Err(EngineError::Settings(
                "student-t shocks need at least one degree of freedom".into(),
            ));
        }
        if !self.garch_fallback.is_stable() {
            return Err(EngineError::Settings(
                "garch_fallback violates alpha + beta < 1".into(),
            ));
        }
        if self.max_years == 0 {
            return Err(EngineError::Settings("max_years must be positive".into()));
        }
        if self.window_limit == 0 {
            return Err(EngineError::Settings("window_limit must be positive".into()));
        }
        if self.universe_cap == 0 {
            return Err(EngineError::Settings("universe_cap must be positive".into()));
        }
        if self.top_results == 0 {
            return Err(EngineError::Settings("top_results must be positive".into()));
        }
        if !(0.0..1.0).contains(&self.confidence_level) || self.confidence_level == 0.0 {
            return Err(EngineError::Settings(
                "confidence_level must lie in (0, 1)".into(),
            ));
        }
        if self.chart_max_points < 2 {
            return Err(EngineError::Settings(
                "chart_max_points must keep at least the endpoints".into(),
            ));
        }
        Ok(())
    }

    /// Soft-cap steepness `k` such that `tanh(k x) / k` saturates near
    /// the configured single-period move.
    #[must_use]
    pub fn soft_cap_k(&self) -> f64 {
        1.0 / self.soft_cap_move
    }
}
