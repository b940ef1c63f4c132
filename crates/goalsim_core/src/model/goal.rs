//! Savings goals and the investor profile behind a run.

use serde::{Deserialize, Serialize};

use crate::error::GoalError;
use crate::model::ScoreWeights;

/// A savings goal: reach `target_amount` within `years`, starting from
/// `initial_amount` and adding `monthly_contribution` each month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub target_amount: f64,
    pub years: u32,
    pub initial_amount: f64,
    pub monthly_contribution: f64,
}

impl Goal {
    /// Checks the goal against the engine's admissible ranges.
    pub fn validate(&self, max_years: u32) -> Result<(), GoalError> {
        if !self.target_amount.is_finite() || self.target_amount <= 0.0 {
            return Err(GoalError::NonPositiveTarget(self.target_amount));
        }
        if self.years == 0 || self.years > max_years {
            return Err(GoalError::HorizonOutOfRange {
                years: self.years,
                max_years,
            });
        }
        if !self.initial_amount.is_finite() || self.initial_amount < 0.0 {
            return Err(GoalError::NegativeInitialAmount(self.initial_amount));
        }
        if !self.monthly_contribution.is_finite() || self.monthly_contribution < 0.0 {
            return Err(GoalError::NegativeContribution(self.monthly_contribution));
        }
        Ok(())
    }

    /// Horizon in months.
    #[must_use]
    pub fn months(&self) -> u32 {
        self.years * 12
    }

    /// Everything paid in over the horizon, initial amount included.
    #[must_use]
    pub fn total_contribution(&self) -> f64 {
        self.initial_amount + self.monthly_contribution * f64::from(self.months())
    }

    /// Annual growth rate needed to reach the target, as a percentage
    /// rounded to one decimal.
    ///
    /// Contributions alone matching the target need no growth at all and
    /// report 0. Contributions exceeding the target report a negative
    /// rate: the goal is reached even while losing money at that pace.
    #[must_use]
    pub fn required_annual_return(&self) -> f64 {
        let total = self.total_contribution();
        if total <= 0.0 {
            return 0.0;
        }
        if total == self.target_amount {
            return 0.0;
        }
        let cagr = (self.target_amount / total).powf(1.0 / f64::from(self.years)) - 1.0;
        (cagr * 1000.0).round() / 10.0
    }
}

/// Who the run is for.
///
/// The `user_key` is an opaque identifier mixed into every instrument's
/// stream seed, so two investors never share a random sequence even on
/// the same universe. The `risk_score` expresses appetite on a 0..100
/// scale and is compared against realized window volatility by the
/// historical strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestorProfile {
    pub user_key: String,
    pub risk_score: f64,
    pub theme: Option<String>,
    pub weights: ScoreWeights,
}

impl Default for InvestorProfile {
    fn default() -> Self {
        Self {
            user_key: "0".to_string(),
            risk_score: 50.0,
            theme: None,
            weights: ScoreWeights::default(),
        }
    }
}
