//! GARCH(1,1) conditional volatility: per-instrument parameter estimation
//! and the recursive update that drives simulated path generation.

use serde::{Deserialize, Serialize};

use crate::stats;

/// Lower bound on conditional volatility, so a degenerate series can never
/// collapse the recursion to zero (and divide-by-zero downstream).
pub const SIGMA_FLOOR: f64 = 1e-6;

/// Coarse asset-class buckets used for GARCH parameter defaults. Inferred
/// from realized volatility; declared classification strings on instruments
/// are display metadata and too free-form to drive the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Equity,
    Bond,
    Commodity,
    Mixed,
}

impl AssetClass {
    /// Classify by annualized volatility: quiet series trade like bonds,
    /// wild ones like commodities.
    #[must_use]
    pub fn from_annualized_volatility(volatility: f64) -> Self {
        if volatility < 0.1 {
            AssetClass::Bond
        } else if volatility > 0.3 {
            AssetClass::Commodity
        } else if volatility > 0.2 {
            AssetClass::Equity
        } else {
            AssetClass::Mixed
        }
    }
}

/// GARCH(1,1) parameter set. Stability requires `alpha + beta < 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GarchParams {
    /// Weight of the most recent squared shock.
    pub alpha: f64,
    /// Persistence of the previous period's variance.
    pub beta: f64,
    /// Long-run variance floor.
    pub omega: f64,
}

impl GarchParams {
    pub const DEFAULT: GarchParams = GarchParams { alpha: 0.12, beta: 0.86, omega: 1e-6 };

    /// Per-asset-class starting points for estimation. Bonds cluster less
    /// and persist more; commodities are the other way around.
    #[must_use]
    pub fn base_for(class: AssetClass) -> Self {
        match class {
            AssetClass::Equity => GarchParams { alpha: 0.12, beta: 0.86, omega: 1e-6 },
            AssetClass::Bond => GarchParams { alpha: 0.08, beta: 0.90, omega: 1e-7 },
            AssetClass::Commodity => GarchParams { alpha: 0.18, beta: 0.80, omega: 1e-5 },
            AssetClass::Mixed => GarchParams { alpha: 0.12, beta: 0.86, omega: 1e-6 },
        }
    }

    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.alpha + self.beta < 1.0
    }

    /// Restore stability by proportionally shrinking `alpha` and `beta` to
    /// sum to 0.99. A stable set passes through unchanged.
    #[must_use]
    pub fn stabilized(self) -> Self {
        let persistence = self.alpha + self.beta;
        if persistence < 1.0 {
            return self;
        }
        let adjustment = 0.99 / persistence;
        GarchParams {
            alpha: self.alpha * adjustment,
            beta: self.beta * adjustment,
            omega: self.omega,
        }
    }
}

impl Default for GarchParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Estimate GARCH(1,1) parameters from a daily price history.
///
/// This is a heuristic, not a maximum-likelihood fit: volatility-of-
/// volatility proxies clustering strength and scales an asset-class base
/// parameter set. Short histories (<60 prices or <30 usable returns) fall
/// back to the default set outright. The returned set is always stable.
#[must_use]
pub fn estimate(prices: &[f64]) -> GarchParams {
    estimate_or(prices, GarchParams::DEFAULT)
}

/// Same as [`estimate`] with a caller-provided short-history fallback.
#[must_use]
pub fn estimate_or(prices: &[f64], fallback: GarchParams) -> GarchParams {
    if prices.len() < 60 {
        return fallback;
    }

    let returns = stats::log_returns(prices);
    if returns.len() < 30 {
        return fallback;
    }

    let annualized_vol = stats::std_dev(&returns) * (252.0f64).sqrt();
    let class = AssetClass::from_annualized_volatility(annualized_vol);
    let base = GarchParams::base_for(class);

    let clustering = (vol_of_vol(&returns) / 0.1).clamp(0.1, 1.0);
    let candidate = GarchParams {
        alpha: (base.alpha * clustering).clamp(0.05, 0.3),
        beta: (base.beta * (1.0 + clustering * 0.1)).clamp(0.7, 0.95),
        omega: base.omega * (1.0 + clustering),
    };

    candidate.stabilized()
}

/// Volatility of rolling 20-period realized volatility; 0.1 when the series
/// is too short to form at least two windows.
fn vol_of_vol(returns: &[f64]) -> f64 {
    const WINDOW: usize = 20;

    if returns.len() < WINDOW {
        return 0.1;
    }

    let volatilities: Vec<f64> = (WINDOW..returns.len())
        .map(|i| stats::std_dev(&returns[i - WINDOW..i]))
        .collect();
    if volatilities.len() < 2 {
        return 0.1;
    }

    stats::std_dev(&volatilities)
}

/// Running GARCH recursion for one simulated path.
#[derive(Debug, Clone)]
pub struct GarchState {
    params: GarchParams,
    sigma: f64,
}

impl GarchState {
    #[must_use]
    pub fn new(params: GarchParams, initial_sigma: f64) -> Self {
        Self { params, sigma: initial_sigma.max(SIGMA_FLOOR) }
    }

    #[must_use]
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Advance one period: scale the draw by current volatility, damp the
    /// shock through `tanh(shock * soft_cap) / soft_cap`, then update
    /// conditional variance from the damped shock.
    ///
    /// Damping bounds a single step to `1 / soft_cap` while leaving
    /// ordinary moves nearly untouched. Returns the damped shock to be
    /// added to the base period return.
    pub fn step(&mut self, normal_draw: f64, soft_cap: f64) -> f64 {
        let shock = normal_draw * self.sigma;
        let damped = (shock * soft_cap).tanh() / soft_cap;

        let variance = self.params.omega
            + self.params.alpha * damped * damped
            + self.params.beta * self.sigma * self.sigma;
        self.sigma = variance.sqrt().max(SIGMA_FLOOR);

        damped
    }
}
