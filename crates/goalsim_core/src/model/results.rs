//! Results returned to the caller.
//!
//! Everything here is plain serializable data. Percent-scale fields are
//! reported on a 0..100 scale and rounded at assembly time; currency
//! fields are rounded to whole units. Raw, unrounded figures never leave
//! the engine.

use serde::{Deserialize, Serialize};

use crate::garch::{AssetClass, GarchParams};
use crate::regime::MarketRegime;
use crate::stats::ConfidenceInterval;

/// How trustworthy a historical hit-rate is, judged by how many windows
/// backed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reliability {
    High,
    Medium,
    Low,
}

impl Reliability {
    #[must_use]
    pub fn from_windows(windows: usize) -> Self {
        if windows >= 36 {
            Self::High
        } else if windows >= 12 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Strategy-specific portion of an instrument's result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum StrategyDetail {
    MonteCarlo {
        trials: usize,
        market_regime: MarketRegime,
        asset_class: AssetClass,
        garch: GarchParams,
        /// Quality of the price history backing the estimates, 0..1.
        data_quality: f64,
        /// 95% value-at-risk as a loss against total contributed capital.
        var_95: f64,
        /// Mean loss beyond [`Self::MonteCarlo::var_95`], same framing.
        cvar_95: f64,
        /// Percent decline from peak, averaged over trials unless a
        /// stored figure took precedence.
        max_drawdown: f64,
        /// Sharpe-derived score scaled by the success rate.
        risk_adjusted_return: f64,
    },
    HistoricalWindow {
        /// Sliding windows actually evaluated.
        windows: usize,
        /// Window length in months.
        window_months: usize,
        /// How closely realized window volatility matched the investor's
        /// risk appetite, 0..100.
        risk_match: f64,
        /// Percent decline from peak over the full monthly close history.
        max_drawdown: f64,
        reliability: Reliability,
    },
}

/// Which role a retained path plays in the chart payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathKind {
    Best,
    Worst,
    Sample,
}

/// One retained simulation path, month 0 through the horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSample {
    pub kind: PathKind,
    pub values: Vec<f64>,
}

/// Percentile curves across all trial paths, one value per time step.
///
/// At every index the bands are ordered `p05 <= p25 <= p50 <= p75 <= p95`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FanBands {
    pub p05: Vec<f64>,
    pub p25: Vec<f64>,
    pub p50: Vec<f64>,
    pub p75: Vec<f64>,
    pub p95: Vec<f64>,
}

/// Chart-ready aggregation of an instrument's trial paths.
///
/// All series share one index axis: either every month of the horizon or
/// a uniformly decimated subset of those months when the horizon is long.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub bands: FanBands,
    pub paths: Vec<PathSample>,
    /// Cumulative deposits with no market return, for reference.
    pub principal: Vec<f64>,
}

/// Everything reported for one instrument.
///
/// `success_rate`, `goal_score`, `personal_score` and `risk_score` are on
/// a 0..100 scale; `volatility` is an annualized percentage;
/// `expected_value` is in currency units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentResult {
    pub instrument_id: String,
    pub name: String,
    pub asset_class: Option<String>,
    pub theme: Option<String>,
    pub success_rate: f64,
    pub expected_value: f64,
    pub volatility: f64,
    pub sharpe_ratio: f64,
    pub personal_score: f64,
    pub risk_score: f64,
    pub goal_score: f64,
    /// Wilson interval on the success rate, percent bounds.
    pub confidence: ConfidenceInterval,
    pub detail: StrategyDetail,
    pub chart: Option<ChartData>,
}

/// Run-level metadata alongside the ranked list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMeta {
    /// Strategy label, `monte_carlo` or `historical_window`.
    pub method: String,
    /// Trials per instrument (Monte Carlo) or window cap (historical).
    pub simulations: usize,
    /// Time steps per simulated path: months of the goal horizon.
    pub steps: u32,
    pub target_amount: f64,
    pub target_years: u32,
    /// Annual return needed to reach the target by contributions alone,
    /// percent, one decimal.
    pub required_annual_return: f64,
    pub confidence_level: f64,
    pub instruments_analyzed: usize,
    pub instruments_skipped: usize,
    /// Wall-clock seconds the run took, one decimal.
    pub calculation_time_secs: f64,
}

/// Ranked recommendations plus run metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub recommendations: Vec<InstrumentResult>,
    pub meta: RunMeta,
}
