//! Market regime classification over recent price history.
//!
//! The simulation shapes its drift and volatility assumptions by comparing
//! the most recent trading window against the one before it. Each regime
//! carries a fixed set of multipliers and guard rails that are applied to
//! the per-instrument return and volatility estimates before a run starts.

use serde::{Deserialize, Serialize};

use crate::stats;

/// Number of trading sessions in one classification window.
pub const REGIME_WINDOW: usize = 60;

/// Hard ceiling on the base annual return after regime adjustment.
pub const MAX_ANNUAL_RETURN: f64 = 0.25;

/// Broad market state inferred from the trailing price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketRegime {
    Bull,
    Bear,
    Volatile,
    #[default]
    Neutral,
}

impl MarketRegime {
    /// Classifies the regime from a daily close series (oldest first).
    ///
    /// The last [`REGIME_WINDOW`] closes are compared against the window
    /// immediately before them. Series shorter than one full window are
    /// always neutral; a short comparison window degrades gracefully
    /// because its return and volatility both evaluate to zero.
    #[must_use]
    pub fn classify(prices: &[f64]) -> Self {
        if prices.len() < REGIME_WINDOW {
            return Self::Neutral;
        }
        let split = prices.len() - REGIME_WINDOW;
        let older_start = prices.len().saturating_sub(2 * REGIME_WINDOW);
        let recent = &prices[split..];
        let older = &prices[older_start..split];

        let recent_return = period_return(recent);
        let recent_vol = period_volatility(recent);
        let older_vol = period_volatility(older);

        if recent_return > 0.1 && recent_vol < older_vol * 0.8 {
            Self::Bull
        } else if recent_return < -0.1 && recent_vol > older_vol * 1.2 {
            Self::Bear
        } else if recent_vol > older_vol * 1.5 {
            Self::Volatile
        } else {
            Self::Neutral
        }
    }

    /// Multiplier applied to the personal-score base return.
    #[must_use]
    pub fn return_multiplier(self) -> f64 {
        match self {
            Self::Bull => 1.2,
            Self::Bear => 0.8,
            Self::Volatile => 0.9,
            Self::Neutral => 1.0,
        }
    }

    /// Multiplier applied to historical volatility.
    #[must_use]
    pub fn volatility_multiplier(self) -> f64 {
        match self {
            Self::Bull => 0.8,
            Self::Bear => 1.3,
            Self::Volatile => 1.5,
            Self::Neutral => 1.0,
        }
    }

    /// Lowest admissible base annual return under this regime.
    #[must_use]
    pub fn min_annual_return(self) -> f64 {
        match self {
            Self::Bull => 0.05,
            Self::Bear => -0.02,
            Self::Volatile => 0.02,
            Self::Neutral => 0.03,
        }
    }

    /// Admissible annual volatility band under this regime.
    #[must_use]
    pub fn volatility_range(self) -> (f64, f64) {
        match self {
            Self::Bull => (0.05, 0.4),
            Self::Bear => (0.1, 0.8),
            Self::Volatile => (0.15, 0.8),
            Self::Neutral => (0.05, 0.6),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bull => "bull",
            Self::Bear => "bear",
            Self::Volatile => "volatile",
            Self::Neutral => "neutral",
        }
    }
}

/// Base annual return derived from the investor's personal score.
///
/// A score of 0 maps to 2% and a score of 100 to 12%, scaled by the
/// regime's return multiplier.
#[must_use]
pub fn personal_return(personal_score: f64, regime: MarketRegime) -> f64 {
    let base = 0.02 + (personal_score / 100.0) * 0.1;
    base * regime.return_multiplier()
}

/// Regime- and score-adjusted annual volatility, clamped to `[0.05, 0.8]`.
///
/// Scores above 50 widen the band, scores below 50 tighten it, by up to
/// a quarter of the regime-adjusted value in either direction.
#[must_use]
pub fn enhanced_volatility(
    historical_volatility: f64,
    regime: MarketRegime,
    personal_score: f64,
) -> f64 {
    let adjusted = historical_volatility * regime.volatility_multiplier();
    let risk_adjustment = 1.0 + ((personal_score - 50.0) / 100.0) * 0.5;
    (adjusted * risk_adjustment).clamp(0.05, 0.8)
}

/// Clamps a base annual return into the regime's admissible band.
#[must_use]
pub fn clamp_annual_return(base: f64, regime: MarketRegime) -> f64 {
    base.clamp(regime.min_annual_return(), MAX_ANNUAL_RETURN)
}

/// Clamps an annual volatility into the regime's admissible band.
#[must_use]
pub fn clamp_volatility(volatility: f64, regime: MarketRegime) -> f64 {
    let (min, max) = regime.volatility_range();
    volatility.clamp(min, max)
}

/// Simple return over a window, zero when the window is degenerate.
fn period_return(prices: &[f64]) -> f64 {
    if prices.len() < 2 {
        return 0.0;
    }
    let first = prices[0];
    let last = prices[prices.len() - 1];
    if first <= 0.0 {
        return 0.0;
    }
    (last - first) / first
}

/// Annualized volatility of daily log returns over a window.
fn period_volatility(prices: &[f64]) -> f64 {
    if prices.len() < 2 {
        return 0.0;
    }
    stats::std_dev(&stats::log_returns(prices)) * (252.0f64).sqrt()
}
