//! Price-history quality scoring and historical estimates.
//!
//! Instruments arrive with uneven histories: short listings, gaps where a
//! close is missing or zero, and the occasional burst of extreme moves.
//! The quality score folds those defects into a single `[0, 1]` figure
//! that later decides how much weight the historical estimates get over
//! the score-derived ones.

use crate::stats;

/// Annual return assumed when a series is too short to estimate one.
pub const FALLBACK_RETURN: f64 = 0.07;

/// Annual volatility assumed when a series is too short to estimate one.
pub const FALLBACK_VOLATILITY: f64 = 0.15;

/// Composite quality score of a daily close series (oldest first).
///
/// Blends three components: completeness (share of a full trading year
/// present), continuity (share of closes not adjacent to a non-positive
/// price), and stability (penalty once annual volatility exceeds 50%).
/// Series under 30 closes score a flat 0.3.
#[must_use]
pub fn data_quality(prices: &[f64]) -> f64 {
    if prices.len() < 30 {
        return 0.3;
    }
    let len = prices.len() as f64;
    let completeness = (len / 252.0).min(1.0);

    let gaps = prices
        .windows(2)
        .filter(|pair| pair[0] <= 0.0 || pair[1] <= 0.0)
        .count() as f64;
    let continuity = (1.0 - gaps / len).max(0.1);

    let volatility = historical_volatility(prices);
    let stability = if volatility < 0.5 {
        1.0
    } else {
        (1.0 - (volatility - 0.5)).max(0.3)
    };

    completeness * 0.4 + continuity * 0.4 + stability * 0.2
}

/// Weight given to historical estimates when blending with score-based
/// ones, clamped to `[0.3, 0.8]` so neither side ever dominates fully.
#[must_use]
pub fn historical_weight(quality: f64) -> f64 {
    quality.clamp(0.3, 0.8)
}

/// Annualized return of a close series as a geometric growth rate.
///
/// Treats the series length as `len / 252` years and clamps the result
/// to `[-0.5, 0.5]`. Degenerate series fall back to [`FALLBACK_RETURN`].
#[must_use]
pub fn historical_return(prices: &[f64]) -> f64 {
    if prices.len() < 2 {
        return FALLBACK_RETURN;
    }
    let first = prices[0];
    let last = prices[prices.len() - 1];
    if first <= 0.0 || last <= 0.0 {
        return FALLBACK_RETURN;
    }
    let years = prices.len() as f64 / 252.0;
    let total_return = (last - first) / first;
    let annual = (1.0 + total_return).powf(1.0 / years) - 1.0;
    annual.clamp(-0.5, 0.5)
}

/// Annualized volatility of daily log returns, clamped to `[0.05, 0.5]`.
///
/// Series under two closes fall back to [`FALLBACK_VOLATILITY`].
#[must_use]
pub fn historical_volatility(prices: &[f64]) -> f64 {
    if prices.len() < 2 {
        return FALLBACK_VOLATILITY;
    }
    let volatility = stats::std_dev(&stats::log_returns(prices)) * (252.0f64).sqrt();
    volatility.clamp(0.05, 0.5)
}
