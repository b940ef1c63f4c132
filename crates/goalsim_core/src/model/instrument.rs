//! Instruments and the candidate universe.
//!
//! An instrument is an ETF with its daily close history plus whatever
//! per-instrument data the catalog already holds: sub-scores used for
//! personalization and risk metrics computed offline by a separate
//! pipeline. Both are optional in the sense that missing values fall
//! back to neutral defaults rather than failing the run.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// One daily observation in an instrument's price history.
///
/// Assets under management ride along from the catalog when known; the
/// simulation itself reads only dates and closes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: Date,
    pub close: f64,
    #[serde(default)]
    pub aum: Option<f64>,
}

/// Per-instrument sub-scores on a 0..100 scale, each defaulting to a
/// neutral 50 when the catalog has no rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreCard {
    pub stability: f64,
    pub liquidity: f64,
    pub growth: f64,
    pub diversification: f64,
}

impl Default for ScoreCard {
    fn default() -> Self {
        Self {
            stability: 50.0,
            liquidity: 50.0,
            growth: 50.0,
            diversification: 50.0,
        }
    }
}

impl ScoreCard {
    /// Personal score as the weighted sum of the four sub-scores.
    #[must_use]
    pub fn weighted(&self, weights: &ScoreWeights) -> f64 {
        self.stability * weights.stability
            + self.liquidity * weights.liquidity
            + self.growth * weights.growth
            + self.diversification * weights.diversification
    }
}

/// Investor-specific weights over the [`ScoreCard`] sub-scores.
///
/// Defaults to an even 0.25 split; the weights are expected to sum to 1
/// but nothing enforces it, a skewed profile simply skews the score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub stability: f64,
    pub liquidity: f64,
    pub growth: f64,
    pub diversification: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            stability: 0.25,
            liquidity: 0.25,
            growth: 0.25,
            diversification: 0.25,
        }
    }
}

/// Risk metrics computed offline and stored alongside the instrument.
///
/// When present and positive these take precedence over the estimates
/// derived from the price history during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredMetrics {
    pub volatility: Option<f64>,
    pub max_drawdown: Option<f64>,
    pub sharpe_ratio: Option<f64>,
}

impl StoredMetrics {
    #[must_use]
    pub fn usable_volatility(&self) -> Option<f64> {
        self.volatility.filter(|v| *v > 0.0)
    }

    #[must_use]
    pub fn usable_max_drawdown(&self) -> Option<f64> {
        self.max_drawdown.filter(|d| *d > 0.0)
    }

    #[must_use]
    pub fn usable_sharpe(&self) -> Option<f64> {
        self.sharpe_ratio.filter(|s| s.is_finite())
    }
}

/// One ETF candidate with its history and catalog data.
///
/// `asset_class` is the catalog's free-form label, reported back as
/// identity metadata; the GARCH defaults work from a volatility-inferred
/// bucket instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instrument {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub asset_class: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    pub prices: Vec<PricePoint>,
    #[serde(default)]
    pub scores: ScoreCard,
    #[serde(default)]
    pub stored: StoredMetrics,
}

impl Instrument {
    /// Daily closes in history order.
    #[must_use]
    pub fn closes(&self) -> Vec<f64> {
        self.prices.iter().map(|p| p.close).collect()
    }

    /// Month-end closes, taking the last observation of each calendar
    /// month. Assumes `prices` is sorted oldest first.
    #[must_use]
    pub fn monthly_closes(&self) -> Vec<f64> {
        let mut closes = Vec::new();
        let mut iter = self.prices.iter().peekable();
        while let Some(point) = iter.next() {
            let month_ends = match iter.peek() {
                Some(next) => {
                    (next.date.year(), next.date.month()) != (point.date.year(), point.date.month())
                }
                None => true,
            };
            if month_ends {
                closes.push(point.close);
            }
        }
        closes
    }
}

/// The full candidate set a run selects from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Universe {
    pub instruments: Vec<Instrument>,
}

impl Universe {
    #[must_use]
    pub fn new(instruments: Vec<Instrument>) -> Self {
        Self { instruments }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Candidates matching a theme preference, or all of them when no
    /// preference is given.
    pub fn matching_theme<'a>(
        &'a self,
        theme: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Instrument> {
        self.instruments
            .iter()
            .filter(move |i| match theme {
                Some(wanted) => i.theme.as_deref() == Some(wanted),
                None => true,
            })
    }
}
