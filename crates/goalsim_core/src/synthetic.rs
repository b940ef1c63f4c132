//! Deterministic synthetic price histories.
//!
//! Used by the benchmark harness, the demo dataset generator and tests
//! that need a universe without shipping real market data. Every series
//! is a pure function of its seed, so fixtures are reproducible across
//! runs and machines.

use jiff::civil::{Date, Weekday, date};
use rand_distr::{Distribution, Normal, StudentT};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::model::{Instrument, PricePoint, ScoreCard, StoredMetrics, Universe};
use crate::random::{Mulberry32, pair_seed};

/// Trading days assumed per calendar year of generated history.
pub const TRADING_DAYS: usize = 252;

/// How daily returns are produced for a synthetic series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ReturnModel {
    /// Constant drift plus uniform noise centered on zero.
    Drift { daily_return: f64, daily_noise: f64 },
    /// Normally distributed daily returns.
    Gaussian { daily_mean: f64, daily_std: f64 },
    /// Student-t daily returns for heavier tails.
    FatTailed { daily_mean: f64, daily_std: f64, df: f64 },
}

impl ReturnModel {
    /// Gaussian model from annual figures.
    #[must_use]
    pub fn gaussian_annual(annual_return: f64, annual_volatility: f64) -> Self {
        Self::Gaussian {
            daily_mean: annual_return / TRADING_DAYS as f64,
            daily_std: annual_volatility / (TRADING_DAYS as f64).sqrt(),
        }
    }

    /// Student-t model from annual figures.
    #[must_use]
    pub fn fat_tailed_annual(annual_return: f64, annual_volatility: f64, df: f64) -> Self {
        Self::FatTailed {
            daily_mean: annual_return / TRADING_DAYS as f64,
            daily_std: annual_volatility / (TRADING_DAYS as f64).sqrt(),
            df,
        }
    }

    fn sampler(self) -> Result<Sampler> {
        match self {
            Self::Drift {
                daily_return,
                daily_noise,
            } => Ok(Sampler::Drift {
                daily_return,
                daily_noise,
            }),
            Self::Gaussian {
                daily_mean,
                daily_std,
            } => {
                let normal = Normal::new(daily_mean, daily_std).map_err(|_| {
                    EngineError::InvalidDistributionParameters {
                        distribution: "normal",
                        mean: daily_mean,
                        std_dev: daily_std,
                        reason: "standard deviation must be finite and non-negative",
                    }
                })?;
                Ok(Sampler::Gaussian(normal))
            }
            Self::FatTailed {
                daily_mean,
                daily_std,
                df,
            } => {
                let t = StudentT::new(df).map_err(|_| {
                    EngineError::InvalidDistributionParameters {
                        distribution: "student_t",
                        mean: daily_mean,
                        std_dev: daily_std,
                        reason: "degrees of freedom must be positive and finite",
                    }
                })?;
                Ok(Sampler::FatTailed {
                    t,
                    mean: daily_mean,
                    std: daily_std,
                })
            }
        }
    }
}

enum Sampler {
    Drift { daily_return: f64, daily_noise: f64 },
    Gaussian(Normal<f64>),
    FatTailed { t: StudentT<f64>, mean: f64, std: f64 },
}

impl Sampler {
    fn draw(&self, rng: &mut Mulberry32) -> f64 {
        match self {
            Self::Drift {
                daily_return,
                daily_noise,
            } => daily_return + (rng.next_f64() - 0.5) * daily_noise,
            Self::Gaussian(normal) => normal.sample(rng),
            Self::FatTailed { t, mean, std } => mean + t.sample(rng) * std,
        }
    }
}

/// Generates `years` of daily closes starting at 100, floored at 0.1.
///
/// Dates walk forward from a fixed epoch skipping weekends, so derived
/// monthly closes are stable across runs too.
pub fn price_series(seed: u32, years: u32, model: ReturnModel) -> Result<Vec<PricePoint>> {
    let days = years as usize * TRADING_DAYS;
    let sampler = model.sampler()?;
    let mut rng = Mulberry32::new(seed);

    let mut day = date(2019, 1, 2);
    let mut close = 100.0;
    let mut prices = Vec::with_capacity(days);
    prices.push(PricePoint { date: day, close, aum: None });

    for _ in 1..days {
        day = next_trading_day(day);
        let daily_return = sampler.draw(&mut rng);
        close = (close * (1.0 + daily_return)).max(0.1);
        prices.push(PricePoint { date: day, close, aum: None });
    }
    Ok(prices)
}

/// A universe of drift-model instruments for benchmarks and demos.
///
/// Each instrument gets its own stream seeded from its id, so the series
/// differ while remaining reproducible.
pub fn benchmark_universe(instruments: usize, years: u32) -> Result<Universe> {
    let model = ReturnModel::Drift {
        daily_return: 0.0003,
        daily_noise: 0.015,
    };
    let mut out = Vec::with_capacity(instruments);
    for i in 0..instruments {
        let id = format!("BENCH{i:03}");
        let seed = pair_seed(&id, "999");
        out.push(Instrument {
            name: format!("Benchmark ETF {i}"),
            asset_class: Some("equity".to_string()),
            theme: Some("benchmark".to_string()),
            prices: price_series(seed, years, model)?,
            scores: ScoreCard::default(),
            stored: StoredMetrics::default(),
            id,
        });
    }
    Ok(Universe::new(out))
}

fn next_trading_day(mut day: Date) -> Date {
    loop {
        day = day.saturating_add(jiff::Span::new().days(1));
        match day.weekday() {
            Weekday::Saturday | Weekday::Sunday => (),
            _ => return day,
        }
    }
}
