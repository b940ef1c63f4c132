//! Pure statistics over numeric slices.
//!
//! Every function is total: degenerate inputs (empty slices, zero variance,
//! zero denominators) produce a defined default instead of NaN or a panic,
//! so downstream risk metrics never have to re-check.

use serde::{Deserialize, Serialize};

/// Arithmetic mean; 0 for an empty slice.
#[must_use]
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Population standard deviation (divide by N); 0 below two samples.
#[must_use]
pub fn std_dev(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    let avg = mean(xs);
    let variance = xs.iter().map(|x| (x - avg).powi(2)).sum::<f64>() / xs.len() as f64;
    variance.sqrt()
}

/// Interpolated percentile with `p` in `[0, 1]`.
///
/// Sorts a copy ascending and linearly interpolates between the adjacent
/// order statistics at rank `p * (n - 1)`. `p <= 0` returns the minimum,
/// `p >= 1` the maximum, and an empty slice 0.
#[must_use]
pub fn percentile(xs: &[f64], p: f64) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    if p <= 0.0 {
        return xs.iter().copied().fold(f64::INFINITY, f64::min);
    }
    if p >= 1.0 {
        return xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    }

    let mut sorted = xs.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = p * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }

    let weight = rank - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

/// Sharpe ratio `(avg - risk_free) / volatility`; 0 when volatility is 0.
#[must_use]
pub fn sharpe_ratio(avg_return: f64, volatility: f64, risk_free_rate: f64) -> f64 {
    if volatility == 0.0 {
        return 0.0;
    }
    (avg_return - risk_free_rate) / volatility
}

/// Left-tail risk pair produced by [`var_cvar`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TailRisk {
    /// Value at the `(1 - confidence)` percentile.
    pub var: f64,
    /// Mean of all values at or below the VaR threshold.
    pub cvar: f64,
}

/// VaR and CVaR of a sample at the given confidence level.
///
/// VaR is the `(1 - confidence)`-percentile value; CVaR averages everything
/// at or below it (collapsing to VaR itself when nothing lies below). The
/// caller chooses the framing: on raw values the tail is the left one, on
/// losses the caller inverts sign beforehand.
#[must_use]
pub fn var_cvar(xs: &[f64], confidence: f64) -> TailRisk {
    if xs.is_empty() {
        return TailRisk { var: 0.0, cvar: 0.0 };
    }

    let var = percentile(xs, 1.0 - confidence);
    let tail: Vec<f64> = xs.iter().copied().filter(|&x| x <= var).collect();
    let cvar = if tail.is_empty() { var } else { mean(&tail) };

    TailRisk { var, cvar }
}

/// Sample skewness; 0 below three samples or at zero variance.
#[must_use]
pub fn skewness(xs: &[f64]) -> f64 {
    if xs.len() < 3 {
        return 0.0;
    }
    let avg = mean(xs);
    let sd = std_dev(xs);
    if sd == 0.0 {
        return 0.0;
    }
    xs.iter().map(|x| ((x - avg) / sd).powi(3)).sum::<f64>() / xs.len() as f64
}

/// Excess kurtosis (normal distribution = 0); 0 below four samples or at
/// zero variance.
#[must_use]
pub fn kurtosis(xs: &[f64]) -> f64 {
    if xs.len() < 4 {
        return 0.0;
    }
    let avg = mean(xs);
    let sd = std_dev(xs);
    if sd == 0.0 {
        return 0.0;
    }
    xs.iter().map(|x| ((x - avg) / sd).powi(4)).sum::<f64>() / xs.len() as f64 - 3.0
}

/// Largest peak-to-trough decline of a value path.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Drawdown {
    /// Relative depth in `[0, 1]`.
    pub depth: f64,
    /// Index of the peak the decline fell from.
    pub peak_index: usize,
    /// Index of the trough the decline bottomed at.
    pub trough_index: usize,
}

/// Maximum drawdown of a value path, with the peak/trough indices of the
/// deepest decline. Paths shorter than two points have no drawdown.
#[must_use]
pub fn max_drawdown(path: &[f64]) -> Drawdown {
    if path.len() < 2 {
        return Drawdown::default();
    }

    let mut peak = path[0];
    let mut peak_index = 0;
    let mut worst = Drawdown::default();

    for (i, &value) in path.iter().enumerate().skip(1) {
        if value > peak {
            peak = value;
            peak_index = i;
        } else if peak > 0.0 {
            let depth = (peak - value) / peak;
            if depth > worst.depth {
                worst = Drawdown { depth, peak_index, trough_index: i };
            }
        }
    }

    worst
}

/// Pearson correlation; 0 for mismatched/short inputs or zero variance.
#[must_use]
pub fn correlation(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return 0.0;
    }

    let x_mean = mean(x);
    let y_mean = mean(y);

    let mut numerator = 0.0;
    let mut x_sum_sq = 0.0;
    let mut y_sum_sq = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - x_mean;
        let dy = yi - y_mean;
        numerator += dx * dy;
        x_sum_sq += dx * dx;
        y_sum_sq += dy * dy;
    }

    let denominator = (x_sum_sq * y_sum_sq).sqrt();
    if denominator == 0.0 { 0.0 } else { numerator / denominator }
}

/// Wilson score interval for a binomial success rate, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub low: f64,
    pub mid: f64,
    pub high: f64,
}

/// Wilson score interval for `successes` out of `trials`, as percentages.
///
/// Stays well-behaved at observed rates of exactly 0% or 100%, which show
/// up routinely at a few thousand trials. The observed rate always lies
/// within `[low, high]`.
#[must_use]
pub fn wilson_interval(successes: usize, trials: usize, confidence: f64) -> ConfidenceInterval {
    if trials == 0 {
        return ConfidenceInterval { low: 0.0, mid: 0.0, high: 0.0 };
    }

    let z = z_score(confidence);
    let n = trials as f64;
    let p_hat = (successes.min(trials)) as f64 / n;

    let z2 = z * z;
    let denom = 1.0 + z2 / n;
    let center = (p_hat + z2 / (2.0 * n)) / denom;
    let half_width = z * (p_hat * (1.0 - p_hat) / n + z2 / (4.0 * n * n)).sqrt() / denom;

    ConfidenceInterval {
        low: ((center - half_width).clamp(0.0, 1.0)) * 100.0,
        mid: (center.clamp(0.0, 1.0)) * 100.0,
        high: ((center + half_width).clamp(0.0, 1.0)) * 100.0,
    }
}

/// Two-sided normal quantile for the common confidence levels.
fn z_score(confidence: f64) -> f64 {
    if confidence >= 0.99 {
        2.576
    } else if confidence >= 0.95 {
        1.96
    } else if confidence >= 0.90 {
        1.645
    } else {
        1.96
    }
}

/// Log returns of a price sequence; a non-positive previous price yields a
/// 0 entry rather than a NaN.
#[must_use]
pub fn log_returns(prices: &[f64]) -> Vec<f64> {
    if prices.len() < 2 {
        return Vec::new();
    }

    prices
        .windows(2)
        .map(|pair| {
            if pair[0] > 0.0 && pair[1] > 0.0 {
                (pair[1] / pair[0]).ln()
            } else {
                0.0
            }
        })
        .collect()
}
