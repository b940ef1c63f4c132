//! Historical-window simulation.
//!
//! Replays every realized window of the instrument's own monthly
//! closes that is as long as the goal horizon, compounds a DCA plan at
//! each window's CAGR, and counts how many windows reach the target.
//! No randomness: two runs over the same closes are identical.

use crate::config::{ContributionTiming, EngineSettings};
use crate::model::{Goal, Instrument, Reliability, StrategyDetail};
use crate::stats;
use crate::strategy::{SimulatedInstrument, apply_period};

/// Evaluate one instrument against the goal over its historical
/// windows. Returns `None` when the monthly history is shorter than
/// the goal horizon.
pub(crate) fn simulate(
    instrument: &Instrument,
    goal: &Goal,
    risk_score: f64,
    personal_score: f64,
    settings: &EngineSettings,
) -> Option<SimulatedInstrument> {
    let monthly = instrument.monthly_closes();
    let window_months = goal.months() as usize;
    if window_months == 0 || monthly.len() < window_months {
        return None;
    }

    let total_windows = monthly.len() - window_months + 1;
    let first_start = total_windows.saturating_sub(settings.window_limit);
    let years = f64::from(goal.years);
    let months = goal.months();

    let mut evaluated = 0usize;
    let mut hits = 0usize;
    let mut finals = Vec::with_capacity(total_windows - first_start);
    let mut cagrs = Vec::with_capacity(total_windows - first_start);
    let mut match_scores = Vec::with_capacity(total_windows - first_start);

    for start in first_start..total_windows {
        let window = &monthly[start..start + window_months];
        let (first, last) = (window[0], window[window_months - 1]);
        if first <= 0.0 || last <= 0.0 {
            continue;
        }

        let cagr = (last / first).powf(1.0 / years) - 1.0;
        let monthly_return = (1.0 + cagr).powf(1.0 / 12.0) - 1.0;

        let mut value = goal.initial_amount;
        for _ in 0..months {
            value = apply_period(
                value,
                goal.monthly_contribution,
                ContributionTiming::Start,
                monthly_return,
            );
        }

        evaluated += 1;
        if value >= goal.target_amount {
            hits += 1;
        }
        finals.push(value);
        cagrs.push(cagr);
        match_scores.push(risk_match_score(window, risk_score));
    }

    if evaluated == 0 {
        return None;
    }

    let success_rate = hits as f64 / evaluated as f64 * 100.0;
    let expected_value = stats::mean(&finals);

    // Realized monthly volatility over the full history, annualized.
    let monthly_returns: Vec<f64> = monthly
        .windows(2)
        .filter(|pair| pair[0] > 0.0)
        .map(|pair| pair[1] / pair[0] - 1.0)
        .collect();
    let volatility = stats::std_dev(&monthly_returns) * 12.0_f64.sqrt();
    let sharpe = stats::sharpe_ratio(stats::mean(&cagrs), volatility, settings.risk_free_rate);

    let risk_match = round2(stats::mean(&match_scores));
    let max_drawdown = round2(stats::max_drawdown(&monthly).depth * 100.0);

    Some(SimulatedInstrument {
        instrument_id: instrument.id.clone(),
        name: instrument.name.clone(),
        asset_class: instrument.asset_class.clone(),
        theme: instrument.theme.clone(),
        success_rate,
        successes: hits,
        trials: evaluated,
        expected_value,
        volatility,
        sharpe,
        personal_score,
        detail: StrategyDetail::HistoricalWindow {
            windows: evaluated,
            window_months,
            risk_match,
            max_drawdown,
            reliability: Reliability::from_windows(evaluated),
        },
        chart: None,
    })
}

/// How closely the window's realized volatility sits to the investor's
/// risk score, as a Gaussian falloff on a 0..100 scale.
fn risk_match_score(window: &[f64], risk_score: f64) -> f64 {
    let mut sum_sq = 0.0;
    let mut count = 0usize;
    for pair in window.windows(2) {
        if pair[0] > 0.0 {
            let r = pair[1] / pair[0] - 1.0;
            sum_sq += r * r;
            count += 1;
        }
    }
    if count == 0 {
        return 0.0;
    }
    let rms_vol = (sum_sq / count as f64).sqrt();
    let vol_score = (rms_vol * 1000.0).min(100.0);
    let delta = (vol_score - risk_score) / 20.0;
    round2((-delta * delta).exp() * 100.0)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
