//! Recommendation runs.
//!
//! Orchestrates one full run: validate inputs, select candidate
//! instruments, simulate each with the chosen strategy, normalize
//! Sharpe figures across the run into risk scores, blend goal scores
//! and return the ranked top of the list. Instruments are independent
//! units of work; with the `parallel` feature they are simulated on the
//! rayon pool, and results are identical either way because collection
//! preserves candidate order and every instrument owns its seeded RNG.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use rustc_hash::FxHashMap;

use crate::config::EngineSettings;
use crate::error::{EngineError, Result};
use crate::model::{
    Goal, Instrument, InstrumentResult, InvestorProfile, RunMeta, RunResult, StrategyDetail,
    Universe,
};
use crate::stats::{self, ConfidenceInterval};
use crate::strategy::{
    RunProgress, SimulatedInstrument, SimulationStrategy, historical, monte_carlo,
};

/// Goal-score weights. A tunable policy, fixed within one run: Monte
/// Carlo blends success, normalized risk and personalization; the
/// historical engine blends hit rate and risk match.
const MC_WEIGHT_SUCCESS: f64 = 0.5;
const MC_WEIGHT_RISK: f64 = 0.3;
const MC_WEIGHT_PERSONAL: f64 = 0.2;
const HW_WEIGHT_SUCCESS: f64 = 0.7;
const HW_WEIGHT_RISK: f64 = 0.3;

/// Z-score normalization needs this many instruments to be meaningful.
const MIN_NORMALIZATION_POPULATION: usize = 5;

/// Personalization score when an instrument has no entry in the map.
const DEFAULT_PERSONAL_SCORE: f64 = 50.0;

/// Run the chosen strategy over the universe and rank the outcomes.
///
/// Cancellation via [`RunProgress::cancel`] is honored between
/// instrument units and surfaces as [`EngineError::Cancelled`].
pub fn recommend(
    universe: &Universe,
    goal: &Goal,
    profile: &InvestorProfile,
    strategy: SimulationStrategy,
    settings: &EngineSettings,
    progress: &RunProgress,
) -> Result<RunResult> {
    settings.validate()?;
    goal.validate(settings.max_years)?;

    let started = std::time::Instant::now();

    let candidates: Vec<_> = universe
        .matching_theme(profile.theme.as_deref())
        .take(settings.universe_cap)
        .collect();
    progress.reset(candidates.len());

    // Personalization scores are a per-user lookup, resolved up front so
    // the simulation closure is read-only.
    let personal_scores: FxHashMap<&str, f64> = candidates
        .iter()
        .map(|instrument| {
            (
                instrument.id.as_str(),
                instrument.scores.weighted(&profile.weights),
            )
        })
        .collect();

    let simulate_unit = |instrument: &&Instrument| -> Result<Option<SimulatedInstrument>> {
        if progress.is_cancelled() {
            return Err(EngineError::Cancelled);
        }
        let personal_score = personal_scores
            .get(instrument.id.as_str())
            .copied()
            .unwrap_or(DEFAULT_PERSONAL_SCORE);
        let outcome = match strategy {
            SimulationStrategy::MonteCarlo => monte_carlo::simulate(
                instrument,
                goal,
                &profile.user_key,
                personal_score,
                settings,
            ),
            SimulationStrategy::HistoricalWindow => historical::simulate(
                instrument,
                goal,
                profile.risk_score,
                personal_score,
                settings,
            ),
        };
        progress.increment();
        Ok(outcome)
    };

    #[cfg(feature = "parallel")]
    let outcomes: Result<Vec<Option<SimulatedInstrument>>> =
        candidates.par_iter().map(simulate_unit).collect();
    #[cfg(not(feature = "parallel"))]
    let outcomes: Result<Vec<Option<SimulatedInstrument>>> =
        candidates.iter().map(simulate_unit).collect();

    let mut simulated = Vec::new();
    let mut skipped = 0usize;
    for outcome in outcomes? {
        match outcome {
            Some(sim) => simulated.push(sim),
            None => skipped += 1,
        }
    }

    let risk_scores = risk_scores(&simulated, strategy);

    let mut recommendations: Vec<InstrumentResult> = simulated
        .into_iter()
        .zip(risk_scores)
        .map(|(sim, risk_score)| assemble(sim, risk_score, strategy, settings))
        .collect();

    recommendations.sort_by(|a, b| {
        b.goal_score
            .total_cmp(&a.goal_score)
            .then_with(|| b.success_rate.total_cmp(&a.success_rate))
            .then_with(|| a.instrument_id.cmp(&b.instrument_id))
    });
    recommendations.truncate(settings.top_results);

    let analyzed = candidates.len() - skipped;
    let meta = RunMeta {
        method: strategy.method_name().to_owned(),
        simulations: match strategy {
            SimulationStrategy::MonteCarlo => settings.trials,
            SimulationStrategy::HistoricalWindow => settings.window_limit,
        },
        steps: goal.months(),
        target_amount: goal.target_amount,
        target_years: goal.years,
        required_annual_return: goal.required_annual_return(),
        confidence_level: (settings.confidence_level * 100.0).round(),
        instruments_analyzed: analyzed,
        instruments_skipped: skipped,
        calculation_time_secs: round1(started.elapsed().as_secs_f64()),
    };

    Ok(RunResult {
        recommendations,
        meta,
    })
}

/// Per-instrument risk score on a 0..100 scale.
///
/// Monte Carlo: Z-score normalize Sharpe figures across the run so
/// ranking is comparable between runs with different absolute Sharpe
/// scales; with fewer than [`MIN_NORMALIZATION_POPULATION`] instruments
/// fall back to linear scaling. Historical: the window risk match is
/// already on the right scale.
fn risk_scores(simulated: &[SimulatedInstrument], strategy: SimulationStrategy) -> Vec<f64> {
    match strategy {
        SimulationStrategy::MonteCarlo => {
            let sharpes: Vec<f64> = simulated.iter().map(|sim| sim.sharpe).collect();
            if sharpes.len() < MIN_NORMALIZATION_POPULATION {
                return sharpes
                    .iter()
                    .map(|sharpe| sanitize(round1((sharpe * 20.0).min(100.0))))
                    .collect();
            }
            let center = stats::mean(&sharpes);
            let mut spread = stats::std_dev(&sharpes);
            if !spread.is_finite() || spread == 0.0 {
                spread = 1e-9;
            }
            sharpes
                .iter()
                .map(|sharpe| {
                    let z = (sharpe - center) / spread;
                    sanitize(round1(((z + 3.0) / 6.0).clamp(0.0, 1.0) * 100.0))
                })
                .collect()
        }
        SimulationStrategy::HistoricalWindow => simulated
            .iter()
            .map(|sim| match &sim.detail {
                StrategyDetail::HistoricalWindow { risk_match, .. } => *risk_match,
                StrategyDetail::MonteCarlo { .. } => 0.0,
            })
            .collect(),
    }
}

/// Round, score and package one simulated instrument.
fn assemble(
    sim: SimulatedInstrument,
    risk_score: f64,
    strategy: SimulationStrategy,
    settings: &EngineSettings,
) -> InstrumentResult {
    let goal_score = match strategy {
        SimulationStrategy::MonteCarlo => {
            MC_WEIGHT_SUCCESS * sim.success_rate
                + MC_WEIGHT_RISK * risk_score
                + MC_WEIGHT_PERSONAL * sim.personal_score
        }
        SimulationStrategy::HistoricalWindow => {
            HW_WEIGHT_SUCCESS * sim.success_rate + HW_WEIGHT_RISK * risk_score
        }
    };
    let confidence =
        stats::wilson_interval(sim.successes, sim.trials, settings.confidence_level);

    InstrumentResult {
        instrument_id: sim.instrument_id,
        name: sim.name,
        asset_class: sim.asset_class,
        theme: sim.theme,
        success_rate: round1(sim.success_rate),
        expected_value: sim.expected_value.round(),
        volatility: round1(sim.volatility * 100.0),
        sharpe_ratio: round1(sim.sharpe),
        personal_score: round1(sim.personal_score),
        risk_score: round1(risk_score),
        goal_score: sanitize(round1(goal_score)),
        confidence: ConfidenceInterval {
            low: round1(confidence.low),
            mid: round1(confidence.mid),
            high: round1(confidence.high),
        },
        detail: sim.detail,
        chart: sim.chart,
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
