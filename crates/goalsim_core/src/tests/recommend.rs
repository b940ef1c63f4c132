//! End-to-end tests for recommendation runs
//!
//! These tests verify that:
//! - Invalid goals and settings are rejected before any simulation
//! - Theme filtering, the universe cap and skip accounting feed the meta
//! - Results come back ranked, truncated and deterministic
//! - Risk normalization switches between linear and Z-score scaling
//! - Cancellation surfaces as an error and progress counts add up
//! - The historical strategy produces exact, hand-checkable scores

use jiff::civil::date;

use crate::config::EngineSettings;
use crate::error::{EngineError, GoalError};
use crate::model::{
    Goal, Instrument, InvestorProfile, PricePoint, ScoreCard, StoredMetrics, StrategyDetail,
    Universe,
};
use crate::recommend::recommend;
use crate::strategy::{RunProgress, SimulationStrategy};
use crate::synthetic::{self, ReturnModel};

fn goal(target: f64, years: u32, initial: f64, monthly: f64) -> Goal {
    Goal {
        target_amount: target,
        years,
        initial_amount: initial,
        monthly_contribution: monthly,
    }
}

fn daily_instrument(id: &str, seed: u32, years: u32) -> Instrument {
    let model = ReturnModel::Drift {
        daily_return: 0.0004,
        daily_noise: 0.01,
    };
    Instrument {
        id: id.into(),
        name: format!("{id} Index"),
        asset_class: None,
        theme: None,
        prices: synthetic::price_series(seed, years, model).unwrap(),
        scores: ScoreCard::default(),
        stored: StoredMetrics::default(),
    }
}

fn daily_universe(count: usize) -> Universe {
    Universe::new(
        (0..count)
            .map(|i| daily_instrument(&format!("ETF{i:03}"), i as u32 * 7 + 1, 2))
            .collect(),
    )
}

/// One flat close per calendar month.
fn flat_monthly_instrument(id: &str, months: usize) -> Instrument {
    let prices = (0..months)
        .map(|i| PricePoint {
            date: date(2010 + (i / 12) as i16, (i % 12) as i8 + 1, 15),
            close: 100.0,
            aum: None,
        })
        .collect();
    Instrument {
        id: id.into(),
        name: format!("{id} Index"),
        asset_class: Some("mixed".into()),
        theme: None,
        prices,
        scores: ScoreCard::default(),
        stored: StoredMetrics::default(),
    }
}

fn fast_settings() -> EngineSettings {
    EngineSettings {
        trials: 40,
        ..EngineSettings::default()
    }
}

/// Test that a bad goal is rejected before any simulation happens.
#[test]
fn test_invalid_goal_is_rejected() {
    let universe = Universe::new(vec![]);
    let bad = goal(10_000.0, 0, 1_000.0, 100.0);
    let result = recommend(
        &universe,
        &bad,
        &InvestorProfile::default(),
        SimulationStrategy::MonteCarlo,
        &fast_settings(),
        &RunProgress::new(0),
    );
    assert!(matches!(
        result,
        Err(EngineError::Goal(GoalError::HorizonOutOfRange { .. }))
    ));
}

/// Test that bad settings are rejected up front.
#[test]
fn test_invalid_settings_are_rejected() {
    let universe = Universe::new(vec![]);
    let settings = EngineSettings {
        trials: 0,
        ..EngineSettings::default()
    };
    let result = recommend(
        &universe,
        &goal(10_000.0, 5, 1_000.0, 100.0),
        &InvestorProfile::default(),
        SimulationStrategy::MonteCarlo,
        &settings,
        &RunProgress::new(0),
    );
    assert!(matches!(result, Err(EngineError::Settings(_))));
}

/// Test that an empty universe completes cleanly with empty output.
#[test]
fn test_empty_universe_runs_clean() {
    let result = recommend(
        &Universe::new(vec![]),
        &goal(10_000.0, 5, 1_000.0, 100.0),
        &InvestorProfile::default(),
        SimulationStrategy::MonteCarlo,
        &fast_settings(),
        &RunProgress::new(0),
    )
    .unwrap();

    assert!(result.recommendations.is_empty());
    assert_eq!(result.meta.method, "monte_carlo");
    assert_eq!(result.meta.simulations, 40);
    assert_eq!(result.meta.steps, 60);
    assert_eq!(result.meta.target_amount, 10_000.0);
    assert_eq!(result.meta.target_years, 5);
    assert_eq!(result.meta.confidence_level, 95.0);
    assert_eq!(result.meta.instruments_analyzed, 0);
    assert_eq!(result.meta.instruments_skipped, 0);
}

/// Test that the theme filter narrows candidates and the universe cap
/// bounds them.
#[test]
fn test_theme_filter_and_universe_cap() {
    let mut instruments = Vec::new();
    for i in 0..3 {
        let mut etf = daily_instrument(&format!("DIV{i}"), 100 + i, 2);
        etf.theme = Some("dividend".into());
        etf.asset_class = Some("equity".into());
        instruments.push(etf);
    }
    for i in 0..3 {
        let mut etf = daily_instrument(&format!("GRW{i}"), 200 + i, 2);
        etf.theme = Some("growth".into());
        instruments.push(etf);
    }
    let universe = Universe::new(instruments);
    let goal = goal(20_000.0, 5, 10_000.0, 100.0);

    let themed = InvestorProfile {
        theme: Some("dividend".into()),
        ..InvestorProfile::default()
    };
    let result = recommend(
        &universe,
        &goal,
        &themed,
        SimulationStrategy::MonteCarlo,
        &fast_settings(),
        &RunProgress::new(0),
    )
    .unwrap();
    assert_eq!(result.meta.instruments_analyzed, 3);
    assert!(
        result
            .recommendations
            .iter()
            .all(|r| r.theme.as_deref() == Some("dividend")
                && r.asset_class.as_deref() == Some("equity"))
    );

    let capped = EngineSettings {
        universe_cap: 2,
        ..fast_settings()
    };
    let result = recommend(
        &universe,
        &goal,
        &InvestorProfile::default(),
        SimulationStrategy::MonteCarlo,
        &capped,
        &RunProgress::new(0),
    )
    .unwrap();
    assert_eq!(
        result.meta.instruments_analyzed + result.meta.instruments_skipped,
        2
    );
}

/// Test that too-short histories are counted as skipped, not analyzed.
#[test]
fn test_skip_accounting() {
    let mut short = daily_instrument("SHORT", 5, 1);
    short.prices.truncate(100);
    let universe = Universe::new(vec![
        daily_instrument("ETF000", 1, 2),
        short,
        daily_instrument("ETF001", 8, 2),
    ]);

    let result = recommend(
        &universe,
        &goal(20_000.0, 5, 10_000.0, 100.0),
        &InvestorProfile::default(),
        SimulationStrategy::MonteCarlo,
        &fast_settings(),
        &RunProgress::new(0),
    )
    .unwrap();

    assert_eq!(result.meta.instruments_analyzed, 2);
    assert_eq!(result.meta.instruments_skipped, 1);
    assert_eq!(result.recommendations.len(), 2);
}

/// Test that recommendations are sorted by goal score and truncated to
/// the configured top.
#[test]
fn test_results_ranked_and_truncated() {
    let settings = EngineSettings {
        top_results: 3,
        ..fast_settings()
    };
    let result = recommend(
        &daily_universe(6),
        &goal(20_000.0, 5, 10_000.0, 100.0),
        &InvestorProfile::default(),
        SimulationStrategy::MonteCarlo,
        &settings,
        &RunProgress::new(0),
    )
    .unwrap();

    assert_eq!(result.recommendations.len(), 3);
    for pair in result.recommendations.windows(2) {
        assert!(
            pair[0].goal_score >= pair[1].goal_score,
            "{} ranked above {}",
            pair[1].goal_score,
            pair[0].goal_score
        );
    }
}

/// Test that two identical runs serialize to identical recommendations.
#[test]
fn test_runs_are_deterministic() {
    let universe = daily_universe(4);
    let goal = goal(20_000.0, 5, 10_000.0, 100.0);
    let run = || {
        recommend(
            &universe,
            &goal,
            &InvestorProfile::default(),
            SimulationStrategy::MonteCarlo,
            &fast_settings(),
            &RunProgress::new(0),
        )
        .unwrap()
    };

    let a = serde_json::to_string(&run().recommendations).unwrap();
    let b = serde_json::to_string(&run().recommendations).unwrap();
    assert_eq!(a, b);
}

/// Test that a cancelled progress handle aborts the run.
#[test]
fn test_cancellation_aborts_run() {
    let progress = RunProgress::new(0);
    progress.cancel();
    let result = recommend(
        &daily_universe(2),
        &goal(20_000.0, 5, 10_000.0, 100.0),
        &InvestorProfile::default(),
        SimulationStrategy::MonteCarlo,
        &fast_settings(),
        &progress,
    );
    assert!(matches!(result, Err(EngineError::Cancelled)));
}

/// Test that a host owning the raw atomics observes progress through
/// a handle built with `from_atomics`.
#[test]
fn test_progress_shares_host_atomics() {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    let completed = Arc::new(AtomicUsize::new(0));
    let total = Arc::new(AtomicUsize::new(0));
    let cancelled = Arc::new(AtomicBool::new(false));
    let progress =
        RunProgress::from_atomics(completed.clone(), total.clone(), cancelled.clone());

    recommend(
        &daily_universe(2),
        &goal(20_000.0, 5, 10_000.0, 100.0),
        &InvestorProfile::default(),
        SimulationStrategy::MonteCarlo,
        &fast_settings(),
        &progress,
    )
    .unwrap();

    assert_eq!(completed.load(Ordering::Relaxed), 2);
    assert_eq!(total.load(Ordering::Relaxed), 2);

    cancelled.store(true, Ordering::Relaxed);
    let result = recommend(
        &daily_universe(2),
        &goal(20_000.0, 5, 10_000.0, 100.0),
        &InvestorProfile::default(),
        SimulationStrategy::MonteCarlo,
        &fast_settings(),
        &progress,
    );
    assert!(matches!(result, Err(EngineError::Cancelled)));
}

/// Test that progress counts every candidate, skipped or not.
#[test]
fn test_progress_counts_candidates() {
    let mut short = daily_instrument("SHORT", 5, 1);
    short.prices.truncate(100);
    let universe = Universe::new(vec![daily_instrument("ETF000", 1, 2), short]);
    let progress = RunProgress::new(0);

    recommend(
        &universe,
        &goal(20_000.0, 5, 10_000.0, 100.0),
        &InvestorProfile::default(),
        SimulationStrategy::MonteCarlo,
        &fast_settings(),
        &progress,
    )
    .unwrap();

    assert_eq!(progress.total(), 2);
    assert_eq!(progress.completed(), 2);
}

/// Test that below the normalization population, risk scores scale
/// Sharpe linearly.
#[test]
fn test_small_population_scales_sharpe_linearly() {
    let mut a = daily_instrument("ETF000", 1, 2);
    a.stored.sharpe_ratio = Some(2.0);
    let mut b = daily_instrument("ETF001", 8, 2);
    b.stored.sharpe_ratio = Some(1.0);
    let universe = Universe::new(vec![a, b]);

    let result = recommend(
        &universe,
        &goal(20_000.0, 5, 10_000.0, 100.0),
        &InvestorProfile::default(),
        SimulationStrategy::MonteCarlo,
        &fast_settings(),
        &RunProgress::new(0),
    )
    .unwrap();

    let risk_of = |id: &str| {
        result
            .recommendations
            .iter()
            .find(|r| r.instrument_id == id)
            .unwrap()
            .risk_score
    };
    assert_eq!(risk_of("ETF000"), 40.0);
    assert_eq!(risk_of("ETF001"), 20.0);
}

/// Test that at population size, Sharpe figures are Z-score normalized
/// around 50 with symmetric spread.
#[test]
fn test_population_z_score_normalization() {
    let sharpes = [0.5, 1.0, 1.5, 2.0, 2.5];
    let instruments: Vec<Instrument> = sharpes
        .iter()
        .enumerate()
        .map(|(i, &sharpe)| {
            let mut etf = daily_instrument(&format!("ETF{i:03}"), i as u32 * 3 + 1, 2);
            etf.stored.sharpe_ratio = Some(sharpe);
            etf
        })
        .collect();
    let universe = Universe::new(instruments);

    let result = recommend(
        &universe,
        &goal(20_000.0, 5, 10_000.0, 100.0),
        &InvestorProfile::default(),
        SimulationStrategy::MonteCarlo,
        &fast_settings(),
        &RunProgress::new(0),
    )
    .unwrap();

    let risk_of = |id: &str| {
        result
            .recommendations
            .iter()
            .find(|r| r.instrument_id == id)
            .unwrap()
            .risk_score
    };
    // Population mean 1.5, std 1/sqrt(2): Z of +-1.414 lands at
    // 50 +- 23.6 on the (z + 3) / 6 scale.
    assert_eq!(risk_of("ETF000"), 26.4);
    assert_eq!(risk_of("ETF001"), 38.2);
    assert_eq!(risk_of("ETF002"), 50.0);
    assert_eq!(risk_of("ETF003"), 61.8);
    assert_eq!(risk_of("ETF004"), 73.6);
}

/// Test a historical run end to end with hand-computed scores: flat
/// prices, a trivial target, 13 windows all succeeding.
#[test]
fn test_historical_run_exact_scores() {
    let universe = Universe::new(vec![flat_monthly_instrument("069500", 72)]);
    let result = recommend(
        &universe,
        &goal(1.0, 5, 1_000.0, 10.0),
        &InvestorProfile::default(),
        SimulationStrategy::HistoricalWindow,
        &EngineSettings::default(),
        &RunProgress::new(0),
    )
    .unwrap();

    assert_eq!(result.meta.method, "historical_window");
    assert_eq!(result.meta.simulations, 40);
    assert_eq!(result.recommendations.len(), 1);

    let top = &result.recommendations[0];
    assert_eq!(top.success_rate, 100.0);
    assert_eq!(top.expected_value, 1_600.0);
    // Flat prices have zero realized volatility, so the risk match for
    // a risk score of 50 is exp(-2.5^2) of the peak: 0.19.
    assert_eq!(top.risk_score, 0.2);
    assert_eq!(top.goal_score, 70.1);
    // Wilson interval for 13 of 13 at 95%.
    assert_eq!(top.confidence.low, 77.2);
    assert_eq!(top.confidence.mid, 88.6);
    assert_eq!(top.confidence.high, 100.0);
    assert!(top.chart.is_none());
    assert_eq!(top.asset_class.as_deref(), Some("mixed"));
    match &top.detail {
        StrategyDetail::HistoricalWindow {
            windows,
            risk_match,
            max_drawdown,
            ..
        } => {
            assert_eq!(*windows, 13);
            assert_eq!(*risk_match, 0.19);
            assert_eq!(*max_drawdown, 0.0, "flat closes never draw down");
        }
        other => panic!("unexpected detail: {other:?}"),
    }
}
