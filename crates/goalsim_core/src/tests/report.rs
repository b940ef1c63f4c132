//! Tests for chart payload assembly
//!
//! These tests verify that:
//! - Fan bands are per-step percentiles across trial paths
//! - Best and worst paths are retained first, then distinct samples
//! - The principal line tracks contributions with no market return
//! - Decimation bounds every series while keeping endpoints aligned
//! - Selection is reproducible from the seeded stream

use crate::config::EngineSettings;
use crate::model::{Goal, PathKind};
use crate::random::Mulberry32;
use crate::report::{build_chart, decimate};

fn goal(years: u32, initial: f64, monthly: f64) -> Goal {
    Goal {
        target_amount: 1_000_000.0,
        years,
        initial_amount: initial,
        monthly_contribution: monthly,
    }
}

fn constant_paths(levels: &[f64], steps: usize) -> Vec<Vec<f64>> {
    levels.iter().map(|&level| vec![level; steps]).collect()
}

/// Test that each band value interpolates the cross-path percentile at
/// its step.
#[test]
fn test_bands_are_column_percentiles() {
    let paths = constant_paths(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);
    let settings = EngineSettings::default();
    let mut rng = Mulberry32::new(1);

    let chart = build_chart(&paths, &goal(1, 0.0, 0.0), &settings, &mut rng);

    for step in 0..3 {
        assert!((chart.bands.p05[step] - 12.0).abs() < 1e-9);
        assert!((chart.bands.p25[step] - 20.0).abs() < 1e-9);
        assert!((chart.bands.p50[step] - 30.0).abs() < 1e-9);
        assert!((chart.bands.p75[step] - 40.0).abs() < 1e-9);
        assert!((chart.bands.p95[step] - 48.0).abs() < 1e-9);
    }
}

/// Test that with no extra samples requested, exactly the best and
/// worst paths are retained, in that order.
#[test]
fn test_best_and_worst_retained_first() {
    let paths = vec![
        vec![0.0, 5.0],
        vec![0.0, 9.0],
        vec![0.0, 1.0],
        vec![0.0, 7.0],
    ];
    let settings = EngineSettings {
        retained_samples: 0,
        ..EngineSettings::default()
    };
    let mut rng = Mulberry32::new(1);

    let chart = build_chart(&paths, &goal(1, 0.0, 0.0), &settings, &mut rng);

    assert_eq!(chart.paths.len(), 2);
    assert_eq!(chart.paths[0].kind, PathKind::Best);
    assert_eq!(chart.paths[0].values, vec![0.0, 9.0]);
    assert_eq!(chart.paths[1].kind, PathKind::Worst);
    assert_eq!(chart.paths[1].values, vec![0.0, 1.0]);
}

/// Test that requested samples are distinct paths tagged as samples.
#[test]
fn test_random_samples_are_distinct() {
    let paths: Vec<Vec<f64>> = (0..20).map(|i| vec![0.0, f64::from(i)]).collect();
    let settings = EngineSettings::default();
    let mut rng = Mulberry32::new(9);

    let chart = build_chart(&paths, &goal(1, 0.0, 0.0), &settings, &mut rng);

    assert!(chart.paths.len() >= 2);
    assert!(chart.paths.len() <= settings.retained_samples + 2);
    for sample in &chart.paths[2..] {
        assert_eq!(sample.kind, PathKind::Sample);
    }
    // Finals are unique by construction, so distinct paths means
    // distinct final values.
    let mut finals: Vec<f64> = chart
        .paths
        .iter()
        .map(|p| *p.values.last().unwrap())
        .collect();
    finals.sort_by(f64::total_cmp);
    finals.dedup();
    assert_eq!(finals.len(), chart.paths.len());
}

/// Test that a single path collapses retention to one best path.
#[test]
fn test_single_path_keeps_best_only() {
    let paths = vec![vec![1.0, 2.0, 3.0]];
    let settings = EngineSettings::default();
    let mut rng = Mulberry32::new(1);

    let chart = build_chart(&paths, &goal(1, 0.0, 0.0), &settings, &mut rng);
    assert_eq!(chart.paths.len(), 1);
    assert_eq!(chart.paths[0].kind, PathKind::Best);
}

/// Test the principal reference line and the empty-path guard.
#[test]
fn test_principal_line_tracks_contributions() {
    let settings = EngineSettings::default();
    let mut rng = Mulberry32::new(1);

    let chart = build_chart(&[], &goal(1, 1_000.0, 100.0), &settings, &mut rng);

    assert!(chart.bands.p50.is_empty());
    assert!(chart.paths.is_empty());
    assert_eq!(chart.principal.len(), 13);
    assert_eq!(chart.principal[0], 1_000.0);
    assert_eq!(chart.principal[12], 2_200.0);
}

/// Test decimation: passthrough under the cap, uniform stride with
/// preserved endpoints over it.
#[test]
fn test_decimate_bounds_and_endpoints() {
    let short = vec![1.0, 2.0, 3.0, 4.0, 5.0];
    assert_eq!(decimate(&short, 10), short);
    assert_eq!(decimate(&short, 1), short);

    let long: Vec<f64> = (0..=100).map(f64::from).collect();
    let thinned = decimate(&long, 11);
    let expected: Vec<f64> = (0..=10).map(|i| f64::from(i) * 10.0).collect();
    assert_eq!(thinned, expected);
}

/// Test that once the horizon outgrows the point cap, every chart
/// series is shrunk to the same length.
#[test]
fn test_long_horizon_series_stay_aligned() {
    let steps = 241;
    let paths: Vec<Vec<f64>> = (1..=3)
        .map(|scale| (0..steps).map(|i| f64::from(scale) * f64::from(i)).collect())
        .collect();
    let settings = EngineSettings::default();
    let mut rng = Mulberry32::new(3);

    let chart = build_chart(&paths, &goal(20, 500.0, 10.0), &settings, &mut rng);

    assert_eq!(chart.bands.p05.len(), 121);
    assert_eq!(chart.bands.p95.len(), 121);
    assert_eq!(chart.principal.len(), 121);
    for path in &chart.paths {
        assert_eq!(path.values.len(), 121);
    }
    // Endpoints survive decimation.
    assert_eq!(chart.bands.p50[0], 0.0);
    assert_eq!(chart.bands.p50[120], 480.0);
}

/// Test that the same seed retains the same sample paths.
#[test]
fn test_selection_is_reproducible() {
    let paths: Vec<Vec<f64>> = (0..50)
        .map(|i| vec![100.0, 100.0 + f64::from(i), 100.0 + f64::from(i) * 2.0])
        .collect();
    let settings = EngineSettings::default();

    let mut rng_a = Mulberry32::new(77);
    let mut rng_b = Mulberry32::new(77);
    let a = build_chart(&paths, &goal(1, 100.0, 10.0), &settings, &mut rng_a);
    let b = build_chart(&paths, &goal(1, 100.0, 10.0), &settings, &mut rng_b);
    assert_eq!(a, b);
}
