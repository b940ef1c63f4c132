//! Chart payload assembly.
//!
//! Turns the full trial path set into the fan bands, representative
//! paths and principal reference line the caller renders. Nothing here
//! feeds back into ranking; the payload is bounded by decimating every
//! series with the same stride so they stay index-aligned.

use crate::config::EngineSettings;
use crate::model::{ChartData, FanBands, Goal, PathKind, PathSample};
use crate::random::Mulberry32;
use crate::stats;

const BAND_LEVELS: [f64; 5] = [0.05, 0.25, 0.5, 0.75, 0.95];

/// Aggregate trial paths into a chart payload.
///
/// Every path is expected to span the same number of steps; the first
/// path sets the step count. `rng` continues the instrument's seeded
/// stream, so which sample paths are retained is as reproducible as
/// the paths themselves.
pub fn build_chart(
    paths: &[Vec<f64>],
    goal: &Goal,
    settings: &EngineSettings,
    rng: &mut Mulberry32,
) -> ChartData {
    let steps = paths.first().map_or(0, Vec::len);
    let principal = principal_line(goal);
    if steps == 0 {
        return ChartData {
            bands: FanBands {
                p05: Vec::new(),
                p25: Vec::new(),
                p50: Vec::new(),
                p75: Vec::new(),
                p95: Vec::new(),
            },
            paths: Vec::new(),
            principal: shrink(principal, settings.chart_max_points),
        };
    }

    let mut bands: [Vec<f64>; 5] = std::array::from_fn(|_| Vec::with_capacity(steps));
    let mut column = Vec::with_capacity(paths.len());
    for step in 0..steps {
        column.clear();
        column.extend(paths.iter().map(|path| path[step]));
        for (band, &level) in bands.iter_mut().zip(&BAND_LEVELS) {
            band.push(stats::percentile(&column, level));
        }
    }
    let [p05, p25, p50, p75, p95] = bands;

    let retained = select_paths(paths, settings.retained_samples, rng);

    let max_points = settings.chart_max_points;
    ChartData {
        bands: FanBands {
            p05: shrink(p05, max_points),
            p25: shrink(p25, max_points),
            p50: shrink(p50, max_points),
            p75: shrink(p75, max_points),
            p95: shrink(p95, max_points),
        },
        paths: retained
            .into_iter()
            .map(|(kind, index)| PathSample {
                kind,
                values: decimate(&paths[index], max_points),
            })
            .collect(),
        principal: shrink(principal, max_points),
    }
}

/// Best final, worst final, then up to `samples` distinct random picks.
fn select_paths(
    paths: &[Vec<f64>],
    samples: usize,
    rng: &mut Mulberry32,
) -> Vec<(PathKind, usize)> {
    let final_of = |index: usize| paths[index].last().copied().unwrap_or(0.0);

    let mut best = 0;
    let mut worst = 0;
    for index in 1..paths.len() {
        if final_of(index) > final_of(best) {
            best = index;
        }
        if final_of(index) < final_of(worst) {
            worst = index;
        }
    }

    let mut retained = vec![(PathKind::Best, best)];
    if worst != best {
        retained.push((PathKind::Worst, worst));
    }

    let mut attempts = 0;
    while retained.len() < samples.saturating_add(2).min(paths.len()) && attempts < samples * 10 {
        attempts += 1;
        let pick = ((rng.next_f64() * paths.len() as f64) as usize).min(paths.len() - 1);
        if retained.iter().all(|&(_, index)| index != pick) {
            retained.push((PathKind::Sample, pick));
        }
    }

    retained
}

/// Cumulative deposits with no market return, one value per month.
fn principal_line(goal: &Goal) -> Vec<f64> {
    (0..=goal.months())
        .map(|month| goal.initial_amount + goal.monthly_contribution * f64::from(month))
        .collect()
}

fn shrink(series: Vec<f64>, max_points: usize) -> Vec<f64> {
    if series.len() <= max_points {
        series
    } else {
        decimate(&series, max_points)
    }
}

/// Uniform stride decimation to at most `max_points`, always keeping
/// the first and last points. Applied with the same parameters to every
/// series of a chart so indexes line up.
pub fn decimate(series: &[f64], max_points: usize) -> Vec<f64> {
    if series.len() <= max_points || max_points < 2 {
        return series.to_vec();
    }
    let last = series.len() - 1;
    (0..max_points)
        .map(|i| series[i * last / (max_points - 1)])
        .collect()
}
