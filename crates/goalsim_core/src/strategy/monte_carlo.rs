//! Monte Carlo simulation.
//!
//! Per instrument: calibrate return/volatility assumptions from the
//! price history (data quality, market regime, personalization blend,
//! regime safety bands), estimate GARCH parameters, then run N
//! independent DCA trials month by month with soft-capped shocks. The
//! RNG is seeded from the instrument id and user key, so the same
//! inputs reproduce the same paths bit for bit.

use crate::config::{EngineSettings, ShockDistribution};
use crate::garch::{self, AssetClass, GarchParams, GarchState};
use crate::model::{Goal, Instrument, StrategyDetail};
use crate::quality;
use crate::random::{Mulberry32, pair_seed};
use crate::regime::{self, MarketRegime};
use crate::report;
use crate::stats;
use crate::strategy::{SimulatedInstrument, apply_period};

/// Minimum daily closes required to simulate an instrument at all.
pub(crate) const MIN_DAILY_HISTORY: usize = 252;

/// Forward-looking assumptions derived from one instrument's history.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Calibration {
    /// Blended and regime-clamped annual return.
    pub annual_return: f64,
    /// Annual volatility driving the initial GARCH sigma. Stored
    /// metrics take precedence over the runtime estimate.
    pub annual_volatility: f64,
    pub regime: MarketRegime,
    pub asset_class: AssetClass,
    pub garch: GarchParams,
    pub data_quality: f64,
}

/// Calibrate simulation assumptions for one instrument, or `None` when
/// the history is too short to trust.
pub(crate) fn calibrate(
    instrument: &Instrument,
    personal_score: f64,
    settings: &EngineSettings,
) -> Option<Calibration> {
    let closes = instrument.closes();
    if closes.len() < MIN_DAILY_HISTORY {
        return None;
    }

    let data_quality = quality::data_quality(&closes);
    let historical_return = quality::historical_return(&closes);
    let historical_volatility = quality::historical_volatility(&closes);
    let market_regime = MarketRegime::classify(&closes);

    // Short or gappy histories lean on the personalization estimate;
    // long clean ones lean on the realized CAGR.
    let weight = quality::historical_weight(data_quality);
    let personal = regime::personal_return(personal_score, market_regime);
    let blended = historical_return * weight + personal * (1.0 - weight);
    let annual_return = regime::clamp_annual_return(blended, market_regime);

    let estimated = regime::clamp_volatility(
        regime::enhanced_volatility(historical_volatility, market_regime, personal_score),
        market_regime,
    );
    let annual_volatility = instrument.stored.usable_volatility().unwrap_or(estimated);

    Some(Calibration {
        annual_return,
        annual_volatility,
        regime: market_regime,
        asset_class: AssetClass::from_annualized_volatility(historical_volatility),
        garch: garch::estimate_or(&closes, settings.garch_fallback),
        data_quality,
    })
}

/// Run the full trial set for one instrument. Returns `None` when the
/// daily history is shorter than [`MIN_DAILY_HISTORY`].
pub(crate) fn simulate(
    instrument: &Instrument,
    goal: &Goal,
    user_key: &str,
    personal_score: f64,
    settings: &EngineSettings,
) -> Option<SimulatedInstrument> {
    let calibration = calibrate(instrument, personal_score, settings)?;

    let months = goal.months() as usize;
    let years = f64::from(goal.years);
    let monthly_return = (1.0 + calibration.annual_return).powf(1.0 / 12.0) - 1.0;
    let initial_sigma = calibration.annual_volatility / 12.0_f64.sqrt();
    let soft_cap = settings.soft_cap_k();

    let mut rng = Mulberry32::new(pair_seed(&instrument.id, user_key));
    let mut paths = Vec::with_capacity(settings.trials);
    let mut finals = Vec::with_capacity(settings.trials);
    let mut drawdowns = Vec::with_capacity(settings.trials);

    for _ in 0..settings.trials {
        let mut state = GarchState::new(calibration.garch, initial_sigma);
        let mut value = goal.initial_amount;
        let mut path = Vec::with_capacity(months + 1);
        path.push(value);

        for _ in 0..months {
            let draw = match settings.shock {
                ShockDistribution::Normal => rng.normal(),
                ShockDistribution::StudentT { df } => rng.student_t(df),
            };
            let damped = state.step(draw, soft_cap);
            value = apply_period(
                value,
                goal.monthly_contribution,
                settings.contribution_timing,
                monthly_return + damped,
            );
            path.push(value);
        }

        finals.push(value);
        drawdowns.push(stats::max_drawdown(&path).depth);
        paths.push(path);
    }

    let successes = finals.iter().filter(|&&v| v >= goal.target_amount).count();
    let success_rate = successes as f64 / settings.trials as f64 * 100.0;
    let expected_value = stats::mean(&finals);

    // Annualize each trial so dispersion is comparable across horizons.
    let total_contribution = goal.total_contribution();
    let basis = if goal.initial_amount > 0.0 {
        goal.initial_amount
    } else {
        total_contribution
    };
    let annualized: Vec<f64> = finals
        .iter()
        .map(|&v| {
            if basis > 0.0 {
                (v / basis).powf(1.0 / years) - 1.0
            } else {
                0.0
            }
        })
        .collect();
    let volatility = stats::std_dev(&annualized);
    let computed_sharpe =
        stats::sharpe_ratio(stats::mean(&annualized), volatility, settings.risk_free_rate);
    let sharpe = instrument.stored.usable_sharpe().unwrap_or(computed_sharpe);

    // Tail risk framed as losses against contributed capital, so larger
    // is worse and CVaR >= VaR.
    let tail = stats::var_cvar(&finals, settings.confidence_level);
    let var_95 = (total_contribution - tail.var).round();
    let cvar_95 = (total_contribution - tail.cvar).round();

    let max_drawdown = instrument
        .stored
        .usable_max_drawdown()
        .unwrap_or_else(|| stats::mean(&drawdowns));
    let max_drawdown = round1(max_drawdown * 100.0);
    let risk_adjusted_return = round1(sharpe * success_rate / 100.0);

    let chart = report::build_chart(&paths, goal, settings, &mut rng);

    Some(SimulatedInstrument {
        instrument_id: instrument.id.clone(),
        name: instrument.name.clone(),
        asset_class: instrument.asset_class.clone(),
        theme: instrument.theme.clone(),
        success_rate,
        successes,
        trials: settings.trials,
        expected_value,
        volatility,
        sharpe,
        personal_score,
        detail: StrategyDetail::MonteCarlo {
            trials: settings.trials,
            market_regime: calibration.regime,
            asset_class: calibration.asset_class,
            garch: calibration.garch,
            data_quality: calibration.data_quality,
            var_95,
            cvar_95,
            max_drawdown,
            risk_adjusted_return,
        },
        chart: Some(chart),
    })
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
