//! Goal-based investment simulation library
//!
//! This crate answers one question: given a savings goal and a universe of
//! investable instruments with price history, which instruments are most
//! likely to reach the target? It supports:
//! - Monte Carlo simulation with GARCH(1,1) volatility clustering and
//!   soft-capped normal or Student-t shocks
//! - Historical sliding-window replay as a deterministic alternative
//! - Market-regime classification and data-quality-weighted calibration
//! - Success rates with Wilson confidence intervals, VaR/CVaR tail risk,
//!   drawdown and Sharpe statistics
//! - Cross-run Sharpe normalization and composite goal scoring
//! - Chart-ready fan bands and representative paths per instrument
//!
//! Runs are reproducible: every instrument's random stream is seeded from
//! its id and the user key, so the same inputs rank the same bit for bit.
//!
//! # Running a recommendation
//!
//! ```ignore
//! use goalsim_core::{
//!     EngineSettings, Goal, InvestorProfile, RunProgress, SimulationStrategy, recommend,
//! };
//!
//! let universe = goalsim_core::synthetic::benchmark_universe(50, 5)?;
//! let goal = Goal {
//!     target_amount: 1_000_000.0,
//!     years: 5,
//!     initial_amount: 100_000.0,
//!     monthly_contribution: 10_000.0,
//! };
//! let result = recommend(
//!     &universe,
//!     &goal,
//!     &InvestorProfile::default(),
//!     SimulationStrategy::MonteCarlo,
//!     &EngineSettings::default(),
//!     &RunProgress::default(),
//! )?;
//! for pick in &result.recommendations {
//!     println!("{} {:.1}%", pick.instrument_id, pick.success_rate);
//! }
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod error;
pub mod garch;
pub mod quality;
pub mod random;
pub mod recommend;
pub mod regime;
pub mod report;
pub mod stats;
pub mod strategy;
pub mod synthetic;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod config;
pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use config::{ContributionTiming, EngineSettings, ShockDistribution};
pub use error::{EngineError, GoalError, Result};
pub use model::{Goal, InstrumentResult, InvestorProfile, RunMeta, RunResult, Universe};
pub use recommend::recommend;
pub use strategy::{RunProgress, SimulationStrategy};
