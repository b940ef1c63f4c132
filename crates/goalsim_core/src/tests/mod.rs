//! Integration tests for the goalsim recommendation engine
//!
//! Tests are organized by topic:
//! - `random` - Seed derivation, the uniform stream and distribution samplers
//! - `stats` - Statistics library
//! - `garch` - GARCH parameter estimation and the path recursion
//! - `regime_quality` - Market regime classification and calibration inputs
//! - `model` - Goal validation, instrument accessors, result serialization
//! - `historical` - Historical sliding-window strategy
//! - `monte_carlo` - Monte Carlo strategy
//! - `report` - Fan bands, path retention and decimation
//! - `recommend` - Full runs: ranking, normalization, progress, cancellation

mod recommend;
mod report;
