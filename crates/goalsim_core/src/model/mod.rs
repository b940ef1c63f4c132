mod goal;
mod instrument;
mod results;

pub use goal::{Goal, InvestorProfile};
pub use instrument::{Instrument, PricePoint, ScoreCard, ScoreWeights, StoredMetrics, Universe};
pub use results::{
    ChartData, FanBands, InstrumentResult, PathKind, PathSample, Reliability, RunMeta, RunResult,
    StrategyDetail,
};
