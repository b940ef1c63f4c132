use std::fmt;

/// Errors raised while validating a savings goal before any simulation work
#[derive(Debug, Clone, PartialEq)]
pub enum GoalError {
    NonPositiveTarget(f64),
    HorizonOutOfRange { years: u32, max_years: u32 },
    NegativeInitialAmount(f64),
    NegativeContribution(f64),
}

impl fmt::Display for GoalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalError::NonPositiveTarget(amount) => {
                write!(f, "target amount must be positive, got {amount}")
            }
            GoalError::HorizonOutOfRange { years, max_years } => {
                write!(f, "target horizon {years}y outside 1..={max_years}y")
            }
            GoalError::NegativeInitialAmount(amount) => {
                write!(f, "initial amount must be non-negative, got {amount}")
            }
            GoalError::NegativeContribution(amount) => {
                write!(f, "monthly contribution must be non-negative, got {amount}")
            }
        }
    }
}

impl std::error::Error for GoalError {}

/// Errors raised by the recommendation engine
#[derive(Debug, Clone)]
pub enum EngineError {
    Goal(GoalError),
    InvalidDistributionParameters {
        distribution: &'static str,
        mean: f64,
        std_dev: f64,
        reason: &'static str,
    },
    /// Run was cancelled by caller request between instrument units
    Cancelled,
    /// Settings error
    Settings(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Goal(e) => write!(f, "{e}"),
            EngineError::InvalidDistributionParameters {
                distribution,
                mean,
                std_dev,
                reason,
            } => {
                write!(
                    f,
                    "invalid {distribution} parameters (mean={mean}, std_dev={std_dev}): {reason}"
                )
            }
            EngineError::Cancelled => write!(f, "simulation cancelled"),
            EngineError::Settings(msg) => write!(f, "settings error: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Goal(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GoalError> for EngineError {
    fn from(e: GoalError) -> Self {
        EngineError::Goal(e)
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
