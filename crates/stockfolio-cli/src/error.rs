use thiserror::Error;

use stockfolio_core::{ConfigError, LoggingError, MarketDataError, ValidationError};

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Unavailable(MarketDataError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<MarketDataError> for CliError {
    fn from(error: MarketDataError) -> Self {
        match error {
            MarketDataError::InvalidInput(validation) => Self::Validation(validation),
            unavailable @ MarketDataError::ServiceUnavailable { .. } => {
                Self::Unavailable(unavailable)
            }
        }
    }
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Config(_) => 3,
            Self::Logging(_) => 3,
            Self::NotFound(_) => 4,
            Self::Unavailable(_) => 5,
            Self::Serialization(_) => 6,
            Self::Io(_) => 10,
        }
    }
}
