use thiserror::Error;

/// Validation errors for caller-supplied inputs and domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,

    #[error("search query cannot be empty")]
    EmptyQuery,
    #[error("search query length {len} exceeds max {max}")]
    QueryTooLong { len: usize, max: usize },

    #[error("date must be YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
}

/// Startup configuration errors. These are the only process-fatal failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("ALPHA_VANTAGE_API_KEY is not configured")]
    MissingApiKey,
    #[error("invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },
    #[error("failed to build http client: {0}")]
    HttpClient(String),
}

/// Failure modes of a single provider call, visible only inside the core.
///
/// The service collapses every variant into
/// [`MarketDataError::ServiceUnavailable`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("transport failed after {attempts} attempt(s): {message}")]
    Transport { attempts: u32, message: String },
    #[error("provider reported {field}: {message}")]
    Logical { field: &'static str, message: String },
    #[error("unexpected provider payload: {0}")]
    Decode(String),
}

/// Errors crossing the market-data service boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarketDataError {
    #[error(transparent)]
    InvalidInput(#[from] ValidationError),

    #[error("service unavailable: failed to {operation}")]
    ServiceUnavailable { operation: &'static str },
}

impl MarketDataError {
    pub const fn is_service_unavailable(&self) -> bool {
        matches!(self, Self::ServiceUnavailable { .. })
    }
}
