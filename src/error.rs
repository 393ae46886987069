//! Error types.
//!
//! Two layers:
//!
//! - core failures (`FetchError`, `SchemaError`, `DivisionUndefined`,
//!   `DataError`) are plain values returned to the caller so a view can degrade
//!   to "no data" instead of aborting
//! - `AppError` carries a process exit code and is only produced at the CLI/TUI
//!   boundary

use crate::domain::CountryCode;

/// Process-level error: a message plus the exit code the binary returns.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    pub fn no_data(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Failure to retrieve or decode a remote dataset.
///
/// Cloneable because the fetch cache hands the same failure to every caller
/// asking for the same resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Transport-level failure: connection, DNS, timeout, or non-2xx status.
    Network { resource: String, message: String },
    /// The body arrived but is not well-formed CSV.
    Parse { resource: String, message: String },
}

impl FetchError {
    pub fn resource(&self) -> &str {
        match self {
            FetchError::Network { resource, .. } | FetchError::Parse { resource, .. } => resource,
        }
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Network { resource, message } => {
                write!(f, "Failed to fetch {resource}: {message}")
            }
            FetchError::Parse { resource, message } => {
                write!(f, "Failed to parse {resource}: {message}")
            }
        }
    }
}

impl std::error::Error for FetchError {}

/// The table does not carry a column the normalizer requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    MissingColumn { column: &'static str },
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaError::MissingColumn { column } => {
                write!(f, "Missing required column: `{column}`")
            }
        }
    }
}

impl std::error::Error for SchemaError {}

/// A ratio whose denominator is zero or whose operands are not both numeric.
///
/// Kept distinct from a legitimate `0.0` so callers can render "N/A".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DivisionUndefined {
    ZeroDenominator,
    MissingOperand,
}

impl std::fmt::Display for DivisionUndefined {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DivisionUndefined::ZeroDenominator => write!(f, "undefined (zero base)"),
            DivisionUndefined::MissingOperand => write!(f, "undefined (non-numeric operand)"),
        }
    }
}

impl std::error::Error for DivisionUndefined {}

/// Fetch or schema failure for one country's dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    Fetch(FetchError),
    Schema { country: CountryCode, source: SchemaError },
}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataError::Fetch(e) => write!(f, "{e}"),
            DataError::Schema { country, source } => {
                write!(f, "Dataset for {country} is unusable: {source}")
            }
        }
    }
}

impl std::error::Error for DataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataError::Fetch(e) => Some(e),
            DataError::Schema { source, .. } => Some(source),
        }
    }
}

impl From<FetchError> for DataError {
    fn from(e: FetchError) -> Self {
        DataError::Fetch(e)
    }
}

impl From<DataError> for AppError {
    fn from(e: DataError) -> Self {
        match e {
            DataError::Fetch(_) => AppError::new(4, e.to_string()),
            DataError::Schema { .. } => AppError::new(3, e.to_string()),
        }
    }
}
