//! Error types for the setbook_core library.

use std::fmt;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for setbook_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A document failed structural or numeric validation
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog loading or consistency error
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Workout store error
    #[error("Store error: {0}")]
    Store(String),
}

/// Why a field was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationReason {
    /// A required field is absent (or an empty string)
    MissingRequired,
    /// A numeric field violates its bound, e.g. `must be >= 0`
    OutOfRange { constraint: &'static str },
    /// An enumerated field holds a value outside its allowed set
    WrongEnumValue {
        value: String,
        allowed: &'static [&'static str],
    },
    /// The value has the wrong shape, e.g. a fractional rep count
    WrongType { expected: &'static str },
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationReason::MissingRequired => write!(f, "required field is missing"),
            ValidationReason::OutOfRange { constraint } => {
                write!(f, "value out of range ({})", constraint)
            }
            ValidationReason::WrongEnumValue { value, allowed } => write!(
                f,
                "'{}' is not one of [{}]",
                value,
                allowed.join(", ")
            ),
            ValidationReason::WrongType { expected } => write!(f, "expected {}", expected),
        }
    }
}

/// A single validation failure, located by its field path
/// (e.g. `exercises[1].sets[0].reps`).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{path}: {reason}")]
pub struct ValidationError {
    pub path: String,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, reason: ValidationReason) -> Self {
        Self {
            path: path.into(),
            reason,
        }
    }

    pub fn missing(path: impl Into<String>) -> Self {
        Self::new(path, ValidationReason::MissingRequired)
    }

    pub fn out_of_range(path: impl Into<String>, constraint: &'static str) -> Self {
        Self::new(path, ValidationReason::OutOfRange { constraint })
    }

    pub fn wrong_enum(
        path: impl Into<String>,
        value: impl Into<String>,
        allowed: &'static [&'static str],
    ) -> Self {
        Self::new(
            path,
            ValidationReason::WrongEnumValue {
                value: value.into(),
                allowed,
            },
        )
    }

    pub fn wrong_type(path: impl Into<String>, expected: &'static str) -> Self {
        Self::new(path, ValidationReason::WrongType { expected })
    }

    /// Prefix the path with an enclosing location, e.g. `[3]` for the
    /// fourth document of a catalog file.
    pub fn nested(self, prefix: &str) -> Self {
        Self {
            path: format!("{}.{}", prefix, self.path),
            reason: self.reason,
        }
    }
}
