//! Error types and handling for the `nomenclator` pipeline

use std::fmt;

use thiserror::Error;

/// Which external lookup a resolver failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverKind {
    /// Reverse geocoding (coordinates to place name)
    Place,
    /// Historical weather for a date
    Weather,
}

impl fmt::Display for ResolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolverKind::Place => write!(f, "place"),
            ResolverKind::Weather => write!(f, "weather"),
        }
    }
}

/// Main error type for the `nomenclator` application
#[derive(Error, Debug)]
pub enum NomenclatorError {
    /// Malformed or missing row fields
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// A place or weather lookup failed
    #[error("{resolver} lookup failed: {source:#}")]
    Resolver {
        resolver: ResolverKind,
        #[source]
        source: anyhow::Error,
    },

    /// No row enriched successfully, so no title can be produced
    #[error("No photo could be enriched; unable to produce a title")]
    EmptyResult,

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// API communication errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Input file could not be read as CSV
    #[error("Input error: {source}")]
    Input {
        #[from]
        source: csv::Error,
    },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl NomenclatorError {
    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Wrap a failure coming from one of the resolvers
    pub fn resolver(resolver: ResolverKind, source: anyhow::Error) -> Self {
        Self::Resolver { resolver, source }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            NomenclatorError::Parse { message } => format!("Invalid photo record: {message}"),
            NomenclatorError::Resolver { resolver, .. } => {
                format!("Unable to look up {resolver} data. Please check your API keys and internet connection.")
            }
            NomenclatorError::EmptyResult => {
                "None of the photos could be processed, so no title was generated.".to_string()
            }
            NomenclatorError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            NomenclatorError::Api { .. } => {
                "Unable to connect to external services. Please check your internet connection."
                    .to_string()
            }
            NomenclatorError::Input { .. } => {
                "The input file is not a valid CSV file.".to_string()
            }
            NomenclatorError::Io { .. } => {
                "File operation failed. Please check the path and file permissions.".to_string()
            }
        }
    }
}

/// A failure tied to the input row it came from
#[derive(Error, Debug)]
#[error("invalid photo at row {row}: {source}")]
pub struct RowError {
    /// 1-based position of the row in the input
    pub row: usize,
    #[source]
    pub source: NomenclatorError,
}

impl RowError {
    #[must_use]
    pub fn new(row: usize, source: NomenclatorError) -> Self {
        Self { row, source }
    }
}
