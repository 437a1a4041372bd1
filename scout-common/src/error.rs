//! Error types for Market Scout.

use thiserror::Error;

/// Result type alias using the Scout error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for Scout services.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Create an error with additional context.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Check if this is a configuration error.
    pub fn is_config(&self) -> bool {
        match self {
            Self::Config(_) => true,
            Self::WithContext { source, .. } => source.is_config(),
        }
    }

    /// Process exit code for this error when surfaced by a binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::WithContext { source, .. } => source.exit_code(),
        }
    }
}

/// Extension trait for adding context to any error type.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }
}
