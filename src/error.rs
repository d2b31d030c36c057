//! Application-level errors and process exit codes.

use thiserror::Error;

use crate::services::ImageGenerationError;

/// Errors that can stop the `imagen` binary.
#[derive(Debug, Error)]
pub enum ImageError {
    /// Image generation failed; carries the classified category.
    #[error(transparent)]
    Generation(#[from] ImageGenerationError),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A generated image could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// No API key configured.
    #[error("No API key for {provider}. Set {env_var} or add it to config file.")]
    MissingApiKey {
        /// The provider name.
        provider: String,
        /// The environment variable name.
        env_var: String,
    },
}

/// Process exit codes; each failure category gets its own code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Images generated.
    Success = 0,
    /// Configuration, I/O or argument failure outside the service.
    Failure = 1,
    /// The request failed structural validation.
    Validation = 2,
    /// The API rejected the request; fix the request or configuration.
    DependencyValidation = 3,
    /// The API or network failed.
    Dependency = 4,
    /// An unclassified failure.
    Service = 5,
}

impl ExitCode {
    /// Convert to `i32` for use with `std::process::exit`.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl From<&ImageError> for ExitCode {
    fn from(error: &ImageError) -> Self {
        match error {
            ImageError::Generation(ImageGenerationError::Validation(_)) => Self::Validation,
            ImageError::Generation(ImageGenerationError::DependencyValidation(_)) => {
                Self::DependencyValidation
            }
            ImageError::Generation(ImageGenerationError::Dependency(_)) => Self::Dependency,
            ImageError::Generation(ImageGenerationError::Service(_)) => Self::Service,
            _ => Self::Failure,
        }
    }
}
