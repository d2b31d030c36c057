//! Failure classification for image generations.
//!
//! Every failure observed while generating is turned into exactly one
//! [`ImageGenerationError`] by [`classify`]. Callers only ever see those four
//! categories; raw transport and validation failures never escape.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::ports::{TransportError, TransportErrorKind};

/// Every field-level violation found in one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationFailure {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationFailure {
    /// An empty failure with no violations recorded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation against `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Builder form of [`ValidationFailure::add`].
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.add(field, message);
        self
    }

    /// Whether no violations were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Violations keyed by field name.
    #[must_use]
    pub fn errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }

    /// Violations recorded for a single field.
    #[must_use]
    pub fn field(&self, field: &str) -> &[String] {
        self.errors.get(field).map_or(&[], Vec::as_slice)
    }

    /// `Ok(())` when nothing was recorded, otherwise the whole failure.
    ///
    /// # Errors
    ///
    /// Returns `self` if at least one violation was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{field}: {}", messages.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

/// A failure that is neither a validation problem nor a known transport condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnexpectedFailure {
    /// The broker failed in a way the classification table has no row for.
    #[error(transparent)]
    Transport(TransportError),
    /// The broker's response could not be mapped onto the domain model.
    #[error("failed to map response: {0}")]
    Mapping(String),
}

/// The specific reason an image generation failed, paired with the originating failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageGenerationCause {
    /// The endpoint or model does not exist.
    #[error("image generation not found")]
    NotFound(#[source] TransportError),
    /// Credentials were missing, invalid or lacked permission.
    #[error("unauthorized image generation request")]
    Unauthorized(#[source] TransportError),
    /// The API rejected the request body.
    #[error("invalid image generation request")]
    InvalidRequest(#[source] TransportError),
    /// The resource is locked or in conflict.
    #[error("image generation is locked")]
    Locked(#[source] TransportError),
    /// Rate limit or quota exceeded.
    #[error("excessive image generation calls")]
    ExcessiveCall(#[source] TransportError),
    /// The endpoint or request configuration is invalid.
    #[error("invalid image generation configuration")]
    InvalidConfiguration(#[source] TransportError),
    /// The API failed internally.
    #[error("image generation server error")]
    ServerError(#[source] TransportError),
    /// The API did not answer in time.
    #[error("image generation timed out")]
    Timeout(#[source] TransportError),
    /// Nothing in the classification table matched.
    #[error("failed image generation")]
    Uncategorized(#[source] UnexpectedFailure),
}

/// The four failure categories visible to callers.
///
/// `DependencyValidation` means the request or local configuration must be
/// fixed before trying again. `Dependency` means the remote side or the
/// network is at fault.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageGenerationError {
    /// The input failed structural checks.
    #[error("image generation validation error: {0}")]
    Validation(#[source] ValidationFailure),
    /// The API rejected the request for a reason the caller can fix.
    #[error("image generation dependency validation error: {0}")]
    DependencyValidation(#[source] ImageGenerationCause),
    /// The API or network failed for a reason outside the caller's control.
    #[error("image generation dependency error: {0}")]
    Dependency(#[source] ImageGenerationCause),
    /// A failure the classification table does not cover.
    #[error("image generation service error: {0}")]
    Service(#[source] ImageGenerationCause),
}

impl ImageGenerationError {
    /// Short category name, used as a structured log field.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::DependencyValidation(_) => "dependency_validation",
            Self::Dependency(_) => "dependency",
            Self::Service(_) => "service",
        }
    }

    /// The wrapped cause, for every category except `Validation`.
    #[must_use]
    pub fn cause(&self) -> Option<&ImageGenerationCause> {
        match self {
            Self::Validation(_) => None,
            Self::DependencyValidation(cause) | Self::Dependency(cause) | Self::Service(cause) => {
                Some(cause)
            }
        }
    }
}

/// A failure as observed during one generation, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationFailure {
    /// Pre- or post-call structural validation failed.
    Validation(ValidationFailure),
    /// The broker call failed.
    Transport(TransportError),
    /// The broker's response could not be mapped.
    Mapping(String),
}

impl From<ValidationFailure> for GenerationFailure {
    fn from(failure: ValidationFailure) -> Self {
        Self::Validation(failure)
    }
}

impl From<TransportError> for GenerationFailure {
    fn from(error: TransportError) -> Self {
        Self::Transport(error)
    }
}

/// Map an observed failure onto exactly one caller-visible category.
#[must_use]
pub fn classify(failure: &GenerationFailure) -> ImageGenerationError {
    match failure {
        GenerationFailure::Validation(failure) => ImageGenerationError::Validation(failure.clone()),
        GenerationFailure::Transport(error) => classify_transport(error),
        GenerationFailure::Mapping(reason) => ImageGenerationError::Service(
            ImageGenerationCause::Uncategorized(UnexpectedFailure::Mapping(reason.clone())),
        ),
    }
}

fn classify_transport(error: &TransportError) -> ImageGenerationError {
    use ImageGenerationCause as Cause;
    use ImageGenerationError as Category;
    use TransportErrorKind as Kind;

    let source = error.clone();
    match error.kind {
        Kind::NotFound => Category::DependencyValidation(Cause::NotFound(source)),
        Kind::Unauthorized | Kind::Forbidden => Category::Dependency(Cause::Unauthorized(source)),
        Kind::BadRequest => Category::DependencyValidation(Cause::InvalidRequest(source)),
        Kind::Conflict | Kind::Locked => Category::DependencyValidation(Cause::Locked(source)),
        Kind::TooManyRequests => Category::DependencyValidation(Cause::ExcessiveCall(source)),
        Kind::UnprocessableEntity => {
            Category::DependencyValidation(Cause::InvalidConfiguration(source))
        }
        Kind::ServerError => Category::Dependency(Cause::ServerError(source)),
        Kind::UrlNotFound | Kind::Unreachable => {
            Category::Dependency(Cause::InvalidConfiguration(source))
        }
        Kind::Timeout => Category::Dependency(Cause::Timeout(source)),
        Kind::MalformedResponse | Kind::Unrecognized => {
            Category::Service(Cause::Uncategorized(UnexpectedFailure::Transport(source)))
        }
    }
}
