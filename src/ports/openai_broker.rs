//! Broker port for the `OpenAI` Images API.
//!
//! The broker performs exactly one HTTP exchange per call and reports
//! failures as a [`TransportError`]; it never interprets them.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire shape of `POST /images/generations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalImageGenerationRequest {
    /// Text prompt.
    pub prompt: String,
    /// Model identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Number of images.
    pub n: u32,
    /// Dimensions, e.g. `"1024x1024"`.
    pub size: String,
    /// `"url"` or `"b64_json"`; omitted for models that always return base64.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<String>,
    /// End-user identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

/// Wire shape of a successful Images API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalImageGenerationResponse {
    /// Unix timestamp in seconds.
    pub created: i64,
    /// Generated images.
    #[serde(default)]
    pub data: Vec<ExternalImageData>,
}

/// One generated image on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalImageData {
    /// Hosted image URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Base64 image bytes.
    #[serde(default)]
    pub b64_json: Option<String>,
    /// Prompt as rewritten by the model.
    #[serde(default)]
    pub revised_prompt: Option<String>,
}

/// What went wrong at the transport level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportErrorKind {
    /// HTTP 400.
    BadRequest,
    /// HTTP 401.
    Unauthorized,
    /// HTTP 403.
    Forbidden,
    /// HTTP 404.
    NotFound,
    /// HTTP 409.
    Conflict,
    /// HTTP 422.
    UnprocessableEntity,
    /// HTTP 423.
    Locked,
    /// HTTP 429.
    TooManyRequests,
    /// Any HTTP 5xx.
    ServerError,
    /// The endpoint URL could not be resolved or is malformed.
    UrlNotFound,
    /// The host could not be reached (DNS or connection failure).
    Unreachable,
    /// No response within the configured timeout.
    Timeout,
    /// A success status whose body could not be decoded.
    MalformedResponse,
    /// Any other failure, including unmapped status codes.
    Unrecognized,
}

impl TransportErrorKind {
    /// Map an HTTP status code to a transport failure kind.
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict,
            422 => Self::UnprocessableEntity,
            423 => Self::Locked,
            429 => Self::TooManyRequests,
            500..=599 => Self::ServerError,
            _ => Self::Unrecognized,
        }
    }
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::BadRequest => "bad request",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not found",
            Self::Conflict => "conflict",
            Self::UnprocessableEntity => "unprocessable entity",
            Self::Locked => "locked",
            Self::TooManyRequests => "too many requests",
            Self::ServerError => "server error",
            Self::UrlNotFound => "url not found",
            Self::Unreachable => "unreachable",
            Self::Timeout => "timeout",
            Self::MalformedResponse => "malformed response",
            Self::Unrecognized => "unrecognized failure",
        };
        f.write_str(name)
    }
}

/// A failure raised by a broker.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {}", .message.as_deref().unwrap_or("no details"))]
pub struct TransportError {
    /// Failure classification.
    pub kind: TransportErrorKind,
    /// HTTP status, when a response was received.
    #[serde(default)]
    pub status: Option<u16>,
    /// Response body or transport diagnostic.
    #[serde(default)]
    pub message: Option<String>,
}

impl TransportError {
    /// A failure of the given kind with no status or message.
    #[must_use]
    pub fn new(kind: TransportErrorKind) -> Self {
        Self {
            kind,
            status: None,
            message: None,
        }
    }

    /// A failure derived from a non-success HTTP response.
    #[must_use]
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            kind: TransportErrorKind::from_status(status),
            status: Some(status),
            message: (!body.is_empty()).then_some(body),
        }
    }

    /// Attach a diagnostic message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

/// Boxed future type returned by [`OpenAiBroker::post_image_generation_request`].
pub type BrokerFuture<'a> = Pin<
    Box<dyn Future<Output = Result<ExternalImageGenerationResponse, TransportError>> + Send + 'a>,
>;

/// Performs calls against the `OpenAI` API.
pub trait OpenAiBroker: Send + Sync {
    /// Post a single image generation request.
    fn post_image_generation_request(
        &self,
        request: &ExternalImageGenerationRequest,
    ) -> BrokerFuture<'_>;
}
