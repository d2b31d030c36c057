//! Live broker for the `OpenAI` Images API.

use std::time::Duration;

use reqwest::Client;

use crate::ports::openai_broker::{
    BrokerFuture, ExternalImageGenerationRequest, ExternalImageGenerationResponse, OpenAiBroker,
    TransportError, TransportErrorKind,
};

/// Default API root.
pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// Connection settings for [`OpenAiHttpBroker`].
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    /// API key sent as a bearer token.
    pub api_key: String,
    /// API root, without a trailing slash.
    pub base_url: String,
    /// Optional `OpenAI-Organization` header value.
    pub organization: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Broker that talks to the `OpenAI` HTTP API.
pub struct OpenAiHttpBroker {
    client: Client,
    settings: OpenAiSettings,
}

impl OpenAiHttpBroker {
    /// Create a broker with the given settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(settings: OpenAiSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self { client, settings })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.settings.base_url.trim_end_matches('/'))
    }
}

impl OpenAiBroker for OpenAiHttpBroker {
    fn post_image_generation_request(
        &self,
        request: &ExternalImageGenerationRequest,
    ) -> BrokerFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let url = self.endpoint("images/generations");
            tracing::debug!(
                %url,
                model = ?request.model,
                n = request.n,
                "posting image generation request"
            );

            let mut builder = self
                .client
                .post(&url)
                .bearer_auth(&self.settings.api_key)
                .json(&request);
            if let Some(ref organization) = self.settings.organization {
                builder = builder.header("OpenAI-Organization", organization);
            }

            let response = builder.send().await.map_err(from_reqwest)?;
            let status = response.status();
            let body = response.text().await.map_err(from_reqwest)?;

            if !status.is_success() {
                tracing::debug!(
                    status = status.as_u16(),
                    "images API returned an error status"
                );
                return Err(TransportError::from_status(status.as_u16(), body));
            }

            let parsed = serde_json::from_str::<ExternalImageGenerationResponse>(&body);
            parsed.map_err(|e| TransportError {
                kind: TransportErrorKind::MalformedResponse,
                status: Some(status.as_u16()),
                message: Some(format!("Failed to parse response: {e}")),
            })
        })
    }
}

/// Translate a reqwest failure that produced no HTTP status.
fn from_reqwest(error: reqwest::Error) -> TransportError {
    let kind = if error.is_timeout() {
        TransportErrorKind::Timeout
    } else if error.is_connect() {
        TransportErrorKind::Unreachable
    } else if error.is_builder() {
        TransportErrorKind::UrlNotFound
    } else if let Some(status) = error.status() {
        TransportErrorKind::from_status(status.as_u16())
    } else {
        TransportErrorKind::Unrecognized
    };
    TransportError {
        kind,
        status: error.status().map(|s| s.as_u16()),
        message: Some(error.to_string()),
    }
}
