//! Image generation service.
//!
//! Validates the request, makes a single broker call, maps and validates the
//! response, and classifies any failure along the way.

pub mod exceptions;
pub mod validations;


use std::sync::Arc;

use chrono::DateTime;

use self::exceptions::{classify, GenerationFailure, ImageGenerationError};
use crate::model::returns_base64_only;
use crate::models::{
    ImageGeneration, ImageGenerationRequest, ImageGenerationResponse, ImageGenerationResult,
    ResponseFormat,
};
use crate::ports::{ExternalImageGenerationRequest, ExternalImageGenerationResponse, OpenAiBroker};

/// Generates images through an [`OpenAiBroker`].
///
/// Holds no per-call state; a single instance can serve concurrent callers.
#[derive(Clone)]
pub struct ImageGenerationService {
    broker: Arc<dyn OpenAiBroker>,
}

impl ImageGenerationService {
    /// Create a service backed by the given broker.
    #[must_use]
    pub fn new(broker: Arc<dyn OpenAiBroker>) -> Self {
        Self { broker }
    }

    /// Generate the images described by `generation.request`.
    ///
    /// The broker is called at most once. On success the returned generation
    /// carries the response.
    ///
    /// # Errors
    ///
    /// Returns one of the four [`ImageGenerationError`] categories.
    pub async fn generate_image(
        &self,
        generation: ImageGeneration,
    ) -> Result<ImageGeneration, ImageGenerationError> {
        tracing::debug!(
            model = %generation.request.model,
            count = generation.request.images_count,
            size = generation.request.size.as_str(),
            "generating images"
        );

        match self.try_generate(generation).await {
            Ok(generated) => {
                tracing::debug!(
                    results = generated.response.as_ref().map_or(0, |r| r.results.len()),
                    "image generation completed"
                );
                Ok(generated)
            }
            Err(failure) => {
                let error = classify(&failure);
                let cause = error.cause().map_or_else(String::new, ToString::to_string);
                tracing::warn!(
                    category = error.category(),
                    cause = %cause,
                    error = %error,
                    "image generation failed"
                );
                Err(error)
            }
        }
    }

    async fn try_generate(
        &self,
        generation: ImageGeneration,
    ) -> Result<ImageGeneration, GenerationFailure> {
        let ImageGeneration { request, .. } = generation;
        validations::validate_on_generate(&request)?;

        let external_request = to_external_request(&request);
        let external_response = self
            .broker
            .post_image_generation_request(&external_request)
            .await?;

        let response = to_response(external_response)?;
        validations::validate_on_generated(&request, &response)?;

        Ok(ImageGeneration {
            request,
            response: Some(response),
        })
    }
}

fn to_external_request(request: &ImageGenerationRequest) -> ExternalImageGenerationRequest {
    let response_format = if returns_base64_only(&request.model) {
        None
    } else {
        Some(
            match request.response_format {
                ResponseFormat::Url => "url",
                ResponseFormat::B64Json => "b64_json",
            }
            .to_string(),
        )
    };

    ExternalImageGenerationRequest {
        prompt: request.prompt.clone(),
        model: Some(request.model.clone()),
        n: request.images_count,
        size: request.size.as_str().to_string(),
        response_format,
        user: request.user.clone(),
    }
}

fn to_response(
    external: ExternalImageGenerationResponse,
) -> Result<ImageGenerationResponse, GenerationFailure> {
    let timestamp = external.created;
    let created = DateTime::from_timestamp(timestamp, 0).ok_or_else(|| {
        GenerationFailure::Mapping(format!("created timestamp {timestamp} is out of range"))
    })?;

    let results = external
        .data
        .into_iter()
        .map(|data| ImageGenerationResult {
            url: data.url,
            base64_image: data.b64_json,
            revised_prompt: data.revised_prompt,
        })
        .collect();

    Ok(ImageGenerationResponse { created, results })
}
