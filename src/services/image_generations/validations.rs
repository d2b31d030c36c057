//! Structural checks applied before and after the broker call.
//!
//! Both checks collect every violation before failing.

use super::exceptions::ValidationFailure;
use crate::model::{effective_response_format, returns_base64_only};
use crate::models::{ImageGenerationRequest, ImageGenerationResponse, ResponseFormat};

/// Upper bound the Images API accepts for `n`.
pub const MAX_IMAGES_COUNT: u32 = 10;

const TEXT_REQUIRED: &str = "Text is required";
const VALUE_REQUIRED: &str = "Value is required";

/// Validate a request before it is sent.
///
/// # Errors
///
/// Returns every violated field at once.
pub fn validate_on_generate(request: &ImageGenerationRequest) -> Result<(), ValidationFailure> {
    let mut failure = ValidationFailure::new();

    if is_blank(&request.prompt) {
        failure.add("prompt", TEXT_REQUIRED);
    }
    if is_blank(&request.model) {
        failure.add("model", TEXT_REQUIRED);
    }

    if request.images_count == 0 {
        failure.add("images_count", VALUE_REQUIRED);
    } else if request.images_count > MAX_IMAGES_COUNT {
        failure.add(
            "images_count",
            format!("Value must be between 1 and {MAX_IMAGES_COUNT}"),
        );
    }
    if request.model.starts_with("dall-e-3") && request.images_count > 1 {
        failure.add("images_count", "dall-e-3 generates one image per request");
    }

    if returns_base64_only(&request.model) && request.response_format == ResponseFormat::Url {
        failure.add("response_format", "gpt-image models only return b64_json");
    }

    if request.user.as_deref().is_some_and(is_blank) {
        failure.add("user", TEXT_REQUIRED);
    }

    failure.into_result()
}

/// Validate a mapped response against the request that produced it.
///
/// # Errors
///
/// Returns every violated field at once.
pub fn validate_on_generated(
    request: &ImageGenerationRequest,
    response: &ImageGenerationResponse,
) -> Result<(), ValidationFailure> {
    let mut failure = ValidationFailure::new();

    if response.results.is_empty() {
        failure.add("results", VALUE_REQUIRED);
    } else if response.results.len() > request.images_count as usize {
        failure.add(
            "results",
            format!(
                "Expected at most {} images, received {}",
                request.images_count,
                response.results.len()
            ),
        );
    }

    let format = effective_response_format(request.response_format, &request.model);
    for (i, result) in response.results.iter().enumerate() {
        let (field, value) = match format {
            ResponseFormat::Url => ("url", result.url.as_deref()),
            ResponseFormat::B64Json => ("base64_image", result.base64_image.as_deref()),
        };
        if value.is_none_or(is_blank) {
            failure.add(format!("results[{i}].{field}"), TEXT_REQUIRED);
        }
    }

    failure.into_result()
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::{ImageGenerationResult, ImageSize};

    fn request() -> ImageGenerationRequest {
        ImageGenerationRequest {
            prompt: "a lighthouse at dusk".into(),
            model: "dall-e-2".into(),
            images_count: 2,
            size: ImageSize::Square512,
            response_format: ResponseFormat::Url,
            user: Some("user-42".into()),
        }
    }

    fn url_result(url: &str) -> ImageGenerationResult {
        ImageGenerationResult {
            url: Some(url.into()),
            base64_image: None,
            revised_prompt: None,
        }
    }

    #[test]
    fn valid_request_passes() {
        assert!(validate_on_generate(&request()).is_ok());
    }

    #[test]
    fn reports_every_invalid_field_in_one_pass() {
        let invalid = ImageGenerationRequest {
            prompt: "   ".into(),
            model: String::new(),
            images_count: 0,
            user: Some(" ".into()),
            ..request()
        };

        let failure = validate_on_generate(&invalid).unwrap_err();

        let expected = ValidationFailure::new()
            .with("prompt", TEXT_REQUIRED)
            .with("model", TEXT_REQUIRED)
            .with("images_count", VALUE_REQUIRED)
            .with("user", TEXT_REQUIRED);
        assert_eq!(failure, expected);
        assert_eq!(failure.errors().len(), 4);
    }

    #[test]
    fn images_count_collects_multiple_messages() {
        let invalid = ImageGenerationRequest {
            model: "dall-e-3".into(),
            images_count: 11,
            ..request()
        };
        let failure = validate_on_generate(&invalid).unwrap_err();
        assert_eq!(
            failure.field("images_count"),
            [
                "Value must be between 1 and 10",
                "dall-e-3 generates one image per request"
            ]
        );
    }

    #[test]
    fn gpt_image_rejects_url_format() {
        let invalid = ImageGenerationRequest {
            model: "gpt-image-1".into(),
            ..request()
        };
        let failure = validate_on_generate(&invalid).unwrap_err();
        let fields: Vec<_> = failure.errors().keys().collect();
        assert_eq!(fields, ["response_format"]);
    }

    #[test]
    fn missing_user_is_fine() {
        let request = ImageGenerationRequest {
            user: None,
            ..request()
        };
        assert!(validate_on_generate(&request).is_ok());
    }

    #[test]
    fn generated_response_passes() {
        let response = ImageGenerationResponse {
            created: Utc::now(),
            results: vec![
                url_result("https://img/1.png"),
                url_result("https://img/2.png"),
            ],
        };
        assert!(validate_on_generated(&request(), &response).is_ok());
    }

    #[test]
    fn empty_results_are_rejected() {
        let response = ImageGenerationResponse {
            created: Utc::now(),
            results: vec![],
        };
        let failure = validate_on_generated(&request(), &response).unwrap_err();
        let expected = ValidationFailure::new().with("results", VALUE_REQUIRED);
        assert_eq!(failure, expected);
    }

    #[test]
    fn every_result_missing_its_payload_is_reported() {
        let response = ImageGenerationResponse {
            created: Utc::now(),
            results: vec![
                url_result(""),
                url_result("https://img/2.png"),
                url_result(" "),
            ],
        };
        let failure = validate_on_generated(&request(), &response).unwrap_err();
        assert_eq!(
            failure,
            ValidationFailure::new()
                .with("results", "Expected at most 2 images, received 3")
                .with("results[0].url", TEXT_REQUIRED)
                .with("results[2].url", TEXT_REQUIRED)
        );
    }

    #[test]
    fn gpt_image_results_need_base64() {
        let request = ImageGenerationRequest {
            model: "gpt-image-1".into(),
            response_format: ResponseFormat::B64Json,
            images_count: 1,
            ..request()
        };
        let response = ImageGenerationResponse {
            created: Utc::now(),
            results: vec![url_result("https://x")],
        };
        let failure = validate_on_generated(&request, &response).unwrap_err();
        assert_eq!(failure.field("results[0].base64_image"), [TEXT_REQUIRED]);
    }
}
