//! Domain records for image generation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Image dimensions accepted by the Images API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageSize {
    /// `256x256` (DALL·E 2 only).
    #[serde(rename = "256x256")]
    Square256,
    /// `512x512` (DALL·E 2 only).
    #[serde(rename = "512x512")]
    Square512,
    /// `1024x1024`.
    #[serde(rename = "1024x1024")]
    Square1024,
    /// `1536x1024` (GPT image models).
    #[serde(rename = "1536x1024")]
    Landscape1536,
    /// `1024x1536` (GPT image models).
    #[serde(rename = "1024x1536")]
    Portrait1536,
    /// `1792x1024` (DALL·E 3).
    #[serde(rename = "1792x1024")]
    Landscape1792,
    /// `1024x1792` (DALL·E 3).
    #[serde(rename = "1024x1792")]
    Portrait1792,
    /// Let the model choose.
    #[serde(rename = "auto")]
    Auto,
}

impl ImageSize {
    /// Wire representation of the size.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square256 => "256x256",
            Self::Square512 => "512x512",
            Self::Square1024 => "1024x1024",
            Self::Landscape1536 => "1536x1024",
            Self::Portrait1536 => "1024x1536",
            Self::Landscape1792 => "1792x1024",
            Self::Portrait1792 => "1024x1792",
            Self::Auto => "auto",
        }
    }
}

/// How generated images are returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    /// A hosted URL, valid for a limited time.
    Url,
    /// Inline base64-encoded image bytes.
    B64Json,
}

/// A single image generation: what was asked for and, once generated, what came back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageGeneration {
    /// The generation request.
    pub request: ImageGenerationRequest,
    /// The generated output, `None` until the API has responded.
    #[serde(default)]
    pub response: Option<ImageGenerationResponse>,
}

/// The caller's request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageGenerationRequest {
    /// Text describing the desired image.
    pub prompt: String,
    /// Resolved model identifier (e.g. `"gpt-image-1"`).
    pub model: String,
    /// Number of images to generate.
    pub images_count: u32,
    /// Requested dimensions.
    pub size: ImageSize,
    /// Requested delivery format.
    pub response_format: ResponseFormat,
    /// Optional end-user identifier forwarded for abuse monitoring.
    #[serde(default)]
    pub user: Option<String>,
}

/// The generated output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageGenerationResponse {
    /// When the images were created.
    pub created: DateTime<Utc>,
    /// One entry per generated image.
    pub results: Vec<ImageGenerationResult>,
}

/// A single generated image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageGenerationResult {
    /// Hosted URL, when the response format is [`ResponseFormat::Url`].
    pub url: Option<String>,
    /// Base64 image data, when the response format is [`ResponseFormat::B64Json`].
    pub base64_image: Option<String>,
    /// The prompt as rewritten by the model, if it did so.
    pub revised_prompt: Option<String>,
}

impl ImageGeneration {
    /// Wrap a request that has not been sent yet.
    #[must_use]
    pub fn new(request: ImageGenerationRequest) -> Self {
        Self {
            request,
            response: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_size_serializes_as_dimensions() {
        let json = serde_json::to_string(&ImageSize::Landscape1792).unwrap();
        assert_eq!(json, "\"1792x1024\"");
        assert_eq!(ImageSize::Landscape1792.as_str(), "1792x1024");
    }

    #[test]
    fn response_format_uses_api_names() {
        let b64 = serde_json::to_string(&ResponseFormat::B64Json).unwrap();
        assert_eq!(b64, "\"b64_json\"");
        let url = serde_json::to_string(&ResponseFormat::Url).unwrap();
        assert_eq!(url, "\"url\"");
    }

    #[test]
    fn new_generation_has_no_response() {
        let generation = ImageGeneration::new(ImageGenerationRequest {
            prompt: "a cat".into(),
            model: "dall-e-3".into(),
            images_count: 1,
            size: ImageSize::Square1024,
            response_format: ResponseFormat::Url,
            user: None,
        });
        assert!(generation.response.is_none());
    }
}
