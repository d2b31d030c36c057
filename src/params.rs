//! Parameter translation between CLI inputs and API values.

use crate::model::returns_base64_only;
use crate::models::{ImageSize, ResponseFormat};

/// Parse an explicit size such as `"1024x1024"` or `"auto"`.
///
/// # Errors
///
/// Returns an error if the size is not one the Images API accepts.
pub fn parse_size(size: &str) -> Result<ImageSize, String> {
    match size {
        "256x256" => Ok(ImageSize::Square256),
        "512x512" => Ok(ImageSize::Square512),
        "1024x1024" => Ok(ImageSize::Square1024),
        "1536x1024" => Ok(ImageSize::Landscape1536),
        "1024x1536" => Ok(ImageSize::Portrait1536),
        "1792x1024" => Ok(ImageSize::Landscape1792),
        "1024x1792" => Ok(ImageSize::Portrait1792),
        "auto" => Ok(ImageSize::Auto),
        _ => Err(format!(
            "Unsupported size '{size}'. Valid: 256x256, 512x512, 1024x1024, 1536x1024, \
             1024x1536, 1792x1024, 1024x1792, auto"
        )),
    }
}

/// Translate an aspect ratio into the closest size the model supports.
///
/// # Errors
///
/// Returns an error if the ratio is not recognized.
pub fn aspect_ratio_to_size(ratio: &str, model: &str) -> Result<ImageSize, String> {
    let shape = match ratio {
        "1:1" => Shape::Square,
        "16:9" | "3:2" | "4:3" | "21:9" | "5:4" => Shape::Landscape,
        "9:16" | "2:3" | "3:4" | "4:5" => Shape::Portrait,
        _ => return Err(format!("Unsupported aspect ratio '{ratio}'")),
    };

    let size = match shape {
        Shape::Square => ImageSize::Square1024,
        Shape::Landscape if returns_base64_only(model) => ImageSize::Landscape1536,
        Shape::Portrait if returns_base64_only(model) => ImageSize::Portrait1536,
        Shape::Landscape if model.starts_with("dall-e-3") => ImageSize::Landscape1792,
        Shape::Portrait if model.starts_with("dall-e-3") => ImageSize::Portrait1792,
        Shape::Landscape | Shape::Portrait => {
            return Err(format!("Model '{model}' only supports square images"));
        }
    };
    Ok(size)
}

enum Shape {
    Square,
    Landscape,
    Portrait,
}

/// Parse the response format.
///
/// # Errors
///
/// Returns an error if the format is not recognized.
pub fn parse_response_format(format: &str) -> Result<ResponseFormat, String> {
    match format {
        "url" => Ok(ResponseFormat::Url),
        "b64_json" | "b64" => Ok(ResponseFormat::B64Json),
        _ => Err(format!(
            "Unsupported response format '{format}'. Valid: url, b64_json"
        )),
    }
}
