//! Model name resolution and per-model capabilities.

use crate::models::ResponseFormat;

/// Short name aliases for the image models.
const ALIASES: &[(&str, &str)] = &[
    ("gpt-1", "gpt-image-1"),
    ("gpt-1-mini", "gpt-image-1-mini"),
    ("dall-e", "dall-e-3"),
    ("dalle-2", "dall-e-2"),
    ("dalle-3", "dall-e-3"),
];

/// Resolve a model name (alias or exact) to the full model identifier.
#[must_use]
pub fn resolve_model(name: &str) -> String {
    ALIASES
        .iter()
        .find(|&&(alias, _)| alias == name)
        .map_or_else(|| name.to_string(), |&(_, full)| full.to_string())
}

/// Whether the model always returns base64 data regardless of the requested format.
#[must_use]
pub fn returns_base64_only(model: &str) -> bool {
    model.starts_with("gpt-image")
}

/// The response format actually used for `model`.
///
/// GPT image models cannot return URLs, so they always answer in base64.
#[must_use]
pub fn effective_response_format(requested: ResponseFormat, model: &str) -> ResponseFormat {
    if returns_base64_only(model) {
        ResponseFormat::B64Json
    } else {
        requested
    }
}
