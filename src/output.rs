//! File naming and saving of generated images.

use std::path::{Path, PathBuf};

use base64::Engine;

use crate::error::ImageError;

/// Longest prompt prefix used in generated file names.
const PROMPT_STEM_LEN: usize = 50;

/// Generate an output filename from a prompt, a timestamp and an extension.
#[must_use]
pub fn auto_filename(prompt: &str, extension: &str) -> String {
    let stem = sanitize_for_filename(prompt, PROMPT_STEM_LEN);
    let timestamp = chrono::Utc::now().timestamp();
    format!("{stem}-{timestamp}.{extension}")
}

/// Kebab-case the start of `input`, keeping only ASCII alphanumerics.
///
/// Falls back to `"image"` when nothing usable remains.
#[must_use]
pub fn sanitize_for_filename(input: &str, max_len: usize) -> String {
    let words: Vec<String> = input
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_ascii_lowercase)
        .collect();

    let mut result = String::with_capacity(max_len);
    for word in words {
        let separator = usize::from(!result.is_empty());
        let remaining = max_len.saturating_sub(result.len() + separator);
        if remaining == 0 {
            break;
        }
        if separator == 1 {
            result.push('-');
        }
        result.extend(word.chars().take(remaining));
    }

    if result.is_empty() {
        "image".to_string()
    } else {
        result
    }
}

/// File extension for image bytes, detected from their magic number.
#[must_use]
pub fn sniff_extension(data: &[u8]) -> &'static str {
    match data {
        [0x89, b'P', b'N', b'G', ..] => "png",
        [0xFF, 0xD8, 0xFF, ..] => "jpg",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "webp",
        _ => "png",
    }
}

/// Decode a base64 image payload.
///
/// # Errors
///
/// Returns an error if the payload is not valid base64.
pub fn decode_image(encoded: &str) -> Result<Vec<u8>, ImageError> {
    base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| ImageError::Decode(format!("Failed to decode base64 image: {e}")))
}

/// Save decoded image bytes.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn save_image(data: &[u8], output_path: &Path) -> Result<(), ImageError> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(output_path, data)?;
    Ok(())
}

/// Resolve the output path for image `index` out of `total`.
///
/// An explicit path is used as-is for a single image and gets a `-N` suffix
/// when several images are saved.
#[must_use]
pub fn resolve_output_path(
    explicit: Option<&str>,
    prompt: &str,
    extension: &str,
    index: usize,
    total: usize,
) -> PathBuf {
    let base = match explicit {
        Some(p) => PathBuf::from(p),
        None => PathBuf::from(auto_filename(prompt, extension)),
    };
    if total <= 1 {
        return base;
    }

    let stem = base.file_stem().unwrap_or_default().to_string_lossy();
    let ext = base
        .extension()
        .map_or_else(
            || extension.to_string(),
            |e| e.to_string_lossy().into_owned(),
        );
    base.with_file_name(format!("{stem}-{}.{ext}", index + 1))
}
