//! Services sitting between callers and the brokers.

pub mod image_generations;

pub use image_generations::exceptions::{
    ImageGenerationCause, ImageGenerationError, UnexpectedFailure, ValidationFailure,
};
pub use image_generations::ImageGenerationService;
