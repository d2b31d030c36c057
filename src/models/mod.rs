//! Domain models exposed to callers of the services.

pub mod image_generations;

pub use image_generations::{
    ImageGeneration, ImageGenerationRequest, ImageGenerationResponse, ImageGenerationResult,
    ImageSize, ResponseFormat,
};
