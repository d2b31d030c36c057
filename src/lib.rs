//! `OpenAI` image generation with categorized failure handling.
//!
//! [`services::ImageGenerationService`] validates a request, makes one call
//! through an [`ports::OpenAiBroker`], and reports any failure as one of four
//! [`services::ImageGenerationError`] categories.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod model;
pub mod models;
pub mod output;
pub mod params;
pub mod ports;
pub mod services;
