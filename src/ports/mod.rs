//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the application core and an
//! external system. Implementations live in `src/adapters/`.

pub mod openai_broker;

pub use openai_broker::{
    BrokerFuture, ExternalImageData, ExternalImageGenerationRequest,
    ExternalImageGenerationResponse, OpenAiBroker, TransportError, TransportErrorKind,
};
