//! Replaying adapter for the `OpenAiBroker` port.

use std::sync::{Arc, Mutex};

use super::{next_output, replay_result, Replayed};
use crate::cassette::replayer::CassetteReplayer;
use crate::ports::openai_broker::{
    BrokerFuture, ExternalImageGenerationRequest, ExternalImageGenerationResponse, OpenAiBroker,
    TransportError, TransportErrorKind,
};

/// Serves recorded broker results, including recorded failures, from a cassette.
pub struct ReplayingOpenAiBroker {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingOpenAiBroker {
    /// Create a replaying broker backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl OpenAiBroker for ReplayingOpenAiBroker {
    fn post_image_generation_request(
        &self,
        _request: &ExternalImageGenerationRequest,
    ) -> BrokerFuture<'_> {
        let output = next_output(&self.replayer, "openai_broker", "post_image_generation_request");
        Box::pin(async move {
            let replayed =
                output.and_then(replay_result::<ExternalImageGenerationResponse, TransportError>);
            match replayed {
                Ok(Replayed::Ok(response)) => Ok(response),
                Ok(Replayed::Err(error)) => Err(error),
                Ok(Replayed::Message(message)) | Err(message) => {
                    let error = TransportError::new(TransportErrorKind::Unrecognized);
                    Err(error.with_message(message))
                }
            }
        })
    }
}
