//! Recording adapter for the `OpenAiBroker` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::openai_broker::{BrokerFuture, ExternalImageGenerationRequest, OpenAiBroker};

/// Records broker interactions while delegating to an inner broker.
pub struct RecordingOpenAiBroker {
    inner: Arc<dyn OpenAiBroker>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingOpenAiBroker {
    /// Wrap `inner`, writing every call and its outcome to `recorder`.
    #[must_use]
    pub fn new(inner: Arc<dyn OpenAiBroker>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl OpenAiBroker for RecordingOpenAiBroker {
    fn post_image_generation_request(
        &self,
        request: &ExternalImageGenerationRequest,
    ) -> BrokerFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let result = self.inner.post_image_generation_request(&request).await;
            record_result(
                &self.recorder,
                "openai_broker",
                "post_image_generation_request",
                &request,
                &result,
            );
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::adapters::replaying::openai_broker::ReplayingOpenAiBroker;
    use crate::cassette::config::load_cassette;
    use crate::ports::{ExternalImageData, ExternalImageGenerationResponse, TransportError};

    type Outcome = Result<ExternalImageGenerationResponse, TransportError>;

    /// Hands out queued outcomes, one per call.
    struct QueuedBroker {
        outcomes: Mutex<VecDeque<Outcome>>,
    }

    impl OpenAiBroker for QueuedBroker {
        fn post_image_generation_request(
            &self,
            _request: &ExternalImageGenerationRequest,
        ) -> BrokerFuture<'_> {
            let outcome = self.outcomes.lock().unwrap().pop_front().unwrap();
            Box::pin(async move { outcome })
        }
    }

    fn request(prompt: &str) -> ExternalImageGenerationRequest {
        ExternalImageGenerationRequest {
            prompt: prompt.into(),
            model: Some("dall-e-3".into()),
            n: 1,
            size: "1024x1024".into(),
            response_format: Some("url".into()),
            user: None,
        }
    }

    fn hosted_image() -> ExternalImageGenerationResponse {
        ExternalImageGenerationResponse {
            created: 1_700_000_000,
            data: vec![ExternalImageData {
                url: Some("https://images/1.png".into()),
                b64_json: None,
                revised_prompt: Some("a lighthouse at dusk".into()),
            }],
        }
    }

    #[tokio::test]
    async fn recorded_outcomes_replay_unchanged() {
        let dir = std::env::temp_dir().join("imagen_openai_recording_test");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("broker.cassette.yaml");

        let rate_limited = TransportError::from_status(429, "slow down");
        let inner = QueuedBroker {
            outcomes: Mutex::new(VecDeque::from([
                Ok(hosted_image()),
                Err(rate_limited.clone()),
            ])),
        };
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&path, "rec", "abc")));
        let broker = RecordingOpenAiBroker::new(Arc::new(inner), Arc::clone(&recorder));

        let first = broker.post_image_generation_request(&request("a lighthouse"));
        assert_eq!(first.await.unwrap(), hosted_image());
        let second = broker.post_image_generation_request(&request("a harbor"));
        assert_eq!(second.await.unwrap_err(), rate_limited);
        drop(broker);

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        assert_eq!(recorder.len(), 2);
        recorder.finish().unwrap();

        let replayer = load_cassette(&path).unwrap();
        let replaying = ReplayingOpenAiBroker::new(Arc::new(Mutex::new(replayer)));
        let replayed = replaying.post_image_generation_request(&request("a lighthouse"));
        assert_eq!(replayed.await.unwrap(), hosted_image());
        let replayed = replaying.post_image_generation_request(&request("a harbor"));
        assert_eq!(replayed.await.unwrap_err(), rate_limited);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn failures_are_recorded_structurally() {
        let dir = std::env::temp_dir().join("imagen_openai_recording_err");
        let _ = std::fs::remove_dir_all(&dir);
        let recorder = CassetteRecorder::new(dir.join("err.cassette.yaml"), "rec", "abc");
        let recorder = Arc::new(Mutex::new(recorder));
        let not_found = TransportError::from_status(404, "no such model");
        let inner = QueuedBroker {
            outcomes: Mutex::new(VecDeque::from([Err(not_found)])),
        };
        let broker = RecordingOpenAiBroker::new(Arc::new(inner), Arc::clone(&recorder));

        let result = broker
            .post_image_generation_request(&request("a cat"))
            .await;
        assert!(result.is_err());
        drop(broker);

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        let path = recorder.finish().unwrap();
        let yaml = std::fs::read_to_string(path).unwrap();
        assert!(yaml.contains("kind: not_found"), "{yaml}");
        assert!(yaml.contains("status: 404"), "{yaml}");
        assert!(yaml.contains("message: no such model"), "{yaml}");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
