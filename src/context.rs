//! Service context: wires a broker into the services.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::adapters::live::openai::{OpenAiHttpBroker, OpenAiSettings};
use crate::adapters::recording::openai_broker::RecordingOpenAiBroker;
use crate::adapters::replaying::openai_broker::ReplayingOpenAiBroker;
use crate::cassette::config::load_cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::config::Config;
use crate::error::ImageError;
use crate::ports::OpenAiBroker;
use crate::services::ImageGenerationService;

/// Bundles the services available to the application.
pub struct ServiceContext {
    /// Image generation service.
    pub image_generations: ImageGenerationService,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Finish the recording and write the cassette file to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| "Recording adapter still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        recorder
            .finish()
            .map_err(|e| format!("Failed to write cassette: {e}"))
    }
}

impl ServiceContext {
    /// Build a context around an already constructed broker.
    #[must_use]
    pub fn with_broker(broker: Arc<dyn OpenAiBroker>) -> Self {
        Self {
            image_generations: ImageGenerationService::new(broker),
        }
    }

    /// Create a live context backed by the `OpenAI` HTTP API.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not configured or the client cannot be built.
    pub fn live(config: &Config) -> Result<Self, ImageError> {
        Ok(Self::with_broker(live_broker(config)?))
    }

    /// Create a recording context that wraps the live broker with a recorder.
    ///
    /// # Errors
    ///
    /// Returns an error if the live broker cannot be created.
    pub fn recording(config: &Config) -> Result<(Self, RecordingSession), ImageError> {
        let live = live_broker(config)?;

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = PathBuf::from(".imagen/cassettes")
            .join(&timestamp)
            .join("openai_broker.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-openai_broker"),
            get_commit_hash(),
        )));

        let broker = RecordingOpenAiBroker::new(live, Arc::clone(&recorder));
        let session = RecordingSession { recorder };
        Ok((Self::with_broker(Arc::new(broker)), session))
    }

    /// Create a replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, ImageError> {
        let replayer = load_cassette(path)
            .map_err(|e| ImageError::Config(format!("Failed to load cassette: {e}")))?;
        let broker = ReplayingOpenAiBroker::new(Arc::new(Mutex::new(replayer)));
        Ok(Self::with_broker(Arc::new(broker)))
    }
}

fn live_broker(config: &Config) -> Result<Arc<dyn OpenAiBroker>, ImageError> {
    let api_key = config.openai_key().ok_or(ImageError::MissingApiKey {
        provider: "OpenAI".into(),
        env_var: "OPENAI_API_KEY".into(),
    })?;
    let settings = OpenAiSettings {
        api_key,
        base_url: config.base_url(),
        organization: config.organization(),
        timeout: config.timeout(),
    };
    Ok(Arc::new(OpenAiHttpBroker::new(settings)?))
}

/// Get the current git commit hash, or "unknown" if unavailable.
fn get_commit_hash() -> String {
    std::process::Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map_or_else(|| "unknown".to_string(), |s| s.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ImageGeneration, ImageGenerationRequest, ImageSize, ResponseFormat};
    use crate::ports::{
        BrokerFuture, ExternalImageData, ExternalImageGenerationRequest,
        ExternalImageGenerationResponse,
    };

    struct HostedImageBroker;

    impl OpenAiBroker for HostedImageBroker {
        fn post_image_generation_request(
            &self,
            _request: &ExternalImageGenerationRequest,
        ) -> BrokerFuture<'_> {
            Box::pin(async {
                Ok(ExternalImageGenerationResponse {
                    created: 1_700_000_000,
                    data: vec![ExternalImageData {
                        url: Some("https://images/1.png".into()),
                        b64_json: None,
                        revised_prompt: Some("a lighthouse at dusk".into()),
                    }],
                })
            })
        }
    }

    fn generation() -> ImageGeneration {
        ImageGeneration::new(ImageGenerationRequest {
            prompt: "a lighthouse".into(),
            model: "dall-e-3".into(),
            images_count: 1,
            size: ImageSize::Square1024,
            response_format: ResponseFormat::Url,
            user: None,
        })
    }

    #[tokio::test]
    async fn recorded_session_replays_the_same_generation() {
        let dir = std::env::temp_dir().join("imagen_openai_session_test");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("session.cassette.yaml");

        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&path, "session", "abc")));
        let broker = RecordingOpenAiBroker::new(Arc::new(HostedImageBroker), Arc::clone(&recorder));
        let ctx = ServiceContext::with_broker(Arc::new(broker));
        let session = RecordingSession { recorder };

        let recorded = ctx
            .image_generations
            .generate_image(generation())
            .await
            .unwrap();
        drop(ctx);
        assert_eq!(session.finish().unwrap(), path);

        let replay = ServiceContext::replaying(&path).unwrap();
        let replayed = replay
            .image_generations
            .generate_image(generation())
            .await
            .unwrap();
        assert_eq!(replayed, recorded);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn finish_fails_while_the_recorder_is_shared() {
        let path = std::env::temp_dir().join("imagen_openai_shared.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&path, "shared", "abc")));
        let _still_held = Arc::clone(&recorder);

        let error = RecordingSession { recorder }.finish().unwrap_err();

        assert!(error.contains("still has references"), "{error}");
        assert!(!path.exists());
    }
}
