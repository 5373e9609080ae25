//! Service context that selects the live, recording, or replaying adapter.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use crate::adapters::live::GoogleThumbnailService;
use crate::adapters::recording::thumbnail_service::RecordingThumbnailService;
use crate::adapters::replaying::thumbnail_service::ReplayingThumbnailService;
use crate::cassette::config::load_cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::config::Config;
use crate::error::StudioError;
use crate::model::resolve_model;
use crate::ports::ThumbnailService;

/// Environment variable naming a cassette to replay instead of calling the API.
pub const REPLAY_ENV: &str = "THUMBSMITH_REPLAY";

/// Environment variable that turns on recording when `true` or `1`.
pub const RECORD_ENV: &str = "THUMBSMITH_REC";

/// Bundles the port implementations used by a run.
pub struct ServiceContext {
    /// Remote image service port.
    pub service: Arc<dyn ThumbnailService>,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Write the recorded interactions to disk.
    ///
    /// Returns `Ok(None)` when nothing was recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be written.
    pub fn finish(self) -> Result<Option<PathBuf>, StudioError> {
        let recorder = self.recorder.lock().unwrap_or_else(PoisonError::into_inner);
        if recorder.is_empty() {
            return Ok(None);
        }
        let path = recorder
            .write()
            .map_err(|e| StudioError::Cassette(format!("Failed to write cassette: {e}")))?;
        tracing::info!(path = %path.display(), interactions = recorder.len(), "Cassette written");
        Ok(Some(path.to_path_buf()))
    }
}

impl ServiceContext {
    /// Pick the adapter from the environment: replay, record, or live.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen adapter cannot be set up.
    pub fn from_env(config: &Config) -> Result<(Self, Option<RecordingSession>), StudioError> {
        if let Ok(cassette_path) = std::env::var(REPLAY_ENV) {
            tracing::info!(cassette = %cassette_path, "Replaying from cassette");
            return Ok((Self::replaying(Path::new(&cassette_path))?, None));
        }
        if std::env::var(RECORD_ENV).is_ok_and(|v| v == "true" || v == "1") {
            tracing::info!("Recording mode enabled");
            let (ctx, session) = Self::recording(config)?;
            return Ok((ctx, Some(session)));
        }
        Ok((Self::live(config)?, None))
    }

    /// Create a live context calling the Google API.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not configured or a configured
    /// model is unusable.
    pub fn live(config: &Config) -> Result<Self, StudioError> {
        Ok(Self { service: Arc::new(live_service(config)?) })
    }

    /// Create a recording context that wraps a live adapter with a recorder.
    ///
    /// # Errors
    ///
    /// Returns an error if the live adapter cannot be created.
    pub fn recording(config: &Config) -> Result<(Self, RecordingSession), StudioError> {
        let live = live_service(config)?;

        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = PathBuf::from(".thumbsmith/cassettes")
            .join(&timestamp)
            .join("thumbnail_service.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-thumbnail_service"),
            get_commit_hash(),
        )));

        let service = RecordingThumbnailService::new(Box::new(live), Arc::clone(&recorder));
        Ok((Self { service: Arc::new(service) }, RecordingSession { recorder }))
    }

    /// Create a replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, StudioError> {
        let replayer = load_cassette(path).map_err(StudioError::Cassette)?;
        let service = ReplayingThumbnailService::new(Arc::new(Mutex::new(replayer)));
        Ok(Self { service: Arc::new(service) })
    }
}

fn live_service(config: &Config) -> Result<GoogleThumbnailService, StudioError> {
    let key = config.gemini_key().ok_or_else(|| StudioError::MissingApiKey {
        provider: "Gemini".into(),
        env_var: "GEMINI_API_KEY".into(),
    })?;
    let generate_model = resolve_model(&config.models.generate);
    let replicate_model = resolve_model(&config.models.replicate);
    tracing::debug!(%generate_model, %replicate_model, "Using live models");
    GoogleThumbnailService::new(key, config.api.base_url.clone(), generate_model, replicate_model)
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
