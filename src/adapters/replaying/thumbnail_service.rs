//! Replaying adapter for the `ThumbnailService` port.

use std::sync::{Arc, Mutex};

use super::{next_output, replay_result};
use crate::adapters::recording::thumbnail_service::PORT;
use crate::cassette::replayer::CassetteReplayer;
use crate::error::StudioError;
use crate::ports::thumbnail_service::{
    GenerateRequest, ReplicateRequest, ServiceFuture, ThumbnailService,
};

/// Serves recorded thumbnail service results from a cassette.
pub struct ReplayingThumbnailService {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingThumbnailService {
    /// Create a replaying service backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }

    fn replay(&self, method: &'static str) -> ServiceFuture<'_> {
        let result = next_output(&self.replayer, PORT, method)
            .map_err(StudioError::Cassette)
            .and_then(|output| {
                replay_result::<String>(output)
                    .map_err(|message| StudioError::Api { status: 0, message })
            });
        Box::pin(async move { result })
    }
}

impl ThumbnailService for ReplayingThumbnailService {
    fn generate(&self, _request: &GenerateRequest) -> ServiceFuture<'_> {
        self.replay("generate")
    }

    fn replicate(&self, _request: &ReplicateRequest) -> ServiceFuture<'_> {
        self.replay("replicate")
    }
}
