//! Recording adapter for the `ThumbnailService` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::thumbnail_service::{
    GenerateRequest, ReplicateRequest, ServiceFuture, ThumbnailService,
};

/// Port name under which calls are recorded.
pub const PORT: &str = "thumbnail_service";

/// Records thumbnail service calls while delegating to an inner implementation.
pub struct RecordingThumbnailService {
    inner: Box<dyn ThumbnailService>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingThumbnailService {
    /// Creates a new recording service wrapping the given implementation.
    pub fn new(inner: Box<dyn ThumbnailService>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl ThumbnailService for RecordingThumbnailService {
    fn generate(&self, request: &GenerateRequest) -> ServiceFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let result = self.inner.generate(&request).await;
            record_result(&self.recorder, PORT, "generate", &request, &result);
            result
        })
    }

    fn replicate(&self, request: &ReplicateRequest) -> ServiceFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let result = self.inner.replicate(&request).await;
            record_result(&self.recorder, PORT, "replicate", &request, &result);
            result
        })
    }
}
