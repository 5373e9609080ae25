//! Request orchestration: validation, the loading lifecycle, and the remote call.
//!
//! Every submission goes through the same steps:
//! - validate synchronously; on failure record the message and stop
//! - enter `Loading`, clearing any previous result or error
//! - call the remote service
//! - settle into `Succeeded` or `Failed`
//!
//! Leaving `Loading` is tied to a guard value, so a dropped, aborted, or
//! panicking request still settles the state. Concurrent submissions are
//! not queued; whichever response arrives last determines the final state.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::encoder::ReferenceImage;
use crate::error::ValidationError;
use crate::params::{AspectRatio, Mode};
use crate::ports::{GenerateRequest, ReplicateRequest, ThumbnailService};
use crate::state::{DisplayImage, Phase, RequestState};

/// The form contents submitted for one mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Generate from text.
    Generate {
        /// Thumbnail topic.
        prompt: String,
        /// Requested output shape.
        aspect_ratio: AspectRatio,
    },
    /// Restyle a reference image.
    Replicate {
        /// Instructions for the new thumbnail.
        prompt: String,
        /// Selected reference image, if any.
        reference: Option<ReferenceImage>,
    },
}

impl Submission {
    /// Mode this submission belongs to.
    #[must_use]
    pub const fn mode(&self) -> Mode {
        match self {
            Self::Generate { .. } => Mode::Generate,
            Self::Replicate { .. } => Mode::Replicate,
        }
    }

    /// Check the submission without sending it.
    ///
    /// The prompt is checked before the reference image.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn check(&self) -> Result<(), ValidationError> {
        let (prompt, reference) = match self {
            Self::Generate { prompt, .. } => (prompt, None),
            Self::Replicate { prompt, reference } => (prompt, Some(reference)),
        };
        if prompt.trim().is_empty() {
            return Err(ValidationError::EmptyPrompt);
        }
        match reference {
            Some(None) => Err(ValidationError::MissingReference),
            Some(Some(r)) if r.encoded_data.is_empty() => Err(ValidationError::MissingReference),
            _ => Ok(()),
        }
    }
}

/// A submission that passed validation.
#[derive(Debug)]
enum Call {
    Generate(GenerateRequest),
    Replicate(ReplicateRequest),
}

/// Check a submission and turn it into a service request.
fn validate(submission: Submission) -> Result<Call, ValidationError> {
    submission.check()?;
    match submission {
        Submission::Generate { prompt, aspect_ratio } => {
            Ok(Call::Generate(GenerateRequest { prompt, aspect_ratio }))
        }
        Submission::Replicate { prompt, reference } => {
            let reference = reference.ok_or(ValidationError::MissingReference)?;
            Ok(Call::Replicate(ReplicateRequest {
                prompt,
                image_base64: reference.encoded_data,
                mime_type: reference.media_type,
            }))
        }
    }
}

/// Owns the request state and drives submissions through it.
pub struct Orchestrator {
    service: Arc<dyn ThumbnailService>,
    state: Arc<watch::Sender<RequestState>>,
}

impl Orchestrator {
    /// Create an orchestrator in the `Idle` phase.
    #[must_use]
    pub fn new(service: Arc<dyn ThumbnailService>) -> Self {
        let (state, _) = watch::channel(RequestState::default());
        Self { service, state: Arc::new(state) }
    }

    /// A receiver that observes every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.state.subscribe()
    }

    /// A copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> RequestState {
        self.state.borrow().clone()
    }

    /// Submit and wait for the remote call to finish.
    ///
    /// # Errors
    ///
    /// Returns the validation error if the submission was rejected; the
    /// remote service is not called in that case.
    #[cfg(test)]
    pub async fn submit(&self, submission: Submission) -> Result<Phase, ValidationError> {
        let (guard, call) = self.begin(submission)?;
        Ok(run(Arc::clone(&self.service), guard, call).await)
    }

    /// Submit and run the remote call on a background task.
    ///
    /// Validation and the switch to `Loading` happen before this returns.
    ///
    /// # Errors
    ///
    /// Returns the validation error if the submission was rejected.
    pub fn spawn(&self, submission: Submission) -> Result<SubmitHandle, ValidationError> {
        let (guard, call) = self.begin(submission)?;
        let task = tokio::spawn(run(Arc::clone(&self.service), guard, call));
        Ok(SubmitHandle { task })
    }

    /// Show a validation-class error without touching the phase.
    ///
    /// Ignored while a request is loading, since `Loading` never carries an
    /// error.
    pub fn report(&self, error: &ValidationError) {
        tracing::debug!(%error, "Rejected input");
        self.state.send_if_modified(|state| {
            if state.is_loading() {
                return false;
            }
            state.reject(error.to_string());
            true
        });
    }

    fn begin(&self, submission: Submission) -> Result<(LoadingGuard, Call), ValidationError> {
        let mode = submission.mode();
        let call = validate(submission).inspect_err(|e| self.report(e))?;

        tracing::info!(?mode, "Submitting request");
        self.state.send_modify(|state| state.begin(mode.loading_message()));
        let guard = LoadingGuard { state: Arc::clone(&self.state), mode, settled: false };
        Ok((guard, call))
    }
}

async fn run(service: Arc<dyn ThumbnailService>, guard: LoadingGuard, call: Call) -> Phase {
    let outcome = match &call {
        Call::Generate(request) => service.generate(request).await,
        Call::Replicate(request) => service.replicate(request).await,
    };
    match outcome {
        Ok(data_base64) => guard.succeed(data_base64),
        Err(e) => {
            tracing::error!(mode = ?guard.mode, error = %e, "Remote image service failed");
            guard.fail()
        }
    }
}

/// Holds a request in `Loading` until it is settled or dropped.
struct LoadingGuard {
    state: Arc<watch::Sender<RequestState>>,
    mode: Mode,
    settled: bool,
}

impl LoadingGuard {
    fn succeed(mut self, data_base64: String) -> Phase {
        let image = DisplayImage { kind: self.mode.output_kind(), data_base64 };
        tracing::info!(mode = ?self.mode, "Thumbnail ready");
        self.state.send_modify(|state| state.succeed(image));
        self.settled = true;
        Phase::Succeeded
    }

    fn fail(mut self) -> Phase {
        let message = self.mode.failure_message();
        self.state.send_modify(|state| state.fail(message));
        self.settled = true;
        Phase::Failed
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!(mode = ?self.mode, "Request ended without a response");
            let message = self.mode.failure_message();
            self.state.send_modify(|state| state.fail(message));
        }
    }
}

/// A submission running on a background task.
pub struct SubmitHandle {
    task: JoinHandle<Phase>,
}

impl SubmitHandle {
    /// Stop waiting for the remote call. The request settles as failed.
    ///
    /// Reserved for timeouts; no user command aborts a request.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn abort(&self) {
        self.task.abort();
    }

    /// Whether the request has settled.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the request to settle and return its final phase.
    pub async fn wait(self) -> Phase {
        match self.task.await {
            Ok(phase) => phase,
            Err(e) => {
                tracing::warn!(error = %e, "Request task did not complete");
                Phase::Failed
            }
        }
    }
}
