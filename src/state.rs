//! The single request state shared between the orchestrator and the view.

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::StudioError;
use crate::params::OutputKind;

/// Lifecycle of the current request.
///
/// `Succeeded` and `Failed` stay displayed until the next submission; there
/// is no automatic return to `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// A remote call is in flight.
    Loading,
    /// The last remote call produced an image.
    Succeeded,
    /// The last remote call failed.
    Failed,
}

/// An image returned by the remote service, tagged with its output kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayImage {
    /// Media type the image is displayed and saved as.
    pub kind: OutputKind,
    /// Image bytes, base64 encoded as returned by the service.
    pub data_base64: String,
}

impl DisplayImage {
    /// `data:` URI for the image, e.g. `data:image/jpeg;base64,...`.
    #[must_use]
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.kind.mime_type(), self.data_base64)
    }

    /// Decode the image bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not valid base64.
    pub fn decode(&self) -> Result<Vec<u8>, StudioError> {
        base64::engine::general_purpose::STANDARD
            .decode(self.data_base64.trim())
            .map_err(|e| StudioError::Decode(format!("Invalid image payload: {e}")))
    }
}

/// The application's one request state.
///
/// Only the orchestrator writes it. `result` and `error` are never both set,
/// and both are clear while `phase` is [`Phase::Loading`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestState {
    /// Current phase.
    pub phase: Phase,
    /// Text shown while loading; empty otherwise.
    pub loading_message: String,
    /// Image from the last successful request.
    pub result: Option<DisplayImage>,
    /// User-facing error text.
    pub error: Option<String>,
}

impl RequestState {
    /// Whether a request is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub(crate) fn begin(&mut self, loading_message: &str) {
        self.phase = Phase::Loading;
        self.loading_message = loading_message.to_string();
        self.result = None;
        self.error = None;
    }

    pub(crate) fn succeed(&mut self, image: DisplayImage) {
        self.phase = Phase::Succeeded;
        self.loading_message.clear();
        self.result = Some(image);
        self.error = None;
    }

    pub(crate) fn fail(&mut self, message: &str) {
        self.phase = Phase::Failed;
        self.loading_message.clear();
        self.result = None;
        self.error = Some(message.to_string());
    }

    /// Record a validation error. The phase is left as it was.
    pub(crate) fn reject(&mut self, message: String) {
        self.result = None;
        self.error = Some(message);
    }
}
