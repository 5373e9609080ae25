//! Form state for both modes and the actions that change it.

use crate::encoder::ReferenceImage;
use crate::orchestrator::Submission;
use crate::params::{AspectRatio, Mode, DEFAULT_REPLICATE_PROMPT};
use crate::state::Phase;

/// Fields of the generate form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateForm {
    /// Thumbnail topic.
    pub prompt: String,
    /// Selected output shape.
    pub aspect_ratio: AspectRatio,
}

/// Fields of the replicate form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicateForm {
    /// Instructions for the new thumbnail.
    pub prompt: String,
    /// Reference image; replaced wholesale on each selection.
    pub reference: Option<ReferenceImage>,
}

impl Default for ReplicateForm {
    fn default() -> Self {
        Self { prompt: DEFAULT_REPLICATE_PROMPT.to_string(), reference: None }
    }
}

/// All form input. Both forms are kept while switching tabs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    /// The visible tab.
    pub active: Mode,
    /// Generate tab fields.
    pub generate: GenerateForm,
    /// Replicate tab fields.
    pub replicate: ReplicateForm,
}

/// A user edit to the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Show the given tab.
    SwitchMode(Mode),
    /// Replace the active tab's prompt.
    SetPrompt(String),
    /// Select an aspect ratio (generate tab).
    SetAspectRatio(AspectRatio),
    /// Select a reference image (replicate tab).
    SetReference(ReferenceImage),
    /// Drop the reference image (replicate tab).
    ClearReference,
}

impl Model {
    /// Apply an action. Switching tabs never resets any field.
    pub fn update(&mut self, action: Action) {
        match action {
            Action::SwitchMode(mode) => self.active = mode,
            Action::SetPrompt(prompt) => match self.active {
                Mode::Generate => self.generate.prompt = prompt,
                Mode::Replicate => self.replicate.prompt = prompt,
            },
            Action::SetAspectRatio(ratio) => self.generate.aspect_ratio = ratio,
            Action::SetReference(image) => self.replicate.reference = Some(image),
            Action::ClearReference => self.replicate.reference = None,
        }
    }

    /// The submission for the active tab.
    #[must_use]
    pub fn submission(&self) -> Submission {
        match self.active {
            Mode::Generate => Submission::Generate {
                prompt: self.generate.prompt.clone(),
                aspect_ratio: self.generate.aspect_ratio,
            },
            Mode::Replicate => Submission::Replicate {
                prompt: self.replicate.prompt.clone(),
                reference: self.replicate.reference.clone(),
            },
        }
    }

    /// Whether the submit control is enabled.
    ///
    /// Disabled while a request is loading, and on the replicate tab until a
    /// reference image is chosen.
    #[must_use]
    pub fn submit_enabled(&self, phase: Phase) -> bool {
        if phase == Phase::Loading {
            return false;
        }
        match self.active {
            Mode::Generate => true,
            Mode::Replicate => self.replicate.reference.is_some(),
        }
    }
}
