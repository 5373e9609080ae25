//! Modes, aspect ratios, and the fixed texts and formats tied to each mode.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default instructions pre-filled in the replicate form.
pub const DEFAULT_REPLICATE_PROMPT: &str =
    "Replicate this thumbnail with the same style, but for a video about my topic.";

/// Which sub-flow is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Create a new thumbnail from a text prompt.
    #[default]
    Generate,
    /// Restyle a reference thumbnail for a new topic.
    Replicate,
}

impl Mode {
    /// Output format contracted for results of this mode.
    #[must_use]
    pub const fn output_kind(self) -> OutputKind {
        match self {
            Self::Generate => OutputKind::Jpeg,
            Self::Replicate => OutputKind::Png,
        }
    }

    /// Message shown while a request of this mode is in flight.
    #[must_use]
    pub const fn loading_message(self) -> &'static str {
        match self {
            Self::Generate => "Generating with Imagen-4... this may take a moment.",
            Self::Replicate => "Replicating with Nano Banana... this is quick!",
        }
    }

    /// Generic message shown when the remote call fails.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Generate => "Failed to generate thumbnail. Please check the logs for details.",
            Self::Replicate => "Failed to replicate thumbnail. Please check the logs for details.",
        }
    }

    /// Submit button label, depending on whether a request is in flight.
    #[must_use]
    pub const fn submit_label(self, loading: bool) -> &'static str {
        match (self, loading) {
            (Self::Generate, false) => "Generate Thumbnail",
            (Self::Generate, true) => "Generating...",
            (Self::Replicate, false) => "Replicate Thumbnail",
            (Self::Replicate, true) => "Replicating...",
        }
    }

    /// Tab title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Generate => "Generate",
            Self::Replicate => "Replicate",
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "generate" | "gen" => Ok(Self::Generate),
            "replicate" | "rep" => Ok(Self::Replicate),
            _ => Err(format!("Unknown mode '{s}'. Valid: generate, replicate")),
        }
    }
}

/// Output width:height category for generated thumbnails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    /// 16:9 widescreen.
    #[default]
    #[serde(rename = "16:9")]
    Widescreen,
    /// 4:3 standard.
    #[serde(rename = "4:3")]
    Standard,
    /// 1:1 square.
    #[serde(rename = "1:1")]
    Square,
}

impl AspectRatio {
    /// All selectable ratios, in display order.
    pub const ALL: [Self; 3] = [Self::Widescreen, Self::Standard, Self::Square];

    /// The ratio as sent to the API (e.g. `"16:9"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Widescreen => "16:9",
            Self::Standard => "4:3",
            Self::Square => "1:1",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|r| r.as_str() == s.trim()).ok_or_else(|| {
            format!("Unsupported aspect ratio '{s}'. Valid: 16:9, 4:3, 1:1")
        })
    }
}

/// Media type a result is tagged with for display and download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// `image/jpeg`, produced by generation.
    Jpeg,
    /// `image/png`, produced by replication.
    Png,
}

impl OutputKind {
    /// MIME type used in the data tag.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Fixed file name used by the download action.
    #[must_use]
    pub const fn download_filename(self) -> &'static str {
        match self {
            Self::Jpeg => "ai-thumbnail.jpg",
            Self::Png => "ai-thumbnail-replica.png",
        }
    }
}
