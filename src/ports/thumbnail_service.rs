//! Thumbnail service port for the remote generative-image API.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::StudioError;
use crate::params::AspectRatio;

/// A request to generate a thumbnail from text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Text describing the thumbnail topic.
    pub prompt: String,
    /// Requested output shape.
    pub aspect_ratio: AspectRatio,
}

/// A request to restyle a reference thumbnail for a new topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicateRequest {
    /// Instructions for the new thumbnail.
    pub prompt: String,
    /// Reference image, base64 encoded.
    pub image_base64: String,
    /// Media type of the reference image.
    pub mime_type: String,
}

/// Boxed future returned by [`ThumbnailService`] methods.
///
/// Resolves to the produced image, base64 encoded.
pub type ServiceFuture<'a> = Pin<Box<dyn Future<Output = Result<String, StudioError>> + Send + 'a>>;

/// Produces thumbnails via an external API.
pub trait ThumbnailService: Send + Sync {
    /// Generate a thumbnail from a text prompt.
    fn generate(&self, request: &GenerateRequest) -> ServiceFuture<'_>;

    /// Replicate the style of a reference thumbnail.
    fn replicate(&self, request: &ReplicateRequest) -> ServiceFuture<'_>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_request_serialization() {
        let request = GenerateRequest {
            prompt: "retro gaming setup review".into(),
            aspect_ratio: AspectRatio::Widescreen,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["aspect_ratio"], "16:9");
        let back: GenerateRequest = serde_json::from_value(json).unwrap();
        assert_eq!(back, request);
    }

    #[test]
    fn replicate_request_serialization() {
        let request = ReplicateRequest {
            prompt: "a cooking video".into(),
            image_base64: "QUJDRA==".into(),
            mime_type: "image/png".into(),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"mime_type\":\"image/png\""));
        let back: ReplicateRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(back.image_base64, "QUJDRA==");
    }
}
