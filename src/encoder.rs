//! Turns a local file into a base64 payload plus its declared media type.

use std::path::Path;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::StudioError;

/// Media type declared for files whose extension is not a known image type.
const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// A user-selected reference image, ready to send to the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceImage {
    /// Raw file bytes, base64 encoded.
    pub encoded_data: String,
    /// Media type declared by the file name (e.g. `"image/png"`).
    pub media_type: String,
    /// File name shown next to the picker.
    pub display_name: String,
}

/// Read a file and encode it as a [`ReferenceImage`].
///
/// Size and content are not checked; the media type is whatever the
/// extension declares.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub async fn encode_file(path: &Path) -> Result<ReferenceImage, StudioError> {
    let bytes = tokio::fs::read(path).await?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Encoded reference image");
    Ok(ReferenceImage {
        encoded_data: base64::engine::general_purpose::STANDARD.encode(&bytes),
        media_type: declared_media_type(path).to_string(),
        display_name: path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned()),
    })
}

/// Media type implied by a file's extension.
#[must_use]
pub fn declared_media_type(path: &Path) -> &'static str {
    image::ImageFormat::from_path(path).map_or(UNKNOWN_MEDIA_TYPE, |f| f.to_mime_type())
}
