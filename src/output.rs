//! The download action: writing the displayed thumbnail to disk.

use std::path::{Path, PathBuf};

use crate::error::StudioError;
use crate::state::{DisplayImage, RequestState};

/// Save the displayed result under `dir` with its fixed file name.
///
/// Returns `Ok(None)` when there is no result to save. The request state is
/// not changed.
///
/// # Errors
///
/// Returns an error if the payload cannot be decoded or the file cannot be
/// written.
pub fn download(state: &RequestState, dir: &Path) -> Result<Option<PathBuf>, StudioError> {
    let Some(ref image) = state.result else {
        return Ok(None);
    };
    let path = dir.join(image.kind.download_filename());
    save_image(image, &path)?;
    Ok(Some(path))
}

/// Write decoded image bytes to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if the payload cannot be decoded or the file cannot be
/// written.
pub fn save_image(image: &DisplayImage, path: &Path) -> Result<(), StudioError> {
    let bytes = image.decode()?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    tracing::debug!(path = %path.display(), "Saved thumbnail");
    Ok(())
}

/// Resolve where a one-shot run saves its result.
#[must_use]
pub fn resolve_output_path(explicit: Option<&str>, dir: &Path, image: &DisplayImage) -> PathBuf {
    explicit.map_or_else(|| dir.join(image.kind.download_filename()), PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::OutputKind;

    fn succeeded(kind: OutputKind) -> RequestState {
        let mut state = RequestState::default();
        state.succeed(DisplayImage { kind, data_base64: "QUJDRA==".into() });
        state
    }

    #[test]
    fn download_uses_fixed_name_per_kind() {
        let dir = std::env::temp_dir().join("thumbsmith_download_test");
        let _ = std::fs::remove_dir_all(&dir);

        let jpg = download(&succeeded(OutputKind::Jpeg), &dir).unwrap().unwrap();
        assert_eq!(jpg, dir.join("ai-thumbnail.jpg"));
        assert_eq!(std::fs::read(&jpg).unwrap(), b"ABCD");

        let png = download(&succeeded(OutputKind::Png), &dir).unwrap().unwrap();
        assert_eq!(png, dir.join("ai-thumbnail-replica.png"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn download_without_result_is_noop() {
        let dir = std::env::temp_dir().join("thumbsmith_download_noop_test");
        assert!(download(&RequestState::default(), &dir).unwrap().is_none());
        assert!(!dir.exists());
    }

    #[test]
    fn download_leaves_state_untouched() {
        let state = succeeded(OutputKind::Jpeg);
        let before = state.clone();
        let dir = std::env::temp_dir().join("thumbsmith_download_state_test");
        download(&state, &dir).unwrap();
        assert_eq!(state, before);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn corrupt_payload_is_an_error() {
        let mut state = RequestState::default();
        state.succeed(DisplayImage { kind: OutputKind::Jpeg, data_base64: "%%%".into() });
        let dir = std::env::temp_dir().join("thumbsmith_download_bad_test");
        assert!(matches!(download(&state, &dir), Err(StudioError::Decode(_))));
    }

    #[test]
    fn resolve_explicit_or_fixed() {
        let image = DisplayImage { kind: OutputKind::Png, data_base64: String::new() };
        assert_eq!(
            resolve_output_path(Some("mine.png"), Path::new("out"), &image),
            PathBuf::from("mine.png")
        );
        assert_eq!(
            resolve_output_path(None, Path::new("out"), &image),
            PathBuf::from("out/ai-thumbnail-replica.png")
        );
    }
}
