//! Model name resolution and endpoint detection.

/// Which Generative Language API method a model is served by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `:predict`, used by the Imagen family.
    Predict,
    /// `:generateContent`, used by Gemini image models.
    GenerateContent,
}

/// Default model for the generate flow.
pub const DEFAULT_GENERATE_MODEL: &str = "imagen-4";

/// Default model for the replicate flow.
pub const DEFAULT_REPLICATE_MODEL: &str = "nano-banana";

/// Short name aliases for the supported models.
const ALIASES: &[(&str, &str)] = &[
    ("imagen-4", "imagen-4.0-generate-001"),
    ("imagen-4-ultra", "imagen-4.0-ultra-generate-001"),
    ("imagen-4-fast", "imagen-4.0-fast-generate-001"),
    ("nano-banana", "gemini-2.5-flash-image-preview"),
];

/// Resolve a model name (alias or exact) to the full model identifier.
#[must_use]
pub fn resolve_model(name: &str) -> String {
    ALIASES
        .iter()
        .find(|&&(alias, _)| alias == name)
        .map_or_else(|| name.to_string(), |&(_, full)| full.to_string())
}

/// Detect the API method from a resolved model name.
///
/// # Errors
///
/// Returns an error if the model name doesn't match a known family prefix.
pub fn detect_endpoint(model: &str) -> Result<Endpoint, String> {
    if model.starts_with("imagen") {
        Ok(Endpoint::Predict)
    } else if model.starts_with("gemini") {
        Ok(Endpoint::GenerateContent)
    } else {
        Err(format!("Unknown model family for '{model}'. Expected 'imagen-*' or 'gemini-*'."))
    }
}

/// Check that a model can take a reference image.
///
/// # Errors
///
/// Returns an error for `imagen-*` models, which only accept text.
pub fn require_image_input(model: &str) -> Result<(), String> {
    match detect_endpoint(model)? {
        Endpoint::GenerateContent => Ok(()),
        Endpoint::Predict => {
            Err(format!("Model '{model}' cannot take a reference image. Use a 'gemini-*' model."))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_imagen_aliases() {
        assert_eq!(resolve_model("imagen-4"), "imagen-4.0-generate-001");
        assert_eq!(resolve_model("imagen-4-ultra"), "imagen-4.0-ultra-generate-001");
        assert_eq!(resolve_model("imagen-4-fast"), "imagen-4.0-fast-generate-001");
    }

    #[test]
    fn resolve_nano_banana() {
        assert_eq!(resolve_model("nano-banana"), "gemini-2.5-flash-image-preview");
    }

    #[test]
    fn resolve_exact_name_passthrough() {
        assert_eq!(resolve_model("gemini-2.5-flash-image"), "gemini-2.5-flash-image");
    }

    #[test]
    fn detect_endpoints() {
        assert_eq!(detect_endpoint("imagen-4.0-generate-001").unwrap(), Endpoint::Predict);
        assert_eq!(
            detect_endpoint("gemini-2.5-flash-image-preview").unwrap(),
            Endpoint::GenerateContent
        );
        assert!(detect_endpoint("dall-e-3").is_err());
    }

    #[test]
    fn replicate_needs_gemini() {
        assert!(require_image_input("gemini-2.5-flash-image-preview").is_ok());
        assert!(require_image_input("imagen-4.0-generate-001").is_err());
        assert!(require_image_input("gpt-image-1").is_err());
    }
}
