//! Error types for thumbsmith.

use thiserror::Error;

/// Errors raised by the remote service, the local environment, or setup.
#[derive(Debug, Error)]
pub enum StudioError {
    /// The remote image service returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// A network error occurred.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Base64 payload could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Cassette could not be loaded, replayed, or written.
    #[error("Cassette error: {0}")]
    Cassette(String),

    /// The submission was rejected before any remote call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request reached the service but did not produce a thumbnail.
    #[error("{0}")]
    RequestFailed(String),

    /// No API key configured.
    #[error("No API key for {provider}. Set {env_var} or add it to config file.")]
    MissingApiKey {
        /// The provider name.
        provider: String,
        /// The environment variable name.
        env_var: String,
    },
}

/// Input problems detected before any remote call is made.
///
/// The `Display` text is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The prompt is empty or whitespace only.
    #[error("Prompt cannot be empty.")]
    EmptyPrompt,

    /// A replicate submission was made without a reference image.
    #[error("Please upload an image to replicate.")]
    MissingReference,

    /// The selected reference file could not be read.
    #[error("Could not read '{0}'. Please choose another image.")]
    UnreadableReference(String),
}
