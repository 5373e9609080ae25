//! Live adapter for the Google Generative Language API.
//!
//! Imagen models are served by `:predict`, Gemini image models by
//! `:generateContent`. Both return the image as base64 text.

pub mod gemini;
pub mod imagen;

use reqwest::Client;

use crate::error::StudioError;
use crate::model::{detect_endpoint, require_image_input, Endpoint};
use crate::ports::thumbnail_service::{
    GenerateRequest, ReplicateRequest, ServiceFuture, ThumbnailService,
};

/// Longest slice of a response body quoted in error messages.
const MAX_BODY_IN_ERROR: usize = 500;

/// Thumbnail service backed by Imagen and Gemini.
pub struct GoogleThumbnailService {
    client: Client,
    api_key: String,
    base_url: String,
    generate_model: String,
    replicate_model: String,
}

impl GoogleThumbnailService {
    /// Create a service for the given resolved model identifiers.
    ///
    /// # Errors
    ///
    /// Returns an error if a model belongs to no known family, or if the
    /// replicate model cannot take a reference image.
    pub fn new(
        api_key: String,
        base_url: impl Into<String>,
        generate_model: String,
        replicate_model: String,
    ) -> Result<Self, StudioError> {
        detect_endpoint(&generate_model).map_err(StudioError::InvalidArgument)?;
        require_image_input(&replicate_model).map_err(StudioError::InvalidArgument)?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client: Client::new(), api_key, base_url, generate_model, replicate_model })
    }

    fn method_url(&self, model: &str, method: &str) -> String {
        format!("{}/models/{model}:{method}", self.base_url)
    }

    /// POST a JSON body and return the response text of a 2xx reply.
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<String, StudioError> {
        tracing::debug!(%url, "Calling image API");
        let response =
            self.client.post(url).header("x-goog-api-key", &self.api_key).json(body).send().await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            let message = truncate_body(&response_text);
            return Err(StudioError::Api { status: status.as_u16(), message });
        }
        Ok(response_text)
    }
}

impl ThumbnailService for GoogleThumbnailService {
    fn generate(&self, request: &GenerateRequest) -> ServiceFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            match detect_endpoint(&self.generate_model).map_err(StudioError::InvalidArgument)? {
                Endpoint::Predict => self.predict(&self.generate_model, &request).await,
                Endpoint::GenerateContent => {
                    self.generate_content_from_text(&self.generate_model, &request).await
                }
            }
        })
    }

    fn replicate(&self, request: &ReplicateRequest) -> ServiceFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            self.generate_content_from_reference(&self.replicate_model, &request).await
        })
    }
}

/// Shorten a response body for inclusion in an error message.
fn truncate_body(body: &str) -> String {
    if body.len() > MAX_BODY_IN_ERROR {
        let cut = (0..=MAX_BODY_IN_ERROR).rev().find(|&i| body.is_char_boundary(i)).unwrap_or(0);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
