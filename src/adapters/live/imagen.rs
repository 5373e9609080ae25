//! Imagen `:predict` calls for text-to-image generation.

use serde::Deserialize;

use super::{truncate_body, GoogleThumbnailService};
use crate::error::StudioError;
use crate::ports::GenerateRequest;

/// Imagen returns JPEG when asked; generated thumbnails are displayed as JPEG.
const OUTPUT_MIME_TYPE: &str = "image/jpeg";

impl GoogleThumbnailService {
    /// Generate one image with an Imagen model.
    pub(super) async fn predict(
        &self,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<String, StudioError> {
        let body = predict_body(request);
        let response_text = self.post_json(&self.method_url(model, "predict"), &body).await?;
        first_prediction(&response_text)
    }
}

fn predict_body(request: &GenerateRequest) -> serde_json::Value {
    serde_json::json!({
        "instances": [{ "prompt": request.prompt }],
        "parameters": {
            "sampleCount": 1,
            "aspectRatio": request.aspect_ratio.as_str(),
            "outputOptions": { "mimeType": OUTPUT_MIME_TYPE },
        }
    })
}

fn first_prediction(response_text: &str) -> Result<String, StudioError> {
    let parsed: PredictResponse = serde_json::from_str(response_text).map_err(|e| {
        StudioError::Api { status: 200, message: format!("Failed to parse response: {e}") }
    })?;

    parsed
        .predictions
        .into_iter()
        .find_map(|p| p.bytes_base64_encoded.filter(|b| !b.is_empty()))
        .ok_or_else(|| StudioError::Api {
            status: 200,
            message: format!("No images in response. Body: {}", truncate_body(response_text)),
        })
}

// --- Imagen API response types ---

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
}
