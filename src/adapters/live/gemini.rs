//! Gemini `:generateContent` calls, used for replication and for generation
//! with Gemini image models.

use serde::Deserialize;

use super::{truncate_body, GoogleThumbnailService};
use crate::error::StudioError;
use crate::ports::{GenerateRequest, ReplicateRequest};

impl GoogleThumbnailService {
    /// Generate an image from text with a Gemini image model.
    pub(super) async fn generate_content_from_text(
        &self,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<String, StudioError> {
        let mut body = content_body(vec![serde_json::json!({ "text": request.prompt })]);
        body["generationConfig"]["imageConfig"] =
            serde_json::json!({ "aspectRatio": request.aspect_ratio.as_str() });
        let response_text =
            self.post_json(&self.method_url(model, "generateContent"), &body).await?;
        first_inline_image(&response_text)
    }

    /// Restyle a reference image. The image part precedes the instructions.
    pub(super) async fn generate_content_from_reference(
        &self,
        model: &str,
        request: &ReplicateRequest,
    ) -> Result<String, StudioError> {
        let body = replicate_body(request);
        let response_text =
            self.post_json(&self.method_url(model, "generateContent"), &body).await?;
        first_inline_image(&response_text)
    }
}

fn replicate_body(request: &ReplicateRequest) -> serde_json::Value {
    content_body(vec![
        serde_json::json!({
            "inlineData": {
                "mimeType": request.mime_type,
                "data": request.image_base64,
            }
        }),
        serde_json::json!({ "text": request.prompt }),
    ])
}

fn content_body(parts: Vec<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({
        "contents": [{ "parts": parts }],
        "generationConfig": {
            "responseModalities": ["IMAGE", "TEXT"],
        }
    })
}

fn first_inline_image(response_text: &str) -> Result<String, StudioError> {
    let parsed: GeminiResponse = serde_json::from_str(response_text).map_err(|e| {
        StudioError::Api { status: 200, message: format!("Failed to parse response: {e}") }
    })?;

    if let Some(reason) = parsed.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(StudioError::Api { status: 200, message: format!("Prompt blocked: {reason}") });
    }

    let image = parsed
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .find_map(|p| p.inline_data)
        .map(|inline| inline.data);

    image.ok_or_else(|| StudioError::Api {
        status: 200,
        message: format!("No images in response. Body: {}", truncate_body(response_text)),
    })
}

// --- Gemini API response types ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    inline_data: Option<GeminiInlineData>,
}

#[derive(Deserialize)]
struct GeminiInlineData {
    data: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replicate_body_puts_image_first() {
        let body = replicate_body(&ReplicateRequest {
            prompt: "a cooking video".into(),
            image_base64: "QUJDRA==".into(),
            mime_type: "image/png".into(),
        });
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[0]["inlineData"]["data"], "QUJDRA==");
        assert_eq!(parts[1]["text"], "a cooking video");
        assert_eq!(body["generationConfig"]["responseModalities"][0], "IMAGE");
    }

    #[test]
    fn skips_text_parts() {
        let text = r#"{"candidates":[{"content":{"parts":[
            {"text":"Here is your thumbnail"},
            {"inlineData":{"mimeType":"image/png","data":"ABCD"}}
        ]}}]}"#;
        assert_eq!(first_inline_image(text).unwrap(), "ABCD");
    }

    #[test]
    fn blocked_prompt_is_an_error() {
        let text = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        let err = first_inline_image(text).unwrap_err();
        assert!(err.to_string().contains("Prompt blocked: SAFETY"));
    }

    #[test]
    fn text_only_response_is_an_error() {
        let text = r#"{"candidates":[{"content":{"parts":[{"text":"no"}]}}]}"#;
        assert!(first_inline_image(text).unwrap_err().to_string().contains("No images"));
    }
}
