//! Gemini (Google) portrait transformer.

use crate::error::{parse_retry_after, sanitize_error_message, Result, StudioError};
use crate::payload::{decode_base64_lenient, ImagePayload};
use crate::transform::transformer::{TransformRequest, Transformer};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Environment variables consulted for the API key, in order.
const API_KEY_ENV_VARS: [&str; 2] = ["API_KEY", "GOOGLE_API_KEY"];

/// Gemini image model variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GeminiModel {
    /// Nano Banana - Gemini 2.5 Flash Image (fast, economical).
    #[default]
    NanoBanana,
    /// Nano Banana Pro - Gemini 3 Pro Image (highest quality).
    NanoBananaPro,
}

impl GeminiModel {
    /// Returns the API model identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NanoBanana => "gemini-2.5-flash-image",
            Self::NanoBananaPro => "nano-banana-pro-preview",
        }
    }
}

/// Builder for [`GeminiTransformer`].
#[derive(Debug, Clone, Default)]
pub struct GeminiTransformerBuilder {
    api_key: Option<String>,
    model: GeminiModel,
    base_url: Option<String>,
    client: Option<reqwest::Client>,
}

impl GeminiTransformerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to `API_KEY`, then `GOOGLE_API_KEY`.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the Gemini model variant.
    pub fn model(mut self, model: GeminiModel) -> Self {
        self.model = model;
        self
    }

    /// Overrides the API base URL (proxies, test servers).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Uses a preconfigured HTTP client.
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Builds the transformer.
    ///
    /// A missing key is not an error here; it is reported as an
    /// authentication failure when a transform is attempted.
    pub fn build(self) -> GeminiTransformer {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .or_else(|| {
                API_KEY_ENV_VARS.iter().find_map(|var| {
                    std::env::var(var)
                        .ok()
                        .filter(|key| !key.trim().is_empty())
                })
            });

        if api_key.is_none() {
            tracing::warn!("no Gemini API key configured; transforms will fail");
        }

        GeminiTransformer {
            client: self.client.unwrap_or_default(),
            api_key,
            model: self.model,
            base_url: self
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
        }
    }
}

/// Portrait transformer backed by the Gemini `generateContent` API.
pub struct GeminiTransformer {
    client: reqwest::Client,
    api_key: Option<String>,
    model: GeminiModel,
    base_url: String,
}

impl GeminiTransformer {
    /// Creates a new `GeminiTransformerBuilder`.
    pub fn builder() -> GeminiTransformerBuilder {
        GeminiTransformerBuilder::new()
    }

    /// Returns the configured model.
    pub fn model(&self) -> GeminiModel {
        self.model
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            StudioError::Auth("API_KEY / GOOGLE_API_KEY not set and no API key provided".into())
        })
    }

    async fn transform_impl(&self, request: &TransformRequest) -> Result<ImagePayload> {
        // Validate locally before touching the network.
        let instruction = request.instruction()?;
        let api_key = self.api_key()?;

        let start = Instant::now();
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url,
            self.model.as_str(),
        );
        let body = GeminiRequest::new(&request.image, instruction);

        tracing::debug!(
            model = self.model.as_str(),
            variant = %request.variant,
            style = request.style.as_deref().unwrap_or("-"),
            input_bytes = request.image.size(),
            "submitting Gemini transform request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let text = response.text().await.unwrap_or_default();
            return Err(parse_error(status.as_u16(), &text, &headers));
        }

        let gemini_response: GeminiResponse = response.json().await?;
        let image = extract_image(gemini_response)?;

        tracing::debug!(
            media_type = %image.media_type,
            output_bytes = image.size(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Gemini transform complete"
        );
        Ok(image)
    }
}

#[async_trait]
impl Transformer for GeminiTransformer {
    async fn transform(&self, request: &TransformRequest) -> Result<ImagePayload> {
        self.transform_impl(request).await.inspect_err(|e| {
            tracing::warn!(kind = ?e.kind(), "Gemini image transformation error: {e}");
        })
    }

    fn name(&self) -> &str {
        "Gemini (Google)"
    }

    async fn health_check(&self) -> Result<()> {
        let url = format!("{}/v1beta/models/{}", self.base_url, self.model.as_str());

        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", self.api_key()?)
            .send()
            .await?;

        match response.status().as_u16() {
            401 | 403 => Err(StudioError::Auth("Invalid API key".into())),
            s if !(200..300).contains(&s) => Err(StudioError::Api {
                status: s,
                message: "Health check failed".into(),
            }),
            _ => Ok(()),
        }
    }
}

fn parse_error(status: u16, text: &str, headers: &reqwest::header::HeaderMap) -> StudioError {
    let text = sanitize_error_message(text);
    match status {
        429 => {
            let retry_after = parse_retry_after(headers).map(std::time::Duration::from_secs);
            StudioError::RateLimited { retry_after }
        }
        401 | 403 => StudioError::Auth(text),
        _ => {
            let lower = text.to_lowercase();
            if lower.contains("safety") || lower.contains("blocked") || lower.contains("prohibited")
            {
                StudioError::ContentBlocked(text)
            } else {
                StudioError::Api {
                    status,
                    message: text,
                }
            }
        }
    }
}

/// Returns the first inline image of the first candidate.
fn extract_image(response: GeminiResponse) -> Result<ImagePayload> {
    // Blocks are returned as HTTP 200 with prompt feedback.
    if let Some(feedback) = response.prompt_feedback {
        if let Some(reason) = feedback.block_reason {
            let msg = feedback
                .block_reason_message
                .unwrap_or_else(|| format!("Prompt blocked: {reason}"));
            return Err(StudioError::ContentBlocked(msg));
        }
    }

    let candidate = response.candidates.into_iter().next().ok_or_else(|| {
        StudioError::NoImageReturned("no candidates in Gemini response".into())
    })?;

    if let Some(ref finish_reason) = candidate.finish_reason {
        match finish_reason.as_str() {
            "SAFETY"
            | "IMAGE_SAFETY"
            | "IMAGE_PROHIBITED_CONTENT"
            | "IMAGE_RECITATION"
            | "RECITATION"
            | "PROHIBITED_CONTENT"
            | "BLOCKLIST" => {
                return Err(StudioError::ContentBlocked(format!(
                    "Content blocked by Gemini safety filter: {finish_reason}"
                )));
            }
            _ => {} // STOP, MAX_TOKENS, NO_IMAGE fall through to the part scan
        }
    }

    let inline_data = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.inline_data)
        .find(|d| d.mime_type.to_ascii_lowercase().starts_with("image/"))
        .ok_or_else(|| {
            let reason = candidate.finish_reason.as_deref().unwrap_or("no image part");
            StudioError::NoImageReturned(format!("Gemini response had no inline image ({reason})"))
        })?;

    let bytes = decode_base64_lenient(&inline_data.data)
        .map_err(|e| StudioError::NoImageReturned(format!("invalid image data from Gemini: {e}")))?;

    Ok(ImagePayload::new(bytes, inline_data.mime_type))
}

// Request/Response types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiRequestPart>,
}

/// A part in a Gemini request - can be text or inline image data.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiRequestPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: GeminiInlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiConfig {
    response_modalities: Vec<String>,
}

impl GeminiRequest {
    fn new(image: &ImagePayload, instruction: String) -> Self {
        let parts = vec![
            GeminiRequestPart::InlineData {
                inline_data: GeminiInlineData {
                    mime_type: image.media_type.clone(),
                    data: image.to_base64(),
                },
            },
            GeminiRequestPart::Text { text: instruction },
        ];

        Self {
            contents: vec![GeminiContent { parts }],
            generation_config: GeminiConfig {
                response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContentResponse>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
    #[serde(default)]
    block_reason_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPartResponse {
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FailureKind, Style, Variant};

    fn png() -> ImagePayload {
        ImagePayload::new(vec![0x89, 0x50, 0x4E, 0x47], "image/png")
    }

    /// A transformer that would fail with a network error if it ever sent.
    fn unreachable_transformer(api_key: Option<&str>) -> GeminiTransformer {
        GeminiTransformer {
            client: reqwest::Client::new(),
            api_key: api_key.map(str::to_string),
            model: GeminiModel::default(),
            base_url: "http://127.0.0.1:9".to_string(),
        }
    }

    fn parse(json: &str) -> Result<ImagePayload> {
        extract_image(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_gemini_model_as_str() {
        assert_eq!(GeminiModel::NanoBanana.as_str(), "gemini-2.5-flash-image");
        assert_eq!(GeminiModel::default(), GeminiModel::NanoBanana);
    }

    #[test]
    fn test_builder_with_explicit_key_and_base_url() {
        let t = GeminiTransformerBuilder::new()
            .api_key("test-key")
            .base_url("http://localhost:8080/")
            .model(GeminiModel::NanoBananaPro)
            .build();
        assert_eq!(t.api_key.as_deref(), Some("test-key"));
        assert_eq!(t.base_url, "http://localhost:8080");
        assert_eq!(t.model(), GeminiModel::NanoBananaPro);
    }

    #[test]
    fn test_builder_treats_blank_key_as_missing() {
        let t = GeminiTransformerBuilder::new().api_key("  ").build();
        assert_ne!(t.api_key.as_deref(), Some("  "));
    }

    #[tokio::test]
    async fn test_invalid_style_fails_before_any_call() {
        let t = unreachable_transformer(Some("key"));
        for selector in ["Cyberpunk", "business formal", ""] {
            let req = TransformRequest::new(png(), Variant::PortraitStudio)
                .with_style_selector(selector);
            let err = t.transform(&req).await.unwrap_err();
            assert_eq!(err.kind(), FailureKind::InvalidStyle);
        }
    }

    #[tokio::test]
    async fn test_missing_key_is_transport_failure() {
        let t = unreachable_transformer(None);
        let req = TransformRequest::new(png(), Variant::PortraitStudio).with_style(Style::SmartCasual);
        let err = t.transform(&req).await.unwrap_err();
        assert!(matches!(err, StudioError::Auth(_)));
        assert_eq!(err.kind(), FailureKind::TransportFailure);
    }

    #[test]
    fn test_request_puts_image_before_text() {
        let req = GeminiRequest::new(&png(), "Make it formal".into());
        let json = serde_json::to_value(&req).unwrap();

        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[0]["inlineData"]["data"], "iVBORw==");
        assert_eq!(parts[1]["text"], "Make it formal");
        assert!(json.get("generationConfig").is_some());
        assert!(json.get("generation_config").is_none());
    }

    #[test]
    fn test_extract_first_inline_image() {
        let image = parse(
            r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "Here is your portrait"},
                        {"inlineData": {"mimeType": "image/jpeg", "data": "/9j/4A=="}},
                        {"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}}
                    ]
                },
                "finishReason": "STOP"
            }]
        }"#,
        )
        .unwrap();
        assert_eq!(image.media_type, "image/jpeg");
        assert_eq!(image.bytes, vec![0xFF, 0xD8, 0xFF, 0xE0]);
    }

    #[test]
    fn test_extract_skips_non_image_inline_data() {
        let image = parse(
            r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"inlineData": {"mimeType": "text/plain", "data": "aGk="}},
                        {"inlineData": {"mimeType": "image/webp", "data": "UklGRg=="}}
                    ]
                }
            }]
        }"#,
        )
        .unwrap();
        assert_eq!(image.media_type, "image/webp");
        assert_eq!(image.bytes, b"RIFF".to_vec());
    }

    #[test]
    fn test_extract_no_image_part() {
        let err = parse(
            r#"{
            "candidates": [{
                "content": {"parts": [{"text": "I can't do that"}]},
                "finishReason": "NO_IMAGE"
            }]
        }"#,
        )
        .unwrap_err();
        assert!(matches!(err, StudioError::NoImageReturned(ref m) if m.contains("NO_IMAGE")));
    }

    #[test]
    fn test_extract_malformed_image_data_is_not_a_decode_failure() {
        let err = parse(
            r#"{
            "candidates": [{
                "content": {
                    "parts": [{"inlineData": {"mimeType": "image/png", "data": "@@@"}}]
                }
            }]
        }"#,
        )
        .unwrap_err();
        assert!(matches!(err, StudioError::NoImageReturned(ref m) if m.contains("invalid image data")));
        assert_eq!(err.kind(), FailureKind::NoImageReturned);
    }

    #[test]
    fn test_extract_no_candidates() {
        let err = parse(r#"{"candidates": []}"#).unwrap_err();
        assert_eq!(err.kind(), FailureKind::NoImageReturned);
    }

    #[test]
    fn test_extract_prompt_feedback_block() {
        let err = parse(
            r#"{
            "candidates": [],
            "promptFeedback": {
                "blockReason": "SAFETY",
                "blockReasonMessage": "Prompt was blocked due to safety"
            }
        }"#,
        )
        .unwrap_err();
        assert!(
            matches!(err, StudioError::ContentBlocked(ref m) if m == "Prompt was blocked due to safety")
        );
    }

    #[test]
    fn test_extract_safety_finish_reason() {
        let err = parse(r#"{"candidates": [{"finishReason": "IMAGE_SAFETY"}]}"#).unwrap_err();
        assert!(matches!(err, StudioError::ContentBlocked(_)));
        assert_eq!(err.kind(), FailureKind::NoImageReturned);
    }

    #[test]
    fn test_parse_error_statuses() {
        let headers = reqwest::header::HeaderMap::new();
        assert!(matches!(
            parse_error(401, "bad key", &headers),
            StudioError::Auth(_)
        ));
        assert!(matches!(
            parse_error(500, "boom", &headers),
            StudioError::Api { status: 500, .. }
        ));
        assert!(matches!(
            parse_error(400, "Request blocked by safety settings", &headers),
            StudioError::ContentBlocked(_)
        ));

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(reqwest::header::RETRY_AFTER, "30".parse().unwrap());
        assert!(matches!(
            parse_error(429, "quota", &headers),
            StudioError::RateLimited { retry_after: Some(d) } if d.as_secs() == 30
        ));
    }
}
