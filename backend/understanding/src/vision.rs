//! Vision understanding: submit instruction + image to Gemini and read back text.
//!
//! Talks to the `generateContent` REST endpoint directly.
use std::time::Instant;

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use defectscan_core::{
    DefectError, GenerationRequest, GenerationResponse, MultimodalGenerator, Part,
};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// Environment variable named in missing-credential errors.
pub const API_KEY_ENV: &str = "GOOGLE_GEMINI_API_KEY";

const PROVIDER_NAME: &str = "gemini";

/// Google Gemini multimodal provider.
///
/// The key is optional at construction; a missing key only surfaces when
/// `generate` is called.
pub struct GeminiProvider {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<WirePart>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum WirePart {
    Text { text: String },
    InlineData { inline_data: Blob },
}

#[derive(Serialize)]
struct Blob {
    mime_type: String,
    data: String,
}

impl From<&Part> for WirePart {
    fn from(part: &Part) -> Self {
        match part {
            Part::Text(text) => WirePart::Text { text: text.clone() },
            Part::InlineData(img) => WirePart::InlineData {
                inline_data: Blob {
                    mime_type: img.mime_type.clone(),
                    data: STANDARD.encode(&img.data),
                },
            },
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Text of the first candidate, with all of its text parts joined.
fn candidate_text(response: GenerateContentResponse) -> Result<String, DefectError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .map(|r| format!("prompt blocked: {r}"))
            .unwrap_or_else(|| "no candidates returned".to_string());
        return Err(DefectError::EmptyResponse {
            provider: PROVIDER_NAME.to_string(),
            reason,
        });
    };

    let texts: Vec<String> = candidate
        .content
        .map(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|p| p.text)
        .collect();

    if texts.is_empty() {
        let reason = candidate
            .finish_reason
            .map(|r| format!("finish reason {r}"))
            .unwrap_or_else(|| "candidate has no text parts".to_string());
        return Err(DefectError::EmptyResponse {
            provider: PROVIDER_NAME.to_string(),
            reason,
        });
    }

    Ok(texts.concat())
}

#[async_trait]
impl MultimodalGenerator for GeminiProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        let api_key = match self.api_key.as_deref() {
            Some(key) if !key.is_empty() => key,
            _ => return Err(DefectError::MissingCredential(API_KEY_ENV.to_string()).into()),
        };

        let start = Instant::now();
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: request.parts.iter().map(WirePart::from).collect(),
            }],
        };

        info!(model = %self.model, parts = request.parts.len(), "[Vision] Sending request to Gemini");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .context("Gemini HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&error_body)
                .map(|e| e.error.message)
                .unwrap_or(error_body);
            return Err(DefectError::Provider {
                provider: PROVIDER_NAME.to_string(),
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;
        let text = candidate_text(parsed)?;

        let latency_ms = start.elapsed().as_millis() as u64;
        debug!(latency_ms, chars = text.len(), "Gemini response received");

        Ok(GenerationResponse {
            text,
            provider: PROVIDER_NAME.to_string(),
            model: self.model.clone(),
            latency_ms,
        })
    }
}
