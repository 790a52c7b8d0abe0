use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use serde_json::{json, Value};
use tracing::instrument;

use super::client::{DynVisionClient, VisionClient};
use super::types::{GenerateRequest, GenerateResponse};
use crate::config::GeminiSettings;
use crate::error::{Result, VispioError};

/// HTTP transport for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiHttpClient {
    client: reqwest::Client,
    settings: GeminiSettings,
}

impl GeminiHttpClient {
    /// Tuned HTTP client shared across requests.
    ///
    /// - connection pool reuse per host
    /// - connect and total timeouts so a hung upstream eventually fails
    fn create_optimized_client() -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(std::time::Duration::from_secs(90))
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(300))
            .build()
            .map_err(|e| VispioError::Other(anyhow::anyhow!("failed to build HTTP client: {e}")))
    }

    pub fn new(settings: GeminiSettings) -> Result<Self> {
        Ok(Self {
            client: Self::create_optimized_client()?,
            settings,
        })
    }

    /// Build from `GEMINI_API_KEY` and optional endpoint/model overrides.
    /// A missing key is a hard constructor failure.
    pub fn from_env() -> Result<Self> {
        Self::new(GeminiSettings::from_env()?)
    }

    fn endpoint_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.settings.endpoint.trim_end_matches('/'),
            self.settings.model,
            self.settings.api_key
        )
    }

    /// One request = one text part plus at most one inline image part.
    fn build_body(&self, request: &GenerateRequest) -> Value {
        let mut parts = vec![json!({ "text": request.prompt })];

        if let Some(image) = &request.image {
            parts.push(json!({
                "inline_data": {
                    "mime_type": request.mime_type,
                    "data": general_purpose::STANDARD.encode(image),
                }
            }));
        }

        json!({
            "contents": [{ "parts": parts }],
            "generationConfig": {
                "temperature": request.params.temperature,
                "maxOutputTokens": request.params.max_output_tokens,
            }
        })
    }

    fn truncate(text: &str, limit: usize) -> String {
        if text.len() > limit {
            let mut end = limit;
            while !text.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...(truncated, {} bytes total)", &text[..end], text.len())
        } else {
            text.to_string()
        }
    }
}

#[async_trait]
impl VisionClient for GeminiHttpClient {
    #[instrument(skip(self, request), fields(model = %self.settings.model))]
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let body = self.build_body(&request);

        let response = self
            .client
            .post(self.endpoint_url())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| VispioError::Api(format!("HTTP request error: {e}")))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| VispioError::Api(format!("failed to read response: {e}")))?;

        if !status.is_success() {
            return Err(VispioError::Api(format!(
                "request failed with status {}: {}",
                status,
                Self::truncate(&response_text, 500)
            )));
        }

        let payload: Value = serde_json::from_str(&response_text).map_err(|e| {
            VispioError::MalformedResponse(format!(
                "{e}: {}",
                Self::truncate(&response_text, 500)
            ))
        })?;

        // Absence of the candidates path is "no result", not an error; the
        // caller decides how to degrade.
        let text = payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Ok(GenerateResponse {
            text,
            metadata: Some(payload),
        })
    }

    fn clone_dyn(&self) -> DynVisionClient {
        Arc::new(self.clone())
    }
}
