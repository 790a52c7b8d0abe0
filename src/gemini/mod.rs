mod client;
mod echo;
mod http;
pub mod prompts;
mod types;

pub use client::{DynVisionClient, VisionClient};
pub use echo::LocalEchoClient;
pub use http::GeminiHttpClient;
pub use types::{
    AnalysisKind, AnalysisResult, GenerateRequest, GenerateResponse, GenerationParams,
    MAX_TEMPERATURE, MIN_TEMPERATURE,
};

use crate::error::Result;

/// Caption and analysis service over a vision transport.
///
/// Selects the fixed instruction template for the requested kind and forwards
/// it together with the prepared image bytes. An empty or missing response
/// yields `success: false` with a placeholder message instead of an error, so
/// callers stay on one code path during upstream outages.
pub struct AnalysisClient {
    client: DynVisionClient,
}

impl AnalysisClient {
    pub fn new(client: DynVisionClient) -> Self {
        Self { client }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(std::sync::Arc::new(GeminiHttpClient::from_env()?)))
    }

    pub async fn analyze(
        &self,
        image_bytes: &[u8],
        kind: AnalysisKind,
        params: GenerationParams,
    ) -> Result<AnalysisResult> {
        tracing::info!(
            kind = kind.as_str(),
            temperature = params.temperature,
            "requesting image analysis"
        );

        let request =
            GenerateRequest::with_image(prompts::template(kind), image_bytes.to_vec(), params);
        let response = self.client.generate(request).await?;

        let result = match response.text {
            Some(text) => AnalysisResult {
                kind,
                text,
                success: true,
            },
            None => {
                tracing::warn!(kind = kind.as_str(), "empty response from upstream");
                AnalysisResult {
                    kind,
                    text: prompts::NO_RESULT_PLACEHOLDER.to_string(),
                    success: false,
                }
            }
        };

        if result.success {
            tracing::info!(
                kind = kind.as_str(),
                preview = %result.text.chars().take(50).collect::<String>(),
                "analysis complete"
            );
        }
        Ok(result)
    }

    /// Analyze with the kind's recommended generation defaults.
    pub async fn analyze_with_defaults(
        &self,
        image_bytes: &[u8],
        kind: AnalysisKind,
    ) -> Result<AnalysisResult> {
        self.analyze(image_bytes, kind, prompts::default_params(kind))
            .await
    }

    /// One-shot text-only probe to confirm the configured key works.
    pub async fn validate_api_key(&self) -> bool {
        let request = GenerateRequest::text_only(
            "Hello, this is a test.",
            GenerationParams {
                temperature: 0.0,
                max_output_tokens: 10,
            },
        );

        match self.client.generate(request).await {
            Ok(response) => response.text.is_some(),
            Err(e) => {
                tracing::error!(error = %e, "API key validation failed");
                false
            }
        }
    }
}
