use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fixed prompt template selector: five caption styles plus four specialized
/// analyses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    Descriptive,
    Creative,
    Technical,
    Simple,
    Detailed,
    Location,
    Product,
    Comprehensive,
    TextExtraction,
}

impl AnalysisKind {
    pub const ALL: [AnalysisKind; 9] = [
        AnalysisKind::Descriptive,
        AnalysisKind::Creative,
        AnalysisKind::Technical,
        AnalysisKind::Simple,
        AnalysisKind::Detailed,
        AnalysisKind::Location,
        AnalysisKind::Product,
        AnalysisKind::Comprehensive,
        AnalysisKind::TextExtraction,
    ];

    /// Caption styles, as opposed to the specialized analyses.
    pub const CAPTION_STYLES: [AnalysisKind; 5] = [
        AnalysisKind::Descriptive,
        AnalysisKind::Creative,
        AnalysisKind::Technical,
        AnalysisKind::Simple,
        AnalysisKind::Detailed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Descriptive => "descriptive",
            AnalysisKind::Creative => "creative",
            AnalysisKind::Technical => "technical",
            AnalysisKind::Simple => "simple",
            AnalysisKind::Detailed => "detailed",
            AnalysisKind::Location => "location",
            AnalysisKind::Product => "product",
            AnalysisKind::Comprehensive => "comprehensive",
            AnalysisKind::TextExtraction => "text_extraction",
        }
    }
}

pub const MIN_TEMPERATURE: f32 = 0.0;
pub const MAX_TEMPERATURE: f32 = 1.0;

/// Generation bounds forwarded to the API.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl GenerationParams {
    /// Force the fields into their valid ranges: temperature within
    /// [`MIN_TEMPERATURE`, `MAX_TEMPERATURE`], token budget at least 1.
    /// Applied by the request constructors, so out-of-range caller input
    /// never reaches the wire.
    pub fn clamped(self) -> Self {
        let temperature = self.temperature.clamp(MIN_TEMPERATURE, MAX_TEMPERATURE);
        if (temperature - self.temperature).abs() > f32::EPSILON || self.max_output_tokens == 0 {
            tracing::warn!(
                temperature = self.temperature,
                max_output_tokens = self.max_output_tokens,
                "generation params out of range, clamping"
            );
        }
        Self {
            temperature,
            max_output_tokens: self.max_output_tokens.max(1),
        }
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 150,
        }
    }
}

/// Transport-level request: one text instruction part plus an optional inline
/// image part. Immutable once constructed.
#[derive(Clone, Debug)]
pub struct GenerateRequest {
    pub prompt: String,
    pub image: Option<Vec<u8>>,
    pub mime_type: String,
    pub params: GenerationParams,
}

impl GenerateRequest {
    pub fn text_only(prompt: impl Into<String>, params: GenerationParams) -> Self {
        Self {
            prompt: prompt.into(),
            image: None,
            mime_type: String::new(),
            params: params.clamped(),
        }
    }

    pub fn with_image(
        prompt: impl Into<String>,
        image: Vec<u8>,
        params: GenerationParams,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            image: Some(image),
            mime_type: "image/jpeg".to_string(),
            params: params.clamped(),
        }
    }
}

/// Transport-level response. `text` is `None` when the candidates path is
/// absent from the response body.
#[derive(Clone, Debug)]
pub struct GenerateResponse {
    pub text: Option<String>,
    pub metadata: Option<Value>,
}

/// Outcome of one analysis request. `success` is false when the upstream
/// returned no usable text and `text` carries a placeholder message.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub kind: AnalysisKind,
    pub text: String,
    pub success: bool,
}
