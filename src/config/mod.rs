mod env;

pub use env::EnvConfig;

use crate::error::Result;
use crate::utils::ConfigValidator;
use serde::Serialize;

/// Environment variable holding the Gemini API key.
pub const GEMINI_API_KEY_VAR: &str = "GEMINI_API_KEY";

pub const DEFAULT_GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Resolved settings for the Gemini transport.
#[derive(Clone, Debug, Serialize)]
pub struct GeminiSettings {
    pub endpoint: String,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: String,
}

impl GeminiSettings {
    /// Build settings from the environment. Missing `GEMINI_API_KEY` is a
    /// hard failure for every component that talks to the API.
    pub fn from_env() -> Result<Self> {
        let api_key = EnvConfig::get_env(GEMINI_API_KEY_VAR)?;
        ConfigValidator::validate_api_key(&api_key)?;

        let endpoint = EnvConfig::get_env_optional("VISPIO_GEMINI_ENDPOINT")
            .unwrap_or_else(|| DEFAULT_GEMINI_ENDPOINT.to_string());
        ConfigValidator::validate_endpoint(&endpoint)?;

        let model = EnvConfig::get_env_optional("VISPIO_GEMINI_MODEL")
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        Ok(Self {
            endpoint,
            model,
            api_key,
        })
    }

    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            api_key: api_key.into(),
        }
    }
}
