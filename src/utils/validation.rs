use crate::error::{Result, VispioError};
use anyhow::anyhow;

/// Pre-flight checks for client configuration.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Reject keys that are empty or look like placeholders.
    pub fn validate_api_key(api_key: &str) -> Result<()> {
        if api_key.is_empty() {
            return Err(VispioError::MissingConfig("API key is empty".to_string()));
        }

        if api_key.starts_with("your_") || api_key.len() < 10 {
            return Err(VispioError::Other(anyhow!(
                "API key looks like a placeholder, provide a real key"
            )));
        }

        Ok(())
    }

    pub fn validate_endpoint(url: &str) -> Result<()> {
        if url.is_empty() {
            return Err(VispioError::MissingConfig("endpoint URL is empty".to_string()));
        }

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(VispioError::Other(anyhow!(
                "endpoint URL must start with http:// or https://"
            )));
        }

        Ok(())
    }
}
