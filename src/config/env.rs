use crate::error::{Result, VispioError};
use std::env;

/// Environment variable lookup with `${VAR}` indirection.
pub struct EnvConfig;

impl EnvConfig {
    /// Resolve an API key from a literal value or an environment reference.
    ///
    /// Order:
    /// 1. literal value passed in (not wrapped in `${}`)
    /// 2. environment variable named inside `${VAR_NAME}`
    /// 3. `default_env_var` when the value is empty
    pub fn get_api_key(api_key: &str, default_env_var: &str) -> Result<String> {
        if api_key.starts_with("${") && api_key.ends_with('}') {
            let env_var_name = &api_key[2..api_key.len() - 1];
            Self::get_env(env_var_name)
        } else if api_key.is_empty() {
            Self::get_env(default_env_var)
        } else {
            Ok(api_key.to_string())
        }
    }

    pub fn get_env(key: &str) -> Result<String> {
        env::var(key).map_err(|_| VispioError::MissingConfig(format!(
            "environment variable `{key}` is not set"
        )))
    }

    pub fn get_env_optional(key: &str) -> Option<String> {
        env::var(key).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_api_key_direct() {
        let result = EnvConfig::get_api_key("AIzaSyDirectKey1234567890", "VISPIO_TEST_KEY");
        assert_eq!(result.unwrap(), "AIzaSyDirectKey1234567890");
    }

    #[test]
    fn test_get_api_key_env_var() {
        env::set_var("VISPIO_TEST_REF_KEY", "resolved_value");
        let result = EnvConfig::get_api_key("${VISPIO_TEST_REF_KEY}", "FALLBACK_KEY");
        assert_eq!(result.unwrap(), "resolved_value");
        env::remove_var("VISPIO_TEST_REF_KEY");
    }

    #[test]
    fn test_get_api_key_empty_falls_back() {
        env::set_var("VISPIO_TEST_DEFAULT_KEY", "default_value");
        let result = EnvConfig::get_api_key("", "VISPIO_TEST_DEFAULT_KEY");
        assert_eq!(result.unwrap(), "default_value");
        env::remove_var("VISPIO_TEST_DEFAULT_KEY");
    }

    #[test]
    fn test_missing_env_is_hard_error() {
        env::remove_var("VISPIO_TEST_ABSENT");
        assert!(EnvConfig::get_env("VISPIO_TEST_ABSENT").is_err());
    }
}
