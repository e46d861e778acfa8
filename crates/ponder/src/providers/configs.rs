use anyhow::{anyhow, Result};
use std::env;

pub const OPENAI_HOST: &str = "https://api.openai.com";

/// Connection settings for an OpenAI compatible chat completions endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAiProviderConfig {
    pub host: String,
    pub api_key: String,
}

impl OpenAiProviderConfig {
    pub fn new<H: Into<String>, K: Into<String>>(host: H, api_key: K) -> Self {
        Self {
            host: host.into(),
            api_key: api_key.into(),
        }
    }

    /// Load from `OPENAI_API_KEY` (required) and `OPENAI_HOST` (optional)
    pub fn from_env() -> Result<Self> {
        let api_key = get_env("OPENAI_API_KEY", true, None)?
            .ok_or_else(|| anyhow!("OpenAI API key should be present"))?;

        let host = get_env("OPENAI_HOST", false, Some(OPENAI_HOST.to_string()))?
            .unwrap_or_else(|| OPENAI_HOST.to_string());

        Ok(Self::new(host, api_key))
    }
}

/// Helper function to get environment variables with error handling
fn get_env(key: &str, required: bool, default: Option<String>) -> Result<Option<String>> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) if !required => Ok(default),
        Err(env::VarError::NotPresent) => Err(anyhow!(
            "Environment variable '{}' is required but not set.",
            key
        )),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_env_defaults() -> Result<()> {
        let missing = "PONDER_TEST_SURELY_UNSET_VARIABLE";
        assert_eq!(get_env(missing, false, Some("x".to_string()))?, Some("x".to_string()));
        assert_eq!(get_env(missing, false, None)?, None);

        let err = get_env(missing, true, None).unwrap_err();
        assert!(err.to_string().contains(missing));
        Ok(())
    }
}
