use anyhow::{Context, Result};
use dotenvy::dotenv;
use drawing_extraction::{SecretString, StructuredConfig};
use std::env;
use std::path::PathBuf;

/// Process configuration loaded from environment variables.
///
/// Provider choice, prompt and templates live in the store; only the
/// structured provider's credentials and the data directory come from here.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<SecretString>,
    pub gemini_model: Option<String>,
    pub gemini_base_url: Option<String>,
    pub data_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let data_dir = match env::var("DRAWX_DATA_DIR") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => dirs::data_dir()
                .context("no platform data directory; set DRAWX_DATA_DIR")?
                .join("drawx"),
        };

        Ok(Self {
            gemini_api_key: non_empty_var("GEMINI_API_KEY")
                .or_else(|| non_empty_var("API_KEY"))
                .map(SecretString::new),
            gemini_model: non_empty_var("GEMINI_MODEL"),
            gemini_base_url: non_empty_var("GEMINI_BASE_URL"),
            data_dir,
        })
    }

    /// Structured provider settings. A missing key is reported when an
    /// extraction is attempted, not here.
    pub fn structured(&self) -> StructuredConfig {
        let mut config = StructuredConfig {
            api_key: self.gemini_api_key.clone(),
            ..Default::default()
        };
        if let Some(model) = &self.gemini_model {
            config = config.with_model(model.clone());
        }
        if let Some(url) = &self.gemini_base_url {
            config = config.with_base_url(url.clone());
        }
        config
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_without_key() {
        let config = Config {
            gemini_api_key: None,
            gemini_model: Some("gemini-test".into()),
            gemini_base_url: None,
            data_dir: PathBuf::from("/tmp/drawx"),
        };

        let structured = config.structured();
        assert!(structured.api_key.is_none());
        assert_eq!(structured.model.as_deref(), Some("gemini-test"));
        assert!(structured.base_url.is_none());
    }

    #[test]
    fn test_structured_with_key_and_url() {
        let config = Config {
            gemini_api_key: Some(SecretString::new("key-123")),
            gemini_model: None,
            gemini_base_url: Some("http://localhost:9000".into()),
            data_dir: PathBuf::from("/tmp/drawx"),
        };

        let structured = config.structured();
        assert_eq!(structured.api_key.unwrap().expose(), "key-123");
        assert_eq!(structured.base_url.as_deref(), Some("http://localhost:9000"));
    }
}
