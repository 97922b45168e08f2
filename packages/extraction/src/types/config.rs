//! Provider configuration: persisted settings and the runtime form handed
//! to the orchestrator.

use serde::{Deserialize, Serialize};

use crate::error::{ExtractionError, Result};
use crate::security::SecretString;

/// Default instruction prepended to every extraction request.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an expert at reading technical drawings. \
Extract the requested information from the attached document. \
If a value is not present in the document, return null for it.";

pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Which backend a configuration selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProviderKind {
    #[default]
    Structured,
    GenericChat,
}

/// Persisted endpoint settings for the generic chat provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericChatSettings {
    #[serde(default)]
    pub endpoint_base: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub model_name: String,
}

/// User settings, persisted by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub provider: ProviderKind,

    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Sampling temperature in [0, 1]
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default)]
    pub generic_chat: GenericChatSettings,

    /// Template used when the caller does not name one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_template_id: Option<String>,
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            system_prompt: default_system_prompt(),
            temperature: DEFAULT_TEMPERATURE,
            generic_chat: GenericChatSettings::default(),
            active_template_id: None,
        }
    }
}

impl Settings {
    /// Check values a user can get wrong.
    pub fn validate(&self) -> Result<()> {
        validate_temperature(self.temperature)
    }

    /// Build the runtime configuration.
    ///
    /// `structured` carries the environment-sourced credentials for the
    /// structured provider; it is only used when that provider is selected.
    pub fn provider_config(&self, structured: StructuredConfig) -> ProviderConfig {
        let provider = match self.provider {
            ProviderKind::Structured => Provider::Structured(structured),
            ProviderKind::GenericChat => Provider::GenericChat(GenericChatConfig {
                endpoint_base: self.generic_chat.endpoint_base.clone(),
                api_key: SecretString::new(self.generic_chat.api_key.clone()),
                model_name: self.generic_chat.model_name.clone(),
            }),
        };

        ProviderConfig {
            provider,
            system_prompt: self.system_prompt.clone(),
            temperature: self.temperature,
        }
    }
}

fn validate_temperature(temperature: f32) -> Result<()> {
    if (0.0..=1.0).contains(&temperature) {
        Ok(())
    } else {
        Err(ExtractionError::Config(format!(
            "temperature must be between 0 and 1, got {}",
            temperature
        )))
    }
}

/// Structured provider credentials and endpoint.
#[derive(Debug, Clone, Default)]
pub struct StructuredConfig {
    /// Sourced from the process environment, not from settings
    pub api_key: Option<SecretString>,

    /// Model override (client default when `None`)
    pub model: Option<String>,

    /// Base URL override (client default when `None`)
    pub base_url: Option<String>,
}

impl StructuredConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretString::new(api_key)),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }
}

/// Generic chat endpoint configuration.
#[derive(Debug, Clone)]
pub struct GenericChatConfig {
    pub endpoint_base: String,
    pub api_key: SecretString,
    pub model_name: String,
}

impl GenericChatConfig {
    pub fn new(
        endpoint_base: impl Into<String>,
        api_key: impl Into<String>,
        model_name: impl Into<String>,
    ) -> Self {
        Self {
            endpoint_base: endpoint_base.into(),
            api_key: SecretString::new(api_key),
            model_name: model_name.into(),
        }
    }

    /// Every part must be non-empty before a request is made.
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.endpoint_base.trim().is_empty() {
            missing.push("endpoint URL");
        }
        if self.api_key.expose().trim().is_empty() {
            missing.push("API key");
        }
        if self.model_name.trim().is_empty() {
            missing.push("model name");
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ExtractionError::Config(format!(
                "generic chat provider is missing: {}",
                missing.join(", ")
            )))
        }
    }
}

/// The active backend. Exactly one variant is active at a time.
#[derive(Debug, Clone)]
pub enum Provider {
    Structured(StructuredConfig),
    GenericChat(GenericChatConfig),
}

impl Provider {
    pub fn kind(&self) -> ProviderKind {
        match self {
            Provider::Structured(_) => ProviderKind::Structured,
            Provider::GenericChat(_) => ProviderKind::GenericChat,
        }
    }
}

/// Runtime configuration for one orchestrator.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub provider: Provider,
    pub system_prompt: String,
    pub temperature: f32,
}

impl ProviderConfig {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Shared parameter checks; provider-specific checks happen in the adapters.
    pub fn validate(&self) -> Result<()> {
        validate_temperature(self.temperature)?;
        if let Provider::GenericChat(chat) = &self.provider {
            chat.validate()?;
        }
        Ok(())
    }
}
