use anyhow::{bail, Context, Result};
use clap::{Subcommand, ValueEnum};
use colored::Colorize;
use drawing_extraction::{ProviderKind, SecretString, Settings, Store, DEFAULT_SYSTEM_PROMPT};

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    /// Schema-constrained provider configured from the environment
    Structured,
    /// Any OpenAI-compatible chat completions endpoint
    GenericChat,
}

impl From<ProviderArg> for ProviderKind {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Structured => ProviderKind::Structured,
            ProviderArg::GenericChat => ProviderKind::GenericChat,
        }
    }
}

#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Print the current settings (keys masked)
    Show,

    /// Change one or more settings
    Set {
        #[arg(long, value_enum)]
        provider: Option<ProviderArg>,

        /// Generic chat endpoint, base URL or full completions URL
        #[arg(long)]
        endpoint: Option<String>,

        /// Generic chat API key
        #[arg(long)]
        api_key: Option<String>,

        /// Generic chat model name
        #[arg(long)]
        model: Option<String>,

        /// Sampling temperature between 0 and 1
        #[arg(long)]
        temperature: Option<f32>,

        #[arg(long)]
        system_prompt: Option<String>,
    },

    /// Restore the default system prompt
    ResetPrompt,
}

pub fn run(config: &Config, store: &mut Store, command: SettingsCommand) -> Result<()> {
    match command {
        SettingsCommand::Show => {
            print_settings(config, store);
            Ok(())
        }
        SettingsCommand::Set {
            provider,
            endpoint,
            api_key,
            model,
            temperature,
            system_prompt,
        } => {
            let mut settings = store.settings().clone();
            let changed = apply_changes(
                &mut settings,
                provider,
                endpoint,
                api_key,
                model,
                temperature,
                system_prompt,
            );
            if !changed {
                bail!("nothing to change; pass at least one option (see `drawx settings set --help`)");
            }
            store
                .update_settings(settings)
                .context("failed to save settings")?;
            println!("{}", "Settings saved".bright_green());
            Ok(())
        }
        SettingsCommand::ResetPrompt => {
            let mut settings = store.settings().clone();
            settings.system_prompt = DEFAULT_SYSTEM_PROMPT.to_string();
            store
                .update_settings(settings)
                .context("failed to save settings")?;
            println!("{}", "System prompt restored".bright_green());
            Ok(())
        }
    }
}

/// Apply the given options; returns whether anything was set.
fn apply_changes(
    settings: &mut Settings,
    provider: Option<ProviderArg>,
    endpoint: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    system_prompt: Option<String>,
) -> bool {
    let mut changed = false;
    if let Some(provider) = provider {
        settings.provider = provider.into();
        changed = true;
    }
    if let Some(endpoint) = endpoint {
        settings.generic_chat.endpoint_base = endpoint;
        changed = true;
    }
    if let Some(api_key) = api_key {
        settings.generic_chat.api_key = api_key;
        changed = true;
    }
    if let Some(model) = model {
        settings.generic_chat.model_name = model;
        changed = true;
    }
    if let Some(temperature) = temperature {
        settings.temperature = temperature;
        changed = true;
    }
    if let Some(prompt) = system_prompt {
        settings.system_prompt = prompt;
        changed = true;
    }
    changed
}

fn print_settings(config: &Config, store: &Store) {
    let settings = store.settings();
    let structured_key = config
        .gemini_api_key
        .as_ref()
        .map(SecretString::masked)
        .unwrap_or_else(|| "(not set)".to_string());

    println!("{}", "Provider".bold());
    println!("  active          {:?}", settings.provider);
    println!("  temperature     {}", settings.temperature);
    println!();
    println!("{}", "Structured (environment)".bold());
    println!("  GEMINI_API_KEY  {}", structured_key);
    println!(
        "  model           {}",
        config.gemini_model.as_deref().unwrap_or("(default)")
    );
    println!();
    println!("{}", "Generic chat".bold());
    println!("  endpoint        {}", or_unset(&settings.generic_chat.endpoint_base));
    println!(
        "  api key         {}",
        SecretString::new(settings.generic_chat.api_key.clone()).masked()
    );
    println!("  model           {}", or_unset(&settings.generic_chat.model_name));
    println!();
    println!("{}", "System prompt".bold());
    println!("  {}", settings.system_prompt);
    println!();
    println!("{} {}", "Store:".dimmed(), store.path().display());
}

fn or_unset(value: &str) -> &str {
    if value.trim().is_empty() {
        "(not set)"
    } else {
        value
    }
}
