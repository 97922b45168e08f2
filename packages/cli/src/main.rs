//! drawx: extract fields from technical drawings with a vision model.
//!
//! Settings and templates persist in `store.json` under the data directory;
//! the structured provider's key comes from the environment.

mod cmd;
mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use drawing_extraction::Store;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cmd::{extract::ExtractArgs, settings::SettingsCommand, templates::TemplatesCommand};
use crate::config::Config;

#[derive(Parser)]
#[command(name = "drawx")]
#[command(about = "Template-driven field extraction from technical drawings")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract template fields from one or more documents
    Extract(ExtractArgs),

    /// Manage extraction templates
    #[command(subcommand)]
    Templates(TemplatesCommand),

    /// Show or change provider settings
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// Print the compiled request shape for a template
    Schema {
        /// Template id (defaults to the active template)
        #[arg(short, long)]
        template: Option<String>,

        /// Which provider shape to print
        #[arg(long, value_enum, default_value_t = cmd::schema::SchemaForm::Structured)]
        form: cmd::schema::SchemaForm,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,drawing_extraction=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let mut store = Store::load(&config.data_dir)
        .with_context(|| format!("failed to load store from {}", config.data_dir.display()))?;

    match cli.command {
        Commands::Extract(args) => cmd::extract::run(&config, &store, args).await,
        Commands::Templates(command) => cmd::templates::run(&mut store, command),
        Commands::Settings(command) => cmd::settings::run(&config, &mut store, command),
        Commands::Schema { template, form } => {
            cmd::schema::run(&store, template.as_deref(), form)
        }
    }
}
