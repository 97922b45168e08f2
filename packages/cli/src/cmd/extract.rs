use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use drawing_extraction::{
    export_csv, export_json, BatchItem, BatchRunner, DocumentStatus, Field, Orchestrator, Store,
};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::resolve_template;
use crate::config::Config;

#[derive(Args)]
pub struct ExtractArgs {
    /// Drawing files (images or PDFs)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Template id (defaults to the active template)
    #[arg(short, long)]
    pub template: Option<String>,

    /// Write results as JSON to this path
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Write results as CSV to this path
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Only print the summary, not every extracted value
    #[arg(short, long)]
    pub quiet: bool,
}

pub async fn run(config: &Config, store: &Store, args: ExtractArgs) -> Result<()> {
    let template = resolve_template(store, args.template.as_deref())?;
    let orchestrator = Orchestrator::new(store.settings().provider_config(config.structured()));

    let mut batch = BatchRunner::new();
    for path in &args.files {
        batch.add(load_item(path)?);
    }

    println!(
        "{} {} document(s) with template {} via {:?}",
        "Extracting".bright_cyan().bold(),
        batch.items().len(),
        template.name.bold(),
        orchestrator.provider_kind()
    );

    let summary = batch
        .run_with(&orchestrator, &template.fields, print_progress)
        .await;

    if !args.quiet {
        for item in batch.items() {
            print_result(item, &template.fields);
        }
    }

    if let Some(path) = &args.json {
        let contents = export_json(batch.items()).context("failed to serialize results")?;
        write_export(path, &contents)?;
    }
    if let Some(path) = &args.csv {
        write_export(path, &export_csv(batch.items(), &template.fields))?;
    }

    println!();
    println!(
        "{} {} completed, {} failed",
        "Done:".bright_green().bold(),
        summary.completed,
        summary.failed
    );

    if summary.failed > 0 {
        bail!("{} of {} documents failed", summary.failed, summary.processed);
    }
    Ok(())
}

fn load_item(path: &Path) -> Result<BatchItem> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    info!(file = %file_name, mime = %mime_type, bytes = bytes.len(), "Loaded document");
    Ok(BatchItem::from_bytes(file_name, bytes, mime_type))
}

fn write_export(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    println!("{} {}", "Wrote".bright_blue(), path.display());
    Ok(())
}

fn print_progress(item: &BatchItem) {
    match item.status {
        DocumentStatus::Processing => {
            println!("  {} {}", "…".yellow(), item.file_name);
        }
        DocumentStatus::Completed => {
            let note = if item.warnings.is_empty() {
                String::new()
            } else {
                format!(" ({} warning(s))", item.warnings.len())
            };
            println!("  {} {}{}", "✓".green(), item.file_name, note.yellow());
        }
        DocumentStatus::Error => {
            let message = item
                .error
                .as_ref()
                .map(|(kind, message)| format!("{kind}: {message}"))
                .unwrap_or_default();
            println!("  {} {} {}", "✗".red(), item.file_name, message.red());
        }
        DocumentStatus::Pending => {}
    }
}

fn print_result(item: &BatchItem, fields: &[Field]) {
    let Some(result) = &item.result else {
        return;
    };

    println!();
    println!("{}", item.file_name.bold());
    for field in fields {
        let value = result.get(&field.key).unwrap_or(&Value::Null);
        println!("  {:<28} {}", field.label.dimmed(), display_value(value));
    }
    for warning in &item.warnings {
        println!("  {} {}", "warning:".yellow(), warning);
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "-".dimmed().to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_load_item_guesses_mime_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bracket.pdf");
        fs::write(&path, b"%PDF-1.7").unwrap();

        let item = load_item(&path).unwrap();
        assert_eq!(item.file_name, "bracket.pdf");
        assert_eq!(item.document.mime_type, "application/pdf");
        assert_eq!(item.status, DocumentStatus::Pending);
    }

    #[test]
    fn test_load_item_missing_file() {
        let err = load_item(Path::new("/nonexistent/drawing.png")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn test_display_value() {
        colored::control::set_override(false);
        assert_eq!(display_value(&json!("Plate")), "Plate");
        assert_eq!(display_value(&json!(12.5)), "12.5");
        assert_eq!(display_value(&json!(["a", "b"])), "a, b");
        assert_eq!(display_value(&json!(null)), "-");
    }
}
