use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use drawing_extraction::{Store, Template};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Subcommand)]
pub enum TemplatesCommand {
    /// List stored templates
    List,

    /// Print one template's fields
    Show { id: String },

    /// Add or replace a template from a JSON file
    Import { path: PathBuf },

    /// Write a template as JSON (stdout when no path is given)
    Export {
        id: String,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Delete a template
    Remove { id: String },

    /// Make a template the default for extraction
    Use { id: String },
}

pub fn run(store: &mut Store, command: TemplatesCommand) -> Result<()> {
    match command {
        TemplatesCommand::List => {
            let active = store.active_template().map(|t| t.id.clone());
            for template in store.templates() {
                let marker = if active.as_deref() == Some(template.id.as_str()) {
                    "*".bright_green().to_string()
                } else {
                    " ".to_string()
                };
                println!(
                    "{} {:<24} {} ({} fields)",
                    marker,
                    template.id,
                    template.name.bold(),
                    template.fields.len()
                );
            }
            Ok(())
        }
        TemplatesCommand::Show { id } => {
            let template = store
                .template(&id)
                .with_context(|| format!("no template with id {id:?}"))?;
            print_template(template);
            Ok(())
        }
        TemplatesCommand::Import { path } => {
            let template = read_template(&path)?;
            let name = template.name.clone();
            store
                .save_template(template)
                .with_context(|| format!("failed to import {}", path.display()))?;
            println!("{} {}", "Imported".bright_green(), name);
            Ok(())
        }
        TemplatesCommand::Export { id, out } => {
            let template = store
                .template(&id)
                .with_context(|| format!("no template with id {id:?}"))?;
            let contents = serde_json::to_string_pretty(template)?;
            match out {
                Some(path) => fs::write(&path, contents)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => println!("{}", contents),
            }
            Ok(())
        }
        TemplatesCommand::Remove { id } => {
            let removed = store.remove_template(&id)?;
            println!("{} {}", "Removed".bright_yellow(), removed.name);
            Ok(())
        }
        TemplatesCommand::Use { id } => {
            let mut settings = store.settings().clone();
            settings.active_template_id = Some(id.clone());
            store.update_settings(settings)?;
            println!("{} {}", "Active template:".bright_green(), id);
            Ok(())
        }
    }
}

fn read_template(path: &Path) -> Result<Template> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a valid template", path.display()))
}

fn print_template(template: &Template) {
    println!("{} ({})", template.name.bold(), template.id.dimmed());
    if let Some(description) = &template.description {
        println!("{}", description);
    }
    println!();
    for field in &template.fields {
        println!(
            "  {:<24} {:<11} {}",
            field.key,
            field.value_kind.as_str(),
            field.description
        );
    }
}
