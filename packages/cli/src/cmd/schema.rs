use anyhow::{Context, Result};
use clap::ValueEnum;
use drawing_extraction::{compile_contract, compile_structured, Store};

use super::resolve_template;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemaForm {
    /// Response schema sent to the structured provider
    Structured,
    /// Instruction text sent to a generic chat provider
    Contract,
}

pub fn run(store: &Store, template: Option<&str>, form: SchemaForm) -> Result<()> {
    let template = resolve_template(store, template)?;
    template
        .validate()
        .with_context(|| format!("template {} is invalid", template.id))?;

    match form {
        SchemaForm::Structured => {
            let schema = compile_structured(&template.fields);
            println!("{}", serde_json::to_string_pretty(&schema.to_value())?);
        }
        SchemaForm::Contract => {
            let contract = compile_contract(&template.fields, &store.settings().system_prompt);
            println!("{}", contract.instruction);
        }
    }
    Ok(())
}
