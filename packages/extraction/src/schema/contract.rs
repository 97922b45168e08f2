//! Textual JSON contract for providers that only take a prompt.
//!
//! The provider is not told value kinds; it only sees each key and its
//! description, and is instructed to answer with bare JSON.

use indexmap::IndexMap;

use crate::types::field::Field;

const CONTRACT_PREAMBLE: &str = "Extract the following fields from the attached document. \
Respond with a JSON object using exactly these keys; each value describes what to extract:";

const JSON_ONLY_DIRECTIVE: &str = "Return ONLY valid JSON. \
Do not wrap it in markdown and do not add any text before or after the JSON object.";

/// Prompt text carrying the system prompt plus the key/description contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextualContract {
    /// Key to description, in declaration order
    pub keys: IndexMap<String, String>,

    /// Full instruction sent to the provider
    pub instruction: String,
}

/// Compile fields into the textual contract appended to `system_prompt`.
pub fn compile_contract(fields: &[Field], system_prompt: &str) -> TextualContract {
    let keys: IndexMap<String, String> = fields
        .iter()
        .map(|f| (f.key.clone(), f.description.clone()))
        .collect();

    let contract_json = serde_json::to_string_pretty(&keys).unwrap_or_else(|_| "{}".to_string());

    let mut instruction = String::new();
    let prompt = system_prompt.trim();
    if !prompt.is_empty() {
        instruction.push_str(prompt);
        instruction.push_str("\n\n");
    }
    instruction.push_str(CONTRACT_PREAMBLE);
    instruction.push('\n');
    instruction.push_str(&contract_json);
    instruction.push_str("\n\n");
    instruction.push_str(JSON_ONLY_DIRECTIVE);

    TextualContract { keys, instruction }
}
