pub mod extract;
pub mod schema;
pub mod settings;
pub mod templates;

use anyhow::{Context, Result};
use drawing_extraction::{Store, Template};

/// The named template, or the active one when no id is given.
pub fn resolve_template<'a>(store: &'a Store, id: Option<&str>) -> Result<&'a Template> {
    match id {
        Some(id) => store
            .template(id)
            .with_context(|| format!("no template with id {id:?} (see `drawx templates list`)")),
        None => store
            .active_template()
            .context("no templates available; import one with `drawx templates import`"),
    }
}
