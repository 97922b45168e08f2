//! Persisted settings and templates.
//!
//! One JSON file in a data directory. Loaded once at startup, written back
//! after every mutation, and passed by reference to whoever needs it.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::types::{config::Settings, template::Template};

pub const STORE_FILE_NAME: &str = "store.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreState {
    #[serde(default)]
    settings: Settings,
    #[serde(default)]
    templates: Vec<Template>,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            templates: vec![Template::technical_drawing()],
        }
    }
}

/// File-backed store for settings and templates.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    state: StoreState,
}

impl Store {
    /// Load from `dir`, seeding defaults when no store file exists yet.
    pub fn load(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let path = dir.as_ref().join(STORE_FILE_NAME);

        let state = if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let state: StoreState = serde_json::from_str(&contents)?;
            debug!(path = %path.display(), templates = state.templates.len(), "Loaded store");
            state
        } else {
            info!(path = %path.display(), "No store file, starting with defaults");
            StoreState::default()
        };

        for template in &state.templates {
            template.validate()?;
        }
        state
            .settings
            .validate()
            .map_err(|e| StoreError::InvalidSettings(e.user_message()))?;

        Ok(Self { path, state })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&self.state)?;
        fs::write(&self.path, contents)?;
        debug!(path = %self.path.display(), "Saved store");
        Ok(())
    }

    // =========================================================================
    // Settings
    // =========================================================================

    pub fn settings(&self) -> &Settings {
        &self.state.settings
    }

    /// Replace the settings after validating them.
    pub fn update_settings(&mut self, settings: Settings) -> StoreResult<()> {
        settings
            .validate()
            .map_err(|e| StoreError::InvalidSettings(e.user_message()))?;
        if let Some(id) = &settings.active_template_id {
            if self.template(id).is_none() {
                return Err(StoreError::TemplateNotFound { id: id.clone() });
            }
        }
        self.state.settings = settings;
        self.save()
    }

    // =========================================================================
    // Templates
    // =========================================================================

    pub fn templates(&self) -> &[Template] {
        &self.state.templates
    }

    pub fn template(&self, id: &str) -> Option<&Template> {
        self.state.templates.iter().find(|t| t.id == id)
    }

    /// The active template, falling back to the first one.
    pub fn active_template(&self) -> Option<&Template> {
        self.state
            .settings
            .active_template_id
            .as_deref()
            .and_then(|id| self.template(id))
            .or_else(|| self.state.templates.first())
    }

    /// Insert or replace a template by id. Keys are validated first.
    pub fn save_template(&mut self, template: Template) -> StoreResult<()> {
        template.validate()?;
        match self.state.templates.iter().position(|t| t.id == template.id) {
            Some(index) => self.state.templates[index] = template,
            None => self.state.templates.push(template),
        }
        self.save()
    }

    pub fn remove_template(&mut self, id: &str) -> StoreResult<Template> {
        let index = self
            .state
            .templates
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| StoreError::TemplateNotFound { id: id.to_string() })?;

        let removed = self.state.templates.remove(index);
        if self.state.settings.active_template_id.as_deref() == Some(id) {
            self.state.settings.active_template_id = None;
        }
        self.save()?;
        Ok(removed)
    }
}
