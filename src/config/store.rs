//! Persisted alert settings
//!
//! The alert destination and subscriber live in a small JSON file so they
//! survive restarts and can be changed while watch mode is running. Every
//! read goes to disk.

use crate::cli::SettingsChange;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertSettings {
    /// Where reports are delivered; watch mode does nothing without it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    /// Mentioned at the start of failure alerts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscriber: Option<String>,
}

impl AlertSettings {
    pub fn apply(&mut self, change: &SettingsChange) {
        match change {
            SettingsChange::SetDestination(value) => self.destination = non_empty(value),
            SettingsChange::SetSubscriber(value) => self.subscriber = non_empty(value),
            SettingsChange::ClearDestination => self.destination = None,
            SettingsChange::ClearSubscriber => self.subscriber = None,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current settings; a missing file means nothing is configured
    pub fn load(&self) -> Result<AlertSettings> {
        if !self.path.exists() {
            return Ok(AlertSettings::default());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| AppError::config(format!("Failed to read settings {}: {}", self.path.display(), e)))?;
        if content.trim().is_empty() {
            return Ok(AlertSettings::default());
        }

        serde_json::from_str(&content)
            .map_err(|e| AppError::config(format!("Invalid settings file {}: {}", self.path.display(), e)))
    }

    pub fn save(&self, settings: &AlertSettings) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, content)
            .map_err(|e| AppError::io(format!("Failed to write settings {}: {}", self.path.display(), e)))
    }

    /// Apply edits and persist the result
    pub fn update(&self, changes: &[SettingsChange]) -> Result<AlertSettings> {
        let mut settings = self.load()?;
        for change in changes {
            settings.apply(change);
        }
        self.save(&settings)?;
        Ok(settings)
    }
}
