//! Persisted user preferences: theme choice and search history.

use std::{
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::{config::project_dirs, model::Theme};

/// Synchronous key-value persistence for the `themePreference` and
/// `searchHistory` keys.
pub trait PreferenceStore: Send + Sync + Debug {
    fn load_theme(&self) -> Result<Option<Theme>>;
    fn save_theme(&self, theme: Theme) -> Result<()>;
    fn load_history(&self) -> Result<Vec<String>>;
    fn save_history(&self, history: &[String]) -> Result<()>;
    fn clear_history(&self) -> Result<()>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredPreferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    theme_preference: Option<Theme>,
    #[serde(default)]
    search_history: Vec<String>,
}

/// TOML-backed store under the platform data directory.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location, `<data dir>/preferences.toml`.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(project_dirs()?.data_dir().join("preferences.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<StoredPreferences> {
        if !self.path.exists() {
            return Ok(StoredPreferences::default());
        }

        let contents = fs::read_to_string(&self.path).with_context(|| {
            format!("Failed to read preferences file: {}", self.path.display())
        })?;

        toml::from_str(&contents).with_context(|| {
            format!("Failed to parse preferences file: {}", self.path.display())
        })
    }

    fn write(&self, prefs: &StoredPreferences) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create preferences directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(prefs).context("Failed to serialize preferences to TOML")?;

        fs::write(&self.path, toml).with_context(|| {
            format!("Failed to write preferences file: {}", self.path.display())
        })
    }

    fn update(&self, f: impl FnOnce(&mut StoredPreferences)) -> Result<()> {
        let mut prefs = self.read()?;
        f(&mut prefs);
        self.write(&prefs)
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load_theme(&self) -> Result<Option<Theme>> {
        Ok(self.read()?.theme_preference)
    }

    fn save_theme(&self, theme: Theme) -> Result<()> {
        self.update(|p| p.theme_preference = Some(theme))
    }

    fn load_history(&self) -> Result<Vec<String>> {
        Ok(self.read()?.search_history)
    }

    fn save_history(&self, history: &[String]) -> Result<()> {
        self.update(|p| p.search_history = history.to_vec())
    }

    fn clear_history(&self) -> Result<()> {
        self.update(|p| p.search_history.clear())
    }
}

/// In-process store; nothing survives the session.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    inner: Mutex<StoredPreferences>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load_theme(&self) -> Result<Option<Theme>> {
        Ok(self.inner.lock().theme_preference)
    }

    fn save_theme(&self, theme: Theme) -> Result<()> {
        self.inner.lock().theme_preference = Some(theme);
        Ok(())
    }

    fn load_history(&self) -> Result<Vec<String>> {
        Ok(self.inner.lock().search_history.clone())
    }

    fn save_history(&self, history: &[String]) -> Result<()> {
        self.inner.lock().search_history = history.to_vec();
        Ok(())
    }

    fn clear_history(&self) -> Result<()> {
        self.inner.lock().search_history.clear();
        Ok(())
    }
}
