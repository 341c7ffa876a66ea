//! Locally persisted user preferences.
//!
//! Only the colour theme is stored, as `{"theme": "light" | "dark"}`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use notely_core::CoreError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(CoreError::Invalid(format!(
                "unknown theme '{other}', expected 'light' or 'dark'"
            ))),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PreferencesError {
    #[error("Failed to write preferences to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode preferences: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Preferences {
    #[serde(default)]
    theme: Theme,
}

/// File-backed preference storage.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored theme. A missing or unreadable file means [`Theme::Light`].
    pub fn theme(&self) -> Theme {
        self.load().theme
    }

    pub fn set_theme(&self, theme: Theme) -> Result<(), PreferencesError> {
        let mut prefs = self.load();
        prefs.theme = theme;
        let json = serde_json::to_string_pretty(&prefs)?;
        std::fs::write(&self.path, json).map_err(|source| PreferencesError::Write {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), %theme, "Theme saved");
        Ok(())
    }

    /// Switch to the other theme and persist it. Returns the new theme.
    pub fn toggle_theme(&self) -> Result<Theme, PreferencesError> {
        let theme = self.theme().toggled();
        self.set_theme(theme)?;
        Ok(theme)
    }

    fn load(&self) -> Preferences {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Preferences::default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Unreadable preferences file");
                return Preferences::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "Malformed preferences file");
            Preferences::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> PreferenceStore {
        PreferenceStore::new(dir.path().join("prefs.json"))
    }

    #[test]
    fn missing_file_defaults_to_light() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(store_in(&dir).theme(), Theme::Light);
    }

    #[test]
    fn theme_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        store_in(&dir).set_theme(Theme::Dark).unwrap();
        assert_eq!(store_in(&dir).theme(), Theme::Dark);

        let raw = std::fs::read_to_string(dir.path().join("prefs.json")).unwrap();
        assert!(raw.contains(r#""theme": "dark""#));
    }

    #[test]
    fn toggle_flips_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.toggle_theme().unwrap(), Theme::Dark);
        assert_eq!(store.toggle_theme().unwrap(), Theme::Light);
        assert_eq!(store.theme(), Theme::Light);
    }

    #[test]
    fn malformed_file_falls_back_to_light() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("prefs.json"), "{not json").unwrap();
        assert_eq!(store_in(&dir).theme(), Theme::Light);
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::new(dir.path().join("nope").join("prefs.json"));
        assert!(matches!(
            store.set_theme(Theme::Dark),
            Err(PreferencesError::Write { .. })
        ));
    }

    #[test]
    fn theme_from_str() {
        assert_eq!("DARK".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("blue".parse::<Theme>().is_err());
    }
}
