use std::path::PathBuf;
use std::time::Duration;

use notely_client::{ClientConfig, ToggleRoute};
use notely_core::TagFormat;

/// Default lifetime of a notification before it dismisses itself.
pub const DEFAULT_NOTIFICATION_TIMEOUT: Duration = Duration::from_millis(3000);

/// Behaviour switches that distinguish the deployment variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    /// Delete moves notes to the trash instead of removing them.
    pub trash: bool,
    /// Forward filter/search/sort to the backend on reload instead of
    /// fetching everything and filtering locally.
    pub server_filtering: bool,
    /// Offer the light/dark theme switch.
    pub theme_toggle: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            trash: true,
            server_filtering: false,
            theme_toggle: true,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be {expected}, got '{value}'")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub client: ClientConfig,
    pub notification_timeout: Duration,
    pub flags: FeatureFlags,
    /// Where the theme preference is persisted.
    pub prefs_path: PathBuf,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                     |
    /// |---------------------------------|-----------------------------|
    /// | `NOTES_API_URL`                 | `http://localhost:3000/api` |
    /// | `NOTES_REQUEST_TIMEOUT_SECS`    | `10`                        |
    /// | `NOTES_NOTIFICATION_TIMEOUT_MS` | `3000`                      |
    /// | `NOTES_TRASH`                   | `true`                      |
    /// | `NOTES_TAG_FORMAT`              | `array`                     |
    /// | `NOTES_TOGGLE_ROUTE`            | `patch`                     |
    /// | `NOTES_SERVER_FILTERING`        | `false`                     |
    /// | `NOTES_THEME_TOGGLE`            | `true`                      |
    /// | `NOTES_PREFS_PATH`              | `.notely-prefs.json`        |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading from `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url =
            lookup("NOTES_API_URL").unwrap_or_else(|| "http://localhost:3000/api".into());

        let timeout_secs: u64 =
            parse(&lookup, "NOTES_REQUEST_TIMEOUT_SECS", "10", "a number of seconds")?;
        let notification_ms: u64 = parse(
            &lookup,
            "NOTES_NOTIFICATION_TIMEOUT_MS",
            "3000",
            "a number of milliseconds",
        )?;
        let tag_format: TagFormat =
            parse(&lookup, "NOTES_TAG_FORMAT", "array", "'array' or 'string'")?;
        let toggle_route: ToggleRoute =
            parse(&lookup, "NOTES_TOGGLE_ROUTE", "patch", "'patch' or 'endpoint'")?;

        let flags = FeatureFlags {
            trash: flag(&lookup, "NOTES_TRASH", true)?,
            server_filtering: flag(&lookup, "NOTES_SERVER_FILTERING", false)?,
            theme_toggle: flag(&lookup, "NOTES_THEME_TOGGLE", true)?,
        };

        let prefs_path = lookup("NOTES_PREFS_PATH")
            .unwrap_or_else(|| ".notely-prefs.json".into())
            .into();

        Ok(Self {
            client: ClientConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
                tag_format,
                toggle_route,
            },
            notification_timeout: Duration::from_millis(notification_ms),
            flags,
            prefs_path,
        })
    }
}

fn parse<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: &str,
    expected: &'static str,
) -> Result<T, ConfigError> {
    let value = lookup(var).unwrap_or_else(|| default.to_string());
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        var,
        expected,
        value,
    })
}

fn flag(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(value) = lookup(var) else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            expected: "a boolean",
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.client.base_url, "http://localhost:3000/api");
        assert_eq!(config.client.timeout, Duration::from_secs(10));
        assert_eq!(config.notification_timeout, DEFAULT_NOTIFICATION_TIMEOUT);
        assert_eq!(config.flags, FeatureFlags::default());
        assert_eq!(config.prefs_path, PathBuf::from(".notely-prefs.json"));
    }

    #[test]
    fn overrides() {
        let config = config_from(&[
            ("NOTES_API_URL", "https://notes.example/api"),
            ("NOTES_REQUEST_TIMEOUT_SECS", "3"),
            ("NOTES_TAG_FORMAT", "string"),
            ("NOTES_TOGGLE_ROUTE", "endpoint"),
            ("NOTES_TRASH", "false"),
            ("NOTES_SERVER_FILTERING", "1"),
        ])
        .unwrap();
        assert_eq!(config.client.timeout, Duration::from_secs(3));
        assert_eq!(config.client.tag_format, TagFormat::CommaString);
        assert_eq!(config.client.toggle_route, ToggleRoute::Endpoint);
        assert!(!config.flags.trash);
        assert!(config.flags.server_filtering);
    }

    #[test]
    fn invalid_values_are_errors() {
        let err = config_from(&[("NOTES_REQUEST_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(err.to_string().contains("NOTES_REQUEST_TIMEOUT_SECS"));
        assert!(config_from(&[("NOTES_TRASH", "maybe")]).is_err());
        assert!(config_from(&[("NOTES_TAG_FORMAT", "yaml")]).is_err());
    }
}
