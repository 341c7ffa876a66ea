use std::str::FromStr;
use std::time::Duration;

use notely_core::{CoreError, TagFormat};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Which endpoint sets the importance flag.
///
/// Both routes receive the explicit new value in the body; neither asks the
/// server to flip blindly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ToggleRoute {
    /// `PATCH /notes/{id}` with `{"important": v}`.
    #[default]
    Patch,
    /// `PATCH /notes/{id}/toggle-important` with `{"important": v}`.
    Endpoint,
}

impl FromStr for ToggleRoute {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patch" => Ok(ToggleRoute::Patch),
            "endpoint" | "toggle-important" => Ok(ToggleRoute::Endpoint),
            other => Err(CoreError::Invalid(format!(
                "unknown toggle route '{other}', expected 'patch' or 'endpoint'"
            ))),
        }
    }
}

/// Settings for a [`NotesApi`](crate::NotesApi) instance.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `http://localhost:3000/api`. `/notes` is appended.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Tag encoding in request bodies.
    pub tag_format: TagFormat,
    pub toggle_route: ToggleRoute,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            tag_format: TagFormat::default(),
            toggle_route: ToggleRoute::default(),
        }
    }
}
