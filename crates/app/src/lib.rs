//! Notes client application layer.
//!
//! Owns the note cache and turns user commands into backend calls:
//!
//! - [`state`]: the [`NotesApp`] value: cache, reloads and cancellation.
//! - [`commands`]: create, update, delete, restore, importance, bulk
//!   operations, export and import.
//! - [`render`]: view frames and the HTML and text renderers.
//! - [`notifications`]: transient success/error/info messages.
//! - [`editor`], [`targets`], [`preferences`]: form state, UI target
//!   binding and the persisted theme.

pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod locks;
pub mod notifications;
pub mod preferences;
pub mod render;
pub mod state;
pub mod targets;
pub mod transfer;

pub use commands::{BulkDeleteReport, BulkFailure, Command, CommandEvent, CommandState};
pub use config::{AppConfig, ConfigError, FeatureFlags};
pub use editor::{Editor, EditorMode};
pub use error::{AppError, AppResult};
pub use notifications::{Notification, NotificationEvent, Notifier, Severity};
pub use preferences::{PreferenceStore, PreferencesError, Theme};
pub use render::{HtmlRenderer, Renderer, TextRenderer, ViewFrame};
pub use state::{LoadOutcome, NotesApp};
pub use targets::{BindError, UiTarget, UiTargets};
pub use transfer::{ExportDocument, ImportPlan};
