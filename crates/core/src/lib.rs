//! Domain model and view pipeline for the Notely client.
//!
//! This crate has no I/O. It holds the note entity, the error taxonomy,
//! tag handling, the client-side store and the pure filter/search/sort
//! pipeline, so it can be used by the HTTP client, the application layer,
//! and tests alike.

pub mod error;
pub mod note;
pub mod store;
pub mod tags;
pub mod types;
pub mod view;

pub use error::{CoreError, ErrorKind};
pub use note::{Note, NoteDraft, NoteForm, NotePatch};
pub use store::NoteStore;
pub use tags::TagFormat;
pub use types::{NoteId, Timestamp};
pub use view::{EmptyState, SortOrder, View, ViewFilter, ViewParams};
