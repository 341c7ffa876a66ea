//! Notes REST client library.
//!
//! Provides the reqwest-backed [`NotesApi`], the [`NotesBackend`] trait the
//! application layer is written against, and the [`ApiError`] taxonomy.

pub mod api;
pub mod backend;
pub mod config;
pub mod error;
pub mod model;

pub use api::NotesApi;
pub use backend::NotesBackend;
pub use config::{ClientConfig, ToggleRoute};
pub use error::ApiError;
pub use model::{ImportRejection, ImportResult, ListQuery};
