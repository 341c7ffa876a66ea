//! Route table for the stub.

use axum::middleware;
use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::faults;
use crate::handlers;
use crate::state::StubState;

/// Routes mounted at `/notes`.
///
/// ```text
/// GET    /                        -> list_notes  (?filter=&search=&sort=)
/// POST   /                        -> create_note
/// GET    /export/all              -> export_all
/// POST   /import                  -> import_notes
/// DELETE /trash/clear             -> clear_trash
/// GET    /{id}                    -> get_note
/// PUT    /{id}                    -> update_note
/// PATCH  /{id}                    -> update_note
/// DELETE /{id}                    -> delete_note
/// DELETE /{id}/trash              -> trash_note
/// PATCH  /{id}/restore            -> restore_note
/// PATCH  /{id}/toggle-important   -> toggle_important
/// ```
pub fn notes_router() -> Router<StubState> {
    Router::new()
        .route("/", get(handlers::list_notes).post(handlers::create_note))
        .route("/export/all", get(handlers::export_all))
        .route("/import", post(handlers::import_notes))
        .route("/trash/clear", delete(handlers::clear_trash))
        .route(
            "/{id}",
            get(handlers::get_note)
                .put(handlers::update_note)
                .patch(handlers::update_note)
                .delete(handlers::delete_note),
        )
        .route("/{id}/trash", delete(handlers::trash_note))
        .route("/{id}/restore", patch(handlers::restore_note))
        .route("/{id}/toggle-important", patch(handlers::toggle_important))
}

/// The complete application: `/api/notes/...` behind the fault injector
/// and request tracing.
pub fn app(state: StubState) -> Router {
    Router::new()
        .nest("/api/notes", notes_router())
        .layer(middleware::from_fn_with_state(state.clone(), faults::inject))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
