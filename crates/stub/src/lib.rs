//! In-memory notes backend for tests and local development.
//!
//! Implements the notes REST API under `/api/notes` on top of a plain
//! vector, with switchable faults (failing statuses, malformed bodies,
//! response envelopes, latency) and a log of every request received.

pub mod config;
pub mod error;
pub mod faults;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod state;

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub use faults::{Faults, RecordedRequest};
pub use state::StubState;

/// A stub server running on a background task.
///
/// The server stops when this handle is dropped.
#[derive(Debug)]
pub struct StubServer {
    pub addr: SocketAddr,
    pub state: StubState,
    handle: JoinHandle<()>,
}

impl StubServer {
    /// API root to hand to the client, e.g. `http://127.0.0.1:41234/api`.
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Start an empty stub on an ephemeral localhost port.
pub async fn spawn() -> std::io::Result<StubServer> {
    spawn_with(StubState::new()).await
}

/// Start a stub serving `state` on an ephemeral localhost port.
pub async fn spawn_with(state: StubState) -> std::io::Result<StubServer> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    serve_on(listener, state)
}

/// Serve `state` on an already bound listener.
pub fn serve_on(listener: TcpListener, state: StubState) -> std::io::Result<StubServer> {
    let addr = listener.local_addr()?;
    let app = routes::app(state.clone());
    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "Stub server error");
        }
    });
    tracing::debug!(%addr, "Stub server listening");
    Ok(StubServer {
        addr,
        state,
        handle,
    })
}
