//! The application: note cache, backend handle and everything the command
//! handlers share.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use notely_client::{ApiError, ListQuery, NotesApi, NotesBackend};
use notely_core::{ErrorKind, Note, NoteId, NoteStore, SortOrder, View, ViewFilter};
use tokio::sync::{broadcast, RwLock};
use tokio_util::sync::CancellationToken;

use crate::commands::CommandEvent;
use crate::config::{AppConfig, FeatureFlags};
use crate::error::AppResult;
use crate::locks::NoteLocks;
use crate::notifications::Notifier;
use crate::render::ViewFrame;

/// Buffer capacity for the command event channel.
const EVENT_CAPACITY: usize = 256;

/// Result of a reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The store now holds the backend's current list.
    Fresh,
    /// A newer reload finished first; this result was discarded.
    Superseded,
    /// The fetch failed; the previous list (possibly empty) is kept.
    Stale(ErrorKind),
}

/// The notes client application.
///
/// Owns the store and the backend handle; there is no global state. The
/// store is written only by [`reload`](Self::reload), and only with
/// results newer than what it already holds.
pub struct NotesApp {
    pub(crate) backend: Arc<dyn NotesBackend>,
    store: RwLock<NoteStore>,
    generation: AtomicU64,
    pub(crate) flags: FeatureFlags,
    pub(crate) notifier: Notifier,
    pub(crate) events: broadcast::Sender<CommandEvent>,
    pub(crate) locks: NoteLocks,
    cancel: Mutex<CancellationToken>,
}

impl NotesApp {
    pub fn new(backend: Arc<dyn NotesBackend>, flags: FeatureFlags, notifier: Notifier) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            backend,
            store: RwLock::new(NoteStore::new()),
            generation: AtomicU64::new(0),
            flags,
            notifier,
            events,
            locks: NoteLocks::new(),
            cancel: Mutex::new(CancellationToken::new()),
        }
    }

    /// Build the application with a reqwest backend from `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        let api = NotesApi::new(config.client.clone())?;
        Ok(Self::new(
            Arc::new(api),
            config.flags,
            Notifier::new(config.notification_timeout),
        ))
    }

    pub fn flags(&self) -> FeatureFlags {
        self.flags
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Observe command lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<CommandEvent> {
        self.events.subscribe()
    }

    // -- Loading --

    /// Initial load. Same as [`reload`](Self::reload).
    pub async fn load(&self) -> LoadOutcome {
        self.reload().await
    }

    /// Re-fetch the notes and replace the cache.
    ///
    /// Without server-side filtering everything is fetched (trash included)
    /// and the view pipeline does the filtering. On failure the cache is
    /// left as it was and an error notification is shown.
    pub async fn reload(&self) -> LoadOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let query = if self.flags.server_filtering {
            ListQuery::from_params(self.store.read().await.params())
        } else {
            ListQuery::everything()
        };

        match self.cancellable(self.backend.list_notes(&query)).await {
            Ok(notes) => {
                let count = notes.len();
                if self.store.write().await.replace_if_newer(generation, notes) {
                    tracing::debug!(generation, count, "Notes reloaded");
                    LoadOutcome::Fresh
                } else {
                    tracing::debug!(generation, "Discarding superseded reload");
                    LoadOutcome::Superseded
                }
            }
            Err(e) => {
                tracing::warn!(generation, error = %e, "Failed to load notes");
                self.notifier
                    .error(format!("Failed to load notes: {}", e.kind()));
                LoadOutcome::Stale(e.kind())
            }
        }
    }

    // -- View parameters --

    pub async fn set_filter(&self, filter: ViewFilter) {
        self.store.write().await.set_filter(filter);
        self.refetch_if_server_filtering().await;
    }

    pub async fn set_search(&self, search: impl Into<String>) {
        self.store.write().await.set_search(search);
        self.refetch_if_server_filtering().await;
    }

    pub async fn set_sort(&self, sort: Option<SortOrder>) {
        self.store.write().await.set_sort(sort);
        self.refetch_if_server_filtering().await;
    }

    async fn refetch_if_server_filtering(&self) {
        if self.flags.server_filtering {
            self.reload().await;
        }
    }

    // -- Reading --

    /// The current view: visible notes plus empty-state classification.
    pub async fn view(&self) -> View {
        self.store.read().await.view()
    }

    /// The current view as cards ready for a renderer.
    pub async fn frame(&self) -> ViewFrame {
        ViewFrame::from_view(&self.view().await)
    }

    /// Every cached note, trashed ones included.
    pub async fn notes(&self) -> Vec<Note> {
        self.store.read().await.notes().to_vec()
    }

    pub async fn find(&self, id: &NoteId) -> Option<Note> {
        self.store.read().await.find(id).cloned()
    }

    // -- Cancellation --

    /// Abort every in-flight request. Affected commands fail with
    /// [`ApiError::Cancelled`]; later commands run normally.
    pub fn cancel_all(&self) {
        let previous = std::mem::replace(&mut *self.root_token(), CancellationToken::new());
        previous.cancel();
        tracing::info!("Cancelled in-flight requests");
    }

    /// Run `fut`, giving up with [`ApiError::Cancelled`] if
    /// [`cancel_all`](Self::cancel_all) is called first.
    pub(crate) async fn cancellable<T>(
        &self,
        fut: impl Future<Output = Result<T, ApiError>>,
    ) -> Result<T, ApiError> {
        let token = self.root_token().child_token();
        tokio::select! {
            biased;
            () = token.cancelled() => Err(ApiError::Cancelled),
            result = fut => result,
        }
    }

    /// Same as [`cancellable`](Self::cancellable) for application results.
    pub(crate) async fn cancellable_app<T>(
        &self,
        fut: impl Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        let token = self.root_token().child_token();
        tokio::select! {
            biased;
            () = token.cancelled() => Err(ApiError::Cancelled.into()),
            result = fut => result,
        }
    }

    fn root_token(&self) -> std::sync::MutexGuard<'_, CancellationToken> {
        self.cancel.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
