use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use notely_core::NoteId;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Per-note async locks.
///
/// Mutating commands on the same note id run one after another; commands
/// on different notes do not wait for each other.
#[derive(Debug, Default)]
pub struct NoteLocks {
    locks: Mutex<HashMap<NoteId, Arc<AsyncMutex<()>>>>,
}

impl NoteLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `id`. Released when the guard drops.
    pub async fn lock(&self, id: &NoteId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // Drop entries nobody holds or waits on.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(id.clone()).or_default())
        };
        lock.lock_owned().await
    }
}
