//! Async access to durable storage, and store write-back.
//!
//! [`PersistentStoreAdapter`] wraps a [`RecordStore`] backend in
//! `Arc<tokio::sync::Mutex<>>` so async callers await the storage boundary
//! instead of blocking the runtime. Records are partitioned by store name, so
//! concurrent hydrations only queue on the lock, never on each other's data.
//!
//! [`WriteBack`] keeps durable storage in step with the in-memory stores once
//! the application is ready: every store mutation enqueues the store's name,
//! and a background task persists its current payload.

use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio::task::{JoinError, JoinHandle};

use exilence_storage::{
    InMemoryStore, RecordStore, RecordSummary, SaveOutcome, SqliteStore, StorageError,
};

use crate::context::AppContext;
use crate::signal::Subscription;
use crate::store::StoreName;

type Backend = Box<dyn RecordStore + Send>;

/// Shared async handle to a record backend.
#[derive(Clone)]
pub struct PersistentStoreAdapter {
    backend: Arc<Mutex<Backend>>,
}

impl PersistentStoreAdapter {
    pub fn new<B>(backend: B) -> Self
    where
        B: RecordStore + Send + 'static,
    {
        PersistentStoreAdapter {
            backend: Arc::new(Mutex::new(Box::new(backend))),
        }
    }

    /// Opens (or creates) the SQLite database at `path`.
    pub fn sqlite(path: &str) -> Result<Self, StorageError> {
        Ok(Self::new(SqliteStore::new(path)?))
    }

    /// An empty, non-durable adapter.
    pub fn in_memory() -> Self {
        Self::new(InMemoryStore::new())
    }

    /// Loads the payload stored under `name`; `Ok(None)` when absent.
    pub async fn load(&self, name: &str) -> Result<Option<String>, StorageError> {
        let backend = self.backend.lock().await;
        Ok(backend.load(name)?.map(|record| record.payload))
    }

    /// Durably stores `payload` under `name`.
    pub async fn save(&self, name: &str, payload: &str) -> Result<SaveOutcome, StorageError> {
        let mut backend = self.backend.lock().await;
        backend.save(name, payload)
    }

    pub async fn delete(&self, name: &str) -> Result<bool, StorageError> {
        let mut backend = self.backend.lock().await;
        backend.delete(name)
    }

    pub async fn list(&self) -> Result<Vec<RecordSummary>, StorageError> {
        let backend = self.backend.lock().await;
        backend.list()
    }
}

impl std::fmt::Debug for PersistentStoreAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentStoreAdapter").finish_non_exhaustive()
    }
}

/// Counters reported when write-back stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteBackStats {
    pub written: usize,
    pub unchanged: usize,
    pub failed: usize,
}

/// Running write-back: store subscriptions plus the persisting task.
///
/// Dropping a `WriteBack` unsubscribes from every store; queued writes still
/// drain in the background. Use [`WriteBack::finish`] to wait for them.
pub struct WriteBack {
    subscriptions: Vec<Subscription>,
    task: JoinHandle<WriteBackStats>,
}

impl WriteBack {
    /// Subscribes to every store in `context` and spawns the persisting task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(context: Arc<AppContext>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<StoreName>();

        let subscriptions = context
            .stores()
            .into_iter()
            .map(|store| {
                let tx = tx.clone();
                let name = store.name();
                store.on_change(Box::new(move || {
                    // Receiver only goes away with the task; nothing to do then.
                    let _ = tx.send(name);
                }))
            })
            .collect();
        drop(tx);

        let task = tokio::spawn(async move {
            let mut stats = WriteBackStats::default();
            while let Some(name) = rx.recv().await {
                match persist_store(&context, name).await {
                    Ok(SaveOutcome::Written) => {
                        tracing::debug!(store = %name, "store written back");
                        stats.written += 1;
                    }
                    Ok(SaveOutcome::Unchanged) => stats.unchanged += 1,
                    Err(err) => {
                        tracing::warn!(store = %name, error = %err, "store write-back failed");
                        stats.failed += 1;
                    }
                }
            }
            stats
        });

        WriteBack {
            subscriptions,
            task,
        }
    }

    /// Stops listening for changes and waits until queued writes are done.
    ///
    /// Fails when the persisting task panicked or was cancelled; its counts
    /// are lost in that case.
    pub async fn finish(self) -> Result<WriteBackStats, JoinError> {
        let WriteBack {
            subscriptions,
            task,
        } = self;
        drop(subscriptions);
        task.await.inspect_err(|err| {
            tracing::warn!(error = %err, "write-back task ended abnormally");
        })
    }
}

#[derive(Debug, thiserror::Error)]
enum WriteBackError {
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

async fn persist_store(context: &AppContext, name: StoreName) -> Result<SaveOutcome, WriteBackError> {
    let payload = context.store(name).payload()?;
    Ok(context.storage().save(name.key(), &payload).await?)
}
