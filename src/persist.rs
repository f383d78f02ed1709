//! Dual-sink persistence
//!
//! Drives the relational store and the JSON snapshot against one shared,
//! read-only schema model. The operation finishes only after *both* sinks
//! have reported; a failure in one never cancels or hides the other.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use crate::{Error, Result};
use crate::schema::SchemaModel;
use crate::snapshot;
use crate::storage::SqliteStore;

/// Per-sink results of one persistence run.
///
/// Always carries exactly two outcomes, one per sink.
#[derive(Debug)]
pub struct PersistOutcome {
    /// Result of materializing into the relational store
    pub store: Result<()>,
    /// Result of writing the JSON snapshot
    pub snapshot: Result<()>,
}

impl PersistOutcome {
    /// True when both sinks succeeded
    pub fn is_success(&self) -> bool {
        self.store.is_ok() && self.snapshot.is_ok()
    }
}

/// Persist a schema model into a fresh store file and a JSON snapshot.
///
/// Any pre-existing store file is removed first; materialization only starts
/// once the removal has completed. The snapshot write and the store
/// materialization then run as independent tasks over the same model, and
/// both results are reported regardless of each other.
pub async fn persist(
    schema: SchemaModel,
    store_path: &Path,
    snapshot_path: &Path,
) -> PersistOutcome {
    let schema = Arc::new(schema);
    tracing::info!(
        "persisting {} tables to {:?} and {:?}",
        schema.table_count(),
        store_path,
        snapshot_path
    );

    // Launch the snapshot sink first; it has no ordering relationship with
    // the store side and runs while the store file is being prepared.
    let snapshot_task = spawn_snapshot(Arc::clone(&schema), snapshot_path.to_path_buf());

    // The store must not pre-exist; materialization waits on the removal.
    let store = match remove_store(store_path.to_path_buf()).await {
        Ok(()) => join(spawn_materialize(schema, store_path.to_path_buf())).await,
        Err(e) => Err(e),
    };
    let snapshot = join(snapshot_task).await;

    if let Err(e) = &store {
        tracing::error!("store sink failed: {}", e);
    }
    if let Err(e) = &snapshot {
        tracing::error!("snapshot sink failed: {}", e);
    }

    PersistOutcome { store, snapshot }
}

async fn remove_store(path: PathBuf) -> Result<()> {
    join(tokio::task::spawn_blocking(move || SqliteStore::remove(&path))).await
}

fn spawn_snapshot(schema: Arc<SchemaModel>, path: PathBuf) -> JoinHandle<Result<()>> {
    tokio::task::spawn_blocking(move || snapshot::write(&schema, &path))
}

fn spawn_materialize(schema: Arc<SchemaModel>, path: PathBuf) -> JoinHandle<Result<()>> {
    tokio::task::spawn_blocking(move || {
        let store = SqliteStore::open(&path)?;
        store.materialize(&schema)
    })
}

/// Collapse a task handle into the sink's own result.
///
/// A panicked task still yields an error outcome, so the caller always
/// receives one report per sink.
async fn join(handle: JoinHandle<Result<()>>) -> Result<()> {
    handle
        .await
        .unwrap_or_else(|e: JoinError| Err(Error::Io(std::io::Error::other(e))))
}
