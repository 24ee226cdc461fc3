//! Application state for the API server

use crate::crawler::Orchestrator;
use crate::storage::{SqliteStorage, StorageError};
use crate::Result;
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared application state accessible to all route handlers
///
/// Cloned for each request; both fields are `Arc`s.
#[derive(Clone)]
pub struct AppState {
    /// Runs crawls and article text refreshes
    pub orchestrator: Arc<Orchestrator>,

    /// The store the orchestrator writes to, for read endpoints
    pub storage: Arc<Mutex<SqliteStorage>>,
}

impl AppState {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        let storage = orchestrator.storage();
        Self {
            orchestrator,
            storage,
        }
    }

    /// Locks the store for a read; never hold the guard across an await
    pub fn storage(&self) -> Result<MutexGuard<'_, SqliteStorage>> {
        self.storage
            .lock()
            .map_err(|_| StorageError::Database("storage lock poisoned".to_string()).into())
    }
}
