//! Named locks shared across resource implementations
//!
//! Resources that modify the same remote object (e.g. rules of one security
//! group) serialize on a common key. One `NamedLocks` is created at startup
//! and handed out through [`crate::ProviderContext`].

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockTable = Mutex<HashMap<String, Arc<AsyncMutex<()>>>>;

/// Registry of per-key async mutexes
///
/// A key stays in the table only while a guard or a waiter holds it.
#[derive(Debug, Default)]
pub struct NamedLocks {
    table: Arc<LockTable>,
}

impl NamedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, key: &str) -> Arc<AsyncMutex<()>> {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        table
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    fn guard(&self, key: &str, guard: OwnedMutexGuard<()>) -> NamedLockGuard {
        NamedLockGuard {
            key: key.to_string(),
            guard: Some(guard),
            table: Arc::clone(&self.table),
        }
    }

    /// Wait until `key` is free and hold it until the guard is dropped
    pub async fn lock(&self, key: &str) -> NamedLockGuard {
        let mutex = self.entry(key);
        tracing::debug!("Locking {:?}", key);
        let guard = mutex.lock_owned().await;
        tracing::debug!("Locked {:?}", key);
        self.guard(key, guard)
    }

    /// Take `key` only if nobody holds it
    pub fn try_lock(&self, key: &str) -> Option<NamedLockGuard> {
        let mutex = self.entry(key);
        match mutex.try_lock_owned() {
            Ok(guard) => Some(self.guard(key, guard)),
            Err(_) => None,
        }
    }

    /// Number of keys currently held or awaited
    pub fn len(&self) -> usize {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// RAII guard for a named lock
pub struct NamedLockGuard {
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
    table: Arc<LockTable>,
}

impl NamedLockGuard {
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl std::fmt::Debug for NamedLockGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamedLockGuard").field("key", &self.key).finish()
    }
}

impl Drop for NamedLockGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Entries referenced only by the table are idle
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        table.retain(|_, mutex| Arc::strong_count(mutex) > 1);
        tracing::debug!("Unlocked {:?}", self.key);
    }
}
