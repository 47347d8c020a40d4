use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::domain::errors::{MailboxError, MailboxResult};
use crate::domain::repositories::{MailboxStore, MailboxUpdate};

/// Process-local implementation of MailboxStore
///
/// Created once at startup and shared behind an `Arc`. Contents are lost when
/// the process exits. Updates hold the write lock for the whole
/// read-modify-write, which serializes them against every other write.
#[derive(Debug, Default)]
pub struct InMemoryMailboxStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryMailboxStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> MailboxResult<RwLockReadGuard<'_, HashMap<String, String>>> {
        self.entries
            .read()
            .map_err(|e| MailboxError::Poisoned(e.to_string()))
    }

    fn write(&self) -> MailboxResult<RwLockWriteGuard<'_, HashMap<String, String>>> {
        self.entries
            .write()
            .map_err(|e| MailboxError::Poisoned(e.to_string()))
    }
}

#[async_trait]
impl MailboxStore for InMemoryMailboxStore {
    async fn put(&self, key: &str, value: String) -> MailboxResult<()> {
        self.write()?.insert(key.to_string(), value);
        Ok(())
    }

    async fn get(&self, key: &str) -> MailboxResult<Option<String>> {
        Ok(self.read()?.get(key).cloned())
    }

    async fn update(&self, key: &str, apply: MailboxUpdate) -> MailboxResult<Option<String>> {
        let mut entries = self.write()?;
        let previous = entries.get(key).cloned();
        if let Some(next) = apply(previous.as_deref()) {
            entries.insert(key.to_string(), next);
        }
        Ok(previous)
    }

    async fn clear(&self) -> MailboxResult<usize> {
        let mut entries = self.write()?;
        let removed = entries.len();
        entries.clear();
        tracing::info!(removed, "Mailbox store cleared");
        Ok(removed)
    }

    async fn key_count(&self) -> MailboxResult<usize> {
        Ok(self.read()?.len())
    }
}
