use async_trait::async_trait;

use crate::domain::errors::MailboxResult;

/// Read-modify-write step applied under the store's lock
///
/// Receives the current value (if any) and returns the replacement, or
/// `None` to leave the entry untouched.
pub type MailboxUpdate = Box<dyn FnOnce(Option<&str>) -> Option<String> + Send>;

/// Repository trait for the shared key/payload mailbox
///
/// Keys and payloads are opaque strings. Every write is a full overwrite.
/// Implementations must be safe to call concurrently from independent
/// request tasks without any locking by the caller.
#[async_trait]
pub trait MailboxStore: Send + Sync {
    /// Store a payload, replacing any previous value
    async fn put(&self, key: &str, value: String) -> MailboxResult<()>;

    /// Fetch the payload under a key
    async fn get(&self, key: &str) -> MailboxResult<Option<String>>;

    /// Atomically read, decide and write a single key
    ///
    /// No other write to any key can interleave between the read handed to
    /// `apply` and the write of its result. Returns the value observed
    /// before `apply` ran.
    async fn update(&self, key: &str, apply: MailboxUpdate) -> MailboxResult<Option<String>>;

    /// Remove every entry, returning how many were dropped
    async fn clear(&self) -> MailboxResult<usize>;

    /// Number of stored keys
    async fn key_count(&self) -> MailboxResult<usize>;
}
