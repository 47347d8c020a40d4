use thiserror::Error;

/// Errors raised by a mailbox store implementation
#[derive(Debug, Error)]
pub enum MailboxError {
    #[error("Mailbox lock poisoned: {0}")]
    Poisoned(String),
}

pub type MailboxResult<T> = Result<T, MailboxError>;

/// Errors that can occur while serving the rendezvous protocol
#[derive(Debug, Error)]
pub enum RendezvousError {
    #[error("Invalid agent name: {0}")]
    InvalidAgentName(String),

    #[error("Registry full: cannot register '{name}' (limit {limit})")]
    RegistryFull { name: String, limit: usize },

    #[error("Corrupt record under '{key}': {reason}")]
    CorruptRecord { key: String, reason: String },

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Mailbox(#[from] MailboxError),
}

pub type RendezvousResult<T> = Result<T, RendezvousError>;
