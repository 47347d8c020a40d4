// Repository ports (interfaces implemented by infrastructure adapters)

pub mod mailbox_store;

pub use mailbox_store::{MailboxStore, MailboxUpdate};
