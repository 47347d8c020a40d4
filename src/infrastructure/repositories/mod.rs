// Repository implementations (storage adapters)
// Adapters that implement domain repository interfaces

pub mod in_memory_mailbox_store;

pub use in_memory_mailbox_store::InMemoryMailboxStore;
