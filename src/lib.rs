//! Fleet Rendezvous Coordinator Library
//!
//! Agents push their pose to the coordinator and, in the same round trip,
//! collect any command queued for them along with a freshly synthesized
//! trajectory. This library provides the domain logic, the in-memory mailbox
//! and the HTTP adapters.

pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;
