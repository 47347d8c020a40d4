// HTTP handlers (thin adapters over the rendezvous protocol)

pub mod admin;
pub mod agents;
pub mod demo;
pub mod raw;
