// Domain layer module exports
// Following Hexagonal Architecture and DDD principles
// Domain is independent of infrastructure concerns

pub mod agent;
pub mod errors;
pub mod registry;
pub mod rendezvous;
pub mod repositories;
pub mod trajectory;
