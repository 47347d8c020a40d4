use std::sync::Arc;

use crate::domain::rendezvous::CommandRendezvous;
use crate::domain::repositories::MailboxStore;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub rendezvous: Arc<CommandRendezvous>,
}

impl AppState {
    pub fn new(store: Arc<dyn MailboxStore>, max_agents: Option<usize>) -> Self {
        Self {
            rendezvous: Arc::new(CommandRendezvous::new(store, max_agents)),
        }
    }
}
