use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::agent::{AgentName, REGISTRY_KEY};
use crate::domain::errors::{RendezvousError, RendezvousResult};
use crate::domain::repositories::MailboxStore;

/// Outcome of registering an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    /// First time this name was seen
    Added,
    /// Name was already a member
    Known,
}

/// Insertion-only set of agent names persisted under the registry key
///
/// # Invariants
/// - Membership is monotonic; there is no removal path
/// - Registering an existing name writes nothing
/// - When a limit is set, unknown names are refused once it is reached
/// - An unreadable stored set is reported, never overwritten
pub struct AgentRegistry {
    store: Arc<dyn MailboxStore>,
    max_agents: Option<usize>,
}

impl AgentRegistry {
    pub fn new(store: Arc<dyn MailboxStore>, max_agents: Option<usize>) -> Self {
        Self { store, max_agents }
    }

    /// Adds an agent to the registry
    ///
    /// The membership check and the write of the grown set happen in one
    /// atomic store update, so concurrent registrations never drop names.
    pub async fn register(&self, name: &AgentName) -> RendezvousResult<Registration> {
        let member = name.as_str().to_string();
        let limit = self.max_agents;

        let previous = self
            .store
            .update(
                REGISTRY_KEY,
                Box::new(move |current| {
                    // An unreadable set is left in place and reported below
                    let mut members = match current.map(parse_members).transpose() {
                        Ok(members) => members.unwrap_or_default(),
                        Err(_) => return None,
                    };
                    if members.contains(&member) {
                        return None;
                    }
                    if limit.is_some_and(|max| members.len() >= max) {
                        return None;
                    }
                    members.insert(member);
                    serde_json::to_string(&members).ok()
                }),
            )
            .await?;

        let before = decode_members(previous.as_deref())?;
        if before.contains(name.as_str()) {
            return Ok(Registration::Known);
        }
        if let Some(max) = limit {
            if before.len() >= max {
                tracing::warn!(agent = %name, limit = max, "Registry full, refusing agent");
                return Err(RendezvousError::RegistryFull {
                    name: name.to_string(),
                    limit: max,
                });
            }
        }

        tracing::info!(agent = %name, "Added agent to registry");
        Ok(Registration::Added)
    }

    /// Returns all registered names in sorted order
    pub async fn members(&self) -> RendezvousResult<Vec<String>> {
        let stored = self.store.get(REGISTRY_KEY).await?;
        Ok(decode_members(stored.as_deref())?.into_iter().collect())
    }

    pub async fn contains(&self, name: &AgentName) -> RendezvousResult<bool> {
        Ok(self.members().await?.iter().any(|m| m == name.as_str()))
    }
}

fn parse_members(payload: &str) -> Result<BTreeSet<String>, serde_json::Error> {
    serde_json::from_str(payload)
}

fn decode_members(payload: Option<&str>) -> RendezvousResult<BTreeSet<String>> {
    match payload {
        None => Ok(BTreeSet::new()),
        Some(payload) => parse_members(payload).map_err(|e| {
            tracing::error!(error = %e, "Unreadable registry payload");
            RendezvousError::CorruptRecord {
                key: REGISTRY_KEY.to_string(),
                reason: e.to_string(),
            }
        }),
    }
}
