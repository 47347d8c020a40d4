use std::fmt;
use std::sync::Arc;

use crate::domain::agent::{AgentName, AgentState};
use crate::domain::errors::{RendezvousError, RendezvousResult};
use crate::domain::registry::{AgentRegistry, Registration};
use crate::domain::repositories::MailboxStore;
use crate::domain::trajectory::{synthesize, TRAJECTORY_POINTS};

/// State of an agent's command slot as observed by a push
///
/// # Transitions
/// ```text
/// Absent -> Consumed          (bootstrap on first push)
/// Pending -> Consumed         (delivery on push)
/// Consumed -> Pending         (producer queues a command)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSlot {
    /// No record has ever been written
    Absent,
    /// A queued command awaits delivery
    Pending,
    /// The last command was delivered, or none was ever queued
    Consumed,
}

impl CommandSlot {
    fn of(record: &AgentState) -> Self {
        if record.request_ready {
            CommandSlot::Pending
        } else {
            CommandSlot::Consumed
        }
    }
}

impl fmt::Display for CommandSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandSlot::Absent => write!(f, "absent"),
            CommandSlot::Pending => write!(f, "pending"),
            CommandSlot::Consumed => write!(f, "consumed"),
        }
    }
}

/// Result of one rendezvous round
#[derive(Debug, Clone)]
pub struct RendezvousOutcome {
    /// Record returned to the agent, carrying a fresh trajectory
    pub response: AgentState,
    /// Slot state observed before this push touched it
    pub observed: CommandSlot,
    pub registration: Registration,
}

impl RendezvousOutcome {
    /// True when this push consumed a queued command
    pub fn delivered(&self) -> bool {
        self.observed == CommandSlot::Pending
    }
}

/// Matches agent pushes against their command slots
///
/// Owns the ready/consumed state machine. The ready flag is only ever set by
/// [`CommandRendezvous::queue_command`] and only ever cleared by
/// [`CommandRendezvous::push`]; both go through atomic store updates.
pub struct CommandRendezvous {
    store: Arc<dyn MailboxStore>,
    registry: AgentRegistry,
}

impl CommandRendezvous {
    pub fn new(store: Arc<dyn MailboxStore>, max_agents: Option<usize>) -> Self {
        let registry = AgentRegistry::new(Arc::clone(&store), max_agents);
        Self { store, registry }
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    /// Handles one state push from an agent
    ///
    /// `raw` is the request body exactly as received and `pushed` its parsed
    /// form. The response reports `Req_Resp` as read before the flag was
    /// cleared, so the push that consumes a command sees `true`. A first push
    /// is answered with the bootstrapped record, whose flag is always `false`.
    pub async fn push(&self, raw: &str, pushed: AgentState) -> RendezvousResult<RendezvousOutcome> {
        let name = AgentName::new(pushed.name.clone()).map_err(RendezvousError::InvalidAgentName)?;
        tracing::info!(agent = %name, "Processing state push");
        pushed.trace_fields("push");

        let registration = self.registry.register(&name).await?;

        self.store.put(name.state_key(), raw.to_string()).await?;

        let bootstrap_state = AgentState {
            request_ready: false,
            ..pushed.clone()
        };
        let bootstrap = bootstrap_state.to_payload()?;

        let command_key = name.command_key();
        let previous = self
            .store
            .update(
                &command_key,
                Box::new(move |current| match current {
                    None => Some(bootstrap),
                    Some(record) => match AgentState::from_payload(record) {
                        Ok(mut command) if command.request_ready => {
                            command.request_ready = false;
                            command.to_payload().ok()
                        }
                        _ => None,
                    },
                }),
            )
            .await?;

        let (observed, mut response) = match previous {
            None => {
                tracing::info!(agent = %name, "First connection, bootstrapped command slot");
                (CommandSlot::Absent, bootstrap_state)
            }
            Some(record) => {
                let command = AgentState::from_payload(&record).map_err(|e| {
                    tracing::error!(agent = %name, error = %e, "Unreadable command record");
                    RendezvousError::CorruptRecord {
                        key: command_key.clone(),
                        reason: e.to_string(),
                    }
                })?;
                let observed = CommandSlot::of(&command);
                if observed == CommandSlot::Pending {
                    tracing::info!(agent = %name, "Delivering queued command");
                    command.trace_fields("command");
                } else {
                    tracing::debug!(agent = %name, "No new command available");
                }
                (observed, command)
            }
        };

        response.path_param = synthesize(pushed.x, pushed.y, pushed.psi, TRAJECTORY_POINTS);
        tracing::debug!(
            agent = %name,
            points = response.path_param.len() / 2,
            x = pushed.x,
            y = pushed.y,
            psi = pushed.psi,
            "Generated path"
        );

        Ok(RendezvousOutcome {
            response,
            observed,
            registration,
        })
    }

    /// Queues a command for the agent named in `command`
    ///
    /// Overwrites any previous record and marks it ready for delivery. The
    /// agent is not registered by this call.
    pub async fn queue_command(&self, command: AgentState) -> RendezvousResult<AgentState> {
        let name = AgentName::new(command.name.clone()).map_err(RendezvousError::InvalidAgentName)?;
        let record = AgentState {
            request_ready: true,
            ..command
        };
        self.store.put(&name.command_key(), record.to_payload()?).await?;
        tracing::info!(agent = %name, "Queued command");
        Ok(record)
    }

    /// Current command record for an agent, if any
    pub async fn command_record(&self, name: &AgentName) -> RendezvousResult<Option<AgentState>> {
        self.load(&name.command_key()).await
    }

    /// Last raw payload pushed by an agent, if any
    pub async fn last_push(&self, name: &AgentName) -> RendezvousResult<Option<String>> {
        Ok(self.store.get(name.state_key()).await?)
    }

    /// Drops every registry entry, push and command record
    pub async fn flush(&self) -> RendezvousResult<usize> {
        Ok(self.store.clear().await?)
    }

    async fn load(&self, key: &str) -> RendezvousResult<Option<AgentState>> {
        match self.store.get(key).await? {
            None => Ok(None),
            Some(record) => AgentState::from_payload(&record)
                .map(Some)
                .map_err(|e| RendezvousError::CorruptRecord {
                    key: key.to_string(),
                    reason: e.to_string(),
                }),
        }
    }
}
