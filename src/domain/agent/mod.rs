// Agent domain: wire snapshot, identity and mailbox key layout

pub mod state;
pub mod value_objects;

pub use state::AgentState;
pub use value_objects::AgentName;

/// Mailbox key holding the serialized registry set
pub const REGISTRY_KEY: &str = "agent_list";

/// Suffix appended to an agent name to address its command record
pub const COMMAND_KEY_SUFFIX: &str = "-c";
