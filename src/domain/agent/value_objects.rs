use serde::{Deserialize, Serialize};
use std::fmt;

use super::{COMMAND_KEY_SUFFIX, REGISTRY_KEY};

/// Agent identifier used to address mailbox slots
///
/// # Invariants
/// - Must not be empty
/// - Must not equal the registry key
/// - Must not end with the command-slot suffix, which would alias
///   another agent's command record
/// - Is immutable after construction
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentName(String);

impl AgentName {
    /// Creates a new AgentName value object
    ///
    /// # Returns
    /// * `Ok(AgentName)` - If the name addresses its own key family
    /// * `Err(String)` - If it would collide with a reserved or derived key
    ///
    /// # Example
    /// ```
    /// use fleet_rendezvous::domain::agent::AgentName;
    ///
    /// let name = AgentName::new("clouder1").expect("valid name");
    /// assert_eq!(name.command_key(), "clouder1-c");
    /// assert!(AgentName::new("agent_list").is_err());
    /// ```
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        if name.is_empty() {
            return Err("Agent name cannot be empty".to_string());
        }
        if name == REGISTRY_KEY {
            return Err(format!("Agent name '{}' is reserved", name));
        }
        if name.ends_with(COMMAND_KEY_SUFFIX) {
            return Err(format!(
                "Agent name '{}' must not end with '{}'",
                name, COMMAND_KEY_SUFFIX
            ));
        }
        Ok(AgentName(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key holding the agent's last raw push
    pub fn state_key(&self) -> &str {
        &self.0
    }

    /// Key holding the agent's command record
    pub fn command_key(&self) -> String {
        format!("{}{}", self.0, COMMAND_KEY_SUFFIX)
    }
}

impl fmt::Display for AgentName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
