use serde::{Deserialize, Serialize};

/// State snapshot exchanged with an agent on every round trip
///
/// Field names follow the fleet wire schema exactly. Absent fields
/// deserialize to their zero value so partially filled pushes are accepted.
///
/// # Example
/// ```
/// use fleet_rendezvous::domain::agent::AgentState;
///
/// let state: AgentState = serde_json::from_str(r#"{"Name":"clouder1","X":0.5}"#).unwrap();
/// assert_eq!(state.name, "clouder1");
/// assert!(!state.request_ready);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentState {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "IP")]
    pub ip: String,
    #[serde(rename = "Port")]
    pub port: i64,
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
    #[serde(rename = "Psi")]
    pub psi: f64,
    #[serde(rename = "Stop_label")]
    pub stop_label: bool,
    /// Pending-command flag on a command record
    #[serde(rename = "Req_Resp")]
    pub request_ready: bool,
    #[serde(rename = "V")]
    pub v: f64,
    #[serde(rename = "W")]
    pub w: f64,
    /// Flattened (x, y) pairs
    #[serde(rename = "Path_Param")]
    pub path_param: Vec<f64>,
}

impl AgentState {
    /// Parses a payload as received on the wire or read back from the mailbox
    pub fn from_payload(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    /// Serializes into a self-contained mailbox payload
    pub fn to_payload(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Emits every field as a structured tracing event
    pub fn trace_fields(&self, context: &'static str) {
        tracing::debug!(
            context,
            name = %self.name,
            ip = %self.ip,
            port = self.port,
            x = self.x,
            y = self.y,
            psi = self.psi,
            stop_label = self.stop_label,
            req_resp = self.request_ready,
            v = self.v,
            w = self.w,
            path_points = self.path_param.len() / 2,
            "agent state"
        );
    }
}
