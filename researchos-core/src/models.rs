use serde::{Deserialize, Serialize};

/// A neural source reference. The list is static build data and is returned
/// unchanged on both the live and the demo path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub handle: String,
    pub influence: f64,
    pub id: String,
}

/// The fixed reference list attached to every response.
pub fn reference_sources() -> Vec<Source> {
    vec![
        Source {
            handle: "@researchos".to_string(),
            influence: 99.9,
            id: "NID_000".to_string(),
        },
        Source {
            handle: "@icp_protocol".to_string(),
            influence: 95.5,
            id: "NID_001".to_string(),
        },
        Source {
            handle: "@dfinity".to_string(),
            influence: 92.1,
            id: "NID_002".to_string(),
        },
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

/// One step in the processing trail shown to the caller. Order is
/// chronological and append-only within a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub agent: String,
    pub message: String,
    pub severity: Severity,
}

impl LogEntry {
    pub fn new(agent: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            agent: agent.into(),
            message: message.into(),
            severity,
        }
    }
}

/// The single response shape for every query, whichever path produced it.
/// `success` is always true; `degraded` tells callers that the content came
/// from the demo path instead of the canister.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub success: bool,
    pub degraded: bool,
    pub topic: String,
    pub content: String,
    pub sources: Vec<Source>,
    /// Epoch milliseconds, attached at assembly time.
    pub timestamp: i64,
    pub logs: Vec<LogEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Online,
    Demo,
}

/// Derived fresh on every health check; never cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub state: HealthState,
    pub message: String,
    pub backend_connected: bool,
}
