//! Demo-mode response synthesis.
//!
//! When the canister is unreachable the gateway answers from here instead of
//! surfacing an error. Output is deterministic for a given topic; the
//! timestamp is attached later by the gateway.

use crate::models::{reference_sources, LogEntry, Severity, Source};

/// A locally synthesized substitute for a canister reply.
#[derive(Debug, Clone)]
pub struct DemoResponse {
    pub content: String,
    pub sources: Vec<Source>,
    pub logs: Vec<LogEntry>,
}

pub fn demo_response(topic: &str) -> DemoResponse {
    let content = format!(
        "[FALLBACK MODE]\n\n\
         Query: \"{topic}\"\n\n\
         🔧 Canister Status: Offline/Starting\n\
         🚀 Demo Mode: Active\n\n\
         ResearchOS demonstrates distributed AI research on ICP.\n\
         Neural pathways remain functional during canister deployment."
    );

    let logs = vec![
        LogEntry::new("USER-AGENT", format!("Query: \"{topic}\""), Severity::Info),
        LogEntry::new("FALLBACK-SYS", "Using demo mode", Severity::Warning),
        LogEntry::new("DEMO-SYS", "Functionality maintained", Severity::Success),
    ];

    DemoResponse {
        content,
        sources: reference_sources(),
        logs,
    }
}
