//! Neural query gateway — dual-path orchestration
//!
//! The canister is invoked exactly once per request; any classified failure
//! routes to the demo generator, so every caller gets a well-formed
//! envelope with `success: true`. Only `degraded` and the content tell the
//! two paths apart.

use std::sync::Arc;

use chrono::Utc;

use crate::backend::CanisterBackend;
use crate::candid;
use crate::config::BackendSettings;
use crate::fallback;
use crate::models::{
    reference_sources, HealthState, HealthStatus, LogEntry, ResponseEnvelope, Severity,
};

/// Substituted when the caller sends no usable topic.
pub const DEFAULT_TOPIC: &str = "general research";

const STATUS_FOOTER: &str = "[SYSTEM STATUS]\n\
    ✓ ICP Replica: Connected\n\
    ✓ ResearchOS Canister: Operational\n\
    ✓ Neural Query: Processed";

const DEMO_HEALTH_MESSAGE: &str = "ResearchOS Demo Mode - Canister Starting";

pub struct QueryGateway {
    backend: Arc<dyn CanisterBackend>,
    settings: BackendSettings,
}

impl QueryGateway {
    /// The backend is injected so tests can substitute a scripted fake.
    pub fn new(backend: Arc<dyn CanisterBackend>, settings: BackendSettings) -> Self {
        Self { backend, settings }
    }

    /// Answer a research query. Never fails: a backend error is absorbed
    /// into the demo path, not surfaced to the caller.
    pub async fn research(&self, query: Option<String>) -> ResponseEnvelope {
        let topic = match query {
            Some(q) if !q.trim().is_empty() => q,
            _ => DEFAULT_TOPIC.to_string(),
        };

        tracing::info!(topic = %topic, backend = self.backend.name(), "Neural query received");

        let arg = candid::encode_topic_record(&topic);
        match self
            .backend
            .invoke(&self.settings.query_method, Some(&arg), self.settings.call_timeout())
            .await
        {
            Ok(raw) => self.live_envelope(topic, &raw),
            Err(e) => {
                tracing::warn!(
                    topic = %topic,
                    error = %e,
                    "Canister call failed — answering in demo mode"
                );
                self.demo_envelope(topic)
            }
        }
    }

    fn live_envelope(&self, topic: String, raw: &str) -> ResponseEnvelope {
        let reply = candid::unwrap_text_value(raw);
        let content = format!("[LIVE CANISTER RESPONSE]\n\n{reply}\n\n{STATUS_FOOTER}");

        let logs = vec![
            LogEntry::new("USER-AGENT", format!("Query: \"{topic}\""), Severity::Success),
            LogEntry::new("ICP-CANISTER", "Response received", Severity::Success),
            LogEntry::new("NEURAL-NET", "Processing complete", Severity::Info),
        ];

        ResponseEnvelope {
            success: true,
            degraded: false,
            topic,
            content,
            sources: reference_sources(),
            timestamp: Utc::now().timestamp_millis(),
            logs,
        }
    }

    fn demo_envelope(&self, topic: String) -> ResponseEnvelope {
        let demo = fallback::demo_response(&topic);

        ResponseEnvelope {
            success: true,
            degraded: true,
            topic,
            content: demo.content,
            sources: demo.sources,
            timestamp: Utc::now().timestamp_millis(),
            logs: demo.logs,
        }
    }

    /// Probe the canister with the zero-argument health method under the
    /// short health budget. Never fails outward.
    pub async fn check_health(&self) -> HealthStatus {
        match self
            .backend
            .invoke(&self.settings.health_method, None, self.settings.health_timeout())
            .await
        {
            Ok(raw) => HealthStatus {
                state: HealthState::Online,
                message: format!("ICP Canister: {}", candid::unwrap_text_value(&raw)),
                backend_connected: true,
            },
            Err(e) => {
                tracing::warn!(error = %e, "Canister health check failed — reporting demo mode");
                HealthStatus {
                    state: HealthState::Demo,
                    message: DEMO_HEALTH_MESSAGE.to_string(),
                    backend_connected: false,
                }
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
