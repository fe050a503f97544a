//! Canister backends for ResearchOS — multi-transport invocation support
//!
//! Provides a `CanisterBackend` trait with implementations for:
//! - **Dfx** — out-of-process calls through the `dfx` CLI
//! - **Relay** — calls through an HTTP relay in front of the replica
//!
//! Every call is single-attempt and wall-clock bounded. The invoked method
//! may mutate remote state, so no adapter retries on failure.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::process::Command;
use tokio::sync::Semaphore;

use crate::config::BackendSettings;
use crate::error::ResearchError;

// ============================================================================
// CanisterBackend trait
// ============================================================================

/// Abstraction over the channel to the canister. The gateway is written
/// against this trait so the transport can be swapped without touching it.
#[async_trait]
pub trait CanisterBackend: Send + Sync {
    /// Invoke `method` on the canister, passing an optional pre-encoded
    /// textual argument. Returns the raw reply text. The call is cancelled
    /// and classified as `Timeout` once `budget` elapses.
    async fn invoke(
        &self,
        method: &str,
        arg: Option<&str>,
        budget: Duration,
    ) -> Result<String, BackendError>;

    /// Transport name for logging.
    fn name(&self) -> &str;
}

// ============================================================================
// Error types
// ============================================================================

/// Invocation errors, classified at the call boundary.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("canister call timed out after {budget_ms}ms")]
    Timeout { budget_ms: u64 },

    #[error("canister call exited with status {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("malformed canister output: {0}")]
    MalformedOutput(String),
}

// ============================================================================
// DfxBackend — subprocess adapter
// ============================================================================

/// Invokes the canister by spawning `dfx canister call`. Arguments are
/// passed as separate argv elements; no shell is involved.
pub struct DfxBackend {
    dfx_path: String,
    network: String,
    canister_id: String,
    inflight: Semaphore,
}

impl DfxBackend {
    pub fn new(settings: &BackendSettings) -> Self {
        Self {
            dfx_path: settings.dfx_path.clone(),
            network: settings.network.clone(),
            canister_id: settings.canister_id.clone(),
            inflight: Semaphore::new(settings.max_inflight_calls),
        }
    }

    async fn run_once(&self, method: &str, arg: Option<&str>) -> Result<String, BackendError> {
        let mut cmd = Command::new(&self.dfx_path);
        cmd.arg("canister")
            .arg("call")
            .arg("--network")
            .arg(&self.network)
            .arg(&self.canister_id)
            .arg(method);
        if let Some(arg) = arg {
            cmd.arg(arg);
        }
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // The child must not outlive a timed-out call.
            .kill_on_drop(true);

        tracing::debug!(method, canister = %self.canister_id, "Spawning dfx canister call");

        let output = cmd
            .output()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(BackendError::NonZeroExit {
                code: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        String::from_utf8(output.stdout).map_err(|e| BackendError::MalformedOutput(e.to_string()))
    }
}

#[async_trait]
impl CanisterBackend for DfxBackend {
    async fn invoke(
        &self,
        method: &str,
        arg: Option<&str>,
        budget: Duration,
    ) -> Result<String, BackendError> {
        let call = async {
            let _permit = self
                .inflight
                .acquire()
                .await
                .map_err(|e| BackendError::Transport(e.to_string()))?;
            self.run_once(method, arg).await
        };

        match tokio::time::timeout(budget, call).await {
            Ok(result) => result,
            Err(_) => Err(BackendError::Timeout {
                budget_ms: budget.as_millis() as u64,
            }),
        }
    }

    fn name(&self) -> &str {
        "dfx"
    }
}

// ============================================================================
// RelayBackend — HTTP adapter
// ============================================================================

#[derive(Debug, Serialize)]
struct RelayRequest<'a> {
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    arg: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct RelayReply {
    reply: String,
}

/// Invokes the canister through an HTTP relay that exposes
/// `POST /api/canister/{id}/call` taking `{method, arg}` and answering
/// `{reply}` with the same textual value syntax the CLI prints.
pub struct RelayBackend {
    client: Client,
    base_url: String,
    canister_id: String,
}

impl RelayBackend {
    pub fn new(settings: &BackendSettings) -> Result<Self, BackendError> {
        Self::with_base_url(settings, settings.relay_url.clone())
    }

    /// Create a relay client with a custom base URL (for testing / integration)
    pub fn with_base_url(
        settings: &BackendSettings,
        base_url: String,
    ) -> Result<Self, BackendError> {
        let client = Client::builder()
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            canister_id: settings.canister_id.clone(),
        })
    }
}

#[async_trait]
impl CanisterBackend for RelayBackend {
    async fn invoke(
        &self,
        method: &str,
        arg: Option<&str>,
        budget: Duration,
    ) -> Result<String, BackendError> {
        let url = format!("{}/api/canister/{}/call", self.base_url, self.canister_id);
        let request = RelayRequest { method, arg };

        let response = self
            .client
            .post(&url)
            .timeout(budget)
            .json(&request)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(e, budget))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(code = status.as_u16(), body = %body, "Relay error");
            return Err(BackendError::Transport(format!(
                "relay returned HTTP {}: {}",
                status, body
            )));
        }

        let reply: RelayReply = response
            .json()
            .await
            .map_err(|e| BackendError::MalformedOutput(e.to_string()))?;

        Ok(reply.reply)
    }

    fn name(&self) -> &str {
        "relay"
    }
}

fn classify_reqwest_error(e: reqwest::Error, budget: Duration) -> BackendError {
    if e.is_timeout() {
        BackendError::Timeout {
            budget_ms: budget.as_millis() as u64,
        }
    } else {
        BackendError::Transport(e.to_string())
    }
}

// ============================================================================
// Factory
// ============================================================================

/// Create the configured backend adapter.
pub fn create_backend(
    settings: &BackendSettings,
) -> Result<Box<dyn CanisterBackend>, ResearchError> {
    match settings.transport.as_str() {
        "dfx" => Ok(Box::new(DfxBackend::new(settings))),
        "relay" => Ok(Box::new(RelayBackend::new(settings)?)),
        other => Err(ResearchError::Other(format!(
            "unknown backend transport '{}' (expected \"dfx\" or \"relay\")",
            other
        ))),
    }
}

// ============================================================================
// TESTS
// ============================================================================
