//! researchos-cli — command-line frontend for the ResearchOS query gateway
//!
//! Talks to the gateway's HTTP API; it never reaches the canister directly,
//! so it works identically whether the backend is live or in demo mode.
//!
//! # Subcommands
//! - `query <topic> [--json]` — submit a research query
//! - `status`                 — show gateway/canister health

use clap::{Parser, Subcommand};
use serde::Deserialize;

const DEFAULT_SERVER: &str = "http://127.0.0.1:3000";

// ============================================================================
// CLI Definition
// ============================================================================

#[derive(Debug, Parser)]
#[command(
    name = "researchos-cli",
    version,
    about = "ResearchOS neural query gateway — command-line frontend"
)]
struct Cli {
    /// Gateway HTTP server URL (overrides RESEARCHOS_HTTP_URL env var)
    #[arg(long, env = "RESEARCHOS_HTTP_URL", default_value = DEFAULT_SERVER)]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Submit a research query
    Query {
        /// Topic to research
        topic: String,

        /// Print the raw response envelope as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show gateway and canister status
    Status,
}

// ============================================================================
// API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CliSource {
    pub handle: String,
    pub influence: f64,
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct CliLogEntry {
    pub agent: String,
    pub message: String,
    pub severity: String,
}

/// The envelope returned by POST /api/neural-query
#[derive(Debug, Deserialize)]
pub struct CliEnvelope {
    pub success: bool,
    pub degraded: bool,
    pub topic: String,
    pub content: String,
    pub sources: Vec<CliSource>,
    pub timestamp: i64,
    pub logs: Vec<CliLogEntry>,
}

/// The payload returned by GET /api/health
#[derive(Debug, Deserialize)]
pub struct CliHealth {
    pub state: String,
    pub message: String,
    pub backend_connected: bool,
}

// ============================================================================
// Rendering
// ============================================================================

/// Render an envelope for terminal output.
pub fn render_envelope(envelope: &CliEnvelope) -> String {
    let mode = if envelope.degraded {
        "demo (canister offline)"
    } else {
        "live"
    };

    let mut out = String::new();
    out.push_str(&format!("Topic: {}\n", envelope.topic));
    out.push_str(&format!("Mode:  {}\n\n", mode));
    out.push_str(&envelope.content);
    out.push_str("\n\nProcessing log:\n");
    for log in &envelope.logs {
        out.push_str(&format!(
            "  [{}] {}: {}\n",
            log.severity, log.agent, log.message
        ));
    }
    out.push_str("\nSources:\n");
    for source in &envelope.sources {
        out.push_str(&format!(
            "  {}  (influence {}, {})\n",
            source.handle, source.influence, source.id
        ));
    }
    out
}

/// Render a health payload for terminal output.
pub fn render_health(health: &CliHealth) -> String {
    let connected = if health.backend_connected { "yes" } else { "no" };
    format!(
        "Gateway:   {}\nCanister:  {}\nMessage:   {}",
        health.state, connected, health.message
    )
}

// ============================================================================
// HTTP Client Calls
// ============================================================================

fn do_query(server: &str, topic: &str, json_output: bool) -> anyhow::Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    let url = format!("{}/api/neural-query", server);
    let body = serde_json::json!({ "query": topic });

    let resp = match client.post(&url).json(&body).send() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("researchos-cli: connection failed to {}: {}", url, e);
            std::process::exit(1);
        }
    };

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().unwrap_or_default();
        eprintln!("researchos-cli: server returned {}: {}", status, body);
        std::process::exit(1);
    }

    if json_output {
        let envelope: serde_json::Value = resp.json()?;
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }

    let envelope: CliEnvelope = match resp.json() {
        Ok(e) => e,
        Err(e) => {
            eprintln!("researchos-cli: failed to parse response: {}", e);
            std::process::exit(1);
        }
    };

    println!("{}", render_envelope(&envelope));
    Ok(())
}

fn do_status(server: &str) -> anyhow::Result<()> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?;

    let url = format!("{}/api/health", server);

    let resp = match client.get(&url).send() {
        Ok(r) => r,
        Err(e) => {
            eprintln!("researchos-cli: cannot reach {} — {}", url, e);
            std::process::exit(1);
        }
    };

    if !resp.status().is_success() {
        eprintln!("researchos-cli: server unhealthy (HTTP {})", resp.status());
        std::process::exit(1);
    }

    let health: CliHealth = resp.json()?;
    println!("{}", render_health(&health));
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

fn main() {
    let cli = Cli::parse();
    let server = cli.server.trim_end_matches('/').to_string();

    let result = match cli.command {
        Commands::Query { topic, json } => do_query(&server, &topic, json),
        Commands::Status => do_status(&server),
    };

    if let Err(e) = result {
        eprintln!("researchos-cli: {}", e);
        std::process::exit(1);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_envelope(degraded: bool) -> CliEnvelope {
        CliEnvelope {
            success: true,
            degraded,
            topic: "quantum computing".to_string(),
            content: "[LIVE CANISTER RESPONSE]\n\nscan complete".to_string(),
            sources: vec![CliSource {
                handle: "@researchos".to_string(),
                influence: 99.9,
                id: "NID_000".to_string(),
            }],
            timestamp: 1_700_000_000_000,
            logs: vec![CliLogEntry {
                agent: "USER-AGENT".to_string(),
                message: "Query: \"quantum computing\"".to_string(),
                severity: "success".to_string(),
            }],
        }
    }

    #[test]
    fn test_render_envelope_live_mode() {
        let out = render_envelope(&mock_envelope(false));
        assert!(out.contains("Topic: quantum computing"));
        assert!(out.contains("Mode:  live"));
        assert!(out.contains("scan complete"));
        assert!(out.contains("[success] USER-AGENT"));
        assert!(out.contains("@researchos"));
    }

    #[test]
    fn test_render_envelope_demo_mode() {
        let out = render_envelope(&mock_envelope(true));
        assert!(out.contains("Mode:  demo (canister offline)"));
    }

    #[test]
    fn test_render_health() {
        let online = CliHealth {
            state: "online".to_string(),
            message: "ICP Canister: ONLINE".to_string(),
            backend_connected: true,
        };
        let out = render_health(&online);
        assert!(out.contains("Gateway:   online"));
        assert!(out.contains("Canister:  yes"));
        assert!(out.contains("ICP Canister: ONLINE"));

        let demo = CliHealth {
            state: "demo".to_string(),
            message: "ResearchOS Demo Mode - Canister Starting".to_string(),
            backend_connected: false,
        };
        let out = render_health(&demo);
        assert!(out.contains("Canister:  no"));
    }

    #[test]
    fn test_envelope_parses_from_wire_json() {
        let json = r#"{
            "success": true,
            "degraded": true,
            "topic": "ai",
            "content": "[FALLBACK MODE]",
            "sources": [{"handle": "@dfinity", "influence": 92.1, "id": "NID_002"}],
            "timestamp": 1700000000000,
            "logs": [{"agent": "FALLBACK-SYS", "message": "Using demo mode", "severity": "warning"}]
        }"#;

        let envelope: CliEnvelope = serde_json::from_str(json).unwrap();
        assert!(envelope.success);
        assert!(envelope.degraded);
        assert_eq!(envelope.sources[0].id, "NID_002");
        assert_eq!(envelope.logs[0].severity, "warning");
        assert_eq!(envelope.timestamp, 1_700_000_000_000);
    }
}
