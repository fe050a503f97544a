use std::sync::Arc;

use clap::Parser;
use researchos_core::{create_backend, HealthState, QueryGateway, ResearchConfig};
use tokio::sync::broadcast;
use tracing_subscriber::{fmt, EnvFilter};

use researchos_server::http;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "researchos.toml")]
    config: String,

    #[arg(long)]
    health: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (dev convenience — production uses real env vars)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Load config
    let config = match ResearchConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", args.config, e);
            std::process::exit(1);
        }
    };

    // Init logging — RUST_LOG wins, config log level otherwise
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.service.log_level)),
        )
        .init();

    // Construct the canister backend
    let backend = match create_backend(&config.backend) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("Failed to create canister backend: {}", e);
            std::process::exit(1);
        }
    };

    let gateway = Arc::new(QueryGateway::new(Arc::from(backend), config.backend.clone()));

    if args.health {
        let health = gateway.check_health().await;
        match health.state {
            HealthState::Online => println!("✅ {}", health.message),
            HealthState::Demo => {
                println!("❌ Canister unreachable: {}", health.message);
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    // Shutdown signal
    let (tx, _rx) = broadcast::channel(1);
    let shutdown_tx = tx.clone();

    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl+C");
        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(());
    });

    http::start_http_server(config, gateway, tx.subscribe()).await?;

    Ok(())
}
