use std::io::Read;
use std::sync::Arc;

use anyhow::Context;
use macroscope_relay::config::RelayConfig;
use macroscope_relay::dispatch::{SmtpConfig, SmtpDispatcher};
use macroscope_relay::handler::Relay;
use macroscope_relay::store::HttpObjectStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Install rustls crypto provider before any TLS usage
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = RelayConfig::from_env();
    let store_endpoint = std::env::var("RELAY_STORE_ENDPOINT")
        .context("RELAY_STORE_ENDPOINT not set (object store base URL)")?;
    let smtp_config = SmtpConfig::from_env()?;

    eprintln!("MacroScope relay v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Store: {}", store_endpoint);
    eprintln!("   SMTP: {}:{}", smtp_config.host, smtp_config.port);
    eprintln!("   Forwarding to: {}\n", config.forward_to);

    let relay = Relay::new(
        Arc::new(HttpObjectStore::new(store_endpoint)),
        Arc::new(SmtpDispatcher::new(smtp_config)),
        config,
    );

    // One event JSON document per run: from the file given as the first
    // argument, or from stdin.
    let input = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read event from {path}"))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read event from stdin")?;
            buf
        }
    };
    let event: serde_json::Value =
        serde_json::from_str(&input).context("Event is not valid JSON")?;

    let result = relay.handle(&event).await;
    println!("{}", serde_json::to_string(&result)?);

    Ok(())
}
