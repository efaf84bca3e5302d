use myenergi_exporter::metrics_server::{self, AppState};
use myenergi_exporter::{MyEnergiClient, StatusCollector};
use prometheus::Registry;
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let listen_addr: SocketAddr = env::var("LISTEN_ADDR")
        .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string())
        .parse()?;

    let client = MyEnergiClient::from_env()?;
    let registry = Registry::new();
    let collector = StatusCollector::new(client, &registry)?;

    // One sanity poll before serving: an unreachable vendor API or bad
    // credentials should fail the process, not sit silently returning empty
    // scrapes. Steady-state poll failures are tolerated.
    collector.collect().await?;
    info!("initial status poll succeeded");

    metrics_server::serve(listen_addr, Arc::new(AppState::new(collector, registry))).await
}
