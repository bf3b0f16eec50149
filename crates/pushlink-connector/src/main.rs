use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::sync::{mpsc, watch};
use tracing::info;

use pushlink_connector::{
    Config, DispatchBridge, Dispatcher, GatewayDispatcher, observability, run_dispatch_worker,
    supervisor,
};
use pushlink_provider::RestClient;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load .env file if present (before anything else)
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    observability::init_tracing();

    let config = Config::parse();
    info!(
        gateway = %config.gateway,
        async_invoke = config.async_invoke,
        queue_capacity = config.queue_capacity,
        "starting connector"
    );

    let rest = RestClient::new(&config.api_url, &config.api_token)?;

    let (queue_tx, queue_rx) = mpsc::channel(config.queue_capacity.max(1));
    let dispatcher: Arc<dyn Dispatcher> = Arc::new(GatewayDispatcher::new(&config));
    let worker = tokio::spawn(run_dispatch_worker(queue_rx, dispatcher));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        info!("shutdown requested");
        let _ = shutdown_tx.send(true);
    });

    let mut bridge = DispatchBridge::new(rest, queue_tx);
    supervisor::run_supervised(
        &config.stream_url,
        &config.api_token,
        &mut bridge,
        shutdown_rx,
    )
    .await?;

    // Dropping the bridge closes the queue; the worker drains what's left
    drop(bridge);
    worker.await?;

    info!("connector stopped");
    Ok(())
}
