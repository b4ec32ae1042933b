//! The bridge node binary: loads configuration, bootstraps the shared
//! `BridgeContext` off the system channel, then starts one chain
//! pipeline per configured channel.

use anyhow::{Context, Result};
use bridge_chain::Chain;
use bridge_ipc::BridgeContext;
use bridge_node::config::NodeConfig;
use bridge_node::ledger::InMemoryLedger;
use bridge_node::observability::{init_logging, LogFormat, MetricsState};
use bridge_types::ChannelId;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Consensus bridge node: per-channel chain pipelines over an external
/// BFT consensus process.
#[derive(Parser, Debug)]
#[command(name = "bridge-node")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the YAML node configuration file.
    #[arg(short, long, default_value = "bridge.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = NodeConfig::from_file(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config.display()))?;
    config
        .merge_env()
        .context("applying environment variable overrides")?;
    config
        .validate_config()
        .context("validating node configuration")?;

    init_logging(&config.logging.level, LogFormat::parse(&config.logging.format));
    info!(
        channels = config.channels.len(),
        pool_size = config.pool_size,
        system_channel = %config.system_channel,
        "bridge node configuration loaded"
    );

    let metrics = MetricsState::new();
    metrics.send_pool_size.set(config.pool_size as i64);

    let system_channel = config
        .channels
        .iter()
        .find(|c| c.id == config.system_channel)
        .expect("validate_config guarantees the system channel is configured");

    info!("bootstrapping send pool via system channel");
    let context = BridgeContext::bootstrap(
        config.unix_socket_path.clone(),
        config.recv_port,
        config.ready_marker_path.clone(),
        config.pool_size,
    )
    .await
    .context("bootstrap-fatal: failed to establish control/pool connections")?;

    let mut chains = Vec::with_capacity(config.channels.len());

    start_chain(&context, system_channel, true, metrics.clone(), &mut chains).await?;
    for channel in config.channels.iter().filter(|c| c.id != config.system_channel) {
        start_chain(&context, channel, false, metrics.clone(), &mut chains).await?;
    }

    info!(channels = chains.len(), "all chains running, awaiting shutdown signal");
    tokio::signal::ctrl_c().await.context("waiting for shutdown signal")?;

    info!("shutdown signal received, halting chains");
    for chain in &chains {
        chain.halt();
    }

    Ok(())
}

async fn start_chain(
    context: &Arc<BridgeContext>,
    channel: &bridge_node::config::ChannelConfig,
    is_system_channel: bool,
    metrics: MetricsState,
    chains: &mut Vec<Arc<Chain>>,
) -> Result<()> {
    let channel_id = ChannelId::new(channel.id.clone());
    let chain = Chain::new(channel_id.clone(), context.clone(), is_system_channel)
        .with_metrics(Arc::new(metrics.clone()));
    let chain = Arc::new(chain);
    let appender = Arc::new(InMemoryLedger::new(channel_id.clone(), metrics));

    chain
        .start(channel.batch_timeout_ns, appender)
        .await
        .with_context(|| format!("starting chain for channel '{}'", channel.id))?;

    info!(channel_id = %channel_id, is_system_channel, "chain started");
    chains.push(chain);
    Ok(())
}
