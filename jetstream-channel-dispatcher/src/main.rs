use anyhow::{Context, Result};
use clap::Parser;
use jetstream_channel_dispatcher::{
    service_configuration::ServiceConfiguration,
    topology::{build_channel_topology, ChannelTopology},
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const COMPONENT: &str = "jetstream-channel-dispatcher";

/// Computes the JetStream stream and consumer configuration of the
/// configured channels and prints it as JSON.
#[derive(Debug, Parser)]
#[command(name = COMPONENT, version, about)]
struct Args {
    /// Path to the channels configuration file
    #[arg(long, env = "JETSTREAM_DISPATCHER_CONFIG")]
    config_file: String,

    /// Only handle channels of this namespace
    #[arg(long, env = "NAMESPACE")]
    namespace: Option<String>,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let namespace = args.namespace.as_deref().filter(|ns| !ns.is_empty());

    let config = ServiceConfiguration::from_file(&args.config_file).with_context(|| {
        format!("Failed to load configuration from {}", args.config_file)
    })?;

    info!(
        component = COMPONENT,
        namespace = namespace.unwrap_or("*"),
        "loaded {} channel(s)",
        config.channels.len()
    );

    let mut plans: Vec<ChannelTopology> = Vec::new();
    for channel in config.channels_in(namespace) {
        if channel.subscriptions.is_empty() {
            warn!(
                namespace = %channel.namespace,
                channel = %channel.name,
                "channel has no subscribers, only the stream will be configured"
            );
        }
        for subscription in &channel.subscriptions {
            debug!(
                namespace = %channel.namespace,
                channel = %channel.name,
                subscription = %subscription.uid,
                subscriber = ?subscription.subscriber,
                "resolved subscriber"
            );
        }
        plans.push(build_channel_topology(
            &channel.namespace,
            &channel.name,
            &channel.spec,
        ));
    }

    let output = serde_json::to_string_pretty(&plans).context("Failed to encode topology")?;
    println!("{output}");

    info!("computed topology for {} channel(s)", plans.len());
    Ok(())
}
