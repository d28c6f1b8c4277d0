//! Refuge Node binary
//!
//! Serves the shelter API over HTTP.

use refuge_node::{NodeConfig, RefugeNode};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "refuge_node=info,refuge_core=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Refuge Node");

    let config = NodeConfig::from_env()?;

    let node = RefugeNode::new(config).await?;
    node.run().await?;

    Ok(())
}
