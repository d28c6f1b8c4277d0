//! Refuge node - the shelter API server.
//!
//! Architecture:
//! - Single daemon process with one shared RocksDB storage
//! - HTTP API for clients (list, fetch, replace, check-in)

use crate::api;
use crate::error::{Error, Result};
use crate::storage::Storage;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

/// Configuration for a Refuge node.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Data directory for storage
    pub data_dir: PathBuf,

    /// HTTP API listen address
    pub api_addr: SocketAddr,

    /// Seed the built-in shelters into an empty store
    pub seed_defaults: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./refuge-data"),
            api_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            seed_defaults: true,
        }
    }
}

impl NodeConfig {
    /// Create config from environment variables with defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`NodeConfig::from_env`] with a custom variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let data_dir = lookup("REFUGE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let api_addr = match lookup("REFUGE_API_ADDR") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| Error::InvalidInput(format!("invalid REFUGE_API_ADDR: {raw}")))?,
            None => defaults.api_addr,
        };

        let seed_defaults = match lookup("REFUGE_SEED").as_deref().map(str::trim) {
            None => defaults.seed_defaults,
            Some("1" | "true" | "yes") => true,
            Some("0" | "false" | "no") => false,
            Some(other) => {
                return Err(Error::InvalidInput(format!("invalid REFUGE_SEED: {other}")));
            }
        };

        Ok(Self {
            data_dir,
            api_addr,
            seed_defaults,
        })
    }
}

/// Shared state for the node - one storage instance behind the lock.
///
/// Handlers that modify shelters take the write lock, which serializes
/// check-ins against replacements.
pub struct NodeState {
    pub storage: Arc<Storage>,
}

/// A Refuge node instance.
pub struct RefugeNode {
    state: Arc<RwLock<NodeState>>,
    config: NodeConfig,
}

impl RefugeNode {
    /// Create a node, opening storage and seeding it if configured.
    pub async fn new(config: NodeConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.data_dir)?;

        let storage = Arc::new(Storage::open(&config.data_dir)?);

        if config.seed_defaults {
            let seeded = storage.init_default_shelters()?;
            if seeded > 0 {
                tracing::info!("Seeded {} default shelters", seeded);
            }
        }

        let state = Arc::new(RwLock::new(NodeState { storage }));

        Ok(Self { state, config })
    }

    /// Get the shared state (for API handlers).
    pub fn state(&self) -> Arc<RwLock<NodeState>> {
        Arc::clone(&self.state)
    }

    pub async fn storage(&self) -> Arc<Storage> {
        Arc::clone(&self.state.read().await.storage)
    }

    /// Bind the configured address and serve the API.
    pub async fn run(self) -> Result<()> {
        tracing::info!("Refuge node starting");
        tracing::info!("  API: http://{}", self.config.api_addr);
        tracing::info!("  Data: {:?}", self.config.data_dir);

        let listener = TcpListener::bind(self.config.api_addr).await?;
        self.serve(listener).await
    }

    /// Serve the API on an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let app = api::build_router(self.state());
        tracing::info!("HTTP server listening on {}", listener.local_addr()?);

        axum::serve(listener, app).await?;
        Ok(())
    }
}
