//! Refuge Node - shelter API server and polling client
//!
//! Wires the pure capacity model in `refuge-core` to storage, HTTP and timers.
//!
//! # Architecture
//!
//! - **Storage**: RocksDB-backed shelter records and the local account
//! - **API**: HTTP endpoints for listing, replacing and checking in to shelters
//! - **Source**: where the client gets snapshots (remote API or simulation)
//! - **Session**: single owner of the client's tracker; refresh and check-in
//!   both go through its lock
//! - **Refresh**: polling loop driving the session
//! - **Auth**: local account registration and login
//!
//! # Example
//!
//! ```no_run
//! use refuge_node::{NodeConfig, RefugeNode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = NodeConfig::from_env()?;
//!     let node = RefugeNode::new(config).await?;
//!     node.run().await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod error;
pub mod node;
pub mod refresh;
pub mod render;
pub mod session;
pub mod source;
pub mod storage;

pub use auth::{AccountRecord, Authenticator, Identity, LocalAccounts};
pub use error::{Error, Result};
pub use node::{NodeConfig, NodeState, RefugeNode};
pub use refresh::RefreshHandle;
pub use session::{AppConfig, CheckInOutcome, SessionSnapshot, ShelterSession, SourceKind};
pub use source::{HttpSource, ShelterSource, SimulatedSource};
pub use storage::Storage;
