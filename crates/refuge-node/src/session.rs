//! Client session: the single owner of the client-side shelter collection.
//!
//! Every mutation of the tracker goes through the session's write lock, so a
//! polling refresh and a user check-in never interleave. The last one to take
//! the lock decides the state.

use crate::error::{Error, Result};
use crate::refresh::{RefreshHandle, DEFAULT_INTERVAL, SIMULATED_INTERVAL};
use crate::source::{HttpSource, ShelterSource, SimulatedSource};
use refuge_core::{
    CapacityTracker, CheckInReceipt, Navigation, Shelter, ShelterId, Totals, View, ViewSelector,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// HTTP request timeout for the remote source.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the client gets shelter data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Http(String),
    Simulated,
}

/// Configuration for the interactive client.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Shelter data source
    pub source: SourceKind,

    /// Polling interval
    pub poll_interval: Duration,

    /// Local storage directory (account record)
    pub data_dir: PathBuf,

    /// Seed for the simulated source and the environment monitor
    pub seed: u64,
}

impl AppConfig {
    /// Create config from environment variables with defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with a custom variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let source = match lookup("REFUGE_SOURCE") {
            None => SourceKind::Simulated,
            Some(s) if s.trim().eq_ignore_ascii_case("simulated") => SourceKind::Simulated,
            Some(url) => SourceKind::Http(url.trim().to_string()),
        };

        let poll_interval = match lookup("REFUGE_POLL_SECS") {
            Some(raw) => {
                let secs: u64 = raw
                    .trim()
                    .parse()
                    .map_err(|_| Error::InvalidInput(format!("invalid REFUGE_POLL_SECS: {raw}")))?;
                if secs == 0 {
                    return Err(Error::InvalidInput("REFUGE_POLL_SECS must be positive".into()));
                }
                Duration::from_secs(secs)
            }
            None if source == SourceKind::Simulated => SIMULATED_INTERVAL,
            None => DEFAULT_INTERVAL,
        };

        let data_dir = PathBuf::from(
            lookup("REFUGE_APP_DIR").unwrap_or_else(|| "./refuge-app-data".to_string()),
        );

        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        Ok(Self {
            source,
            poll_interval,
            data_dir,
            seed,
        })
    }

    /// Build the configured source.
    pub fn build_source(&self) -> Result<Arc<dyn ShelterSource>> {
        Ok(match &self.source {
            SourceKind::Http(url) => Arc::new(HttpSource::new(url.clone(), HTTP_TIMEOUT)?),
            SourceKind::Simulated => Arc::new(SimulatedSource::new(self.seed)),
        })
    }
}

/// Mutable client state guarded by the session lock.
#[derive(Debug, Default)]
pub struct SessionState {
    tracker: CapacityTracker,
    view: ViewSelector,
    last_error: Option<String>,
}

/// Point-in-time copy of the session for rendering.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub view: View,
    pub shelters: Vec<Shelter>,
    pub totals: Totals,
    pub generation: u64,
    pub loading: bool,
    /// User-facing message for the last failed refresh
    pub last_error: Option<String>,
}

/// Result of a check-in made through the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckInOutcome {
    pub receipt: CheckInReceipt,
    /// Whether the source accepted the new occupancy
    pub synced: bool,
}

/// Shared handle to the client session. Cheap to clone.
#[derive(Clone)]
pub struct ShelterSession {
    state: Arc<RwLock<SessionState>>,
    source: Arc<dyn ShelterSource>,
    /// Refreshes currently in flight
    in_flight: Arc<AtomicUsize>,
}

/// Counts one refresh for as long as it lives, including when cancelled.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ShelterSession {
    pub fn new(source: Arc<dyn ShelterSource>) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState::default())),
            source,
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fetch once and replace the tracked collection.
    ///
    /// On failure the previous snapshot stays and the error is recorded.
    pub async fn refresh_now(&self) -> Result<usize> {
        let _in_flight = InFlight::enter(&self.in_flight);

        let fetched = self.source.fetch().await.map_err(|e| match e {
            Error::FetchFailed(_) => e,
            other => Error::FetchFailed(other.to_string()),
        });

        let mut state = self.state.write().await;
        match fetched {
            Ok(shelters) => {
                let count = shelters.len();
                state.tracker.replace_all(shelters);
                state.last_error = None;
                tracing::debug!(
                    "Loaded {} shelters from {} (generation {})",
                    count,
                    self.source.describe(),
                    state.tracker.generation()
                );
                Ok(count)
            }
            Err(e) => {
                tracing::warn!("Fetch from {} failed: {}", self.source.describe(), e);
                state.last_error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Reserve a spot locally, then publish the new occupancy.
    ///
    /// A failed publish is not rolled back; the next refresh reconciles.
    pub async fn check_in(&self, id: ShelterId) -> Result<CheckInOutcome> {
        let (receipt, updated) = {
            let mut state = self.state.write().await;
            let receipt = state.tracker.check_in(id)?;
            let updated = state
                .tracker
                .get(id)
                .cloned()
                .ok_or(refuge_core::Error::ShelterNotFound(id))?;
            (receipt, updated)
        };
        tracing::info!(
            "Checked in to shelter {} ({}/{})",
            id,
            receipt.occupancy,
            receipt.capacity
        );

        let synced = match self.source.push_occupancy(&updated).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Could not publish check-in for shelter {}: {}", id, e);
                false
            }
        };

        Ok(CheckInOutcome { receipt, synced })
    }

    /// Switch views, loading data first if the target needs it.
    pub async fn navigate(&self, target: View) -> Navigation {
        let navigation = {
            let mut state = self.state.write().await;
            let loaded = state.tracker.is_loaded();
            state.view.navigate(target, loaded)
        };

        if navigation.needs_refresh {
            // failure is already recorded in the session
            let _ = self.refresh_now().await;
        }
        navigation
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read().await;
        SessionSnapshot {
            view: state.view.current(),
            shelters: state.tracker.shelters().to_vec(),
            totals: state.tracker.totals(),
            generation: state.tracker.generation(),
            loading: self.in_flight.load(Ordering::SeqCst) > 0,
            last_error: state.last_error.clone(),
        }
    }

    /// Start background polling.
    pub fn start_polling(&self, period: Duration) -> RefreshHandle {
        tracing::info!("Polling {} every {:?}", self.source.describe(), period);
        RefreshHandle::spawn(self.clone(), period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::fake::ScriptedSource;
    use refuge_core::mock_shelters;

    fn session_with(source: &Arc<ScriptedSource>) -> ShelterSession {
        ShelterSession::new(source.clone())
    }

    #[tokio::test]
    async fn refresh_loads_snapshot() {
        let source = Arc::new(ScriptedSource::new(mock_shelters()));
        let session = session_with(&source);

        assert_eq!(session.refresh_now().await.unwrap(), 4);
        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.generation, 1);
        assert_eq!(snapshot.totals.capacity, 250);
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_snapshot() {
        let source = Arc::new(ScriptedSource::new(mock_shelters()));
        let session = session_with(&source);
        session.refresh_now().await.unwrap();

        source.queue(Err(Error::InvalidInput("boom".into())));
        let err = session.refresh_now().await.unwrap_err();
        assert!(matches!(err, Error::FetchFailed(_)));

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.shelters, mock_shelters());
        assert_eq!(snapshot.generation, 1);
        assert!(snapshot.last_error.unwrap().starts_with("Could not load"));
    }

    #[tokio::test]
    async fn check_in_pushes_updated_record() {
        let source = Arc::new(ScriptedSource::new(mock_shelters()));
        let session = session_with(&source);
        session.refresh_now().await.unwrap();

        let outcome = session.check_in(1).await.unwrap();
        assert!(outcome.synced);
        assert_eq!(outcome.receipt.occupancy, 76);
        assert_eq!(outcome.receipt.available_spots, 24);

        let pushed = source.pushed();
        assert_eq!(pushed.len(), 1);
        assert_eq!(pushed[0].occupancy(), 76);
    }

    #[tokio::test]
    async fn push_failure_keeps_local_check_in() {
        let source = Arc::new(ScriptedSource::new(mock_shelters()));
        source.fail_pushes(true);
        let session = session_with(&source);
        session.refresh_now().await.unwrap();

        let outcome = session.check_in(2).await.unwrap();
        assert!(!outcome.synced);

        let snapshot = session.snapshot().await;
        let shelter = snapshot.shelters.iter().find(|s| s.id == 2).unwrap();
        assert_eq!(shelter.occupancy(), 49);
    }

    #[tokio::test]
    async fn full_shelter_rejected_without_push() {
        let source = Arc::new(ScriptedSource::new(mock_shelters()));
        let session = session_with(&source);
        session.refresh_now().await.unwrap();

        let err = session.check_in(3).await.unwrap_err();
        assert!(matches!(err, Error::Core(refuge_core::Error::ShelterFull(3))));
        assert!(source.pushed().is_empty());
    }

    #[tokio::test]
    async fn refresh_overwrites_local_check_in() {
        let source = Arc::new(ScriptedSource::new(mock_shelters()));
        let session = session_with(&source);
        session.refresh_now().await.unwrap();
        source.fail_pushes(true);

        session.check_in(1).await.unwrap();
        session.refresh_now().await.unwrap();

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.shelters[0].occupancy(), 75);
    }

    #[tokio::test]
    async fn loading_stays_set_while_any_refresh_runs() {
        let source = Arc::new(ScriptedSource::new(mock_shelters()));
        let gate = Arc::new(tokio::sync::Notify::new());
        source.hold_fetches(Some(gate.clone()));
        let session = session_with(&source);

        let slow = tokio::spawn({
            let session = session.clone();
            async move { session.refresh_now().await }
        });
        while source.fetches() < 1 {
            tokio::task::yield_now().await;
        }

        source.hold_fetches(None);
        session.refresh_now().await.unwrap();
        assert!(session.snapshot().await.loading);

        gate.notify_one();
        slow.await.unwrap().unwrap();
        assert!(!session.snapshot().await.loading);
    }

    #[tokio::test]
    async fn cancelled_refresh_clears_loading() {
        let source = Arc::new(ScriptedSource::new(mock_shelters()));
        source.hold_fetches(Some(Arc::new(tokio::sync::Notify::new())));
        let session = session_with(&source);

        let stuck = tokio::spawn({
            let session = session.clone();
            async move { session.refresh_now().await }
        });
        while source.fetches() < 1 {
            tokio::task::yield_now().await;
        }
        assert!(session.snapshot().await.loading);

        stuck.abort();
        assert!(stuck.await.unwrap_err().is_cancelled());
        assert!(!session.snapshot().await.loading);
    }

    #[tokio::test]
    async fn navigate_loads_on_first_data_view() {
        let source = Arc::new(ScriptedSource::new(mock_shelters()));
        let session = session_with(&source);

        let map = session.navigate(View::Map).await;
        assert!(!map.needs_refresh);
        assert_eq!(source.fetches(), 0);

        let list = session.navigate(View::List).await;
        assert!(list.needs_refresh);
        assert_eq!(source.fetches(), 1);

        let dashboard = session.navigate(View::Dashboard).await;
        assert!(!dashboard.needs_refresh);
        assert_eq!(source.fetches(), 1);
        assert_eq!(session.snapshot().await.view, View::Dashboard);
    }

    #[test]
    fn config_defaults_to_simulated() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.source, SourceKind::Simulated);
        assert_eq!(config.poll_interval, SIMULATED_INTERVAL);
    }

    #[test]
    fn config_http_source() {
        let config = AppConfig::from_lookup(|key| match key {
            "REFUGE_SOURCE" => Some("http://localhost:8080/api/abrigos".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(
            config.source,
            SourceKind::Http("http://localhost:8080/api/abrigos".into())
        );
        assert_eq!(config.poll_interval, DEFAULT_INTERVAL);
        assert!(config.build_source().is_ok());
    }

    #[test]
    fn config_rejects_bad_interval() {
        for raw in ["soon", "0"] {
            let result = AppConfig::from_lookup(|key| {
                (key == "REFUGE_POLL_SECS").then(|| raw.to_string())
            });
            assert!(matches!(result, Err(Error::InvalidInput(_))));
        }
    }
}
