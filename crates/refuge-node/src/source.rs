//! Where shelter snapshots come from.
//!
//! - [`HttpSource`] talks to a shelter API (`GET` the list, `PUT` one record)
//! - [`SimulatedSource`] random-walks the built-in shelters locally

use crate::error::{Error, Result};
use async_trait::async_trait;
use refuge_core::{mock_shelters, OccupancySimulator, Shelter, ShelterRecord};
use std::time::Duration;
use tokio::sync::Mutex;

/// A provider of full shelter snapshots.
#[async_trait]
pub trait ShelterSource: Send + Sync {
    /// Fetch the complete current collection.
    async fn fetch(&self) -> Result<Vec<Shelter>>;

    /// Publish a shelter's new occupancy after a local check-in.
    async fn push_occupancy(&self, shelter: &Shelter) -> Result<()>;

    /// Human-readable description for logs.
    fn describe(&self) -> String;
}

/// Convert wire records, skipping any that break the capacity invariant.
pub fn shelters_from_records(records: Vec<ShelterRecord>) -> Vec<Shelter> {
    records
        .into_iter()
        .filter_map(|record| {
            let id = record.id;
            match Shelter::try_from(record) {
                Ok(shelter) => Some(shelter),
                Err(e) => {
                    tracing::warn!("Skipping shelter {}: {}", id, e);
                    None
                }
            }
        })
        .collect()
}

/// Decode each JSON element on its own so one malformed entry does not
/// reject the rest of the snapshot.
pub fn shelters_from_json(values: Vec<serde_json::Value>) -> Vec<Shelter> {
    let records = values
        .into_iter()
        .enumerate()
        .filter_map(|(pos, value)| match serde_json::from_value::<ShelterRecord>(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping malformed shelter record #{}: {}", pos, e);
                None
            }
        })
        .collect();
    shelters_from_records(records)
}

/// Shelter API over HTTP.
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    /// `base_url` is the collection endpoint, e.g. `http://host/api/abrigos`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        reqwest::Url::parse(&base_url)
            .map_err(|e| Error::InvalidInput(format!("invalid shelter API url {base_url}: {e}")))?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ShelterSource for HttpSource {
    async fn fetch(&self) -> Result<Vec<Shelter>> {
        tracing::debug!("Fetching shelters from {}", self.base_url);
        let response = self
            .client
            .get(&self.base_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::FetchFailed(e.to_string()))?;

        let values: Vec<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| Error::FetchFailed(e.to_string()))?;

        Ok(shelters_from_json(values))
    }

    async fn push_occupancy(&self, shelter: &Shelter) -> Result<()> {
        let url = format!("{}/{}", self.base_url, shelter.id);
        self.client
            .put(&url)
            .json(&ShelterRecord::from(shelter))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("http {}", self.base_url)
    }
}

/// Offline source: the built-in shelters with random-walk occupancy.
pub struct SimulatedSource {
    inner: Mutex<SimulatedState>,
}

struct SimulatedState {
    simulator: OccupancySimulator,
    current: Vec<Shelter>,
    started: bool,
}

impl SimulatedSource {
    pub fn new(seed: u64) -> Self {
        Self::with_shelters(seed, mock_shelters())
    }

    pub fn with_shelters(seed: u64, shelters: Vec<Shelter>) -> Self {
        Self {
            inner: Mutex::new(SimulatedState {
                simulator: OccupancySimulator::new(seed),
                current: shelters,
                started: false,
            }),
        }
    }
}

#[async_trait]
impl ShelterSource for SimulatedSource {
    /// The first fetch returns the starting data; later ones walk one step.
    async fn fetch(&self) -> Result<Vec<Shelter>> {
        let mut state = self.inner.lock().await;
        if state.started {
            let SimulatedState { simulator, current, .. } = &mut *state;
            simulator.step(current);
        }
        state.started = true;
        Ok(state.current.clone())
    }

    async fn push_occupancy(&self, shelter: &Shelter) -> Result<()> {
        let mut state = self.inner.lock().await;
        match state.current.iter_mut().find(|s| s.id == shelter.id) {
            Some(existing) => {
                existing.set_occupancy(shelter.occupancy())?;
                Ok(())
            }
            None => Err(refuge_core::Error::ShelterNotFound(shelter.id).into()),
        }
    }

    fn describe(&self) -> String {
        "simulated".to_string()
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! Scripted source for session and refresh tests.

    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Notify;

    /// Replays queued fetch results; repeats the last snapshot once the queue is empty.
    #[derive(Default)]
    pub struct ScriptedSource {
        script: std::sync::Mutex<VecDeque<Result<Vec<Shelter>>>>,
        last: std::sync::Mutex<Vec<Shelter>>,
        pushed: std::sync::Mutex<Vec<Shelter>>,
        fetches: AtomicUsize,
        fail_push: AtomicBool,
        hold: std::sync::Mutex<Option<Arc<Notify>>>,
    }

    impl ScriptedSource {
        pub fn new(initial: Vec<Shelter>) -> Self {
            let source = Self::default();
            *source.last.lock().unwrap() = initial;
            source
        }

        pub fn queue(&self, result: Result<Vec<Shelter>>) {
            self.script.lock().unwrap().push_back(result);
        }

        pub fn fail_pushes(&self, fail: bool) {
            self.fail_push.store(fail, Ordering::SeqCst);
        }

        /// Make later fetches wait on `gate` before answering.
        pub fn hold_fetches(&self, gate: Option<Arc<Notify>>) {
            *self.hold.lock().unwrap() = gate;
        }

        pub fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }

        pub fn pushed(&self) -> Vec<Shelter> {
            self.pushed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ShelterSource for ScriptedSource {
        async fn fetch(&self) -> Result<Vec<Shelter>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let gate = self.hold.lock().unwrap().clone();
            if let Some(gate) = gate {
                gate.notified().await;
            }
            match self.script.lock().unwrap().pop_front() {
                Some(Ok(shelters)) => {
                    *self.last.lock().unwrap() = shelters.clone();
                    Ok(shelters)
                }
                Some(Err(e)) => Err(e),
                None => Ok(self.last.lock().unwrap().clone()),
            }
        }

        async fn push_occupancy(&self, shelter: &Shelter) -> Result<()> {
            if self.fail_push.load(Ordering::SeqCst) {
                return Err(Error::InvalidInput("push refused".into()));
            }
            self.pushed.lock().unwrap().push(shelter.clone());
            Ok(())
        }

        fn describe(&self) -> String {
            "scripted".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn simulated_first_fetch_is_seed_data() {
        let source = SimulatedSource::new(1);
        let first = source.fetch().await.unwrap();
        assert_eq!(first, mock_shelters());
    }

    #[tokio::test]
    async fn simulated_walk_stays_in_bounds() {
        let source = SimulatedSource::new(9);
        for _ in 0..50 {
            for shelter in source.fetch().await.unwrap() {
                assert!(shelter.occupancy() <= shelter.capacity());
            }
        }
    }

    #[tokio::test]
    async fn simulated_push_is_visible_next_fetch() {
        let start = vec![Shelter::new(1, "one", 100, 10).unwrap()];
        let source = SimulatedSource::with_shelters(4, start);
        let mut shelter = source.fetch().await.unwrap().remove(0);

        shelter.set_occupancy(60).unwrap();
        source.push_occupancy(&shelter).await.unwrap();

        let next = source.fetch().await.unwrap();
        assert!(next[0].occupancy().abs_diff(60) <= 2);
    }

    #[tokio::test]
    async fn simulated_push_unknown() {
        let source = SimulatedSource::with_shelters(4, Vec::new());
        let stray = Shelter::new(5, "stray", 1, 0).unwrap();
        assert!(source.push_occupancy(&stray).await.is_err());
    }

    #[test]
    fn invalid_records_are_skipped() {
        let good = ShelterRecord::from(&Shelter::new(1, "ok", 10, 2).unwrap());
        let mut bad = good.clone();
        bad.id = 2;
        bad.occupancy = 11;

        let shelters = shelters_from_records(vec![good, bad]);
        assert_eq!(shelters.len(), 1);
        assert_eq!(shelters[0].id, 1);
    }

    #[test]
    fn malformed_and_null_entries_do_not_sink_snapshot() {
        let values: Vec<serde_json::Value> = serde_json::from_str(
            r#"[
                {"id": 1, "nome": "Central", "recursos": "Água", "capacidade": 10, "ocupacao": 2},
                {"id": 2, "nome": "Norte", "recursos": null, "responsavel": null,
                 "capacidade": 5, "ocupacao": 1},
                {"id": 3, "nome": "Sul", "capacidade": null, "ocupacao": 1},
                "not a record"
            ]"#,
        )
        .unwrap();

        let ids: Vec<_> = shelters_from_json(values).iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn http_source_rejects_bad_url() {
        assert!(HttpSource::new("not a url", Duration::from_secs(1)).is_err());
        let source =
            HttpSource::new("http://localhost:8080/api/abrigos/", Duration::from_secs(1)).unwrap();
        assert_eq!(source.base_url(), "http://localhost:8080/api/abrigos");
    }
}
