//! Search state shared between the prompt and the weather card.
//!
//! A new search supersedes any search still in flight: the older fetch is
//! dropped and its result, if any, never reaches the state.

use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::debug;

use crate::{WeatherQuery, WeatherRecord, provider::WeatherProvider};

/// Raw presentation state, updated as searches start and finish.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub loading: bool,
    pub record: Option<WeatherRecord>,
    pub error: Option<String>,
    pub last_city: Option<String>,
}

/// What the weather card should show right now.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Empty { city_requested: bool },
    Loading,
    Error(String),
    Weather(WeatherRecord),
}

impl SearchState {
    /// Errors take precedence over loading, which takes precedence over data.
    pub fn view(&self) -> View {
        if let Some(error) = &self.error {
            View::Error(error.clone())
        } else if self.loading {
            View::Loading
        } else if let Some(record) = &self.record {
            View::Weather(record.clone())
        } else {
            View::Empty {
                city_requested: self.last_city.is_some(),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The result (record or error) is now in the state.
    Applied,
    /// A newer search started before this one finished.
    Superseded,
    /// Blank input; nothing happened.
    Ignored,
}

#[derive(Debug)]
pub struct SearchSession {
    provider: Arc<dyn WeatherProvider>,
    state: Mutex<SearchState>,
    generation: watch::Sender<u64>,
}

impl SearchSession {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            provider,
            state: Mutex::new(SearchState::default()),
            generation,
        }
    }

    pub fn state(&self) -> SearchState {
        self.lock().clone()
    }

    pub fn view(&self) -> View {
        self.lock().view()
    }

    pub async fn search(&self, input: &str) -> SearchOutcome {
        let Ok(query) = WeatherQuery::parse(input) else {
            return SearchOutcome::Ignored;
        };

        let (current, mut superseded) = {
            let mut state = self.lock();
            state.error = None;
            state.loading = true;
            state.last_city = Some(query.city.clone());

            let mut next = 0;
            self.generation.send_modify(|generation| {
                *generation += 1;
                next = *generation;
            });
            (next, self.generation.subscribe())
        };

        let result = tokio::select! {
            result = self.provider.current_weather(&query.city) => result,
            _ = wait_for_newer(&mut superseded, current) => {
                debug!(city = %query.city, "search superseded before completion");
                return SearchOutcome::Superseded;
            }
        };

        let mut state = self.lock();
        if *self.generation.borrow() != current {
            debug!(city = %query.city, "discarding stale search result");
            return SearchOutcome::Superseded;
        }

        match result {
            Ok(record) => state.record = Some(record),
            Err(err) => {
                state.record = None;
                state.error = Some(err.to_string());
            }
        }
        state.loading = false;

        SearchOutcome::Applied
    }

    fn lock(&self) -> MutexGuard<'_, SearchState> {
        // State stays consistent even if a holder panicked mid-update.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

async fn wait_for_newer(rx: &mut watch::Receiver<u64>, current: u64) {
    loop {
        if rx.changed().await.is_err() {
            // Sender lives as long as the session; nothing newer can arrive.
            std::future::pending::<()>().await;
        }
        if *rx.borrow_and_update() != current {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{WeatherError, config::DemoReason, icon::Glyph, provider::demo::DemoProvider};
    use async_trait::async_trait;
    use std::{collections::HashMap, time::Duration};
    use tokio::sync::{mpsc, oneshot};

    type Reply = Result<WeatherRecord, WeatherError>;

    /// Test double whose lookups block until the test releases them.
    #[derive(Debug)]
    struct GatedProvider {
        gates: Mutex<HashMap<String, oneshot::Receiver<Reply>>>,
        started: mpsc::UnboundedSender<String>,
    }

    impl GatedProvider {
        fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
            let (started, started_rx) = mpsc::unbounded_channel();
            let provider = Self {
                gates: Mutex::new(HashMap::new()),
                started,
            };
            (provider, started_rx)
        }

        fn gate(&self, city: &str) -> oneshot::Sender<Reply> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().insert(city.to_string(), rx);
            tx
        }
    }

    #[async_trait]
    impl WeatherProvider for GatedProvider {
        async fn current_weather(&self, city: &str) -> Result<WeatherRecord, WeatherError> {
            let gate = self
                .gates
                .lock()
                .unwrap()
                .remove(city)
                .expect("gate registered");
            self.started.send(city.to_string()).unwrap();
            gate.await.expect("gate released")
        }
    }

    fn record(city: &str) -> WeatherRecord {
        WeatherRecord {
            city: city.to_string(),
            temperature_c: Some(10),
            humidity: Some(70.0),
            condition: "Clouds".into(),
            icon: Glyph::Cloud,
            is_demo: false,
            message: None,
        }
    }

    #[tokio::test]
    async fn initial_view_is_empty() {
        let session = SearchSession::new(Arc::new(DemoProvider::new(DemoReason::Forced)));
        assert_eq!(
            session.view(),
            View::Empty {
                city_requested: false
            }
        );
    }

    #[tokio::test]
    async fn blank_input_is_ignored() {
        let session = SearchSession::new(Arc::new(DemoProvider::new(DemoReason::Forced)));
        assert_eq!(session.search("   ").await, SearchOutcome::Ignored);
        assert_eq!(session.state(), SearchState::default());
    }

    #[tokio::test]
    async fn successful_search_shows_weather() {
        let provider = DemoProvider::new(DemoReason::Forced).with_latency(Duration::ZERO);
        let session = SearchSession::new(Arc::new(provider));

        assert_eq!(session.search("  Madrid ").await, SearchOutcome::Applied);

        match session.view() {
            View::Weather(record) => {
                assert_eq!(record.city, "Madrid");
                assert!(record.is_demo);
            }
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[tokio::test]
    async fn loading_then_error_clears_previous_record() {
        let (provider, mut started) = GatedProvider::new();
        let first = provider.gate("Paris");
        let second = provider.gate("Atlantis");
        let session = Arc::new(SearchSession::new(Arc::new(provider)));

        first.send(Ok(record("Paris"))).unwrap();
        session.search("Paris").await;
        started.recv().await.unwrap();

        let task = tokio::spawn({
            let session = Arc::clone(&session);
            async move { session.search("Atlantis").await }
        });
        started.recv().await.unwrap();

        // Old record is kept while loading, but the card shows the loading state.
        assert_eq!(session.view(), View::Loading);
        assert_eq!(
            session.state().record.map(|r| r.city),
            Some("Paris".to_string())
        );

        second
            .send(Err(WeatherError::Provider {
                status: 404,
                body: "city not found".into(),
            }))
            .unwrap();
        assert_eq!(task.await.unwrap(), SearchOutcome::Applied);

        let state = session.state();
        assert!(state.record.is_none());
        assert!(!state.loading);
        assert_eq!(session.view(), View::Error("Weather API error (404): city not found".into()));
    }

    #[tokio::test]
    async fn new_search_clears_error() {
        let (provider, mut started) = GatedProvider::new();
        provider
            .gate("Nowhere")
            .send(Err(WeatherError::EmptyCity))
            .unwrap();
        let retry = provider.gate("Oslo");
        let session = Arc::new(SearchSession::new(Arc::new(provider)));

        session.search("Nowhere").await;
        started.recv().await.unwrap();
        assert!(matches!(session.view(), View::Error(_)));

        let task = tokio::spawn({
            let session = Arc::clone(&session);
            async move { session.search("Oslo").await }
        });
        started.recv().await.unwrap();
        assert_eq!(session.view(), View::Loading);

        retry.send(Ok(record("Oslo"))).unwrap();
        task.await.unwrap();
        assert_eq!(session.view(), View::Weather(record("Oslo")));
    }

    #[tokio::test]
    async fn newer_search_wins_when_older_resolves_last() {
        let (provider, mut started) = GatedProvider::new();
        let london = provider.gate("London");
        let paris = provider.gate("Paris");
        let session = Arc::new(SearchSession::new(Arc::new(provider)));

        let first = tokio::spawn({
            let session = Arc::clone(&session);
            async move { session.search("London").await }
        });
        assert_eq!(started.recv().await.unwrap(), "London");

        let second = tokio::spawn({
            let session = Arc::clone(&session);
            async move { session.search("Paris").await }
        });
        assert_eq!(started.recv().await.unwrap(), "Paris");

        paris.send(Ok(record("Paris"))).unwrap();
        assert_eq!(second.await.unwrap(), SearchOutcome::Applied);

        // The London lookup was cancelled, so its gate may already be closed.
        let _ = london.send(Ok(record("London")));
        assert_eq!(first.await.unwrap(), SearchOutcome::Superseded);

        assert_eq!(session.view(), View::Weather(record("Paris")));
        assert_eq!(session.state().last_city.as_deref(), Some("Paris"));
    }

    #[tokio::test]
    async fn superseded_fetch_is_cancelled_in_flight() {
        let (provider, mut started) = GatedProvider::new();
        let london = provider.gate("London");
        let paris = provider.gate("Paris");
        let session = Arc::new(SearchSession::new(Arc::new(provider)));

        let first = tokio::spawn({
            let session = Arc::clone(&session);
            async move { session.search("London").await }
        });
        started.recv().await.unwrap();

        let second = tokio::spawn({
            let session = Arc::clone(&session);
            async move { session.search("Paris").await }
        });
        started.recv().await.unwrap();

        // London is never released: it can only finish by being cancelled.
        let outcome = tokio::time::timeout(Duration::from_secs(5), first)
            .await
            .expect("superseded search should return without its fetch completing")
            .unwrap();
        assert_eq!(outcome, SearchOutcome::Superseded);
        assert!(london.is_closed(), "superseded fetch should be dropped");
        assert!(london.send(Ok(record("London"))).is_err());

        paris.send(Ok(record("Paris"))).unwrap();
        assert_eq!(second.await.unwrap(), SearchOutcome::Applied);
        assert_eq!(session.view(), View::Weather(record("Paris")));
    }

    #[tokio::test]
    async fn newer_search_wins_when_older_resolves_first() {
        let (provider, mut started) = GatedProvider::new();
        let london = provider.gate("London");
        let paris = provider.gate("Paris");
        let session = Arc::new(SearchSession::new(Arc::new(provider)));

        let first = tokio::spawn({
            let session = Arc::clone(&session);
            async move { session.search("London").await }
        });
        started.recv().await.unwrap();

        let second = tokio::spawn({
            let session = Arc::clone(&session);
            async move { session.search("Paris").await }
        });
        started.recv().await.unwrap();

        let _ = london.send(Ok(record("London")));
        assert_eq!(first.await.unwrap(), SearchOutcome::Superseded);
        assert_eq!(session.view(), View::Loading);

        paris.send(Ok(record("Paris"))).unwrap();
        assert_eq!(second.await.unwrap(), SearchOutcome::Applied);
        assert_eq!(session.view(), View::Weather(record("Paris")));
    }

    #[test]
    fn view_precedence() {
        let mut state = SearchState {
            loading: true,
            record: Some(record("Lima")),
            error: Some("boom".into()),
            last_city: Some("Lima".into()),
        };
        assert_eq!(state.view(), View::Error("boom".into()));

        state.error = None;
        assert_eq!(state.view(), View::Loading);

        state.loading = false;
        assert_eq!(state.view(), View::Weather(record("Lima")));

        state.record = None;
        assert_eq!(
            state.view(),
            View::Empty {
                city_requested: true
            }
        );
    }
}
