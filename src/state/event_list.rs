//! Event list controller
//!
//! Same reload rules as the student list: reload on creation and on every
//! activation, and only the most recently requested reload may commit.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::sequencer::{ReloadSequencer, ReloadToken};
use super::snapshot::{EventListSnapshot, Notice};
use super::{bounded, torn_down, ReloadOutcome};
use crate::database::EventStore;
use crate::models::{Event, EventType};
use crate::utils::errors::{Result, TrackerError};
use crate::utils::logging::log_reload;

const LIST_NAME: &str = "events";

#[derive(Clone)]
pub struct EventListController {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<dyn EventStore>,
    state: watch::Sender<EventListSnapshot>,
    sequencer: ReloadSequencer,
    shutdown: watch::Sender<bool>,
    fetch_timeout: Duration,
}

/// Clears `loading` if its reload is dropped while still the latest one
struct PendingReload {
    inner: Arc<Inner>,
    token: ReloadToken,
}

impl Drop for PendingReload {
    fn drop(&mut self) {
        let token = self.token;
        let sequencer = &self.inner.sequencer;
        self.inner.state.send_if_modified(|snapshot| {
            if !snapshot.loading || !sequencer.is_current(token) {
                return false;
            }
            snapshot.loading = false;
            true
        });
    }
}

impl EventListController {
    pub fn new(store: Arc<dyn EventStore>, fetch_timeout: Duration) -> Self {
        let (state, _) = watch::channel(EventListSnapshot::default());
        let (shutdown, _) = watch::channel(false);

        Self {
            inner: Arc::new(Inner {
                store,
                state,
                sequencer: ReloadSequencer::new(),
                shutdown,
                fetch_timeout,
            }),
        }
    }

    pub fn snapshot(&self) -> EventListSnapshot {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<EventListSnapshot> {
        self.inner.state.subscribe()
    }

    /// Request a reload; ordered at call time like the student list's.
    pub fn reload(&self) -> impl Future<Output = Result<ReloadOutcome>> + Send + 'static {
        let issued = self.inner.begin_reload().map(|(token, term)| {
            let pending = PendingReload {
                inner: Arc::clone(&self.inner),
                token,
            };
            (pending, term)
        });
        let shutdown = self.inner.shutdown.subscribe();

        async move {
            let (pending, term) = issued?;
            let token = pending.token;
            tokio::select! {
                outcome = pending.inner.run_reload(token, term) => outcome,
                _ = torn_down(shutdown) => {
                    log_reload(LIST_NAME, token.value(), 0, false);
                    Ok(ReloadOutcome::Discarded)
                }
            }
        }
    }

    pub fn spawn_reload(&self) -> JoinHandle<Result<ReloadOutcome>> {
        let reload = self.reload();
        tokio::spawn(async move {
            let outcome = reload.await;
            if let Err(e) = &outcome {
                warn!(error = %e, "Event list reload failed");
            }
            outcome
        })
    }

    pub fn on_created(&self) -> JoinHandle<Result<ReloadOutcome>> {
        self.spawn_reload()
    }

    pub fn on_activated(&self) -> JoinHandle<Result<ReloadOutcome>> {
        debug!("Event list activated");
        self.spawn_reload()
    }

    pub fn on_deactivated(&self) {
        debug!("Event list deactivated");
    }

    pub fn on_destroyed(&self) {
        self.inner.shutdown.send_replace(true);
        let sequencer = &self.inner.sequencer;
        self.inner.state.send_modify(|snapshot| {
            sequencer.cancel_all();
            snapshot.loading = false;
        });
    }

    pub fn set_search_term(&self, term: impl Into<String>) {
        let term = term.into();
        self.inner.state.send_modify(|snapshot| snapshot.search_term = term);
    }

    pub fn activate_search(&self) -> JoinHandle<Result<ReloadOutcome>> {
        self.inner.state.send_modify(|snapshot| snapshot.using_search = true);
        self.spawn_reload()
    }

    pub fn clear_search(&self) -> JoinHandle<Result<ReloadOutcome>> {
        self.inner.state.send_modify(|snapshot| {
            snapshot.search_term.clear();
            snapshot.using_search = false;
        });
        self.spawn_reload()
    }

    pub fn dismiss_notice(&self) {
        self.inner.state.send_if_modified(|snapshot| snapshot.notice.take().is_some());
    }
}

impl Inner {
    /// `None` as the term means the full list
    fn begin_reload(&self) -> Result<(ReloadToken, Option<String>)> {
        if *self.shutdown.borrow() {
            return Err(TrackerError::ControllerClosed);
        }

        let mut issued = None;
        self.state.send_modify(|snapshot| {
            snapshot.loading = true;
            let term = snapshot
                .using_search
                .then(|| snapshot.search_term.clone());
            issued = Some((self.sequencer.issue(), term));
        });
        issued.ok_or(TrackerError::ControllerClosed)
    }

    async fn run_reload(&self, token: ReloadToken, term: Option<String>) -> Result<ReloadOutcome> {
        match self.fetch(term.as_deref()).await {
            Ok((events, event_types)) => {
                let rows = events.len();
                let committed = self.state.send_if_modified(|snapshot| {
                    if !self.sequencer.is_current(token) {
                        return false;
                    }
                    snapshot.events = events;
                    snapshot.event_types = event_types;
                    snapshot.loading = false;
                    snapshot.notice = None;
                    true
                });
                log_reload(LIST_NAME, token.value(), rows, committed);
                Ok(if committed {
                    ReloadOutcome::Committed
                } else {
                    ReloadOutcome::Discarded
                })
            }
            Err(e) => {
                let current = self.state.send_if_modified(|snapshot| {
                    if !self.sequencer.is_current(token) {
                        return false;
                    }
                    snapshot.loading = false;
                    snapshot.notice = Some(Notice::FetchFailed {
                        message: e.to_string(),
                    });
                    true
                });
                if current {
                    Err(e)
                } else {
                    Ok(ReloadOutcome::Discarded)
                }
            }
        }
    }

    async fn fetch(&self, term: Option<&str>) -> Result<(Vec<Event>, Vec<EventType>)> {
        let events = async {
            match term {
                Some(term) => {
                    bounded("search_events", self.fetch_timeout, self.store.search_events(term)).await
                }
                None => bounded("list_events", self.fetch_timeout, self.store.list_events()).await,
            }
        };
        let event_types = bounded(
            "list_event_types",
            self.fetch_timeout,
            self.store.list_event_types(),
        );

        tokio::try_join!(events, event_types)
    }
}
