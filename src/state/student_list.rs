//! Student list controller
//!
//! Owns the student list [`Snapshot`], turns user actions and lifecycle
//! events into reloads, and runs the report and winner exports.
//!
//! Reloads may overlap. Each one takes a [`ReloadToken`] when requested and
//! its result is committed only if that token is still the latest one, so a
//! slow older fetch never overwrites a newer one.

use std::future::Future;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rand::rngs::StdRng;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::query::StudentQuery;
use super::sequencer::{ReloadSequencer, ReloadToken};
use super::snapshot::{Notice, Snapshot};
use super::{bounded, torn_down, ControllerOptions, ReloadOutcome};
use crate::database::DataStore;
use crate::models::{Prize, SortKey, Student};
use crate::reports::{
    generate_report, select_winners, write_report_file, WinnerResult, POINTS_REPORT_PREFIX,
    WINNERS_REPORT_PREFIX,
};
use crate::utils::errors::{Result, TrackerError};
use crate::utils::logging::log_reload;

const LIST_NAME: &str = "students";

#[derive(Clone)]
pub struct StudentListController {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<dyn DataStore>,
    state: watch::Sender<Snapshot>,
    sequencer: ReloadSequencer,
    shutdown: watch::Sender<bool>,
    rng: Mutex<StdRng>,
    /// Exports still running; only mutated under a snapshot write
    exports: AtomicUsize,
    output_dir: PathBuf,
    fetch_timeout: Duration,
}

/// Owns one issued reload token.
///
/// Dropping it while its token is still current clears `loading`, so a
/// reload future dropped before settling does not leave the list stuck.
struct PendingReload {
    inner: Arc<Inner>,
    token: ReloadToken,
}

impl Drop for PendingReload {
    fn drop(&mut self) {
        let token = self.token;
        let inner = &self.inner;
        let cleared = inner.state.send_if_modified(|snapshot| {
            if !snapshot.loading || !inner.sequencer.is_current(token) {
                return false;
            }
            snapshot.loading = false;
            true
        });
        if cleared {
            debug!(token = token.value(), "Abandoned reload cleared loading");
        }
    }
}

/// Keeps the snapshot's `exporting` flag raised until every running export
/// has finished.
struct ExportGuard<'a> {
    inner: &'a Inner,
    notice: Option<Notice>,
}

impl ExportGuard<'_> {
    fn finish(mut self, notice: Notice) {
        if notice.is_failure() {
            warn!(notice = ?notice, "Export failed");
        }
        self.notice = Some(notice);
    }
}

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        let notice = self.notice.take();
        let exports = &self.inner.exports;
        self.inner.state.send_modify(|snapshot| {
            let remaining = exports.fetch_sub(1, Ordering::SeqCst) - 1;
            snapshot.exporting = remaining > 0;
            if let Some(notice) = notice {
                snapshot.notice = Some(notice);
            }
        });
    }
}

impl StudentListController {
    pub fn new(store: Arc<dyn DataStore>, options: ControllerOptions) -> Self {
        let (state, _) = watch::channel(Snapshot::default());
        let (shutdown, _) = watch::channel(false);

        Self {
            inner: Arc::new(Inner {
                store,
                state,
                sequencer: ReloadSequencer::new(),
                shutdown,
                rng: Mutex::new(options.rng),
                exports: AtomicUsize::new(0),
                output_dir: options.output_dir,
                fetch_timeout: options.fetch_timeout,
            }),
        }
    }

    /// Clone of the current snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.inner.state.subscribe()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    pub fn output_dir(&self) -> &std::path::Path {
        &self.inner.output_dir
    }

    /// Request a reload.
    ///
    /// The request is ordered when this is called, not when the returned
    /// future is first polled. A controller that has been destroyed yields
    /// [`TrackerError::ControllerClosed`].
    pub fn reload(&self) -> impl Future<Output = Result<ReloadOutcome>> + Send + 'static {
        let issued = self.inner.begin_reload().map(|(token, query)| {
            let pending = PendingReload {
                inner: Arc::clone(&self.inner),
                token,
            };
            (pending, query)
        });
        let shutdown = self.inner.shutdown.subscribe();

        async move {
            let (pending, query) = issued?;
            let token = pending.token;
            tokio::select! {
                outcome = pending.inner.run_reload(token, query) => outcome,
                _ = torn_down(shutdown) => {
                    log_reload(LIST_NAME, token.value(), 0, false);
                    Ok(ReloadOutcome::Discarded)
                }
            }
        }
    }

    /// Reload on a background task
    pub fn spawn_reload(&self) -> JoinHandle<Result<ReloadOutcome>> {
        let reload = self.reload();
        tokio::spawn(async move {
            let outcome = reload.await;
            if let Err(e) = &outcome {
                warn!(error = %e, "Student list reload failed");
            }
            outcome
        })
    }

    pub fn on_created(&self) -> JoinHandle<Result<ReloadOutcome>> {
        info!("Student list created");
        self.spawn_reload()
    }

    /// The view is visible again; pick up edits made elsewhere.
    pub fn on_activated(&self) -> JoinHandle<Result<ReloadOutcome>> {
        debug!("Student list activated");
        self.spawn_reload()
    }

    /// Suspension only; in-flight reloads keep running.
    pub fn on_deactivated(&self) {
        debug!("Student list deactivated");
    }

    /// Tear down: cancel in-flight reloads and refuse new ones
    pub fn on_destroyed(&self) {
        self.inner.shutdown.send_replace(true);
        let sequencer = &self.inner.sequencer;
        self.inner.state.send_modify(|snapshot| {
            sequencer.cancel_all();
            snapshot.loading = false;
        });
        info!("Student list destroyed");
    }

    pub fn set_search_term(&self, term: impl Into<String>) {
        let term = term.into();
        self.inner.state.send_modify(|snapshot| {
            snapshot.query.set_search_term(term);
        });
    }

    pub fn set_sort_key(&self, key: SortKey) -> JoinHandle<Result<ReloadOutcome>> {
        self.inner.state.send_modify(|snapshot| {
            snapshot.query.set_sort_key(key);
        });
        self.spawn_reload()
    }

    pub fn activate_search(&self) -> JoinHandle<Result<ReloadOutcome>> {
        self.inner.state.send_modify(|snapshot| {
            snapshot.query.activate_search();
        });
        self.spawn_reload()
    }

    pub fn clear_search(&self) -> JoinHandle<Result<ReloadOutcome>> {
        self.inner.state.send_modify(|snapshot| {
            snapshot.query.clear_search();
        });
        self.spawn_reload()
    }

    pub fn dismiss_notice(&self) {
        self.inner.state.send_if_modified(|snapshot| snapshot.notice.take().is_some());
    }

    /// Write the points report for every student, ordered by grade.
    ///
    /// The outcome is also published as the snapshot's notice.
    pub async fn request_report(&self) -> Result<PathBuf> {
        self.inner.ensure_open()?;
        let export = self.inner.begin_export();

        let result = self.inner.write_points_report().await;
        let notice = match &result {
            Ok(path) => Notice::ReportWritten { path: path.clone() },
            Err(e) => Notice::ReportFailed {
                message: e.to_string(),
            },
        };
        export.finish(notice);
        result
    }

    /// Pick winners from the current snapshot and write the winners report
    pub async fn request_winner_selection(&self) -> Result<(WinnerResult, PathBuf)> {
        self.inner.ensure_open()?;
        let export = self.inner.begin_export();

        let Snapshot {
            students, prizes, ..
        } = self.snapshot();
        let result = self.inner.select(&students, &prizes);
        let written = write_report_file(
            self.inner.output_dir.clone(),
            WINNERS_REPORT_PREFIX,
            result.to_rows(),
        )
        .await;

        match written {
            Ok(path) => {
                export.finish(Notice::WinnersWritten {
                    path: path.clone(),
                    empty_buckets: result.empty_buckets(),
                });
                Ok((result, path))
            }
            Err(e) => {
                export.finish(Notice::ReportFailed {
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }
}

impl Inner {
    fn is_closed(&self) -> bool {
        *self.shutdown.borrow()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            Err(TrackerError::ControllerClosed)
        } else {
            Ok(())
        }
    }

    /// Issue a token and mark the list loading under one snapshot write
    fn begin_reload(&self) -> Result<(ReloadToken, StudentQuery)> {
        self.ensure_open()?;

        let mut issued = None;
        self.state.send_modify(|snapshot| {
            snapshot.loading = true;
            issued = Some((self.sequencer.issue(), snapshot.query.effective_query()));
        });
        issued.ok_or(TrackerError::ControllerClosed)
    }

    async fn run_reload(&self, token: ReloadToken, query: StudentQuery) -> Result<ReloadOutcome> {
        match self.fetch(&query).await {
            Ok((students, prizes)) => {
                let rows = students.len();
                let committed = self.commit(token, students, prizes);
                log_reload(LIST_NAME, token.value(), rows, committed);
                Ok(if committed {
                    ReloadOutcome::Committed
                } else {
                    ReloadOutcome::Discarded
                })
            }
            Err(e) => {
                if self.fail(token, &e) {
                    Err(e)
                } else {
                    debug!(token = token.value(), error = %e, "Stale reload failed");
                    Ok(ReloadOutcome::Discarded)
                }
            }
        }
    }

    async fn fetch(&self, query: &StudentQuery) -> Result<(Vec<Student>, Vec<Prize>)> {
        let students = async {
            match query {
                StudentQuery::List(order) => {
                    bounded("list_students", self.fetch_timeout, self.store.list_students(*order))
                        .await
                }
                StudentQuery::Search { term, order } => {
                    bounded(
                        "search_students",
                        self.fetch_timeout,
                        self.store.search_students(term, *order),
                    )
                    .await
                }
            }
        };
        let prizes = bounded("list_prizes", self.fetch_timeout, self.store.list_prizes());

        tokio::try_join!(students, prizes)
    }

    fn commit(&self, token: ReloadToken, students: Vec<Student>, prizes: Vec<Prize>) -> bool {
        self.state.send_if_modified(|snapshot| {
            if !self.sequencer.is_current(token) {
                return false;
            }
            snapshot.students = students;
            snapshot.prizes = prizes;
            snapshot.loading = false;
            if matches!(snapshot.notice, Some(Notice::FetchFailed { .. })) {
                snapshot.notice = None;
            }
            true
        })
    }

    /// Keep the previous data and surface the failure, if still current
    fn fail(&self, token: ReloadToken, error: &TrackerError) -> bool {
        self.state.send_if_modified(|snapshot| {
            if !self.sequencer.is_current(token) {
                return false;
            }
            snapshot.loading = false;
            snapshot.notice = Some(Notice::FetchFailed {
                message: error.to_string(),
            });
            true
        })
    }

    fn select(&self, students: &[Student], prizes: &[Prize]) -> WinnerResult {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        select_winners(students, prizes, &mut *rng)
    }

    async fn write_points_report(&self) -> Result<PathBuf> {
        let students = bounded(
            "list_students",
            self.fetch_timeout,
            self.store.list_students(SortKey::Grade),
        )
        .await?;

        write_report_file(
            self.output_dir.clone(),
            POINTS_REPORT_PREFIX,
            generate_report(&students),
        )
        .await
    }

    fn begin_export(&self) -> ExportGuard<'_> {
        self.state.send_modify(|snapshot| {
            self.exports.fetch_add(1, Ordering::SeqCst);
            snapshot.exporting = true;
        });
        ExportGuard {
            inner: self,
            notice: None,
        }
    }
}
