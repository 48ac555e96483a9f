//! State management module
//!
//! List controllers own their snapshot and publish it through a watch
//! channel. Presentation reads clones and calls back into the controllers
//! for user actions and lifecycle events.

pub mod event_list;
pub mod query;
pub mod sequencer;
pub mod snapshot;
pub mod student_list;

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::watch;

use crate::config::Settings;
use crate::utils::errors::{Result, TrackerError};

// Re-export commonly used state components
pub use event_list::EventListController;
pub use query::{ListQueryState, StudentQuery};
pub use sequencer::{ReloadSequencer, ReloadToken};
pub use snapshot::{EventListSnapshot, Notice, Snapshot};
pub use student_list::StudentListController;

/// Result of a reload that did not fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    Committed,
    /// Superseded by a later reload or by teardown
    Discarded,
}

/// Construction parameters shared by the list controllers
#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub output_dir: PathBuf,
    pub fetch_timeout: Duration,
    pub rng: StdRng,
}

impl ControllerOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        let rng = match settings.controller.winner_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            output_dir: settings.reports.resolve_output_dir(),
            fetch_timeout: settings.controller.fetch_timeout(),
            rng,
        }
    }
}

/// Bound a store call by `limit`
pub(crate) async fn bounded<T, F>(operation: &'static str, limit: Duration, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(TrackerError::Timeout { operation, limit }),
    }
}

/// Resolves once the controller owning `shutdown` has been torn down
pub(crate) async fn torn_down(mut shutdown: watch::Receiver<bool>) {
    loop {
        let closed = *shutdown.borrow_and_update();
        if closed {
            return;
        }
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}
