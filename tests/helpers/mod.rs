//! Test helpers module
//!
//! Builders for test data, the in-memory store double, the Postgres test
//! database and controller construction shared by the integration tests.

#![allow(dead_code)]

pub mod database_helper;
pub mod fake_store;
pub mod test_data;

pub use database_helper::TestDatabase;
pub use fake_store::*;
pub use test_data::*;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use participation_tracker::state::{ControllerOptions, StudentListController};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub const TEST_SEED: u64 = 20240301;

pub fn test_options(output_dir: &Path) -> ControllerOptions {
    ControllerOptions {
        output_dir: output_dir.to_path_buf(),
        fetch_timeout: Duration::from_secs(5),
        rng: StdRng::seed_from_u64(TEST_SEED),
    }
}

/// A controller over `store` writing into `output_dir`
pub fn student_controller(store: Arc<FakeStore>, output_dir: &Path) -> StudentListController {
    StudentListController::new(store, test_options(output_dir))
}
