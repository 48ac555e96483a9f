//! Participation Tracker
//!
//! Command line entry point

use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use participation_tracker::{
    config::Settings,
    database::{create_pool, health_check, run_migrations, DatabaseService},
    models::SortKey,
    reports::WinnerCategory,
    state::{ControllerOptions, Notice, StudentListController},
    utils::logging,
};

#[derive(Parser, Debug)]
#[command(name = "participation-tracker", version)]
#[command(about = "Student participation points, reports and prize winners")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply pending database migrations
    Migrate,
    /// Print the student list
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum, default_value = "alphabetical")]
        sort: SortArg,
        #[arg(long)]
        json: bool,
    },
    /// Write the points report CSV
    Report,
    /// Pick prize winners and write the winners CSV
    Winners {
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SortArg {
    Alphabetical,
    Points,
}

impl From<SortArg> for SortKey {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Alphabetical => SortKey::Alphabetical,
            SortArg::Points => SortKey::Points,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::new().context("loading configuration")?;
    settings.validate()?;

    // Initialize logging; the guard flushes the log file on exit
    let _log_guard = logging::init_logging(&settings.logging)?;
    info!("Starting {}", participation_tracker::info());

    info!("Connecting to database...");
    let pool = create_pool(&settings.database).await?;
    health_check(&pool).await?;

    if let Command::Migrate = cli.command {
        run_migrations(&pool).await?;
        println!("Migrations applied");
        return Ok(());
    }

    let store = Arc::new(DatabaseService::new(pool));
    let mut options = ControllerOptions::from_settings(&settings);

    match cli.command {
        Command::Migrate => {}
        Command::List { search, sort, json } => {
            let controller = StudentListController::new(store, options);
            let mut reload = controller.on_created();
            if let Some(term) = search {
                controller.set_search_term(term);
                reload = controller.activate_search();
            }
            let sort = SortKey::from(sort);
            if sort != SortKey::default() {
                reload = controller.set_sort_key(sort);
            }
            reload.await??;

            let snapshot = controller.snapshot();
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot.students)?);
            } else {
                for student in &snapshot.students {
                    println!(
                        "{:<30} grade {:>2}  {:>5} pts",
                        student.display_name(),
                        student.grade,
                        student.points
                    );
                }
            }
            controller.on_destroyed();
        }
        Command::Report => {
            let controller = StudentListController::new(store, options);
            let path = controller.request_report().await?;
            println!("Points report written to {}", path.display());
            controller.on_destroyed();
        }
        Command::Winners { seed } => {
            if let Some(seed) = seed {
                options.rng = StdRng::seed_from_u64(seed);
            }
            let controller = StudentListController::new(store, options);
            controller.on_created().await??;

            let (result, path) = controller.request_winner_selection().await?;
            for (category, slot) in result.entries() {
                match slot {
                    Ok(winner) => println!(
                        "{}: {} ({} pts) {}",
                        category.label(),
                        winner.student.report_name(),
                        winner.student.points,
                        winner
                            .prize
                            .as_ref()
                            .map(|prize| prize.name.as_str())
                            .unwrap_or("no prize")
                    ),
                    Err(e) => println!("{}: {}", category.label(), e),
                }
            }
            if result.get(WinnerCategory::Overall).is_err() {
                warn!("No students loaded; winners report is empty");
            }
            if let Some(Notice::WinnersWritten { empty_buckets, .. }) = controller.snapshot().notice {
                if !empty_buckets.is_empty() {
                    warn!(?empty_buckets, "Some grades had no students");
                }
            }
            println!("Winners report written to {}", path.display());
            controller.on_destroyed();
        }
    }

    info!("Done");
    Ok(())
}
