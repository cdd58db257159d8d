//! Exilence application shell.
//!
//! Provides the `exilence` binary. `start` runs the startup sequence against
//! the configured database and renders either the ready view (initial route
//! plus a store summary) or the error view. `inspect` and `migrations` are
//! diagnostics over the same database.
//!
//! The database path comes from `--db`, then `EXILENCE_DB_PATH`, then the
//! default `exilence-next.db`. Log filtering is read from `EXILENCE_LOG`.

mod render;

use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use exilence_state::{
    AppConfig, HydrationCoordinator, MigrationPlan, PersistentStoreAdapter, StartupOutcome,
    StoreName,
};

/// Exilence net worth tracker: startup and storage tools.
#[derive(Parser)]
#[command(name = "exilence", about = "Exilence startup and storage tools")]
struct Cli {
    /// Path to the database file (overrides EXILENCE_DB_PATH).
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Run startup: migrate, hydrate every store, render the result.
    Start {
        /// Print the outcome as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the raw persisted payload of one store.
    Inspect {
        /// Store name (account, customPrice, uiState, league, setting, migration).
        store: StoreName,
    },
    /// Print the migration record and the migration plan of this build.
    Migrations,
}

fn main() {
    let cli = Cli::parse();
    let config = AppConfig::from_env().with_db_path(cli.db);
    init_tracing(&config.log_filter);

    // Single-threaded: hydrations interleave at storage awaits.
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {}", e);
            process::exit(3);
        }
    };

    let exit_code = runtime.block_on(async {
        match cli.command {
            Commands::Start { json } => run_start(&config, json).await,
            Commands::Inspect { store } => run_inspect(&config, store).await,
            Commands::Migrations => run_migrations(&config).await,
        }
    });
    process::exit(exit_code);
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_storage(config: &AppConfig) -> Result<PersistentStoreAdapter, i32> {
    tracing::debug!(path = %config.db_path, "opening database");
    PersistentStoreAdapter::sqlite(&config.db_path).map_err(|e| {
        eprintln!("Error: failed to open database '{}': {}", config.db_path, e);
        3
    })
}

/// Execute the start subcommand.
///
/// Returns exit code: 0 = ready, 1 = startup failed, 3 = storage unavailable.
async fn run_start(config: &AppConfig, json: bool) -> i32 {
    let storage = match open_storage(config) {
        Ok(storage) => storage,
        Err(code) => return code,
    };

    let coordinator = HydrationCoordinator::for_storage(storage, MigrationPlan::standard());
    let outcome = coordinator.startup().await;

    if json {
        let value = render::outcome_json(&outcome);
        let text = serde_json::to_string_pretty(&value).unwrap_or_else(|e| {
            format!("{{\"error\": \"failed to serialize outcome: {}\"}}", e)
        });
        println!("{}", text);
    }

    match &outcome {
        StartupOutcome::Ready(context) => {
            if !json {
                match render::ready_view(context) {
                    Ok(view) => print!("{}", view),
                    Err(e) => {
                        eprintln!("Error: failed to render stores: {}", e);
                        return 1;
                    }
                }
            }
            0
        }
        StartupOutcome::Failed(report) => {
            if !json {
                eprint!("{}", render::error_view(report));
            }
            1
        }
    }
}

/// Execute the inspect subcommand.
async fn run_inspect(config: &AppConfig, store: StoreName) -> i32 {
    let storage = match open_storage(config) {
        Ok(storage) => storage,
        Err(code) => return code,
    };
    match storage.load(store.key()).await {
        Ok(Some(payload)) => {
            println!("{}", payload);
            0
        }
        Ok(None) => {
            println!("<empty>");
            0
        }
        Err(e) => {
            eprintln!("Error: failed to read store '{}': {}", store, e);
            3
        }
    }
}

/// Execute the migrations subcommand.
async fn run_migrations(config: &AppConfig) -> i32 {
    let storage = match open_storage(config) {
        Ok(storage) => storage,
        Err(code) => return code,
    };
    let record = match storage.load(StoreName::Migration.key()).await {
        Ok(record) => record,
        Err(e) => {
            eprintln!("Error: failed to read migration record: {}", e);
            return 3;
        }
    };
    match render::migrations_view(record.as_deref(), &MigrationPlan::standard()) {
        Ok(view) => {
            print!("{}", view);
            0
        }
        Err(e) => {
            eprintln!("Error: migration record does not parse: {}", e);
            1
        }
    }
}
