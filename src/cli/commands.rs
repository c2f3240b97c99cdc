use crate::logging::init_logging;
use crate::registry::{build_service, routes};
use crate::runtime_config::RuntimeConfig;
use crate::server::HttpServer;
use crate::store::{Store, DEFAULT_DB_PATH};
use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

pub const DEFAULT_ADDR: &str = "0.0.0.0:8080";

/// Command-line interface for the account book service
#[derive(Parser, Debug)]
#[command(name = "account-book", version)]
#[command(about = "Personal ledger HTTP service backed by SQLite", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// The subcommand to execute; `serve` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub serve: ServeArgs,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ServeArgs {
    /// SQLite database file, created on first start
    #[arg(long, env = "ACCOUNT_BOOK_DB", default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,

    /// Address to listen on
    #[arg(long, env = "ACCOUNT_BOOK_ADDR", default_value = DEFAULT_ADDR)]
    pub addr: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the HTTP API
    Serve(ServeArgs),
    /// Create the database and tables, then exit
    InitDb {
        /// SQLite database file
        #[arg(long, env = "ACCOUNT_BOOK_DB", default_value = DEFAULT_DB_PATH)]
        db: PathBuf,
    },
    /// Print the route table
    Routes,
}

/// Parse `std::env::args` and run the selected command.
///
/// # Errors
///
/// Propagates any failure from the selected command.
pub fn run_cli() -> Result<()> {
    run(Cli::parse())
}

/// Run an already-parsed command line.
///
/// # Errors
///
/// Startup failures: logging, opening the database, binding the address.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None => serve(&cli.serve),
        Some(Commands::Serve(args)) => serve(&args),
        Some(Commands::InitDb { db }) => {
            let store = Store::open(&db)
                .with_context(|| format!("failed to initialise database {}", db.display()))?;
            println!("database ready at {}", store.path());
            Ok(())
        }
        Some(Commands::Routes) => {
            println!("GET     /health  (built-in)");
            for route in routes() {
                println!(
                    "{:<7} {}  -> {}",
                    route.method.as_str(),
                    route.path_pattern,
                    route.handler_name
                );
            }
            Ok(())
        }
    }
}

fn serve(args: &ServeArgs) -> Result<()> {
    let _log_guard = init_logging()?;

    let runtime = RuntimeConfig::from_env();
    runtime.apply();

    let store = match Store::open(&args.db) {
        Ok(store) => store,
        Err(e) => {
            error!(db = %args.db.display(), error = %e, "Failed to open database");
            let context = format!("failed to open database {}", args.db.display());
            return Err(e).context(context);
        }
    };

    let service = build_service(&store)?;
    let handle = HttpServer(service)
        .start(args.addr.as_str())
        .with_context(|| format!("failed to listen on {}", args.addr))?;
    info!(
        addr = %handle.addr(),
        db = %store.path(),
        stack_size = runtime.stack_size,
        "Account book service started"
    );

    handle
        .join()
        .map_err(|e| anyhow!("server coroutine panicked: {e:?}"))
}
