use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use servio_core::serviceman::SortKey;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

mod commands;

use commands::account::{ClientArgs, WorkerArgs};
use commands::AppContext;

#[derive(Parser)]
#[command(name = "servio")]
#[command(about = "Servio CLI - find and book servicemen from the terminal", long_about = None)]
struct Cli {
    /// Backend base URL, overrides config and SERVIO_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Config file to read instead of ~/.config/servio/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the serviceman listing with server-side filters
    Servicemen {
        /// Only servicemen of this category
        #[arg(long)]
        category: Option<u64>,
        /// Only servicemen currently available
        #[arg(long)]
        available: bool,
        /// Minimum rating (0-5)
        #[arg(long)]
        min_rating: Option<f64>,
        /// Server-side ordering: rating, jobs or experience
        #[arg(long)]
        ordering: Option<SortKey>,
        /// Free-text search over name, category, skills and bio
        #[arg(long, short)]
        query: Option<String>,
        /// Client-side sort: rating, jobs or experience
        #[arg(long, short)]
        sort: Option<SortKey>,
    },
    /// Show the servicemen of one category
    Category {
        id: u64,
        #[arg(long, short)]
        query: Option<String>,
        #[arg(long, short)]
        sort: Option<SortKey>,
    },
    /// List service categories
    Categories,
    /// Sign in
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create a client account
    RegisterClient(ClientArgs),
    /// Create a serviceman account
    RegisterWorker(WorkerArgs),
    /// Request a password reset link
    ResetPassword {
        #[arg(long)]
        email: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config warnings are emitted before the configured level is known.
    let mut ctx = tracing::subscriber::with_default(bootstrap_subscriber(std::io::stderr), || {
        AppContext::load(cli.config.as_deref())
    })?;
    ctx.apply_cli_overrides(cli.api_url);
    init_tracing(&ctx.config.logging.level);
    tracing::debug!("Using backend at {}", ctx.config.api.base_url);

    let backend = ctx.backend().context("Failed to set up the HTTP client")?;

    match cli.command {
        Commands::Servicemen {
            category,
            available,
            min_rating,
            ordering,
            query,
            sort,
        } => {
            let filters =
                commands::discovery::listing_filters(category, available, min_rating, ordering);
            commands::discovery::listing(&ctx, backend, filters, query, sort).await?
        }
        Commands::Category { id, query, sort } => {
            commands::discovery::category(&ctx, backend, id, query, sort).await?
        }
        Commands::Categories => commands::discovery::categories(backend).await?,
        Commands::Login { email, password } => {
            commands::account::login(backend, email, password).await?
        }
        Commands::RegisterClient(args) => {
            commands::account::register_client(backend, args).await?
        }
        Commands::RegisterWorker(args) => {
            commands::account::register_worker(backend, args).await?
        }
        Commands::ResetPassword { email } => {
            commands::account::reset_password(backend, email).await?
        }
    }

    Ok(())
}

/// Subscriber used while the config itself is loading. `RUST_LOG` wins,
/// otherwise warnings and errors are shown.
fn bootstrap_subscriber<W>(make_writer: W) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(make_writer)
        .with_target(false)
        .with_ansi(false)
        .finish()
}

/// Installs the fmt subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
