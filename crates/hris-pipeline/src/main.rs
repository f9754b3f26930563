//! `hris`: the HRIS pipeline binary.
//!
//! Reads `hris.toml` (or the path given with `--config`) layered under
//! `HRIS_*` environment variables, then runs one pipeline command:
//!
//! ```text
//! hris run                          # ingest, then reconcile
//! hris ingest | reconcile           # one stage
//! hris serve                        # JSON API over the store
//! hris query top-roles --limit 5    # one query, printed as JSON
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use hris_core::query::{self, DEFAULT_TOP_ROLES, QueryResult};
use hris_pipeline::{Alerter, PipelineConfig, stage};
use hris_store_sqlite::SqliteStore;
use serde::Serialize;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "HRIS reconciliation and metrics pipeline")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "hris.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Load the source exports into the record store.
  Ingest,
  /// Rebuild the derived relations and the anomaly audit.
  Reconcile,
  /// Ingest then reconcile, journaling each stage and alerting on failure.
  Run,
  /// Serve the query API over HTTP.
  Serve,
  /// Run one query and print the result as JSON.
  Query {
    #[command(subcommand)]
    query: QueryCommand,
  },
}

#[derive(Subcommand)]
enum QueryCommand {
  HiringMetrics,
  StatusSummary {
    /// Case-insensitive status filter.
    #[arg(long)]
    status: Option<String>,
  },
  TopRoles {
    #[arg(long, default_value_t = DEFAULT_TOP_ROLES)]
    limit: usize,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let config = PipelineConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  match cli.command {
    Command::Ingest => print_json(&stage::ingest(&config).await?),
    Command::Reconcile => print_json(&stage::reconcile(&config).await?),
    Command::Run => {
      let alerter = Alerter::new(config.alert_webhook_url.clone());
      let report = stage::run(&config, &alerter).await?;
      print_json(&report)
    }
    Command::Serve => serve(&config).await,
    Command::Query { query } => run_query(&config, query).await,
  }
}

async fn serve(config: &PipelineConfig) -> anyhow::Result<()> {
  let store = SqliteStore::open_existing(&config.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", config.store_path))?;

  let app = hris_api::api_router(Arc::new(store)).layer(TraceLayer::new_for_http());
  let address = config.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

async fn run_query(config: &PipelineConfig, command: QueryCommand) -> anyhow::Result<()> {
  let store = SqliteStore::open_existing(&config.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", config.store_path))?;

  match command {
    QueryCommand::HiringMetrics => print_listing(query::hiring_metrics(&store).await),
    QueryCommand::StatusSummary { status } => {
      let result = match status.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => query::status_summary_matching(&store, s).await,
        _ => query::status_summary(&store).await,
      };
      print_listing(result)
    }
    QueryCommand::TopRoles { limit } => print_listing(query::top_roles(&store, limit).await),
  }
}

fn print_listing<T: Serialize>(result: QueryResult<T>) -> anyhow::Result<()> {
  match result {
    Ok(listing) => print_json(&listing),
    Err(failure) => {
      print_json(&failure)?;
      Err(failure.into())
    }
  }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
  let json = serde_json::to_string_pretty(value).context("failed to serialise output")?;
  println!("{json}");
  Ok(())
}
