use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod report;
mod run;
mod stats;

#[derive(Debug, Parser)]
#[command(name = "leadgen-cli")]
#[command(about = "Lead generation pipeline command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Execute a full pipeline run for an ICP profile
    Run {
        /// Path to the ICP profile YAML file
        #[arg(long)]
        icp: PathBuf,

        /// Comma-separated platforms to collect from
        #[arg(long, default_value = "web,instagram,linkedin,youtube")]
        collectors: String,
    },
    /// Print the stored report for a finished pipeline run
    Report {
        #[arg(long)]
        run_id: i64,
    },
    /// List recent pipeline runs
    Runs {
        #[arg(long, default_value_t = 20)]
        limit: i64,
    },
    /// Print lead and URL store statistics
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse arguments before touching config or the database so `--help`
    // and usage errors work without an environment.
    let cli = Cli::parse();

    let config = leadgen_core::load_app_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    let pool = leadgen_db::connect_pool(
        &config.database_url,
        leadgen_db::PoolConfig::from_app_config(&config),
    )
    .await?;
    let applied = leadgen_db::run_migrations(&pool).await?;
    if applied > 0 {
        tracing::info!(applied, "applied pending migrations");
    }

    match cli.command {
        Commands::Run { icp, collectors } => {
            run::run_pipeline(&pool, &config, &icp, &collectors).await
        }
        Commands::Report { run_id } => report::show_run_report(&pool, run_id).await,
        Commands::Runs { limit } => report::list_runs(&pool, limit).await,
        Commands::Stats => stats::show_stats(&pool).await,
    }
}

/// Marks a run failed without masking the original error; a failed status
/// update only leaves the run stuck in `running`, which the log records.
pub(crate) async fn fail_run_best_effort(pool: &sqlx::PgPool, run_id: i64, message: String) {
    if let Err(err) = leadgen_db::fail_pipeline_run(pool, run_id, &message).await {
        tracing::error!(run_id, error = %err, "failed to mark pipeline run as failed");
    }
}
