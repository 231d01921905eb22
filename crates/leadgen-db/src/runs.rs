//! Database operations for `pipeline_runs` and `pipeline_run_collectors`.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `pipeline_runs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PipelineRunRow {
    pub id: i64,
    pub public_id: Uuid,
    pub trigger_source: String,
    pub icp_identifier: String,
    pub status: String,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub queries_generated: i32,
    pub urls_collected: i32,
    pub leads_stored: i32,
    pub error_message: Option<String>,
    pub report: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// A row from the `pipeline_run_collectors` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PipelineRunCollectorRow {
    pub id: i64,
    pub pipeline_run_id: i64,
    pub platform: String,
    pub status: String,
    pub leads_collected: i32,
    pub success_count: i32,
    pub duplicate_count: i32,
    pub failure_count: i32,
    pub skipped_decoys: i32,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Per-collector counters written at the end of the unify stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectorOutcome {
    pub leads_collected: i32,
    pub success_count: i32,
    pub duplicate_count: i32,
    pub failure_count: i32,
    pub skipped_decoys: i32,
}

// ---------------------------------------------------------------------------
// pipeline_runs operations
// ---------------------------------------------------------------------------

const RUN_COLUMNS: &str = "id, public_id, trigger_source, icp_identifier, status, \
     started_at, completed_at, queries_generated, urls_collected, leads_stored, \
     error_message, report, created_at";

/// Creates a new pipeline run in `queued` status.
///
/// Generates a UUID in Rust and binds it to `public_id`. Returns the full
/// newly-created row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert or fetch fails.
pub async fn create_pipeline_run(
    pool: &PgPool,
    trigger_source: &str,
    icp_identifier: &str,
) -> Result<PipelineRunRow, DbError> {
    let public_id = Uuid::new_v4();

    let row = sqlx::query_as::<_, PipelineRunRow>(&format!(
        "INSERT INTO pipeline_runs (public_id, trigger_source, icp_identifier, status) \
         VALUES ($1, $2, $3, 'queued') \
         RETURNING {RUN_COLUMNS}"
    ))
    .bind(public_id)
    .bind(trigger_source)
    .bind(icp_identifier)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Marks a run as `running` and sets `started_at = NOW()`.
///
/// # Errors
///
/// Returns [`DbError::InvalidRunTransition`] if the run is not `queued`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn start_pipeline_run(pool: &PgPool, id: i64) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE pipeline_runs \
         SET status = 'running', started_at = NOW() \
         WHERE id = $1 AND status = 'queued'",
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidRunTransition {
            id,
            expected_status: "queued",
        });
    }

    Ok(())
}

/// Marks a run as `succeeded`, recording the stage totals and the final
/// report document.
///
/// # Errors
///
/// Returns [`DbError::InvalidRunTransition`] if the run is not `running`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn complete_pipeline_run(
    pool: &PgPool,
    id: i64,
    queries_generated: i32,
    urls_collected: i32,
    leads_stored: i32,
    report: &serde_json::Value,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE pipeline_runs \
         SET status = 'succeeded', completed_at = NOW(), \
             queries_generated = $1, urls_collected = $2, leads_stored = $3, report = $4 \
         WHERE id = $5 AND status = 'running'",
    )
    .bind(queries_generated)
    .bind(urls_collected)
    .bind(leads_stored)
    .bind(report)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidRunTransition {
            id,
            expected_status: "running",
        });
    }

    Ok(())
}

/// Marks a run as `failed`, sets `completed_at = NOW()` and `error_message`.
///
/// # Errors
///
/// Returns [`DbError::InvalidRunTransition`] if the run is not `running`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn fail_pipeline_run(pool: &PgPool, id: i64, error_message: &str) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE pipeline_runs \
         SET status = 'failed', completed_at = NOW(), error_message = $1 \
         WHERE id = $2 AND status = 'running'",
    )
    .bind(error_message)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidRunTransition {
            id,
            expected_status: "running",
        });
    }

    Ok(())
}

/// Fetches a single run by its internal `id`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row exists with the given `id`, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn get_pipeline_run(pool: &PgPool, id: i64) -> Result<PipelineRunRow, DbError> {
    let row = sqlx::query_as::<_, PipelineRunRow>(&format!(
        "SELECT {RUN_COLUMNS} FROM pipeline_runs WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Returns the most recent `limit` runs, ordered by `created_at DESC`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_pipeline_runs(pool: &PgPool, limit: i64) -> Result<Vec<PipelineRunRow>, DbError> {
    let rows = sqlx::query_as::<_, PipelineRunRow>(&format!(
        "SELECT {RUN_COLUMNS} FROM pipeline_runs \
         ORDER BY created_at DESC, id DESC \
         LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

// ---------------------------------------------------------------------------
// pipeline_run_collectors operations
// ---------------------------------------------------------------------------

/// Inserts or updates the per-collector result row for a pipeline run.
///
/// Conflicts on `(pipeline_run_id, platform)` update the status, counters,
/// and error message in place.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_pipeline_run_collector(
    pool: &PgPool,
    run_id: i64,
    platform: &str,
    status: &str,
    outcome: CollectorOutcome,
    error_message: Option<&str>,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO pipeline_run_collectors \
             (pipeline_run_id, platform, status, leads_collected, success_count, \
              duplicate_count, failure_count, skipped_decoys, error_message) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         ON CONFLICT (pipeline_run_id, platform) DO UPDATE SET \
             status          = EXCLUDED.status, \
             leads_collected = EXCLUDED.leads_collected, \
             success_count   = EXCLUDED.success_count, \
             duplicate_count = EXCLUDED.duplicate_count, \
             failure_count   = EXCLUDED.failure_count, \
             skipped_decoys  = EXCLUDED.skipped_decoys, \
             error_message   = EXCLUDED.error_message",
    )
    .bind(run_id)
    .bind(platform)
    .bind(status)
    .bind(outcome.leads_collected)
    .bind(outcome.success_count)
    .bind(outcome.duplicate_count)
    .bind(outcome.failure_count)
    .bind(outcome.skipped_decoys)
    .bind(error_message)
    .execute(pool)
    .await?;

    Ok(())
}

/// Returns all collector-level result rows for a given pipeline run.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_pipeline_run_collectors(
    pool: &PgPool,
    run_id: i64,
) -> Result<Vec<PipelineRunCollectorRow>, DbError> {
    let rows = sqlx::query_as::<_, PipelineRunCollectorRow>(
        "SELECT id, pipeline_run_id, platform, status, leads_collected, success_count, \
                duplicate_count, failure_count, skipped_decoys, error_message, created_at \
         FROM pipeline_run_collectors \
         WHERE pipeline_run_id = $1 \
         ORDER BY platform",
    )
    .bind(run_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
