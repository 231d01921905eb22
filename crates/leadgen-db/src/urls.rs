//! Database operations for the `collected_urls` table.
//!
//! This table is the hand-off boundary between the search service and the
//! pipeline: URL collection persists here per query, and the dispatch stage
//! reads the whole table back rather than trusting call return values.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use leadgen_core::Platform;

use crate::DbError;

/// A row from the `collected_urls` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CollectedUrlRow {
    pub id: i64,
    pub url: String,
    pub search_query: String,
    pub platform: String,
    pub created_at: DateTime<Utc>,
}

/// A URL discovered for a query, classified before storage.
#[derive(Debug, Clone)]
pub struct NewCollectedUrl {
    pub url: String,
    pub platform: Platform,
}

#[derive(Debug, Clone)]
pub struct UrlStatistics {
    pub total: i64,
    pub distinct_queries: i64,
    pub per_platform: Vec<crate::PlatformCount>,
}

/// Stores the URLs discovered for one search query.
///
/// The query is lowercased before storage for case-insensitive matching.
/// Already-known URLs are skipped (the table is URL-unique), so re-running
/// a query is safe. Returns the number of newly stored URLs.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any insert fails.
pub async fn save_collected_urls(
    pool: &PgPool,
    search_query: &str,
    urls: &[NewCollectedUrl],
) -> Result<usize, DbError> {
    let search_query = search_query.trim().to_lowercase();
    let mut stored = 0_usize;

    for item in urls {
        let result = sqlx::query(
            "INSERT INTO collected_urls (url, search_query, platform) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (url) DO NOTHING",
        )
        .bind(&item.url)
        .bind(&search_query)
        .bind(item.platform.as_str())
        .execute(pool)
        .await?;

        stored += usize::try_from(result.rows_affected()).unwrap_or(0);
    }

    Ok(stored)
}

/// Returns every collected URL in insertion order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_collected_urls(pool: &PgPool) -> Result<Vec<CollectedUrlRow>, DbError> {
    let rows = sqlx::query_as::<_, CollectedUrlRow>(
        "SELECT id, url, search_query, platform, created_at \
         FROM collected_urls \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Aggregate URL counts for reporting.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any of the queries fail.
pub async fn url_statistics(pool: &PgPool) -> Result<UrlStatistics, DbError> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM collected_urls")
        .fetch_one(pool)
        .await?;

    let distinct_queries =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(DISTINCT search_query) FROM collected_urls")
            .fetch_one(pool)
            .await?;

    let per_platform = sqlx::query_as::<_, crate::PlatformCount>(
        "SELECT platform, COUNT(*) AS count FROM collected_urls \
         GROUP BY platform ORDER BY count DESC, platform",
    )
    .fetch_all(pool)
    .await?;

    Ok(UrlStatistics {
        total,
        distinct_queries,
        per_platform,
    })
}
