//! URL collection through the external search service.
//!
//! Discovered URLs are persisted into the collected-URL store per query;
//! the store, not the call return value, is the hand-off boundary the
//! dispatch stage reads from. Each URL is classified before storage so the
//! table rows already carry their platform.

use async_trait::async_trait;
use serde::Deserialize;
use sqlx::PgPool;

use leadgen_collectors::classify_url;
use leadgen_db::NewCollectedUrl;

use crate::error::PipelineError;

/// Collects result URLs for search queries.
#[async_trait]
pub trait UrlCollector: Send + Sync {
    /// Runs one query against the search service and persists the
    /// discovered URLs. Returns the number of newly stored URLs.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] when the service call or the store write
    /// fails; the caller treats this as query-scoped and continues.
    async fn collect(&self, query: &str) -> Result<usize, PipelineError>;

    /// Reads back every stored URL across all queries.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] when the store read fails.
    async fn stored_urls(&self) -> Result<Vec<String>, PipelineError>;
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    urls: Vec<String>,
}

/// Search-service-backed URL collector persisting into Postgres.
pub struct SearchApiUrlCollector {
    client: reqwest::Client,
    endpoint: String,
    pool: PgPool,
}

impl SearchApiUrlCollector {
    /// # Errors
    ///
    /// Returns [`PipelineError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        endpoint: &str,
        timeout_secs: u64,
        user_agent: &str,
        pool: PgPool,
    ) -> Result<Self, PipelineError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_owned(),
            pool,
        })
    }
}

#[async_trait]
impl UrlCollector for SearchApiUrlCollector {
    async fn collect(&self, query: &str) -> Result<usize, PipelineError> {
        let response = self
            .client
            .post(format!("{}/search", self.endpoint))
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await?
            .error_for_status()?;

        let search: SearchResponse = response.json().await?;

        let urls: Vec<NewCollectedUrl> = search
            .urls
            .into_iter()
            .map(|url| NewCollectedUrl {
                platform: classify_url(&url),
                url,
            })
            .collect();

        let stored = leadgen_db::save_collected_urls(&self.pool, query, &urls).await?;
        tracing::info!(query, discovered = urls.len(), stored, "search query collected");
        Ok(stored)
    }

    async fn stored_urls(&self) -> Result<Vec<String>, PipelineError> {
        let rows = leadgen_db::list_collected_urls(&self.pool).await?;
        Ok(rows.into_iter().map(|row| row.url).collect())
    }
}
