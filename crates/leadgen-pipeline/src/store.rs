//! The unified-lead store seam.
//!
//! The orchestrator only ever sees this trait: the Postgres adapter binds
//! it to leadgen-db in production, and tests inject an in-memory double.

use async_trait::async_trait;
use sqlx::PgPool;

use leadgen_core::CanonicalLead;
use leadgen_db::DedupKeyRow;

use crate::error::PipelineError;

#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Snapshot of the dedup keys of every stored lead, taken at run start
    /// to seed the in-memory index.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] when the store read fails.
    async fn dedup_keys(&self) -> Result<Vec<DedupKeyRow>, PipelineError>;

    /// Persists one admitted lead. Returns `false` when the store already
    /// held a record for the same platform and URL.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] when the write fails; the caller treats
    /// this as record-scoped.
    async fn insert_lead(&self, lead: &CanonicalLead) -> Result<bool, PipelineError>;
}

/// Postgres-backed lead store.
pub struct PgLeadStore {
    pool: PgPool,
}

impl PgLeadStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeadStore for PgLeadStore {
    async fn dedup_keys(&self) -> Result<Vec<DedupKeyRow>, PipelineError> {
        Ok(leadgen_db::load_dedup_keys(&self.pool).await?)
    }

    async fn insert_lead(&self, lead: &CanonicalLead) -> Result<bool, PipelineError> {
        let inserted = leadgen_db::insert_unified_lead(&self.pool, lead).await?;
        Ok(inserted.is_some())
    }
}
