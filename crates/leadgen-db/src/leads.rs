//! Database operations for the `unified_leads` table.
//!
//! Lead documents are stored as JSONB sections; the columns the dedup engine
//! and reporting queries key on are denormalized and indexed. Normalization
//! (email lowercase+trim, phone trim) happens here at write time so the
//! indexed columns always hold comparable values.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use leadgen_core::{CanonicalLead, Platform};

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `unified_leads` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UnifiedLeadRow {
    pub id: i64,
    pub public_id: Uuid,
    pub url: String,
    pub platform: String,
    pub emails: Vec<String>,
    pub phone_numbers: Vec<String>,
    pub full_name: Option<String>,
    pub company_name: Option<String>,
    pub company_type: Option<String>,
    pub profile: serde_json::Value,
    pub contact: serde_json::Value,
    pub content: serde_json::Value,
    pub classification: serde_json::Value,
    pub quality_score: f32,
    pub provenance: String,
    pub icp_identifier: String,
    pub ingested_at: DateTime<Utc>,
}

/// The dedup-relevant slice of a stored lead, used to seed the in-memory
/// index at run start.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DedupKeyRow {
    pub url: String,
    pub emails: Vec<String>,
    pub phone_numbers: Vec<String>,
    pub full_name: Option<String>,
    pub company_name: Option<String>,
    pub company_type: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PlatformCount {
    pub platform: String,
    pub count: i64,
}

#[derive(Debug, Clone)]
pub struct LeadStatistics {
    pub total: i64,
    pub with_contact_info: i64,
    pub per_platform: Vec<PlatformCount>,
    /// Counts keyed by `classification.lead_category`; uncategorized leads
    /// appear under `"unclassified"`.
    pub per_category: Vec<PlatformCount>,
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

fn normalized_emails(lead: &CanonicalLead) -> Vec<String> {
    lead.contact
        .emails
        .iter()
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

fn normalized_phones(lead: &CanonicalLead) -> Vec<String> {
    lead.contact
        .phone_numbers
        .iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Inserts a lead into the unified store.
///
/// Returns `Some(id)` for a fresh insert, `None` when a row for the same
/// `(platform, url)` already exists. Rows are immutable once stored, so the
/// conflict case does nothing rather than update.
///
/// # Errors
///
/// Returns [`DbError::Serialize`] if a document section cannot be encoded,
/// or [`DbError::Sqlx`] if the insert fails.
pub async fn insert_unified_lead(
    pool: &PgPool,
    lead: &CanonicalLead,
) -> Result<Option<i64>, DbError> {
    let public_id = Uuid::new_v4();

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO unified_leads \
             (public_id, url, platform, emails, phone_numbers, full_name, \
              company_name, company_type, profile, contact, content, \
              classification, quality_score, provenance, icp_identifier, ingested_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
         ON CONFLICT (platform, url) DO NOTHING \
         RETURNING id",
    )
    .bind(public_id)
    .bind(&lead.url)
    .bind(lead.platform.as_str())
    .bind(normalized_emails(lead))
    .bind(normalized_phones(lead))
    .bind(lead.profile.full_name.as_deref())
    .bind(lead.classification.company_name.as_deref())
    .bind(lead.classification.company_type.as_deref())
    .bind(serde_json::to_value(&lead.profile)?)
    .bind(serde_json::to_value(&lead.contact)?)
    .bind(serde_json::to_value(&lead.content)?)
    .bind(serde_json::to_value(&lead.classification)?)
    .bind(lead.metadata.quality_score)
    .bind(&lead.metadata.provenance)
    .bind(&lead.metadata.icp_identifier)
    .bind(lead.metadata.ingested_at)
    .fetch_optional(pool)
    .await?;

    Ok(id)
}

/// Loads the dedup key slice of every stored lead.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn load_dedup_keys(pool: &PgPool) -> Result<Vec<DedupKeyRow>, DbError> {
    let rows = sqlx::query_as::<_, DedupKeyRow>(
        "SELECT url, emails, phone_numbers, full_name, company_name, company_type \
         FROM unified_leads",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Finds lead ids holding the given email, matched against the normalized
/// indexed column.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_lead_ids_by_email(pool: &PgPool, email: &str) -> Result<Vec<i64>, DbError> {
    let ids = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM unified_leads WHERE $1 = ANY(emails) ORDER BY id",
    )
    .bind(email.trim().to_lowercase())
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

/// Finds lead ids holding the given phone number.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn find_lead_ids_by_phone(pool: &PgPool, phone: &str) -> Result<Vec<i64>, DbError> {
    let ids = sqlx::query_scalar::<_, i64>(
        "SELECT id FROM unified_leads WHERE $1 = ANY(phone_numbers) ORDER BY id",
    )
    .bind(phone.trim())
    .fetch_all(pool)
    .await?;

    Ok(ids)
}

/// Returns the most recent `limit` leads for one platform.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_leads_by_platform(
    pool: &PgPool,
    platform: Platform,
    limit: i64,
) -> Result<Vec<UnifiedLeadRow>, DbError> {
    let rows = sqlx::query_as::<_, UnifiedLeadRow>(
        "SELECT id, public_id, url, platform, emails, phone_numbers, full_name, \
                company_name, company_type, profile, contact, content, \
                classification, quality_score, provenance, icp_identifier, ingested_at \
         FROM unified_leads \
         WHERE platform = $1 \
         ORDER BY ingested_at DESC, id DESC \
         LIMIT $2",
    )
    .bind(platform.as_str())
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Aggregate lead counts for reporting: total, contactable, per platform,
/// and per lead category.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any of the queries fail.
pub async fn lead_statistics(pool: &PgPool) -> Result<LeadStatistics, DbError> {
    let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM unified_leads")
        .fetch_one(pool)
        .await?;

    let with_contact_info = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM unified_leads \
         WHERE cardinality(emails) > 0 OR cardinality(phone_numbers) > 0",
    )
    .fetch_one(pool)
    .await?;

    let per_platform = sqlx::query_as::<_, PlatformCount>(
        "SELECT platform, COUNT(*) AS count FROM unified_leads \
         GROUP BY platform ORDER BY count DESC, platform",
    )
    .fetch_all(pool)
    .await?;

    let per_category = sqlx::query_as::<_, PlatformCount>(
        "SELECT COALESCE(classification->>'lead_category', 'unclassified') AS platform, \
                COUNT(*) AS count \
         FROM unified_leads \
         GROUP BY 1 ORDER BY count DESC, 1",
    )
    .fetch_all(pool)
    .await?;

    Ok(LeadStatistics {
        total,
        with_contact_info,
        per_platform,
        per_category,
    })
}
