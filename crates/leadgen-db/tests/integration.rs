//! Offline unit tests for leadgen-db pool configuration and row types.
//! These tests do not require a live database connection.

use leadgen_core::{AppConfig, Environment};
use leadgen_db::{CollectorOutcome, PipelineRunRow, PoolConfig, UnifiedLeadRow};

fn make_app_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        log_level: "info".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        search_api_url: "http://localhost:8001".to_string(),
        completion_api_url: "http://localhost:8002".to_string(),
        completion_api_key: None,
        completion_timeout_secs: 20,
        web_collector_url: "http://localhost:8010".to_string(),
        instagram_collector_url: "http://localhost:8011".to_string(),
        linkedin_collector_url: "http://localhost:8012".to_string(),
        youtube_collector_url: "http://localhost:8013".to_string(),
        request_timeout_secs: 120,
        user_agent: "ua".to_string(),
        max_retries: 3,
        retry_backoff_base_secs: 5,
        inter_query_delay_ms: 2000,
        decoy_retry_delay_ms: 1000,
        web_url_cap: 10,
        social_url_cap: 5,
        max_concurrent_collectors: 4,
    }
}

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let pool_config = PoolConfig::from_app_config(&make_app_config());
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

/// Compile-time smoke test: confirm that [`PipelineRunRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn pipeline_run_row_has_expected_fields() {
    use chrono::Utc;
    use uuid::Uuid;

    let row = PipelineRunRow {
        id: 1_i64,
        public_id: Uuid::new_v4(),
        trigger_source: "cli".to_string(),
        icp_identifier: "corporate-gifting-q3".to_string(),
        status: "queued".to_string(),
        started_at: None,
        completed_at: None,
        queries_generated: 0_i32,
        urls_collected: 0_i32,
        leads_stored: 0_i32,
        error_message: None,
        report: None,
        created_at: Utc::now(),
    };

    assert_eq!(row.id, 1);
    assert_eq!(row.trigger_source, "cli");
    assert_eq!(row.icp_identifier, "corporate-gifting-q3");
    assert_eq!(row.status, "queued");
    assert!(row.started_at.is_none());
    assert!(row.report.is_none());
}

/// Compile-time smoke test for [`UnifiedLeadRow`].
#[test]
fn unified_lead_row_has_expected_fields() {
    use chrono::Utc;
    use uuid::Uuid;

    let row = UnifiedLeadRow {
        id: 42_i64,
        public_id: Uuid::new_v4(),
        url: "https://example.com/about".to_string(),
        platform: "web".to_string(),
        emails: vec!["info@example.com".to_string()],
        phone_numbers: vec![],
        full_name: Some("Acme Travel".to_string()),
        company_name: None,
        company_type: None,
        profile: serde_json::json!({}),
        contact: serde_json::json!({}),
        content: serde_json::json!({}),
        classification: serde_json::json!({}),
        quality_score: 0.25_f32,
        provenance: "web".to_string(),
        icp_identifier: "default".to_string(),
        ingested_at: Utc::now(),
    };

    assert_eq!(row.platform, "web");
    assert_eq!(row.emails.len(), 1);
    assert!(row.phone_numbers.is_empty());
}

#[test]
fn collector_outcome_defaults_to_zero_counts() {
    let outcome = CollectorOutcome::default();
    assert_eq!(outcome.leads_collected, 0);
    assert_eq!(outcome.success_count, 0);
    assert_eq!(outcome.duplicate_count, 0);
    assert_eq!(outcome.failure_count, 0);
    assert_eq!(outcome.skipped_decoys, 0);
}
