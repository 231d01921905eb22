//! Live integration tests for leadgen-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/leadgen-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use chrono::Utc;
use leadgen_core::{
    CanonicalLead, Classification, Contact, Content, LeadMetadata, Platform, Profile,
};
use leadgen_db::{
    complete_pipeline_run, create_pipeline_run, fail_pipeline_run, find_lead_ids_by_email,
    get_pipeline_run, insert_unified_lead, lead_statistics, list_collected_urls,
    list_leads_by_platform, list_pipeline_run_collectors, load_dedup_keys, save_collected_urls,
    start_pipeline_run, upsert_pipeline_run_collector, url_statistics, CollectorOutcome,
    NewCollectedUrl,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_lead(url: &str, platform: Platform) -> CanonicalLead {
    CanonicalLead {
        url: url.to_string(),
        platform,
        profile: Profile {
            full_name: Some("Acme Travel".to_string()),
            ..Profile::default()
        },
        contact: Contact::default(),
        content: Content::default(),
        classification: Classification::default(),
        metadata: LeadMetadata {
            ingested_at: Utc::now(),
            quality_score: 0.25,
            provenance: platform.as_str().to_string(),
            icp_identifier: "test-icp".to_string(),
        },
    }
}

// ---------------------------------------------------------------------------
// Section 1: Pipeline run lifecycle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn pipeline_run_lifecycle_queued_to_succeeded(pool: sqlx::PgPool) {
    let run = create_pipeline_run(&pool, "cli", "test-icp")
        .await
        .expect("create_pipeline_run failed");

    assert_eq!(run.status, "queued");
    assert!(run.started_at.is_none());
    assert!(run.completed_at.is_none());

    start_pipeline_run(&pool, run.id)
        .await
        .expect("start_pipeline_run failed");

    let report = serde_json::json!({"pipeline_metadata": {"queries_generated": 4}});
    complete_pipeline_run(&pool, run.id, 4, 12, 7, &report)
        .await
        .expect("complete_pipeline_run failed");

    let fetched = get_pipeline_run(&pool, run.id)
        .await
        .expect("get_pipeline_run failed");

    assert_eq!(fetched.status, "succeeded");
    assert!(fetched.started_at.is_some(), "started_at should be set");
    assert!(fetched.completed_at.is_some(), "completed_at should be set");
    assert_eq!(fetched.queries_generated, 4);
    assert_eq!(fetched.urls_collected, 12);
    assert_eq!(fetched.leads_stored, 7);
    assert!(fetched.report.is_some());
}

#[sqlx::test(migrations = "../../migrations")]
async fn pipeline_run_lifecycle_queued_to_failed(pool: sqlx::PgPool) {
    let run = create_pipeline_run(&pool, "cli", "test-icp")
        .await
        .expect("create_pipeline_run failed");

    start_pipeline_run(&pool, run.id)
        .await
        .expect("start_pipeline_run failed");

    fail_pipeline_run(&pool, run.id, "no URLs were collected")
        .await
        .expect("fail_pipeline_run failed");

    let fetched = get_pipeline_run(&pool, run.id)
        .await
        .expect("get_pipeline_run failed");

    assert_eq!(fetched.status, "failed");
    assert_eq!(
        fetched.error_message.as_deref(),
        Some("no URLs were collected")
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn completing_a_queued_run_is_rejected(pool: sqlx::PgPool) {
    let run = create_pipeline_run(&pool, "cli", "test-icp")
        .await
        .expect("create_pipeline_run failed");

    let report = serde_json::json!({});
    let result = complete_pipeline_run(&pool, run.id, 0, 0, 0, &report).await;
    assert!(result.is_err(), "completing a queued run should fail");
}

#[sqlx::test(migrations = "../../migrations")]
async fn collector_rows_upsert_in_place(pool: sqlx::PgPool) {
    let run = create_pipeline_run(&pool, "cli", "test-icp")
        .await
        .expect("create_pipeline_run failed");

    upsert_pipeline_run_collector(
        &pool,
        run.id,
        "instagram",
        "running",
        CollectorOutcome::default(),
        None,
    )
    .await
    .expect("initial upsert failed");

    let outcome = CollectorOutcome {
        leads_collected: 5,
        success_count: 3,
        duplicate_count: 1,
        failure_count: 1,
        skipped_decoys: 0,
    };
    upsert_pipeline_run_collector(&pool, run.id, "instagram", "succeeded", outcome, None)
        .await
        .expect("second upsert failed");

    let rows = list_pipeline_run_collectors(&pool, run.id)
        .await
        .expect("list failed");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].status, "succeeded");
    assert_eq!(rows[0].leads_collected, 5);
    assert_eq!(rows[0].success_count, 3);
    assert_eq!(rows[0].duplicate_count, 1);
}

// ---------------------------------------------------------------------------
// Section 2: Unified lead store
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn insert_normalizes_emails_for_dedup(pool: sqlx::PgPool) {
    let mut lead = make_lead("https://acme.example/contact", Platform::Web);
    lead.contact.emails.push("  Info@Acme.example ".to_string());

    let id = insert_unified_lead(&pool, &lead)
        .await
        .expect("insert failed");
    assert!(id.is_some());

    let ids = find_lead_ids_by_email(&pool, "info@acme.example")
        .await
        .expect("lookup failed");
    assert_eq!(ids.len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn duplicate_platform_url_insert_is_a_noop(pool: sqlx::PgPool) {
    let lead = make_lead("https://acme.example/about", Platform::Web);

    let first = insert_unified_lead(&pool, &lead).await.expect("insert 1");
    let second = insert_unified_lead(&pool, &lead).await.expect("insert 2");

    assert!(first.is_some());
    assert!(second.is_none(), "second insert should hit the unique index");

    let stats = lead_statistics(&pool).await.expect("stats failed");
    assert_eq!(stats.total, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn same_url_on_different_platforms_both_store(pool: sqlx::PgPool) {
    let url = "https://www.youtube.com/@acme";
    let a = insert_unified_lead(&pool, &make_lead(url, Platform::Youtube))
        .await
        .expect("insert youtube");
    let b = insert_unified_lead(&pool, &make_lead(url, Platform::Web))
        .await
        .expect("insert web");

    assert!(a.is_some());
    assert!(b.is_some());
}

#[sqlx::test(migrations = "../../migrations")]
async fn dedup_keys_cover_all_stored_leads(pool: sqlx::PgPool) {
    let mut with_email = make_lead("https://a.example", Platform::Web);
    with_email.contact.emails.push("a@a.example".to_string());
    insert_unified_lead(&pool, &with_email).await.expect("a");

    let contactless = make_lead("https://b.example", Platform::Web);
    insert_unified_lead(&pool, &contactless).await.expect("b");

    let keys = load_dedup_keys(&pool).await.expect("load_dedup_keys");
    assert_eq!(keys.len(), 2);
    assert!(keys.iter().any(|k| k.emails == ["a@a.example"]));
    assert!(keys
        .iter()
        .any(|k| k.emails.is_empty() && k.url == "https://b.example"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_leads_filters_by_platform(pool: sqlx::PgPool) {
    insert_unified_lead(&pool, &make_lead("https://a.example", Platform::Web))
        .await
        .expect("a");
    insert_unified_lead(
        &pool,
        &make_lead("https://www.instagram.com/acme", Platform::Instagram),
    )
    .await
    .expect("b");

    let web = list_leads_by_platform(&pool, Platform::Web, 10)
        .await
        .expect("list web");
    assert_eq!(web.len(), 1);
    assert_eq!(web[0].platform, "web");
}

// ---------------------------------------------------------------------------
// Section 3: Collected URLs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn save_collected_urls_lowercases_query_and_skips_known(pool: sqlx::PgPool) {
    let urls = vec![
        NewCollectedUrl {
            url: "https://acme.example".to_string(),
            platform: Platform::Web,
        },
        NewCollectedUrl {
            url: "https://www.instagram.com/acme".to_string(),
            platform: Platform::Instagram,
        },
    ];

    let stored = save_collected_urls(&pool, "Corporate Gifting Companies", &urls)
        .await
        .expect("save 1");
    assert_eq!(stored, 2);

    // Same URLs under a different query: nothing new stored.
    let stored_again = save_collected_urls(&pool, "corporate gifting companies", &urls)
        .await
        .expect("save 2");
    assert_eq!(stored_again, 0);

    let rows = list_collected_urls(&pool).await.expect("list");
    assert_eq!(rows.len(), 2);
    assert!(rows
        .iter()
        .all(|r| r.search_query == "corporate gifting companies"));

    let stats = url_statistics(&pool).await.expect("stats");
    assert_eq!(stats.total, 2);
    assert_eq!(stats.distinct_queries, 1);
}
