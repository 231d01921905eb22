//! The `run` command: one end-to-end pipeline execution.
//!
//! The command owns the run-row lifecycle (create → start → complete/fail)
//! and the report artifact on disk; the orchestrator owns everything in
//! between. Pipeline errors mark the run failed and propagate.

use std::path::Path;
use std::sync::Arc;

use sqlx::PgPool;

use leadgen_collectors::{Collector, HttpCollector};
use leadgen_core::{load_icp_profile, AppConfig, Platform};
use leadgen_db::CollectorOutcome;
use leadgen_pipeline::{
    HttpQueryGenerator, Orchestrator, PgLeadStore, PipelineSettings, RunReport,
    SearchApiUrlCollector,
};

use crate::fail_run_best_effort;

pub(crate) async fn run_pipeline(
    pool: &PgPool,
    config: &AppConfig,
    icp_path: &Path,
    collectors_arg: &str,
) -> anyhow::Result<()> {
    let selected = parse_collectors(collectors_arg)?;
    let icp = load_icp_profile(icp_path)?;

    let orchestrator = build_orchestrator(pool, config, &selected)?;

    let run = leadgen_db::create_pipeline_run(pool, "cli", &icp.identifier).await?;
    if let Err(e) = leadgen_db::start_pipeline_run(pool, run.id).await {
        fail_run_best_effort(pool, run.id, format!("{e:#}")).await;
        return Err(e.into());
    }
    tracing::info!(run_id = run.id, icp = %icp.identifier, "pipeline run started");

    let mut report = match orchestrator.run(&icp, &selected).await {
        Ok(report) => report,
        Err(err) => {
            let message = format!("{err:#}");
            fail_run_best_effort(pool, run.id, message).await;
            return Err(err.into());
        }
    };

    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let artifact = format!("reports/pipeline_report_{}_{timestamp}.json", run.id);
    report.report_artifact_path = Some(artifact.clone());
    if let Err(err) = write_report_artifact(&report, &artifact) {
        tracing::warn!(run_id = run.id, error = %err, "failed to write report artifact");
        report.report_artifact_path = None;
    }

    for (platform, collector) in &report.collectors {
        let outcome = CollectorOutcome {
            leads_collected: clamp_i32(collector.leads_collected),
            success_count: clamp_i32(collector.success_count),
            duplicate_count: clamp_i32(collector.duplicate_count),
            failure_count: clamp_i32(collector.failure_count),
            skipped_decoys: clamp_i32(collector.skipped_decoys),
        };
        leadgen_db::upsert_pipeline_run_collector(
            pool,
            run.id,
            platform,
            &collector.status,
            outcome,
            collector.error.as_deref(),
        )
        .await?;
    }

    let report_doc = serde_json::to_value(&report)?;
    if let Err(err) = leadgen_db::complete_pipeline_run(
        pool,
        run.id,
        clamp_i32(report.pipeline_metadata.queries_generated),
        clamp_i32(report.pipeline_metadata.urls_collected),
        clamp_i32(report.leads_stored()),
        &report_doc,
    )
    .await
    {
        let message = format!("{err:#}");
        fail_run_best_effort(pool, run.id, message).await;
        return Err(err.into());
    }

    println!(
        "run {} completed: {} leads stored across {}/{} collectors ({} queries, {} URLs)",
        run.id,
        report.leads_stored(),
        report.pipeline_metadata.successful_collectors,
        report.pipeline_metadata.total_collectors,
        report.pipeline_metadata.queries_generated,
        report.pipeline_metadata.urls_collected,
    );
    if let Some(path) = &report.report_artifact_path {
        println!("report written to {path}");
    }

    Ok(())
}

fn build_orchestrator(
    pool: &PgPool,
    config: &AppConfig,
    selected: &[Platform],
) -> anyhow::Result<Orchestrator> {
    let query_generator = HttpQueryGenerator::new(
        &config.completion_api_url,
        config.completion_api_key.clone(),
        config.completion_timeout_secs,
        &config.user_agent,
    )?;

    let url_collector = SearchApiUrlCollector::new(
        &config.search_api_url,
        config.request_timeout_secs,
        &config.user_agent,
        pool.clone(),
    )?;

    let mut collectors: Vec<Arc<dyn Collector>> = Vec::with_capacity(selected.len());
    for &platform in selected {
        let collector = HttpCollector::new(
            platform,
            config.collector_endpoint(platform),
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_secs,
        )?;
        collectors.push(Arc::new(collector));
    }

    Ok(Orchestrator::new(
        Box::new(query_generator),
        Box::new(url_collector),
        collectors,
        Box::new(PgLeadStore::new(pool.clone())),
        PipelineSettings::from_app_config(config),
    ))
}

/// Parses the `--collectors` argument into a deduplicated platform list,
/// preserving the order given.
fn parse_collectors(arg: &str) -> anyhow::Result<Vec<Platform>> {
    let mut selected = Vec::new();
    for part in arg.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let platform = Platform::parse(part).ok_or_else(|| {
            anyhow::anyhow!("unknown collector '{part}' (expected web, instagram, linkedin, youtube)")
        })?;
        if !selected.contains(&platform) {
            selected.push(platform);
        }
    }
    if selected.is_empty() {
        anyhow::bail!("no collectors selected");
    }
    Ok(selected)
}

fn write_report_artifact(report: &RunReport, path: &str) -> anyhow::Result<()> {
    if let Some(dir) = Path::new(path).parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(report)?)?;
    Ok(())
}

fn clamp_i32(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_collectors_accepts_aliases_and_dedupes() {
        let selected = parse_collectors("web, instagram,web_scraper,instagram").unwrap();
        assert_eq!(selected, [Platform::Web, Platform::Instagram]);
    }

    #[test]
    fn parse_collectors_rejects_unknown_platform() {
        let err = parse_collectors("web,tiktok").unwrap_err();
        assert!(err.to_string().contains("tiktok"));
    }

    #[test]
    fn parse_collectors_rejects_empty_selection() {
        assert!(parse_collectors(" , ").is_err());
    }
}
