//! The `report` and `runs` commands: read-only views over stored runs.

use sqlx::PgPool;

pub(crate) async fn show_run_report(pool: &PgPool, run_id: i64) -> anyhow::Result<()> {
    let run = leadgen_db::get_pipeline_run(pool, run_id).await?;
    let collectors = leadgen_db::list_pipeline_run_collectors(pool, run_id).await?;

    println!("run {} ({}) — {}", run.id, run.public_id, run.status);
    println!("  icp: {}", run.icp_identifier);
    println!("  trigger: {}", run.trigger_source);
    if let Some(started) = run.started_at {
        println!("  started: {started}");
    }
    if let Some(completed) = run.completed_at {
        println!("  completed: {completed}");
    }
    println!(
        "  queries: {}  urls: {}  leads stored: {}",
        run.queries_generated, run.urls_collected, run.leads_stored
    );
    if let Some(error) = &run.error_message {
        println!("  error: {error}");
    }

    for c in &collectors {
        println!(
            "  [{}] {} — collected {}, stored {}, duplicates {}, failures {}, decoys {}",
            c.platform,
            c.status,
            c.leads_collected,
            c.success_count,
            c.duplicate_count,
            c.failure_count,
            c.skipped_decoys
        );
        if let Some(error) = &c.error_message {
            println!("      error: {error}");
        }
    }

    if let Some(report) = &run.report {
        println!("{}", serde_json::to_string_pretty(report)?);
    }

    Ok(())
}

pub(crate) async fn list_runs(pool: &PgPool, limit: i64) -> anyhow::Result<()> {
    let runs = leadgen_db::list_pipeline_runs(pool, limit).await?;
    if runs.is_empty() {
        println!("no pipeline runs recorded");
        return Ok(());
    }

    for run in &runs {
        println!(
            "{}  {}  {:<9}  icp={}  queries={} urls={} leads={}",
            run.id,
            run.created_at.format("%Y-%m-%d %H:%M:%S"),
            run.status,
            run.icp_identifier,
            run.queries_generated,
            run.urls_collected,
            run.leads_stored
        );
    }

    Ok(())
}
