//! The pipeline state machine.
//!
//! Stages run strictly in sequence; within collector dispatch one task per
//! collector runs under a bounded fan-out. Only the orchestrator mutates
//! run state, and only two conditions abort a run: no queries and no URLs.
//! Everything below that degrades: a failed query is skipped, a failed
//! collector becomes its own failure entry, a failed record bumps a
//! counter.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures::stream::{self, StreamExt};

use leadgen_collectors::{
    classify_urls, strip_decoys, transform, Collector, CollectorOutput, DecoyGate,
};
use leadgen_core::{AppConfig, IcpProfile, Platform};

use crate::dedup::DedupIndex;
use crate::error::{PipelineError, Stage};
use crate::querygen::{add_platform_variants, QueryGenerator};
use crate::report::{CollectorReport, PipelineMetadata, RunReport};
use crate::store::LeadStore;
use crate::urlcollect::UrlCollector;

/// Pacing and sizing knobs for one run.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// Pause between consecutive search-service queries.
    pub inter_query_delay: Duration,
    /// Pause before a flagged record's single refetch.
    pub decoy_retry_delay: Duration,
    pub web_url_cap: usize,
    pub social_url_cap: usize,
    pub max_concurrent_collectors: usize,
}

impl PipelineSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            inter_query_delay: Duration::from_millis(config.inter_query_delay_ms),
            decoy_retry_delay: Duration::from_millis(config.decoy_retry_delay_ms),
            web_url_cap: config.web_url_cap,
            social_url_cap: config.social_url_cap,
            max_concurrent_collectors: config.max_concurrent_collectors,
        }
    }

    fn url_cap(&self, platform: Platform) -> usize {
        if platform.is_social() {
            self.social_url_cap
        } else {
            self.web_url_cap
        }
    }
}

/// Drives one pipeline run across injected collaborators.
pub struct Orchestrator {
    query_generator: Box<dyn QueryGenerator>,
    url_collector: Box<dyn UrlCollector>,
    collectors: Vec<Arc<dyn Collector>>,
    store: Box<dyn LeadStore>,
    settings: PipelineSettings,
    cancel: Arc<AtomicBool>,
}

impl Orchestrator {
    #[must_use]
    pub fn new(
        query_generator: Box<dyn QueryGenerator>,
        url_collector: Box<dyn UrlCollector>,
        collectors: Vec<Arc<dyn Collector>>,
        store: Box<dyn LeadStore>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            query_generator,
            url_collector,
            collectors,
            store,
            settings,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Abort flag checked between stages. An in-flight collector call
    /// finishes before the run stops.
    #[must_use]
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    fn enter(&self, stage: Stage) -> Result<(), PipelineError> {
        if self.cancel.load(Ordering::SeqCst) {
            tracing::warn!(stage = %stage, "pipeline cancelled before stage");
            return Err(PipelineError::Cancelled);
        }
        tracing::info!(stage = %stage, "pipeline stage entered");
        Ok(())
    }

    /// Executes one full run for the given ICP and platform selection.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Fatal`] when query generation or URL
    /// collection produces nothing, [`PipelineError::Cancelled`] when the
    /// abort flag is raised between stages, and store/transport errors from
    /// run-scoped operations. Collector- and record-scoped failures do not
    /// abort; they surface as failure entries in the returned report.
    pub async fn run(
        &self,
        icp: &IcpProfile,
        selected: &[Platform],
    ) -> Result<RunReport, PipelineError> {
        let started = Instant::now();

        // Stage 1: query generation.
        self.enter(Stage::GeneratingQueries)?;
        let base = self.query_generator.generate(icp).await?;
        let queries = add_platform_variants(&base, selected);
        if queries.is_empty() {
            return Err(PipelineError::Fatal {
                stage: Stage::GeneratingQueries,
                reason: "no queries were generated".to_string(),
            });
        }
        tracing::info!(
            base = base.len(),
            total = queries.len(),
            "queries generated"
        );

        // Stage 2: URL collection, sequential with pacing.
        self.enter(Stage::CollectingUrls)?;
        for (i, query) in queries.iter().enumerate() {
            if i > 0 {
                tokio::time::sleep(self.settings.inter_query_delay).await;
            }
            if self.cancel.load(Ordering::SeqCst) {
                return Err(PipelineError::Cancelled);
            }
            match self.url_collector.collect(query).await {
                Ok(stored) => tracing::debug!(query, stored, "query collected"),
                Err(err) => {
                    tracing::warn!(query, error = %err, "query failed — skipping");
                }
            }
        }

        let urls = self.url_collector.stored_urls().await?;
        if urls.is_empty() {
            return Err(PipelineError::Fatal {
                stage: Stage::CollectingUrls,
                reason: "no URLs were collected".to_string(),
            });
        }
        let urls_collected = urls.len();
        let buckets = classify_urls(urls);

        // Stage 3: bounded collector fan-out. Every collector's failure is
        // captured in its own output; siblings are never aborted.
        self.enter(Stage::DispatchingCollectors)?;
        let jobs: Vec<(Arc<dyn Collector>, Vec<String>)> = self
            .collectors
            .iter()
            .filter(|collector| selected.contains(&collector.platform()))
            .filter_map(|collector| {
                let platform = collector.platform();
                let bucket = buckets.get(&platform)?;
                if bucket.is_empty() {
                    return None;
                }
                let cap = self.settings.url_cap(platform);
                let capped: Vec<String> = bucket.iter().take(cap).cloned().collect();
                tracing::info!(
                    platform = %platform,
                    available = bucket.len(),
                    dispatched = capped.len(),
                    "dispatching collector"
                );
                Some((Arc::clone(collector), capped))
            })
            .collect();

        let outputs: Vec<(Arc<dyn Collector>, CollectorOutput)> = stream::iter(jobs)
            .map(|(collector, bucket)| async move {
                let output = collector.collect(&bucket).await;
                (collector, output)
            })
            .buffer_unordered(self.settings.max_concurrent_collectors.max(1))
            .collect()
            .await;

        // Stage 4: unification — decoy screening, transform, dedup, store.
        self.enter(Stage::Unifying)?;
        let mut index = DedupIndex::from_keys(self.store.dedup_keys().await?);
        let gate = DecoyGate::new(self.settings.decoy_retry_delay);
        let mut collector_reports: BTreeMap<String, CollectorReport> = BTreeMap::new();

        for (collector, output) in outputs {
            let platform = collector.platform();
            let report = self
                .unify_collector_batch(&gate, &mut index, collector.as_ref(), output, icp)
                .await;
            collector_reports.insert(platform.as_str().to_string(), report);
        }

        // Stage 5: reporting, uniform shape across collectors.
        self.enter(Stage::Reporting)?;
        let successful_collectors = collector_reports
            .values()
            .filter(|r| r.status == "succeeded")
            .count();
        let report = RunReport {
            pipeline_metadata: PipelineMetadata {
                execution_time_secs: started.elapsed().as_secs_f64(),
                queries_generated: queries.len(),
                urls_collected,
                successful_collectors,
                total_collectors: collector_reports.len(),
            },
            collectors: collector_reports,
            report_artifact_path: None,
        };
        tracing::info!(
            execution_time_secs = report.pipeline_metadata.execution_time_secs,
            leads_stored = report.leads_stored(),
            successful_collectors,
            total_collectors = report.pipeline_metadata.total_collectors,
            "pipeline run completed"
        );

        Ok(report)
    }

    /// Unifies one collector's batch: decoy retry screening, the final
    /// strip pass, then transform → dedup → store per record. All failures
    /// in here are record-scoped.
    async fn unify_collector_batch(
        &self,
        gate: &DecoyGate,
        index: &mut DedupIndex,
        collector: &dyn Collector,
        output: CollectorOutput,
        icp: &IcpProfile,
    ) -> CollectorReport {
        let platform = collector.platform();

        if let Some(error) = output.error {
            tracing::warn!(platform = %platform, error, "collector failed");
            return CollectorReport::failed(error);
        }

        let leads_collected = output.data.len();
        let mut failure_count = output.summary.failed_urls.len();

        let screened = gate
            .screen(output.data, |url| async move {
                collector.refetch(&url).await
            })
            .await;
        let (records, stripped) = strip_decoys(screened.clean);
        let skipped_decoys = screened.skipped.len() + stripped;

        let mut success_count = 0_usize;
        let mut duplicate_count = 0_usize;

        for record in records {
            let lead = match transform(record, &icp.identifier, Utc::now()) {
                Ok(lead) => lead,
                Err(err) => {
                    tracing::debug!(platform = %platform, error = %err, "record rejected");
                    failure_count += 1;
                    continue;
                }
            };

            if index.check(&lead).is_duplicate() {
                duplicate_count += 1;
                continue;
            }

            match self.store.insert_lead(&lead).await {
                Ok(true) => {
                    index.admit(&lead);
                    success_count += 1;
                }
                Ok(false) => duplicate_count += 1,
                Err(err) => {
                    tracing::warn!(platform = %platform, url = %lead.url, error = %err, "lead insert failed");
                    failure_count += 1;
                }
            }
        }

        tracing::info!(
            platform = %platform,
            leads_collected,
            success_count,
            duplicate_count,
            failure_count,
            skipped_decoys,
            "collector batch unified"
        );

        CollectorReport {
            status: "succeeded".to_string(),
            leads_collected,
            success_count,
            duplicate_count,
            failure_count,
            skipped_decoys,
            error: None,
        }
    }
}
