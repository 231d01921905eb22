//! Run report types, uniform across collectors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub pipeline_metadata: PipelineMetadata,
    /// Per-collector outcomes keyed by platform name. Every dispatched
    /// collector appears here, succeeded or failed, with the same shape.
    /// Selected collectors whose URL bucket came back empty are never
    /// dispatched and are absent.
    pub collectors: BTreeMap<String, CollectorReport>,
    /// Path of the JSON report artifact, once written.
    pub report_artifact_path: Option<String>,
}

impl RunReport {
    /// Total leads stored across all collectors.
    #[must_use]
    pub fn leads_stored(&self) -> usize {
        self.collectors.values().map(|c| c.success_count).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineMetadata {
    pub execution_time_secs: f64,
    pub queries_generated: usize,
    pub urls_collected: usize,
    pub successful_collectors: usize,
    pub total_collectors: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectorReport {
    /// `succeeded` or `failed`.
    pub status: String,
    pub leads_collected: usize,
    pub success_count: usize,
    pub duplicate_count: usize,
    pub failure_count: usize,
    pub skipped_decoys: usize,
    pub error: Option<String>,
}

impl CollectorReport {
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: "failed".to_string(),
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leads_stored_sums_collector_successes() {
        let mut collectors = BTreeMap::new();
        collectors.insert(
            "web".to_string(),
            CollectorReport {
                status: "succeeded".to_string(),
                success_count: 3,
                ..CollectorReport::default()
            },
        );
        collectors.insert("instagram".to_string(), CollectorReport::failed("boom"));

        let report = RunReport {
            pipeline_metadata: PipelineMetadata {
                execution_time_secs: 1.5,
                queries_generated: 4,
                urls_collected: 12,
                successful_collectors: 1,
                total_collectors: 2,
            },
            collectors,
            report_artifact_path: None,
        };

        assert_eq!(report.leads_stored(), 3);
    }

    #[test]
    fn report_serializes_with_uniform_collector_shape() {
        let mut collectors = BTreeMap::new();
        collectors.insert("web".to_string(), CollectorReport::failed("unreachable"));

        let report = RunReport {
            pipeline_metadata: PipelineMetadata {
                execution_time_secs: 0.1,
                queries_generated: 2,
                urls_collected: 0,
                successful_collectors: 0,
                total_collectors: 1,
            },
            collectors,
            report_artifact_path: Some("reports/pipeline_report_x.json".to_string()),
        };

        let json = serde_json::to_value(&report).unwrap();
        let web = &json["collectors"]["web"];
        for key in [
            "status",
            "leads_collected",
            "success_count",
            "duplicate_count",
            "failure_count",
            "skipped_decoys",
            "error",
        ] {
            assert!(web.get(key).is_some(), "missing key {key}");
        }
    }
}
