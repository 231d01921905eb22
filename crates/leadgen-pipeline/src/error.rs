use thiserror::Error;

/// The pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    GeneratingQueries,
    CollectingUrls,
    DispatchingCollectors,
    Unifying,
    Reporting,
}

impl Stage {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::GeneratingQueries => "generating_queries",
            Stage::CollectingUrls => "collecting_urls",
            Stage::DispatchingCollectors => "dispatching_collectors",
            Stage::Unifying => "unifying",
            Stage::Reporting => "reporting",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A stage produced nothing the rest of the run can proceed on. The
    /// only aborting error class: collector- and record-scoped failures
    /// degrade the run instead.
    #[error("pipeline failed in stage {stage}: {reason}")]
    Fatal { stage: Stage, reason: String },

    #[error("pipeline run was cancelled")]
    Cancelled,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Db(#[from] leadgen_db::DbError),
}
