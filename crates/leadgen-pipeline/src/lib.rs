//! Pipeline orchestration: query generation, URL collection, collector
//! dispatch, unification with deduplication, and run reporting.

mod dedup;
mod error;
mod orchestrator;
mod querygen;
mod report;
mod store;
mod urlcollect;

pub use dedup::{DedupDecision, DedupIndex, DedupMatch};
pub use error::{PipelineError, Stage};
pub use orchestrator::{Orchestrator, PipelineSettings};
pub use querygen::{add_platform_variants, HttpQueryGenerator, QueryGenerator};
pub use report::{CollectorReport, PipelineMetadata, RunReport};
pub use store::{LeadStore, PgLeadStore};
pub use urlcollect::{SearchApiUrlCollector, UrlCollector};
