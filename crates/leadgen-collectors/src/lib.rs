//! Collector boundary: raw per-platform lead records, the HTTP collector
//! client, the URL router, the decoy-page gate, and the per-source
//! transformers that produce the canonical unified schema.

mod client;
mod decoy;
mod error;
mod raw;
mod retry;
mod router;
mod transform;

pub use client::{Collector, HttpCollector, BROWSER_FALLBACK_UA};
pub use decoy::{is_decoy, strip_decoys, DecoyGate, ScreenOutcome, SkippedDecoy};
pub use error::CollectorError;
pub use raw::{
    CollectorOutput, CollectorSummary, FailedUrl, InstagramRaw, LinkedInRaw, RawLead, WebContactInfo,
    WebRaw, YouTubeRaw,
};
pub use router::{classify_url, classify_urls, ClassifiedUrlSet};
pub use transform::{transform, TransformError};
