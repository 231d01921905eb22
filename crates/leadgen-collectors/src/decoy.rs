//! Detection and screening of decoy pages.
//!
//! Platforms serve login walls and sign-up interstitials to non-logged-in
//! fetchers; their canned boilerplate otherwise ends up stored as lead
//! names and bios. A flagged record gets exactly one refetch with a browser
//! identity profile; records still flagged after the retry are skipped and
//! recorded, never stored.

use std::future::Future;
use std::time::Duration;

use crate::error::CollectorError;
use crate::raw::RawLead;

/// Phrases that mark a record as scraped off a login wall rather than a
/// real page. Matched case-insensitively against identity text fields.
const DECOY_PHRASES: [&str; 8] = [
    "sign up",
    "signup",
    "create account",
    "member login",
    "sign in",
    "join now",
    "million+ members",
    "manage your professional identity",
];

/// Returns `true` when any identity text field carries decoy boilerplate.
#[must_use]
pub fn is_decoy(record: &RawLead) -> bool {
    record.identity_texts().iter().any(|text| {
        let lowered = text.to_lowercase();
        DECOY_PHRASES.iter().any(|phrase| lowered.contains(phrase))
    })
}

/// A record dropped by the gate, with the reason recorded for the report.
#[derive(Debug, Clone)]
pub struct SkippedDecoy {
    pub url: String,
    pub reason: String,
}

/// Result of screening one collector's batch.
#[derive(Debug, Default)]
pub struct ScreenOutcome {
    pub clean: Vec<RawLead>,
    pub skipped: Vec<SkippedDecoy>,
}

/// Screens collected records for decoy pages, retrying flagged ones once.
pub struct DecoyGate {
    retry_delay: Duration,
}

impl DecoyGate {
    #[must_use]
    pub fn new(retry_delay: Duration) -> Self {
        Self { retry_delay }
    }

    /// Screens `records`, refetching each flagged record's URL exactly once
    /// through `refetch` (an altered-identity fetch supplied by the caller).
    ///
    /// A record that comes back clean after the retry proceeds; a record
    /// that is still flagged, has no URL to refetch, or whose refetch fails
    /// is skipped permanently.
    pub async fn screen<F, Fut>(&self, records: Vec<RawLead>, refetch: F) -> ScreenOutcome
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<Option<RawLead>, CollectorError>>,
    {
        let mut outcome = ScreenOutcome::default();

        for record in records {
            if !is_decoy(&record) {
                outcome.clean.push(record);
                continue;
            }

            let Some(url) = record.source_url().map(str::to_owned) else {
                outcome.skipped.push(SkippedDecoy {
                    url: String::new(),
                    reason: "decoy page content with no URL to refetch".to_string(),
                });
                continue;
            };

            tracing::warn!(url = %url, "decoy page detected — refetching with browser profile");
            tokio::time::sleep(self.retry_delay).await;

            match refetch(url.clone()).await {
                Ok(Some(retried)) if !is_decoy(&retried) => outcome.clean.push(retried),
                Ok(Some(_)) => outcome.skipped.push(SkippedDecoy {
                    url,
                    reason: "decoy page content after retry".to_string(),
                }),
                Ok(None) => outcome.skipped.push(SkippedDecoy {
                    url,
                    reason: "refetch produced no record".to_string(),
                }),
                Err(err) => outcome.skipped.push(SkippedDecoy {
                    url,
                    reason: format!("refetch failed: {err}"),
                }),
            }
        }

        outcome
    }
}

/// Last-resort strip pass over everything staged for admission, independent
/// of retry outcomes. Returns the surviving records and the count stripped.
#[must_use]
pub fn strip_decoys(records: Vec<RawLead>) -> (Vec<RawLead>, usize) {
    let before = records.len();
    let kept: Vec<RawLead> = records.into_iter().filter(|r| !is_decoy(r)).collect();
    let stripped = before - kept.len();
    if stripped > 0 {
        tracing::warn!(stripped, "dropped decoy records in final strip pass");
    }
    (kept, stripped)
}
