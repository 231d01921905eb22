//! Per-source transformers: raw collector records into the canonical
//! unified schema.
//!
//! Each transformer resolves its fields through the reliable-value helpers
//! (ordered candidates, placeholder filtering, numeric coercion) and ends
//! with the same uniform shape: contact arrays always present, all
//! classification keys always serialized.

mod instagram;
mod linkedin;
mod web;
mod youtube;

use chrono::{DateTime, Utc};
use thiserror::Error;

use leadgen_core::{
    quality_score, CanonicalLead, Classification, Contact, Content, LeadMetadata, Platform,
    Profile,
};

use crate::raw::RawLead;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("{platform} record rejected: {reason}")]
    MissingIdentity {
        platform: Platform,
        reason: &'static str,
    },
}

/// The platform-independent sections a per-source transformer produces.
struct Sections {
    url: String,
    profile: Profile,
    contact: Contact,
    content: Content,
    classification: Classification,
}

/// Transforms one raw record into a canonical lead.
///
/// Dispatches on the record's platform tag, then stamps the lead with its
/// ingestion metadata: timestamp, provenance (collector name), the ICP the
/// run was executed for, and the completeness quality score.
///
/// # Errors
///
/// Returns [`TransformError::MissingIdentity`] when the record has no source
/// URL or carries neither a name nor any contact channel.
pub fn transform(
    raw: RawLead,
    icp_identifier: &str,
    now: DateTime<Utc>,
) -> Result<CanonicalLead, TransformError> {
    let platform = raw.platform();
    let sections = match raw {
        RawLead::Web(r) => web::unify(r)?,
        RawLead::Instagram(r) => instagram::unify(r)?,
        RawLead::Linkedin(r) => linkedin::unify(r)?,
        RawLead::Youtube(r) => youtube::unify(r)?,
    };

    let mut lead = CanonicalLead {
        url: sections.url,
        platform,
        profile: sections.profile,
        contact: sections.contact,
        content: sections.content,
        classification: sections.classification,
        metadata: LeadMetadata {
            ingested_at: now,
            quality_score: 0.0,
            provenance: platform.as_str().to_string(),
            icp_identifier: icp_identifier.to_string(),
        },
    };
    lead.metadata.quality_score = round2(quality_score(&lead));

    Ok(lead)
}

/// Two-decimal precision for the stored score.
fn round2(score: f32) -> f32 {
    (score * 100.0).round() / 100.0
}

/// A single optional value passed through the placeholder filter.
fn opt(value: Option<&str>) -> Option<String> {
    leadgen_core::first_reliable(value)
}

/// `true` when the assembled sections identify someone contactable: a name,
/// a username, a company, or a direct contact channel.
fn has_identity(sections: &Sections) -> bool {
    sections.profile.full_name.is_some()
        || sections.profile.username.is_some()
        || sections.classification.company_name.is_some()
        || !sections.contact.emails.is_empty()
        || !sections.contact.phone_numbers.is_empty()
}
