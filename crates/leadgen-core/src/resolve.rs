//! Reliable-value resolution for merging per-page extraction candidates.
//!
//! Collectors often yield several candidate values for the same field
//! (structured markup, visible text, fallback heuristics). These helpers
//! pick the first usable candidate and score how complete a lead ended up.

use crate::{CanonicalLead, Contact};

/// Placeholder strings the extractors emit when a field was present in the
/// page but carried no real value.
const PLACEHOLDERS: [&str; 2] = ["NA", "N/A"];

fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || PLACEHOLDERS.iter().any(|p| trimmed.eq_ignore_ascii_case(p))
}

/// Returns the first candidate that is non-empty and not a placeholder,
/// trimmed. Candidates are tried in the order given.
#[must_use]
pub fn first_reliable<I, S>(candidates: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    candidates.into_iter().find_map(|candidate| {
        let candidate = candidate.as_ref();
        if is_placeholder(candidate) {
            None
        } else {
            Some(candidate.trim().to_string())
        }
    })
}

/// Like [`first_reliable`] but coerces the winning candidate to an integer.
///
/// Thousands separators are stripped before parsing ("1,200" parses as 1200).
/// A candidate that survives the placeholder filter but fails to parse is
/// skipped in favor of the next one. No usable candidate yields 0.
#[must_use]
pub fn first_reliable_count<I, S>(candidates: I) -> i64
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    candidates
        .into_iter()
        .find_map(|candidate| {
            let candidate = candidate.as_ref();
            if is_placeholder(candidate) {
                return None;
            }
            candidate.trim().replace(',', "").parse::<i64>().ok()
        })
        .unwrap_or(0)
}

/// Joins address components into a single comma-separated line, dropping
/// empty and placeholder parts. Returns `None` when nothing usable remains.
#[must_use]
pub fn join_address<I, S>(parts: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let joined = parts
        .into_iter()
        .filter(|part| !is_placeholder(part.as_ref()))
        .map(|part| part.as_ref().trim().to_string())
        .collect::<Vec<_>>()
        .join(", ");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

/// Fraction of signal-bearing fields that are populated, in `0.0..=1.0`.
///
/// Counts the profile name/bio/location fields and the contact channels;
/// a lead with contact info and an identity scores high, a bare URL scores
/// near zero.
#[must_use]
pub fn quality_score(lead: &CanonicalLead) -> f32 {
    let contact_filled = |c: &Contact| {
        [
            !c.emails.is_empty(),
            !c.phone_numbers.is_empty(),
            c.address.is_some(),
            !c.websites.is_empty(),
        ]
    };

    let fields = [
        lead.profile.full_name.is_some() || lead.profile.username.is_some(),
        lead.profile.bio.is_some(),
        lead.profile.location.is_some(),
        lead.classification.company_name.is_some(),
    ];

    let filled = fields
        .iter()
        .chain(contact_filled(&lead.contact).iter())
        .filter(|f| **f)
        .count();
    let total = fields.len() + 4;
    // total is a small non-zero constant; the cast is exact.
    #[allow(clippy::cast_precision_loss)]
    {
        filled as f32 / total as f32
    }
}
