//! Index-backed lead deduplication.
//!
//! The index holds normalized key sets seeded from the store at run start;
//! each candidate is checked with set lookups (no full scans) and admitted
//! keys join the index immediately so later candidates in the same batch
//! dedup against earlier ones.

use std::collections::HashSet;

use leadgen_core::CanonicalLead;
use leadgen_db::DedupKeyRow;

/// Identity key for leads without any direct contact channel:
/// `(full_name, url, company_name, company_type)`, normalized.
type CompositeKey = (String, String, String, String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DedupMatch {
    Email(String),
    Phone(String),
    Composite,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DedupDecision {
    Unique,
    Duplicate(DedupMatch),
}

impl DedupDecision {
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, DedupDecision::Duplicate(_))
    }
}

/// In-memory dedup index over normalized emails, phones, and composite keys.
///
/// The composite set is built only from records having neither emails nor
/// phones, and consulted only for candidates in the same situation — so a
/// composite match always means both sides lack direct contact info.
#[derive(Debug, Default)]
pub struct DedupIndex {
    emails: HashSet<String>,
    phones: HashSet<String>,
    composites: HashSet<CompositeKey>,
}

fn norm_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn norm_phone(phone: &str) -> String {
    phone.trim().to_string()
}

fn norm_loose(value: Option<&str>) -> String {
    value.map(|v| v.trim().to_lowercase()).unwrap_or_default()
}

fn composite_key(
    full_name: Option<&str>,
    url: &str,
    company_name: Option<&str>,
    company_type: Option<&str>,
) -> CompositeKey {
    (
        norm_loose(full_name),
        url.trim().to_string(),
        norm_loose(company_name),
        norm_loose(company_type),
    )
}

impl DedupIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the index from the store's key snapshot.
    #[must_use]
    pub fn from_keys<I>(existing: I) -> Self
    where
        I: IntoIterator<Item = DedupKeyRow>,
    {
        let mut index = Self::new();
        for row in existing {
            for email in &row.emails {
                index.emails.insert(norm_email(email));
            }
            for phone in &row.phone_numbers {
                index.phones.insert(norm_phone(phone));
            }
            if row.emails.is_empty() && row.phone_numbers.is_empty() {
                index.composites.insert(composite_key(
                    row.full_name.as_deref(),
                    &row.url,
                    row.company_name.as_deref(),
                    row.company_type.as_deref(),
                ));
            }
        }
        index
    }

    /// Checks a candidate against the index without mutating it.
    ///
    /// Precedence: email, then phone, then the composite fallback. The
    /// composite is consulted only when the candidate itself has no emails
    /// and no phone numbers.
    #[must_use]
    pub fn check(&self, lead: &CanonicalLead) -> DedupDecision {
        for email in &lead.contact.emails {
            let normalized = norm_email(email);
            if self.emails.contains(&normalized) {
                return DedupDecision::Duplicate(DedupMatch::Email(normalized));
            }
        }

        for phone in &lead.contact.phone_numbers {
            let normalized = norm_phone(phone);
            if self.phones.contains(&normalized) {
                return DedupDecision::Duplicate(DedupMatch::Phone(normalized));
            }
        }

        if lead.contact.emails.is_empty() && lead.contact.phone_numbers.is_empty() {
            let key = composite_key(
                lead.profile.full_name.as_deref(),
                &lead.url,
                lead.classification.company_name.as_deref(),
                lead.classification.company_type.as_deref(),
            );
            if self.composites.contains(&key) {
                return DedupDecision::Duplicate(DedupMatch::Composite);
            }
        }

        DedupDecision::Unique
    }

    /// Admits a candidate: inserts its keys so later candidates in the same
    /// batch deduplicate against it.
    pub fn admit(&mut self, lead: &CanonicalLead) {
        for email in &lead.contact.emails {
            self.emails.insert(norm_email(email));
        }
        for phone in &lead.contact.phone_numbers {
            self.phones.insert(norm_phone(phone));
        }
        if lead.contact.emails.is_empty() && lead.contact.phone_numbers.is_empty() {
            self.composites.insert(composite_key(
                lead.profile.full_name.as_deref(),
                &lead.url,
                lead.classification.company_name.as_deref(),
                lead.classification.company_type.as_deref(),
            ));
        }
    }
}
