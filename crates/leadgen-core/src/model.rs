use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Origin collector of a lead. Every collected URL and every stored lead
/// belongs to exactly one platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Web,
    Instagram,
    Linkedin,
    Youtube,
}

impl Platform {
    /// All platforms, web first.
    pub const ALL: [Platform; 4] = [
        Platform::Web,
        Platform::Instagram,
        Platform::Linkedin,
        Platform::Youtube,
    ];

    /// Stable lowercase name used in URLs table rows, report keys, and
    /// platform-specific query variants.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Web => "web",
            Platform::Instagram => "instagram",
            Platform::Linkedin => "linkedin",
            Platform::Youtube => "youtube",
        }
    }

    /// Parses a platform from its stable name. Unknown names map to `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "web" | "web_scraper" | "general" => Some(Platform::Web),
            "instagram" => Some(Platform::Instagram),
            "linkedin" => Some(Platform::Linkedin),
            "youtube" => Some(Platform::Youtube),
            _ => None,
        }
    }

    /// `true` for every platform except the generic web bucket. Non-web
    /// platforms get keyword-tagged query variants and a tighter URL cap.
    #[must_use]
    pub fn is_social(self) -> bool {
        !matches!(self, Platform::Web)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A prospect record in the canonical unified schema.
///
/// Every transformer produces this shape regardless of origin platform:
/// the contact arrays are always present (possibly empty, never null) and
/// all classification keys always serialize (value or null), so downstream
/// consumers address fields by fixed path without null-checking structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalLead {
    /// Source page URL. Unique within a platform sub-collection, not
    /// globally across platforms.
    pub url: String,
    pub platform: Platform,
    pub profile: Profile,
    pub contact: Contact,
    pub content: Content,
    pub classification: Classification,
    pub metadata: LeadMetadata,
}

impl CanonicalLead {
    /// `true` when the lead has at least one email or phone number.
    #[must_use]
    pub fn has_contact_info(&self) -> bool {
        !self.contact.emails.is_empty() || !self.contact.phone_numbers.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub job_title: Option<String>,
    pub employee_count: Option<i64>,
}

/// Contact details. The four collection fields default to empty when absent
/// from serialized input and are never `Option` — the non-null invariant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(default)]
    pub phone_numbers: Vec<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub websites: Vec<String>,
    #[serde(default)]
    pub social_handles: BTreeMap<Platform, String>,
    #[serde(default)]
    pub bio_links: Vec<String>,
}

/// Platform-specific free text (post captions, channel/author names).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    pub caption: Option<String>,
    pub upload_date: Option<String>,
    pub channel_name: Option<String>,
    pub author_name: Option<String>,
}

/// Business metadata. All eleven keys are present on every lead — null
/// rather than omitted — so the stored documents are structurally uniform
/// across platforms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Classification {
    pub industry: Option<String>,
    pub revenue: Option<String>,
    pub lead_category: Option<String>,
    pub lead_sub_category: Option<String>,
    pub company_name: Option<String>,
    pub company_type: Option<String>,
    pub decision_makers: Option<String>,
    pub assigned_owner: Option<String>,
    pub product_interests: Option<String>,
    pub timeline: Option<String>,
    pub interest_level: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadMetadata {
    pub ingested_at: DateTime<Utc>,
    pub quality_score: f32,
    /// Name of the collector that produced the record.
    pub provenance: String,
    /// Identifier of the ICP the run was executed for.
    pub icp_identifier: String,
}
