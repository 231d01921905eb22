//! Raw records as emitted by the per-platform collector services, before
//! unification.
//!
//! [`RawLead`] is a tagged sum type: adding a platform means adding a variant
//! and its transformer, and every consumer match is checked at compile time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use leadgen_core::Platform;

/// A raw lead record tagged with its origin platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "platform", rename_all = "lowercase")]
pub enum RawLead {
    Web(WebRaw),
    Instagram(InstagramRaw),
    Linkedin(LinkedInRaw),
    Youtube(YouTubeRaw),
}

impl RawLead {
    #[must_use]
    pub fn platform(&self) -> Platform {
        match self {
            RawLead::Web(_) => Platform::Web,
            RawLead::Instagram(_) => Platform::Instagram,
            RawLead::Linkedin(_) => Platform::Linkedin,
            RawLead::Youtube(_) => Platform::Youtube,
        }
    }

    /// The page URL this record was collected from, when the service
    /// reported one.
    #[must_use]
    pub fn source_url(&self) -> Option<&str> {
        match self {
            RawLead::Web(raw) => raw.source_url.as_deref(),
            RawLead::Instagram(raw) => raw.url.as_deref(),
            RawLead::Linkedin(raw) => raw.url.as_deref(),
            RawLead::Youtube(raw) => raw.url.as_deref().or(raw.channel_url.as_deref()),
        }
    }

    /// The identity-bearing text fields (names, titles, bios) the decoy
    /// gate scans for login-wall boilerplate.
    #[must_use]
    pub fn identity_texts(&self) -> Vec<&str> {
        match self {
            RawLead::Web(raw) => [raw.name.as_deref(), raw.company_name.as_deref(), raw.bio.as_deref()]
                .into_iter()
                .flatten()
                .collect(),
            RawLead::Instagram(raw) => {
                [raw.username.as_deref(), raw.full_name.as_deref(), raw.biography.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect()
            }
            RawLead::Linkedin(raw) => {
                let mut texts: Vec<&str> = Vec::new();
                for key in ["name", "headline", "about", "job_title"] {
                    for map in [&raw.extracted, &raw.json_ld, &raw.meta] {
                        if let Some(value) = map.get(key) {
                            texts.push(value);
                        }
                    }
                }
                texts
            }
            RawLead::Youtube(raw) => {
                [raw.channel_name.as_deref(), raw.description.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect()
            }
        }
    }
}

/// Raw record from the web collector service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebRaw {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub company_type: Option<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    /// Short description of what the matched page/link is about.
    #[serde(default)]
    pub link_details: Option<String>,
    /// `"lead"` or `"competitor"`.
    #[serde(default)]
    pub lead_type: Option<String>,
    #[serde(default)]
    pub contact_info: WebContactInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebContactInfo {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub facebook: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub socialmedialinks: Vec<String>,
}

/// Raw record from the Instagram collector service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstagramRaw {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub biography: Option<String>,
    #[serde(default)]
    pub followers_count: Option<String>,
    #[serde(default)]
    pub external_url: Option<String>,
    #[serde(default)]
    pub bio_links: Vec<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// Raw record from the LinkedIn collector service.
///
/// Field values arrive as three candidate maps in decreasing reliability:
/// `extracted` (DOM extraction), `json_ld` (embedded structured data), and
/// `meta` (page meta tags). The transformer resolves each canonical field
/// across the maps in that order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkedInRaw {
    #[serde(default)]
    pub url: Option<String>,
    /// `profile`, `company`, `post`, or `newsletter`.
    #[serde(default)]
    pub url_type: Option<String>,
    #[serde(default)]
    pub extracted: BTreeMap<String, String>,
    #[serde(default)]
    pub json_ld: BTreeMap<String, String>,
    #[serde(default)]
    pub meta: BTreeMap<String, String>,
}

impl LinkedInRaw {
    /// Candidate values for a field, most reliable first.
    #[must_use]
    pub fn candidates(&self, key: &str) -> Vec<&str> {
        [&self.extracted, &self.json_ld, &self.meta]
            .into_iter()
            .filter_map(|map| map.get(key).map(String::as_str))
            .collect()
    }
}

/// Raw record from the YouTube collector service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YouTubeRaw {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub channel_name: Option<String>,
    #[serde(default)]
    pub channel_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub subscriber_count: Option<String>,
    #[serde(default)]
    pub video_caption: Option<String>,
    #[serde(default)]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub links: Vec<String>,
}

// ---------------------------------------------------------------------------
// Collector output contract
// ---------------------------------------------------------------------------

/// The uniform result shape every collector returns.
///
/// A present `error` marks a collector-level failure; an absent `error`
/// means `data` (possibly empty) proceeds to transformation. Collectors
/// never panic across this boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectorOutput {
    #[serde(default)]
    pub data: Vec<RawLead>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub summary: CollectorSummary,
}

impl CollectorOutput {
    /// A collector-level failure carrying no usable data.
    #[must_use]
    pub fn failed(error: impl Into<String>, urls_requested: usize) -> Self {
        Self {
            data: Vec::new(),
            error: Some(error.into()),
            summary: CollectorSummary {
                urls_requested,
                urls_scraped: 0,
                failed_urls: Vec::new(),
            },
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectorSummary {
    #[serde(default)]
    pub urls_requested: usize,
    #[serde(default)]
    pub urls_scraped: usize,
    #[serde(default)]
    pub failed_urls: Vec<FailedUrl>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedUrl {
    pub url: String,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_lead_deserializes_by_platform_tag() {
        let json = r#"{"platform": "instagram", "username": "acmetravel", "followers_count": "1,200"}"#;
        let raw: RawLead = serde_json::from_str(json).unwrap();
        assert_eq!(raw.platform(), Platform::Instagram);
        match raw {
            RawLead::Instagram(ig) => {
                assert_eq!(ig.username.as_deref(), Some("acmetravel"));
                assert_eq!(ig.followers_count.as_deref(), Some("1,200"));
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn web_source_url_is_the_record_url() {
        let raw = RawLead::Web(WebRaw {
            source_url: Some("https://acme.example/contact".to_string()),
            ..WebRaw::default()
        });
        assert_eq!(raw.source_url(), Some("https://acme.example/contact"));
    }

    #[test]
    fn youtube_source_url_falls_back_to_channel_url() {
        let raw = RawLead::Youtube(YouTubeRaw {
            channel_url: Some("https://www.youtube.com/@acme".to_string()),
            ..YouTubeRaw::default()
        });
        assert_eq!(raw.source_url(), Some("https://www.youtube.com/@acme"));
    }

    #[test]
    fn linkedin_candidates_ordered_extracted_first() {
        let mut raw = LinkedInRaw::default();
        raw.json_ld.insert("name".to_string(), "Acme Corp".to_string());
        raw.extracted.insert("name".to_string(), "Acme".to_string());
        assert_eq!(raw.candidates("name"), ["Acme", "Acme Corp"]);
        assert!(raw.candidates("missing").is_empty());
    }

    #[test]
    fn collector_output_defaults_are_empty_success() {
        let output: CollectorOutput = serde_json::from_str("{}").unwrap();
        assert!(output.data.is_empty());
        assert!(output.error.is_none());
        assert!(output.summary.failed_urls.is_empty());
    }

    #[test]
    fn failed_output_carries_no_data() {
        let output = CollectorOutput::failed("service unreachable", 5);
        assert_eq!(output.error.as_deref(), Some("service unreachable"));
        assert_eq!(output.summary.urls_requested, 5);
        assert!(output.data.is_empty());
    }
}
