//! Routes collected URLs to the collector responsible for them.

use std::collections::BTreeMap;

use leadgen_core::Platform;

/// URLs bucketed per platform, preserving input order within each bucket.
pub type ClassifiedUrlSet = BTreeMap<Platform, Vec<String>>;

/// Host suffixes owned by a non-web platform. Longest match wins so a more
/// specific entry can always be added above a broader one.
const PLATFORM_DOMAINS: [(&str, Platform); 4] = [
    ("instagram.com", Platform::Instagram),
    ("linkedin.com", Platform::Linkedin),
    ("youtube.com", Platform::Youtube),
    ("youtu.be", Platform::Youtube),
];

/// Classifies a single URL by host.
///
/// Total and deterministic: unknown hosts, bare domains on other platforms'
/// subpaths, and unparseable URLs all route to [`Platform::Web`].
#[must_use]
pub fn classify_url(url: &str) -> Platform {
    let Some(host) = host_of(url) else {
        return Platform::Web;
    };

    PLATFORM_DOMAINS
        .iter()
        .filter(|(domain, _)| host == *domain || host.ends_with(&format!(".{domain}")))
        .max_by_key(|(domain, _)| domain.len())
        .map_or(Platform::Web, |(_, platform)| *platform)
}

/// Buckets a batch of URLs per platform.
#[must_use]
pub fn classify_urls<I, S>(urls: I) -> ClassifiedUrlSet
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut buckets = ClassifiedUrlSet::new();
    for url in urls {
        let url = url.into();
        buckets.entry(classify_url(&url)).or_default().push(url);
    }
    buckets
}

fn host_of(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url.trim()).ok()?;
    parsed.host_str().map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn social_hosts_route_to_their_platform() {
        assert_eq!(
            classify_url("https://www.instagram.com/acmetravel"),
            Platform::Instagram
        );
        assert_eq!(
            classify_url("https://linkedin.com/company/acme"),
            Platform::Linkedin
        );
        assert_eq!(
            classify_url("https://www.youtube.com/watch?v=abc123"),
            Platform::Youtube
        );
        assert_eq!(classify_url("https://youtu.be/abc123"), Platform::Youtube);
    }

    #[test]
    fn subdomains_match_their_platform() {
        assert_eq!(
            classify_url("https://m.youtube.com/watch?v=abc"),
            Platform::Youtube
        );
        assert_eq!(
            classify_url("https://uk.linkedin.com/in/someone"),
            Platform::Linkedin
        );
    }

    #[test]
    fn unknown_hosts_route_to_web() {
        assert_eq!(classify_url("https://acme.example/contact"), Platform::Web);
        assert_eq!(classify_url("https://example.org"), Platform::Web);
    }

    #[test]
    fn lookalike_hosts_do_not_match() {
        // Suffix match requires a dot boundary.
        assert_eq!(classify_url("https://notinstagram.com/a"), Platform::Web);
        assert_eq!(classify_url("https://linkedin.company.example"), Platform::Web);
    }

    #[test]
    fn unparseable_urls_route_to_web() {
        assert_eq!(classify_url("not a url"), Platform::Web);
        assert_eq!(classify_url(""), Platform::Web);
    }

    #[test]
    fn classification_is_case_insensitive_on_host() {
        assert_eq!(
            classify_url("https://WWW.INSTAGRAM.COM/acme"),
            Platform::Instagram
        );
    }

    #[test]
    fn classify_urls_buckets_preserve_input_order() {
        let buckets = classify_urls([
            "https://acme.example/a",
            "https://www.instagram.com/one",
            "https://acme.example/b",
            "https://www.instagram.com/two",
        ]);

        assert_eq!(
            buckets[&Platform::Web],
            ["https://acme.example/a", "https://acme.example/b"]
        );
        assert_eq!(
            buckets[&Platform::Instagram],
            [
                "https://www.instagram.com/one",
                "https://www.instagram.com/two"
            ]
        );
        assert!(!buckets.contains_key(&Platform::Youtube));
    }

    #[test]
    fn classification_is_deterministic() {
        let url = "https://www.youtube.com/@acme";
        assert_eq!(classify_url(url), classify_url(url));
    }
}
