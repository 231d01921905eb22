//! YouTube collector records into the canonical schema.

use leadgen_core::{
    first_reliable, first_reliable_count, Classification, Contact, Content, Platform, Profile,
};

use crate::raw::YouTubeRaw;

use super::{has_identity, opt, Sections, TransformError};

pub(super) fn unify(raw: YouTubeRaw) -> Result<Sections, TransformError> {
    let Some(url) = first_reliable([raw.url.as_deref(), raw.channel_url.as_deref()].into_iter().flatten())
    else {
        return Err(TransformError::MissingIdentity {
            platform: Platform::Youtube,
            reason: "no video or channel URL",
        });
    };

    let channel_name = opt(raw.channel_name.as_deref());
    let subscribers = first_reliable_count(raw.subscriber_count.as_deref().into_iter());

    let mut contact = Contact::default();
    for link in &raw.links {
        if let Some(link) = opt(Some(link)) {
            contact.websites.push(link);
        }
    }
    if let Some(channel) = opt(raw.channel_url.as_deref()) {
        contact.social_handles.insert(Platform::Youtube, channel);
    }

    let sections = Sections {
        url,
        profile: Profile {
            full_name: channel_name.clone(),
            bio: opt(raw.description.as_deref()),
            // Audience size shares the numeric profile slot.
            employee_count: (subscribers > 0).then_some(subscribers),
            ..Profile::default()
        },
        contact,
        content: Content {
            channel_name,
            caption: opt(raw.video_caption.as_deref()),
            upload_date: opt(raw.upload_date.as_deref()),
            ..Content::default()
        },
        classification: Classification::default(),
    };

    if has_identity(&sections) {
        Ok(sections)
    } else {
        Err(TransformError::MissingIdentity {
            platform: Platform::Youtube,
            reason: "no channel name",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_raw() -> YouTubeRaw {
        YouTubeRaw {
            url: Some("https://www.youtube.com/watch?v=abc123".to_string()),
            channel_name: Some("Acme Travel".to_string()),
            channel_url: Some("https://www.youtube.com/@acmetravel".to_string()),
            description: Some("Travel tips and deals".to_string()),
            subscriber_count: Some("24,000".to_string()),
            video_caption: Some("Top 10 summer spots".to_string()),
            upload_date: Some("2026-07-15".to_string()),
            links: vec!["https://acme.example".to_string()],
        }
    }

    #[test]
    fn maps_channel_and_video_fields() {
        let sections = unify(full_raw()).unwrap();
        assert_eq!(sections.url, "https://www.youtube.com/watch?v=abc123");
        assert_eq!(sections.profile.full_name.as_deref(), Some("Acme Travel"));
        assert_eq!(sections.content.channel_name.as_deref(), Some("Acme Travel"));
        assert_eq!(
            sections.content.caption.as_deref(),
            Some("Top 10 summer spots")
        );
        assert_eq!(sections.contact.websites, ["https://acme.example"]);
        assert_eq!(
            sections.contact.social_handles.get(&Platform::Youtube).map(String::as_str),
            Some("https://www.youtube.com/@acmetravel")
        );
    }

    #[test]
    fn subscriber_count_is_coerced_with_separators_stripped() {
        let sections = unify(full_raw()).unwrap();
        assert_eq!(sections.profile.employee_count, Some(24_000));
    }

    #[test]
    fn absent_subscriber_count_stays_unset() {
        let mut raw = full_raw();
        raw.subscriber_count = None;
        let sections = unify(raw).unwrap();
        assert_eq!(sections.profile.employee_count, None);
    }

    #[test]
    fn channel_url_is_the_fallback_record_url() {
        let mut raw = full_raw();
        raw.url = None;
        let sections = unify(raw).unwrap();
        assert_eq!(sections.url, "https://www.youtube.com/@acmetravel");
    }

    #[test]
    fn nameless_channel_is_rejected() {
        let raw = YouTubeRaw {
            url: Some("https://youtu.be/abc".to_string()),
            ..YouTubeRaw::default()
        };
        assert!(matches!(
            unify(raw),
            Err(TransformError::MissingIdentity { .. })
        ));
    }
}
