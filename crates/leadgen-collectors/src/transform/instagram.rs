//! Instagram collector records into the canonical schema.

use leadgen_core::{first_reliable_count, Classification, Contact, Content, Platform, Profile};

use crate::raw::InstagramRaw;

use super::{has_identity, opt, Sections, TransformError};

pub(super) fn unify(raw: InstagramRaw) -> Result<Sections, TransformError> {
    let Some(url) = opt(raw.url.as_deref()) else {
        return Err(TransformError::MissingIdentity {
            platform: Platform::Instagram,
            reason: "no profile URL",
        });
    };

    let username = opt(raw.username.as_deref());
    let followers = first_reliable_count(raw.followers_count.as_deref().into_iter());

    let mut contact = Contact::default();
    if let Some(external) = opt(raw.external_url.as_deref()) {
        contact.websites.push(external);
    }
    for link in &raw.bio_links {
        if let Some(link) = opt(Some(link)) {
            contact.bio_links.push(link);
        }
    }
    if let Some(username) = &username {
        contact
            .social_handles
            .insert(Platform::Instagram, username.clone());
    }

    let sections = Sections {
        url,
        profile: Profile {
            username,
            full_name: opt(raw.full_name.as_deref()),
            bio: opt(raw.biography.as_deref()),
            location: opt(raw.location.as_deref()),
            // Audience size shares the numeric profile slot.
            employee_count: (followers > 0).then_some(followers),
            ..Profile::default()
        },
        contact,
        content: Content {
            caption: opt(raw.caption.as_deref()),
            upload_date: opt(raw.upload_date.as_deref()),
            ..Content::default()
        },
        classification: Classification::default(),
    };

    if has_identity(&sections) {
        Ok(sections)
    } else {
        Err(TransformError::MissingIdentity {
            platform: Platform::Instagram,
            reason: "no username or name",
        })
    }
}
