//! LinkedIn collector records into the canonical schema.
//!
//! LinkedIn serves several page shapes (profiles, company pages, posts,
//! newsletters) and the collector reports each field as candidates across
//! three sources of decreasing reliability: DOM extraction, embedded
//! JSON-LD, and meta tags. Every field below resolves through that order.

use leadgen_core::{
    first_reliable, first_reliable_count, join_address, Classification, Contact, Content,
    Platform, Profile,
};

use crate::raw::LinkedInRaw;

use super::{has_identity, opt, Sections, TransformError};

pub(super) fn unify(raw: LinkedInRaw) -> Result<Sections, TransformError> {
    let Some(url) = opt(raw.url.as_deref()) else {
        return Err(TransformError::MissingIdentity {
            platform: Platform::Linkedin,
            reason: "no page URL",
        });
    };

    let url_type = opt(raw.url_type.as_deref()).unwrap_or_else(|| "profile".to_string());

    let name = first_reliable(raw.candidates("name"));
    let job_title = first_reliable(
        raw.candidates("job_title")
            .into_iter()
            .chain(raw.candidates("headline")),
    );
    let bio = first_reliable(
        raw.candidates("about")
            .into_iter()
            .chain(raw.candidates("headline"))
            .chain(raw.candidates("description")),
    );
    let location = first_reliable(raw.candidates("location"));

    let employee_count = first_reliable_count(
        raw.candidates("employee_count")
            .into_iter()
            .chain(raw.candidates("followers"))
            .chain(raw.candidates("connections")),
    );

    let address = join_address(
        ["street", "city", "region", "postal_code", "country"]
            .iter()
            .filter_map(|key| first_reliable(raw.candidates(key))),
    );

    let mut contact = Contact {
        address,
        ..Contact::default()
    };
    if let Some(website) = first_reliable(raw.candidates("website")) {
        contact.websites.push(website);
    }

    let mut content = Content::default();
    if matches!(url_type.as_str(), "post" | "newsletter") {
        content.author_name = first_reliable(raw.candidates("author_name"));
        content.upload_date = first_reliable(raw.candidates("date_published"));
    }

    let is_company = url_type == "company";

    let sections = Sections {
        url,
        profile: Profile {
            full_name: name.clone(),
            job_title,
            bio,
            location,
            employee_count: (employee_count > 0).then_some(employee_count),
            ..Profile::default()
        },
        contact,
        content,
        classification: Classification {
            company_name: is_company.then_some(name).flatten(),
            company_type: is_company.then(|| "company".to_string()),
            ..Classification::default()
        },
    };

    if has_identity(&sections) || sections.content.author_name.is_some() {
        Ok(sections)
    } else {
        Err(TransformError::MissingIdentity {
            platform: Platform::Linkedin,
            reason: "no resolvable name across extraction candidates",
        })
    }
}
