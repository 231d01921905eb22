//! Web collector records into the canonical schema.

use leadgen_core::{first_reliable, Classification, Contact, Content, Platform, Profile};

use crate::raw::WebRaw;

use super::{has_identity, opt, Sections, TransformError};

pub(super) fn unify(raw: WebRaw) -> Result<Sections, TransformError> {
    let Some(url) = opt(raw.source_url.as_deref()) else {
        return Err(TransformError::MissingIdentity {
            platform: Platform::Web,
            reason: "no source URL",
        });
    };

    let name = opt(raw.name.as_deref());
    let company_name = first_reliable([raw.company_name.as_deref(), raw.name.as_deref()].into_iter().flatten());

    let mut contact = Contact {
        address: opt(raw.address.as_deref()),
        ..Contact::default()
    };
    if let Some(email) = opt(raw.contact_info.email.as_deref()) {
        contact.emails.push(email);
    }
    if let Some(phone) = opt(raw.contact_info.phone.as_deref()) {
        contact.phone_numbers.push(phone);
    }
    if let Some(website) = opt(raw.contact_info.website.as_deref()) {
        contact.websites.push(website);
    }
    for link in [
        raw.contact_info.twitter.as_deref(),
        raw.contact_info.facebook.as_deref(),
    ]
    .into_iter()
    .flatten()
    {
        if let Some(link) = opt(Some(link)) {
            contact.websites.push(link);
        }
    }
    for link in &raw.contact_info.socialmedialinks {
        if let Some(link) = opt(Some(link)) {
            contact.websites.push(link);
        }
    }
    if let Some(handle) = opt(raw.contact_info.linkedin.as_deref()) {
        contact.social_handles.insert(Platform::Linkedin, handle);
    }

    // Competitor pages are kept but categorized apart, so downstream
    // consumers can filter them without losing the intelligence.
    let lead_category = match opt(raw.lead_type.as_deref()) {
        Some(kind) if kind.eq_ignore_ascii_case("competitor") => "competitor",
        _ => "potential_customer",
    };

    let sections = Sections {
        url,
        profile: Profile {
            full_name: name,
            bio: opt(raw.bio.as_deref()),
            location: opt(raw.location.as_deref()),
            ..Profile::default()
        },
        contact,
        content: Content::default(),
        classification: Classification {
            industry: opt(raw.industry.as_deref()),
            company_name,
            company_type: opt(raw.company_type.as_deref()),
            lead_category: Some(lead_category.to_string()),
            lead_sub_category: opt(raw.link_details.as_deref()),
            ..Classification::default()
        },
    };

    if has_identity(&sections) {
        Ok(sections)
    } else {
        Err(TransformError::MissingIdentity {
            platform: Platform::Web,
            reason: "no name, company, or contact channel",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::WebContactInfo;

    fn full_raw() -> WebRaw {
        WebRaw {
            name: Some("Acme Travel".to_string()),
            company_name: Some("Acme Travel LLC".to_string()),
            bio: Some("Boutique travel agency".to_string()),
            location: Some("Springfield".to_string()),
            address: Some("1 Main St, Springfield".to_string()),
            industry: Some("Travel".to_string()),
            company_type: Some("Agency".to_string()),
            source_url: Some("https://acme.example/contact".to_string()),
            link_details: Some("contact page".to_string()),
            lead_type: Some("lead".to_string()),
            contact_info: WebContactInfo {
                email: Some("info@acme.example".to_string()),
                phone: Some("+1 555 0100".to_string()),
                linkedin: Some("acme-travel".to_string()),
                twitter: Some("https://twitter.com/acme".to_string()),
                facebook: None,
                website: Some("https://acme.example".to_string()),
                socialmedialinks: vec!["https://pinterest.com/acme".to_string()],
            },
        }
    }

    #[test]
    fn maps_all_sections() {
        let sections = unify(full_raw()).unwrap();
        assert_eq!(sections.url, "https://acme.example/contact");
        assert_eq!(sections.profile.full_name.as_deref(), Some("Acme Travel"));
        assert_eq!(sections.contact.emails, ["info@acme.example"]);
        assert_eq!(sections.contact.phone_numbers, ["+1 555 0100"]);
        assert_eq!(
            sections.contact.websites,
            [
                "https://acme.example",
                "https://twitter.com/acme",
                "https://pinterest.com/acme"
            ]
        );
        assert_eq!(
            sections.contact.social_handles.get(&Platform::Linkedin).map(String::as_str),
            Some("acme-travel")
        );
        assert_eq!(
            sections.classification.company_name.as_deref(),
            Some("Acme Travel LLC")
        );
        assert_eq!(
            sections.classification.lead_category.as_deref(),
            Some("potential_customer")
        );
        assert_eq!(
            sections.classification.lead_sub_category.as_deref(),
            Some("contact page")
        );
    }

    #[test]
    fn competitor_lead_type_maps_to_competitor_category() {
        let mut raw = full_raw();
        raw.lead_type = Some("Competitor".to_string());
        let sections = unify(raw).unwrap();
        assert_eq!(
            sections.classification.lead_category.as_deref(),
            Some("competitor")
        );
    }

    #[test]
    fn company_name_falls_back_to_name() {
        let mut raw = full_raw();
        raw.company_name = Some("N/A".to_string());
        let sections = unify(raw).unwrap();
        assert_eq!(
            sections.classification.company_name.as_deref(),
            Some("Acme Travel")
        );
    }

    #[test]
    fn placeholder_email_is_dropped() {
        let mut raw = full_raw();
        raw.contact_info.email = Some("NA".to_string());
        let sections = unify(raw).unwrap();
        assert!(sections.contact.emails.is_empty());
    }

    #[test]
    fn contact_only_record_passes_identity_check() {
        let raw = WebRaw {
            source_url: Some("https://acme.example".to_string()),
            contact_info: WebContactInfo {
                email: Some("info@acme.example".to_string()),
                ..WebContactInfo::default()
            },
            ..WebRaw::default()
        };
        assert!(unify(raw).is_ok());
    }
}
