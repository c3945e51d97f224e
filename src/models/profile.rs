use serde::{Deserialize, Serialize};

use crate::validation::{Validate, ValidationErrors, Validator};

/// A social network link on the profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
}

impl Validate for SocialLink {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .min_len(
                "type",
                &self.kind,
                2,
                "Social media type must be at least 2 characters.",
            )
            .min_len(
                "url",
                &self.url,
                2,
                "Social media URL must be at least 2 characters.",
            )
            .finish()
    }
}

/// The singleton owner profile. It doubles as its own form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default)]
    pub about_me: String,
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub phone_numbers: Vec<String>,
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(default)]
    pub social_media: Vec<SocialLink>,
}

impl Validate for Profile {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.social_media.iter().enumerate().fold(
            Validator::new()
                .min_len("name", &self.name, 2, "Name must be at least 2 characters.")
                .min_len("title", &self.title, 2, "Title must be at least 2 characters.")
                .min_len("city", &self.city, 2, "City must be at least 2 characters.")
                .min_len("tagline", &self.tagline, 2, "Tagline must be at least 2 characters.")
                .min_len("aboutMe", &self.about_me, 10, "About me must be at least 10 characters.")
                .min_len("photo", &self.photo, 2, "Photo URL must be at least 2 characters."),
            |validator, (index, link)| validator.nested("socialMedia", index, link.validate()),
        )
        .finish()
    }
}

/// Kind of contact entry whose count is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContactKind {
    Emails,
    PhoneNumbers,
    SocialMedia,
}

/// Number of contact entries per kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactCounts {
    #[serde(default)]
    pub emails: u32,
    #[serde(default)]
    pub phone_numbers: u32,
    #[serde(default)]
    pub social_media: u32,
    #[serde(default)]
    pub total: u32,
}

impl ContactCounts {
    /// Counts derived from a profile's contact lists
    pub fn of(profile: &Profile) -> Self {
        let emails = profile.emails.len() as u32;
        let phone_numbers = profile.phone_numbers.len() as u32;
        let social_media = profile.social_media.len() as u32;
        Self {
            emails,
            phone_numbers,
            social_media,
            total: emails + phone_numbers + social_media,
        }
    }
}

/// Body of `PUT /profile/contact-counts`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContactCountUpdate {
    #[serde(rename = "type")]
    pub kind: ContactKind,
    pub count: u32,
}

/// Response of `PUT /profile/contact-counts`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UpdateContactCountsResponse {
    #[serde(default)]
    pub message: String,
    pub counts: ContactCounts,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile() -> Profile {
        Profile {
            name: "Jane Doe".to_string(),
            title: "Engineer".to_string(),
            city: "Oslo".to_string(),
            tagline: "Builds things".to_string(),
            about_me: "I build reliable systems.".to_string(),
            photo: "https://example.com/me.png".to_string(),
            phone_numbers: vec!["+47 000 00 000".to_string()],
            emails: vec!["jane@example.com".to_string()],
            social_media: vec![SocialLink {
                kind: "github".to_string(),
                url: "https://github.com/jane".to_string(),
            }],
        }
    }

    #[test]
    fn valid_profile_passes() {
        assert!(profile().validate().is_ok());
    }

    #[test]
    fn social_rows_report_indexed_fields() {
        let mut profile = profile();
        profile.social_media.push(SocialLink::default());
        let errors = profile.validate().unwrap_err();
        assert!(errors.contains("socialMedia.1.type"));
        assert!(errors.contains("socialMedia.1.url"));
        assert!(!errors.contains("socialMedia.0.type"));
    }

    #[test]
    fn wire_names_are_camel_case() {
        let value = serde_json::to_value(profile()).unwrap();
        assert_eq!(value["aboutMe"], "I build reliable systems.");
        assert_eq!(value["socialMedia"][0]["type"], "github");
        assert_eq!(ContactCounts::of(&profile()).total, 3);

        let update = ContactCountUpdate {
            kind: ContactKind::PhoneNumbers,
            count: 2,
        };
        assert_eq!(
            serde_json::to_value(update).unwrap(),
            json!({"type": "phoneNumbers", "count": 2})
        );
    }
}
