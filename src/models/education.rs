use serde::{Deserialize, Serialize};

use crate::editor::Editable;
use crate::models::{blank_as_none, clearable, non_blank};
use crate::resource::Resource;
use crate::validation::{Validate, ValidationErrors, Validator};

/// Whether an entry is a degree or a certification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EducationType {
    #[default]
    Education,
    Certification,
}

impl EducationType {
    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            EducationType::Education => "education",
            EducationType::Certification => "certification",
        }
    }

    /// Parse a wire value
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "education" => Some(EducationType::Education),
            "certification" => Some(EducationType::Certification),
            _ => None,
        }
    }
}

/// A degree or certification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: EducationType,
    pub publisher: String,
    pub title: String,
    #[serde(default, deserialize_with = "blank_as_none::deserialize", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub start_date: String,
    #[serde(default, deserialize_with = "blank_as_none::deserialize", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub description: String,
}

/// Payload for creating an education entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEducation {
    #[serde(rename = "type")]
    pub kind: EducationType,
    pub publisher: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub description: String,
}

/// Partial update; `Some(None)` on a clearable field sends `null`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationPatch {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<EducationType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Dialog values for an education entry
#[derive(Debug, Clone, PartialEq)]
pub struct EducationForm {
    pub kind: String,
    pub publisher: String,
    pub title: String,
    pub city: String,
    pub start_date: String,
    pub end_date: String,
    pub description: String,
}

impl Default for EducationForm {
    fn default() -> Self {
        Self {
            kind: EducationType::Education.as_str().to_string(),
            publisher: String::new(),
            title: String::new(),
            city: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            description: String::new(),
        }
    }
}

impl Validate for EducationForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .one_of(
                "type",
                self.kind.trim(),
                &["education", "certification"],
                "Type must be education or certification.",
            )
            .min_len("publisher", &self.publisher, 2, "Publisher is required.")
            .min_len("title", &self.title, 2, "Title is required.")
            .min_len("startDate", &self.start_date, 2, "Start date is required.")
            .date("startDate", &self.start_date, "Start date must be a valid date.")
            .optional_date("endDate", Some(&self.end_date), "End date must be a valid date.")
            .min_len(
                "description",
                &self.description,
                10,
                "Description must be at least 10 characters.",
            )
            .finish()
    }
}

impl Resource for Education {
    type New = NewEducation;
    type Patch = EducationPatch;

    const PATH: &'static str = "/education";
    const LABEL: &'static str = "Education";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Editable for Education {
    type Form = EducationForm;

    fn to_form(&self) -> EducationForm {
        EducationForm {
            kind: self.kind.as_str().to_string(),
            publisher: self.publisher.clone(),
            title: self.title.clone(),
            city: self.city.clone().unwrap_or_default(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone().unwrap_or_default(),
            description: self.description.clone(),
        }
    }

    fn new_from_form(form: &EducationForm, _existing: &[Self]) -> NewEducation {
        NewEducation {
            kind: EducationType::parse(&form.kind).unwrap_or_default(),
            publisher: form.publisher.trim().to_string(),
            title: form.title.trim().to_string(),
            city: non_blank(&form.city),
            start_date: form.start_date.trim().to_string(),
            end_date: non_blank(&form.end_date),
            description: form.description.trim().to_string(),
        }
    }

    fn patch_from_form(form: &EducationForm) -> EducationPatch {
        EducationPatch {
            kind: EducationType::parse(&form.kind),
            publisher: Some(form.publisher.trim().to_string()),
            title: Some(form.title.trim().to_string()),
            city: clearable(&form.city),
            start_date: Some(form.start_date.trim().to_string()),
            end_date: clearable(&form.end_date),
            description: Some(form.description.trim().to_string()),
        }
    }
}
