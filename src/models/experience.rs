use serde::{Deserialize, Serialize};

use crate::editor::Editable;
use crate::resource::Resource;
use crate::validation::{Validate, ValidationErrors, Validator};

/// Separator between achievements in the dialog's text area
pub const ACHIEVEMENT_SEPARATOR: &str = "\n\n";

/// A position held
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default, alias = "achievements")]
    pub description: Vec<String>,
    #[serde(default)]
    pub current: bool,
}

/// Payload for creating an experience entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExperience {
    pub title: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub description: Vec<String>,
    pub current: bool,
}

/// Partial update of an experience entry
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperiencePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<bool>,
}

/// Dialog values; achievements are typed as paragraphs separated by a blank line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExperienceForm {
    pub title: String,
    pub company: String,
    pub location: String,
    pub start_date: String,
    pub end_date: String,
    pub achievements: String,
    pub current: bool,
}

impl ExperienceForm {
    /// Achievements split into entries, blanks dropped
    pub fn achievement_list(&self) -> Vec<String> {
        self.achievements
            .split(ACHIEVEMENT_SEPARATOR)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl Validate for ExperienceForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let validator = Validator::new()
            .min_len("title", &self.title, 2, "Title must be at least 2 characters.")
            .min_len("company", &self.company, 2, "Company must be at least 2 characters.")
            .min_len("location", &self.location, 2, "Location must be at least 2 characters.")
            .min_len(
                "startDate",
                &self.start_date,
                2,
                "Start date must be at least 2 characters.",
            )
            .date("startDate", &self.start_date, "Start date must be a valid date.");

        // A current position may leave the end date open.
        let validator = if self.current {
            validator.optional_date("endDate", Some(&self.end_date), "End date must be a valid date.")
        } else {
            validator
                .min_len("endDate", &self.end_date, 2, "End date must be at least 2 characters.")
                .date("endDate", &self.end_date, "End date must be a valid date.")
        };

        validator
            .min_len(
                "achievements",
                &self.achievements,
                10,
                "Achievements must be at least 10 characters.",
            )
            .finish()
    }
}

impl Resource for Experience {
    type New = NewExperience;
    type Patch = ExperiencePatch;

    const PATH: &'static str = "/experience";
    const LABEL: &'static str = "Experience";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Editable for Experience {
    type Form = ExperienceForm;

    fn to_form(&self) -> ExperienceForm {
        ExperienceForm {
            title: self.title.clone(),
            company: self.company.clone(),
            location: self.location.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            achievements: self.description.join(ACHIEVEMENT_SEPARATOR),
            current: self.current,
        }
    }

    fn new_from_form(form: &ExperienceForm, _existing: &[Self]) -> NewExperience {
        NewExperience {
            title: form.title.trim().to_string(),
            company: form.company.trim().to_string(),
            location: form.location.trim().to_string(),
            start_date: form.start_date.trim().to_string(),
            end_date: form.end_date.trim().to_string(),
            description: form.achievement_list(),
            current: form.current,
        }
    }

    fn patch_from_form(form: &ExperienceForm) -> ExperiencePatch {
        ExperiencePatch {
            title: Some(form.title.trim().to_string()),
            company: Some(form.company.trim().to_string()),
            location: Some(form.location.trim().to_string()),
            start_date: Some(form.start_date.trim().to_string()),
            end_date: Some(form.end_date.trim().to_string()),
            description: Some(form.achievement_list()),
            current: Some(form.current),
        }
    }
}
