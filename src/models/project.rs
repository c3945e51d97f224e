use serde::{Deserialize, Serialize};

use crate::editor::Editable;
use crate::models::{blank_as_none, clearable};
use crate::resource::Resource;
use crate::validation::{Validate, ValidationErrors, Validator};

/// A portfolio project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub tech_stack: Vec<String>,
    pub start_date: String,
    #[serde(default, deserialize_with = "blank_as_none::deserialize")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub current: bool,
}

/// Payload for creating a project; an open end date is sent as `null`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub url: String,
    pub tech_stack: Vec<String>,
    pub start_date: String,
    pub end_date: Option<String>,
    pub current: bool,
}

/// Partial update of a project
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<bool>,
}

/// Dialog values for a project
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectForm {
    pub name: String,
    pub description: String,
    pub url: String,
    pub tech_stack: Vec<String>,
    pub start_date: String,
    pub end_date: String,
    pub current: bool,
}

impl ProjectForm {
    fn clean_stack(&self) -> Vec<String> {
        self.tech_stack
            .iter()
            .map(|tech| tech.trim())
            .filter(|tech| !tech.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Ongoing projects have no end date
    fn effective_end_date(&self) -> &str {
        if self.current {
            ""
        } else {
            &self.end_date
        }
    }
}

impl Validate for ProjectForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .min_len("name", &self.name, 2, "Project name must be at least 2 characters.")
            .min_len(
                "description",
                &self.description,
                10,
                "Description must be at least 10 characters.",
            )
            .optional_url("url", Some(&self.url), "Please enter a valid URL.")
            .min_items("techStack", &self.tech_stack, 1, "At least one technology is required.")
            .required("startDate", &self.start_date, "Start date is required.")
            .date("startDate", &self.start_date, "Start date must be a valid date.")
            .optional_date(
                "endDate",
                Some(self.effective_end_date()),
                "End date must be a valid date.",
            )
            .finish()
    }
}

impl Resource for Project {
    type New = NewProject;
    type Patch = ProjectPatch;

    const PATH: &'static str = "/projects";
    const LABEL: &'static str = "Project";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Editable for Project {
    type Form = ProjectForm;

    fn to_form(&self) -> ProjectForm {
        ProjectForm {
            name: self.name.clone(),
            description: self.description.clone(),
            url: self.url.clone(),
            tech_stack: self.tech_stack.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone().unwrap_or_default(),
            current: self.current,
        }
    }

    fn new_from_form(form: &ProjectForm, _existing: &[Self]) -> NewProject {
        NewProject {
            name: form.name.trim().to_string(),
            description: form.description.trim().to_string(),
            url: form.url.trim().to_string(),
            tech_stack: form.clean_stack(),
            start_date: form.start_date.trim().to_string(),
            end_date: clearable(form.effective_end_date()).flatten(),
            current: form.current,
        }
    }

    fn patch_from_form(form: &ProjectForm) -> ProjectPatch {
        ProjectPatch {
            name: Some(form.name.trim().to_string()),
            description: Some(form.description.trim().to_string()),
            url: Some(form.url.trim().to_string()),
            tech_stack: Some(form.clean_stack()),
            start_date: Some(form.start_date.trim().to_string()),
            end_date: clearable(form.effective_end_date()),
            current: Some(form.current),
        }
    }
}
