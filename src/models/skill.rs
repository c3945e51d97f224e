use serde::{Deserialize, Serialize};

use crate::editor::Editable;
use crate::models::{blank_as_none, clearable, non_blank};
use crate::resource::Resource;
use crate::validation::{Validate, ValidationErrors, Validator};

/// A skill with a 0-100 proficiency score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    #[serde(rename = "_id")]
    pub id: String,
    /// Display ordinal assigned by the API
    #[serde(rename = "id", default, skip_serializing_if = "Option::is_none")]
    pub ordinal: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, alias = "level")]
    pub proficiency: u8,
    #[serde(default, deserialize_with = "blank_as_none::deserialize", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Payload for creating a skill
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSkill {
    pub name: String,
    pub category: String,
    pub proficiency: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Partial update of a skill
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proficiency: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

/// Dialog values for a skill
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillForm {
    pub name: String,
    pub category: String,
    /// Kept wide so out-of-range input can be reported
    pub proficiency: i64,
    pub description: String,
}

impl Validate for SkillForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .min_len("name", &self.name, 2, "Skill name must be at least 2 characters.")
            .min_len("category", &self.category, 2, "Category must be at least 2 characters.")
            .range(
                "proficiency",
                self.proficiency,
                0,
                100,
                "Proficiency must be between 0 and 100.",
            )
            .finish()
    }
}

/// Clamp a validated score into the wire type
pub(crate) fn score(value: i64) -> u8 {
    value.clamp(0, 100) as u8
}

impl Resource for Skill {
    type New = NewSkill;
    type Patch = SkillPatch;

    const PATH: &'static str = "/skills";
    const LABEL: &'static str = "Skill";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Editable for Skill {
    type Form = SkillForm;

    fn to_form(&self) -> SkillForm {
        SkillForm {
            name: self.name.clone(),
            category: self.category.clone(),
            proficiency: i64::from(self.proficiency),
            description: self.description.clone().unwrap_or_default(),
        }
    }

    fn new_from_form(form: &SkillForm, _existing: &[Self]) -> NewSkill {
        NewSkill {
            name: form.name.trim().to_string(),
            category: form.category.trim().to_string(),
            proficiency: score(form.proficiency),
            description: non_blank(&form.description),
        }
    }

    fn patch_from_form(form: &SkillForm) -> SkillPatch {
        SkillPatch {
            name: Some(form.name.trim().to_string()),
            category: Some(form.category.trim().to_string()),
            proficiency: Some(score(form.proficiency)),
            description: clearable(&form.description),
        }
    }
}
