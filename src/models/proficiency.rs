use serde::{Deserialize, Serialize};

use crate::editor::Editable;
use crate::models::skill::score;
use crate::resource::Resource;
use crate::validation::{Validate, ValidationErrors, Validator};

/// A headline proficiency bar shown on the public site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proficiency {
    #[serde(rename = "_id")]
    pub id: String,
    /// Display ordinal; new entries take the next free value
    #[serde(rename = "id", default)]
    pub ordinal: i64,
    pub skill: String,
    #[serde(default)]
    pub value: u8,
    #[serde(default)]
    pub description: String,
}

/// Payload for creating a proficiency
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProficiency {
    #[serde(rename = "id")]
    pub ordinal: i64,
    pub skill: String,
    pub value: u8,
    pub description: String,
}

/// Partial update of a proficiency
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProficiencyPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Dialog values for a proficiency
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProficiencyForm {
    pub skill: String,
    pub value: i64,
    pub description: String,
}

impl Validate for ProficiencyForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .min_len("skill", &self.skill, 2, "Skill is required.")
            .range("value", self.value, 0, 100, "Value must be between 0 and 100.")
            .finish()
    }
}

/// Next free ordinal: one past the largest in use, 1 for an empty list
pub fn next_ordinal(existing: &[Proficiency]) -> i64 {
    existing
        .iter()
        .map(|p| p.ordinal)
        .max()
        .map(|max| max + 1)
        .unwrap_or(1)
}

impl Resource for Proficiency {
    type New = NewProficiency;
    type Patch = ProficiencyPatch;

    const PATH: &'static str = "/proficiency";
    const LABEL: &'static str = "Proficiency";

    fn id(&self) -> &str {
        &self.id
    }
}

impl Editable for Proficiency {
    type Form = ProficiencyForm;

    fn to_form(&self) -> ProficiencyForm {
        ProficiencyForm {
            skill: self.skill.clone(),
            value: i64::from(self.value),
            description: self.description.clone(),
        }
    }

    fn new_from_form(form: &ProficiencyForm, existing: &[Self]) -> NewProficiency {
        NewProficiency {
            ordinal: next_ordinal(existing),
            skill: form.skill.trim().to_string(),
            value: score(form.value),
            description: form.description.trim().to_string(),
        }
    }

    fn patch_from_form(form: &ProficiencyForm) -> ProficiencyPatch {
        ProficiencyPatch {
            skill: Some(form.skill.trim().to_string()),
            value: Some(score(form.value)),
            description: Some(form.description.trim().to_string()),
        }
    }
}
