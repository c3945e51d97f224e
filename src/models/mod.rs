//! Resource kinds managed by the admin panel

mod education;
mod experience;
mod proficiency;
mod profile;
mod project;
mod skill;

pub use education::*;
pub use experience::*;
pub use proficiency::*;
pub use profile::*;
pub use project::*;
pub use skill::*;

/// Trimmed value, or `None` when blank
pub(crate) fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Value for a patch of a clearable field: `Some(None)` clears it
pub(crate) fn clearable(value: &str) -> Option<Option<String>> {
    Some(non_blank(value))
}

/// Serde helper reading `""` as an absent value
pub(crate) mod blank_as_none {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.filter(|v| !v.trim().is_empty()))
    }
}
