//! Field-level validation of form values before submission
//!
//! Validation is synchronous and never touches the network. Each failing
//! field reports one message (the first rule it broke); a form is submittable
//! only when no field reports anything.

use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

/// Field-scoped validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field` unless it already has one
    pub fn add(&mut self, field: &str, message: &str) {
        self.fields
            .entry(field.to_string())
            .or_insert_with(|| message.to_string());
    }

    /// The message for `field`, if it failed
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Whether `field` failed
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Whether nothing failed
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of failing fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Forget every message
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Failing fields and their messages, ordered by field name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

/// Something that can check its own field values
pub trait Validate {
    /// Check every field
    fn validate(&self) -> Result<(), ValidationErrors>;

    /// Check every field and report only `field`
    fn field_error(&self, field: &str) -> Option<String> {
        self.validate()
            .err()
            .and_then(|errors| errors.get(field).map(str::to_string))
    }
}

/// Builder that runs rules and collects messages
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    /// Start a fresh validation pass
    pub fn new() -> Self {
        Self::default()
    }

    /// Value must be non-blank
    pub fn required(self, field: &str, value: &str, message: &str) -> Self {
        self.min_len(field, value, 1, message)
    }

    /// Value must be non-blank and at least `min` characters long
    pub fn min_len(mut self, field: &str, value: &str, min: usize, message: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.chars().count() < min {
            self.errors.add(field, message);
        }
        self
    }

    /// Value must lie within `min..=max`
    pub fn range<T: PartialOrd>(mut self, field: &str, value: T, min: T, max: T, message: &str) -> Self {
        if value < min || value > max {
            self.errors.add(field, message);
        }
        self
    }

    /// Value must be an absolute http(s) URL
    pub fn url(mut self, field: &str, value: &str, message: &str) -> Self {
        if !is_valid_url(value) {
            self.errors.add(field, message);
        }
        self
    }

    /// Like [`Validator::url`], but blank values pass
    pub fn optional_url(self, field: &str, value: Option<&str>, message: &str) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => self.url(field, value, message),
            None => self,
        }
    }

    /// Value must be a `YYYY-MM` or `YYYY-MM-DD` date
    pub fn date(mut self, field: &str, value: &str, message: &str) -> Self {
        if !is_valid_date(value) {
            self.errors.add(field, message);
        }
        self
    }

    /// Like [`Validator::date`], but blank values pass
    pub fn optional_date(self, field: &str, value: Option<&str>, message: &str) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(value) => self.date(field, value, message),
            None => self,
        }
    }

    /// At least `min` non-blank entries
    pub fn min_items(mut self, field: &str, items: &[String], min: usize, message: &str) -> Self {
        if items.iter().filter(|item| !item.trim().is_empty()).count() < min {
            self.errors.add(field, message);
        }
        self
    }

    /// Value must be one of `allowed`
    pub fn one_of(mut self, field: &str, value: &str, allowed: &[&str], message: &str) -> Self {
        if !allowed.contains(&value) {
            self.errors.add(field, message);
        }
        self
    }

    /// Fold in the messages of a nested row, prefixing fields as `prefix.index.field`
    pub fn nested(mut self, prefix: &str, index: usize, result: Result<(), ValidationErrors>) -> Self {
        if let Err(nested) = result {
            for (field, message) in nested.iter() {
                self.errors
                    .add(&format!("{}.{}.{}", prefix, index, field), message);
            }
        }
        self
    }

    /// Finish the pass
    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// Whether `value` parses as an absolute http or https URL with a host
pub fn is_valid_url(value: &str) -> bool {
    match Url::parse(value.trim()) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

/// Whether `value` is a calendar date written `YYYY-MM-DD` or a month `YYYY-MM`
pub fn is_valid_date(value: &str) -> bool {
    let value = value.trim();
    if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok() {
        return true;
    }
    value.len() == 7 && NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d").is_ok()
}
