use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use super::form::Field;

/// Why a single field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    Missing,
    InvalidEmail,
}

impl FieldError {
    pub fn message(&self) -> &'static str {
        match self {
            FieldError::Missing => "is required",
            FieldError::InvalidEmail => "must be a valid email address",
        }
    }
}

/// Field-scoped validation failures, in form order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<(Field, FieldError)>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn push(&mut self, field: Field, error: FieldError) {
        self.errors.retain(|(f, _)| *f != field);
        self.errors.push((field, error));
        self.errors.sort_by_key(|(f, _)| *f);
    }

    pub fn get(&self, field: Field) -> Option<FieldError> {
        self.errors
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, e)| *e)
    }

    pub fn clear_field(&mut self, field: Field) {
        self.errors.retain(|(f, _)| *f != field);
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.errors.iter().map(|(f, _)| *f)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Field, FieldError)> {
        self.errors.iter()
    }

    /// Names of every field that is missing entirely
    pub fn missing(&self) -> Vec<&'static str> {
        self.errors
            .iter()
            .filter(|(_, e)| *e == FieldError::Missing)
            .map(|(f, _)| f.label())
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(field, error)| format!("{} {}", field.label(), error.message()))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
            .expect("email pattern is valid")
    })
}

/// Standard `local@domain.tld` address syntax
pub fn is_valid_email(value: &str) -> bool {
    email_regex().is_match(value.trim())
}

/// Check one field's value
pub fn check_field(field: Field, value: &str) -> Option<FieldError> {
    let value = value.trim();
    if value.is_empty() {
        Some(FieldError::Missing)
    } else if field == Field::Email && !is_valid_email(value) {
        Some(FieldError::InvalidEmail)
    } else {
        None
    }
}

/// Validate a set of fields given a value lookup
pub fn validate<'a, F>(fields: &[Field], value_of: F) -> Result<(), ValidationErrors>
where
    F: Fn(Field) -> &'a str,
{
    let mut errors = ValidationErrors::default();
    for &field in fields {
        if let Some(error) = check_field(field, value_of(field)) {
            errors.push(field, error);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
