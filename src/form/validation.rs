//! Synchronous, field-scoped validation. Runs before any network call.

use super::fields::{Field, ProjectFields};
use thiserror::Error;

pub const REQUIRED_MESSAGE: &str = "Name is required.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// Every field that failed validation, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{} invalid field(s)", .errors.len())]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The message shown under `field`, if it failed.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    fn push(&mut self, field: Field, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub(crate) fn clear(&mut self, field: Field) {
        self.errors.retain(|e| e.field != field);
    }
}

/// Checks that every `required` field holds something besides whitespace.
pub fn validate(values: &ProjectFields, required: &[Field]) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    for &field in required {
        if values.get(field).trim().is_empty() {
            let message = match field {
                Field::Name => REQUIRED_MESSAGE.to_string(),
                other => format!("{other} is required."),
            };
            errors.push(field, message);
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
