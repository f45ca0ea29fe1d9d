use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Accumulated per-field validation messages.
///
/// Serializes as `{"field": ["message", ...]}`, the shape the admin frontend
/// renders next to each form input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FieldErrors(pub BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `Ok(())` when no message was recorded, a `Validation` error otherwise.
    pub fn into_result(self) -> Result<(), ServiceError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::Validation(self))
        }
    }

    pub fn single(field: &str, message: impl Into<String>) -> ServiceError {
        let mut errs = Self::new();
        errs.push(field, message);
        ServiceError::Validation(errs)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for msg in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{}: {}", field, msg)?;
                first = false;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(FieldErrors),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("referential error: {0}")]
    Referential(String),
    #[error("invalid asset: {0}")]
    InvalidAsset(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self {
        Self::NotFound(format!("{} not found", entity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_errors_accumulate_per_field() {
        let mut errs = FieldErrors::new();
        errs.push("name", "name is required");
        errs.push("name", "must be at most 255 characters");
        errs.push("icon", "an icon image is required");
        assert_eq!(errs.0["name"].len(), 2);
        assert!(errs.into_result().is_err());
    }

    #[test]
    fn empty_field_errors_are_ok() {
        assert!(FieldErrors::new().into_result().is_ok());
    }

    #[test]
    fn display_joins_fields() {
        let mut errs = FieldErrors::new();
        errs.push("phone", "phone is required");
        let err = ServiceError::Validation(errs);
        assert_eq!(err.to_string(), "validation error: phone: phone is required");
    }
}
