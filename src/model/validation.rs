//! Field rules for valve payloads
//!
//! Column widths follow the `valve` table:
//! - name: 140 characters, must not be blank
//! - description: 200 characters
//! - type: 140 characters
//! - flow_rate: any finite number

use thiserror::Error;

pub const NAME_MAX_LEN: usize = 140;
pub const DESCRIPTION_MAX_LEN: usize = 200;
pub const TYPE_MAX_LEN: usize = 140;

/// Result type for payload validation
pub type ValidationResult<T> = Result<T, ValidationError>;

/// A payload field that breaks one of the rules above.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    field: &'static str,
    reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }

    pub fn too_long(field: &'static str, max: usize) -> Self {
        Self::new(field, format!("must be at most {max} characters"))
    }

    /// Name of the offending field, as it appears on the wire
    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

fn check_len(field: &'static str, value: &str, max: usize) -> ValidationResult<()> {
    if value.chars().count() > max {
        return Err(ValidationError::too_long(field, max));
    }
    Ok(())
}

pub(crate) fn check_name(name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("name", "must not be blank"));
    }
    check_len("name", name, NAME_MAX_LEN)
}

pub(crate) fn check_description(description: &str) -> ValidationResult<()> {
    check_len("description", description, DESCRIPTION_MAX_LEN)
}

pub(crate) fn check_type(valve_type: &str) -> ValidationResult<()> {
    check_len("type", valve_type, TYPE_MAX_LEN)
}

pub(crate) fn check_flow_rate(flow_rate: f64) -> ValidationResult<()> {
    if !flow_rate.is_finite() {
        return Err(ValidationError::new("flow_rate", "must be a finite number"));
    }
    Ok(())
}
