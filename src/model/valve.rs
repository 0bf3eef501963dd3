//! Valve entity and its payload forms

use serde::{Deserialize, Serialize};

use super::validation::{self, ValidationResult};

/// The mutable fields of a valve.
///
/// Create payloads deserialize straight into this type, stored rows carry it
/// and responses flatten it next to the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValveFields {
    /// Unique catalog name
    pub name: String,
    pub description: String,
    /// Free-text category such as "Gate" or "Ball"
    #[serde(rename = "type")]
    pub valve_type: String,
    /// Rated throughput
    pub flow_rate: f64,
}

impl ValveFields {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        valve_type: impl Into<String>,
        flow_rate: f64,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            valve_type: valve_type.into(),
            flow_rate,
        }
    }

    /// Checks every field rule, reporting the first violation.
    pub fn validate(&self) -> ValidationResult<()> {
        validation::check_name(&self.name)?;
        validation::check_description(&self.description)?;
        validation::check_type(&self.valve_type)?;
        validation::check_flow_rate(self.flow_rate)
    }
}

/// A stored valve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Valve {
    /// Assigned by storage, never changes
    pub id: i64,
    #[serde(flatten)]
    pub fields: ValveFields,
}

impl Valve {
    pub fn new(id: i64, fields: ValveFields) -> Self {
        Self { id, fields }
    }

    pub fn name(&self) -> &str {
        &self.fields.name
    }
}

/// Full-replace update payload.
///
/// Form decoding cannot read numbers through `#[serde(flatten)]`, so the
/// fields are spelled out here and folded back into [`ValveFields`] by
/// [`UpdateValveForm::into_parts`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UpdateValveForm {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub valve_type: String,
    pub flow_rate: f64,
}

impl UpdateValveForm {
    pub fn into_parts(self) -> (i64, ValveFields) {
        (
            self.id,
            ValveFields {
                name: self.name,
                description: self.description,
                valve_type: self.valve_type,
                flow_rate: self.flow_rate,
            },
        )
    }
}
