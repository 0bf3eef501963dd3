//! Valve model
//!
//! The single field set of a valve record, the rules inbound payloads must
//! satisfy, and the shapes returned to clients.

mod valve;
mod validation;

pub use valve::{UpdateValveForm, Valve, ValveFields};
pub use validation::{
    ValidationError, ValidationResult, DESCRIPTION_MAX_LEN, NAME_MAX_LEN, TYPE_MAX_LEN,
};
