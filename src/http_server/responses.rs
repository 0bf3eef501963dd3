//! # Response Formatting
//!
//! Bodies returned by the valve endpoints. Single valves are returned as
//! [`Valve`](crate::model::Valve) directly.

use serde::{Deserialize, Serialize};

use crate::model::Valve;

/// Body of `GET /valves`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValveList {
    pub valves: Vec<Valve>,
}

impl ValveList {
    pub fn new(valves: Vec<Valve>) -> Self {
        Self { valves }
    }
}

/// Body of a successful `DELETE /valve`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValveDeleted {
    pub message: String,
    pub name: String,
}

impl ValveDeleted {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            message: "Valve removed".to_string(),
            name: name.into(),
        }
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
        }
    }

    pub fn for_field(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: Some(field),
        }
    }
}
