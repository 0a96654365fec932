//! Validation result types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::form::FormField;

/// Outcome of checking one field.
///
/// `error` is present iff `is_valid` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(message.into()),
        }
    }
}

/// Aggregated result of validating every required field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValidation {
    /// Error message per failing field, keyed in on-screen order.
    pub errors: BTreeMap<FormField, String>,
    pub is_valid: bool,
}

impl FormValidation {
    /// The earliest failing field in form order, i.e. the one to focus.
    pub fn first_invalid(&self) -> Option<FormField> {
        self.errors.keys().next().copied()
    }

    pub fn error_for(&self, field: FormField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }
}
