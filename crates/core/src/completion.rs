//! Form completion summary, reported with abandonment events.

use serde::{Deserialize, Serialize};

use crate::form::{FormField, FormSnapshot, OPTIONAL_FIELDS, REQUIRED_FIELDS};

/// How far along a form is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormCompletion {
    pub completed_fields: usize,
    pub total_fields: usize,
    pub required_completed: usize,
    pub required_total: usize,
    pub completion_rate: f64,
    pub required_completion_rate: f64,
}

/// Count non-blank fields among the required and optional text inputs.
pub fn form_completion(form: &FormSnapshot) -> FormCompletion {
    let filled = |field: &&FormField| !form.get(**field).trim().is_empty();

    let required_completed = REQUIRED_FIELDS.iter().filter(filled).count();
    let optional_completed = OPTIONAL_FIELDS.iter().filter(filled).count();

    let required_total = REQUIRED_FIELDS.len();
    let total_fields = required_total + OPTIONAL_FIELDS.len();
    let completed_fields = required_completed + optional_completed;

    FormCompletion {
        completed_fields,
        total_fields,
        required_completed,
        required_total,
        completion_rate: completed_fields as f64 / total_fields as f64,
        required_completion_rate: required_completed as f64 / required_total as f64,
    }
}
