//! Quote-form validation engine.
//!
//! Per-field business rules and whole-form validation. Pure functions, no
//! storage or network access; failures are returned as data, never raised.

pub mod evaluator;
pub mod rules;

pub use evaluator::{validate_field, validate_field_named, validate_form};
pub use rules::{FormValidation, ValidationResult};
