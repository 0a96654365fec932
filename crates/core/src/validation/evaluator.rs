//! Field rules and form evaluator: pure logic.

use std::sync::LazyLock;

use regex::Regex;

use super::rules::{FormValidation, ValidationResult};
use crate::form::{FormField, FormSnapshot, ServiceType, REQUIRED_FIELDS};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Minimum trimmed length of the name field.
pub const MIN_NAME_LEN: usize = 2;

/// Minimum trimmed length of the city/ZIP field.
pub const MIN_ADDRESS_LEN: usize = 3;

/// Allowed digit count in a phone number (10-digit NANP up to a full
/// international number with country code).
pub const MIN_PHONE_DIGITS: usize = 10;
pub const MAX_PHONE_DIGITS: usize = 14;

pub const MSG_NAME: &str = "Name must be at least 2 characters";
pub const MSG_PHONE: &str = "Please enter a valid phone number";
pub const MSG_PHONE_CHARS: &str = "Phone number contains invalid characters";
pub const MSG_EMAIL_REQUIRED: &str = "Email is required";
pub const MSG_EMAIL: &str = "Please enter a valid email address";
pub const MSG_ADDRESS: &str = "Please enter your city or ZIP code";
pub const MSG_SERVICE_TYPE: &str = "Please select a service type";
pub const MSG_ROOMS: &str = "Please specify beds/baths or rooms";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

static PHONE_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s().\-]+$").expect("valid regex"));

static PHONE_EXTENSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*(?:x|ext\.?)\s*[0-9]{1,6}$").expect("valid regex")
});

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Validate a single field value.
///
/// `_form` is accepted so cross-field rules can be added without changing
/// callers; no current rule reads it. Fields without a rule always pass.
pub fn validate_field(field: FormField, value: &str, _form: &FormSnapshot) -> ValidationResult {
    match field {
        FormField::Name => check_min_trimmed(value, MIN_NAME_LEN, MSG_NAME),
        FormField::Mobile => check_phone(value),
        FormField::Email => check_email(value),
        FormField::Address => check_min_trimmed(value, MIN_ADDRESS_LEN, MSG_ADDRESS),
        FormField::ServiceType => check_service_type(value),
        FormField::Rooms => check_min_trimmed(value, 1, MSG_ROOMS),
        FormField::AddOns
        | FormField::PreferredDays
        | FormField::ParkingNotes
        | FormField::TextOk
        | FormField::Website => ValidationResult::valid(),
    }
}

/// Validate a field addressed by its wire name. Unknown names pass.
pub fn validate_field_named(name: &str, value: &str, form: &FormSnapshot) -> ValidationResult {
    match FormField::parse(name) {
        Some(field) => validate_field(field, value, form),
        None => ValidationResult::valid(),
    }
}

/// Validate every required field of `form`.
pub fn validate_form(form: &FormSnapshot) -> FormValidation {
    let errors: std::collections::BTreeMap<_, _> = REQUIRED_FIELDS
        .iter()
        .filter_map(|&field| {
            validate_field(field, form.get(field), form)
                .error
                .map(|message| (field, message))
        })
        .collect();

    FormValidation {
        is_valid: errors.is_empty(),
        errors,
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

fn check_min_trimmed(value: &str, min: usize, message: &str) -> ValidationResult {
    if value.trim().chars().count() < min {
        ValidationResult::invalid(message)
    } else {
        ValidationResult::valid()
    }
}

fn check_phone(value: &str) -> ValidationResult {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return ValidationResult::invalid(MSG_PHONE);
    }

    let number = PHONE_EXTENSION_RE.replace(trimmed, "");
    if !PHONE_CHARS_RE.is_match(&number) {
        return ValidationResult::invalid(MSG_PHONE_CHARS);
    }

    let digits = number.chars().filter(char::is_ascii_digit).count();
    if (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
        ValidationResult::valid()
    } else {
        ValidationResult::invalid(MSG_PHONE)
    }
}

fn check_email(value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return ValidationResult::invalid(MSG_EMAIL_REQUIRED);
    }
    if EMAIL_RE.is_match(value) {
        ValidationResult::valid()
    } else {
        ValidationResult::invalid(MSG_EMAIL)
    }
}

fn check_service_type(value: &str) -> ValidationResult {
    match ServiceType::parse(value) {
        Some(_) => ValidationResult::valid(),
        None => ValidationResult::invalid(MSG_SERVICE_TYPE),
    }
}
