//! Quote-request form model.
//!
//! [`FormSnapshot`] is the serializable state of one quote form. Every field
//! is kept as free text exactly as typed, so a half-filled form (including an
//! unselected service type) round-trips through draft storage unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Service type
// ---------------------------------------------------------------------------

pub const SERVICE_HOME: &str = "home";
pub const SERVICE_STR: &str = "str";
pub const SERVICE_OFFICE: &str = "office";

/// Values accepted by the `serviceType` select.
pub const VALID_SERVICE_TYPES: &[&str] = &[SERVICE_HOME, SERVICE_STR, SERVICE_OFFICE];

/// Kind of cleaning requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Home,
    /// Short-term rental turnover (Airbnb/VRBO).
    Str,
    Office,
}

impl ServiceType {
    /// Parse a select value. Returns `None` for anything outside the menu.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            SERVICE_HOME => Some(Self::Home),
            SERVICE_STR => Some(Self::Str),
            SERVICE_OFFICE => Some(Self::Office),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => SERVICE_HOME,
            Self::Str => SERVICE_STR,
            Self::Office => SERVICE_OFFICE,
        }
    }

    /// Human-readable label shown in the select.
    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Str => "STR/Office",
            Self::Office => "Office",
        }
    }
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

/// Named inputs of the quote form, in on-screen order.
///
/// The derived `Ord` follows declaration order, so sorting by field gives the
/// order a user meets the inputs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    Name,
    Mobile,
    Email,
    Address,
    ServiceType,
    Rooms,
    AddOns,
    PreferredDays,
    ParkingNotes,
    TextOk,
    Website,
}

/// Fields that must pass validation before a submission is attempted.
pub const REQUIRED_FIELDS: &[FormField] = &[
    FormField::Name,
    FormField::Mobile,
    FormField::Email,
    FormField::Address,
    FormField::ServiceType,
    FormField::Rooms,
];

/// Free-text fields that count toward completion but are never validated.
pub const OPTIONAL_FIELDS: &[FormField] = &[
    FormField::AddOns,
    FormField::PreferredDays,
    FormField::ParkingNotes,
];

impl FormField {
    /// Look up a field by its wire name (`"serviceType"`, `"addOns"`, ...).
    pub fn parse(name: &str) -> Option<Self> {
        let field = match name {
            "name" => Self::Name,
            "mobile" => Self::Mobile,
            "email" => Self::Email,
            "address" => Self::Address,
            "serviceType" => Self::ServiceType,
            "rooms" => Self::Rooms,
            "addOns" => Self::AddOns,
            "preferredDays" => Self::PreferredDays,
            "parkingNotes" => Self::ParkingNotes,
            "textOk" => Self::TextOk,
            "website" => Self::Website,
            _ => return None,
        };
        Some(field)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Mobile => "mobile",
            Self::Email => "email",
            Self::Address => "address",
            Self::ServiceType => "serviceType",
            Self::Rooms => "rooms",
            Self::AddOns => "addOns",
            Self::PreferredDays => "preferredDays",
            Self::ParkingNotes => "parkingNotes",
            Self::TextOk => "textOk",
            Self::Website => "website",
        }
    }

    pub fn is_required(self) -> bool {
        REQUIRED_FIELDS.contains(&self)
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// The full state of one quote-request form.
///
/// Missing keys deserialize to their empty value, so a stored partial draft
/// merges over a blank form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormSnapshot {
    pub name: String,
    pub mobile: String,
    pub email: String,
    /// City or ZIP code.
    pub address: String,
    pub service_type: String,
    /// Free text: "3 bed / 2 bath", "4 rooms", ...
    pub rooms: String,
    pub add_ons: String,
    pub preferred_days: String,
    pub parking_notes: String,
    /// Honeypot. Hidden from people, filled in by naive bots.
    pub website: String,
    /// Whether the customer is fine being contacted by text.
    pub text_ok: bool,
}

impl FormSnapshot {
    /// Text value of a field. `textOk` reads as `"true"`/`"false"`.
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Mobile => &self.mobile,
            FormField::Email => &self.email,
            FormField::Address => &self.address,
            FormField::ServiceType => &self.service_type,
            FormField::Rooms => &self.rooms,
            FormField::AddOns => &self.add_ons,
            FormField::PreferredDays => &self.preferred_days,
            FormField::ParkingNotes => &self.parking_notes,
            FormField::Website => &self.website,
            FormField::TextOk => {
                if self.text_ok {
                    "true"
                } else {
                    "false"
                }
            }
        }
    }

    /// Overwrite a field with a new input value.
    ///
    /// For `textOk` any of `"true"`, `"on"`, `"1"` counts as checked.
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Name => self.name = value,
            FormField::Mobile => self.mobile = value,
            FormField::Email => self.email = value,
            FormField::Address => self.address = value,
            FormField::ServiceType => self.service_type = value,
            FormField::Rooms => self.rooms = value,
            FormField::AddOns => self.add_ons = value,
            FormField::PreferredDays => self.preferred_days = value,
            FormField::ParkingNotes => self.parking_notes = value,
            FormField::Website => self.website = value,
            FormField::TextOk => self.text_ok = matches!(value.as_str(), "true" | "on" | "1"),
        }
    }

    /// Whether the honeypot carries anything other than whitespace.
    pub fn honeypot_filled(&self) -> bool {
        !self.website.trim().is_empty()
    }

    /// Parsed service type, if the selection is one of the menu values.
    pub fn service(&self) -> Option<ServiceType> {
        ServiceType::parse(&self.service_type)
    }
}
