//! Pure per-step validation.
//!
//! `validate` only reads field values and returns which fields fail; applying
//! the result to the screen and reporting errors is the wizard's job.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::section::{section_for_step, Section};

/// Addressable form inputs, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Field {
    Name,
    Dob,
    Street,
    City,
    Notifications,
    Terms,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Name,
        Field::Dob,
        Field::Street,
        Field::City,
        Field::Notifications,
        Field::Terms,
    ];

    /// Identifier used in error events and for the `error-<field>` slot
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Dob => "dob",
            Field::Street => "street",
            Field::City => "city",
            Field::Notifications => "notifications",
            Field::Terms => "terms",
        }
    }

    pub fn error_slot(&self) -> String {
        format!("error-{}", self.as_str())
    }

    pub fn section(&self) -> Section {
        match self {
            Field::Name | Field::Dob => Section::Personal,
            Field::Street | Field::City => Section::Address,
            Field::Notifications => Section::Preferences,
            Field::Terms => Section::Review,
        }
    }
}

/// Notification channels offered on the preferences step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Notification {
    Email,
    Sms,
    Push,
}

impl Notification {
    pub const ALL: [Notification; 3] = [Notification::Email, Notification::Sms, Notification::Push];

    pub fn label(&self) -> &'static str {
        match self {
            Notification::Email => "Email",
            Notification::Sms => "SMS",
            Notification::Push => "Push notifications",
        }
    }
}

/// Snapshot of every input on the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    pub name: String,
    pub dob: String,
    pub street: String,
    pub city: String,
    pub notifications: BTreeSet<Notification>,
    pub terms: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("Name is required")]
    NameRequired,
    #[error("Date of birth is required")]
    DobRequired,
    #[error("Street address is required")]
    StreetRequired,
    #[error("City is required")]
    CityRequired,
    #[error("Please select at least one notification option")]
    NotificationRequired,
    #[error("You must agree to the terms")]
    TermsRequired,
}

/// Failing fields for one step, ordered by field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub errors: BTreeMap<Field, FieldError>,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn require(&mut self, ok: bool, field: Field, error: FieldError) {
        if !ok {
            self.errors.insert(field, error);
        }
    }
}

pub fn validate(step: u8, values: &FieldValues) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();
    match section_for_step(step) {
        Some(Section::Personal) => {
            outcome.require(!values.name.trim().is_empty(), Field::Name, FieldError::NameRequired);
            // date inputs yield either a full date or nothing, so no trim
            outcome.require(!values.dob.is_empty(), Field::Dob, FieldError::DobRequired);
        }
        Some(Section::Address) => {
            outcome.require(
                !values.street.trim().is_empty(),
                Field::Street,
                FieldError::StreetRequired,
            );
            outcome.require(!values.city.trim().is_empty(), Field::City, FieldError::CityRequired);
        }
        Some(Section::Preferences) => {
            outcome.require(
                !values.notifications.is_empty(),
                Field::Notifications,
                FieldError::NotificationRequired,
            );
        }
        Some(Section::Review) => {
            outcome.require(values.terms, Field::Terms, FieldError::TermsRequired);
        }
        None => {}
    }
    outcome
}
