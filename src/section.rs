use serde::{Deserialize, Serialize};

/// Number of steps in the wizard. Steps are numbered from 1.
pub const TOTAL_STEPS: u8 = 4;

/// Telemetry label for a wizard step
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Section {
    Personal,
    Address,
    Preferences,
    Review,
}

impl Section {
    pub const ALL: [Section; TOTAL_STEPS as usize] = [
        Section::Personal,
        Section::Address,
        Section::Preferences,
        Section::Review,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Personal => "personal",
            Section::Address => "address",
            Section::Preferences => "preferences",
            Section::Review => "review",
        }
    }

    /// Heading shown above the step
    pub fn title(&self) -> &'static str {
        match self {
            Section::Personal => "Personal Information",
            Section::Address => "Address",
            Section::Preferences => "Preferences",
            Section::Review => "Review & Submit",
        }
    }

    pub fn step(&self) -> u8 {
        match self {
            Section::Personal => 1,
            Section::Address => 2,
            Section::Preferences => 3,
            Section::Review => 4,
        }
    }
}

/// Step-to-section lookup. Returns `None` outside `1..=TOTAL_STEPS`.
pub fn section_for_step(step: u8) -> Option<Section> {
    match step {
        1 => Some(Section::Personal),
        2 => Some(Section::Address),
        3 => Some(Section::Preferences),
        4 => Some(Section::Review),
        _ => None,
    }
}
