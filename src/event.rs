use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::section::Section;

/// Kind of interaction being reported to the collector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventType {
    PageLoad,
    Click,
    Error,
    Idle,
    TimeSpent,
    Backtrack,
    Submit,
}

/// Caller-supplied overlay for an event. Unset fields fall back to defaults
/// (section) or are left out of the record entirely.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventData {
    pub section: Option<Section>,
    pub element: Option<String>,
    pub field: Option<String>,
    pub duration: Option<u64>,
    pub from_section: Option<Section>,
    pub to_section: Option<Section>,
}

impl EventData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn section(mut self, section: Section) -> Self {
        self.section = Some(section);
        self
    }

    pub fn element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }

    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn duration(mut self, secs: u64) -> Self {
        self.duration = Some(secs);
        self
    }

    pub fn transition(mut self, from: Section, to: Section) -> Self {
        self.from_section = Some(from);
        self.to_section = Some(to);
        self
    }
}

/// A single record as posted to `/log-event`. Absent optional fields are
/// omitted from the JSON body, never sent as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_type: EventType,
    pub timestamp: String,
    pub section: Section,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_section: Option<Section>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_section: Option<Section>,
}

impl EventRecord {
    /// Overlay `data` onto the defaults. `section` comes from `default_section`
    /// when the overlay does not name one; empty strings count as unset.
    pub fn build(
        event_type: EventType,
        data: EventData,
        default_section: Section,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            event_type,
            timestamp: format_timestamp(at),
            section: data.section.unwrap_or(default_section),
            element: data.element.filter(|s| !s.is_empty()),
            field: data.field.filter(|s| !s.is_empty()),
            duration: data.duration,
            from_section: data.from_section,
            to_section: data.to_section,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// ISO-8601 UTC with millisecond precision, e.g. `2024-05-01T10:00:00.000Z`
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::Value;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_timestamp_format() {
        assert_eq!(format_timestamp(at()), "2024-05-01T10:00:00.000Z");
    }

    #[test]
    fn test_section_defaults_to_current() {
        let record = EventRecord::build(EventType::Click, EventData::new(), Section::Address, at());
        assert_eq!(record.section, Section::Address);

        let record = EventRecord::build(
            EventType::Submit,
            EventData::new().section(Section::Review),
            Section::Address,
            at(),
        );
        assert_eq!(record.section, Section::Review);
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let record = EventRecord::build(EventType::PageLoad, EventData::new(), Section::Personal, at());
        let json: Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
        let obj = json.as_object().unwrap();

        assert_eq!(obj.len(), 3);
        assert_eq!(obj["event_type"], "page_load");
        assert_eq!(obj["timestamp"], "2024-05-01T10:00:00.000Z");
        assert_eq!(obj["section"], "personal");
        for key in ["element", "field", "duration", "from_section", "to_section"] {
            assert!(!obj.contains_key(key), "{key} should be omitted");
        }
    }

    #[test]
    fn test_present_fields_are_included() {
        let record = EventRecord::build(
            EventType::Backtrack,
            EventData::new()
                .section(Section::Preferences)
                .transition(Section::Preferences, Section::Address),
            Section::Personal,
            at(),
        );
        let json: Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
        assert_eq!(json["event_type"], "backtrack");
        assert_eq!(json["section"], "preferences");
        assert_eq!(json["from_section"], "preferences");
        assert_eq!(json["to_section"], "address");
        assert!(json.get("duration").is_none());
    }

    #[test]
    fn test_zero_duration_is_kept() {
        let record = EventRecord::build(
            EventType::TimeSpent,
            EventData::new().duration(0),
            Section::Personal,
            at(),
        );
        let json: Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
        assert_eq!(json["duration"], 0);
    }

    #[test]
    fn test_empty_strings_are_dropped() {
        let record = EventRecord::build(
            EventType::Click,
            EventData::new().element(""),
            Section::Personal,
            at(),
        );
        assert_eq!(record.element, None);
    }

    #[test]
    fn test_event_type_names() {
        assert_eq!(EventType::PageLoad.to_string(), "page_load");
        assert_eq!(EventType::TimeSpent.to_string(), "time_spent");
        assert_eq!(serde_json::to_string(&EventType::Idle).unwrap(), "\"idle\"");
    }
}
