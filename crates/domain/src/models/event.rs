//! Calendar event domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::validation::{field_error, PayloadReader};
use validator::ValidationErrors;

use super::FromPayload;

text_enum! {
    /// Kind of calendar event.
    EventType {
        Appointment => "appointment",
        Activity => "activity",
        Education => "education",
        Medication => "medication",
        Staff => "staff",
        #[default]
        Other => "other",
    }
}

/// A scheduled calendar event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    #[serde(flatten)]
    pub details: NewEvent,
}

/// Insert shape for a calendar event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub all_day: bool,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub attendees: Value,
    pub location: Option<String>,
    pub created_by: Option<i32>,
    pub recurrence: Option<Value>,
    pub notifications: Option<Value>,
}

impl FromPayload for NewEvent {
    fn from_payload(raw: &Value) -> Result<Self, ValidationErrors> {
        let mut r = PayloadReader::new(raw);
        let event = Self {
            title: r.required_string("title"),
            description: r.optional_string("description"),
            start: r.required_timestamp("start"),
            end: r.required_timestamp("end"),
            all_day: r.bool_or("allDay", false),
            event_type: r.required_enum("type"),
            attendees: r.required_json("attendees"),
            location: r.optional_string("location"),
            created_by: r.optional_i32("createdBy"),
            recurrence: r.optional_json("recurrence"),
            notifications: r.optional_json("notifications"),
        };
        // Only compare timestamps that actually parsed
        let both_parsed = !r.has_error("start") && !r.has_error("end");
        if both_parsed && event.end < event.start {
            r.add_error("end", field_error("invalid_range", "End must not be before start"));
        }
        r.finish()?;
        Ok(event)
    }
}
