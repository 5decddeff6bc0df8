//! Daily log domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::validation::PayloadReader;
use validator::ValidationErrors;

use super::FromPayload;

text_enum! {
    /// Subject area of a daily log entry.
    DailyLogCategory {
        #[default]
        General => "general",
        Health => "health",
        Education => "education",
        Behavior => "behavior",
        Activity => "activity",
    }
}

/// A daily log entry about a resident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    pub id: String,
    /// Set by the store at creation.
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub entry: NewDailyLog,
}

/// Insert shape for a daily log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDailyLog {
    pub resident_id: i32,
    pub resident_name: String,
    pub staff_id: Option<i32>,
    pub staff_name: String,
    pub category: DailyLogCategory,
    pub content: String,
    pub important: bool,
    pub mood: Option<String>,
    pub activities: Option<Value>,
    pub attachments: Option<Value>,
}

impl FromPayload for NewDailyLog {
    fn from_payload(raw: &Value) -> Result<Self, ValidationErrors> {
        let mut r = PayloadReader::new(raw);
        let entry = Self {
            resident_id: r.required_i32("residentId"),
            resident_name: r.required_string("residentName"),
            staff_id: r.optional_i32("staffId"),
            staff_name: r.required_string("staffName"),
            category: r.required_enum("category"),
            content: r.required_string("content"),
            important: r.bool_or("important", false),
            mood: r.optional_string("mood"),
            activities: r.optional_json("activities"),
            attachments: r.optional_json("attachments"),
        };
        r.finish()?;
        Ok(entry)
    }
}
