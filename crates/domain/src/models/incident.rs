//! Incident report domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::validation::PayloadReader;
use validator::ValidationErrors;

use super::FromPayload;

text_enum! {
    /// Kind of incident.
    IncidentCategory {
        Accident => "accident",
        Behavior => "behavior",
        Security => "security",
        Safeguarding => "safeguarding",
        #[default]
        Other => "other",
    }
}

text_enum! {
    /// How serious an incident is.
    IncidentSeverity {
        #[default]
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

text_enum! {
    /// Investigation state of an incident.
    IncidentStatus {
        #[default]
        Open => "open",
        UnderInvestigation => "under-investigation",
        Resolved => "resolved",
    }
}

/// A filed incident report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: String,
    /// Set by the store at creation.
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub report: NewIncident,
}

/// Insert shape for an incident report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIncident {
    pub title: String,
    pub resident_id: Option<i32>,
    pub resident_name: String,
    /// Staff id of the reporter.
    pub reported_by: Option<i32>,
    pub reported_by_name: String,
    pub category: IncidentCategory,
    pub severity: IncidentSeverity,
    pub status: IncidentStatus,
    pub description: String,
    pub actions: Option<Value>,
    pub witnesses: Option<Value>,
    pub follow_up: Option<Value>,
    pub attachments: Option<Value>,
}

impl FromPayload for NewIncident {
    fn from_payload(raw: &Value) -> Result<Self, ValidationErrors> {
        let mut r = PayloadReader::new(raw);
        let report = Self {
            title: r.required_string("title"),
            resident_id: r.optional_i32("residentId"),
            resident_name: r.required_string("residentName"),
            reported_by: r.optional_i32("reportedBy"),
            reported_by_name: r.required_string("reportedByName"),
            category: r.required_enum("category"),
            severity: r.required_enum("severity"),
            status: r.enum_or("status", IncidentStatus::Open),
            description: r.required_string("description"),
            actions: r.optional_json("actions"),
            witnesses: r.optional_json("witnesses"),
            follow_up: r.optional_json("followUp"),
            attachments: r.optional_json("attachments"),
        };
        r.finish()?;
        Ok(report)
    }
}
