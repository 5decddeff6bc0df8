//! Resident domain model.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::validation::PayloadReader;
use validator::ValidationErrors;

use super::FromPayload;

text_enum! {
    /// Where a resident currently is.
    ResidentStatus {
        #[default]
        Present => "present",
        School => "school",
        Appointment => "appointment",
        Leave => "leave",
        Absent => "absent",
    }
}

/// A resident of the home.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resident {
    pub id: i32,
    #[serde(flatten)]
    pub profile: NewResident,
}

/// Insert shape for a resident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResident {
    pub name: String,
    pub age: i32,
    pub date_of_birth: String,
    pub gender: String,
    pub room: String,
    pub status: ResidentStatus,
    pub admission_date: String,
    pub photo: Option<String>,
    /// Staff id of the assigned key worker; not checked against the staff table.
    pub key_worker_id: Option<i32>,
    pub notes: Option<String>,
    pub medical_info: Option<Value>,
    pub education_info: Option<Value>,
    pub contact_info: Option<Value>,
}

impl FromPayload for NewResident {
    fn from_payload(raw: &Value) -> Result<Self, ValidationErrors> {
        let mut r = PayloadReader::new(raw);
        let resident = Self {
            name: r.required_string("name"),
            age: r.required_i32("age"),
            date_of_birth: r.required_string("dateOfBirth"),
            gender: r.required_string("gender"),
            room: r.required_string("room"),
            status: r.enum_or("status", ResidentStatus::Present),
            admission_date: r.required_string("admissionDate"),
            photo: r.optional_string("photo"),
            key_worker_id: r.optional_i32("keyWorkerId"),
            notes: r.optional_string("notes"),
            medical_info: r.optional_json("medicalInfo"),
            education_info: r.optional_json("educationInfo"),
            contact_info: r.optional_json("contactInfo"),
        };
        r.finish()?;
        Ok(resident)
    }
}
