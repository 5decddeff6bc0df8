//! Staff member domain model.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::validation::{field_error, PayloadReader};
use validator::{ValidateEmail, ValidationErrors};

use super::FromPayload;

text_enum! {
    /// Rota status of a staff member.
    StaffStatus {
        #[default]
        Active => "active",
        OffDuty => "off-duty",
        Leave => "leave",
        Training => "training",
    }
}

/// A member of staff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: i32,
    #[serde(flatten)]
    pub details: NewStaff,
}

/// Insert shape for a staff member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStaff {
    pub name: String,
    pub role: String,
    /// Unique across staff records.
    pub email: String,
    pub phone: String,
    pub photo: Option<String>,
    pub status: StaffStatus,
    pub qualifications: Option<Value>,
    pub certifications: Option<Value>,
    pub start_date: String,
    /// Linked login account, if any.
    pub user_id: Option<i32>,
}

impl FromPayload for NewStaff {
    fn from_payload(raw: &Value) -> Result<Self, ValidationErrors> {
        let mut r = PayloadReader::new(raw);
        let staff = Self {
            name: r.required_string("name"),
            role: r.required_string("role"),
            email: r.required_string("email").trim().to_string(),
            phone: r.required_string("phone"),
            photo: r.optional_string("photo"),
            status: r.enum_or("status", StaffStatus::Active),
            qualifications: r.optional_json("qualifications"),
            certifications: r.optional_json("certifications"),
            start_date: r.required_string("startDate"),
            user_id: r.optional_i32("userId"),
        };
        if !staff.email.is_empty() && !staff.email.validate_email() {
            r.add_error("email", field_error("email", "Invalid email format"));
        }
        r.finish()?;
        Ok(staff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn jane() -> Value {
        json!({
            "name": "Jane Cooper",
            "role": "Senior Care Worker",
            "email": "jane.cooper@carehome.org",
            "phone": "07700 900123",
            "startDate": "2021-09-01"
        })
    }

    #[test]
    fn test_from_payload_defaults() {
        let staff = NewStaff::from_payload(&jane()).unwrap();
        assert_eq!(staff.status, StaffStatus::Active);
        assert_eq!(staff.user_id, None);
    }

    #[test]
    fn test_hyphenated_status() {
        let mut raw = jane();
        raw["status"] = json!("off-duty");
        let staff = NewStaff::from_payload(&raw).unwrap();
        assert_eq!(staff.status, StaffStatus::OffDuty);
        assert_eq!(serde_json::to_value(staff.status).unwrap(), "off-duty");
    }

    #[test]
    fn test_rejects_invalid_email() {
        let mut raw = jane();
        raw["email"] = json!("jane at carehome");
        let errors = NewStaff::from_payload(&raw).unwrap_err();
        assert!(errors.field_errors().keys().any(|k| k.to_string() == "email"));
    }

    #[test]
    fn test_rejects_unknown_status() {
        let mut raw = jane();
        raw["status"] = json!("retired");
        assert!(NewStaff::from_payload(&raw).is_err());
    }
}
