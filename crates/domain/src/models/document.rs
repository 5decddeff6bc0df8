//! Document metadata domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::validation::PayloadReader;
use validator::ValidationErrors;

use super::FromPayload;

text_enum! {
    /// Filing category of a document.
    DocumentCategory {
        Policy => "policy",
        Resident => "resident",
        Staff => "staff",
        Medical => "medical",
        Education => "education",
        #[default]
        Other => "other",
    }
}

/// Metadata record for a stored document. File bytes live elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    /// Set by the store at creation.
    pub upload_date: DateTime<Utc>,
    #[serde(flatten)]
    pub file: NewDocument,
}

/// Insert shape for a document record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDocument {
    pub title: String,
    pub description: Option<String>,
    pub file_type: String,
    pub category: DocumentCategory,
    pub path: String,
    pub uploaded_by: Option<i32>,
    pub uploaded_by_name: String,
    /// Human-readable size, e.g. "1.2 MB".
    pub size: String,
    pub last_accessed: Option<DateTime<Utc>>,
    pub restricted: bool,
    pub tags: Option<Value>,
    pub metadata: Option<Value>,
}

impl FromPayload for NewDocument {
    fn from_payload(raw: &Value) -> Result<Self, ValidationErrors> {
        let mut r = PayloadReader::new(raw);
        let document = Self {
            title: r.required_string("title"),
            description: r.optional_string("description"),
            file_type: r.required_string("fileType"),
            category: r.required_enum("category"),
            path: r.required_string("path"),
            uploaded_by: r.optional_i32("uploadedBy"),
            uploaded_by_name: r.required_string("uploadedByName"),
            size: r.required_string("size"),
            last_accessed: r.optional_timestamp("lastAccessed"),
            restricted: r.bool_or("restricted", false),
            tags: r.optional_json("tags"),
            metadata: r.optional_json("metadata"),
        };
        r.finish()?;
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn policy() -> Value {
        json!({
            "title": "Safeguarding Policy 2024",
            "fileType": "pdf",
            "category": "policy",
            "path": "/docs/safeguarding-2024.pdf",
            "uploadedByName": "Admin User",
            "size": "1.2 MB"
        })
    }

    #[test]
    fn test_from_payload_defaults_unrestricted() {
        let document = NewDocument::from_payload(&policy()).unwrap();
        assert!(!document.restricted);
        assert_eq!(document.category, DocumentCategory::Policy);
        assert_eq!(document.last_accessed, None);
    }

    #[test]
    fn test_rejects_numeric_size() {
        let mut raw = policy();
        raw["size"] = json!(1024);
        let errors = NewDocument::from_payload(&raw).unwrap_err();
        assert!(errors.field_errors().keys().any(|k| k.to_string() == "size"));
    }

    #[test]
    fn test_rejects_unknown_category() {
        let mut raw = policy();
        raw["category"] = json!("finance");
        assert!(NewDocument::from_payload(&raw).is_err());
    }

    #[test]
    fn test_upload_date_serialized() {
        let document = Document {
            id: "d1".to_string(),
            upload_date: Utc::now(),
            file: NewDocument::from_payload(&policy()).unwrap(),
        };
        let json = serde_json::to_value(&document).unwrap();
        assert!(json.get("uploadDate").is_some());
        assert_eq!(json["fileType"], "pdf");
        assert_eq!(json["uploadedByName"], "Admin User");
    }
}
