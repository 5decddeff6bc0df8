//! User account domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::validation::PayloadReader;
use validator::{Validate, ValidationErrors};

use super::FromPayload;

text_enum! {
    /// Account role.
    UserRole {
        Admin => "admin",
        #[default]
        Staff => "staff",
    }
}

/// A stored user account.
///
/// Deliberately not `Serialize`: API responses go through [`UserProfile`],
/// which has no password field.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub name: Option<String>,
    pub position: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert shape for a user; the password is already hashed.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
    pub name: Option<String>,
    pub position: Option<String>,
}

/// Public view of a user returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub name: Option<String>,
    pub position: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            name: user.name.clone(),
            position: user.position.clone(),
            created_at: user.created_at,
        }
    }
}

/// Login credentials.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl FromPayload for LoginRequest {
    fn from_payload(raw: &Value) -> Result<Self, ValidationErrors> {
        let mut reader = PayloadReader::new(raw);
        let username = reader.required_string("username");
        let password = reader.required_string("password");
        reader.finish()?;

        Ok(Self { username, password })
    }
}

/// Registration request for a new account.
#[derive(Debug, Clone, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Username must be 1-100 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, max = 256, message = "Password must be 1-256 characters"))]
    pub password: String,

    pub role: UserRole,

    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 100, message = "Position must be at most 100 characters"))]
    pub position: Option<String>,
}

impl FromPayload for RegisterRequest {
    fn from_payload(raw: &Value) -> Result<Self, ValidationErrors> {
        let mut reader = PayloadReader::new(raw);
        let username = reader.required_string("username").trim().to_string();
        let email = reader.required_string("email").trim().to_string();
        let password = reader.required_string("password");
        let role = reader.enum_or("role", UserRole::Staff);
        let name = reader.optional_string("name");
        let position = reader.optional_string("position");
        reader.finish()?;

        let request = Self {
            username,
            email,
            password,
            role,
            name,
            position,
        };
        request.validate()?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::{SafeEmail, Username};
    use fake::Fake;
    use serde_json::json;

    fn sample_user() -> User {
        User {
            id: 1,
            username: "admin".to_string(),
            email: "admin@carehome.org".to_string(),
            password_hash: "$argon2id$secret_hash".to_string(),
            role: UserRole::Admin,
            name: Some("Admin User".to_string()),
            position: Some("System Administrator".to_string()),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_profile_never_contains_password() {
        let profile = UserProfile::from(&sample_user());
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("secret_hash"));
        assert!(!json.contains("password"));
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"role\":\"admin\""));
    }

    #[test]
    fn test_login_request_requires_both_fields() {
        assert!(LoginRequest::from_payload(&json!({"username": "admin"})).is_err());
        assert!(LoginRequest::from_payload(&json!({"password": "x"})).is_err());

        let login =
            LoginRequest::from_payload(&json!({"username": "admin", "password": "admin123"}))
                .unwrap();
        assert_eq!(login.username, "admin");
    }

    #[test]
    fn test_register_request_defaults_role_to_staff() {
        let username: String = Username().fake();
        let email: String = SafeEmail().fake();
        let request = RegisterRequest::from_payload(&json!({
            "username": username,
            "email": email,
            "password": "s3cret"
        }))
        .unwrap();

        assert_eq!(request.role, UserRole::Staff);
        assert_eq!(request.name, None);
    }

    #[test]
    fn test_register_request_rejects_bad_email() {
        let errors = RegisterRequest::from_payload(&json!({
            "username": "jo",
            "email": "not-an-email",
            "password": "s3cret"
        }))
        .unwrap_err();

        assert!(errors.field_errors().keys().any(|k| k.to_string() == "email"));
    }

    #[test]
    fn test_register_request_rejects_unknown_role() {
        let errors = RegisterRequest::from_payload(&json!({
            "username": "jo",
            "email": "jo@example.com",
            "password": "s3cret",
            "role": "superuser"
        }))
        .unwrap_err();

        assert!(errors.field_errors().keys().any(|k| k.to_string() == "role"));
    }

    #[test]
    fn test_user_role_wire_values() {
        assert_eq!(UserRole::Admin.as_str(), "admin");
        assert_eq!(serde_json::to_string(&UserRole::Staff).unwrap(), "\"staff\"");
        assert_eq!(UserRole::default(), UserRole::Staff);
    }
}
