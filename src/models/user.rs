use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Role ids seeded by the `seed_roles` migration.
pub const USER_ROLE_ID: &str = "b07ccc12-41be-40da-85ae-9cc85924ecfc";
pub const ADMIN_ROLE_ID: &str = "d6cc1662-47aa-4ad5-88b4-ce99e3b05baf";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn id(self) -> Uuid {
        let raw = match self {
            Role::User => USER_ROLE_ID,
            Role::Admin => ADMIN_ROLE_ID,
        };
        Uuid::parse_str(raw).unwrap_or_default()
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Admin => "Admin",
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct AppUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 50, message = "Username must be between 3 and 50 characters"))]
    pub username: String,
    #[validate(email(message = "Email address is not valid"))]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

impl RegisterRequest {
    /// Trims the username and email so length rules apply to what gets stored.
    pub fn normalized(self) -> Self {
        Self {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserDto {
    pub user_name: String,
    pub email: String,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_role_ids_parse() {
        assert_eq!(Role::User.id().to_string(), USER_ROLE_ID);
        assert_eq!(Role::Admin.id().to_string(), ADMIN_ROLE_ID);
        assert_ne!(Role::User.id(), Uuid::nil());
    }

    #[test]
    fn test_padded_username_is_measured_after_trimming() {
        let req = RegisterRequest {
            username: "  ab  ".into(),
            email: " ab@example.com ".into(),
            password: "long-enough".into(),
        }
        .normalized();

        assert_eq!(req.username, "ab");
        assert_eq!(req.email, "ab@example.com");
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("username"));
        assert!(!errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_register_request_validation() {
        let req = RegisterRequest {
            username: "al".into(),
            email: "not-an-email".into(),
            password: "short".into(),
        };
        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }
}
