//! Types for authentication

use serde::{Deserialize, Serialize};

use crate::validation::{ValidationErrors, Validator};

/// The administrator account behind a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUser {
    /// The user ID
    #[serde(rename = "_id")]
    pub id: String,

    /// The user's email address
    #[serde(default)]
    pub email: String,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The user's role
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Login name, when the API reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Login form values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginCredentials {
    /// Login name
    pub username: String,

    /// Password
    pub password: String,
}

impl LoginCredentials {
    /// Create credentials from a username and password
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    /// Check the login form rules
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        Validator::new()
            .min_len(
                "username",
                &self.username,
                3,
                "Username must be at least 3 characters",
            )
            .min_len(
                "password",
                &self.password,
                6,
                "Password must be at least 6 characters",
            )
            .finish()
    }
}

/// Response of `POST /auth/login`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent calls
    pub token: String,

    /// The signed in user
    pub user: AdminUser,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn login_rules() {
        let errors = LoginCredentials::new("ab", "12345").validate().unwrap_err();
        assert_eq!(
            errors.get("username"),
            Some("Username must be at least 3 characters")
        );
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 6 characters")
        );
        assert!(LoginCredentials::new("admin", "secret1").validate().is_ok());
    }

    #[test]
    fn user_reads_mongo_id() {
        let user: AdminUser = serde_json::from_value(json!({
            "_id": "abc",
            "email": "admin@example.com",
            "name": "Admin",
            "role": "admin"
        }))
        .unwrap();
        assert_eq!(user.id, "abc");
        assert_eq!(user.username, None);
    }
}
