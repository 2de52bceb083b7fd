//! User account models.
//!
//! Mirrors the backend's user serializer: the password only ever travels
//! in the registration payload and never comes back in a response.

use serde::{Deserialize, Serialize};

/// A user account as returned by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub is_staff: bool,
}

impl User {
    /// Full name when available, username otherwise.
    pub fn display_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or("").trim();
        let last = self.last_name.as_deref().unwrap_or("").trim();
        let full = format!("{} {}", first, last);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Registration payload. The password is write-only on the backend.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_full_name() {
        let user = User {
            id: 1,
            username: "jdoe".to_string(),
            first_name: Some("Jane".to_string()),
            last_name: Some("Doe".to_string()),
            ..Default::default()
        };
        assert_eq!(user.display_name(), "Jane Doe");
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let user = User {
            id: 1,
            username: "jdoe".to_string(),
            ..Default::default()
        };
        assert_eq!(user.display_name(), "jdoe");

        let blank = User {
            id: 2,
            username: "worker1".to_string(),
            first_name: Some("".to_string()),
            last_name: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(blank.display_name(), "worker1");
    }

    #[test]
    fn test_parse_user_response() {
        let json = r#"{"id": 3, "username": "admin", "first_name": "", "last_name": "", "email": "admin@example.com", "is_staff": true}"#;
        let user: User = serde_json::from_str(json).expect("Failed to parse user JSON");
        assert_eq!(user.id, 3);
        assert!(user.is_staff);
        assert_eq!(user.email.as_deref(), Some("admin@example.com"));
    }
}
