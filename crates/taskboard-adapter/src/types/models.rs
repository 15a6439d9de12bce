/*
[INPUT]:  API schema definitions and serde requirements
[OUTPUT]: Typed Rust structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Server-assigned identifier.
///
/// Backends hand these out either as strings (document ids) or integers; both
/// are kept as their textual form. The client never mints one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for ResourceId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Unsigned(n) => Self(n.to_string()),
            RawId::Signed(n) => Self(n.to_string()),
        })
    }
}

pub type TaskId = ResourceId;
pub type UserId = ResourceId;

/// Profile of the authenticated user, as returned by the auth endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(alias = "_id")]
    pub id: UserId,
    pub username: String,
    pub email: String,
}

/// A task owned by the session user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(alias = "_id")]
    pub id: TaskId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_accepts_numeric_and_document_ids() {
        let numeric: Task = serde_json::from_str(
            r#"{"id": 7, "title": "Buy milk", "description": "", "completed": false}"#,
        )
        .unwrap();
        assert_eq!(numeric.id, ResourceId::from(7));
        assert_eq!(numeric.description.as_deref(), Some(""));

        let document: Task = serde_json::from_str(
            r#"{"_id": "65f1c0ffee", "title": "Write report", "completed": true, "user": "u1", "__v": 0}"#,
        )
        .unwrap();
        assert_eq!(document.id.as_str(), "65f1c0ffee");
        assert_eq!(document.description, None);
        assert!(document.completed);
    }

    #[test]
    fn test_user_profile_from_document() {
        let user: UserProfile = serde_json::from_str(
            r#"{"_id": "u1", "username": "alice", "email": "a@b.com", "createdAt": "2024-01-01"}"#,
        )
        .unwrap();
        assert_eq!(user.id.as_str(), "u1");
        assert_eq!(user.username, "alice");
    }

    #[test]
    fn test_missing_completed_defaults_to_false() {
        let task: Task = serde_json::from_str(r#"{"id": "1", "title": "abc"}"#).unwrap();
        assert!(!task.completed);
    }
}
