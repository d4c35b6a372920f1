use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::identifiers::{TodoId, UserId};

/// A single owner-scoped todo item as persisted in the store and
/// returned on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoRecord {
    pub id: TodoId,
    pub value: String,
    pub is_complete: bool,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TodoRecord {
    /// Creates a new record for `owner`. Rejects empty or
    /// whitespace-only content; `is_complete` defaults to false at the
    /// call sites that omit it.
    pub fn new(value: &str, is_complete: bool, owner: UserId) -> Result<Self, DomainError> {
        if value.trim().is_empty() {
            return Err(DomainError::Validation(
                "Todo value cannot be empty".to_string(),
            ));
        }

        let now = Utc::now();
        Ok(Self {
            id: TodoId::new(),
            value: value.to_string(),
            is_complete,
            owner_id: owner,
            created_at: now,
            updated_at: now,
        })
    }

    /// Flips the completion flag and stamps `updated_at`. There is no
    /// settable variant; the update operation is a pure toggle.
    pub fn toggle(&mut self) {
        self.is_complete = !self.is_complete;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_defaults() {
        let owner = UserId::new();
        let todo = TodoRecord::new("buy milk", false, owner.clone()).unwrap();

        assert_eq!(todo.value, "buy milk");
        assert!(!todo.is_complete);
        assert_eq!(todo.owner_id, owner);
        assert_eq!(todo.created_at, todo.updated_at);
    }

    #[test]
    fn test_new_record_rejects_empty_value() {
        let owner = UserId::new();
        assert!(TodoRecord::new("", false, owner.clone()).is_err());
        assert!(TodoRecord::new("   ", false, owner).is_err());
    }

    #[test]
    fn test_toggle_is_involutive() {
        let mut todo = TodoRecord::new("walk the dog", false, UserId::new()).unwrap();

        todo.toggle();
        assert!(todo.is_complete);
        todo.toggle();
        assert!(!todo.is_complete);
    }

    #[test]
    fn test_wire_field_names_are_camel_case() {
        let todo = TodoRecord::new("buy milk", true, UserId::new()).unwrap();
        let json = serde_json::to_value(&todo).unwrap();

        assert!(json.get("isComplete").is_some());
        assert!(json.get("ownerId").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
    }
}
