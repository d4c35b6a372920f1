use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use chrono::{DateTime, Utc};

use domain::{TodoId, TodoRecord, UserId};

use crate::error::ApiError;

/// The document-store collaborator. Every operation is scoped by the
/// owning user; records are never visible across owners.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// All records for `owner`, in insertion order.
    async fn list_todos(&self, owner: &UserId) -> Result<Vec<TodoRecord>, ApiError>;

    async fn put_todo(&self, todo: &TodoRecord) -> Result<(), ApiError>;

    /// Flips `isComplete` on `(owner, id)` and stamps `updatedAt`.
    async fn toggle_todo(&self, owner: &UserId, todo_id: &str) -> Result<(), ApiError>;

    async fn delete_todo(&self, owner: &UserId, todo_id: &str) -> Result<(), ApiError>;
}

/// DynamoDB single-table adapter: `PK = USER#{owner}`, `SK = TODO#{id}`.
/// ULID ids make the SK range query come back in creation order.
#[derive(Clone)]
pub struct DynamoStore {
    client: Client,
    table_name: String,
}

impl DynamoStore {
    pub async fn new(table_name: &str) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        let client = Client::new(&config);
        Self {
            client,
            table_name: table_name.to_string(),
        }
    }

    fn keys(owner: &UserId, todo_id: &str) -> (AttributeValue, AttributeValue) {
        (
            AttributeValue::S(format!("USER#{owner}")),
            AttributeValue::S(format!("TODO#{todo_id}")),
        )
    }
}

#[async_trait]
impl TodoStore for DynamoStore {
    async fn list_todos(&self, owner: &UserId) -> Result<Vec<TodoRecord>, ApiError> {
        let result = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
            .expression_attribute_values(":pk", AttributeValue::S(format!("USER#{owner}")))
            .expression_attribute_values(":sk_prefix", AttributeValue::S("TODO#".to_string()))
            .send()
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        let todos = result.items().iter().filter_map(item_to_todo).collect();

        Ok(todos)
    }

    async fn put_todo(&self, todo: &TodoRecord) -> Result<(), ApiError> {
        let (pk, sk) = Self::keys(&todo.owner_id, todo.id.as_str());

        self.client
            .put_item()
            .table_name(&self.table_name)
            .item("PK", pk)
            .item("SK", sk)
            .item("id", AttributeValue::S(todo.id.to_string()))
            .item("value", AttributeValue::S(todo.value.clone()))
            .item("isComplete", AttributeValue::Bool(todo.is_complete))
            .item("ownerId", AttributeValue::S(todo.owner_id.to_string()))
            .item("createdAt", AttributeValue::S(todo.created_at.to_rfc3339()))
            .item("updatedAt", AttributeValue::S(todo.updated_at.to_rfc3339()))
            .send()
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        Ok(())
    }

    async fn toggle_todo(&self, owner: &UserId, todo_id: &str) -> Result<(), ApiError> {
        let (pk, sk) = Self::keys(owner, todo_id);

        // DynamoDB cannot negate a bool in an update expression, so
        // read the current value first. A delete racing in between
        // trips the existence condition and reports NotFound.
        let current = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("PK", pk.clone())
            .key("SK", sk.clone())
            .send()
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        let item = current.item().ok_or(ApiError::NotFound)?;
        let is_complete = item
            .get("isComplete")
            .and_then(|v| v.as_bool().ok())
            .copied()
            .ok_or_else(|| ApiError::Internal("Malformed todo item".to_string()))?;

        self.client
            .update_item()
            .table_name(&self.table_name)
            .key("PK", pk)
            .key("SK", sk)
            .condition_expression("attribute_exists(PK)")
            .update_expression("SET isComplete = :c, updatedAt = :u")
            .expression_attribute_values(":c", AttributeValue::Bool(!is_complete))
            .expression_attribute_values(":u", AttributeValue::S(Utc::now().to_rfc3339()))
            .send()
            .await
            .map_err(|e| match e.as_service_error() {
                Some(se) if se.is_conditional_check_failed_exception() => ApiError::NotFound,
                _ => ApiError::Internal(e.to_string()),
            })?;

        Ok(())
    }

    async fn delete_todo(&self, owner: &UserId, todo_id: &str) -> Result<(), ApiError> {
        let (pk, sk) = Self::keys(owner, todo_id);

        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("PK", pk)
            .key("SK", sk)
            .condition_expression("attribute_exists(PK)")
            .send()
            .await
            .map_err(|e| match e.as_service_error() {
                Some(se) if se.is_conditional_check_failed_exception() => ApiError::NotFound,
                _ => ApiError::Internal(e.to_string()),
            })?;

        Ok(())
    }
}

fn item_to_todo(item: &HashMap<String, AttributeValue>) -> Option<TodoRecord> {
    Some(TodoRecord {
        id: TodoId::parse(item.get("id")?.as_s().ok()?).ok()?,
        value: item.get("value")?.as_s().ok()?.clone(),
        is_complete: *item.get("isComplete")?.as_bool().ok()?,
        owner_id: UserId::from_string(item.get("ownerId")?.as_s().ok()?.clone()),
        created_at: parse_timestamp(item.get("createdAt")?.as_s().ok()?)?,
        updated_at: parse_timestamp(item.get("updatedAt")?.as_s().ok()?)?,
    })
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// In-memory store for local development and tests. A `Vec` keeps
/// insertion order the same way the ULID-sorted range query does.
#[derive(Default)]
pub struct MemoryTodoStore {
    records: Mutex<Vec<TodoRecord>>,
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn list_todos(&self, owner: &UserId) -> Result<Vec<TodoRecord>, ApiError> {
        let records = self.records.lock().unwrap();
        Ok(records
            .iter()
            .filter(|t| &t.owner_id == owner)
            .cloned()
            .collect())
    }

    async fn put_todo(&self, todo: &TodoRecord) -> Result<(), ApiError> {
        self.records.lock().unwrap().push(todo.clone());
        Ok(())
    }

    async fn toggle_todo(&self, owner: &UserId, todo_id: &str) -> Result<(), ApiError> {
        let mut records = self.records.lock().unwrap();
        let todo = records
            .iter_mut()
            .find(|t| &t.owner_id == owner && t.id.as_str() == todo_id)
            .ok_or(ApiError::NotFound)?;
        todo.toggle();
        Ok(())
    }

    async fn delete_todo(&self, owner: &UserId, todo_id: &str) -> Result<(), ApiError> {
        let mut records = self.records.lock().unwrap();
        let pos = records
            .iter()
            .position(|t| &t.owner_id == owner && t.id.as_str() == todo_id)
            .ok_or(ApiError::NotFound)?;
        records.remove(pos);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_scopes_by_owner() {
        let store = MemoryTodoStore::default();
        let alice = UserId::new();
        let bob = UserId::new();

        let todo = TodoRecord::new("buy milk", false, alice.clone()).unwrap();
        store.put_todo(&todo).await.unwrap();

        assert_eq!(store.list_todos(&alice).await.unwrap().len(), 1);
        assert!(store.list_todos(&bob).await.unwrap().is_empty());

        // Another owner cannot toggle or delete the record either.
        assert!(matches!(
            store.toggle_todo(&bob, todo.id.as_str()).await,
            Err(ApiError::NotFound)
        ));
        assert!(matches!(
            store.delete_todo(&bob, todo.id.as_str()).await,
            Err(ApiError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_memory_store_preserves_insertion_order() {
        let store = MemoryTodoStore::default();
        let owner = UserId::new();

        for value in ["first", "second", "third"] {
            let todo = TodoRecord::new(value, false, owner.clone()).unwrap();
            store.put_todo(&todo).await.unwrap();
        }

        let values: Vec<String> = store
            .list_todos(&owner)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.value)
            .collect();
        assert_eq!(values, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_memory_store_toggle_stamps_updated_at() {
        let store = MemoryTodoStore::default();
        let owner = UserId::new();

        let todo = TodoRecord::new("buy milk", false, owner.clone()).unwrap();
        store.put_todo(&todo).await.unwrap();
        store.toggle_todo(&owner, todo.id.as_str()).await.unwrap();

        let listed = store.list_todos(&owner).await.unwrap();
        assert!(listed[0].is_complete);
        assert!(listed[0].updated_at >= todo.updated_at);
    }
}
