use serde::{Deserialize, Serialize};

use domain::{TodoId, TodoRecord};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTodoRequest {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub is_complete: bool,
    #[serde(default)]
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTodoRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub code: u16,
    pub message: String,
    pub list: Vec<TodoRecord>,
}

#[derive(Debug, Serialize)]
pub struct AddResponse {
    pub success: bool,
    pub code: u16,
    pub message: String,
    pub id: TodoId,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub code: u16,
    pub message: String,
}
