use lambda_http::{Body, Request, RequestExt, Response};
use serde::de::DeserializeOwned;

use domain::{TodoRecord, UserId};

use crate::error::ApiError;
use crate::models::{
    AddResponse, AddTodoRequest, DeleteTodoRequest, ListResponse, StatusResponse,
    UpdateTodoRequest,
};
use crate::store::TodoStore;

fn json_response(status: u16, body: &impl serde::Serialize) -> Result<Response<Body>, ApiError> {
    let json = serde_json::to_string(body).map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::from(json))
        .unwrap())
}

fn parse_body<T: DeserializeOwned>(req: &Request) -> Result<T, ApiError> {
    let body_str = match req.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8(b.to_vec())
            .map_err(|_| ApiError::BadRequest("Invalid UTF-8".to_string()))?,
        Body::Empty => return Err(ApiError::BadRequest("Empty body".to_string())),
    };
    Ok(serde_json::from_str(&body_str)?)
}

/// A valid token only authorizes acting as its own subject; a caller
/// naming any other user id is refused before any field validation.
fn ensure_owner(subject: &UserId, user_id: &str, message: &str) -> Result<(), ApiError> {
    if subject.as_str() != user_id {
        return Err(ApiError::Forbidden(message.to_string()));
    }
    Ok(())
}

pub async fn get_list(
    req: Request,
    db: &dyn TodoStore,
    subject: &UserId,
) -> Result<Response<Body>, ApiError> {
    let params = req.query_string_parameters();
    let user_id = params.first("userId").unwrap_or_default();

    ensure_owner(subject, user_id, "Cannot access another user's todos")?;

    let list = db.list_todos(subject).await?;

    json_response(
        200,
        &ListResponse {
            success: true,
            code: 200,
            message: "OK".to_string(),
            list,
        },
    )
}

pub async fn add_list(
    req: Request,
    db: &dyn TodoStore,
    subject: &UserId,
) -> Result<Response<Body>, ApiError> {
    let input: AddTodoRequest = parse_body(&req)?;

    ensure_owner(
        subject,
        &input.user_id,
        "Cannot add todos for another user",
    )?;

    if input.value.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "Todo value and user ID are required".to_string(),
        ));
    }

    let todo = TodoRecord::new(&input.value, input.is_complete, subject.clone())?;
    db.put_todo(&todo).await?;

    json_response(
        201,
        &AddResponse {
            success: true,
            code: 201,
            message: "Todo added".to_string(),
            id: todo.id,
        },
    )
}

pub async fn update_list(
    req: Request,
    db: &dyn TodoStore,
    subject: &UserId,
) -> Result<Response<Body>, ApiError> {
    let input: UpdateTodoRequest = parse_body(&req)?;

    ensure_owner(
        subject,
        &input.user_id,
        "Cannot update another user's todos",
    )?;

    if input.id.is_empty() {
        return Err(ApiError::BadRequest(
            "Todo ID and user ID are required".to_string(),
        ));
    }

    db.toggle_todo(subject, &input.id).await?;

    json_response(
        200,
        &StatusResponse {
            success: true,
            code: 200,
            message: "Todo updated".to_string(),
        },
    )
}

pub async fn delete_list(
    req: Request,
    db: &dyn TodoStore,
    subject: &UserId,
) -> Result<Response<Body>, ApiError> {
    let input: DeleteTodoRequest = parse_body(&req)?;

    ensure_owner(
        subject,
        &input.user_id,
        "Cannot delete another user's todos",
    )?;

    if input.id.is_empty() {
        return Err(ApiError::BadRequest(
            "Todo ID and user ID are required".to_string(),
        ));
    }

    db.delete_todo(subject, &input.id).await?;

    json_response(
        200,
        &StatusResponse {
            success: true,
            code: 200,
            message: "Todo deleted".to_string(),
        },
    )
}
