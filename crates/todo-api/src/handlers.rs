use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use domain::{ListTodosParams, NewTodo, Todo, TodoId, TodoQuery};
use serde::Serialize;
use serde_json::{Map, Value};
use shared::AppError;
use tracing::{info, instrument};

use crate::{error::ApiError, state::AppState};

/// POST /api/todos レスポンス
#[derive(Debug, Serialize)]
pub struct CreateTodoResponse {
    pub id: TodoId,
}

#[derive(Debug, Serialize)]
struct HealthBody {
    status: &'static str,
}

/// ヘルスチェック用ハンドラ
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthBody { status: "ok" }))
}

/// GET /api/todos
///
/// owner / body / category は大文字小文字を区別しない部分一致（AND 結合）。
/// sortby（既定 category）と sortorder（既定 asc）で並び替える。
/// 同じパラメータが複数あれば最初の値を使う。
#[instrument(skip(state))]
pub async fn list_todos(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let query = TodoQuery::from(ListTodosParams::from_pairs(pairs));
    let todos = state
        .repository()
        .find(&query)
        .await
        .map_err(|e| state.reject(e))?;

    info!(result_count = todos.len(), "todos listed");
    Ok(Json(todos))
}

/// GET /api/todos/:id
#[instrument(skip(state))]
pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    find_todo(&state, &id)
        .await
        .map(Json)
        .map_err(|e| state.reject(e))
}

async fn find_todo(state: &AppState, raw_id: &str) -> Result<Todo, AppError> {
    let id = TodoId::parse(raw_id)?;
    state
        .repository()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("The requested todo was not found".to_string()))
}

/// POST /api/todos
///
/// 本文は自前でパースする（不正な JSON も 400 とし、メッセージに本文を含めるため）。
/// JSON オブジェクト以外（配列など）は受け付けない。
#[instrument(skip(state, body))]
pub async fn create_todo(
    State(state): State<AppState>,
    body: String,
) -> Result<impl IntoResponse, ApiError> {
    let id = add_new_todo(&state, &body)
        .await
        .map_err(|e| state.reject(e))?;

    info!(todo_id = %id, "todo created");
    Ok((StatusCode::CREATED, Json(CreateTodoResponse { id })))
}

async fn add_new_todo(state: &AppState, body: &str) -> Result<TodoId, AppError> {
    let invalid = |e: serde_json::Error| {
        AppError::BadRequest(format!("Invalid JSON: {e}; body was {body}"))
    };
    let object: Map<String, Value> = serde_json::from_str(body).map_err(invalid)?;
    let payload: NewTodo = serde_json::from_value(Value::Object(object)).map_err(invalid)?;
    let draft = payload.validate(body)?;
    state.repository().insert(draft).await
}

/// DELETE /api/todos/:id
///
/// 不正な ID も「存在しない」と同じく 404 を返す。
#[instrument(skip(state))]
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let deleted = match TodoId::parse(&id) {
        Ok(todo_id) => state
            .repository()
            .delete(&todo_id)
            .await
            .map_err(|e| state.reject(e))?,
        Err(_) => 0,
    };

    if deleted != 1 {
        return Err(state.reject(AppError::NotFound(format!(
            "Was unable to delete ID {id}; perhaps illegal ID or an ID for an item not in the system?"
        ))));
    }

    info!(todo_id = %id, "todo deleted");
    Ok(StatusCode::OK)
}
