use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::models::{HealthBody, TodoListResponse, TodoRequest, TodoResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use domain::{ensure_found, ensure_owner, TodoDraft, TodoId, TodoPatch, TODO_ENTITY};
use tracing::{debug, info};

/// ヘルスチェック（認証不要）
pub async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

/// GET /todos
///
/// 呼び出し元に関係なく全件を返す。
pub async fn list_todos(
    user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<TodoListResponse>, ApiError> {
    let todos = state.store.find_all().await?;
    debug!(user_id = %user.user_id, count = todos.len(), "listed todos");
    Ok(Json(TodoListResponse { todos }))
}

/// GET /todos/:id
pub async fn get_todo(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TodoResponse>, ApiError> {
    let id = TodoId::parse(&id)?;
    let todo = ensure_found(state.store.find_by_id(&id).await?, TODO_ENTITY)?;
    Ok(Json(TodoResponse { todo }))
}

/// POST /todos
///
/// `owner` はボディの値に関係なく呼び出し元になる。
pub async fn create_todo(
    user: AuthUser,
    State(state): State<AppState>,
    body: Result<Json<TodoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoResponse>), ApiError> {
    let Json(request) = body?;
    let draft = TodoDraft::from_payload(request.todo, &user.user_id)?;

    let todo = state.store.create(draft).await?;
    info!(todo_id = %todo.id, user_id = %user.user_id, "todo created");

    Ok((StatusCode::CREATED, Json(TodoResponse { todo })))
}

/// PATCH /todos/:id
///
/// 存在確認 → 所有者確認 → マージ → 保存の順。空文字の値は「変更なし」。
/// 更新後の状態は返さないので、必要ならクライアントが取り直す。
pub async fn update_todo(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<TodoRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let id = TodoId::parse(&id)?;
    let Json(request) = body?;
    let patch = TodoPatch::from_payload(request.todo);

    let current = ensure_found(state.store.find_by_id(&id).await?, TODO_ENTITY)?;
    ensure_owner(&current, &user.user_id)?;

    let updated = patch.merge_into(current)?;
    state.store.update(&updated).await?;
    info!(todo_id = %id, user_id = %user.user_id, "todo updated");

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /todos/:id
pub async fn delete_todo(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = TodoId::parse(&id)?;

    let current = ensure_found(state.store.find_by_id(&id).await?, TODO_ENTITY)?;
    ensure_owner(&current, &user.user_id)?;

    state.store.delete(&current).await?;
    info!(todo_id = %id, user_id = %user.user_id, "todo deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// 未定義のルート
pub async fn fallback() -> ApiError {
    ApiError::NotFound("Route not found".to_string())
}
