use crate::api::AppState;
use crate::api::extract::{Json, Path, Query};
use crate::api::middleware::AuthUser;
use crate::api::schemas::envelope::Envelope;
use crate::api::schemas::todos::{CreateTodo, TodoQuery, UpdateTodo};
use crate::error::Result;
use crate::services::todo_service::{CreateTodoParams, UpdateTodoParams};
use axum::{extract::State, http::StatusCode, response::IntoResponse};
use uuid::Uuid;

pub async fn list_todos(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<TodoQuery>,
) -> Result<impl IntoResponse> {
    let todos = state.todo_service.list(auth_user.user_id, query.into()).await?;

    Ok(Json(Envelope::ok("todos fetched", todos)))
}

pub async fn create_todo(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateTodo>,
) -> Result<impl IntoResponse> {
    let params = CreateTodoParams {
        title: payload.title,
        description: payload.description,
        priority: payload.priority,
        due_date: payload.due_date,
    };

    let todo = state.todo_service.create(auth_user.user_id, params).await?;

    Ok((StatusCode::CREATED, Json(Envelope::ok("todo created", todo))))
}

pub async fn update_todo(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(todo_id): Path<Uuid>,
    Json(payload): Json<UpdateTodo>,
) -> Result<impl IntoResponse> {
    let params = UpdateTodoParams {
        title: payload.title,
        done: payload.done,
        priority: payload.priority,
        description: payload.description,
        due_date: payload.due_date,
    };

    let todo = state.todo_service.update(auth_user.user_id, todo_id, params).await?;

    Ok(Json(Envelope::ok("todo updated", todo)))
}

pub async fn delete_todo(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(todo_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    state.todo_service.delete(auth_user.user_id, todo_id).await?;

    Ok(Json(Envelope::message_only("todo deleted")))
}
