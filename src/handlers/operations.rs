// src/handlers/operations.rs
//
// Tarefas e eventos. O acesso ao módulo é verificado pelos serviços,
// dentro da mesma transação da operação.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    db::Store,
    middleware::auth::AuthenticatedUser,
    models::ids::{EventId, TaskId},
    models::operations::{CreateTaskPayload, EventPayload, UpdateTaskPayload},
};

// ---
// Tarefas
// ---

// GET /api/tasks (criadas por mim)
pub async fn list_created_tasks<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let tasks = app_state.task_service.created_tasks(user.0).await?;
    Ok(Json(tasks))
}

// GET /api/tasks/assigned
pub async fn list_assigned_tasks<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let tasks = app_state.task_service.assigned_tasks(user.0).await?;
    Ok(Json(tasks))
}

// POST /api/tasks
pub async fn create_task<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateTaskPayload>,
) -> Result<impl IntoResponse, AppError> {
    let task = app_state.task_service.create_task(user.0, payload).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

// GET /api/tasks/{id}
pub async fn get_task<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    Path(id): Path<TaskId>,
) -> Result<impl IntoResponse, AppError> {
    let task = app_state.task_service.get_task(user.0, id).await?;
    Ok(Json(task))
}

// PUT /api/tasks/{id}
pub async fn update_task<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    Path(id): Path<TaskId>,
    Json(payload): Json<UpdateTaskPayload>,
) -> Result<impl IntoResponse, AppError> {
    let task = app_state.task_service.update_task(user.0, id, payload).await?;
    Ok(Json(task))
}

// POST /api/tasks/{id}/complete
pub async fn complete_task<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    Path(id): Path<TaskId>,
) -> Result<impl IntoResponse, AppError> {
    let task = app_state.task_service.complete_task(user.0, id).await?;
    Ok(Json(task))
}

// DELETE /api/tasks/{id}
pub async fn delete_task<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    Path(id): Path<TaskId>,
) -> Result<impl IntoResponse, AppError> {
    app_state.task_service.delete_task(user.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Eventos
// ---

// GET /api/events
pub async fn list_events<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let events = app_state.event_service.list_events(user.0).await?;
    Ok(Json(events))
}

// POST /api/events
pub async fn create_event<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    Json(payload): Json<EventPayload>,
) -> Result<impl IntoResponse, AppError> {
    let event = app_state.event_service.create_event(user.0, payload).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

// GET /api/events/{id}
pub async fn get_event<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    Path(id): Path<EventId>,
) -> Result<impl IntoResponse, AppError> {
    let event = app_state.event_service.get_event(user.0, id).await?;
    Ok(Json(event))
}

// PUT /api/events/{id}
pub async fn update_event<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    Path(id): Path<EventId>,
    Json(payload): Json<EventPayload>,
) -> Result<impl IntoResponse, AppError> {
    let event = app_state.event_service.update_event(user.0, id, payload).await?;
    Ok(Json(event))
}

// DELETE /api/events/{id}
pub async fn delete_event<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    Path(id): Path<EventId>,
) -> Result<impl IntoResponse, AppError> {
    app_state.event_service.delete_event(user.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
