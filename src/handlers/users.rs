// src/handlers/users.rs

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
    middleware::rbac::{RequireModule, UserManagement},
    models::auth::NewUserPayload,
    models::ids::{UserId, UserKey},
    models::rbac::UserRolesPayload,
};

// GET /api/users/me
pub async fn get_me<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let me = app_state.user_service.get_user(user.0).await?;
    Ok(Json(me))
}

// POST /api/users/me/first-login
pub async fn complete_first_login<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let roles = app_state.user_service.complete_first_login(user.0).await?;
    Ok(Json(roles))
}

// GET /api/users
pub async fn list_users<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    _guard: RequireModule<UserManagement>,
) -> Result<impl IntoResponse, AppError> {
    let users = app_state.user_service.list_users(user.0.tenant).await?;
    Ok(Json(users))
}

// POST /api/users
pub async fn add_user<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    _guard: RequireModule<UserManagement>,
    Json(payload): Json<NewUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    let created = app_state.user_service.add_user(user.0.tenant, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

// DELETE /api/users/{id}
pub async fn remove_user<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    _guard: RequireModule<UserManagement>,
    Path(target): Path<UserId>,
) -> Result<impl IntoResponse, AppError> {
    if target == user.0.user {
        return Err(AppError::Forbidden("Você não pode remover a si mesmo.".into()));
    }
    app_state
        .user_service
        .remove_user(UserKey::new(user.0.tenant, target))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/users/{id}/roles
pub async fn get_user_roles<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    _guard: RequireModule<UserManagement>,
    Path(target): Path<UserId>,
) -> Result<impl IntoResponse, AppError> {
    let roles = app_state
        .rbac_service
        .user_roles(UserKey::new(user.0.tenant, target))
        .await?;
    Ok(Json(roles))
}

// PUT /api/users/{id}/roles
pub async fn set_user_roles<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    _guard: RequireModule<UserManagement>,
    Path(target): Path<UserId>,
    Json(payload): Json<UserRolesPayload>,
) -> Result<impl IntoResponse, AppError> {
    let roles = app_state
        .rbac_service
        .set_user_roles(UserKey::new(user.0.tenant, target), &payload.roles)
        .await?;
    Ok(Json(roles))
}
