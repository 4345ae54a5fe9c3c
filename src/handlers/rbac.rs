// src/handlers/rbac.rs

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
    middleware::rbac::{RequireModule, RoleManagement},
    models::ids::{RoleId, RoleKey},
    models::rbac::{RoleMembersPayload, RolePayload},
};

// GET /api/roles
pub async fn list_roles<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    _guard: RequireModule<RoleManagement>,
) -> Result<impl IntoResponse, AppError> {
    let roles = app_state.rbac_service.list_roles(user.0.tenant).await?;
    Ok(Json(roles))
}

// POST /api/roles
pub async fn create_role<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    _guard: RequireModule<RoleManagement>,
    Json(payload): Json<RolePayload>,
) -> Result<impl IntoResponse, AppError> {
    let role = app_state.rbac_service.create_role(user.0.tenant, payload).await?;
    Ok((StatusCode::CREATED, Json(role)))
}

// GET /api/roles/{id}
pub async fn get_role<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    _guard: RequireModule<RoleManagement>,
    Path(role): Path<RoleId>,
) -> Result<impl IntoResponse, AppError> {
    let response = app_state
        .rbac_service
        .get_role(RoleKey::new(user.0.tenant, role))
        .await?;
    Ok(Json(response))
}

// PUT /api/roles/{id}
pub async fn update_role<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    _guard: RequireModule<RoleManagement>,
    Path(role): Path<RoleId>,
    Json(payload): Json<RolePayload>,
) -> Result<impl IntoResponse, AppError> {
    let role = app_state
        .rbac_service
        .update_role(RoleKey::new(user.0.tenant, role), payload)
        .await?;
    Ok(Json(role))
}

// DELETE /api/roles/{id}
pub async fn delete_role<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    _guard: RequireModule<RoleManagement>,
    Path(role): Path<RoleId>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .rbac_service
        .delete_role(RoleKey::new(user.0.tenant, role))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// PUT /api/roles/{id}/members
pub async fn set_role_members<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    _guard: RequireModule<RoleManagement>,
    Path(role): Path<RoleId>,
    Json(payload): Json<RoleMembersPayload>,
) -> Result<impl IntoResponse, AppError> {
    let members = app_state
        .rbac_service
        .assign_users_to_role(RoleKey::new(user.0.tenant, role), &payload.users)
        .await?;
    Ok(Json(members))
}
