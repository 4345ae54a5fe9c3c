// src/handlers/modules.rs

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
    middleware::rbac::{ModuleAdmin, ModuleStore, RequireModule},
    models::ids::{ModuleId, RoleId, RoleKey},
    models::rbac::ModuleGranteesPayload,
};

// GET /api/modules (catálogo completo)
pub async fn list_catalog<S: Store>(
    State(app_state): State<AppState<S>>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let modules = app_state.module_service.catalog().await?;
    Ok(Json(modules))
}

// GET /api/modules/accessible (painel do usuário)
pub async fn list_accessible<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let modules = app_state.access_service.accessible_modules(user.0).await?;
    Ok(Json(modules))
}

// GET /api/modules/store (módulos que ainda podem ser ativados)
pub async fn list_available<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    _guard: RequireModule<ModuleStore>,
) -> Result<impl IntoResponse, AppError> {
    let modules = app_state.module_service.available_modules(user.0.tenant).await?;
    Ok(Json(modules))
}

// POST /api/modules/{id}/activate
pub async fn activate_module<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    _guard: RequireModule<ModuleStore>,
    Path(module): Path<ModuleId>,
) -> Result<impl IntoResponse, AppError> {
    let module = app_state.module_service.activate_module(user.0.tenant, module).await?;
    Ok((StatusCode::CREATED, Json(module)))
}

// POST /api/modules/{id}/deactivate
pub async fn deactivate_module<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    _guard: RequireModule<ModuleStore>,
    Path(module): Path<ModuleId>,
) -> Result<impl IntoResponse, AppError> {
    app_state.module_service.deactivate_module(user.0.tenant, module).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/modules/{id}/roles
pub async fn get_grantees<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    _guard: RequireModule<ModuleAdmin>,
    Path(module): Path<ModuleId>,
) -> Result<impl IntoResponse, AppError> {
    let roles = app_state.rbac_service.module_grantees(user.0.tenant, module).await?;
    Ok(Json(roles))
}

// PUT /api/modules/{id}/roles
pub async fn set_grantees<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    _guard: RequireModule<ModuleAdmin>,
    Path(module): Path<ModuleId>,
    Json(payload): Json<ModuleGranteesPayload>,
) -> Result<impl IntoResponse, AppError> {
    let roles = app_state
        .rbac_service
        .set_module_grantees(user.0.tenant, module, &payload.roles)
        .await?;
    Ok(Json(roles))
}

// POST /api/modules/{id}/roles/{role}
pub async fn grant_permission<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    _guard: RequireModule<ModuleAdmin>,
    Path((module, role)): Path<(ModuleId, RoleId)>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .rbac_service
        .grant_permission(RoleKey::new(user.0.tenant, role), module)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// DELETE /api/modules/{id}/roles/{role}
pub async fn revoke_permission<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    _guard: RequireModule<ModuleAdmin>,
    Path((module, role)): Path<(ModuleId, RoleId)>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .rbac_service
        .revoke_permission(RoleKey::new(user.0.tenant, role), module)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
