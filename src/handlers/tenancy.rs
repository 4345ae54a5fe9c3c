// src/handlers/tenancy.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    db::Store,
    middleware::auth::AuthenticatedUser,
    middleware::rbac::{CompanyProfile, RequireModule},
    models::ids::RoleId,
    models::tenancy::{OnboardTenantPayload, OnboardingResponse, TenantProfile},
};

// POST /api/tenants (público)
pub async fn onboard_tenant<S: Store>(
    State(app_state): State<AppState<S>>,
    Json(payload): Json<OnboardTenantPayload>,
) -> Result<impl IntoResponse, AppError> {
    let (tenant, owner) = app_state.tenant_service.onboard_tenant(payload).await?;
    let token = app_state.auth_service.create_token(owner.key())?;

    Ok((StatusCode::CREATED, Json(OnboardingResponse { tenant, owner, token })))
}

// GET /api/tenant
pub async fn get_tenant<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    _guard: RequireModule<CompanyProfile>,
) -> Result<impl IntoResponse, AppError> {
    let tenant = app_state.tenant_service.get_tenant(user.0.tenant).await?;
    Ok(Json(tenant))
}

// PUT /api/tenant
pub async fn update_tenant<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    _guard: RequireModule<CompanyProfile>,
    Json(payload): Json<TenantProfile>,
) -> Result<impl IntoResponse, AppError> {
    let tenant = app_state
        .tenant_service
        .update_tenant_profile(user.0.tenant, payload)
        .await?;
    Ok(Json(tenant))
}

// DELETE /api/tenant (apenas membros do cargo Owner)
pub async fn delete_tenant<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    _guard: RequireModule<CompanyProfile>,
) -> Result<impl IntoResponse, AppError> {
    let roles = app_state.rbac_service.user_roles(user.0).await?;
    if !roles.contains(&RoleId::OWNER) {
        return Err(AppError::Forbidden("Apenas o Owner pode apagar a empresa.".into()));
    }

    app_state.tenant_service.delete_tenant(user.0.tenant).await?;
    Ok(StatusCode::NO_CONTENT)
}
