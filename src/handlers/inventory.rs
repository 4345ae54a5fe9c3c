// src/handlers/inventory.rs

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
    models::ids::ProductId,
    models::inventory::ProductPayload,
};

// GET /api/products
pub async fn list_products<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state.inventory_service.list_products(user.0).await?;
    Ok(Json(products))
}

// POST /api/products
pub async fn create_product<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.inventory_service.create_product(user.0, payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

// GET /api/products/{id}
pub async fn get_product<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.inventory_service.get_product(user.0, id).await?;
    Ok(Json(product))
}

// PUT /api/products/{id}
pub async fn update_product<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    Path(id): Path<ProductId>,
    Json(payload): Json<ProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    let product = app_state.inventory_service.update_product(user.0, id, payload).await?;
    Ok(Json(product))
}

// DELETE /api/products/{id}
pub async fn delete_product<S: Store>(
    State(app_state): State<AppState<S>>,
    user: AuthenticatedUser,
    Path(id): Path<ProductId>,
) -> Result<impl IntoResponse, AppError> {
    app_state.inventory_service.delete_product(user.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
