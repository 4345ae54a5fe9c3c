// src/handlers/health.rs

use axum::{extract::State, response::IntoResponse, Json};

use crate::{common::error::AppError, config::AppState, db::Store, docs::ApiDoc};
use utoipa::OpenApi;

// GET /api/health (abre e descarta uma transação para testar o store)
pub async fn health<S: Store>(
    State(app_state): State<AppState<S>>,
) -> Result<impl IntoResponse, AppError> {
    let _tx = app_state.store.begin().await?;
    Ok("OK")
}

// GET /api/openapi.json
pub async fn openapi() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
