// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::collections::BTreeMap;

use serde_json::json;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::models::ids::{ModuleId, RoleId};
use crate::models::operations::AssignmentTarget;

// Tipo de erro único da aplicação, com `thiserror`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Alvo de atribuição não encontrado: {0}")]
    TargetNotFound(AssignmentTarget),

    #[error("Acesso negado ao módulo {0}")]
    PermissionDenied(ModuleId),

    #[error("O cargo {0} é protegido")]
    ProtectedRoleViolation(RoleId),

    #[error("O módulo {0} é essencial e não pode ser desativado")]
    CoreModuleViolation(ModuleId),

    #[error("O módulo {0} já está ativo")]
    ModuleAlreadyActive(ModuleId),

    #[error("O módulo {0} não está ativo")]
    ModuleNotActive(ModuleId),

    #[error("Valor já em uso: {field}")]
    UniquenessViolation { field: &'static str },

    #[error("{entity} {id} não encontrado")]
    NotFound { entity: &'static str, id: String },

    #[error("Operação não permitida: {0}")]
    Forbidden(String),

    #[error("Transição inválida: {0}")]
    InvalidTransition(String),

    #[error("Token inválido")]
    InvalidToken,

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        AppError::NotFound { entity, id: id.to_string() }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = BTreeMap::new();
                collect_messages("", &errors, &mut details);
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::UniquenessViolation { field } => {
                let body = Json(json!({
                    "error": "Este valor já está em uso.",
                    "field": field,
                }));
                return (StatusCode::CONFLICT, body).into_response();
            }
            ref e @ (AppError::TargetNotFound(_) | AppError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, e.to_string())
            }
            ref e @ AppError::PermissionDenied(_) => (StatusCode::FORBIDDEN, e.to_string()),
            ref e @ AppError::Forbidden(_) => (StatusCode::FORBIDDEN, e.to_string()),
            ref e @ (AppError::ProtectedRoleViolation(_)
            | AppError::CoreModuleViolation(_)
            | AppError::ModuleAlreadyActive(_)
            | AppError::ModuleNotActive(_)
            | AppError::InvalidTransition(_)) => (StatusCode::CONFLICT, e.to_string()),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".to_string(),
            ),

            // Todos os outros erros (DatabaseError, InternalServerError, JwtError) viram 500.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.".to_string())
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

// Achata erros aninhados em caminhos como `owner.email` ou `items[2].name`.
fn collect_messages(prefix: &str, errors: &ValidationErrors, out: &mut BTreeMap<String, Vec<String>>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(list) => {
                let messages = list
                    .iter()
                    .map(|e| e.message.as_ref().map(|m| m.to_string()).unwrap_or_else(|| e.code.to_string()))
                    .collect();
                out.insert(path, messages);
            }
            ValidationErrorsKind::Struct(inner) => collect_messages(&path, inner, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_messages(&format!("{path}[{index}]"), inner, out);
                }
            }
        }
    }
}
