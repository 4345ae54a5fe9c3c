// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::ids::{TenantId, UserId, UserKey};

// Usuário de um tenant. Senha e login ficam no provedor de identidade externo.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(value_type = i32, example = 1)]
    pub tenant_id: TenantId,

    #[schema(value_type = i32, example = 0)]
    pub id: UserId,

    #[schema(example = "mario.rossi@example.com")]
    pub email: String,

    #[schema(example = "Mario")]
    pub first_name: String,

    #[schema(example = "Rossi")]
    pub last_name: String,

    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn key(&self) -> UserKey {
        UserKey::new(self.tenant_id, self.id)
    }
}

// Dados para cadastrar um novo usuário
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewUserPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    #[schema(example = "mario.rossi@example.com")]
    pub email: String,

    #[validate(length(min = 1, max = 60, message = "O nome é obrigatório."))]
    pub first_name: String,

    #[validate(length(min = 1, max = 60, message = "O sobrenome é obrigatório."))]
    pub last_name: String,

    #[validate(length(min = 6, max = 20, message = "Telefone inválido."))]
    pub phone: Option<String>,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: UserId,     // Subject (id local do usuário)
    pub tenant: TenantId,
    pub exp: usize,      // Expiration time
    pub iat: usize,      // Issued At
}
