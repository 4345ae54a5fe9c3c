// src/models/tenancy.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::auth::{NewUserPayload, User};
use crate::models::ids::TenantId;

// ---
// Tenant (a "Empresa")
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    #[schema(value_type = i32, example = 1)]
    pub id: TenantId,

    #[schema(example = "Padaria Central")]
    pub name: String,

    #[schema(example = "IT01234567890")]
    pub vat_number: String,

    pub address: String,
    pub city: String,
    pub postal_code: String,

    #[schema(example = "+39 055 123456")]
    pub phone: String,

    // Caminho do arquivo; o upload em si fica fora deste serviço
    pub logo: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Dados editáveis da empresa.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantProfile {
    #[validate(length(min = 2, max = 100, message = "O nome deve ter entre 2 e 100 caracteres."))]
    #[schema(example = "Padaria Central")]
    pub name: String,

    #[validate(length(min = 5, max = 20, message = "Número de IVA inválido."))]
    #[schema(example = "IT01234567890")]
    pub vat_number: String,

    #[validate(length(min = 1, message = "O endereço é obrigatório."))]
    pub address: String,

    #[validate(length(min = 1, message = "A cidade é obrigatória."))]
    pub city: String,

    #[validate(length(min = 3, max = 10, message = "CEP inválido."))]
    pub postal_code: String,

    #[validate(length(min = 6, max = 20, message = "Telefone inválido."))]
    pub phone: String,

    pub logo: Option<String>,
}

// Payload público de cadastro: empresa + usuário dono
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnboardTenantPayload {
    #[validate(nested)]
    pub tenant: TenantProfile,

    #[validate(nested)]
    pub owner: NewUserPayload,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingResponse {
    pub tenant: Tenant,
    pub owner: User,
    pub token: String,
}
