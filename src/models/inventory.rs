// src/models/inventory.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::ids::{ProductId, TenantId};

// Produto do módulo Armazém
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[schema(ignore)]
    pub tenant_id: TenantId,

    #[schema(value_type = i32, example = 0)]
    pub id: ProductId,

    #[schema(example = "Farinha 00")]
    pub name: String,

    #[schema(example = 40)]
    pub quantity: i32,

    #[schema(value_type = f64, example = 1.25)]
    pub price: Decimal,

    pub description: Option<String>,

    #[schema(example = "Matéria-prima")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    #[validate(length(min = 1, max = 100, message = "O nome deve ter entre 1 e 100 caracteres."))]
    pub name: String,

    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    pub quantity: i32,

    // Validado no serviço (Decimal não implementa as regras de range)
    #[schema(value_type = f64, example = 1.25)]
    pub price: Decimal,

    #[validate(length(max = 500, message = "A descrição deve ter no máximo 500 caracteres."))]
    pub description: Option<String>,

    #[validate(length(max = 60, message = "A categoria deve ter no máximo 60 caracteres."))]
    pub category: Option<String>,
}
