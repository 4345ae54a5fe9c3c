// src/models/rbac.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::ids::{RoleId, RoleKey, TenantId, UserId};

// O que sai do banco (Tabela roles)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    #[schema(ignore)] // Ocultamos tenant_id da documentação pública
    pub tenant_id: TenantId,

    #[schema(value_type = i32, example = 3)]
    pub id: RoleId,

    #[schema(example = "Editors")]
    pub name: String,

    #[schema(example = "#1e88e5")]
    pub color: String,

    #[schema(example = "Pode publicar conteúdo")]
    pub description: Option<String>,
}

impl Role {
    pub fn key(&self) -> RoleKey {
        RoleKey::new(self.tenant_id, self.id)
    }
}

// Cargos criados em todo tenant novo: (id, nome, cor)
pub const SYSTEM_ROLES: [(RoleId, &str, &str); 3] = [
    (RoleId::OWNER, "Owner", "#000000"),
    (RoleId::NEW_USER, "New user", "blue"),
    (RoleId::STANDARD_USER, "Standard user", "grey"),
];

// O Payload para criar/editar um cargo
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RolePayload {
    #[validate(length(min = 2, max = 50, message = "O nome deve ter entre 2 e 50 caracteres."))]
    #[schema(example = "Editors")]
    pub name: String,

    #[validate(length(min = 1, max = 20, message = "Cor inválida."))]
    #[schema(example = "#1e88e5")]
    pub color: String,

    #[validate(length(max = 255, message = "A descrição deve ter no máximo 255 caracteres."))]
    pub description: Option<String>,
}

// Substitui o conjunto de cargos que podem usar um módulo
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModuleGranteesPayload {
    #[schema(value_type = Vec<i32>, example = json!([0, 3]))]
    pub roles: Vec<RoleId>,
}

// Substitui os membros de um cargo
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleMembersPayload {
    #[schema(value_type = Vec<i32>, example = json!([0, 4, 7]))]
    pub users: Vec<UserId>,
}

// Substitui os cargos de um usuário
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRolesPayload {
    #[schema(value_type = Vec<i32>, example = json!([2, 3]))]
    pub roles: Vec<RoleId>,
}

// Resposta completa (Cargo + membros)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    #[serde(flatten)]
    pub role: Role,

    #[schema(value_type = Vec<i32>)]
    pub members: Vec<UserId>,
}
