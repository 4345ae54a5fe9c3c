// src/models/module.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::ids::ModuleId;

/// Módulo do catálogo global.
///
/// Os módulos `is_core` estão sempre acessíveis a qualquer usuário do tenant
/// e nunca podem ser desativados.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    #[schema(value_type = i32, example = 5)]
    pub id: ModuleId,

    #[schema(example = "Tasks")]
    pub name: String,

    pub description: String,

    #[schema(example = "/tasks")]
    pub url: String,

    pub icon: String,
    pub is_core: bool,
}

// Mesmo conteúdo do seed da migration. Usado pelo store em memória.
pub fn default_catalog() -> Vec<Module> {
    let entry = |id: i32, name: &str, description: &str, url: &str, icon: &str, is_core: bool| Module {
        id: ModuleId(id),
        name: name.to_string(),
        description: description.to_string(),
        url: url.to_string(),
        icon: icon.to_string(),
        is_core,
    };

    vec![
        entry(0, "User management", "Invite users and manage their roles", "/users", "users", true),
        entry(1, "Role management", "Create and edit tenant roles", "/roles", "shield", true),
        entry(2, "Module administration", "Choose which roles can use each module", "/modules", "grid", true),
        entry(3, "Company profile", "Edit the company data", "/company", "building", true),
        entry(4, "Calendar", "Shared calendar with events and attendees", "/calendar", "calendar", false),
        entry(5, "Tasks", "Assign tasks to users and roles", "/tasks", "checklist", false),
        entry(6, "Warehouse", "Product and stock registry", "/warehouse", "box", false),
        entry(9999, "Module store", "Activate and deactivate optional modules", "/store", "store", true),
    ]
}
