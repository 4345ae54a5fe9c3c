// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::models;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(
            // --- IDs ---
            models::ids::TenantId,
            models::ids::ModuleId,
            models::ids::RoleId,
            models::ids::UserId,
            models::ids::TaskId,
            models::ids::EventId,
            models::ids::ProductId,

            // --- Tenancy ---
            models::tenancy::Tenant,
            models::tenancy::TenantProfile,
            models::tenancy::OnboardTenantPayload,
            models::tenancy::OnboardingResponse,

            // --- Users ---
            models::auth::User,
            models::auth::NewUserPayload,

            // --- Modules ---
            models::module::Module,

            // --- RBAC ---
            models::rbac::Role,
            models::rbac::RolePayload,
            models::rbac::RoleResponse,
            models::rbac::ModuleGranteesPayload,
            models::rbac::RoleMembersPayload,
            models::rbac::UserRolesPayload,

            // --- Operations ---
            models::operations::AssignmentTarget,
            models::operations::TaskStatus,
            models::operations::Task,
            models::operations::TaskDetail,
            models::operations::CreateTaskPayload,
            models::operations::UpdateTaskPayload,
            models::operations::Event,
            models::operations::EventDetail,
            models::operations::EventPayload,

            // --- Inventory ---
            models::inventory::Product,
            models::inventory::ProductPayload,
        )
    ),
    tags(
        (name = "Tenancy", description = "Cadastro e Perfil da Empresa"),
        (name = "Users", description = "Usuários da Empresa"),
        (name = "Modules", description = "Catálogo, Loja de Módulos e Permissões"),
        (name = "RBAC", description = "Cargos e Membros"),
        (name = "Operations", description = "Tarefas e Calendário"),
        (name = "Inventory", description = "Produtos do Almoxarifado")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
