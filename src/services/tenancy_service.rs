// src/services/tenancy_service.rs

use validator::Validate;

use crate::{
    common::error::AppError,
    db::prelude::*,
    models::auth::User,
    models::ids::{RoleId, RoleKey, SequenceKind, TenantId},
    models::rbac::{Role, SYSTEM_ROLES},
    models::tenancy::{OnboardTenantPayload, Tenant, TenantProfile},
    services::user_service::create_user,
};

#[derive(Clone)]
pub struct TenantService<S> {
    store: S,
}

impl<S: Store> TenantService<S> {
    /// Cria uma nova instância do serviço de tenancy.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// LÓGICA DE NEGÓCIO: cria a empresa e, atomicamente, os cargos de
    /// sistema, as ativações dos módulos essenciais (com permissão do
    /// Owner) e o usuário dono, já no cargo Owner.
    pub async fn onboard_tenant(&self, payload: OnboardTenantPayload) -> Result<(Tenant, User), AppError> {
        payload.validate()?;

        // 1. Inicia a transação
        let mut tx = self.store.begin().await?;

        // 2. Unicidade (nome, IVA, telefone, e-mail do dono)
        if let Some(field) = tx.find_conflicting_field(&payload.tenant, None).await? {
            return Err(AppError::UniquenessViolation { field });
        }
        if tx.email_exists(&payload.owner.email).await? {
            return Err(AppError::UniquenessViolation { field: "email" });
        }

        // 3. Cria a Empresa
        let tenant = tx.insert_tenant(&payload.tenant).await?;

        // 4. Cargos de sistema (consomem os ids 0, 1 e 2 da sequência)
        for (id, name, color) in SYSTEM_ROLES {
            tx.next_local_id(tenant.id, SequenceKind::Role).await?;
            tx.insert_role(&Role {
                tenant_id: tenant.id,
                id,
                name: name.to_string(),
                color: color.to_string(),
                description: None,
            })
            .await?;
        }

        // 5. Módulos essenciais, liberados para o Owner
        for module in tx.list_modules().await? {
            if module.is_core {
                tx.insert_activation(tenant.id, module.id).await?;
                tx.insert_permission(RoleKey::owner(tenant.id), module.id).await?;
            }
        }

        // 6. Usuário dono
        let owner = create_user(&mut tx, tenant.id, payload.owner, RoleId::OWNER).await?;

        // 7. Commit
        tx.commit().await?;

        tracing::info!(tenant = %tenant.id, owner = %owner.id, "🏢 Empresa cadastrada");
        Ok((tenant, owner))
    }

    pub async fn get_tenant(&self, tenant: TenantId) -> Result<Tenant, AppError> {
        let mut tx = self.store.begin().await?;
        tx.find_tenant(tenant)
            .await?
            .ok_or_else(|| AppError::not_found("Tenant", tenant))
    }

    pub async fn update_tenant_profile(&self, tenant: TenantId, profile: TenantProfile) -> Result<Tenant, AppError> {
        profile.validate()?;

        let mut tx = self.store.begin().await?;

        if tx.find_tenant(tenant).await?.is_none() {
            return Err(AppError::not_found("Tenant", tenant));
        }
        if let Some(field) = tx.find_conflicting_field(&profile, Some(tenant)).await? {
            return Err(AppError::UniquenessViolation { field });
        }
        let updated = tx.update_tenant(tenant, &profile).await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Apaga a empresa e tudo o que pertence a ela.
    pub async fn delete_tenant(&self, tenant: TenantId) -> Result<(), AppError> {
        let mut tx = self.store.begin().await?;

        if !tx.delete_tenant(tenant).await? {
            return Err(AppError::not_found("Tenant", tenant));
        }

        tx.commit().await?;

        tracing::info!(tenant = %tenant, "🗑️ Empresa removida");
        Ok(())
    }
}
