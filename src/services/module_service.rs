// src/services/module_service.rs

use crate::common::error::AppError;
use crate::db::prelude::*;
use crate::models::ids::{ModuleId, RoleKey, TenantId};
use crate::models::module::Module;

// Loja de módulos: ativa e desativa módulos opcionais por tenant.
#[derive(Clone)]
pub struct ModuleService<S> {
    store: S,
}

impl<S: Store> ModuleService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn catalog(&self) -> Result<Vec<Module>, AppError> {
        let mut tx = self.store.begin().await?;
        tx.list_modules().await
    }

    pub async fn active_modules(&self, tenant: TenantId) -> Result<Vec<Module>, AppError> {
        let mut tx = self.store.begin().await?;
        tx.list_active_modules(tenant).await
    }

    /// Módulos do catálogo que o tenant ainda pode ativar.
    pub async fn available_modules(&self, tenant: TenantId) -> Result<Vec<Module>, AppError> {
        let mut tx = self.store.begin().await?;
        let active = tx.list_active_modules(tenant).await?;
        let catalog = tx.list_modules().await?;

        Ok(catalog
            .into_iter()
            .filter(|m| !active.iter().any(|a| a.id == m.id))
            .collect())
    }

    /// Ativa o módulo e concede acesso ao Owner, atomicamente.
    pub async fn activate_module(&self, tenant: TenantId, module: ModuleId) -> Result<Module, AppError> {
        // 1. Inicia Transação
        let mut tx = self.store.begin().await?;

        if tx.find_tenant(tenant).await?.is_none() {
            return Err(AppError::not_found("Tenant", tenant));
        }
        let found = tx
            .find_module(module)
            .await?
            .ok_or_else(|| AppError::not_found("Módulo", module))?;

        if tx.is_module_active(tenant, module).await? {
            return Err(AppError::ModuleAlreadyActive(module));
        }

        // 2. Ativação + permissão do Owner
        tx.insert_activation(tenant, module).await?;
        tx.insert_permission(RoleKey::owner(tenant), module).await?;

        // 3. Commit
        tx.commit().await?;

        tracing::info!(tenant = %tenant, module = %module, "✅ Módulo ativado");
        Ok(found)
    }

    /// Desativa um módulo opcional, apagando as permissões e os dados dele.
    pub async fn deactivate_module(&self, tenant: TenantId, module: ModuleId) -> Result<(), AppError> {
        let mut tx = self.store.begin().await?;

        let found = tx
            .find_module(module)
            .await?
            .ok_or_else(|| AppError::not_found("Módulo", module))?;

        if found.is_core {
            return Err(AppError::CoreModuleViolation(module));
        }
        if !tx.is_module_active(tenant, module).await? {
            return Err(AppError::ModuleNotActive(module));
        }

        tx.delete_module_permissions(tenant, module).await?;
        tx.delete_activation(tenant, module).await?;

        // Dados que só existem por causa do módulo
        let purged = match module {
            ModuleId::TASKS => tx.purge_tasks(tenant).await?,
            ModuleId::CALENDAR => tx.purge_events(tenant).await?,
            ModuleId::WAREHOUSE => tx.purge_products(tenant).await?,
            _ => 0,
        };

        tx.commit().await?;

        tracing::info!(tenant = %tenant, module = %module, purged, "Módulo desativado");
        Ok(())
    }
}
