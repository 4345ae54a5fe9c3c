// src/services/rbac_service.rs

use std::collections::BTreeSet;

use validator::Validate;

use crate::common::error::AppError;
use crate::db::prelude::*;
use crate::models::ids::{ModuleId, RoleId, RoleKey, SequenceKind, TenantId, UserId, UserKey};
use crate::models::rbac::{Role, RolePayload, RoleResponse};

#[derive(Clone)]
pub struct RbacService<S> {
    store: S,
}

impl<S: Store> RbacService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    // ---
    // Cargos
    // ---

    pub async fn create_role(&self, tenant: TenantId, payload: RolePayload) -> Result<Role, AppError> {
        payload.validate()?;

        // 1. Inicia Transação
        let mut tx = self.store.begin().await?;

        if tx.find_tenant(tenant).await?.is_none() {
            return Err(AppError::not_found("Tenant", tenant));
        }

        // 2. Reserva o id local e cria o Cargo
        let id = tx.next_local_id(tenant, SequenceKind::Role).await?;
        let role = Role {
            tenant_id: tenant,
            id: RoleId(id),
            name: payload.name,
            color: payload.color,
            description: payload.description,
        };
        tx.insert_role(&role).await?;

        // 3. Commit
        tx.commit().await?;

        tracing::info!(tenant = %tenant, role = %role.id, "Cargo criado");
        Ok(role)
    }

    pub async fn update_role(&self, key: RoleKey, payload: RolePayload) -> Result<Role, AppError> {
        if key.role.is_protected() {
            return Err(AppError::ProtectedRoleViolation(key.role));
        }
        payload.validate()?;

        let mut tx = self.store.begin().await?;
        let mut role = find_role(&mut tx, key).await?;

        role.name = payload.name;
        role.color = payload.color;
        role.description = payload.description;
        tx.update_role(&role).await?;

        tx.commit().await?;
        Ok(role)
    }

    /// Apaga o cargo com membros e permissões. Módulos que ficarem sem
    /// nenhum cargo autorizado voltam a ser do Owner.
    pub async fn delete_role(&self, key: RoleKey) -> Result<(), AppError> {
        if key.role.is_protected() {
            return Err(AppError::ProtectedRoleViolation(key.role));
        }

        let mut tx = self.store.begin().await?;
        find_role(&mut tx, key).await?;

        tx.delete_role(key).await?;
        restore_owner_grants(&mut tx, key.tenant).await?;

        tx.commit().await?;

        tracing::info!(tenant = %key.tenant, role = %key.role, "🗑️ Cargo removido");
        Ok(())
    }

    pub async fn list_roles(&self, tenant: TenantId) -> Result<Vec<Role>, AppError> {
        let mut tx = self.store.begin().await?;
        tx.list_roles(tenant).await
    }

    pub async fn get_role(&self, key: RoleKey) -> Result<RoleResponse, AppError> {
        let mut tx = self.store.begin().await?;
        let role = find_role(&mut tx, key).await?;
        let members = tx.role_members(key).await?;
        Ok(RoleResponse { role, members })
    }

    // ---
    // Permissões (Cargo <-> Módulo)
    // ---

    pub async fn grant_permission(&self, role: RoleKey, module: ModuleId) -> Result<(), AppError> {
        let mut tx = self.store.begin().await?;

        find_role(&mut tx, role).await?;
        ensure_module_active(&mut tx, role.tenant, module).await?;
        tx.insert_permission(role, module).await?;

        tx.commit().await?;

        tracing::info!(tenant = %role.tenant, role = %role.role, module = %module, "Permissão concedida");
        Ok(())
    }

    /// Remove a permissão. Se o módulo ficar sem nenhum cargo, o Owner volta.
    pub async fn revoke_permission(&self, role: RoleKey, module: ModuleId) -> Result<(), AppError> {
        let mut tx = self.store.begin().await?;

        tx.delete_permission(role, module).await?;
        restore_owner_grants(&mut tx, role.tenant).await?;

        tx.commit().await?;

        tracing::info!(tenant = %role.tenant, role = %role.role, module = %module, "Permissão revogada");
        Ok(())
    }

    /// Troca todo o conjunto de cargos do módulo. Lista vazia vira `[Owner]`.
    pub async fn set_module_grantees(
        &self,
        tenant: TenantId,
        module: ModuleId,
        roles: &[RoleId],
    ) -> Result<Vec<RoleId>, AppError> {
        let mut grantees: BTreeSet<RoleId> = roles.iter().copied().collect();
        if grantees.is_empty() {
            grantees.insert(RoleId::OWNER);
        }

        let mut tx = self.store.begin().await?;

        ensure_module_active(&mut tx, tenant, module).await?;
        for role in &grantees {
            find_role(&mut tx, RoleKey::new(tenant, *role)).await?;
        }

        tx.delete_module_permissions(tenant, module).await?;
        for role in &grantees {
            tx.insert_permission(RoleKey::new(tenant, *role), module).await?;
        }

        tx.commit().await?;
        Ok(grantees.into_iter().collect())
    }

    pub async fn module_grantees(&self, tenant: TenantId, module: ModuleId) -> Result<Vec<RoleId>, AppError> {
        let mut tx = self.store.begin().await?;
        ensure_module_active(&mut tx, tenant, module).await?;
        tx.module_grantees(tenant, module).await
    }

    // ---
    // Associações (Usuário <-> Cargo)
    // ---

    /// Substitui todos os membros do cargo.
    pub async fn assign_users_to_role(&self, role: RoleKey, users: &[UserId]) -> Result<Vec<UserId>, AppError> {
        let members: BTreeSet<UserId> = users.iter().copied().collect();

        let mut tx = self.store.begin().await?;

        find_role(&mut tx, role).await?;
        for user in &members {
            if tx.find_user(UserKey::new(role.tenant, *user)).await?.is_none() {
                return Err(AppError::not_found("Usuário", user));
            }
        }

        tx.delete_role_memberships(role).await?;
        for user in &members {
            tx.insert_membership(UserKey::new(role.tenant, *user), role.role).await?;
        }

        tx.commit().await?;

        tracing::info!(tenant = %role.tenant, role = %role.role, members = members.len(), "Membros do cargo atualizados");
        Ok(members.into_iter().collect())
    }

    /// Substitui todos os cargos do usuário.
    pub async fn set_user_roles(&self, user: UserKey, roles: &[RoleId]) -> Result<Vec<RoleId>, AppError> {
        let roles: BTreeSet<RoleId> = roles.iter().copied().collect();

        let mut tx = self.store.begin().await?;

        if tx.find_user(user).await?.is_none() {
            return Err(AppError::not_found("Usuário", user.user));
        }
        for role in &roles {
            find_role(&mut tx, RoleKey::new(user.tenant, *role)).await?;
        }

        tx.delete_user_memberships(user).await?;
        for role in &roles {
            tx.insert_membership(user, *role).await?;
        }

        tx.commit().await?;
        Ok(roles.into_iter().collect())
    }

    pub async fn user_roles(&self, user: UserKey) -> Result<Vec<RoleId>, AppError> {
        let mut tx = self.store.begin().await?;
        tx.user_roles(user).await
    }

    pub async fn role_members(&self, role: RoleKey) -> Result<Vec<UserId>, AppError> {
        let mut tx = self.store.begin().await?;
        find_role(&mut tx, role).await?;
        tx.role_members(role).await
    }
}

async fn find_role<T: StoreTx>(tx: &mut T, key: RoleKey) -> Result<Role, AppError> {
    tx.find_role(key)
        .await?
        .ok_or_else(|| AppError::not_found("Cargo", key.role))
}

async fn ensure_module_active<T: StoreTx>(tx: &mut T, tenant: TenantId, module: ModuleId) -> Result<(), AppError> {
    if tx.find_module(module).await?.is_none() {
        return Err(AppError::not_found("Módulo", module));
    }
    if !tx.is_module_active(tenant, module).await? {
        return Err(AppError::ModuleNotActive(module));
    }
    Ok(())
}

// Nenhum módulo ativo pode ficar sem cargo autorizado.
pub(crate) async fn restore_owner_grants<T: StoreTx>(tx: &mut T, tenant: TenantId) -> Result<(), AppError> {
    for module in tx.modules_without_grantees(tenant).await? {
        tx.insert_permission(RoleKey::owner(tenant), module).await?;
        tracing::info!(tenant = %tenant, module = %module, "Módulo sem cargos devolvido ao Owner");
    }
    Ok(())
}
