// src/services/user_service.rs

use chrono::Utc;
use validator::Validate;

use crate::common::error::AppError;
use crate::db::prelude::*;
use crate::models::auth::{NewUserPayload, User};
use crate::models::ids::{RoleId, SequenceKind, TenantId, UserId, UserKey};

#[derive(Clone)]
pub struct UserService<S> {
    store: S,
}

impl<S: Store> UserService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Cadastra o usuário no tenant. Ele entra no cargo "New user".
    pub async fn add_user(&self, tenant: TenantId, payload: NewUserPayload) -> Result<User, AppError> {
        payload.validate()?;

        let mut tx = self.store.begin().await?;

        if tx.find_tenant(tenant).await?.is_none() {
            return Err(AppError::not_found("Tenant", tenant));
        }
        let user = create_user(&mut tx, tenant, payload, RoleId::NEW_USER).await?;

        tx.commit().await?;

        tracing::info!(user = %user.key(), "👤 Usuário cadastrado");
        Ok(user)
    }

    /// Primeiro acesso concluído: sai de "New user" e entra em "Standard user".
    pub async fn complete_first_login(&self, user: UserKey) -> Result<Vec<RoleId>, AppError> {
        let mut tx = self.store.begin().await?;

        if tx.find_user(user).await?.is_none() {
            return Err(AppError::not_found("Usuário", user.user));
        }
        if tx.delete_membership(user, RoleId::NEW_USER).await? {
            tx.insert_membership(user, RoleId::STANDARD_USER).await?;
            tracing::info!(user = %user, "Primeiro acesso concluído");
        }
        let roles = tx.user_roles(user).await?;

        tx.commit().await?;
        Ok(roles)
    }

    /// Remove o usuário. Associações, atribuições e itens criados por ele vão junto.
    pub async fn remove_user(&self, user: UserKey) -> Result<(), AppError> {
        let mut tx = self.store.begin().await?;

        if !tx.delete_user(user).await? {
            return Err(AppError::not_found("Usuário", user.user));
        }

        tx.commit().await?;

        tracing::info!(user = %user, "🗑️ Usuário removido");
        Ok(())
    }

    pub async fn get_user(&self, user: UserKey) -> Result<User, AppError> {
        let mut tx = self.store.begin().await?;
        tx.find_user(user)
            .await?
            .ok_or_else(|| AppError::not_found("Usuário", user.user))
    }

    pub async fn list_users(&self, tenant: TenantId) -> Result<Vec<User>, AppError> {
        let mut tx = self.store.begin().await?;
        tx.list_users(tenant).await
    }
}

// Usado também no cadastro do tenant (dono entra como Owner).
pub(crate) async fn create_user<T: StoreTx>(
    tx: &mut T,
    tenant: TenantId,
    payload: NewUserPayload,
    role: RoleId,
) -> Result<User, AppError> {
    if tx.email_exists(&payload.email).await? {
        return Err(AppError::UniquenessViolation { field: "email" });
    }

    let id = tx.next_local_id(tenant, SequenceKind::User).await?;
    let user = User {
        tenant_id: tenant,
        id: UserId(id),
        email: payload.email,
        first_name: payload.first_name,
        last_name: payload.last_name,
        phone: payload.phone,
        avatar: None,
        created_at: Utc::now(),
    };

    tx.insert_user(&user).await?;
    tx.insert_membership(user.key(), role).await?;
    Ok(user)
}
