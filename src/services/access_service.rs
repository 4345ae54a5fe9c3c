// src/services/access_service.rs

use crate::common::error::AppError;
use crate::db::prelude::*;
use crate::models::ids::{ModuleId, RoleId, UserKey};
use crate::models::module::Module;

#[derive(Clone)]
pub struct AccessService<S> {
    store: S,
}

impl<S: Store> AccessService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// O usuário pode usar o módulo?
    pub async fn is_accessible_module(&self, user: UserKey, module: ModuleId) -> Result<bool, AppError> {
        let mut tx = self.store.begin().await?;
        check_access(&mut tx, user, module).await
    }

    pub async fn authorize(&self, user: UserKey, module: ModuleId) -> Result<(), AppError> {
        let mut tx = self.store.begin().await?;
        require_access(&mut tx, user, module).await
    }

    pub async fn authorize_admin(&self, user: UserKey, module: ModuleId) -> Result<(), AppError> {
        let mut tx = self.store.begin().await?;
        require_grant(&mut tx, user, module).await
    }

    /// Módulos que aparecem no painel do usuário.
    pub async fn accessible_modules(&self, user: UserKey) -> Result<Vec<Module>, AppError> {
        let mut tx = self.store.begin().await?;

        if tx.find_user(user).await?.is_none() {
            return Ok(Vec::new());
        }

        let roles = tx.user_roles(user).await?;
        let mut accessible = Vec::new();
        for module in tx.list_modules().await? {
            let visible = module.is_core || {
                let active = tx.is_module_active(user.tenant, module.id).await?;
                let grantees = tx.module_grantees(user.tenant, module.id).await?;
                resolve_access(AccessMode::Use, Some(&module), true, active, &roles, &grantees)
            };
            if visible {
                accessible.push(module);
            }
        }
        Ok(accessible)
    }
}

/// Como um módulo essencial é tratado na decisão.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Uso e painel: módulos essenciais liberados para todo membro do tenant.
    Use,
    /// Administração: exige permissão do cargo também nos módulos essenciais.
    Admin,
}

/// Decisão de acesso sobre fatos já lidos do store.
///
/// `module` é `None` para módulo desconhecido e `member` indica se o usuário
/// pertence ao tenant. Usuário sem nenhum cargo não acessa módulos não essenciais.
pub fn resolve_access(
    mode: AccessMode,
    module: Option<&Module>,
    member: bool,
    active: bool,
    roles: &[RoleId],
    grantees: &[RoleId],
) -> bool {
    let Some(module) = module else {
        return false;
    };
    if !member {
        return false;
    }
    if module.is_core && mode == AccessMode::Use {
        return true;
    }
    active && roles_intersect(roles, grantees)
}

/// Resolve o acesso de `user` a `module` dentro de uma transação já aberta.
///
/// 1. Módulo desconhecido ou usuário fora do tenant: negado.
/// 2. Módulo essencial: liberado (só no modo `Use`).
/// 3. Módulo não ativado no tenant: negado.
/// 4. Liberado se algum cargo do usuário tiver permissão no módulo.
pub async fn resolve<T: StoreTx>(
    tx: &mut T,
    mode: AccessMode,
    user: UserKey,
    module: ModuleId,
) -> Result<bool, AppError> {
    let Some(found) = tx.find_module(module).await? else {
        return Ok(false);
    };
    let member = tx.find_user(user).await?.is_some();
    if !member || (found.is_core && mode == AccessMode::Use) {
        return Ok(resolve_access(mode, Some(&found), member, false, &[], &[]));
    }

    let active = tx.is_module_active(user.tenant, module).await?;
    let roles = tx.user_roles(user).await?;
    let grantees = tx.module_grantees(user.tenant, module).await?;
    Ok(resolve_access(mode, Some(&found), member, active, &roles, &grantees))
}

pub async fn check_access<T: StoreTx>(tx: &mut T, user: UserKey, module: ModuleId) -> Result<bool, AppError> {
    resolve(tx, AccessMode::Use, user, module).await
}

pub async fn require_access<T: StoreTx>(tx: &mut T, user: UserKey, module: ModuleId) -> Result<(), AppError> {
    require(tx, AccessMode::Use, user, module).await
}

/// Operações administrativas passam pela permissão do cargo, mesmo em módulo essencial.
pub async fn require_grant<T: StoreTx>(tx: &mut T, user: UserKey, module: ModuleId) -> Result<(), AppError> {
    require(tx, AccessMode::Admin, user, module).await
}

async fn require<T: StoreTx>(tx: &mut T, mode: AccessMode, user: UserKey, module: ModuleId) -> Result<(), AppError> {
    if resolve(tx, mode, user, module).await? {
        Ok(())
    } else {
        tracing::warn!(user = %user, module = %module, ?mode, "🚫 Acesso negado ao módulo");
        Err(AppError::PermissionDenied(module))
    }
}

fn roles_intersect(roles: &[RoleId], grantees: &[RoleId]) -> bool {
    roles.iter().any(|role| grantees.contains(role))
}
