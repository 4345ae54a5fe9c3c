// src/services/assignment_service.rs
//
// Motor de atribuições compartilhado por Tarefas e Eventos.
// Cargos são expandidos para os membros atuais no momento do save;
// quem entrar no cargo depois não recebe os itens antigos.

use std::collections::BTreeSet;

use crate::common::error::AppError;
use crate::db::prelude::*;
use crate::models::ids::{ItemKey, RoleKey, TenantId, UserId, UserKey};
use crate::models::operations::AssignmentTarget;

/// Expande os alvos para o conjunto (sem repetição) de usuários do tenant.
///
/// Todos os alvos são validados antes da expansão: um usuário ou cargo
/// inexistente resulta em `TargetNotFound` e nada é resolvido.
pub async fn resolve_targets<T: StoreTx>(
    tx: &mut T,
    tenant: TenantId,
    targets: &[AssignmentTarget],
) -> Result<BTreeSet<UserId>, AppError> {
    // 1. Valida
    for target in targets {
        let exists = match *target {
            AssignmentTarget::User(user) => tx.find_user(UserKey::new(tenant, user)).await?.is_some(),
            AssignmentTarget::Role(role) => tx.find_role(RoleKey::new(tenant, role)).await?.is_some(),
        };
        if !exists {
            return Err(AppError::TargetNotFound(*target));
        }
    }

    // 2. Expande
    let mut users = BTreeSet::new();
    for target in targets {
        match *target {
            AssignmentTarget::User(user) => {
                users.insert(user);
            }
            AssignmentTarget::Role(role) => {
                users.extend(tx.role_members(RoleKey::new(tenant, role)).await?);
            }
        }
    }
    Ok(users)
}

/// Substitui todas as atribuições do item por `users`.
/// Roda na transação de quem salva o item: apaga primeiro, insere depois.
pub async fn replace_assignments<T: StoreTx>(
    tx: &mut T,
    item: ItemKey,
    users: &BTreeSet<UserId>,
) -> Result<(), AppError> {
    let removed = tx.delete_assignments(item).await?;
    for user in users {
        tx.insert_assignment(item, *user).await?;
    }

    tracing::debug!(item = %item, removed, inserted = users.len(), "Atribuições substituídas");
    Ok(())
}
