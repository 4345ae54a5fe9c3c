// src/services/notification.rs

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::models::ids::{ItemKey, UserId};

/// Canal de aviso para usuários recém-atribuídos a um item.
/// Chamado depois do commit; uma falha aqui nunca desfaz a operação.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify_assigned(&self, item: ItemKey, users: &[UserId]) -> anyhow::Result<()>;
}

// Implementação padrão: só registra no log.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify_assigned(&self, item: ItemKey, users: &[UserId]) -> anyhow::Result<()> {
        tracing::info!(item = %item, users = ?users, "📨 Novas atribuições");
        Ok(())
    }
}

// Avisa sem propagar erro: a operação já foi confirmada.
pub(crate) async fn notify_assigned(notifier: &dyn Notifier, item: ItemKey, users: &BTreeSet<UserId>) {
    if users.is_empty() {
        return;
    }
    let users: Vec<UserId> = users.iter().copied().collect();
    if let Err(e) = notifier.notify_assigned(item, &users).await {
        tracing::warn!(item = %item, "Falha ao notificar atribuições: {:?}", e);
    }
}
