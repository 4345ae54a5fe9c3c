// src/db/assignment_repo.rs

use async_trait::async_trait;

use crate::common::error::AppError;
use crate::db::pg_store::PgTx;
use crate::db::store::AssignmentRepository;
use crate::models::ids::{ItemKey, ItemKind, UserId, UserKey};

// Cada tipo de item tem a sua tabela de atribuições (FK com cascata para o item).
fn table(kind: ItemKind) -> (&'static str, &'static str) {
    match kind {
        ItemKind::Task => ("task_assignments", "task_id"),
        ItemKind::Event => ("event_assignments", "event_id"),
    }
}

#[async_trait]
impl AssignmentRepository for PgTx {
    async fn delete_assignments(&mut self, item: ItemKey) -> Result<u64, AppError> {
        let (table, column) = table(item.kind);
        let sql = format!("DELETE FROM {table} WHERE tenant_id = $1 AND {column} = $2");

        let result = sqlx::query(&sql)
            .bind(item.tenant)
            .bind(item.id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn insert_assignment(&mut self, item: ItemKey, user: UserId) -> Result<(), AppError> {
        let (table, column) = table(item.kind);
        let sql = format!(
            "INSERT INTO {table} (tenant_id, {column}, user_id) VALUES ($1, $2, $3) ON CONFLICT DO NOTHING"
        );

        sqlx::query(&sql)
            .bind(item.tenant)
            .bind(item.id)
            .bind(user)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn assignees(&mut self, item: ItemKey) -> Result<Vec<UserId>, AppError> {
        let (table, column) = table(item.kind);
        let sql = format!(
            "SELECT user_id FROM {table} WHERE tenant_id = $1 AND {column} = $2 ORDER BY user_id"
        );

        let users = sqlx::query_scalar::<_, UserId>(&sql)
            .bind(item.tenant)
            .bind(item.id)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(users)
    }

    async fn assigned_items(&mut self, user: UserKey, kind: ItemKind) -> Result<Vec<i32>, AppError> {
        let (table, column) = table(kind);
        let sql = format!(
            "SELECT {column} FROM {table} WHERE tenant_id = $1 AND user_id = $2 ORDER BY {column}"
        );

        let ids = sqlx::query_scalar::<_, i32>(&sql)
            .bind(user.tenant)
            .bind(user.user)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(ids)
    }
}
