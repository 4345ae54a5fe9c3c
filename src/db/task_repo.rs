// src/db/task_repo.rs

use async_trait::async_trait;

use crate::common::error::AppError;
use crate::db::pg_store::PgTx;
use crate::db::store::TaskRepository;
use crate::models::ids::{TaskId, TenantId, UserKey};
use crate::models::operations::Task;

#[async_trait]
impl TaskRepository for PgTx {
    async fn insert_task(&mut self, task: &Task) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO tasks (tenant_id, id, created_by, title, priority, due_date, created_on, completed_on)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
            .bind(task.tenant_id)
            .bind(task.id)
            .bind(task.created_by)
            .bind(&task.title)
            .bind(task.priority)
            .bind(task.due_date)
            .bind(task.created_on)
            .bind(task.completed_on)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn find_task(&mut self, tenant: TenantId, id: TaskId) -> Result<Option<Task>, AppError> {
        let task = sqlx::query_as::<_, Task>("SELECT * FROM tasks WHERE tenant_id = $1 AND id = $2")
            .bind(tenant)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(task)
    }

    async fn update_task(&mut self, task: &Task) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE tasks
            SET title = $3, priority = $4, due_date = $5, completed_on = $6
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
            .bind(task.tenant_id)
            .bind(task.id)
            .bind(&task.title)
            .bind(task.priority)
            .bind(task.due_date)
            .bind(task.completed_on)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn delete_task(&mut self, tenant: TenantId, id: TaskId) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE tenant_id = $1 AND id = $2")
            .bind(tenant)
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn tasks_created_by(&mut self, user: UserKey) -> Result<Vec<Task>, AppError> {
        let tasks = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks WHERE tenant_id = $1 AND created_by = $2 ORDER BY id",
        )
            .bind(user.tenant)
            .bind(user.user)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(tasks)
    }

    async fn purge_tasks(&mut self, tenant: TenantId) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE tenant_id = $1")
            .bind(tenant)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }
}
