// src/db/module_repo.rs

use async_trait::async_trait;

use crate::common::error::AppError;
use crate::db::pg_store::PgTx;
use crate::db::store::ModuleRepository;
use crate::models::ids::{ModuleId, TenantId};
use crate::models::module::Module;

#[async_trait]
impl ModuleRepository for PgTx {
    async fn list_modules(&mut self) -> Result<Vec<Module>, AppError> {
        let modules = sqlx::query_as::<_, Module>("SELECT * FROM modules ORDER BY id")
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(modules)
    }

    async fn find_module(&mut self, module: ModuleId) -> Result<Option<Module>, AppError> {
        let module = sqlx::query_as::<_, Module>("SELECT * FROM modules WHERE id = $1")
            .bind(module)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(module)
    }

    async fn list_active_modules(&mut self, tenant: TenantId) -> Result<Vec<Module>, AppError> {
        let modules = sqlx::query_as::<_, Module>(
            r#"
            SELECT m.*
            FROM modules m
            JOIN module_activations a ON a.module_id = m.id
            WHERE a.tenant_id = $1
            ORDER BY m.id
            "#,
        )
            .bind(tenant)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(modules)
    }

    async fn is_module_active(&mut self, tenant: TenantId, module: ModuleId) -> Result<bool, AppError> {
        let active: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM module_activations WHERE tenant_id = $1 AND module_id = $2)",
        )
            .bind(tenant)
            .bind(module)
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(active)
    }

    async fn insert_activation(&mut self, tenant: TenantId, module: ModuleId) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO module_activations (tenant_id, module_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
            .bind(tenant)
            .bind(module)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn delete_activation(&mut self, tenant: TenantId, module: ModuleId) -> Result<bool, AppError> {
        // role_modules referencia a ativação com ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM module_activations WHERE tenant_id = $1 AND module_id = $2")
            .bind(tenant)
            .bind(module)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
