// src/db/rbac_repo.rs

use async_trait::async_trait;

use crate::common::error::AppError;
use crate::db::pg_store::PgTx;
use crate::db::store::{MembershipRepository, PermissionRepository, RoleRepository};
use crate::models::ids::{ModuleId, RoleId, RoleKey, TenantId, UserId, UserKey};
use crate::models::rbac::Role;

// ---
// Cargos
// ---

#[async_trait]
impl RoleRepository for PgTx {
    async fn insert_role(&mut self, role: &Role) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO roles (tenant_id, id, name, color, description)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
            .bind(role.tenant_id)
            .bind(role.id)
            .bind(&role.name)
            .bind(&role.color)
            .bind(&role.description)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn find_role(&mut self, key: RoleKey) -> Result<Option<Role>, AppError> {
        let role = sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE tenant_id = $1 AND id = $2")
            .bind(key.tenant)
            .bind(key.role)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(role)
    }

    async fn list_roles(&mut self, tenant: TenantId) -> Result<Vec<Role>, AppError> {
        let roles = sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE tenant_id = $1 ORDER BY id")
            .bind(tenant)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(roles)
    }

    async fn update_role(&mut self, role: &Role) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE roles SET name = $3, color = $4, description = $5 WHERE tenant_id = $1 AND id = $2",
        )
            .bind(role.tenant_id)
            .bind(role.id)
            .bind(&role.name)
            .bind(&role.color)
            .bind(&role.description)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn delete_role(&mut self, key: RoleKey) -> Result<bool, AppError> {
        // role_members e role_modules caem junto (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM roles WHERE tenant_id = $1 AND id = $2")
            .bind(key.tenant)
            .bind(key.role)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// ---
// Cargo <-> Módulo
// ---

#[async_trait]
impl PermissionRepository for PgTx {
    async fn insert_permission(&mut self, role: RoleKey, module: ModuleId) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO role_modules (tenant_id, role_id, module_id)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            "#,
        )
            .bind(role.tenant)
            .bind(role.role)
            .bind(module)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn delete_permission(&mut self, role: RoleKey, module: ModuleId) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM role_modules WHERE tenant_id = $1 AND role_id = $2 AND module_id = $3",
        )
            .bind(role.tenant)
            .bind(role.role)
            .bind(module)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_module_permissions(&mut self, tenant: TenantId, module: ModuleId) -> Result<(), AppError> {
        sqlx::query("DELETE FROM role_modules WHERE tenant_id = $1 AND module_id = $2")
            .bind(tenant)
            .bind(module)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn module_grantees(&mut self, tenant: TenantId, module: ModuleId) -> Result<Vec<RoleId>, AppError> {
        let roles = sqlx::query_scalar::<_, RoleId>(
            "SELECT role_id FROM role_modules WHERE tenant_id = $1 AND module_id = $2 ORDER BY role_id",
        )
            .bind(tenant)
            .bind(module)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(roles)
    }

    async fn modules_without_grantees(&mut self, tenant: TenantId) -> Result<Vec<ModuleId>, AppError> {
        let modules = sqlx::query_scalar::<_, ModuleId>(
            r#"
            SELECT a.module_id
            FROM module_activations a
            WHERE a.tenant_id = $1
              AND NOT EXISTS (
                  SELECT 1 FROM role_modules rm
                  WHERE rm.tenant_id = a.tenant_id AND rm.module_id = a.module_id
              )
            ORDER BY a.module_id
            "#,
        )
            .bind(tenant)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(modules)
    }
}

// ---
// Usuário <-> Cargo
// ---

#[async_trait]
impl MembershipRepository for PgTx {
    async fn insert_membership(&mut self, user: UserKey, role: RoleId) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO role_members (tenant_id, user_id, role_id)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            "#,
        )
            .bind(user.tenant)
            .bind(user.user)
            .bind(role)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn delete_membership(&mut self, user: UserKey, role: RoleId) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM role_members WHERE tenant_id = $1 AND user_id = $2 AND role_id = $3",
        )
            .bind(user.tenant)
            .bind(user.user)
            .bind(role)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_role_memberships(&mut self, role: RoleKey) -> Result<(), AppError> {
        sqlx::query("DELETE FROM role_members WHERE tenant_id = $1 AND role_id = $2")
            .bind(role.tenant)
            .bind(role.role)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn delete_user_memberships(&mut self, user: UserKey) -> Result<(), AppError> {
        sqlx::query("DELETE FROM role_members WHERE tenant_id = $1 AND user_id = $2")
            .bind(user.tenant)
            .bind(user.user)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn user_roles(&mut self, user: UserKey) -> Result<Vec<RoleId>, AppError> {
        let roles = sqlx::query_scalar::<_, RoleId>(
            "SELECT role_id FROM role_members WHERE tenant_id = $1 AND user_id = $2 ORDER BY role_id",
        )
            .bind(user.tenant)
            .bind(user.user)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(roles)
    }

    async fn role_members(&mut self, role: RoleKey) -> Result<Vec<UserId>, AppError> {
        let users = sqlx::query_scalar::<_, UserId>(
            "SELECT user_id FROM role_members WHERE tenant_id = $1 AND role_id = $2 ORDER BY user_id",
        )
            .bind(role.tenant)
            .bind(role.role)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(users)
    }
}
