// src/db/user_repo.rs

use async_trait::async_trait;

use crate::common::error::AppError;
use crate::db::pg_store::{map_unique_violation, PgTx};
use crate::db::store::UserRepository;
use crate::models::auth::User;
use crate::models::ids::{TenantId, UserKey};

// Responsável pelas interações com a tabela 'users'
#[async_trait]
impl UserRepository for PgTx {
    // Erro específico para e-mails duplicados
    async fn insert_user(&mut self, user: &User) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO users (tenant_id, id, email, first_name, last_name, phone, avatar, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
            .bind(user.tenant_id)
            .bind(user.id)
            .bind(&user.email)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.phone)
            .bind(&user.avatar)
            .bind(user.created_at)
            .execute(&mut *self.tx)
            .await
            .map_err(map_unique_violation)?;
        Ok(())
    }

    async fn find_user(&mut self, key: UserKey) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE tenant_id = $1 AND id = $2")
            .bind(key.tenant)
            .bind(key.user)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(user)
    }

    async fn list_users(&mut self, tenant: TenantId) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users WHERE tenant_id = $1 ORDER BY id")
            .bind(tenant)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(users)
    }

    async fn email_exists(&mut self, email: &str) -> Result<bool, AppError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(exists)
    }

    async fn delete_user(&mut self, key: UserKey) -> Result<bool, AppError> {
        // Associações, atribuições, tarefas e eventos criados caem em cascata
        let result = sqlx::query("DELETE FROM users WHERE tenant_id = $1 AND id = $2")
            .bind(key.tenant)
            .bind(key.user)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
