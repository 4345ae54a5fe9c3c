// src/db/event_repo.rs

use async_trait::async_trait;

use crate::common::error::AppError;
use crate::db::pg_store::PgTx;
use crate::db::store::EventRepository;
use crate::models::ids::{EventId, TenantId};
use crate::models::operations::Event;

#[async_trait]
impl EventRepository for PgTx {
    async fn insert_event(&mut self, event: &Event) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO events (tenant_id, id, created_by, name, location, starts_at, ends_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
            .bind(event.tenant_id)
            .bind(event.id)
            .bind(event.created_by)
            .bind(&event.name)
            .bind(&event.location)
            .bind(event.starts_at)
            .bind(event.ends_at)
            .bind(event.created_at)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn find_event(&mut self, tenant: TenantId, id: EventId) -> Result<Option<Event>, AppError> {
        let event = sqlx::query_as::<_, Event>("SELECT * FROM events WHERE tenant_id = $1 AND id = $2")
            .bind(tenant)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(event)
    }

    async fn update_event(&mut self, event: &Event) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE events
            SET name = $3, location = $4, starts_at = $5, ends_at = $6
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
            .bind(event.tenant_id)
            .bind(event.id)
            .bind(&event.name)
            .bind(&event.location)
            .bind(event.starts_at)
            .bind(event.ends_at)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn delete_event(&mut self, tenant: TenantId, id: EventId) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM events WHERE tenant_id = $1 AND id = $2")
            .bind(tenant)
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn purge_events(&mut self, tenant: TenantId) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM events WHERE tenant_id = $1")
            .bind(tenant)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }
}
