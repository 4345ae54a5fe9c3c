// src/db/sequence_repo.rs

use async_trait::async_trait;

use crate::common::error::AppError;
use crate::db::pg_store::PgTx;
use crate::db::store::SequenceRepository;
use crate::models::ids::{SequenceKind, TenantId};

#[async_trait]
impl SequenceRepository for PgTx {
    async fn next_local_id(&mut self, tenant: TenantId, kind: SequenceKind) -> Result<i32, AppError> {
        // O upsert trava a linha do contador até o fim da transação,
        // então duas criações concorrentes nunca recebem o mesmo id.
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO local_sequences (tenant_id, kind, last_value)
            VALUES ($1, $2, 0)
            ON CONFLICT (tenant_id, kind)
            DO UPDATE SET last_value = local_sequences.last_value + 1
            RETURNING last_value
            "#,
        )
            .bind(tenant)
            .bind(kind.as_str())
            .fetch_one(&mut *self.tx)
            .await?;

        Ok(id)
    }
}
