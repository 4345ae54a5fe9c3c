// src/db/pg_store.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::common::error::AppError;
use crate::db::store::{Store, StoreTx};

// Store principal, sobre a pool do Postgres
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Transação aberta. Os repositórios (`*_repo.rs`) são implementados sobre ela.
pub struct PgTx {
    pub(crate) tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl Store for PgStore {
    type Tx = PgTx;

    async fn begin(&self) -> Result<PgTx, AppError> {
        let tx = self.pool.begin().await?;
        Ok(PgTx { tx })
    }
}

#[async_trait]
impl StoreTx for PgTx {
    async fn commit(self) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }
}

// Converte violações de unicidade (pelo nome da constraint) em erros de domínio.
pub(crate) fn map_unique_violation(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            if let Some(constraint) = db_err.constraint() {
                let field = match constraint {
                    "tenants_name_key" => Some("name"),
                    "tenants_vat_number_key" => Some("vatNumber"),
                    "tenants_phone_key" => Some("phone"),
                    "users_email_key" => Some("email"),
                    _ => None,
                };
                if let Some(field) = field {
                    return AppError::UniquenessViolation { field };
                }
            }
        }
    }
    e.into()
}
