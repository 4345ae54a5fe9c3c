// src/db/tenancy_repo.rs

use async_trait::async_trait;

use crate::common::error::AppError;
use crate::db::pg_store::{map_unique_violation, PgTx};
use crate::db::store::TenantRepository;
use crate::models::ids::TenantId;
use crate::models::tenancy::{Tenant, TenantProfile};

#[async_trait]
impl TenantRepository for PgTx {
    async fn insert_tenant(&mut self, profile: &TenantProfile) -> Result<Tenant, AppError> {
        sqlx::query_as::<_, Tenant>(
            r#"
            INSERT INTO tenants (name, vat_number, address, city, postal_code, phone, logo)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
            .bind(&profile.name)
            .bind(&profile.vat_number)
            .bind(&profile.address)
            .bind(&profile.city)
            .bind(&profile.postal_code)
            .bind(&profile.phone)
            .bind(&profile.logo)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(map_unique_violation)
    }

    async fn find_tenant(&mut self, tenant: TenantId) -> Result<Option<Tenant>, AppError> {
        let tenant = sqlx::query_as::<_, Tenant>("SELECT * FROM tenants WHERE id = $1")
            .bind(tenant)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(tenant)
    }

    async fn update_tenant(&mut self, tenant: TenantId, profile: &TenantProfile) -> Result<Tenant, AppError> {
        sqlx::query_as::<_, Tenant>(
            r#"
            UPDATE tenants
            SET name = $2, vat_number = $3, address = $4, city = $5,
                postal_code = $6, phone = $7, logo = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
            .bind(tenant)
            .bind(&profile.name)
            .bind(&profile.vat_number)
            .bind(&profile.address)
            .bind(&profile.city)
            .bind(&profile.postal_code)
            .bind(&profile.phone)
            .bind(&profile.logo)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_unique_violation)?
            .ok_or_else(|| AppError::not_found("Tenant", tenant))
    }

    async fn delete_tenant(&mut self, tenant: TenantId) -> Result<bool, AppError> {
        // O ON DELETE CASCADE leva cargos, usuários, ativações e itens.
        let result = sqlx::query("DELETE FROM tenants WHERE id = $1")
            .bind(tenant)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_conflicting_field(
        &mut self,
        profile: &TenantProfile,
        exclude: Option<TenantId>,
    ) -> Result<Option<&'static str>, AppError> {
        let row: Option<(bool, bool, bool)> = sqlx::query_as(
            r#"
            SELECT name = $1, vat_number = $2, phone = $3
            FROM tenants
            WHERE (name = $1 OR vat_number = $2 OR phone = $3)
              AND ($4::INTEGER IS NULL OR id <> $4)
            LIMIT 1
            "#,
        )
            .bind(&profile.name)
            .bind(&profile.vat_number)
            .bind(&profile.phone)
            .bind(exclude)
            .fetch_optional(&mut *self.tx)
            .await?;

        Ok(row.and_then(|(name, vat, phone)| {
            if name {
                Some("name")
            } else if vat {
                Some("vatNumber")
            } else if phone {
                Some("phone")
            } else {
                None
            }
        }))
    }
}
