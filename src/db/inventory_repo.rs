// src/db/inventory_repo.rs

use async_trait::async_trait;

use crate::common::error::AppError;
use crate::db::pg_store::PgTx;
use crate::db::store::ProductRepository;
use crate::models::ids::{ProductId, TenantId};
use crate::models::inventory::Product;

#[async_trait]
impl ProductRepository for PgTx {
    async fn insert_product(&mut self, product: &Product) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO products (tenant_id, id, name, quantity, price, description, category)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
            .bind(product.tenant_id)
            .bind(product.id)
            .bind(&product.name)
            .bind(product.quantity)
            .bind(product.price)
            .bind(&product.description)
            .bind(&product.category)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn find_product(&mut self, tenant: TenantId, id: ProductId) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE tenant_id = $1 AND id = $2")
            .bind(tenant)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(product)
    }

    async fn list_products(&mut self, tenant: TenantId) -> Result<Vec<Product>, AppError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE tenant_id = $1 ORDER BY category NULLS LAST, name",
        )
            .bind(tenant)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(products)
    }

    async fn update_product(&mut self, product: &Product) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE products
            SET name = $3, quantity = $4, price = $5, description = $6, category = $7
            WHERE tenant_id = $1 AND id = $2
            "#,
        )
            .bind(product.tenant_id)
            .bind(product.id)
            .bind(&product.name)
            .bind(product.quantity)
            .bind(product.price)
            .bind(&product.description)
            .bind(&product.category)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn delete_product(&mut self, tenant: TenantId, id: ProductId) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE tenant_id = $1 AND id = $2")
            .bind(tenant)
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn purge_products(&mut self, tenant: TenantId) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM products WHERE tenant_id = $1")
            .bind(tenant)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }
}
