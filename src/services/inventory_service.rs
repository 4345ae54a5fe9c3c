// src/services/inventory_service.rs

use rust_decimal::Decimal;
use validator::Validate;

use crate::common::error::AppError;
use crate::common::validation::invalid_field;
use crate::db::prelude::*;
use crate::models::ids::{ModuleId, ProductId, SequenceKind, UserKey};
use crate::models::inventory::{Product, ProductPayload};
use crate::services::access_service::require_access;

// Cadastro de produtos do módulo Armazém.
#[derive(Clone)]
pub struct InventoryService<S> {
    store: S,
}

impl<S: Store> InventoryService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn create_product(&self, actor: UserKey, payload: ProductPayload) -> Result<Product, AppError> {
        validate(&payload)?;

        let mut tx = self.store.begin().await?;
        require_access(&mut tx, actor, ModuleId::WAREHOUSE).await?;

        let id = tx.next_local_id(actor.tenant, SequenceKind::Product).await?;
        let product = Product {
            tenant_id: actor.tenant,
            id: ProductId(id),
            name: payload.name,
            quantity: payload.quantity,
            price: payload.price,
            description: payload.description,
            category: payload.category,
        };
        tx.insert_product(&product).await?;

        tx.commit().await?;

        tracing::info!(tenant = %actor.tenant, product = %product.id, "📦 Produto cadastrado");
        Ok(product)
    }

    pub async fn update_product(
        &self,
        actor: UserKey,
        id: ProductId,
        payload: ProductPayload,
    ) -> Result<Product, AppError> {
        validate(&payload)?;

        let mut tx = self.store.begin().await?;
        require_access(&mut tx, actor, ModuleId::WAREHOUSE).await?;

        let mut product = tx
            .find_product(actor.tenant, id)
            .await?
            .ok_or_else(|| AppError::not_found("Produto", id))?;

        product.name = payload.name;
        product.quantity = payload.quantity;
        product.price = payload.price;
        product.description = payload.description;
        product.category = payload.category;
        tx.update_product(&product).await?;

        tx.commit().await?;
        Ok(product)
    }

    pub async fn delete_product(&self, actor: UserKey, id: ProductId) -> Result<(), AppError> {
        let mut tx = self.store.begin().await?;
        require_access(&mut tx, actor, ModuleId::WAREHOUSE).await?;

        if !tx.delete_product(actor.tenant, id).await? {
            return Err(AppError::not_found("Produto", id));
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn get_product(&self, actor: UserKey, id: ProductId) -> Result<Product, AppError> {
        let mut tx = self.store.begin().await?;
        require_access(&mut tx, actor, ModuleId::WAREHOUSE).await?;

        tx.find_product(actor.tenant, id)
            .await?
            .ok_or_else(|| AppError::not_found("Produto", id))
    }

    pub async fn list_products(&self, actor: UserKey) -> Result<Vec<Product>, AppError> {
        let mut tx = self.store.begin().await?;
        require_access(&mut tx, actor, ModuleId::WAREHOUSE).await?;

        tx.list_products(actor.tenant).await
    }
}

fn validate(payload: &ProductPayload) -> Result<(), AppError> {
    payload.validate()?;
    if payload.price < Decimal::ZERO {
        return Err(invalid_field("price", "negative", "O preço não pode ser negativo."));
    }
    Ok(())
}
