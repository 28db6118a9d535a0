//! Catalog stores
//!
//! Category and product persistence on top of the generic soft-delete store.

use sqlx::PgPool;

use crate::domain::{Amount, Category, OperationContext, Product, ShopError};
use crate::error::{AppError, AppResult};

use super::{Page, PageRequest, SoftDeleteStore, SortOrder, StoreError};

/// Input for creating a category. When `order` is not supplied the store
/// assigns current-max + 1 among non-deleted categories.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub order: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct CategoryStore {
    base: SoftDeleteStore<Category>,
}

impl CategoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            base: SoftDeleteStore::new(pool),
        }
    }

    /// Create a category. Order assignment happens inside the insert so two
    /// concurrent creates cannot both read the same maximum.
    pub async fn create(&self, new: NewCategory, ctx: &OperationContext) -> AppResult<Category> {
        let category: Category = sqlx::query_as(
            r#"
            INSERT INTO categories (name, orders, description, created_by, last_modified_by)
            VALUES (
                $1,
                COALESCE($2, (SELECT COALESCE(MAX(orders), 0) + 1 FROM categories WHERE deleted = FALSE)),
                $3,
                $4,
                $4
            )
            RETURNING *
            "#,
        )
        .bind(&new.name)
        .bind(new.order)
        .bind(&new.description)
        .bind(&ctx.actor)
        .fetch_one(self.base.pool())
        .await?;

        tracing::info!(category_id = category.id, order = category.order, "category created");
        Ok(category)
    }

    pub async fn get_one(&self, id: i64, ctx: &OperationContext) -> AppResult<Category> {
        self.base.get(id).await.map_err(|e| match e {
            StoreError::NotFound(id) => AppError::domain(ShopError::CategoryNotFound(id), ctx.locale),
            StoreError::Database(e) => e.into(),
        })
    }

    /// Categories paged by display order.
    pub async fn list(&self, request: PageRequest) -> AppResult<Page<Category>> {
        Ok(self
            .base
            .list_not_deleted(request, SortOrder::DisplayOrderAsc)
            .await
            .map_err(store_db)?)
    }
}

/// Input for creating a product. Price is already a validated [`Amount`].
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name_uz: String,
    pub name_ru: String,
    pub name_en: String,
    pub count: i64,
    pub price: Amount,
    pub category_id: i64,
}

#[derive(Debug, Clone)]
pub struct ProductStore {
    base: SoftDeleteStore<Product>,
}

impl ProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            base: SoftDeleteStore::new(pool),
        }
    }

    /// Create a product under an existing non-deleted category.
    pub async fn create(&self, new: NewProduct, ctx: &OperationContext) -> AppResult<Product> {
        if new.count < 0 {
            return Err(AppError::domain(
                ShopError::invalid_amount(format!("stock count must not be negative (got {})", new.count)),
                ctx.locale,
            ));
        }

        let category_exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM categories WHERE id = $1 AND deleted = FALSE)",
        )
        .bind(new.category_id)
        .fetch_one(self.base.pool())
        .await?;

        if !category_exists {
            return Err(AppError::domain(
                ShopError::CategoryNotFound(new.category_id),
                ctx.locale,
            ));
        }

        let product: Product = sqlx::query_as(
            r#"
            INSERT INTO products (name_uz, name_ru, name_en, count, price, category_id, created_by, last_modified_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING *
            "#,
        )
        .bind(&new.name_uz)
        .bind(&new.name_ru)
        .bind(&new.name_en)
        .bind(new.count)
        .bind(new.price.value())
        .bind(new.category_id)
        .bind(&ctx.actor)
        .fetch_one(self.base.pool())
        .await?;

        tracing::info!(product_id = product.id, category_id = product.category_id, "product created");
        Ok(product)
    }

    pub async fn get_one(&self, id: i64, ctx: &OperationContext) -> AppResult<Product> {
        self.base.get(id).await.map_err(|e| not_found_product(e, ctx))
    }

    /// Products paged newest-first.
    pub async fn list(&self, request: PageRequest) -> AppResult<Page<Product>> {
        Ok(self
            .base
            .list_not_deleted(request, SortOrder::CreatedDesc)
            .await
            .map_err(store_db)?)
    }

    /// Soft-delete a product. An absent or already-trashed id is reported as
    /// not found.
    pub async fn trash(&self, id: i64, ctx: &OperationContext) -> AppResult<Product> {
        let product = self
            .base
            .trash(id, ctx)
            .await
            .map_err(|e| not_found_product(e, ctx))?;
        tracing::info!(product_id = id, actor = %ctx.actor, "product trashed");
        Ok(product)
    }
}

fn not_found_product(err: StoreError, ctx: &OperationContext) -> AppError {
    match err {
        StoreError::NotFound(id) => AppError::domain(ShopError::ProductNotFound(id), ctx.locale),
        StoreError::Database(e) => e.into(),
    }
}

fn store_db(err: StoreError) -> AppError {
    match err {
        // list/count paths never produce NotFound
        StoreError::NotFound(id) => AppError::Internal(format!("unexpected NotFound for id {id}")),
        StoreError::Database(e) => e.into(),
    }
}
