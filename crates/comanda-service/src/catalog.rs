//! # Catalog Service
//!
//! Menu maintenance: categories and products. Both are soft-deleted so
//! historical order items keep resolving; a category with active products
//! refuses deactivation outright.

use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use comanda_core::validation::{validate_name, validate_notes, validate_price_cents};
use comanda_core::{Category, CoreError, Product};
use comanda_db::repository::category::generate_category_id;
use comanda_db::repository::product::generate_product_id;
use comanda_db::Database;

use crate::error::ServiceResult;

/// Input for creating or updating a product.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub category_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub stock: i64,
    pub min_stock: i64,
}

/// Service for catalog (category/product) operations.
#[derive(Debug, Clone)]
pub struct CatalogService {
    db: Database,
}

impl CatalogService {
    /// Creates a new CatalogService.
    pub fn new(db: Database) -> Self {
        CatalogService { db }
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Lists active categories.
    pub async fn list_categories(&self) -> ServiceResult<Vec<Category>> {
        Ok(self.db.categories().list_active().await?)
    }

    /// Lists all categories including deactivated ones.
    pub async fn list_all_categories(&self) -> ServiceResult<Vec<Category>> {
        Ok(self.db.categories().list_all().await?)
    }

    /// Creates a new category.
    pub async fn create_category(&self, name: &str) -> ServiceResult<Category> {
        let name = validate_name("category name", name)?;

        let now = Utc::now();
        let category = Category {
            id: generate_category_id(),
            name,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let category = self.db.categories().insert(&category).await?;

        info!(category_id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    /// Renames a category.
    pub async fn rename_category(&self, id: &str, name: &str) -> ServiceResult<Category> {
        let name = validate_name("category name", name)?;

        self.db.categories().update(id, &name).await?;

        self.db
            .categories()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::CategoryNotFound(id.to_string()).into())
    }

    /// Deactivates a category.
    ///
    /// Rejected while active products remain in it; the error carries the
    /// count so the caller can show "move these N products first".
    pub async fn deactivate_category(&self, id: &str) -> ServiceResult<()> {
        let count = self.db.categories().count_active_products(id).await?;
        if count > 0 {
            return Err(CoreError::CategoryInUse { count }.into());
        }

        self.db.categories().deactivate(id).await?;

        info!(category_id = %id, "Category deactivated");
        Ok(())
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Lists active products (the menu).
    pub async fn list_products(&self) -> ServiceResult<Vec<Product>> {
        Ok(self.db.products().list_active().await?)
    }

    /// Lists all products including deactivated ones.
    pub async fn list_all_products(&self) -> ServiceResult<Vec<Product>> {
        Ok(self.db.products().list_all().await?)
    }

    /// Lists active products in one category.
    pub async fn list_products_by_category(&self, category_id: &str) -> ServiceResult<Vec<Product>> {
        Ok(self.db.products().list_by_category(category_id).await?)
    }

    /// Gets a single product.
    pub async fn get_product(&self, id: &str) -> ServiceResult<Product> {
        let product = self
            .db
            .products()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;

        Ok(product)
    }

    /// Creates a new product.
    pub async fn create_product(&self, input: ProductInput) -> ServiceResult<Product> {
        let name = validate_name("product name", &input.name)?;
        validate_price_cents(input.price_cents)?;
        let description = validate_notes(input.description.as_deref())?;

        // The category must exist and be active
        let category = self
            .db
            .categories()
            .get_by_id(&input.category_id)
            .await?
            .filter(|c| c.is_active)
            .ok_or_else(|| CoreError::CategoryNotFound(input.category_id.clone()))?;

        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            category_id: category.id,
            name,
            description,
            price_cents: input.price_cents,
            stock: input.stock,
            min_stock: input.min_stock,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let product = self.db.products().insert(&product).await?;

        info!(product_id = %product.id, name = %product.name, "Product created");
        Ok(product)
    }

    /// Updates a product.
    ///
    /// Open order items are unaffected: their unit price was frozen when
    /// they were added.
    pub async fn update_product(&self, id: &str, input: ProductInput) -> ServiceResult<Product> {
        let name = validate_name("product name", &input.name)?;
        validate_price_cents(input.price_cents)?;
        let description = validate_notes(input.description.as_deref())?;

        let mut product = self.get_product(id).await?;
        product.category_id = input.category_id;
        product.name = name;
        product.description = description;
        product.price_cents = input.price_cents;
        product.stock = input.stock;
        product.min_stock = input.min_stock;

        self.db.products().update(&product).await?;

        info!(product_id = %id, "Product updated");
        self.get_product(id).await
    }

    /// Deactivates a product (soft delete). No cascade: the category and
    /// historical order items are untouched.
    pub async fn deactivate_product(&self, id: &str) -> ServiceResult<()> {
        self.db.products().soft_delete(id).await?;

        info!(product_id = %id, "Product deactivated");
        Ok(())
    }

    /// Restores a previously deactivated product.
    pub async fn reactivate_product(&self, id: &str) -> ServiceResult<()> {
        self.db.products().reactivate(id).await?;

        info!(product_id = %id, "Product reactivated");
        Ok(())
    }

    /// Lists active products at or below their low-stock threshold.
    ///
    /// Stock is informational only; this list is the whole point of
    /// carrying it.
    pub async fn low_stock(&self) -> ServiceResult<Vec<Product>> {
        Ok(self.db.products().list_low_stock().await?)
    }
}

// =============================================================================
// Integration Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::testing::test_db;

    async fn setup() -> (CatalogService, Category) {
        let db = test_db().await;
        let svc = CatalogService::new(db);
        let category = svc.create_category("Bebidas").await.unwrap();
        (svc, category)
    }

    fn input(category_id: &str, name: &str, price_cents: i64) -> ProductInput {
        ProductInput {
            category_id: category_id.to_string(),
            name: name.to_string(),
            description: None,
            price_cents,
            stock: 10,
            min_stock: 5,
        }
    }

    #[tokio::test]
    async fn test_create_product() {
        let (svc, category) = setup().await;

        let product = svc
            .create_product(input(&category.id, "Limonada", 3500))
            .await
            .unwrap();

        assert_eq!(product.price_cents, 3500);
        assert!(product.is_active);

        let menu = svc.list_products().await.unwrap();
        assert_eq!(menu.len(), 1);
    }

    #[tokio::test]
    async fn test_product_price_must_be_positive() {
        let (svc, category) = setup().await;

        let err = svc
            .create_product(input(&category.id, "Gratis", 0))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = svc
            .create_product(input(&category.id, "", 3500))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_deactivate_category_with_active_products_rejected() {
        let (svc, category) = setup().await;

        svc.create_product(input(&category.id, "Limonada", 3500))
            .await
            .unwrap();
        svc.create_product(input(&category.id, "Refresco", 3000))
            .await
            .unwrap();

        let err = svc.deactivate_category(&category.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert_eq!(err.message, "Category has 2 active products");
    }

    #[tokio::test]
    async fn test_deactivate_category_after_products_deactivated() {
        let (svc, category) = setup().await;

        let product = svc
            .create_product(input(&category.id, "Limonada", 3500))
            .await
            .unwrap();

        svc.deactivate_product(&product.id).await.unwrap();
        svc.deactivate_category(&category.id).await.unwrap();

        assert!(svc.list_categories().await.unwrap().is_empty());
        // Still visible in the admin listing
        assert_eq!(svc.list_all_categories().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_low_stock_listing() {
        let (svc, category) = setup().await;

        let mut low = input(&category.id, "Pescado del Día", 18500);
        low.stock = 3;
        low.min_stock = 5;
        svc.create_product(low).await.unwrap();

        let mut ok = input(&category.id, "Refresco", 3000);
        ok.stock = 50;
        ok.min_stock = 5;
        svc.create_product(ok).await.unwrap();

        let flagged = svc.low_stock().await.unwrap();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].name, "Pescado del Día");
    }
}
