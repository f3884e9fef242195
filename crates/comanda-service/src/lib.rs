//! # comanda-service: Workflow Layer for Comanda POS
//!
//! Orchestrates the restaurant workflows over comanda-core (pure rules)
//! and comanda-db (persistence).
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Comanda POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              ★ comanda-service (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │  OrderService     open_order, add_item, send_to_cash,          │   │
//! │  │                   checkout, checkout_on_credit, cancel         │   │
//! │  │  RegisterService  open_shift, close_shift, summary             │   │
//! │  │  TableService     floor plan maintenance                       │   │
//! │  │  CatalogService   categories and products                      │   │
//! │  │  ReceivableService / ReportService                             │   │
//! │  │                                                                 │   │
//! │  │  All fallible calls return Result<T, ServiceError>             │   │
//! │  └───────────────┬─────────────────────────┬───────────────────────┘   │
//! │                  │                         │                            │
//! │                  ▼                         ▼                            │
//! │          comanda-core               comanda-db                          │
//! │          (pure rules)               (SQLite/sqlx)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use comanda_db::{Database, DbConfig};
//! use comanda_service::OrderService;
//!
//! let db = Database::new(DbConfig::new("./comanda.db")).await?;
//! let orders = OrderService::new(db.clone());
//!
//! let order = orders.open_order(&table_id, &user_id, None).await?;
//! orders.add_item(&order.id, &product_id, 2, None).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod orders;
pub mod receivables;
pub mod register;
pub mod reports;
pub mod tables;

// =============================================================================
// Re-exports
// =============================================================================

pub use catalog::{CatalogService, ProductInput};
pub use error::{ErrorCode, ServiceError, ServiceResult};
pub use orders::{OrderDetail, OrderService};
pub use receivables::ReceivableService;
pub use register::{RegisterService, ShiftSummary};
pub use reports::{DailyReport, ReportService};
pub use tables::TableService;

// =============================================================================
// Test Support
// =============================================================================

#[cfg(test)]
pub(crate) mod testing {
    //! Shared fixtures for the service tests: an in-memory database with
    //! one user, one table and one 10000-cent product.

    use chrono::{DateTime, Utc};
    use uuid::Uuid;

    use comanda_core::{
        Category, DiningTable, Order, OrderStatus, Product, TableStatus, User, UserRole,
    };
    use comanda_db::{Database, DbConfig};

    pub async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    pub struct TestFixture {
        pub db: Database,
        pub user: User,
        pub table: DiningTable,
        pub category: Category,
        pub product: Product,
    }

    impl TestFixture {
        pub async fn new() -> Self {
            let db = test_db().await;
            let now = Utc::now();

            let user = User {
                id: Uuid::new_v4().to_string(),
                name: "Mesero Demo".to_string(),
                email: "mesero@comanda.local".to_string(),
                role: UserRole::Waiter,
                created_at: now,
            };
            db.users().insert(&user).await.unwrap();

            let table = DiningTable {
                id: Uuid::new_v4().to_string(),
                name: "Mesa 1".to_string(),
                capacity: 4,
                status: TableStatus::Free,
                created_at: now,
                updated_at: now,
            };
            db.tables().insert(&table).await.unwrap();

            let category = Category {
                id: Uuid::new_v4().to_string(),
                name: "Platos Fuertes".to_string(),
                is_active: true,
                created_at: now,
                updated_at: now,
            };
            db.categories().insert(&category).await.unwrap();

            let product = Product {
                id: Uuid::new_v4().to_string(),
                category_id: category.id.clone(),
                name: "Tacos al Pastor".to_string(),
                description: None,
                price_cents: 10000,
                stock: 50,
                min_stock: 5,
                is_active: true,
                created_at: now,
                updated_at: now,
            };
            db.products().insert(&product).await.unwrap();

            TestFixture {
                db,
                user,
                table,
                category,
                product,
            }
        }

        pub async fn insert_table(&self, name: &str) -> DiningTable {
            let now = Utc::now();
            let table = DiningTable {
                id: Uuid::new_v4().to_string(),
                name: name.to_string(),
                capacity: 4,
                status: TableStatus::Free,
                created_at: now,
                updated_at: now,
            };
            self.db.tables().insert(&table).await.unwrap()
        }

        /// Inserts an order row directly, bypassing the lifecycle. Used to
        /// plant historical rows (e.g. paid before a shift opened). Gets
        /// its own table so the one-active-order index never interferes.
        pub async fn insert_order_raw(
            &self,
            status: OrderStatus,
            total_cents: i64,
            created_at: DateTime<Utc>,
        ) -> Order {
            let table = self
                .insert_table(&format!("Mesa raw {}", Uuid::new_v4()))
                .await;

            let terminal = status.is_terminal();
            let order = Order {
                id: Uuid::new_v4().to_string(),
                table_id: table.id,
                user_id: self.user.id.clone(),
                status,
                total_cents,
                payment_method: None,
                notes: None,
                created_at,
                updated_at: created_at,
                closed_at: if terminal { Some(created_at) } else { None },
            };
            self.db.orders().insert(&order).await.unwrap()
        }
    }
}
