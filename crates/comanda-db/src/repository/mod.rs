//! # Repository Layer
//!
//! One repository per aggregate, each a thin wrapper around the shared
//! `SqlitePool`. Repositories own the SQL; they do not make workflow
//! decisions (that is comanda-service's job).
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Repository Layout                                 │
//! │                                                                         │
//! │  TableRepository       dining_tables                                    │
//! │  CategoryRepository    categories                                       │
//! │  ProductRepository     products                                         │
//! │  OrderRepository       orders + order_items (total kept transactional)  │
//! │  RegisterRepository    cash_registers                                   │
//! │  ReceivableRepository  accounts_receivable                              │
//! │  UserRepository        users                                            │
//! │  ReportRepository      read-only joins across orders/items/products     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod category;
pub mod order;
pub mod product;
pub mod receivable;
pub mod register;
pub mod report;
pub mod table;
pub mod user;

pub use category::CategoryRepository;
pub use order::OrderRepository;
pub use product::ProductRepository;
pub use receivable::ReceivableRepository;
pub use register::RegisterRepository;
pub use report::ReportRepository;
pub use table::TableRepository;
pub use user::UserRepository;
