//! # Seed Data Generator
//!
//! Populates the database with a demo restaurant for development.
//!
//! ## Usage
//! ```bash
//! # Seed with defaults (10 tables, full demo menu)
//! cargo run -p comanda-db --bin seed
//!
//! # Custom table count
//! cargo run -p comanda-db --bin seed -- --tables 16
//!
//! # Specify database path
//! cargo run -p comanda-db --bin seed -- --db ./data/comanda.db
//! ```
//!
//! ## Generated Data
//! - One admin, one waiter and one cashier user
//! - Dining tables "Mesa 1".."Mesa N" with varied capacity
//! - Categories with a realistic menu each (Bebidas, Entradas,
//!   Platos Fuertes, Postres)

use chrono::Utc;
use std::env;

use comanda_core::{Category, DiningTable, Product, TableStatus, User, UserRole};
use comanda_db::repository::category::generate_category_id;
use comanda_db::repository::product::generate_product_id;
use comanda_db::repository::table::generate_table_id;
use comanda_db::repository::user::generate_user_id;
use comanda_db::{Database, DbConfig};

/// Demo menu: (category, [(product, price_cents, stock)]).
const MENU: &[(&str, &[(&str, i64, i64)])] = &[
    (
        "Bebidas",
        &[
            ("Limonada", 3500, 40),
            ("Agua Mineral", 2500, 60),
            ("Refresco", 3000, 48),
            ("Jugo de Naranja", 4000, 25),
            ("Cerveza Nacional", 5500, 36),
            ("Café Americano", 2800, 100),
        ],
    ),
    (
        "Entradas",
        &[
            ("Guacamole con Totopos", 8500, 20),
            ("Queso Fundido", 9500, 15),
            ("Sopa del Día", 6500, 12),
            ("Ensalada de la Casa", 7500, 18),
        ],
    ),
    (
        "Platos Fuertes",
        &[
            ("Tacos al Pastor", 12500, 30),
            ("Enchiladas Verdes", 13500, 24),
            ("Pollo a la Plancha", 15500, 20),
            ("Pescado del Día", 18500, 10),
            ("Arrachera", 22500, 12),
            ("Hamburguesa de la Casa", 14500, 25),
        ],
    ),
    (
        "Postres",
        &[
            ("Flan Napolitano", 5500, 14),
            ("Pastel de Chocolate", 6500, 10),
            ("Helado (2 bolas)", 4500, 30),
        ],
    ),
];

/// Demo staff: (name, email, role).
const STAFF: &[(&str, &str, UserRole)] = &[
    ("Admin Demo", "admin@comanda.local", UserRole::Admin),
    ("Mesero Demo", "mesero@comanda.local", UserRole::Waiter),
    ("Cajero Demo", "cajero@comanda.local", UserRole::Cashier),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut table_count: usize = 10;
    let mut db_path = String::from("./comanda_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--tables" | "-t" => {
                if i + 1 < args.len() {
                    table_count = args[i + 1].parse().unwrap_or(10);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Comanda POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -t, --tables <N>   Number of dining tables (default: 10)");
                println!("  -d, --db <PATH>    Database file path (default: ./comanda_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Comanda POS Seed Data Generator");
    println!("==================================");
    println!("Database: {}", db_path);
    println!("Tables:   {}", table_count);
    println!();

    // Connect to database (runs migrations)
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing data
    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let now = Utc::now();

    // Staff
    println!();
    println!("Creating staff...");
    for (name, email, role) in STAFF {
        let user = User {
            id: generate_user_id(),
            name: name.to_string(),
            email: email.to_string(),
            role: *role,
            created_at: now,
        };
        db.users().insert(&user).await?;
    }
    println!("✓ Created {} users", STAFF.len());

    // Floor plan
    println!("Creating dining tables...");
    for n in 1..=table_count {
        let table = DiningTable {
            id: generate_table_id(),
            name: format!("Mesa {}", n),
            // Mix of 2-tops, 4-tops and a few 6-tops
            capacity: match n % 5 {
                0 => 6,
                1 | 2 => 4,
                _ => 2,
            },
            status: TableStatus::Free,
            created_at: now,
            updated_at: now,
        };
        db.tables().insert(&table).await?;
    }
    println!("✓ Created {} tables", table_count);

    // Menu
    println!("Creating menu...");
    let mut product_count = 0;
    for (category_name, products) in MENU {
        let category = Category {
            id: generate_category_id(),
            name: category_name.to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        db.categories().insert(&category).await?;

        for (product_name, price_cents, stock) in *products {
            let product = Product {
                id: generate_product_id(),
                category_id: category.id.clone(),
                name: product_name.to_string(),
                description: None,
                price_cents: *price_cents,
                stock: *stock,
                min_stock: 5,
                is_active: true,
                created_at: now,
                updated_at: now,
            };
            db.products().insert(&product).await?;
            product_count += 1;
        }
    }
    println!(
        "✓ Created {} categories with {} products",
        MENU.len(),
        product_count
    );

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
