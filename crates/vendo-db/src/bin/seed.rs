//! # Seed Data Generator
//!
//! Populates the database with demo catalog products for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default database
//! cargo run -p vendo-db --bin seed
//!
//! # Specify database path
//! cargo run -p vendo-db --bin seed -- --db ./data/vendo.db
//! ```

use std::env;

use rust_decimal::Decimal;
use vendo_core::{Money, Product};
use vendo_db::{Database, DbConfig};

/// Demo catalog: (title, price cents, description, category)
const CATALOG: &[(&str, i64, &str, &str)] = &[
    ("Espresso Beans 1kg", 1899, "Dark roast arabica beans", "coffee"),
    ("Filter Coffee 500g", 999, "Medium roast, pre-ground", "coffee"),
    ("Cold Brew Concentrate", 1250, "Ready-to-dilute cold brew", "coffee"),
    ("Ceramic Mug", 799, "Stoneware mug, 350ml", "drinkware"),
    ("Travel Tumbler", 2199, "Insulated steel tumbler, 470ml", "drinkware"),
    ("Pour-Over Kettle", 4500, "Gooseneck kettle, 1L", "equipment"),
    ("Hand Grinder", 3999, "Conical burr hand grinder", "equipment"),
    ("Paper Filters x100", 449, "Size 02 cone filters", "equipment"),
    ("Milk Frother", 1599, "Battery-powered frother", "equipment"),
    ("Sample Roast Box", 2999, "Four 100g single-origin samples", "coffee"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./vendo_dev.db");
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Vendo Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./vendo_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Vendo Seed Data Generator");
    println!("=========================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("Connected, migrations applied");
    println!();
    println!("Seeding catalog...");

    let mut inserted = 0;
    for (title, cents, description, category) in CATALOG {
        let product = Product::new(
            *title,
            Money::new(Decimal::new(*cents, 2)),
            *description,
            *category,
            format!("{}.png", title.to_lowercase().replace(' ', "-")),
        )?;

        match db.products().insert(&product).await {
            Ok(()) => inserted += 1,
            // Re-running against a seeded database is fine; skip duplicates
            Err(vendo_db::DbError::UniqueViolation { .. }) => {
                println!("  skipped (exists): {}", title);
            }
            Err(e) => return Err(e.into()),
        }
    }

    println!();
    println!("Seed complete: {} products inserted", inserted);

    Ok(())
}
