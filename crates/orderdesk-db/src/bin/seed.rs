//! # Seed Data Generator
//!
//! Populates the catalog with sample products for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./orderdesk_dev.db with the sample catalog
//! cargo run -p orderdesk-db --bin seed
//!
//! # Only the first N products
//! cargo run -p orderdesk-db --bin seed -- --count 10
//!
//! # Specify database path
//! cargo run -p orderdesk-db --bin seed -- --db ./data/orderdesk.db
//! ```
//!
//! ## Generated Products
//! Each product has:
//! - SKU: `{FAMILY}-{SIZE}`
//! - Full price from the family base plus the size addon
//! - Discounted price at 80% of the full price, rounded down to whole cents

use std::env;

use orderdesk_db::{Database, DbConfig};
use tracing::{info, warn};

/// Product families: (SKU prefix, display name, base full price in cents).
const FAMILIES: &[(&str, &str, i64)] = &[
    ("MUG", "Ceramic Mug", 2500),
    ("TEE", "Cotton T-Shirt", 4900),
    ("CAP", "Baseball Cap", 3500),
    ("BAG", "Canvas Tote Bag", 3900),
    ("BTL", "Steel Water Bottle", 5900),
    ("NTB", "Dotted Notebook", 1900),
];

/// Size variants: (SKU suffix, display suffix, price addon in cents).
const SIZES: &[(&str, &str, i64)] = &[("S", "Small", 0), ("M", "Medium", 500), ("L", "Large", 1000)];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber_init();

    let args: Vec<String> = env::args().collect();

    let mut count: usize = FAMILIES.len() * SIZES.len();
    let mut db_path = String::from("./orderdesk_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(count);
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
                println!("OrderDesk Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to register (default: all)");
                println!("  -d, --db <PATH>    Database file path (default: ./orderdesk_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("OrderDesk Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let repo = db.products();
    let mut generated = 0;

    'families: for (prefix, name, base) in FAMILIES {
        for (suffix, size_name, addon) in SIZES {
            if generated >= count {
                break 'families;
            }

            let sku = format!("{}-{}", prefix, suffix);
            let full = base + addon;
            let discounted = full * 80 / 100;

            match repo
                .register(&sku, &format!("{} {}", name, size_name), full, discounted)
                .await
            {
                Ok(product) => {
                    info!(sku = %product.sku, full, discounted, "Registered product");
                    generated += 1;
                }
                Err(e) => warn!(sku = %sku, error = %e, "Failed to register product"),
            }
        }
    }

    println!("Registered {} products", generated);
    db.close().await;

    Ok(())
}

fn tracing_subscriber_init() {
    // sqlx logs every statement at info
    let filter = env::var("RUST_LOG").unwrap_or_else(|_| "info,sqlx=warn".to_string());
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
