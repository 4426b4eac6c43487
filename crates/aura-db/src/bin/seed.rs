//! # Seed Data Generator
//!
//! Populates the database with a demo salon for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default development database
//! cargo run -p aura-db --bin seed
//!
//! # Specify database path
//! cargo run -p aura-db --bin seed -- --db ./data/aura.db
//!
//! # Also run a demo settlement against the seeded data
//! cargo run -p aura-db --bin seed -- --settle
//! ```
//!
//! Creates one store ("Aura Salon Indiranagar", 18% tax), a service
//! menu, a retail shelf with stock, and a handful of customers - one
//! with a Gold membership and a starting point balance.

use aura_core::{ItemType, LineItem, PaymentMethod, SettlementRequest};
use aura_db::{Database, DbConfig};
use chrono::{Duration, Utc};
use std::env;
use tracing_subscriber::EnvFilter;

/// (name, price in cents, duration minutes)
const SERVICES: &[(&str, i64, i64)] = &[
    ("Haircut - Women", 100_000, 60),
    ("Haircut - Men", 50_000, 30),
    ("Hair Spa", 150_000, 75),
    ("Global Hair Color", 350_000, 120),
    ("Root Touch-up", 180_000, 60),
    ("Classic Facial", 120_000, 60),
    ("Gold Facial", 250_000, 90),
    ("Manicure", 60_000, 45),
    ("Pedicure", 80_000, 60),
    ("Full Body Wax", 200_000, 90),
    ("Eyebrow Threading", 5_000, 10),
    ("Beard Trim", 25_000, 20),
];

/// (name, price in cents, stock, reorder threshold)
const PRODUCTS: &[(&str, i64, i64, i64)] = &[
    ("Argan Oil Shampoo 250ml", 85_000, 24, 6),
    ("Keratin Conditioner 250ml", 95_000, 18, 6),
    ("Hair Serum 100ml", 120_000, 12, 4),
    ("Moroccan Hair Oil 100ml", 140_000, 10, 4),
    ("Sunscreen SPF50 50ml", 65_000, 30, 8),
    ("Vitamin C Face Wash", 45_000, 20, 5),
    ("Charcoal Face Mask", 55_000, 15, 5),
    ("Hair Wax - Matte", 40_000, 16, 4),
    ("Nail Polish Remover", 15_000, 25, 8),
    ("Cuticle Oil 15ml", 35_000, 8, 4),
];

/// (name, phone, starting points)
const CUSTOMERS: &[(&str, &str, i64)] = &[
    ("Priya Sharma", "+91-98450-11111", 250),
    ("Rahul Verma", "+91-98450-22222", 0),
    ("Meera Iyer", "+91-98450-33333", 1200),
    ("Ananya Rao", "+91-98450-44444", 45),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./aura_dev.db");
    let mut run_demo_settlement = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--settle" | "-s" => {
                run_demo_settlement = true;
            }
            "--help" | "-h" => {
                println!("Aura POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./aura_dev.db)");
                println!("  -s, --settle       Run a demo settlement after seeding");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Aura POS Seed Data Generator");
    println!("===============================");
    println!("Database: {}", db_path);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Skip seeding into a non-empty database
    let existing = db.stores().list().await?;
    if !existing.is_empty() {
        println!("⚠ Database already has {} store(s)", existing.len());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        if run_demo_settlement {
            demo_settlement(&db, &existing[0].id).await?;
        }
        return Ok(());
    }

    println!();
    println!("Seeding demo salon...");

    let store = db
        .stores()
        .create("Aura Salon Indiranagar", "AUR", 1800)
        .await?;
    println!("  Store: {} ({})", store.name, store.invoice_prefix);

    for (name, price_cents, duration_min) in SERVICES {
        db.products()
            .create_service(&store.id, name, *price_cents, *duration_min)
            .await?;
    }
    println!("  Services: {}", SERVICES.len());

    for (name, price_cents, stock, min_stock) in PRODUCTS {
        db.products()
            .create(&store.id, name, *price_cents, *stock, *min_stock)
            .await?;
    }
    println!("  Products: {}", PRODUCTS.len());

    let now = Utc::now();
    for (idx, (name, phone, points)) in CUSTOMERS.iter().enumerate() {
        let customer = db.customers().create(&store.id, name, Some(phone)).await?;

        if *points > 0 {
            sqlx::query("UPDATE customers SET loyalty_points = ?2 WHERE id = ?1")
                .bind(&customer.id)
                .bind(points)
                .execute(db.pool())
                .await?;
        }

        // first customer gets the Gold plan
        if idx == 0 {
            db.customers()
                .grant_membership(
                    &customer.id,
                    "Gold",
                    1500,
                    now - Duration::days(30),
                    now + Duration::days(335),
                )
                .await?;
            println!("  Customer: {} (Gold, {} pts)", name, points);
        } else {
            println!("  Customer: {} ({} pts)", name, points);
        }
    }

    println!();
    println!("✓ Seed complete!");

    if run_demo_settlement {
        demo_settlement(&db, &store.id).await?;
    }

    Ok(())
}

/// Runs one walk-in settlement against the seeded catalog and prints
/// the receipt, as a smoke test of the whole settlement path.
async fn demo_settlement(db: &Database, store_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!();
    println!("Running demo settlement...");

    let services = db.products().list_services(store_id).await?;
    let products = db.products().list_by_store(store_id).await?;
    let (Some(service), Some(product)) = (services.first(), products.first()) else {
        println!("⚠ Catalog is empty, skipping demo settlement");
        return Ok(());
    };

    let request = SettlementRequest {
        store_id: store_id.to_string(),
        customer_id: None,
        items: vec![
            LineItem {
                item_type: ItemType::Service,
                item_id: service.id.clone(),
                name: service.name.clone(),
                unit_price_cents: service.price_cents,
                quantity: 1,
                is_custom_price: false,
            },
            LineItem {
                item_type: ItemType::Product,
                item_id: product.id.clone(),
                name: product.name.clone(),
                unit_price_cents: product.price_cents,
                quantity: 1,
                is_custom_price: false,
            },
        ],
        payment_method: PaymentMethod::Upi,
        staff_id: "seed-staff".to_string(),
        points_to_redeem: 0,
    };

    let receipt = db.settlements().settle(&request).await?;
    let txn = &receipt.transaction;

    println!("  Invoice:  {}", txn.invoice_number);
    for item in &receipt.items {
        println!(
            "    {} x{}  @ {}.{:02}",
            item.name,
            item.quantity,
            item.unit_price_cents / 100,
            item.unit_price_cents % 100
        );
    }
    println!("  Subtotal: {}.{:02}", txn.subtotal_cents / 100, txn.subtotal_cents % 100);
    println!("  Tax:      {}.{:02}", txn.tax_cents / 100, txn.tax_cents % 100);
    println!("  Total:    {}.{:02}", txn.total_cents / 100, txn.total_cents % 100);
    println!("  Points:   +{}", txn.points_earned);
    println!();
    println!("✓ Demo settlement committed");

    Ok(())
}
