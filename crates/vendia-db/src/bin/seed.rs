//! # Seed Data Generator
//!
//! Populates the database with development data: a company with sellers,
//! a solo account, a spread of sales and expenses.
//!
//! ## Usage
//! ```bash
//! # Default: 7 days of sales into ./vendia_dev.db
//! cargo run -p vendia-db --bin seed
//!
//! # Custom amount of days
//! cargo run -p vendia-db --bin seed -- --days 30
//!
//! # Specify database path
//! cargo run -p vendia-db --bin seed -- --db ./data/vendia.db
//! ```
//!
//! ## Generated Data
//! - One company (`company-demo`) with three sellers at different rates
//! - One solo account (`solo-demo`)
//! - Per day: a handful of sales per seller across pix/card/cash, most
//!   confirmed, some pending or cancelled
//! - Monthly-style expenses for the company

use chrono::{Duration, Utc};
use std::env;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use vendia_core::{Expense, PaymentMethod, Sale, SaleStatus, Seller};
use vendia_db::{Database, DbConfig};

/// Product catalog used for generated sales (name, unit price in centavos).
const PRODUCTS: &[(&str, i64)] = &[
    ("Brigadeiro", 350),
    ("Beijinho", 350),
    ("Bolo de pote", 1200),
    ("Brownie", 900),
    ("Torta de limão", 1500),
    ("Pão de mel", 750),
    ("Palha italiana", 600),
    ("Cookie", 500),
];

/// Commission rates for the generated sellers, in basis points.
const SELLER_RATES: &[(&str, u32)] = &[("Maria", 1000), ("Bruno", 750), ("Carla", 1250)];

const EXPENSE_CATEGORIES: &[(&str, &str, i64)] = &[
    ("Aluguel do ponto", "fixed", 120_000),
    ("Embalagens", "supplies", 8_500),
    ("Ingredientes", "supplies", 45_000),
    ("Energia elétrica", "fixed", 22_000),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut days: i64 = 7;
    let mut db_path = String::from("./vendia_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--days" | "-n" => {
                if i + 1 < args.len() {
                    days = args[i + 1].parse().unwrap_or(7);
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
                println!("Vendia Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -n, --days <N>     Days of sales to generate (default: 7)");
                println!("  -d, --db <PATH>    Database file path (default: ./vendia_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Vendia Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!("Days:     {}", days);
    println!();

    // Connect to database (runs migrations)
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Skip if already seeded
    let existing = db.sellers().list_active("company-demo").await?;
    if !existing.is_empty() {
        println!("⚠ Database already has {} sellers", existing.len());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Sellers
    println!();
    println!("Generating sellers...");

    let mut seller_ids = Vec::new();
    for (name, bps) in SELLER_RATES {
        let seller = Seller {
            id: Uuid::new_v4().to_string(),
            company_id: "company-demo".to_string(),
            name: (*name).to_string(),
            commission_rate_bps: *bps,
            active: true,
        };
        db.sellers().insert(&seller).await?;
        seller_ids.push(seller.id);
    }
    println!("  {} sellers at rates {:?}", seller_ids.len(), SELLER_RATES);

    // Sales: company sellers + one solo account
    println!();
    println!("Generating sales...");

    let start = std::time::Instant::now();
    let mut generated = 0usize;

    for day in 0..days {
        let sold_at = Utc::now() - Duration::days(day);

        for (seller_idx, seller_id) in seller_ids.iter().enumerate() {
            // 3-5 sales per seller per day, deterministic variation by index
            let sales_today = 3 + ((day as usize + seller_idx) % 3);

            for n in 0..sales_today {
                let (product_name, unit_price) = PRODUCTS[(generated + n) % PRODUCTS.len()];
                let method = match (generated + n) % 3 {
                    0 => PaymentMethod::Pix,
                    1 => PaymentMethod::Card,
                    _ => PaymentMethod::Cash,
                };
                // Mostly confirmed; every 7th pending, every 11th cancelled
                let status = if (generated + n) % 11 == 0 {
                    SaleStatus::Cancelled
                } else if (generated + n) % 7 == 0 {
                    SaleStatus::Pending
                } else {
                    SaleStatus::Confirmed
                };

                let sale = generate_sale(
                    Some("company-demo"),
                    seller_id,
                    product_name,
                    unit_price,
                    1 + (n as i64 % 4),
                    method,
                    status,
                    sold_at,
                );

                if let Err(e) = db.sales().insert(&sale).await {
                    eprintln!("Failed to insert sale: {}", e);
                    continue;
                }
                generated += 1;
            }
        }

        // Solo account: 2 cash-heavy sales per day
        for n in 0..2usize {
            let (product_name, unit_price) = PRODUCTS[(generated + n) % PRODUCTS.len()];
            let sale = generate_sale(
                None,
                "solo-demo",
                product_name,
                unit_price,
                1,
                if n % 2 == 0 {
                    PaymentMethod::Cash
                } else {
                    PaymentMethod::Pix
                },
                SaleStatus::Confirmed,
                sold_at,
            );
            db.sales().insert(&sale).await?;
            generated += 1;
        }
    }

    let elapsed = start.elapsed();
    println!("✓ Generated {} sales in {:?}", generated, elapsed);

    // Expenses
    println!();
    println!("Generating expenses...");

    let today = Utc::now().date_naive();
    for (idx, (description, category, amount)) in EXPENSE_CATEGORIES.iter().enumerate() {
        let expense = Expense {
            id: Uuid::new_v4().to_string(),
            company_id: "company-demo".to_string(),
            description: (*description).to_string(),
            amount_cents: *amount,
            category: (*category).to_string(),
            date: today - Duration::days(idx as i64 * 3),
            paid: idx % 2 == 0,
        };
        db.expenses().insert(&expense).await?;
    }
    println!("  {} expenses", EXPENSE_CATEGORIES.len());

    println!();
    println!("Done. Try:");
    println!("  - open a caixa for seller {}", seller_ids[0]);
    println!("  - or settle the period via CashSessionManager::settle_period");

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn generate_sale(
    company_id: Option<&str>,
    seller_id: &str,
    product_name: &str,
    unit_price_cents: i64,
    quantity: i64,
    payment_method: PaymentMethod,
    status: SaleStatus,
    sold_at: chrono::DateTime<Utc>,
) -> Sale {
    Sale {
        id: Uuid::new_v4().to_string(),
        company_id: company_id.map(str::to_string),
        seller_id: seller_id.to_string(),
        product_id: Uuid::new_v4().to_string(),
        product_name: product_name.to_string(),
        quantity,
        unit_price_cents,
        payment_method,
        status,
        sold_at,
        created_at: sold_at,
        updated_at: sold_at,
    }
}
