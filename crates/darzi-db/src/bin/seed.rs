//! # Seed Data Generator
//!
//! Populates the database with sample tailoring records for
//! development.
//!
//! ## Usage
//! ```bash
//! # Generate 40 customers (default)
//! cargo run -p darzi-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p darzi-db --bin seed -- --count 100
//!
//! # Specify database path
//! cargo run -p darzi-db --bin seed -- --db ./data/darzi.db
//! ```
//!
//! ## Generated Data
//! Every customer gets a naap number from the live allocator, one or
//! two measurement records (Shalwar Kameez measurements filled in,
//! other garments left unstructured), and most get an open order with
//! a derived payment state. A handful of orders are marked Delivered
//! so the active worklist looks realistic.

use chrono::{Duration, Utc};
use std::env;

use darzi_core::fields::{MeasurementFields, SuitFields};
use darzi_core::{DressType, Money, NewMeasurement, NewOrder, OrderStatus};
use darzi_db::{Database, DbConfig};

/// Sample customer names.
const FIRST_NAMES: &[&str] = &[
    "Aisha", "Bilal", "Chandni", "Dawood", "Eman", "Farhan", "Gulnaz", "Hamza", "Iqra", "Junaid",
    "Kiran", "Laiba", "Mansoor", "Nadia", "Omar", "Parveen", "Qasim", "Rabia", "Saad", "Tahira",
];

const LAST_NAMES: &[&str] = &[
    "Khan", "Ahmed", "Malik", "Iqbal", "Sheikh", "Butt", "Qureshi", "Chaudhry", "Baig", "Mirza",
];

const ADDRESSES: &[&str] = &[
    "Al Karama",
    "Deira, Naif Road",
    "Bur Dubai",
    "Al Qusais",
    "Satwa",
];

const DRESS_TYPES: &[DressType] = &[
    DressType::ShalwarKameez,
    DressType::Kurta,
    DressType::PantShirt,
    DressType::Waistcoat,
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 40;
    let mut db_path = String::from("./darzi_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(40);
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
                println!("Darzi Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of customers to generate (default: 40)");
                println!("  -d, --db <PATH>    Database file path (default: ./darzi_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Darzi Seed Data Generator");
    println!("============================");
    println!("Database:  {}", db_path);
    println!("Customers: {}", count);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing data
    let existing = db.customers().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} customers", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Generating records...");

    let today = Utc::now().date_naive();
    let mut measurements = 0usize;
    let mut orders = 0usize;

    for seed in 0..count {
        let first = FIRST_NAMES[seed % FIRST_NAMES.len()];
        let last = LAST_NAMES[(seed / FIRST_NAMES.len() + seed) % LAST_NAMES.len()];
        let full_name = format!("{first} {last}");
        let mobile = format!("05{:08}", 10000000 + seed * 37);
        let address = (seed % 3 != 0).then(|| ADDRESSES[seed % ADDRESSES.len()]);
        let entry_date = today - Duration::days((seed % 90) as i64);

        let customer = db
            .customers()
            .create(&full_name, &mobile, address, entry_date)
            .await?;

        // One or two measurement records each
        for garment in 0..=(seed % 2) {
            let dress_type = DRESS_TYPES[(seed + garment) % DRESS_TYPES.len()].clone();
            let urgent = seed % 5 == 0;
            db.measurements()
                .create(
                    NewMeasurement {
                        customer_id: customer.id,
                        fields: sample_fields(&dress_type, seed),
                        dress_type,
                        collar_type: Some("Ban collar".to_string()),
                        stitch_type: Some(if seed % 2 == 0 { "Single" } else { "Double" }.to_string()),
                        fabric_type: Some(if seed % 3 == 0 { "Boski" } else { "Cotton" }.to_string()),
                        tailor_instructions: (seed % 4 == 0)
                            .then(|| "Front pocket, narrow cuffs".to_string()),
                        urgent_delivery: urgent,
                        expected_delivery_date: urgent.then(|| today + Duration::days(3)),
                    },
                    entry_date,
                )
                .await?;
            measurements += 1;
        }

        // Most customers have an order on the books
        if seed % 4 != 3 {
            let price = 4000 + ((seed * 731) % 12000) as i64;
            let paid = match seed % 3 {
                0 => 0,
                1 => price / 2,
                _ => price,
            };
            let order = db
                .orders()
                .create(NewOrder {
                    customer_id: customer.id,
                    measurement_id: None,
                    due_date: today + Duration::days((seed % 14) as i64),
                    price: Money::from_cents(price),
                    amount_paid: Money::from_cents(paid),
                    notes: None,
                })
                .await?;
            orders += 1;

            if seed % 7 == 0 {
                db.orders().update_status(order.id, OrderStatus::Delivered).await?;
            }
        }

        if (seed + 1) % 10 == 0 {
            println!("  Generated {} customers...", seed + 1);
        }
    }

    println!();
    println!("✓ Generated {} customers", count);
    println!("  {} measurements, {} orders", measurements, orders);

    // Verify the dashboard queries
    println!();
    println!("Verifying queries...");
    let active = db.orders().list_active().await?;
    println!("  Active worklist: {} orders", active.len());
    let urgent = db.measurements().count_urgent_pending(today).await?;
    println!("  Urgent pending: {} measurements", urgent);
    let hits = db.customers().search("Khan").await?;
    println!("  Search 'Khan': {} customers", hits.len());

    println!();
    println!("✓ Seed complete!");
    println!("  Login with admin / password");

    Ok(())
}

/// Builds measurement fields appropriate for the garment.
fn sample_fields(dress_type: &DressType, seed: usize) -> MeasurementFields {
    if dress_type.has_suit_fields() {
        let base = 38 + (seed % 8) as i64;
        MeasurementFields::Suit(SuitFields {
            length: format!("{}", base + 4),
            width: format!("{}", base / 2 + 3),
            chest: format!("{}", base + 8),
            waist: format!("{}", base + 2),
            sleeve: format!("{}.5", base / 2 + 5),
            neck: format!("{}", 15 + (seed % 3)),
            shalwar_waist: format!("{}", base),
            pancha: format!("{}", 8 + (seed % 3)),
        })
    } else {
        MeasurementFields::for_dress_type(dress_type)
    }
}
