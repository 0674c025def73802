//! Database seeder for Rialto development and testing.
//!
//! Seeds two sample sellers, a handful of pending credit requests, and a
//! few phone targets for local development. Idempotent: rows that already
//! exist are skipped.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use rialto_db::entities::{credit_requests, phone_numbers, sea_orm_active_enums::CreditRequestStatus, sellers};
use rialto_shared::AppConfig;

/// First sample seller ID (consistent for all seeds)
const SELLER_ALPHA_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Second sample seller ID (consistent for all seeds)
const SELLER_BETA_ID: &str = "00000000-0000-0000-0000-000000000002";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().expect("Failed to load configuration");

    println!("Connecting to database...");
    let db = rialto_db::connect(&config.database)
        .await
        .expect("Failed to connect to database");

    println!("Seeding sellers...");
    seed_sellers(&db).await;

    println!("Seeding credit requests...");
    seed_credit_requests(&db).await;

    println!("Seeding phone targets...");
    seed_phone_numbers(&db).await;

    println!("Seeding complete!");
}

fn seller_alpha_id() -> Uuid {
    Uuid::parse_str(SELLER_ALPHA_ID).unwrap()
}

fn seller_beta_id() -> Uuid {
    Uuid::parse_str(SELLER_BETA_ID).unwrap()
}

/// Seeds two sample sellers with zero balance.
async fn seed_sellers(db: &DatabaseConnection) {
    let samples = [
        (seller_alpha_id(), "Alpha Kiosk", "alpha@rialto.dev", "02111112222"),
        (seller_beta_id(), "Beta Store", "beta@rialto.dev", "02133334444"),
    ];

    for (id, name, email, phone) in samples {
        if sellers::Entity::find_by_id(id)
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  Seller {name} already exists, skipping...");
            continue;
        }

        let seller = sellers::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            phone: Set(phone.to_string()),
            credit_balance: Set(Decimal::ZERO),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };

        if let Err(e) = seller.insert(db).await {
            eprintln!("Failed to insert seller {name}: {e}");
        } else {
            println!("  Created seller: {name}");
        }
    }
}

/// Seeds a few pending credit requests for each sample seller.
async fn seed_credit_requests(db: &DatabaseConnection) {
    use sea_orm::{ColumnTrait, QueryFilter};

    let already_seeded = credit_requests::Entity::find()
        .filter(
            credit_requests::Column::SellerId.is_in([seller_alpha_id(), seller_beta_id()]),
        )
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some();

    if already_seeded {
        println!("  Sample credit requests already exist, skipping...");
        return;
    }

    let samples = [
        (seller_alpha_id(), dec!(1000000)),
        (seller_alpha_id(), dec!(800000)),
        (seller_beta_id(), dec!(1200000)),
        (seller_beta_id(), dec!(900000)),
    ];

    let mut inserted = 0;
    for (seller_id, amount) in samples {
        let request = credit_requests::ActiveModel {
            id: Set(Uuid::new_v4()),
            seller_id: Set(seller_id),
            amount: Set(amount),
            status: Set(CreditRequestStatus::Pending),
            notes: Set(None),
            processed_by: Set(None),
            processed_at: Set(None),
            requested_at: Set(Utc::now().into()),
        };

        if let Err(e) = request.insert(db).await {
            eprintln!("Failed to insert credit request: {e}");
        } else {
            inserted += 1;
        }
    }

    println!("  Inserted {inserted} pending credit requests");
}

/// Seeds a few phone targets with zero totals.
async fn seed_phone_numbers(db: &DatabaseConnection) {
    let numbers = ["09123456789", "09129876543", "09121230000"];

    let mut inserted = 0;
    for number in numbers {
        let phone = phone_numbers::ActiveModel {
            id: Set(Uuid::new_v4()),
            number: Set(number.to_string()),
            total_charged: Set(Decimal::ZERO),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };

        if let Err(e) = phone.insert(db).await {
            // Ignore duplicate key errors (number already seeded)
            if !e.to_string().contains("duplicate key") {
                eprintln!("Failed to insert phone number {number}: {e}");
            }
        } else {
            inserted += 1;
        }
    }

    println!("  Inserted {inserted} phone targets");
}
