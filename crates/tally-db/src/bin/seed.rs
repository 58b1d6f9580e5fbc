//! # Catalog Seeder
//!
//! Writes the default product catalog into a database file.
//!
//! ## Usage
//! ```bash
//! # Seed ./tally.db (default)
//! cargo run -p tally-db --bin seed
//!
//! # Specify database path
//! cargo run -p tally-db --bin seed -- ./data/tally.db
//! ```
//!
//! Existing products are replaced wholesale; run this on a fresh database
//! or when resetting the catalog to defaults.

use std::env;

use tally_core::Catalog;
use tally_db::{Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = env::args().nth(1).unwrap_or_else(|| "tally.db".to_string());
    println!("Seeding default catalog into {path}");

    let db = Database::new(DbConfig::new(&path)).await?;

    let catalog = Catalog::defaults();
    db.products().replace_all(&catalog).await?;

    println!(
        "Seeded {} products across {} categories",
        catalog.len(),
        catalog.categories().len()
    );

    db.close().await;
    Ok(())
}
