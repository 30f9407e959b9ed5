//! # Seed Data Generator
//!
//! Populates an empty database with a sample product for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p catalog-db --bin seed
//!
//! # Specify database path
//! cargo run -p catalog-db --bin seed -- --db ./data/catalog.db
//! ```
//!
//! Creates "Classic Shoes" with two variants whose SKU codes follow from the
//! product's index.

use anyhow::{bail, Context};
use catalog_core::DEFAULT_CREATED_BY;
use catalog_db::{Database, DbConfig};
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const SAMPLE_PRODUCT: &str = "Classic Shoes";
const SAMPLE_VARIANTS: &[&str] = &["Classic Shoes - Red 42", "Classic Shoes - Blue 43"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let mut db_path = env::var("DATABASE_PATH").unwrap_or_else(|_| "./catalog.db".to_string());

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--db" | "-d" => {
                db_path = args.next().context("--db needs a path")?;
            }
            "--help" | "-h" => {
                println!("Catalog Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path");
                println!("                     (default: $DATABASE_PATH or ./catalog.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            other => bail!("unknown argument: {other}"),
        }
    }

    info!(path = %db_path, "Seeding catalog");

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("opening {db_path}"))?;

    let existing = db.products().count().await?;
    if existing > 0 {
        warn!(existing, "Database already has products, skipping seed");
        return Ok(());
    }

    let product = db.products().create(SAMPLE_PRODUCT).await?;
    for name in SAMPLE_VARIANTS {
        let variant = db.variants().create(&product.id, name, DEFAULT_CREATED_BY).await?;
        info!(name = %variant.name, sku = %variant.sku_code, "Seeded variant");
    }

    info!(product = %product.name, index = product.index, "Seed complete");
    db.close().await;
    Ok(())
}
