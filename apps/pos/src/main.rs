//! # Tally POS
//!
//! Command-line front end for the Tally POS service crates.
//!
//! ## Commands
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          tally-pos <cmd>                            │
//! │                                                                     │
//! │  seed                        load the default product catalog       │
//! │  summary                     today / 7-day / payment-split figures  │
//! │  report-day <date> [dir]     write the daily HTML report            │
//! │  report-month <date> [dir]   write the monthly HTML report          │
//! │  export [dir]                write a stamped JSON export            │
//! │  import <file> <mode>        merge|overwrite transactions           │
//! │  backup [dir]                write the rolling auto-backup          │
//! │  restore <dir>               replace dataset from the auto-backup   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! - `TALLY_DB_PATH`: SQLite file, default `tally.db`
//! - `RUST_LOG`: tracing filter, default `info`
//!
//! Both may come from a `.env` file in the working directory.

use std::env;
use std::path::Path;

use chrono::{NaiveDate, Utc};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tally_core::aggregate;
use tally_core::Money;
use tally_db::{Database, DbConfig};
use tally_report::{html, writer};
use tally_sales::{backup, export, ImportMode, SalesService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env is optional; a missing file is not an error
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        usage();
        return Ok(());
    };

    let db_path = env::var("TALLY_DB_PATH").unwrap_or_else(|_| "tally.db".to_string());
    let db = Database::new(DbConfig::new(&db_path)).await?;
    info!(db = %db_path, "database ready");
    let service = SalesService::new(db);

    match command.as_str() {
        "seed" => {
            let catalog = tally_core::Catalog::defaults();
            service.db().products().replace_all(&catalog).await?;
            println!(
                "Seeded {} products across {} categories",
                catalog.len(),
                catalog.categories().len()
            );
        }
        "summary" => summary(&service).await?,
        "report-day" => {
            let date = parse_date(args.get(1))?;
            let dir = out_dir(args.get(2));
            report_day(&service, date, dir).await?;
        }
        "report-month" => {
            let date = parse_date(args.get(1))?;
            let dir = out_dir(args.get(2));
            report_month(&service, date, dir).await?;
        }
        "export" => {
            let dir = out_dir(args.get(1));
            let data = export::export_data(service.db()).await?;
            let path = export::write_export(dir, &data).await?;
            println!("Exported {} transactions to {}", data.transactions.len(), path.display());
        }
        "import" => {
            let file = args
                .get(1)
                .ok_or("usage: tally-pos import <file> <merge|overwrite>")?;
            let mode = parse_mode(args.get(2))?;
            let outcome = export::import_file(service.db(), Path::new(file), mode).await?;
            println!(
                "Imported {} transactions ({} skipped as duplicates)",
                outcome.inserted, outcome.skipped
            );
        }
        "backup" => {
            let dir = out_dir(args.get(1));
            let data = backup::BackupData::capture(
                service.catalog().await?,
                service.transactions().await?,
            );
            let path = backup::save_backup(dir, &data).await?;
            println!("Backup written to {}", path.display());
        }
        "restore" => {
            let dir = out_dir(args.get(1));
            restore(&service, dir).await?;
        }
        other => {
            eprintln!("Unknown command: {other}");
            usage();
        }
    }

    Ok(())
}

// =============================================================================
// Commands
// =============================================================================

/// Prints the dashboard figures: today, last 7 days, payment split.
async fn summary(service: &SalesService) -> Result<(), Box<dyn std::error::Error>> {
    let transactions = service.transactions().await?;
    let today = Utc::now().date_naive();

    let todays: Vec<_> = aggregate::for_date(&transactions, today).collect();
    let revenue = aggregate::revenue_cents(todays.iter().copied());
    let tips = aggregate::tips_cents(todays.iter().copied());

    println!("Today ({today})");
    println!("  Revenue:      {}", Money::from_cents(revenue));
    println!("  Tips:         {}", Money::from_cents(tips));
    println!("  Transactions: {}", todays.len());

    let split = aggregate::payment_split(todays.iter().copied());
    println!("  Cash:         {}", Money::from_cents(split.cash_cents));
    println!("  Card/UPI:     {}", Money::from_cents(split.card_or_upi_cents));

    println!("Last 7 days");
    for bucket in aggregate::last_seven_days(&transactions, today) {
        println!(
            "  {}  {}",
            bucket.date,
            Money::from_cents(bucket.revenue_cents)
        );
    }
    Ok(())
}

async fn report_day(
    service: &SalesService,
    date: NaiveDate,
    dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let transactions = service.transactions().await?;
    let document = html::day_report(&transactions, date);
    let path = writer::write_report(dir, &html::day_report_filename(date), &document).await?;
    println!("Day report written to {}", path.display());
    Ok(())
}

async fn report_month(
    service: &SalesService,
    date: NaiveDate,
    dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let transactions = service.transactions().await?;
    let document = html::month_report(&transactions, date);
    let path = writer::write_report(dir, &html::month_report_filename(date), &document).await?;
    println!("Month report written to {}", path.display());
    Ok(())
}

/// Replaces the whole dataset, products included, from the auto-backup.
async fn restore(service: &SalesService, dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let Some(data) = backup::restore_backup(dir).await? else {
        return Err(format!("no {} found in {}", backup::BACKUP_FILE, dir.display()).into());
    };
    service.db().products().replace_all(&data.products).await?;
    service
        .db()
        .transactions()
        .replace_all(&data.transactions)
        .await?;
    println!(
        "Restored {} transactions and {} products",
        data.transactions.len(),
        data.products.len()
    );
    Ok(())
}

// =============================================================================
// Argument Parsing
// =============================================================================

fn parse_date(arg: Option<&String>) -> Result<NaiveDate, Box<dyn std::error::Error>> {
    let raw = arg.ok_or("expected a date argument (YYYY-MM-DD)")?;
    Ok(raw.parse()?)
}

fn parse_mode(arg: Option<&String>) -> Result<ImportMode, Box<dyn std::error::Error>> {
    match arg.map(String::as_str) {
        Some("merge") => Ok(ImportMode::Merge),
        Some("overwrite") => Ok(ImportMode::Overwrite),
        _ => Err("expected import mode: merge | overwrite".into()),
    }
}

fn out_dir(arg: Option<&String>) -> &Path {
    arg.map(Path::new).unwrap_or_else(|| Path::new("."))
}

fn usage() {
    eprintln!("Usage: tally-pos <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  seed                        Load the default product catalog");
    eprintln!("  summary                     Show today's and weekly figures");
    eprintln!("  report-day <date> [dir]     Write the daily HTML report");
    eprintln!("  report-month <date> [dir]   Write the monthly HTML report");
    eprintln!("  export [dir]                Write a stamped JSON export");
    eprintln!("  import <file> <mode>        Import transactions (merge|overwrite)");
    eprintln!("  backup [dir]                Write the rolling auto-backup");
    eprintln!("  restore <dir>               Replace the dataset from a backup");
}
