use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use payroll_core::db::{DbConfig, RepositoryRegistry};
use payroll_core::PayrollService;
use payroll_data::{DEFAULT_TAX_BRACKETS_CSV, TaxBracketLoader, seed_employees};
use payroll_db_sqlite::SqliteRepositoryFactory;
use tracing_subscriber::EnvFilter;

/// Replace the tax bracket table from a CSV file.
///
/// The CSV file should have the following columns:
/// - name: Bracket label (e.g., 15% Bracket)
/// - min_income: First annual income unit in the bracket
/// - max_income: Last annual income unit (empty for the top bracket)
/// - rate: The marginal tax rate as a decimal (e.g., 0.15)
/// - base_tax: Tax owed at the bracket's entry point
///
/// Without `--file` the built-in Philippine table is loaded.
#[derive(Parser, Debug)]
#[command(name = "payroll-data-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing tax bracket data
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Database backend to use
    #[arg(long, default_value = "sqlite")]
    backend: String,

    /// Database connection string (e.g., payroll.db or sqlite:payroll.db)
    #[arg(short, long, default_value = "payroll.db")]
    database: String,

    /// After loading brackets, top the employee table up with sample data
    #[arg(long, default_value_t = false)]
    seed_employees: bool,

    /// Employee count to seed up to
    #[arg(long, default_value_t = 50)]
    employee_target: usize,

    /// Delete all employees before seeding
    #[arg(long, default_value_t = false, requires = "seed_employees")]
    force: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));

    let db_config = DbConfig {
        backend: args.backend.clone(),
        connection_string: args.database.clone(),
    };
    let repo = registry
        .create(&db_config)
        .await
        .with_context(|| format!("Failed to open database: {}", args.database))?;
    let service = PayrollService::new(Arc::from(repo));

    let records = match &args.file {
        Some(path) => {
            println!("Loading tax brackets from: {}", path.display());
            let file = File::open(path)
                .with_context(|| format!("Failed to open: {}", path.display()))?;
            TaxBracketLoader::parse(file)
                .with_context(|| format!("Failed to parse CSV: {}", path.display()))?
        }
        None => {
            println!("Loading built-in Philippine tax brackets");
            TaxBracketLoader::parse(DEFAULT_TAX_BRACKETS_CSV.as_bytes())
                .context("Failed to parse built-in tax brackets")?
        }
    };

    println!("Parsed {} records from CSV", records.len());

    let stored = TaxBracketLoader::load(service.repository().as_ref(), &records)
        .await
        .context("Failed to load tax brackets into database")?;

    println!(
        "Successfully loaded {} tax brackets into the database.",
        stored.len()
    );

    if args.seed_employees {
        let (removed, created) = seed_employees(&service, args.employee_target, args.force)
            .await
            .context("Failed to seed employees")?;
        println!("Removed {removed} and created {created} sample employees.");
    }

    Ok(())
}
