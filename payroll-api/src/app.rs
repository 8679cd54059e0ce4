use std::sync::Arc;

use anyhow::{Context, Result};
use payroll_core::{DbConfig, PayrollService, RepositoryRegistry};
use payroll_data::{SeedOptions, seed};
use payroll_db_sqlite::SqliteRepositoryFactory;
use tracing::info;

/// Registry with every backend this binary ships.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

/// Opens the configured store and, when asked to, seeds it before the
/// server accepts requests.
pub async fn build_service(
    db_config: &DbConfig,
    seed_options: Option<&SeedOptions>,
) -> Result<PayrollService> {
    let registry = build_registry();
    let repo = registry
        .create(db_config)
        .await
        .with_context(|| format!("Failed to open database: {}", db_config.connection_string))?;
    let service = PayrollService::new(Arc::from(repo));

    match seed_options {
        Some(options) => {
            let report = seed(&service, options)
                .await
                .context("Failed to seed database")?;
            info!(
                brackets = report.brackets_seeded,
                removed = report.employees_removed,
                created = report.employees_created,
                "database seeded"
            );
        }
        None => info!("seeding skipped"),
    }

    Ok(service)
}
