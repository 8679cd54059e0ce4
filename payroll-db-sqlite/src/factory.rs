use std::str::FromStr;

use async_trait::async_trait;
use payroll_core::db::{DbConfig, PayrollRepository, RepositoryError, RepositoryFactory};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

use crate::repository::SqliteRepository;

/// [`RepositoryFactory`] for SQLite.
///
/// Register this with a [`payroll_core::db::RepositoryRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use payroll_core::db::RepositoryRegistry;
/// use payroll_db_sqlite::SqliteRepositoryFactory;
///
/// let mut registry = RepositoryRegistry::new();
/// registry.register(Box::new(SqliteRepositoryFactory));
/// ```
pub struct SqliteRepositoryFactory;

impl SqliteRepositoryFactory {
    fn is_in_memory(connection_string: &str) -> bool {
        connection_string.contains(":memory:") || connection_string.contains("mode=memory")
    }
}

#[async_trait]
impl RepositoryFactory for SqliteRepositoryFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Opens the database described by `config.connection_string` and runs
    /// the embedded migrations.
    ///
    /// Accepted values:
    /// * a file path or `sqlite:` URL, e.g. `payroll.db` or
    ///   `sqlite:payroll.db`. The file is created if missing.
    /// * `:memory:`, an in-memory database that lives as long as the
    ///   repository. Its pool holds a single connection that is never recycled.
    ///
    /// Seeding is not done here; see the `payroll-data` crate.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn PayrollRepository>, RepositoryError> {
        let options = SqliteConnectOptions::from_str(&config.connection_string)
            .map_err(|e| {
                RepositoryError::Configuration(format!(
                    "invalid sqlite connection string '{}': {}",
                    config.connection_string, e
                ))
            })?
            .create_if_missing(true);

        let pool_options = if Self::is_in_memory(&config.connection_string) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| RepositoryError::Connection(e.to_string()))?;

        let repo = SqliteRepository::new_with_pool(pool).await;
        repo.run_migrations()
            .await
            .map_err(|e| RepositoryError::Database(format!("{e:#}")))?;

        info!(connection = %config.connection_string, "sqlite repository ready");
        Ok(Box::new(repo))
    }
}
