use async_trait::async_trait;
use thiserror::Error;

use crate::calculations::SalaryProjection;
use crate::models::{Employee, EmployeeQuery, NewEmployee, NewTaxBracket, Page, TaxBracket};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

#[async_trait]
pub trait PayrollRepository: Send + Sync {
    // Tax brackets

    /// All brackets, ascending by `min_income`.
    async fn list_tax_brackets(&self) -> Result<Vec<TaxBracket>, RepositoryError>;
    async fn count_tax_brackets(&self) -> Result<i64, RepositoryError>;

    /// Swaps the whole table in one transaction and returns the stored rows
    /// in ascending order.
    async fn replace_tax_brackets(
        &self,
        brackets: &[NewTaxBracket],
    ) -> Result<Vec<TaxBracket>, RepositoryError>;

    // Employees

    async fn create_employee(
        &self,
        employee: &NewEmployee,
        projection: &SalaryProjection,
    ) -> Result<Employee, RepositoryError>;

    async fn get_employee(&self, id: i64) -> Result<Employee, RepositoryError>;

    /// Persists names, salary and projection together and returns the row
    /// as stored.
    async fn update_employee(&self, employee: &Employee) -> Result<Employee, RepositoryError>;

    async fn delete_employee(&self, id: i64) -> Result<(), RepositoryError>;

    /// Ascending by id, filtered by a case-insensitive substring search on
    /// first or last name.
    async fn list_employees(
        &self,
        query: &EmployeeQuery,
    ) -> Result<Page<Employee>, RepositoryError>;

    async fn count_employees(&self) -> Result<i64, RepositoryError>;

    /// Returns the number of rows removed.
    async fn delete_all_employees(&self) -> Result<u64, RepositoryError>;
}
