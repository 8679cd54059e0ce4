//! Employee and tax flows on top of a [`PayrollRepository`].
//!
//! Every operation that needs a projection reads the bracket table fresh from
//! the store first, so a reseed is visible to the very next request.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::calculations::{BracketTableError, SalaryProjection, project, validate_tiling};
use crate::db::{PayrollRepository, RepositoryError};
use crate::models::{
    Employee, EmployeeQuery, EmployeeUpdate, NewEmployee, NewTaxBracket, Page, TaxBracket,
    ValidationError, validate_name,
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid tax bracket table: {0}")]
    InvalidBracketTable(#[from] BracketTableError),

    #[error("Employee with ID {0} not found")]
    EmployeeNotFound(i64),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Fresh tax figures for an employee, computed against the current bracket
/// table. The stored employee is left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxCalculation {
    pub employee: Employee,
    pub projection: SalaryProjection,
}

#[derive(Clone)]
pub struct PayrollService {
    repo: Arc<dyn PayrollRepository>,
}

impl PayrollService {
    pub fn new(repo: Arc<dyn PayrollRepository>) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &Arc<dyn PayrollRepository> {
        &self.repo
    }

    pub async fn list_tax_brackets(&self) -> Result<Vec<TaxBracket>, ServiceError> {
        Ok(self.repo.list_tax_brackets().await?)
    }

    /// Validates `brackets` as a complete table and swaps it in.
    pub async fn replace_tax_brackets(
        &self,
        brackets: &[NewTaxBracket],
    ) -> Result<Vec<TaxBracket>, ServiceError> {
        validate_tiling(brackets)?;

        let stored = self.repo.replace_tax_brackets(brackets).await?;
        info!(count = stored.len(), "tax bracket table replaced");
        Ok(stored)
    }

    pub async fn list_employees(
        &self,
        query: &EmployeeQuery,
    ) -> Result<Page<Employee>, ServiceError> {
        Ok(self.repo.list_employees(query).await?)
    }

    pub async fn get_employee(
        &self,
        id: i64,
    ) -> Result<Employee, ServiceError> {
        self.repo
            .get_employee(id)
            .await
            .map_err(|e| not_found_as(e, id))
    }

    pub async fn create_employee(
        &self,
        employee: NewEmployee,
    ) -> Result<Employee, ServiceError> {
        let brackets = self.current_brackets().await?;
        let projection = project(employee.monthly_salary, &brackets);

        let created = self.repo.create_employee(&employee, &projection).await?;
        info!(
            id = created.id,
            annual_tax = %created.projection().annual_tax(),
            "employee created"
        );
        Ok(created)
    }

    /// Applies a partial update. A new salary triggers a full re-projection;
    /// name-only updates keep the stored figures.
    pub async fn update_employee(
        &self,
        id: i64,
        update: EmployeeUpdate,
    ) -> Result<Employee, ServiceError> {
        let mut employee = self.get_employee(id).await?;
        if update.is_empty() {
            debug!(id, "empty update; nothing to write");
            return Ok(employee);
        }

        if let Some(first_name) = update.first_name.as_deref() {
            employee.first_name = validate_name("first name", first_name)?;
        }
        if let Some(last_name) = update.last_name.as_deref() {
            employee.last_name = validate_name("last name", last_name)?;
        }
        if let Some(salary) = update.monthly_salary {
            let brackets = self.current_brackets().await?;
            employee.reproject(salary, &brackets);
        }

        let updated = self
            .repo
            .update_employee(&employee)
            .await
            .map_err(|e| not_found_as(e, id))?;
        info!(id, "employee updated");
        Ok(updated)
    }

    pub async fn delete_employee(
        &self,
        id: i64,
    ) -> Result<(), ServiceError> {
        self.repo
            .delete_employee(id)
            .await
            .map_err(|e| not_found_as(e, id))?;
        info!(id, "employee deleted");
        Ok(())
    }

    /// Recomputes the employee's tax against the brackets in force right now.
    pub async fn calculate_tax(
        &self,
        id: i64,
    ) -> Result<TaxCalculation, ServiceError> {
        let employee = self.get_employee(id).await?;
        let brackets = self.current_brackets().await?;
        let projection = project(employee.monthly_salary(), &brackets);

        debug!(
            id,
            annual_salary = %projection.annual_salary(),
            annual_tax = %projection.annual_tax(),
            bracket = projection.tax_bracket().map(|b| b.name.as_str()),
            "tax calculated"
        );
        Ok(TaxCalculation {
            employee,
            projection,
        })
    }

    async fn current_brackets(&self) -> Result<Vec<TaxBracket>, ServiceError> {
        let brackets = self.repo.list_tax_brackets().await?;
        if brackets.is_empty() {
            warn!("no tax brackets configured; projecting with zero tax");
        }
        Ok(brackets)
    }
}

fn not_found_as(
    error: RepositoryError,
    id: i64,
) -> ServiceError {
    match error {
        RepositoryError::NotFound => ServiceError::EmployeeNotFound(id),
        other => ServiceError::Repository(other),
    }
}
