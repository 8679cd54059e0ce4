//! Explicit, idempotent seeding of a fresh store.
//!
//! Nothing here runs implicitly: callers decide when to seed (the API binary
//! does it behind `--seed`, the loader binary behind `--seed-employees`).

use payroll_core::{
    MonthlySalary, NewEmployee, NewTaxBracket, PayrollService, RepositoryError, ServiceError,
    ValidationError,
};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info};

use crate::loader::{TaxBracketLoader, TaxBracketLoaderError};

/// Philippine graduated income tax table (TRAIN law, 2018-2022 schedule).
pub const DEFAULT_TAX_BRACKETS_CSV: &str = include_str!("../data/ph_tax_brackets.csv");

const FIRST_NAMES: [&str; 15] = [
    "Alex", "Sam", "Jordan", "Taylor", "Morgan", "Casey", "Jamie", "Riley", "Avery", "Quinn",
    "Cameron", "Drew", "Reese", "Parker", "Rowan",
];

const LAST_NAMES: [&str; 15] = [
    "Garcia", "Nguyen", "Lopez", "Johnson", "Smith", "Brown", "Martinez", "Davis", "Miller",
    "Wilson", "Anderson", "Taylor", "Thomas", "Hernandez", "Moore",
];

/// Sample salaries span 20,000.00 to 199,999.99 a month.
const MIN_SAMPLE_SALARY_CENTS: i64 = 2_000_000;
const SAMPLE_SALARY_SPAN_CENTS: i64 = 18_000_000;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error(transparent)]
    Loader(#[from] TaxBracketLoaderError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedOptions {
    /// Employee count to top the table up to.
    pub employee_target: usize,
    /// Delete every employee before seeding.
    pub force_employees: bool,
}

impl Default for SeedOptions {
    fn default() -> Self {
        Self {
            employee_target: 50,
            force_employees: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub brackets_seeded: usize,
    pub employees_removed: u64,
    pub employees_created: usize,
}

/// The embedded default table, ordered and validated.
pub fn default_tax_brackets() -> Result<Vec<NewTaxBracket>, TaxBracketLoaderError> {
    let records = TaxBracketLoader::parse(DEFAULT_TAX_BRACKETS_CSV.as_bytes())?;
    TaxBracketLoader::to_table(&records)
}

/// Seeds brackets first, then employees, so sample employees are projected
/// against a real table.
pub async fn seed(
    service: &PayrollService,
    options: &SeedOptions,
) -> Result<SeedReport, SeedError> {
    let brackets_seeded = seed_tax_brackets(service).await?;
    let (employees_removed, employees_created) =
        seed_employees(service, options.employee_target, options.force_employees).await?;

    let report = SeedReport {
        brackets_seeded,
        employees_removed,
        employees_created,
    };
    info!(?report, "seeding finished");
    Ok(report)
}

/// Installs the default table when the store has no brackets. Returns the
/// number of brackets written (0 when a table already exists).
pub async fn seed_tax_brackets(service: &PayrollService) -> Result<usize, SeedError> {
    let existing = service.repository().count_tax_brackets().await?;
    if existing > 0 {
        debug!(existing, "tax brackets already seeded");
        return Ok(0);
    }

    let table = default_tax_brackets()?;
    let stored = service.replace_tax_brackets(&table).await?;
    info!(count = stored.len(), "default tax brackets seeded");
    Ok(stored.len())
}

/// Tops the employee table up to `target` sample employees, each projected
/// through the service. With `force`, existing employees are removed first.
///
/// Returns `(removed, created)`.
pub async fn seed_employees(
    service: &PayrollService,
    target: usize,
    force: bool,
) -> Result<(u64, usize), SeedError> {
    let repo = service.repository();

    let removed = if force {
        let removed = repo.delete_all_employees().await?;
        info!(removed, "cleared employees before reseeding");
        removed
    } else {
        0
    };

    let existing = usize::try_from(repo.count_employees().await?).unwrap_or(0);
    if existing >= target {
        debug!(existing, target, "employee table already at target");
        return Ok((removed, 0));
    }

    for index in existing..target {
        service.create_employee(sample_employee(index)?).await?;
    }

    let created = target - existing;
    info!(created, target, "sample employees seeded");
    Ok((removed, created))
}

/// Deterministic sample employee number `index`.
fn sample_employee(index: usize) -> Result<NewEmployee, ValidationError> {
    let first = FIRST_NAMES[index % FIRST_NAMES.len()];
    let last = LAST_NAMES[(index * 7 + 3) % LAST_NAMES.len()];
    NewEmployee::new(first, last, sample_salary(index)?)
}

fn sample_salary(index: usize) -> Result<MonthlySalary, ValidationError> {
    let step = i64::try_from(index).unwrap_or(i64::MAX) % SAMPLE_SALARY_SPAN_CENTS;
    let cents =
        MIN_SAMPLE_SALARY_CENTS + (step * 7_919_003 + 1_234_567) % SAMPLE_SALARY_SPAN_CENTS;
    MonthlySalary::new(Decimal::new(cents, 2))
}
