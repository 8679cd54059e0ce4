use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::calculations::{SalaryProjection, project};
use crate::models::{MonthlySalary, TaxBracket, ValidationError};

/// Longest first or last name the record store accepts.
pub const MAX_NAME_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Employee {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,

    // Salary input and the figures derived from it. Only `reproject` may
    // change them together.
    monthly_salary: MonthlySalary,
    projection: SalaryProjection,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    /// Rebuilds an employee from a stored row. Intended for record-store
    /// backends; new employees go through the service so they are projected
    /// before their first write.
    pub fn restore(
        id: i64,
        first_name: String,
        last_name: String,
        monthly_salary: MonthlySalary,
        projection: SalaryProjection,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            monthly_salary,
            projection,
            created_at,
            updated_at,
        }
    }

    pub fn monthly_salary(&self) -> MonthlySalary {
        self.monthly_salary
    }

    pub fn projection(&self) -> &SalaryProjection {
        &self.projection
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Replaces the salary and recomputes every derived figure against
    /// `brackets`.
    pub fn reproject(
        &mut self,
        monthly_salary: MonthlySalary,
        brackets: &[TaxBracket],
    ) {
        self.monthly_salary = monthly_salary;
        self.projection = project(monthly_salary, brackets);
    }
}

/// For creating new employees (no id, no derived figures)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub monthly_salary: MonthlySalary,
}

impl NewEmployee {
    /// Trims both names and checks they are present and fit the store.
    pub fn new(
        first_name: &str,
        last_name: &str,
        monthly_salary: MonthlySalary,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            first_name: validate_name("first name", first_name)?,
            last_name: validate_name("last name", last_name)?,
            monthly_salary,
        })
    }
}

/// Partial update. Derived figures are not updatable; they follow
/// `monthly_salary`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmployeeUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub monthly_salary: Option<MonthlySalary>,
}

impl EmployeeUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.monthly_salary.is_none()
    }
}

pub(crate) fn validate_name(
    field: &'static str,
    value: &str,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName(field));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::NameTooLong {
            field,
            max: MAX_NAME_LEN,
        });
    }
    Ok(trimmed.to_string())
}

/// Listing parameters, already normalised: `page` starts at 1 and `limit`
/// is clamped to 1..=100.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
}

impl EmployeeQuery {
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 100;

    pub fn new(
        page: Option<u32>,
        limit: Option<u32>,
        search: Option<String>,
    ) -> Self {
        let search = search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
            search,
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for EmployeeQuery {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}

/// One page of a listing together with the unpaginated total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub limit: u32,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> u32 {
        if self.total <= 0 {
            return 0;
        }
        let limit = i64::from(self.limit.max(1));
        u32::try_from((self.total + limit - 1) / limit).unwrap_or(u32::MAX)
    }
}
