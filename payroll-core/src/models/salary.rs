use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected employee input. Raised before any projection is attempted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("monthly salary must be greater than zero, got {0}")]
    NonPositiveSalary(Decimal),

    #[error("monthly salary must be at most {max}, got {value}")]
    SalaryTooLarge { value: Decimal, max: Decimal },

    #[error("monthly salary '{0}' is not a valid number")]
    InvalidSalary(String),

    #[error("{0} must not be empty")]
    EmptyName(&'static str),

    #[error("{field} must be at most {max} characters")]
    NameTooLong { field: &'static str, max: usize },
}

/// A monthly salary that has already been checked to be strictly positive and
/// at most [`MonthlySalary::MAX`].
///
/// This is the only salary input the projection accepts, so loose numeric
/// input has to be parsed through [`MonthlySalary::new`] or
/// [`MonthlySalary::parse`] at the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct MonthlySalary(Decimal);

impl MonthlySalary {
    /// 9,999,999,999.99: twelve digits with two decimals. Annualising this
    /// stays far inside `Decimal`'s range.
    pub const MAX: Decimal = Decimal::from_parts(0xD4A5_0FFF, 0xE8, 0, false, 2);

    pub fn new(value: Decimal) -> Result<Self, ValidationError> {
        if value <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveSalary(value));
        }
        if value > Self::MAX {
            return Err(ValidationError::SalaryTooLarge {
                value,
                max: Self::MAX,
            });
        }
        Ok(Self(value))
    }

    /// Parses a textual amount such as `"25000.50"`. Surrounding whitespace is
    /// ignored; anything that is not a plain decimal number is rejected.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let value = Decimal::from_str(trimmed)
            .map_err(|_| ValidationError::InvalidSalary(trimmed.to_string()))?;
        Self::new(value)
    }

    pub fn value(self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for MonthlySalary {
    type Error = ValidationError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MonthlySalary> for Decimal {
    fn from(salary: MonthlySalary) -> Self {
        salary.0
    }
}

impl FromStr for MonthlySalary {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MonthlySalary {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        self.0.fmt(f)
    }
}
