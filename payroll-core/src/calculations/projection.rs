//! Annual projection of a monthly salary.

use rust_decimal::Decimal;
use serde::Serialize;

use super::common::{MONTHS_PER_YEAR, round_half_up};
use super::resolver::resolve;
use crate::models::{MonthlySalary, TaxBracket};

/// Figures derived from a monthly salary and the bracket table in force when
/// it was projected.
///
/// Fields are read-only outside this module: the only way to get a projection
/// is [`project`], or [`SalaryProjection::restore`] for values already
/// persisted by a record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalaryProjection {
    annual_salary: Decimal,
    annual_tax: Decimal,
    net_annual_salary: Decimal,
    tax_bracket: Option<TaxBracket>,
}

impl SalaryProjection {
    /// Rebuilds a stored projection without recomputing it.
    pub fn restore(
        annual_salary: Decimal,
        annual_tax: Decimal,
        net_annual_salary: Decimal,
        tax_bracket: Option<TaxBracket>,
    ) -> Self {
        Self {
            annual_salary,
            annual_tax,
            net_annual_salary,
            tax_bracket,
        }
    }

    pub fn annual_salary(&self) -> Decimal {
        self.annual_salary
    }

    pub fn annual_tax(&self) -> Decimal {
        self.annual_tax
    }

    pub fn net_annual_salary(&self) -> Decimal {
        self.net_annual_salary
    }

    pub fn tax_bracket(&self) -> Option<&TaxBracket> {
        self.tax_bracket.as_ref()
    }

    /// Annual tax spread evenly over twelve months.
    pub fn monthly_tax(&self) -> Decimal {
        round_half_up(self.annual_tax / MONTHS_PER_YEAR)
    }
}

/// Projects `monthly_salary` to a year and resolves its tax against
/// `brackets` (sorted ascending by `min_income`).
pub fn project(
    monthly_salary: MonthlySalary,
    brackets: &[TaxBracket],
) -> SalaryProjection {
    let annual_salary = round_half_up(monthly_salary.value() * MONTHS_PER_YEAR);
    let resolution = resolve(annual_salary, brackets);

    SalaryProjection {
        annual_salary,
        annual_tax: resolution.tax,
        net_annual_salary: round_half_up(annual_salary - resolution.tax),
        tax_bracket: resolution.bracket.cloned(),
    }
}
