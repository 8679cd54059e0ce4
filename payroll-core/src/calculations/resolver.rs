//! Progressive tax resolution.
//!
//! Picks the bracket an annual income falls into and computes the annual tax
//! as `base_tax + rate * (income - excess_base)`, rounded half-up to cents.

use rust_decimal::Decimal;

use super::common::round_half_up;
use crate::models::TaxBracket;

/// Outcome of resolving one income against a bracket table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxResolution<'a> {
    /// `None` when the table is empty or no bracket covers the income.
    pub bracket: Option<&'a TaxBracket>,
    /// Annual tax, rounded to two decimal places.
    pub tax: Decimal,
}

impl TaxResolution<'_> {
    fn untaxed() -> Self {
        Self {
            bracket: None,
            tax: Decimal::ZERO,
        }
    }
}

/// Resolver over a borrowed bracket table.
///
/// The table must be sorted ascending by `min_income`; the first bracket
/// that contains the income wins.
#[derive(Debug, Clone, Copy)]
pub struct TaxResolver<'a> {
    brackets: &'a [TaxBracket],
}

impl<'a> TaxResolver<'a> {
    pub fn new(brackets: &'a [TaxBracket]) -> Self {
        Self { brackets }
    }

    pub fn resolve(
        &self,
        annual_income: Decimal,
    ) -> TaxResolution<'a> {
        let Some(bracket) = self.brackets.iter().find(|b| b.contains(annual_income)) else {
            return TaxResolution::untaxed();
        };

        let tax = if bracket.is_exempt() {
            bracket.base_tax
        } else {
            let excess = (annual_income - bracket.excess_base()).max(Decimal::ZERO);
            bracket.base_tax + bracket.rate * excess
        };

        TaxResolution {
            bracket: Some(bracket),
            tax: round_half_up(tax),
        }
    }
}

/// Resolves `annual_income` against `brackets` (sorted ascending).
pub fn resolve(
    annual_income: Decimal,
    brackets: &[TaxBracket],
) -> TaxResolution<'_> {
    TaxResolver::new(brackets).resolve(annual_income)
}
