//! Structural checks for a bracket table.
//!
//! A valid table tiles `[0, inf)`: it starts at 0, each bracket begins one
//! unit above the previous ceiling, and only the last bracket is unbounded.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::IncomeBand;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BracketTableError {
    #[error("bracket table is empty")]
    Empty,

    #[error("first bracket '{name}' starts at {min_income}, expected 0")]
    FirstBracketNotAtZero { name: String, min_income: Decimal },

    #[error("bracket '{next}' starts at {found}, expected {expected} after '{previous}'")]
    NotContiguous {
        previous: String,
        next: String,
        expected: Decimal,
        found: Decimal,
    },

    #[error("bracket '{name}' has max income {max_income} below min income {min_income}")]
    InvertedRange {
        name: String,
        min_income: Decimal,
        max_income: Decimal,
    },

    #[error("bracket '{0}' is unbounded but is not the last bracket")]
    UnboundedBeforeEnd(String),

    #[error("last bracket '{0}' must be unbounded")]
    BoundedTopBracket(String),

    #[error("bracket '{name}' has rate {rate}, expected a value in [0, 1]")]
    RateOutOfRange { name: String, rate: Decimal },

    #[error("bracket '{name}' has negative base tax {base_tax}")]
    NegativeBaseTax { name: String, base_tax: Decimal },
}

/// Checks that `brackets`, in the given order, tile `[0, inf)`.
///
/// Reports the first problem found, scanning from the lowest bracket up.
pub fn validate_tiling<B: IncomeBand>(brackets: &[B]) -> Result<(), BracketTableError> {
    let (first, last) = match (brackets.first(), brackets.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(BracketTableError::Empty),
    };

    if !first.min_income().is_zero() {
        return Err(BracketTableError::FirstBracketNotAtZero {
            name: first.name().to_string(),
            min_income: first.min_income(),
        });
    }

    for (index, bracket) in brackets.iter().enumerate() {
        validate_bracket(bracket)?;

        if let Some(next) = brackets.get(index + 1) {
            let Some(max) = bracket.max_income() else {
                return Err(BracketTableError::UnboundedBeforeEnd(
                    bracket.name().to_string(),
                ));
            };

            let expected = max + Decimal::ONE;
            if next.min_income() != expected {
                return Err(BracketTableError::NotContiguous {
                    previous: bracket.name().to_string(),
                    next: next.name().to_string(),
                    expected,
                    found: next.min_income(),
                });
            }
        }
    }

    if last.max_income().is_some() {
        return Err(BracketTableError::BoundedTopBracket(last.name().to_string()));
    }

    Ok(())
}

fn validate_bracket<B: IncomeBand>(bracket: &B) -> Result<(), BracketTableError> {
    if let Some(max) = bracket.max_income().filter(|max| *max < bracket.min_income()) {
        return Err(BracketTableError::InvertedRange {
            name: bracket.name().to_string(),
            min_income: bracket.min_income(),
            max_income: max,
        });
    }

    if bracket.rate() < Decimal::ZERO || bracket.rate() > Decimal::ONE {
        return Err(BracketTableError::RateOutOfRange {
            name: bracket.name().to_string(),
            rate: bracket.rate(),
        });
    }

    if bracket.base_tax() < Decimal::ZERO {
        return Err(BracketTableError::NegativeBaseTax {
            name: bracket.name().to_string(),
            base_tax: bracket.base_tax(),
        });
    }

    Ok(())
}
