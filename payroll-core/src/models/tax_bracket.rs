use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Common view over persisted and not-yet-persisted brackets, used by the
/// tiling checks in [`crate::calculations::bracket_table`].
pub trait IncomeBand {
    fn name(&self) -> &str;
    fn min_income(&self) -> Decimal;
    fn max_income(&self) -> Option<Decimal>;
    fn rate(&self) -> Decimal;
    fn base_tax(&self) -> Decimal;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub id: i64,
    pub name: String,
    /// First income unit belonging to the bracket (e.g. 250001).
    pub min_income: Decimal,
    /// `None` marks the unbounded top bracket.
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
    pub base_tax: Decimal,
}

impl TaxBracket {
    /// The zero-rate bracket. Its excess is measured from 0.
    pub fn is_exempt(&self) -> bool {
        self.rate.is_zero()
    }

    /// Threshold above which the marginal rate applies: one less than the
    /// nominal `min_income`, or 0 for the exempt bracket. Never below 0, so a
    /// taxed bracket starting at 0 taxes income from 0.
    pub fn excess_base(&self) -> Decimal {
        if self.is_exempt() {
            Decimal::ZERO
        } else {
            (self.min_income - Decimal::ONE).max(Decimal::ZERO)
        }
    }

    /// Whether `income` falls inside this bracket.
    ///
    /// The upper bound is inclusive. A non-exempt bracket accepts anything
    /// strictly above its excess base, so fractional incomes sitting between
    /// two integer-tiled bands (250000.50) land in the upper bracket.
    pub fn contains(
        &self,
        income: Decimal,
    ) -> bool {
        let above_floor = if self.is_exempt() {
            income >= self.min_income
        } else {
            income >= Decimal::ZERO && income > self.min_income - Decimal::ONE
        };

        above_floor && self.max_income.is_none_or(|max| income <= max)
    }

    pub fn is_unbounded(&self) -> bool {
        self.max_income.is_none()
    }
}

impl IncomeBand for TaxBracket {
    fn name(&self) -> &str {
        &self.name
    }
    fn min_income(&self) -> Decimal {
        self.min_income
    }
    fn max_income(&self) -> Option<Decimal> {
        self.max_income
    }
    fn rate(&self) -> Decimal {
        self.rate
    }
    fn base_tax(&self) -> Decimal {
        self.base_tax
    }
}

/// For reseeding the bracket table (no id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTaxBracket {
    pub name: String,
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
    pub base_tax: Decimal,
}

impl IncomeBand for NewTaxBracket {
    fn name(&self) -> &str {
        &self.name
    }
    fn min_income(&self) -> Decimal {
        self.min_income
    }
    fn max_income(&self) -> Option<Decimal> {
        self.max_income
    }
    fn rate(&self) -> Decimal {
        self.rate
    }
    fn base_tax(&self) -> Decimal {
        self.base_tax
    }
}
