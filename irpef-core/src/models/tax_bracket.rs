use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One marginal rate band. Bounds are right-open: income exactly equal to
/// `max_income` belongs to the next bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    /// `None` marks the unbounded top bracket.
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

/// The national progressive bracket schedule for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTable {
    pub tax_year: i32,
    pub brackets: Vec<TaxBracket>,
}
