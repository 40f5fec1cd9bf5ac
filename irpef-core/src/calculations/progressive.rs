//! Progressive bracket tax over a [`BracketTable`].
//!
//! Tax is the sum of per-bracket slices: for each bracket in ascending
//! order, the portion of income in `[min_income, min(max_income, income))`
//! is taxed at that bracket's rate. Brackets are right-open, so an income
//! exactly equal to a bracket's upper bound has its last unit taxed at that
//! bracket's rate, and only income strictly above the bound reaches the
//! next rate.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use irpef_core::BracketTable;
//! use irpef_core::TaxBracket;
//! use irpef_core::calculations::ProgressiveTax;
//!
//! let table = BracketTable {
//!     tax_year: 2025,
//!     brackets: vec![
//!         TaxBracket {
//!             min_income: dec!(0),
//!             max_income: Some(dec!(28000)),
//!             rate: dec!(0.23),
//!         },
//!         TaxBracket {
//!             min_income: dec!(28000),
//!             max_income: Some(dec!(50000)),
//!             rate: dec!(0.35),
//!         },
//!         TaxBracket {
//!             min_income: dec!(50000),
//!             max_income: None,
//!             rate: dec!(0.43),
//!         },
//!     ],
//! };
//!
//! let calculator = ProgressiveTax::new(&table);
//!
//! // Exactly at the first boundary the whole amount stays at 23%.
//! let at_boundary = calculator.calculate(dec!(28000)).unwrap();
//! assert_eq!(at_boundary.tax, dec!(6440));
//! assert_eq!(at_boundary.marginal_bracket.rate, dec!(0.23));
//!
//! // One euro above starts the 35% slice.
//! let above_boundary = calculator.calculate(dec!(28001)).unwrap();
//! assert_eq!(above_boundary.tax, dec!(6440.35));
//! assert_eq!(above_boundary.marginal_bracket.rate, dec!(0.35));
//! ```

use rust_decimal::Decimal;

use crate::calculations::common::round_half_up;
use crate::error::EngineError;
use crate::models::{BracketTable, TaxBracket};

/// Progressive tax plus the bracket that taxed the last unit of income.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressiveTaxOutcome {
    pub tax: Decimal,
    pub marginal_bracket: TaxBracket,
}

/// Slice-summing progressive tax calculator.
#[derive(Debug, Clone)]
pub struct ProgressiveTax<'a> {
    table: &'a BracketTable,
}

impl<'a> ProgressiveTax<'a> {
    pub fn new(table: &'a BracketTable) -> Self {
        Self { table }
    }

    /// Computes the tax owed on `taxable_income` and the marginal bracket.
    ///
    /// At zero income the marginal bracket is the first bracket.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] if `taxable_income` is
    /// negative, or [`EngineError::NoBrackets`] if the table is empty.
    pub fn calculate(
        &self,
        taxable_income: Decimal,
    ) -> Result<ProgressiveTaxOutcome, EngineError> {
        if taxable_income < Decimal::ZERO {
            return Err(EngineError::InvalidInput(taxable_income));
        }

        let mut tax = Decimal::ZERO;
        let mut marginal: Option<&TaxBracket> = None;
        for bracket in &self.table.brackets {
            if taxable_income <= bracket.min_income {
                break;
            }
            let top = match bracket.max_income {
                Some(max) => taxable_income.min(max),
                None => taxable_income,
            };
            tax += (top - bracket.min_income) * bracket.rate;
            marginal = Some(bracket);
        }

        let marginal = marginal
            .or_else(|| self.table.brackets.first())
            .ok_or(EngineError::NoBrackets)?;

        Ok(ProgressiveTaxOutcome {
            tax: round_half_up(tax),
            marginal_bracket: marginal.clone(),
        })
    }
}
