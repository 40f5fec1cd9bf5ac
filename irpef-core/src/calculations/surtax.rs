//! Regional and municipal surtax resolution and application.
//!
//! The location triple must match a table entry verbatim; there is no
//! partial matching and no default rate for unknown locations. Both
//! surtaxes are levied on taxable income, never reduced by deductions.

use rust_decimal::Decimal;

use crate::calculations::common::round_half_up;
use crate::error::EngineError;
use crate::models::Location;
use crate::tables::TaxTables;

/// The two surtax amounts for one taxable income and location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurtaxAmounts {
    pub regional: Decimal,
    pub municipal: Decimal,
}

#[derive(Debug, Clone)]
pub struct SurtaxCalculator<'a> {
    tables: &'a TaxTables,
}

impl<'a> SurtaxCalculator<'a> {
    pub fn new(tables: &'a TaxTables) -> Self {
        Self { tables }
    }

    /// Resolves the location and applies both rates to `taxable_income`,
    /// each rounded to cents.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] for negative taxable income
    /// and [`EngineError::UnknownLocation`] for an unrecognized triple.
    pub fn calculate(
        &self,
        taxable_income: Decimal,
        location: &Location,
    ) -> Result<SurtaxAmounts, EngineError> {
        if taxable_income < Decimal::ZERO {
            return Err(EngineError::InvalidInput(taxable_income));
        }

        let rates = self.tables.surtax_rates(location)?;

        Ok(SurtaxAmounts {
            regional: round_half_up(taxable_income * rates.regional_rate),
            municipal: round_half_up(taxable_income * rates.municipal_rate),
        })
    }
}
