//! Employment-type tax deduction (detrazione) evaluation.
//!
//! The curve is evaluated at gross income, before contributions, for every
//! employment type. Within a bounded band the amount falls linearly between
//! the band's endpoints; the unbounded tail is flat at zero past the
//! phase-out ceiling.

use rust_decimal::Decimal;

use crate::calculations::common::{max, round_half_up};
use crate::error::EngineError;
use crate::models::{DeductionCurve, EmploymentType};
use crate::tables::TaxTables;

#[derive(Debug, Clone)]
pub struct DeductionCalculator<'a> {
    tables: &'a TaxTables,
}

impl<'a> DeductionCalculator<'a> {
    pub fn new(tables: &'a TaxTables) -> Self {
        Self { tables }
    }

    /// Deduction for the given gross income and employment type, clamped
    /// non-negative and rounded to cents.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] if `gross_income` is negative.
    pub fn calculate(
        &self,
        gross_income: Decimal,
        employment_type: EmploymentType,
    ) -> Result<Decimal, EngineError> {
        if gross_income < Decimal::ZERO {
            return Err(EngineError::InvalidInput(gross_income));
        }

        let curve = self.tables.deduction_curve(employment_type);
        let amount = amount_at(curve, gross_income);

        Ok(round_half_up(max(amount, Decimal::ZERO)))
    }
}

/// Evaluates the curve at `income`. Bands are right-open, so an income
/// exactly at a band's upper bound takes the next band's starting amount.
fn amount_at(
    curve: &DeductionCurve,
    income: Decimal,
) -> Decimal {
    for band in &curve.bands {
        let in_band = match band.max_income {
            Some(band_max) => income >= band.min_income && income < band_max,
            None => income >= band.min_income,
        };
        if !in_band {
            continue;
        }

        return match band.max_income {
            Some(band_max) => {
                let span = band_max - band.min_income;
                let progress = (income - band.min_income) / span;
                band.amount_at_min + (band.amount_at_max - band.amount_at_min) * progress
            }
            None => band.amount_at_min,
        };
    }

    Decimal::ZERO
}
