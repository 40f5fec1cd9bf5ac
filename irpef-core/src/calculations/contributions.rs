//! Mandatory social-contribution (INPS) withholding.
//!
//! The contribution base is gross income, capped at the rule's ceiling when
//! one is configured; the contribution is base × rate. Every employment
//! type resolves to an explicit rule (pensioners have a zero-rate entry in
//! the tables), so no variant is special-cased here.

use rust_decimal::Decimal;

use crate::calculations::common::round_half_up;
use crate::error::EngineError;
use crate::models::EmploymentType;
use crate::tables::TaxTables;

#[derive(Debug, Clone)]
pub struct ContributionCalculator<'a> {
    tables: &'a TaxTables,
}

impl<'a> ContributionCalculator<'a> {
    pub fn new(tables: &'a TaxTables) -> Self {
        Self { tables }
    }

    /// Contribution withheld on `gross_income` for the given employment
    /// type, rounded to cents.
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

        let rule = self.tables.contribution_rule(employment_type);
        let base = match rule.income_ceiling {
            Some(ceiling) => gross_income.min(ceiling),
            None => gross_income,
        };

        Ok(round_half_up(base * rule.rate))
    }
}
