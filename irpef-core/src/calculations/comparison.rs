//! Two-income comparison with a discrete marginal rate.
//!
//! Both incomes are run through the breakdown with identical employment
//! type and location. Differences are always comparison − current; the
//! roles are preserved even when the comparison income is smaller, so
//! negative differences are meaningful. The marginal rate between the two
//! points is the tax difference over the income difference; it is reported
//! as `None` rather than zero when the incomes are equal.

use rust_decimal::Decimal;

use crate::calculations::breakdown::TaxBreakdownCalculator;
use crate::calculations::common::round_rate;
use crate::error::EngineError;
use crate::models::{ComparisonResult, EmploymentType, Location, TaxInput};
use crate::tables::TaxTables;

#[derive(Debug, Clone)]
pub struct IncomeComparison<'a> {
    tables: &'a TaxTables,
}

impl<'a> IncomeComparison<'a> {
    pub fn new(tables: &'a TaxTables) -> Self {
        Self { tables }
    }

    /// Compares the tax position at two gross incomes.
    ///
    /// # Errors
    ///
    /// Propagates any breakdown error for either income unchanged.
    pub fn compare(
        &self,
        current_income: Decimal,
        comparison_income: Decimal,
        employment_type: EmploymentType,
        location: &Location,
    ) -> Result<ComparisonResult, EngineError> {
        let calculator = TaxBreakdownCalculator::new(self.tables);

        let current = calculator.compute(&TaxInput {
            gross_income: current_income,
            employment_type,
            location: location.clone(),
        })?;
        let comparison = calculator.compute(&TaxInput {
            gross_income: comparison_income,
            employment_type,
            location: location.clone(),
        })?;

        let income_difference = comparison.gross_income - current.gross_income;
        let tax_difference = comparison.total_tax_payable - current.total_tax_payable;
        let net_difference = comparison.net_annual_income - current.net_annual_income;
        let marginal_tax_rate = if income_difference.is_zero() {
            None
        } else {
            Some(round_rate(tax_difference / income_difference))
        };

        Ok(ComparisonResult {
            current,
            comparison,
            income_difference,
            tax_difference,
            net_difference,
            marginal_tax_rate,
        })
    }
}
