//! The itemized net-income breakdown: the engine's primary entry point.
//!
//! For one gross income the pipeline is:
//!
//! 1. INPS contributions from the employment-type rule (optional ceiling)
//! 2. taxable income = gross − contributions
//! 3. employment-type deduction, evaluated at gross income
//! 4. progressive IRPEF on taxable income
//! 5. IRPEF due = max(0, progressive tax − deduction)
//! 6. regional and municipal surtaxes on taxable income
//! 7. totals, net annual and monthly income, effective tax rate
//!
//! The deduction offsets only the progressive component; surtaxes are never
//! reduced by it. Errors from any step propagate unchanged, and a breakdown
//! is either fully computed or not produced at all.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use irpef_core::calculations::TaxBreakdownCalculator;
//! use irpef_core::{
//!     BracketTable, ContributionRule, DeductionBand, DeductionCurve, EmploymentType, Location,
//!     LocationSurtax, TaxBracket, TaxInput, TaxTables,
//! };
//!
//! let brackets = BracketTable {
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
//! let rules = vec![
//!     ContributionRule {
//!         employment_type: EmploymentType::Employee,
//!         rate: dec!(0.0949),
//!         income_ceiling: None,
//!     },
//!     ContributionRule {
//!         employment_type: EmploymentType::Freelancer,
//!         rate: dec!(0.24),
//!         income_ceiling: Some(dec!(120000)),
//!     },
//!     ContributionRule {
//!         employment_type: EmploymentType::Pensioner,
//!         rate: dec!(0),
//!         income_ceiling: None,
//!     },
//! ];
//!
//! let curves = EmploymentType::ALL
//!     .into_iter()
//!     .map(|employment_type| DeductionCurve {
//!         employment_type,
//!         bands: vec![
//!             DeductionBand {
//!                 min_income: dec!(0),
//!                 max_income: Some(dec!(50000)),
//!                 amount_at_min: dec!(1800),
//!                 amount_at_max: dec!(1800),
//!             },
//!             DeductionBand {
//!                 min_income: dec!(50000),
//!                 max_income: None,
//!                 amount_at_min: dec!(0),
//!                 amount_at_max: dec!(0),
//!             },
//!         ],
//!     })
//!     .collect();
//!
//! let surtaxes = vec![LocationSurtax {
//!     location: Location::new("Umbria", "Perugia", "Perugia"),
//!     regional_rate: dec!(0.015),
//!     municipal_rate: dec!(0.005),
//! }];
//!
//! let tables = TaxTables::new(brackets, rules, curves, surtaxes).unwrap();
//!
//! let result = TaxBreakdownCalculator::new(&tables)
//!     .compute(&TaxInput {
//!         gross_income: dec!(35000),
//!         employment_type: EmploymentType::Employee,
//!         location: Location::new("Umbria", "Perugia", "Perugia"),
//!     })
//!     .unwrap();
//!
//! assert_eq!(result.inps_contributions, dec!(3321.50));
//! assert_eq!(result.taxable_income, dec!(31678.50));
//! assert_eq!(result.irpef_tax, dec!(5927.48));
//! assert_eq!(result.net_annual_income, dec!(25117.45));
//! assert_eq!(result.effective_tax_rate, dec!(0.1875));
//! ```

use rust_decimal::Decimal;

use crate::calculations::common::{max, round_half_up, round_rate};
use crate::calculations::contributions::ContributionCalculator;
use crate::calculations::deduction::DeductionCalculator;
use crate::calculations::progressive::ProgressiveTax;
use crate::calculations::surtax::SurtaxCalculator;
use crate::error::EngineError;
use crate::models::{TaxInput, TaxResult};
use crate::tables::TaxTables;

#[derive(Debug, Clone)]
pub struct TaxBreakdownCalculator<'a> {
    tables: &'a TaxTables,
}

impl<'a> TaxBreakdownCalculator<'a> {
    pub fn new(tables: &'a TaxTables) -> Self {
        Self { tables }
    }

    /// Computes the fully itemized breakdown for one input.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] for negative gross income and
    /// [`EngineError::UnknownLocation`] for an unrecognized location
    /// triple; no partial result accompanies an error.
    pub fn compute(
        &self,
        input: &TaxInput,
    ) -> Result<TaxResult, EngineError> {
        let gross_income = input.gross_income;

        let contributions =
            ContributionCalculator::new(self.tables).calculate(gross_income, input.employment_type)?;
        let taxable_income = gross_income - contributions;

        let deduction =
            DeductionCalculator::new(self.tables).calculate(gross_income, input.employment_type)?;

        let progressive = ProgressiveTax::new(self.tables.brackets()).calculate(taxable_income)?;
        let irpef_tax = max(progressive.tax - deduction, Decimal::ZERO);

        let surtaxes =
            SurtaxCalculator::new(self.tables).calculate(taxable_income, &input.location)?;

        let total_tax_payable = irpef_tax + surtaxes.regional + surtaxes.municipal;
        let net_annual_income = gross_income - contributions - total_tax_payable;
        let net_monthly_income = round_half_up(net_annual_income / Decimal::from(12));
        let effective_tax_rate = if gross_income.is_zero() {
            Decimal::ZERO
        } else {
            round_rate(total_tax_payable / gross_income)
        };

        Ok(TaxResult {
            gross_income,
            inps_contributions: contributions,
            taxable_income,
            employee_deduction: deduction,
            irpef_tax,
            regional_surtax: surtaxes.regional,
            municipal_surtax: surtaxes.municipal,
            total_tax_payable,
            net_annual_income,
            net_monthly_income,
            effective_tax_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use crate::models::{
        BracketTable, ContributionRule, DeductionBand, DeductionCurve, EmploymentType, Location,
        LocationSurtax, TaxBracket,
    };

    use super::*;

    fn test_brackets() -> BracketTable {
        BracketTable {
            tax_year: 2025,
            brackets: vec![
                TaxBracket {
                    min_income: dec!(0),
                    max_income: Some(dec!(28000)),
                    rate: dec!(0.23),
                },
                TaxBracket {
                    min_income: dec!(28000),
                    max_income: Some(dec!(50000)),
                    rate: dec!(0.35),
                },
                TaxBracket {
                    min_income: dec!(50000),
                    max_income: None,
                    rate: dec!(0.43),
                },
            ],
        }
    }

    fn zero_curve(employment_type: EmploymentType) -> DeductionCurve {
        DeductionCurve {
            employment_type,
            bands: vec![DeductionBand {
                min_income: dec!(0),
                max_income: None,
                amount_at_min: dec!(0),
                amount_at_max: dec!(0),
            }],
        }
    }

    fn employee_curve() -> DeductionCurve {
        DeductionCurve {
            employment_type: EmploymentType::Employee,
            bands: vec![
                DeductionBand {
                    min_income: dec!(0),
                    max_income: Some(dec!(15000)),
                    amount_at_min: dec!(1955),
                    amount_at_max: dec!(1955),
                },
                DeductionBand {
                    min_income: dec!(15000),
                    max_income: Some(dec!(28000)),
                    amount_at_min: dec!(1955),
                    amount_at_max: dec!(1910),
                },
                DeductionBand {
                    min_income: dec!(28000),
                    max_income: Some(dec!(50000)),
                    amount_at_min: dec!(1910),
                    amount_at_max: dec!(0),
                },
                DeductionBand {
                    min_income: dec!(50000),
                    max_income: None,
                    amount_at_min: dec!(0),
                    amount_at_max: dec!(0),
                },
            ],
        }
    }

    fn test_tables() -> TaxTables {
        TaxTables::new(
            test_brackets(),
            vec![
                ContributionRule {
                    employment_type: EmploymentType::Employee,
                    rate: dec!(0.0949),
                    income_ceiling: None,
                },
                ContributionRule {
                    employment_type: EmploymentType::Freelancer,
                    rate: dec!(0.24),
                    income_ceiling: Some(dec!(120000)),
                },
                ContributionRule {
                    employment_type: EmploymentType::Pensioner,
                    rate: dec!(0),
                    income_ceiling: None,
                },
            ],
            vec![
                employee_curve(),
                zero_curve(EmploymentType::Freelancer),
                zero_curve(EmploymentType::Pensioner),
            ],
            vec![LocationSurtax {
                location: Location::new("Umbria", "Perugia", "Perugia"),
                regional_rate: dec!(0.015),
                municipal_rate: dec!(0.005),
            }],
        )
        .unwrap()
    }

    fn perugia() -> Location {
        Location::new("Umbria", "Perugia", "Perugia")
    }

    fn employee_input(gross_income: Decimal) -> TaxInput {
        TaxInput {
            gross_income,
            employment_type: EmploymentType::Employee,
            location: perugia(),
        }
    }

    // =========================================================================
    // itemization
    // =========================================================================

    #[test]
    fn compute_employee_35000() {
        let tables = test_tables();
        let calculator = TaxBreakdownCalculator::new(&tables);

        let result = calculator.compute(&employee_input(dec!(35000))).unwrap();

        // contributions: 35000 * 0.0949
        assert_eq!(result.inps_contributions, dec!(3321.50));
        assert_eq!(result.taxable_income, dec!(31678.50));
        // deduction at gross 35000: 1910 - 1910 * 7000 / 22000
        assert_eq!(result.employee_deduction, dec!(1302.27));
        // progressive: 28000 * 0.23 + 3678.50 * 0.35 = 7727.48, minus deduction
        assert_eq!(result.irpef_tax, dec!(6425.21));
        // surtaxes on taxable income at 1.5% and 0.5%
        assert_eq!(result.regional_surtax, dec!(475.18));
        assert_eq!(result.municipal_surtax, dec!(158.39));
        assert_eq!(result.total_tax_payable, dec!(7058.78));
        assert_eq!(result.net_annual_income, dec!(24619.72));
        assert_eq!(result.net_monthly_income, dec!(2051.64));
        assert_eq!(result.effective_tax_rate, dec!(0.2017));
    }

    #[test]
    fn compute_conserves_gross_income() {
        let tables = test_tables();
        let calculator = TaxBreakdownCalculator::new(&tables);

        for employment_type in EmploymentType::ALL {
            for gross in [dec!(0), dec!(8000), dec!(35000), dec!(70000), dec!(150000)] {
                let result = calculator
                    .compute(&TaxInput {
                        gross_income: gross,
                        employment_type,
                        location: perugia(),
                    })
                    .unwrap();

                assert_eq!(
                    result.net_annual_income + result.inps_contributions + result.total_tax_payable,
                    gross,
                    "conservation failed for {employment_type} at {gross}"
                );
            }
        }
    }

    #[test]
    fn compute_deduction_never_offsets_surtaxes() {
        let tables = test_tables();
        let calculator = TaxBreakdownCalculator::new(&tables);

        // At 8000 the employee deduction exceeds the progressive tax, so
        // IRPEF clamps to zero while both surtaxes remain due.
        let result = calculator.compute(&employee_input(dec!(8000))).unwrap();

        assert_eq!(result.irpef_tax, dec!(0));
        assert_eq!(result.regional_surtax, dec!(108.61));
        assert_eq!(result.municipal_surtax, dec!(36.20));
        assert_eq!(result.total_tax_payable, dec!(144.81));
        assert_eq!(result.net_annual_income, dec!(7095.99));
    }

    #[test]
    fn compute_zero_gross_income() {
        let tables = test_tables();
        let calculator = TaxBreakdownCalculator::new(&tables);

        let result = calculator.compute(&employee_input(dec!(0))).unwrap();

        assert_eq!(result.inps_contributions, dec!(0));
        assert_eq!(result.taxable_income, dec!(0));
        assert_eq!(result.irpef_tax, dec!(0));
        assert_eq!(result.total_tax_payable, dec!(0));
        assert_eq!(result.net_annual_income, dec!(0));
        assert_eq!(result.net_monthly_income, dec!(0));
        // Defined as zero, not a division fault.
        assert_eq!(result.effective_tax_rate, dec!(0));
    }

    #[test]
    fn compute_freelancer_uses_ceiling_and_no_deduction() {
        let tables = test_tables();
        let calculator = TaxBreakdownCalculator::new(&tables);

        let result = calculator
            .compute(&TaxInput {
                gross_income: dec!(150000),
                employment_type: EmploymentType::Freelancer,
                location: perugia(),
            })
            .unwrap();

        // base capped at 120000
        assert_eq!(result.inps_contributions, dec!(28800.00));
        assert_eq!(result.taxable_income, dec!(121200.00));
        assert_eq!(result.employee_deduction, dec!(0));
        // 6440 + 7700 + 71200 * 0.43 = 44756
        assert_eq!(result.irpef_tax, dec!(44756.00));
    }

    // =========================================================================
    // error propagation
    // =========================================================================

    #[test]
    fn compute_rejects_negative_gross_income() {
        let tables = test_tables();
        let calculator = TaxBreakdownCalculator::new(&tables);

        let result = calculator.compute(&employee_input(dec!(-1000)));

        assert_eq!(result.err(), Some(EngineError::InvalidInput(dec!(-1000))));
    }

    #[test]
    fn compute_propagates_unknown_location() {
        let tables = test_tables();
        let calculator = TaxBreakdownCalculator::new(&tables);

        let result = calculator.compute(&TaxInput {
            gross_income: dec!(35000),
            employment_type: EmploymentType::Employee,
            location: Location::new("Lazio", "Roma", "Roma"),
        });

        assert_eq!(
            result.err(),
            Some(EngineError::UnknownLocation {
                region: "Lazio".to_string(),
                province: "Roma".to_string(),
                city: "Roma".to_string(),
            })
        );
    }
}
