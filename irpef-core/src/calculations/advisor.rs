//! Income- and location-conditioned tax-reduction suggestions.
//!
//! Rules are threshold- and bracket-proximity-driven; each one produces a
//! numeric savings estimate so the output can be ranked by impact. The
//! estimates rest on the named assumption constants below and on the
//! repository's own bracket and surtax rows; they are indicative, not
//! binding. Tips are re-derived fresh on every call, and an empty list
//! simply means no rule applied.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::calculations::common::round_half_up;
use crate::calculations::progressive::ProgressiveTax;
use crate::error::EngineError;
use crate::models::{EmploymentType, OptimizationTip, TaxBracket, TipCategory};
use crate::tables::TaxTables;

/// Annual deductible cap for supplementary pension contributions.
const PENSION_FUND_DEDUCTIBLE_CAP: Decimal = dec!(5164.57);

/// Income above which the pension-fund and investment tips apply.
const HIGH_INCOME_THRESHOLD: Decimal = dec!(50000);

/// Income above which the itemizable-expense tip applies.
const EXPENSE_CREDIT_THRESHOLD: Decimal = dec!(28000);

/// IRPEF credit rate on itemizable expenses.
const EXPENSE_CREDIT_RATE: Decimal = dec!(0.19);

/// Assumed annual itemizable expenses for the savings estimate.
const TYPICAL_CREDITABLE_EXPENSES: Decimal = dec!(2000);

/// Annual PIR plan contribution cap.
const PIR_ANNUAL_CAP: Decimal = dec!(40000);

/// Assumed yield on PIR holdings for the savings estimate.
const PIR_ASSUMED_YIELD: Decimal = dec!(0.04);

/// Capital-gains rate a PIR wrapper exempts.
const CAPITAL_GAINS_RATE: Decimal = dec!(0.26);

/// How far above a bracket lower bound the bracket-edge tip still applies.
const BRACKET_EDGE_WINDOW: Decimal = dec!(3000);

/// Assumed convertible fringe-benefit budget for employees.
const FRINGE_BENEFIT_BUDGET: Decimal = dec!(1000);

/// Revenue ceiling of the flat-rate regime for freelancers.
const FLAT_RATE_REGIME_CEILING: Decimal = dec!(85000);

/// Assumed net saving factor of the flat-rate regime.
const FLAT_RATE_SAVINGS_FACTOR: Decimal = dec!(0.04);

#[derive(Debug, Clone)]
pub struct OptimizationAdvisor<'a> {
    tables: &'a TaxTables,
}

impl<'a> OptimizationAdvisor<'a> {
    pub fn new(tables: &'a TaxTables) -> Self {
        Self { tables }
    }

    /// Produces the applicable tips for a gross income, sorted by
    /// descending estimated savings. Passing the employment type enables
    /// the type-specific rules.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] if `gross_income` is negative.
    pub fn suggest(
        &self,
        gross_income: Decimal,
        employment_type: Option<EmploymentType>,
    ) -> Result<Vec<OptimizationTip>, EngineError> {
        if gross_income < Decimal::ZERO {
            return Err(EngineError::InvalidInput(gross_income));
        }

        let mut tips = Vec::new();
        if gross_income.is_zero() {
            return Ok(tips);
        }

        let marginal_bracket = ProgressiveTax::new(self.tables.brackets())
            .calculate(gross_income)?
            .marginal_bracket;

        if gross_income > HIGH_INCOME_THRESHOLD {
            tips.push(OptimizationTip {
                category: TipCategory::PensionFund,
                suggestion: format!(
                    "Contributions to a complementary pension fund (fondo pensione) are \
                     deductible up to €{PENSION_FUND_DEDUCTIBLE_CAP} per year and are relieved \
                     at your top marginal rate."
                ),
                estimated_savings: round_half_up(
                    PENSION_FUND_DEDUCTIBLE_CAP * marginal_bracket.rate,
                ),
            });
            tips.push(OptimizationTip {
                category: TipCategory::Investments,
                suggestion: "Tax-advantaged wrappers such as PIR plans exempt capital gains \
                             after the minimum holding period."
                    .to_string(),
                estimated_savings: round_half_up(
                    PIR_ANNUAL_CAP * PIR_ASSUMED_YIELD * CAPITAL_GAINS_RATE,
                ),
            });
        }

        if gross_income > EXPENSE_CREDIT_THRESHOLD {
            tips.push(OptimizationTip {
                category: TipCategory::Deductions,
                suggestion: "Medical costs, mortgage interest and charitable donations earn a \
                             19% IRPEF credit; keep receipts to claim them in the return."
                    .to_string(),
                estimated_savings: round_half_up(
                    TYPICAL_CREDITABLE_EXPENSES * EXPENSE_CREDIT_RATE,
                ),
            });
        }

        if let Some(tip) = self.bracket_edge_tip(gross_income, &marginal_bracket) {
            tips.push(tip);
        }

        match employment_type {
            Some(EmploymentType::Employee) => {
                tips.push(OptimizationTip {
                    category: TipCategory::Employment,
                    suggestion: "Welfare and fringe-benefit plans (meal vouchers, transport, \
                                 supplementary health) convert taxed salary into exempt \
                                 compensation."
                        .to_string(),
                    estimated_savings: round_half_up(
                        FRINGE_BENEFIT_BUDGET * marginal_bracket.rate,
                    ),
                });
            }
            Some(EmploymentType::Freelancer) if gross_income <= FLAT_RATE_REGIME_CEILING => {
                tips.push(OptimizationTip {
                    category: TipCategory::Employment,
                    suggestion: format!(
                        "Below €{FLAT_RATE_REGIME_CEILING} in revenue the flat-rate regime \
                         (regime forfettario) may replace progressive IRPEF with a single \
                         substitute rate."
                    ),
                    estimated_savings: round_half_up(gross_income * FLAT_RATE_SAVINGS_FACTOR),
                });
            }
            _ => {}
        }

        if let Some(tip) = self.location_spread_tip(gross_income) {
            tips.push(tip);
        }

        tips.sort_by(|a, b| b.estimated_savings.cmp(&a.estimated_savings));
        Ok(tips)
    }

    /// Income a short way above a bracket lower bound benefits most from
    /// deductible payments: the excess is relieved at the full rate step
    /// between the bracket and the one below it.
    fn bracket_edge_tip(
        &self,
        gross_income: Decimal,
        marginal_bracket: &TaxBracket,
    ) -> Option<OptimizationTip> {
        if marginal_bracket.min_income.is_zero() {
            return None;
        }
        let excess = gross_income - marginal_bracket.min_income;
        if excess > BRACKET_EDGE_WINDOW {
            return None;
        }
        let lower_rate = self
            .tables
            .brackets()
            .brackets
            .iter()
            .find(|bracket| bracket.max_income == Some(marginal_bracket.min_income))?
            .rate;
        let rate_step = marginal_bracket.rate - lower_rate;

        Some(OptimizationTip {
            category: TipCategory::BracketEdge,
            suggestion: format!(
                "Your income sits €{excess} above a bracket threshold; deductible payments of \
                 that size fall back into the lower bracket."
            ),
            estimated_savings: round_half_up(excess * rate_step),
        })
    }

    /// Regional surtax rates differ across the table; the spread between
    /// the cheapest and dearest region bounds what residence can change.
    fn location_spread_tip(
        &self,
        gross_income: Decimal,
    ) -> Option<OptimizationTip> {
        let min_rate = self.tables.surtaxes().map(|s| s.regional_rate).min()?;
        let max_rate = self.tables.surtaxes().map(|s| s.regional_rate).max()?;
        let spread = max_rate - min_rate;
        if spread.is_zero() {
            return None;
        }

        Some(OptimizationTip {
            category: TipCategory::Location,
            suggestion: "Regional and municipal surtax rates vary by residence; the regional \
                         spread alone changes the surtax share of the bill."
                .to_string(),
            estimated_savings: round_half_up(gross_income * spread),
        })
    }
}
