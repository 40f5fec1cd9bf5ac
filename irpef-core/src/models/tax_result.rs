use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fully itemized outcome of one net-income computation.
///
/// Field names are the wire names consumed by the reference client, so a
/// transport layer can serialize this struct directly. All monetary amounts
/// are annual euro values rounded to cents except `net_monthly_income`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    pub gross_income: Decimal,
    pub inps_contributions: Decimal,
    pub taxable_income: Decimal,
    pub employee_deduction: Decimal,
    pub irpef_tax: Decimal,
    pub regional_surtax: Decimal,
    pub municipal_surtax: Decimal,
    pub total_tax_payable: Decimal,
    pub net_annual_income: Decimal,
    pub net_monthly_income: Decimal,
    /// Total tax as a fraction of gross income; zero when gross is zero.
    pub effective_tax_rate: Decimal,
}

/// Outcome of comparing two gross incomes under the same employment type
/// and location. Differences are always comparison − current, so a smaller
/// comparison income yields negative values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub current: TaxResult,
    pub comparison: TaxResult,
    pub income_difference: Decimal,
    pub tax_difference: Decimal,
    pub net_difference: Decimal,
    /// `None` when the two gross incomes are equal: the marginal rate is
    /// undefined there, which is distinct from a rate of zero.
    pub marginal_tax_rate: Option<Decimal>,
}
