use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::EmploymentType;

/// One segment of a deduction curve. The deduction falls linearly from
/// `amount_at_min` at `min_income` to `amount_at_max` at `max_income`.
/// The unbounded tail band is flat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionBand {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub amount_at_min: Decimal,
    pub amount_at_max: Decimal,
}

/// Piecewise-linear deduction curve for one employment type. Amounts are
/// non-increasing with income and reach zero at the phase-out ceiling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionCurve {
    pub employment_type: EmploymentType,
    pub bands: Vec<DeductionBand>,
}
