use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::EmploymentType;

/// Mandatory social-contribution rule for one employment type.
///
/// Pensioners carry an explicit zero-rate rule rather than being
/// special-cased inside the calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionRule {
    pub employment_type: EmploymentType,
    pub rate: Decimal,
    /// Income cap above which no further contribution accrues.
    pub income_ceiling: Option<Decimal>,
}
