use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{EmploymentType, Location};

/// Input for one net-income computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxInput {
    pub gross_income: Decimal,
    pub employment_type: EmploymentType,
    pub location: Location,
}
