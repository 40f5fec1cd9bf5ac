use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A (region, province, city) residence triple. Resolution against the
/// surtax table is verbatim on all three components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub region: String,
    pub province: String,
    pub city: String,
}

impl Location {
    pub fn new(
        region: impl Into<String>,
        province: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            region: region.into(),
            province: province.into(),
            city: city.into(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}/{}/{}", self.region, self.province, self.city)
    }
}

/// Regional and municipal surtax rates for one resolved location.
/// Rates are decimal fractions of taxable income, not percentages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationSurtax {
    pub location: Location,
    pub regional_rate: Decimal,
    pub municipal_rate: Decimal,
}
