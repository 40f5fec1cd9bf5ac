use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by the calculators for malformed or inconsistent caller
/// input. They are reported synchronously at the point of detection and are
/// never retried; no partial result is produced alongside them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// Income amounts must be non-negative.
    #[error("income must be a non-negative amount, got {0}")]
    InvalidInput(Decimal),

    /// The string did not name one of the closed employment-type variants.
    #[error("unknown employment type '{0}'")]
    UnknownEmploymentType(String),

    /// The (region, province, city) triple is not present in the tables.
    /// Matching is verbatim; there is no partial or fuzzy resolution.
    #[error("unknown location '{region}' / '{province}' / '{city}'")]
    UnknownLocation {
        region: String,
        province: String,
        city: String,
    },

    /// The region is not present in the surtax table.
    #[error("unknown region '{0}'")]
    UnknownRegion(String),

    /// The province is not present under the given region.
    #[error("unknown province '{province}' in region '{region}'")]
    UnknownProvince { region: String, province: String },

    /// The bracket table contains no brackets.
    #[error("no tax brackets provided")]
    NoBrackets,
}
