mod contribution;
mod deduction;
mod employment;
mod location;
mod optimization;
mod tax_bracket;
mod tax_input;
mod tax_result;

pub use contribution::ContributionRule;
pub use deduction::{DeductionBand, DeductionCurve};
pub use employment::EmploymentType;
pub use location::{Location, LocationSurtax};
pub use optimization::{OptimizationTip, TipCategory};
pub use tax_bracket::{BracketTable, TaxBracket};
pub use tax_input::TaxInput;
pub use tax_result::{ComparisonResult, TaxResult};
