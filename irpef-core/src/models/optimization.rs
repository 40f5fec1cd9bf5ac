use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Category of an optimization tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipCategory {
    PensionFund,
    Investments,
    Deductions,
    BracketEdge,
    Employment,
    Location,
}

impl TipCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PensionFund => "pension_fund",
            Self::Investments => "investments",
            Self::Deductions => "deductions",
            Self::BracketEdge => "bracket_edge",
            Self::Employment => "employment",
            Self::Location => "location",
        }
    }
}

/// A single tax-reduction suggestion with its estimated annual savings.
/// Sequences of tips are ordered by descending `estimated_savings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationTip {
    pub category: TipCategory,
    pub suggestion: String,
    pub estimated_savings: Decimal,
}
