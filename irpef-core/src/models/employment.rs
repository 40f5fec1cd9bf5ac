use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Closed set of employment types. Each variant selects one contribution
/// rule and one deduction curve from the tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmploymentType {
    Employee,
    Freelancer,
    Pensioner,
}

impl EmploymentType {
    pub const ALL: [EmploymentType; 3] = [Self::Employee, Self::Freelancer, Self::Pensioner];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Freelancer => "freelancer",
            Self::Pensioner => "pensioner",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "employee" => Some(Self::Employee),
            "freelancer" => Some(Self::Freelancer),
            "pensioner" => Some(Self::Pensioner),
            _ => None,
        }
    }
}

impl fmt::Display for EmploymentType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmploymentType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| EngineError::UnknownEmploymentType(s.to_string()))
    }
}
