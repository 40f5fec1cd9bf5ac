pub mod loader;

pub use loader::{
    BracketRecord, ContributionRuleRecord, DeductionBandRecord, SurtaxRecord, TaxTableLoader,
    TaxTableLoaderError, tables_2025,
};
