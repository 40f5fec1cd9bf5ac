pub mod calculations;
pub mod error;
pub mod models;
pub mod tables;

pub use error::EngineError;
pub use models::*;
pub use tables::{TableError, TaxTables};
