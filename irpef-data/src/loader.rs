//! CSV loading for the tax tables.
//!
//! Four files describe one tax year: progressive brackets, contribution
//! rules, deduction bands, and location surtaxes. Records are parsed from
//! any `Read` and assembled into a validated [`TaxTables`]; the bundled
//! 2025 Italian data set is embedded and exposed via [`tables_2025`].
//!
//! All rates in the files are decimal fractions (e.g. `0.0173` for 1.73%),
//! and an empty `max_income` / `income_ceiling` cell means "unbounded".

use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use irpef_core::{
    BracketTable, ContributionRule, DeductionBand, DeductionCurve, EmploymentType, Location,
    LocationSurtax, TableError, TaxBracket, TaxTables,
};

const BRACKETS_2025: &str = include_str!("../data/irpef_brackets_2025.csv");
const CONTRIBUTION_RULES_2025: &str = include_str!("../data/contribution_rules_2025.csv");
const DEDUCTION_BANDS_2025: &str = include_str!("../data/deduction_bands_2025.csv");
const LOCATION_SURTAXES_2025: &str = include_str!("../data/location_surtaxes_2025.csv");

/// Errors that can occur when loading tax table data.
#[derive(Debug, Error)]
pub enum TaxTableLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("unknown employment type '{0}' in data file")]
    UnknownEmploymentType(String),

    #[error("bracket records describe more than one tax year: {0} and {1}")]
    MixedTaxYears(i32, i32),

    #[error("no bracket records found")]
    NoBrackets,

    #[error("table validation error: {0}")]
    Table(#[from] TableError),
}

impl From<csv::Error> for TaxTableLoaderError {
    fn from(err: csv::Error) -> Self {
        TaxTableLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from the brackets CSV file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub tax_year: i32,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

/// A single record from the contribution rules CSV file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ContributionRuleRecord {
    pub employment_type: String,
    pub rate: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub income_ceiling: Option<Decimal>,
}

/// A single record from the deduction bands CSV file. Bands belonging to
/// the same employment type must appear in ascending order.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DeductionBandRecord {
    pub employment_type: String,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub amount_at_min: Decimal,
    pub amount_at_max: Decimal,
}

/// A single record from the location surtaxes CSV file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SurtaxRecord {
    pub region: String,
    pub province: String,
    pub city: String,
    pub regional_rate: Decimal,
    pub municipal_rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn parse_records<R: Read, T: serde::de::DeserializeOwned>(
    reader: R,
) -> Result<Vec<T>, TaxTableLoaderError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();

    for result in csv_reader.deserialize() {
        records.push(result?);
    }

    Ok(records)
}

fn parse_employment_type(s: &str) -> Result<EmploymentType, TaxTableLoaderError> {
    EmploymentType::parse(s.trim())
        .ok_or_else(|| TaxTableLoaderError::UnknownEmploymentType(s.to_string()))
}

/// Loader for tax table data from CSV files.
pub struct TaxTableLoader;

impl TaxTableLoader {
    /// Parse bracket records from a CSV reader.
    pub fn parse_brackets<R: Read>(reader: R) -> Result<Vec<BracketRecord>, TaxTableLoaderError> {
        parse_records(reader)
    }

    /// Parse contribution rule records from a CSV reader.
    pub fn parse_contribution_rules<R: Read>(
        reader: R,
    ) -> Result<Vec<ContributionRuleRecord>, TaxTableLoaderError> {
        parse_records(reader)
    }

    /// Parse deduction band records from a CSV reader.
    pub fn parse_deduction_bands<R: Read>(
        reader: R,
    ) -> Result<Vec<DeductionBandRecord>, TaxTableLoaderError> {
        parse_records(reader)
    }

    /// Parse location surtax records from a CSV reader.
    pub fn parse_surtaxes<R: Read>(reader: R) -> Result<Vec<SurtaxRecord>, TaxTableLoaderError> {
        parse_records(reader)
    }

    /// Assembles parsed records into a validated [`TaxTables`].
    ///
    /// All bracket records must carry the same tax year; deduction bands
    /// are grouped per employment type in file order. Structural
    /// validation is delegated to [`TaxTables::new`].
    ///
    /// # Errors
    ///
    /// Returns [`TaxTableLoaderError`] for unknown employment type strings,
    /// mixed tax years, an empty bracket file, or any [`TableError`].
    pub fn load(
        brackets: Vec<BracketRecord>,
        rules: Vec<ContributionRuleRecord>,
        bands: Vec<DeductionBandRecord>,
        surtaxes: Vec<SurtaxRecord>,
    ) -> Result<TaxTables, TaxTableLoaderError> {
        let mut tax_year: Option<i32> = None;
        for record in &brackets {
            match tax_year {
                None => tax_year = Some(record.tax_year),
                Some(year) if year != record.tax_year => {
                    return Err(TaxTableLoaderError::MixedTaxYears(year, record.tax_year));
                }
                Some(_) => {}
            }
        }
        let tax_year = tax_year.ok_or(TaxTableLoaderError::NoBrackets)?;

        let bracket_table = BracketTable {
            tax_year,
            brackets: brackets
                .into_iter()
                .map(|record| TaxBracket {
                    min_income: record.min_income,
                    max_income: record.max_income,
                    rate: record.rate,
                })
                .collect(),
        };

        let contribution_rules = rules
            .into_iter()
            .map(|record| {
                Ok(ContributionRule {
                    employment_type: parse_employment_type(&record.employment_type)?,
                    rate: record.rate,
                    income_ceiling: record.income_ceiling,
                })
            })
            .collect::<Result<Vec<_>, TaxTableLoaderError>>()?;

        let mut curves: Vec<DeductionCurve> = Vec::new();
        for record in bands {
            let employment_type = parse_employment_type(&record.employment_type)?;
            let band = DeductionBand {
                min_income: record.min_income,
                max_income: record.max_income,
                amount_at_min: record.amount_at_min,
                amount_at_max: record.amount_at_max,
            };
            match curves
                .iter_mut()
                .find(|curve| curve.employment_type == employment_type)
            {
                Some(curve) => curve.bands.push(band),
                None => curves.push(DeductionCurve {
                    employment_type,
                    bands: vec![band],
                }),
            }
        }

        let surtax_rows = surtaxes
            .into_iter()
            .map(|record| LocationSurtax {
                location: Location {
                    region: record.region,
                    province: record.province,
                    city: record.city,
                },
                regional_rate: record.regional_rate,
                municipal_rate: record.municipal_rate,
            })
            .collect();

        let tables = TaxTables::new(bracket_table, contribution_rules, curves, surtax_rows)?;
        debug!(tax_year, "tax tables loaded");
        Ok(tables)
    }
}

/// Builds the bundled 2025 Italian tables.
///
/// # Errors
///
/// Returns [`TaxTableLoaderError`] if the embedded data fails to parse or
/// validate.
pub fn tables_2025() -> Result<TaxTables, TaxTableLoaderError> {
    TaxTableLoader::load(
        TaxTableLoader::parse_brackets(BRACKETS_2025.as_bytes())?,
        TaxTableLoader::parse_contribution_rules(CONTRIBUTION_RULES_2025.as_bytes())?,
        TaxTableLoader::parse_deduction_bands(DEDUCTION_BANDS_2025.as_bytes())?,
        TaxTableLoader::parse_surtaxes(LOCATION_SURTAXES_2025.as_bytes())?,
    )
}
