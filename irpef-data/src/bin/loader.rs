use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use irpef_data::TaxTableLoader;

/// Validate a directory of tax table CSV files.
///
/// The directory must contain, for the selected year:
/// - irpef_brackets_<year>.csv: tax_year, min_income, max_income, rate
/// - contribution_rules_<year>.csv: employment_type, rate, income_ceiling
/// - deduction_bands_<year>.csv: employment_type, min_income, max_income,
///   amount_at_min, amount_at_max
/// - location_surtaxes_<year>.csv: region, province, city, regional_rate,
///   municipal_rate
///
/// Rates are decimal fractions; empty max_income/income_ceiling cells mean
/// "unbounded".
#[derive(Parser, Debug)]
#[command(name = "irpef-data-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory containing the tax table CSV files
    #[arg(short, long, default_value = "irpef-data/data")]
    data_dir: PathBuf,

    /// Tax year suffix of the data files (e.g. 2025)
    #[arg(short, long, default_value_t = 2025)]
    year: i32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let open = |name: String| -> Result<File> {
        let path = args.data_dir.join(&name);
        File::open(&path).with_context(|| format!("Failed to open: {}", path.display()))
    };

    let brackets =
        TaxTableLoader::parse_brackets(open(format!("irpef_brackets_{}.csv", args.year))?)
            .context("Failed to parse bracket data")?;
    let rules = TaxTableLoader::parse_contribution_rules(open(format!(
        "contribution_rules_{}.csv",
        args.year
    ))?)
    .context("Failed to parse contribution rule data")?;
    let bands =
        TaxTableLoader::parse_deduction_bands(open(format!("deduction_bands_{}.csv", args.year))?)
            .context("Failed to parse deduction band data")?;
    let surtaxes =
        TaxTableLoader::parse_surtaxes(open(format!("location_surtaxes_{}.csv", args.year))?)
            .context("Failed to parse surtax data")?;

    println!(
        "Parsed {} brackets, {} contribution rules, {} deduction bands, {} surtax rows",
        brackets.len(),
        rules.len(),
        bands.len(),
        surtaxes.len()
    );

    let tables = TaxTableLoader::load(brackets, rules, bands, surtaxes)
        .context("Table validation failed")?;

    println!("Tax year {}: tables valid.", tables.brackets().tax_year);
    println!("Regions: {}", tables.regions().join(", "));

    Ok(())
}
