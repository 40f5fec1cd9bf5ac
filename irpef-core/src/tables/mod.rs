//! Read-only tax tables: the process-wide repository of brackets,
//! contribution rules, deduction curves, and location surtaxes.
//!
//! A [`TaxTables`] value is built once at startup via [`TaxTables::new`],
//! which validates every structural invariant, and is never mutated
//! afterwards. Calculators borrow a handle (`&TaxTables`) rather than
//! reaching for a global, so arbitrarily many callers can read it
//! concurrently.

use std::collections::HashMap;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::error::EngineError;
use crate::models::{
    BracketTable, ContributionRule, DeductionCurve, EmploymentType, Location, LocationSurtax,
};

/// Errors detected while validating table data at construction time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("bracket table for tax year {0} has no brackets")]
    EmptyBracketTable(i32),

    #[error("bracket {index} must start at {expected}, got {got}")]
    BracketsNotContiguous {
        index: usize,
        expected: Decimal,
        got: Decimal,
    },

    #[error("bracket {index} has max_income {max} not above min_income {min}")]
    EmptyBracket {
        index: usize,
        min: Decimal,
        max: Decimal,
    },

    #[error("only the last bracket may be unbounded (bracket {0})")]
    UnboundedBracketNotLast(usize),

    #[error("the last bracket must be unbounded")]
    MissingUnboundedBracket,

    #[error("rate {0} is outside [0, 1]")]
    RateOutOfRange(Decimal),

    #[error("no contribution rule for employment type '{0}'")]
    MissingContributionRule(EmploymentType),

    #[error("duplicate contribution rule for employment type '{0}'")]
    DuplicateContributionRule(EmploymentType),

    #[error("contribution ceiling {0} must be positive")]
    CeilingNotPositive(Decimal),

    #[error("no deduction curve for employment type '{0}'")]
    MissingDeductionCurve(EmploymentType),

    #[error("duplicate deduction curve for employment type '{0}'")]
    DuplicateDeductionCurve(EmploymentType),

    #[error("deduction curve for '{0}' has no bands")]
    EmptyDeductionCurve(EmploymentType),

    #[error("deduction curve for '{employment_type}': band {index} must start at {expected}, got {got}")]
    BandsNotContiguous {
        employment_type: EmploymentType,
        index: usize,
        expected: Decimal,
        got: Decimal,
    },

    #[error("deduction curve for '{employment_type}': band {index} has max_income {max} not above min_income {min}")]
    EmptyDeductionBand {
        employment_type: EmploymentType,
        index: usize,
        min: Decimal,
        max: Decimal,
    },

    #[error("deduction curve for '{employment_type}': only the last band may be unbounded (band {index})")]
    UnboundedBandNotLast {
        employment_type: EmploymentType,
        index: usize,
    },

    #[error("deduction curve for '{employment_type}' has a negative amount in band {index}")]
    NegativeDeduction {
        employment_type: EmploymentType,
        index: usize,
    },

    #[error("deduction curve for '{employment_type}' increases at band {index}")]
    DeductionNotMonotonic {
        employment_type: EmploymentType,
        index: usize,
    },

    #[error("deduction curve for '{0}' must end in an unbounded band with a zero amount")]
    MissingPhaseOut(EmploymentType),

    #[error("duplicate surtax entry for {0}")]
    DuplicateLocation(Location),
}

/// The immutable repository handle passed to every calculator.
#[derive(Debug, Clone)]
pub struct TaxTables {
    brackets: BracketTable,
    contribution_rules: HashMap<EmploymentType, ContributionRule>,
    deduction_curves: HashMap<EmploymentType, DeductionCurve>,
    surtaxes: HashMap<Location, LocationSurtax>,
}

impl TaxTables {
    /// Validates and assembles the tables.
    ///
    /// Requires a contiguous, ascending bracket table covering `[0, ∞)`,
    /// exactly one contribution rule and one deduction curve per employment
    /// type, and a surtax entry per distinct location.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] naming the first violated invariant.
    pub fn new(
        brackets: BracketTable,
        contribution_rules: Vec<ContributionRule>,
        deduction_curves: Vec<DeductionCurve>,
        surtaxes: Vec<LocationSurtax>,
    ) -> Result<Self, TableError> {
        validate_brackets(&brackets)?;

        let mut rules = HashMap::new();
        for rule in contribution_rules {
            validate_contribution_rule(&rule)?;
            if rules.contains_key(&rule.employment_type) {
                return Err(TableError::DuplicateContributionRule(rule.employment_type));
            }
            rules.insert(rule.employment_type, rule);
        }
        for employment_type in EmploymentType::ALL {
            if !rules.contains_key(&employment_type) {
                return Err(TableError::MissingContributionRule(employment_type));
            }
        }

        let mut curves = HashMap::new();
        for curve in deduction_curves {
            validate_deduction_curve(&curve)?;
            if curves.contains_key(&curve.employment_type) {
                return Err(TableError::DuplicateDeductionCurve(curve.employment_type));
            }
            curves.insert(curve.employment_type, curve);
        }
        for employment_type in EmploymentType::ALL {
            if !curves.contains_key(&employment_type) {
                return Err(TableError::MissingDeductionCurve(employment_type));
            }
        }

        let mut surtax_map = HashMap::new();
        for entry in surtaxes {
            validate_rate(entry.regional_rate)?;
            validate_rate(entry.municipal_rate)?;
            if surtax_map.contains_key(&entry.location) {
                return Err(TableError::DuplicateLocation(entry.location));
            }
            surtax_map.insert(entry.location.clone(), entry);
        }

        debug!(
            tax_year = brackets.tax_year,
            brackets = brackets.brackets.len(),
            locations = surtax_map.len(),
            "tax tables validated"
        );

        Ok(Self {
            brackets,
            contribution_rules: rules,
            deduction_curves: curves,
            surtaxes: surtax_map,
        })
    }

    pub fn brackets(&self) -> &BracketTable {
        &self.brackets
    }

    /// Contribution rule for an employment type. Infallible: construction
    /// guarantees a rule per variant.
    pub fn contribution_rule(
        &self,
        employment_type: EmploymentType,
    ) -> &ContributionRule {
        &self.contribution_rules[&employment_type]
    }

    /// Deduction curve for an employment type. Infallible: construction
    /// guarantees a curve per variant.
    pub fn deduction_curve(
        &self,
        employment_type: EmploymentType,
    ) -> &DeductionCurve {
        &self.deduction_curves[&employment_type]
    }

    /// Resolves a location triple to its surtax rates. The triple must
    /// match a table entry verbatim; an unknown triple is an error, never a
    /// default rate.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownLocation`] if the triple is absent.
    pub fn surtax_rates(
        &self,
        location: &Location,
    ) -> Result<&LocationSurtax, EngineError> {
        self.surtaxes
            .get(location)
            .ok_or_else(|| EngineError::UnknownLocation {
                region: location.region.clone(),
                province: location.province.clone(),
                city: location.city.clone(),
            })
    }

    /// All surtax rows, in no particular order.
    pub fn surtaxes(&self) -> impl Iterator<Item = &LocationSurtax> {
        self.surtaxes.values()
    }

    /// All regions present in the surtax table, sorted and deduplicated.
    pub fn regions(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .surtaxes
            .keys()
            .map(|location| location.region.as_str())
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Provinces under a region, sorted and deduplicated.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownRegion`] if the region has no entries.
    pub fn provinces(
        &self,
        region: &str,
    ) -> Result<Vec<&str>, EngineError> {
        let mut names: Vec<&str> = self
            .surtaxes
            .keys()
            .filter(|location| location.region == region)
            .map(|location| location.province.as_str())
            .collect();
        if names.is_empty() {
            return Err(EngineError::UnknownRegion(region.to_string()));
        }
        names.sort_unstable();
        names.dedup();
        Ok(names)
    }

    /// Cities under a (region, province) pair, sorted and deduplicated.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownRegion`] if the region has no entries,
    /// [`EngineError::UnknownProvince`] if the region exists but the
    /// province does not.
    pub fn cities(
        &self,
        region: &str,
        province: &str,
    ) -> Result<Vec<&str>, EngineError> {
        if !self
            .surtaxes
            .keys()
            .any(|location| location.region == region)
        {
            return Err(EngineError::UnknownRegion(region.to_string()));
        }
        let mut names: Vec<&str> = self
            .surtaxes
            .keys()
            .filter(|location| location.region == region && location.province == province)
            .map(|location| location.city.as_str())
            .collect();
        if names.is_empty() {
            return Err(EngineError::UnknownProvince {
                region: region.to_string(),
                province: province.to_string(),
            });
        }
        names.sort_unstable();
        names.dedup();
        Ok(names)
    }
}

fn validate_rate(rate: Decimal) -> Result<(), TableError> {
    if rate < Decimal::ZERO || rate > Decimal::ONE {
        return Err(TableError::RateOutOfRange(rate));
    }
    Ok(())
}

fn validate_brackets(table: &BracketTable) -> Result<(), TableError> {
    if table.brackets.is_empty() {
        return Err(TableError::EmptyBracketTable(table.tax_year));
    }

    let last = table.brackets.len() - 1;
    let mut expected = Decimal::ZERO;
    for (index, bracket) in table.brackets.iter().enumerate() {
        if bracket.min_income != expected {
            return Err(TableError::BracketsNotContiguous {
                index,
                expected,
                got: bracket.min_income,
            });
        }
        validate_rate(bracket.rate)?;
        match bracket.max_income {
            Some(max) => {
                if max <= bracket.min_income {
                    return Err(TableError::EmptyBracket {
                        index,
                        min: bracket.min_income,
                        max,
                    });
                }
                if index == last {
                    return Err(TableError::MissingUnboundedBracket);
                }
                expected = max;
            }
            None => {
                if index != last {
                    return Err(TableError::UnboundedBracketNotLast(index));
                }
            }
        }
    }
    Ok(())
}

fn validate_contribution_rule(rule: &ContributionRule) -> Result<(), TableError> {
    validate_rate(rule.rate)?;
    if let Some(ceiling) = rule.income_ceiling {
        if ceiling <= Decimal::ZERO {
            return Err(TableError::CeilingNotPositive(ceiling));
        }
    }
    Ok(())
}

fn validate_deduction_curve(curve: &DeductionCurve) -> Result<(), TableError> {
    let employment_type = curve.employment_type;
    if curve.bands.is_empty() {
        return Err(TableError::EmptyDeductionCurve(employment_type));
    }

    let last = curve.bands.len() - 1;
    let mut expected = Decimal::ZERO;
    let mut previous_amount: Option<Decimal> = None;
    for (index, band) in curve.bands.iter().enumerate() {
        if band.min_income != expected {
            return Err(TableError::BandsNotContiguous {
                employment_type,
                index,
                expected,
                got: band.min_income,
            });
        }
        if band.amount_at_min < Decimal::ZERO || band.amount_at_max < Decimal::ZERO {
            return Err(TableError::NegativeDeduction {
                employment_type,
                index,
            });
        }
        if band.amount_at_max > band.amount_at_min {
            return Err(TableError::DeductionNotMonotonic {
                employment_type,
                index,
            });
        }
        if let Some(previous) = previous_amount {
            if band.amount_at_min > previous {
                return Err(TableError::DeductionNotMonotonic {
                    employment_type,
                    index,
                });
            }
        }
        previous_amount = Some(band.amount_at_max);
        match band.max_income {
            Some(max) => {
                if max <= band.min_income {
                    return Err(TableError::EmptyDeductionBand {
                        employment_type,
                        index,
                        min: band.min_income,
                        max,
                    });
                }
                if index == last {
                    return Err(TableError::MissingPhaseOut(employment_type));
                }
                expected = max;
            }
            None => {
                if index != last {
                    return Err(TableError::UnboundedBandNotLast {
                        employment_type,
                        index,
                    });
                }
                if !band.amount_at_min.is_zero() || !band.amount_at_max.is_zero() {
                    return Err(TableError::MissingPhaseOut(employment_type));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use crate::models::{DeductionBand, TaxBracket};

    use super::*;

    fn test_brackets() -> BracketTable {
        BracketTable {
            tax_year: 2025,
            brackets: vec![
                TaxBracket {
                    min_income: dec!(0),
                    max_income: Some(dec!(28000)),
                    rate: dec!(0.23),
                },
                TaxBracket {
                    min_income: dec!(28000),
                    max_income: Some(dec!(50000)),
                    rate: dec!(0.35),
                },
                TaxBracket {
                    min_income: dec!(50000),
                    max_income: None,
                    rate: dec!(0.43),
                },
            ],
        }
    }

    fn test_rules() -> Vec<ContributionRule> {
        vec![
            ContributionRule {
                employment_type: EmploymentType::Employee,
                rate: dec!(0.0949),
                income_ceiling: None,
            },
            ContributionRule {
                employment_type: EmploymentType::Freelancer,
                rate: dec!(0.24),
                income_ceiling: Some(dec!(120000)),
            },
            ContributionRule {
                employment_type: EmploymentType::Pensioner,
                rate: dec!(0),
                income_ceiling: None,
            },
        ]
    }

    fn zero_curve(employment_type: EmploymentType) -> DeductionCurve {
        DeductionCurve {
            employment_type,
            bands: vec![DeductionBand {
                min_income: dec!(0),
                max_income: None,
                amount_at_min: dec!(0),
                amount_at_max: dec!(0),
            }],
        }
    }

    fn employee_curve() -> DeductionCurve {
        DeductionCurve {
            employment_type: EmploymentType::Employee,
            bands: vec![
                DeductionBand {
                    min_income: dec!(0),
                    max_income: Some(dec!(15000)),
                    amount_at_min: dec!(1955),
                    amount_at_max: dec!(1955),
                },
                DeductionBand {
                    min_income: dec!(15000),
                    max_income: Some(dec!(28000)),
                    amount_at_min: dec!(1955),
                    amount_at_max: dec!(1910),
                },
                DeductionBand {
                    min_income: dec!(28000),
                    max_income: Some(dec!(50000)),
                    amount_at_min: dec!(1910),
                    amount_at_max: dec!(0),
                },
                DeductionBand {
                    min_income: dec!(50000),
                    max_income: None,
                    amount_at_min: dec!(0),
                    amount_at_max: dec!(0),
                },
            ],
        }
    }

    fn test_curves() -> Vec<DeductionCurve> {
        vec![
            employee_curve(),
            zero_curve(EmploymentType::Freelancer),
            zero_curve(EmploymentType::Pensioner),
        ]
    }

    fn test_surtaxes() -> Vec<LocationSurtax> {
        vec![
            LocationSurtax {
                location: Location::new("Umbria", "Perugia", "Perugia"),
                regional_rate: dec!(0.015),
                municipal_rate: dec!(0.005),
            },
            LocationSurtax {
                location: Location::new("Umbria", "Perugia", "Assisi"),
                regional_rate: dec!(0.015),
                municipal_rate: dec!(0.004),
            },
            LocationSurtax {
                location: Location::new("Umbria", "Terni", "Terni"),
                regional_rate: dec!(0.015),
                municipal_rate: dec!(0.008),
            },
            LocationSurtax {
                location: Location::new("Marche", "Ancona", "Ancona"),
                regional_rate: dec!(0.023),
                municipal_rate: dec!(0.006),
            },
        ]
    }

    fn test_tables() -> TaxTables {
        TaxTables::new(test_brackets(), test_rules(), test_curves(), test_surtaxes()).unwrap()
    }

    // =========================================================================
    // construction tests
    // =========================================================================

    #[test]
    fn new_accepts_valid_tables() {
        let tables = test_tables();

        assert_eq!(tables.brackets().tax_year, 2025);
        assert_eq!(tables.brackets().brackets.len(), 3);
    }

    #[test]
    fn new_rejects_empty_bracket_table() {
        let result = TaxTables::new(
            BracketTable {
                tax_year: 2025,
                brackets: vec![],
            },
            test_rules(),
            test_curves(),
            test_surtaxes(),
        );

        assert_eq!(result.err(), Some(TableError::EmptyBracketTable(2025)));
    }

    #[test]
    fn new_rejects_bracket_gap() {
        let mut brackets = test_brackets();
        brackets.brackets[1].min_income = dec!(30000);

        let result = TaxTables::new(brackets, test_rules(), test_curves(), test_surtaxes());

        assert_eq!(
            result.err(),
            Some(TableError::BracketsNotContiguous {
                index: 1,
                expected: dec!(28000),
                got: dec!(30000),
            })
        );
    }

    #[test]
    fn new_rejects_bounded_last_bracket() {
        let mut brackets = test_brackets();
        brackets.brackets[2].max_income = Some(dec!(100000));

        let result = TaxTables::new(brackets, test_rules(), test_curves(), test_surtaxes());

        assert_eq!(result.err(), Some(TableError::MissingUnboundedBracket));
    }

    #[test]
    fn new_rejects_unbounded_bracket_in_middle() {
        let mut brackets = test_brackets();
        brackets.brackets[1].max_income = None;

        let result = TaxTables::new(brackets, test_rules(), test_curves(), test_surtaxes());

        assert_eq!(result.err(), Some(TableError::UnboundedBracketNotLast(1)));
    }

    #[test]
    fn new_rejects_rate_above_one() {
        let mut brackets = test_brackets();
        brackets.brackets[0].rate = dec!(1.2);

        let result = TaxTables::new(brackets, test_rules(), test_curves(), test_surtaxes());

        assert_eq!(result.err(), Some(TableError::RateOutOfRange(dec!(1.2))));
    }

    #[test]
    fn new_rejects_missing_contribution_rule() {
        let rules = test_rules()
            .into_iter()
            .filter(|rule| rule.employment_type != EmploymentType::Pensioner)
            .collect();

        let result = TaxTables::new(test_brackets(), rules, test_curves(), test_surtaxes());

        assert_eq!(
            result.err(),
            Some(TableError::MissingContributionRule(
                EmploymentType::Pensioner
            ))
        );
    }

    #[test]
    fn new_rejects_duplicate_contribution_rule() {
        let mut rules = test_rules();
        rules.push(ContributionRule {
            employment_type: EmploymentType::Employee,
            rate: dec!(0.10),
            income_ceiling: None,
        });

        let result = TaxTables::new(test_brackets(), rules, test_curves(), test_surtaxes());

        assert_eq!(
            result.err(),
            Some(TableError::DuplicateContributionRule(
                EmploymentType::Employee
            ))
        );
    }

    #[test]
    fn new_rejects_zero_ceiling() {
        let mut rules = test_rules();
        rules[0].income_ceiling = Some(dec!(0));

        let result = TaxTables::new(test_brackets(), rules, test_curves(), test_surtaxes());

        assert_eq!(result.err(), Some(TableError::CeilingNotPositive(dec!(0))));
    }

    #[test]
    fn new_rejects_missing_deduction_curve() {
        let curves = vec![employee_curve(), zero_curve(EmploymentType::Freelancer)];

        let result = TaxTables::new(test_brackets(), test_rules(), curves, test_surtaxes());

        assert_eq!(
            result.err(),
            Some(TableError::MissingDeductionCurve(EmploymentType::Pensioner))
        );
    }

    #[test]
    fn new_rejects_increasing_deduction_curve() {
        let mut curves = test_curves();
        curves[0].bands[1].amount_at_max = dec!(2000);

        let result = TaxTables::new(test_brackets(), test_rules(), curves, test_surtaxes());

        assert_eq!(
            result.err(),
            Some(TableError::DeductionNotMonotonic {
                employment_type: EmploymentType::Employee,
                index: 1,
            })
        );
    }

    #[test]
    fn new_rejects_curve_without_phase_out() {
        let mut curves = test_curves();
        curves[0].bands[3].amount_at_min = dec!(1000);
        curves[0].bands[3].amount_at_max = dec!(1000);

        let result = TaxTables::new(test_brackets(), test_rules(), curves, test_surtaxes());

        assert_eq!(
            result.err(),
            Some(TableError::MissingPhaseOut(EmploymentType::Employee))
        );
    }

    #[test]
    fn new_rejects_deduction_band_gap() {
        let mut curves = test_curves();
        curves[0].bands[2].min_income = dec!(29000);

        let result = TaxTables::new(test_brackets(), test_rules(), curves, test_surtaxes());

        assert_eq!(
            result.err(),
            Some(TableError::BandsNotContiguous {
                employment_type: EmploymentType::Employee,
                index: 2,
                expected: dec!(28000),
                got: dec!(29000),
            })
        );
    }

    #[test]
    fn new_rejects_duplicate_location() {
        let mut surtaxes = test_surtaxes();
        surtaxes.push(LocationSurtax {
            location: Location::new("Umbria", "Perugia", "Perugia"),
            regional_rate: dec!(0.02),
            municipal_rate: dec!(0.006),
        });

        let result = TaxTables::new(test_brackets(), test_rules(), test_curves(), surtaxes);

        assert_eq!(
            result.err(),
            Some(TableError::DuplicateLocation(Location::new(
                "Umbria", "Perugia", "Perugia"
            )))
        );
    }

    // =========================================================================
    // lookup tests
    // =========================================================================

    #[test]
    fn contribution_rule_resolves_every_variant() {
        let tables = test_tables();

        for employment_type in EmploymentType::ALL {
            assert_eq!(
                tables.contribution_rule(employment_type).employment_type,
                employment_type
            );
        }
    }

    #[test]
    fn surtax_rates_resolves_known_triple() {
        let tables = test_tables();

        let rates = tables
            .surtax_rates(&Location::new("Umbria", "Perugia", "Perugia"))
            .unwrap();

        assert_eq!(rates.regional_rate, dec!(0.015));
        assert_eq!(rates.municipal_rate, dec!(0.005));
    }

    #[test]
    fn surtax_rates_rejects_unknown_triple() {
        let tables = test_tables();

        let result = tables.surtax_rates(&Location::new("Umbria", "Perugia", "Spoleto"));

        assert_eq!(
            result.err(),
            Some(EngineError::UnknownLocation {
                region: "Umbria".to_string(),
                province: "Perugia".to_string(),
                city: "Spoleto".to_string(),
            })
        );
    }

    #[test]
    fn surtax_rates_matching_is_case_sensitive() {
        let tables = test_tables();

        let result = tables.surtax_rates(&Location::new("umbria", "Perugia", "Perugia"));

        assert!(result.is_err());
    }

    // =========================================================================
    // geography query tests
    // =========================================================================

    #[test]
    fn regions_are_sorted_and_deduplicated() {
        let tables = test_tables();

        assert_eq!(tables.regions(), vec!["Marche", "Umbria"]);
    }

    #[test]
    fn provinces_lists_region_entries() {
        let tables = test_tables();

        assert_eq!(tables.provinces("Umbria").unwrap(), vec!["Perugia", "Terni"]);
    }

    #[test]
    fn provinces_rejects_unknown_region() {
        let tables = test_tables();

        assert_eq!(
            tables.provinces("Molise").err(),
            Some(EngineError::UnknownRegion("Molise".to_string()))
        );
    }

    #[test]
    fn cities_lists_province_entries() {
        let tables = test_tables();

        assert_eq!(
            tables.cities("Umbria", "Perugia").unwrap(),
            vec!["Assisi", "Perugia"]
        );
    }

    #[test]
    fn cities_rejects_unknown_province() {
        let tables = test_tables();

        assert_eq!(
            tables.cities("Umbria", "Ancona").err(),
            Some(EngineError::UnknownProvince {
                region: "Umbria".to_string(),
                province: "Ancona".to_string(),
            })
        );
    }

    #[test]
    fn cities_rejects_unknown_region_before_province() {
        let tables = test_tables();

        assert_eq!(
            tables.cities("Molise", "Perugia").err(),
            Some(EngineError::UnknownRegion("Molise".to_string()))
        );
    }
}
