//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading tax and
//! depreciation rule sets from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{DepreciationRules, RuleSet, RuleSetMetadata, TaxSchedule};

/// Loads and provides access to a tax and depreciation rule set.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/au_2024_25/
/// ├── rule_set.yaml      # Rule-set metadata
/// ├── tax.yaml           # Income tax brackets and Medicare levy
/// └── depreciation.yaml  # Division 43 and Division 40 settings
/// ```
///
/// # Example
///
/// ```no_run
/// use property_projection::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/au_2024_25").unwrap();
/// println!("Loaded rule set: {}", loader.metadata().name);
/// println!("Financial year: {}", loader.metadata().financial_year);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    rules: RuleSet,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The rule set is internally inconsistent
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<RuleSetMetadata>(&path.join("rule_set.yaml"))?;
        let tax = Self::load_yaml::<TaxSchedule>(&path.join("tax.yaml"))?;
        let depreciation = Self::load_yaml::<DepreciationRules>(&path.join("depreciation.yaml"))?;

        let rules = RuleSet::new(metadata, tax, depreciation)?;

        Ok(Self { rules })
    }

    /// Wraps the built-in 2024-25 rule set without touching the filesystem.
    pub fn builtin() -> Self {
        Self {
            rules: RuleSet::au_2024_25(),
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying rule set.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Returns the rule-set metadata.
    pub fn metadata(&self) -> &RuleSetMetadata {
        self.rules.metadata()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/au_2024_25"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.metadata().code, "AU-2024-25");
        assert_eq!(loader.metadata().financial_year, "2024-25");
    }

    #[test]
    fn test_loaded_rules_match_builtin() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(loader.rules(), ConfigLoader::builtin().rules());
    }

    #[test]
    fn test_tax_brackets_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let brackets = &loader.rules().tax().brackets;

        assert_eq!(brackets.len(), 5);
        assert_eq!(brackets[2].threshold, dec("45000"));
        assert_eq!(brackets[2].rate, dec("0.325"));
        assert_eq!(brackets[4].rate, dec("0.45"));
    }

    #[test]
    fn test_depreciation_rules_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let depreciation = loader.rules().depreciation();

        assert_eq!(depreciation.capital_works.eligibility_year, 1987);
        assert_eq!(depreciation.capital_works.rate, dec("0.025"));
        assert_eq!(
            depreciation.plant_equipment.established_property_factor,
            dec("0.3")
        );
        assert_eq!(depreciation.plant_equipment.categories.len(), 6);
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("rule_set.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }
}
