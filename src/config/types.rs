//! Configuration types for tax and depreciation rules.
//!
//! This module contains the strongly-typed rule-set structures that
//! are deserialized from YAML configuration files, plus the built-in
//! 2024-25 schedule used when no rule-set directory is supplied.

use std::sync::LazyLock;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Metadata identifying a rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSetMetadata {
    /// Short code for the rule set (e.g., "AU-2024-25").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// The financial year the rates apply to (e.g., "2024-25").
    pub financial_year: String,
    /// URL to the official rate documentation.
    pub source_url: String,
}

/// A single progressive income tax bracket.
///
/// Income above `threshold` (up to the next bracket's threshold) is taxed
/// at `rate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// The lower bound of the bracket (exclusive).
    pub threshold: Decimal,
    /// The marginal rate as a fraction (e.g., 0.325).
    pub rate: Decimal,
}

/// Medicare levy settings.
///
/// The levy is a flat rate on the whole income once income exceeds the
/// threshold. The low-income shading band is not modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicareLevyConfig {
    /// The levy rate as a fraction (e.g., 0.02).
    pub rate: Decimal,
    /// Income at or below this amount pays no levy.
    pub threshold: Decimal,
}

/// Tax configuration from tax.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxSchedule {
    /// Brackets ordered by ascending threshold, starting at zero.
    pub brackets: Vec<TaxBracket>,
    /// Medicare levy settings.
    pub medicare_levy: MedicareLevyConfig,
}

/// Division 43 capital works settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapitalWorksConfig {
    /// Annual deduction rate as a fraction of building value (e.g., 0.025).
    pub rate: Decimal,
    /// Buildings constructed before this year are not eligible.
    pub eligibility_year: i32,
    /// Number of years the deduction can be claimed.
    pub effective_life_years: u32,
}

/// A Division 40 asset category with its share of plant & equipment value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantCategory {
    /// Category name (e.g., "air_conditioning").
    pub name: String,
    /// Share of total plant & equipment value as a fraction.
    pub share: Decimal,
    /// ATO effective life in years.
    pub effective_life_years: u32,
}

/// Division 40 plant & equipment settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantEquipmentConfig {
    /// Multiplier applied to the prime-cost rate under diminishing value.
    pub diminishing_value_multiplier: Decimal,
    /// Factor applied to plant & equipment claims on established
    /// (previously used) property, reflecting the 2017 restriction.
    pub established_property_factor: Decimal,
    /// Share of construction value treated as plant & equipment when the
    /// caller does not supply a split.
    pub default_share: Decimal,
    /// Asset categories; shares must sum to one.
    pub categories: Vec<PlantCategory>,
}

/// Depreciation configuration from depreciation.yaml.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationRules {
    /// Division 43 settings.
    pub capital_works: CapitalWorksConfig,
    /// Division 40 settings.
    pub plant_equipment: PlantEquipmentConfig,
}

/// The complete rule set loaded from YAML files.
///
/// Aggregates tax brackets, the Medicare levy and depreciation rules for a
/// single financial year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSet {
    metadata: RuleSetMetadata,
    tax: TaxSchedule,
    depreciation: DepreciationRules,
}

static CANONICAL: LazyLock<RuleSet> = LazyLock::new(RuleSet::au_2024_25);

impl RuleSet {
    /// Creates a rule set from its component parts, validating it.
    pub fn new(
        metadata: RuleSetMetadata,
        tax: TaxSchedule,
        depreciation: DepreciationRules,
    ) -> EngineResult<Self> {
        let rule_set = Self {
            metadata,
            tax,
            depreciation,
        };
        rule_set.validate()?;
        Ok(rule_set)
    }

    /// The 2024-25 Australian schedule.
    ///
    /// Brackets are the ATO resident rates with thresholds at 18,200,
    /// 45,000, 120,000 and 180,000. This is identical to
    /// `config/au_2024_25`.
    pub fn au_2024_25() -> Self {
        let category = |name: &str, share: Decimal, life: u32| PlantCategory {
            name: name.to_string(),
            share,
            effective_life_years: life,
        };

        Self {
            metadata: RuleSetMetadata {
                code: "AU-2024-25".to_string(),
                name: "Australian resident individual rates 2024-25".to_string(),
                financial_year: "2024-25".to_string(),
                source_url: "https://www.ato.gov.au/tax-rates-and-codes/tax-rates-australian-residents"
                    .to_string(),
            },
            tax: TaxSchedule {
                brackets: vec![
                    TaxBracket { threshold: dec!(0), rate: dec!(0) },
                    TaxBracket { threshold: dec!(18200), rate: dec!(0.19) },
                    TaxBracket { threshold: dec!(45000), rate: dec!(0.325) },
                    TaxBracket { threshold: dec!(120000), rate: dec!(0.37) },
                    TaxBracket { threshold: dec!(180000), rate: dec!(0.45) },
                ],
                medicare_levy: MedicareLevyConfig {
                    rate: dec!(0.02),
                    threshold: dec!(26000),
                },
            },
            depreciation: DepreciationRules {
                capital_works: CapitalWorksConfig {
                    rate: dec!(0.025),
                    eligibility_year: 1987,
                    effective_life_years: 40,
                },
                plant_equipment: PlantEquipmentConfig {
                    diminishing_value_multiplier: dec!(1.5),
                    established_property_factor: dec!(0.3),
                    default_share: dec!(0.10),
                    categories: vec![
                        category("air_conditioning", dec!(0.25), 10),
                        category("kitchen_appliances", dec!(0.20), 12),
                        category("carpets_flooring", dec!(0.15), 8),
                        category("hot_water", dec!(0.15), 12),
                        category("window_furnishings", dec!(0.10), 10),
                        category("other", dec!(0.15), 10),
                    ],
                },
            },
        }
    }

    /// Returns the shared built-in 2024-25 rule set.
    pub fn canonical() -> &'static RuleSet {
        &CANONICAL
    }

    /// Returns the rule-set metadata.
    pub fn metadata(&self) -> &RuleSetMetadata {
        &self.metadata
    }

    /// Returns the tax schedule.
    pub fn tax(&self) -> &TaxSchedule {
        &self.tax
    }

    /// Returns the depreciation rules.
    pub fn depreciation(&self) -> &DepreciationRules {
        &self.depreciation
    }

    fn validate(&self) -> EngineResult<()> {
        let brackets = &self.tax.brackets;
        let first = brackets.first().ok_or_else(|| EngineError::InvalidRuleSet {
            message: "tax schedule has no brackets".to_string(),
        })?;
        if first.threshold != Decimal::ZERO {
            return Err(EngineError::InvalidRuleSet {
                message: format!("first bracket must start at 0, found {}", first.threshold),
            });
        }
        if brackets.windows(2).any(|w| w[0].threshold >= w[1].threshold) {
            return Err(EngineError::InvalidRuleSet {
                message: "bracket thresholds must be strictly ascending".to_string(),
            });
        }
        if let Some(bad) = brackets
            .iter()
            .find(|b| b.rate < Decimal::ZERO || b.rate > Decimal::ONE)
        {
            return Err(EngineError::InvalidRuleSet {
                message: format!("bracket rate {} is outside 0..=1", bad.rate),
            });
        }

        let plant = &self.depreciation.plant_equipment;
        let share_total: Decimal = plant.categories.iter().map(|c| c.share).sum();
        if (share_total - Decimal::ONE).abs() > dec!(0.0001) {
            return Err(EngineError::InvalidRuleSet {
                message: format!("plant category shares sum to {}, expected 1", share_total),
            });
        }
        if let Some(bad) = plant.categories.iter().find(|c| c.effective_life_years == 0) {
            return Err(EngineError::InvalidRuleSet {
                message: format!("category '{}' has a zero effective life", bad.name),
            });
        }
        if self.depreciation.capital_works.effective_life_years == 0 {
            return Err(EngineError::InvalidRuleSet {
                message: "capital works effective life must be positive".to_string(),
            });
        }

        Ok(())
    }
}
