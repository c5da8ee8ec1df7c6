//! Configuration loading and management for the Property Projection Engine.
//!
//! This module provides functionality to load tax and depreciation rule sets
//! from YAML files, including income tax brackets, the Medicare levy and the
//! Division 43 / Division 40 depreciation settings.
//!
//! # Example
//!
//! ```no_run
//! use property_projection::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/au_2024_25").unwrap();
//! println!("Loaded rule set: {}", config.metadata().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    CapitalWorksConfig, DepreciationRules, MedicareLevyConfig, PlantCategory,
    PlantEquipmentConfig, RuleSet, RuleSetMetadata, TaxBracket, TaxSchedule,
};
