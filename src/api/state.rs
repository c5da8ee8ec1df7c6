//! Application state for the Property Projection Engine API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::config::{ConfigLoader, RuleSet};

/// Shared application state.
///
/// Holds the loaded rule set. Projections are pure functions of the request
/// and this rule set, so handlers share it read-only.
#[derive(Clone)]
pub struct AppState {
    /// The loaded rule-set configuration.
    config: Arc<ConfigLoader>,
}

impl AppState {
    /// Creates a new application state with the given configuration loader.
    pub fn new(config: ConfigLoader) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the configuration loader.
    pub fn config(&self) -> &ConfigLoader {
        &self.config
    }

    /// Returns the rule set used for calculations.
    pub fn rules(&self) -> &RuleSet {
        self.config.rules()
    }
}
