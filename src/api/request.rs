//! Request types for the Property Projection Engine API.
//!
//! This module defines the JSON request structures for the `/projections`,
//! `/portfolio` and `/tax/estimate` endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{
    PortfolioEntry, validate_investors, validate_property, validate_request, validate_settings,
};
use crate::error::{EngineError, EngineResult};
use crate::models::{InvestorAllocation, ProjectionSettings, PropertyInput};

fn default_medicare_levy() -> bool {
    true
}

/// Request body for the `/projections` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionRequest {
    /// The property to project.
    pub property: PropertyInput,
    /// The property's investors.
    #[serde(default)]
    pub investors: Vec<InvestorAllocation>,
    /// Horizon, start year and repayment frequency.
    #[serde(default)]
    pub settings: ProjectionSettings,
}

impl ProjectionRequest {
    /// Checks ranges before the projection runs.
    pub fn validate(&self) -> EngineResult<()> {
        validate_request(&self.property, &self.investors, &self.settings)
    }
}

/// Request body for the `/portfolio` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioRequest {
    /// The properties in the portfolio.
    pub properties: Vec<PortfolioEntry>,
    /// Settings shared by every property.
    #[serde(default)]
    pub settings: ProjectionSettings,
}

impl PortfolioRequest {
    /// Checks ranges for every property before the projections run.
    pub fn validate(&self) -> EngineResult<()> {
        validate_settings(&self.settings)?;
        if self.properties.is_empty() {
            return Err(EngineError::InvalidInput {
                field: "properties".to_string(),
                message: "at least one property is required".to_string(),
            });
        }
        for (i, entry) in self.properties.iter().enumerate() {
            validate_property(&entry.property, &format!("properties[{i}].property"))?;
            validate_investors(&entry.investors, &format!("properties[{i}].investors"))?;
        }
        Ok(())
    }
}

/// Request body for the `/tax/estimate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxEstimateRequest {
    /// Taxable income.
    pub income: Decimal,
    /// Whether the Medicare levy applies.
    #[serde(default = "default_medicare_levy")]
    pub has_medicare_levy: bool,
}
