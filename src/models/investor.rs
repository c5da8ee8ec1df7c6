//! Investor allocation model.
//!
//! This module defines the [`InvestorAllocation`] struct describing one
//! investor's ownership share of a property and their other income.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

fn default_medicare_levy() -> bool {
    true
}

/// An investor's stake in a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestorAllocation {
    /// Identifier of the investor record.
    pub investor_id: String,
    /// Ownership share in percent (0-100).
    pub ownership_percentage: Decimal,
    /// Salary or business income for the year.
    pub annual_income: Decimal,
    /// Any other assessable income.
    #[serde(default)]
    pub other_income: Decimal,
    /// Whether the Medicare levy applies to this investor.
    #[serde(default = "default_medicare_levy")]
    pub has_medicare_levy: bool,
}

impl InvestorAllocation {
    /// Taxable income before the property is taken into account.
    ///
    /// # Examples
    ///
    /// ```
    /// use property_projection::models::InvestorAllocation;
    /// use rust_decimal::Decimal;
    ///
    /// let investor = InvestorAllocation {
    ///     investor_id: "inv_001".to_string(),
    ///     ownership_percentage: Decimal::from(100),
    ///     annual_income: Decimal::from(120_000),
    ///     other_income: Decimal::from(5_000),
    ///     has_medicare_levy: true,
    /// };
    /// assert_eq!(investor.base_income(), Decimal::from(125_000));
    /// ```
    pub fn base_income(&self) -> Decimal {
        self.annual_income + self.other_income
    }
}
