//! Portfolio-level aggregation across independently projected properties.

use serde::{Deserialize, Serialize};

use crate::config::RuleSet;
use crate::models::{
    InvestorAllocation, PortfolioResult, ProjectionResult, ProjectionSettings, PropertyInput,
    YearProjection,
};

use super::projection::project;

/// A property and its investors within a portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    /// The property.
    pub property: PropertyInput,
    /// The property's investors.
    #[serde(default)]
    pub investors: Vec<InvestorAllocation>,
}

/// Sums projections pointwise by year index.
///
/// Every monetary field of year `n` is the sum of year `n` across the
/// results that reach it, so results with different horizons are summed
/// over the years present. The calendar year is taken from the first result
/// that has the year.
pub fn aggregate_portfolio(results: &[ProjectionResult]) -> Vec<YearProjection> {
    let horizon = results.iter().map(|r| r.years.len()).max().unwrap_or(0);

    (0..horizon)
        .map(|index| {
            let mut present = results.iter().filter_map(|r| r.years.get(index));
            let Some(first) = present.next() else {
                return YearProjection::empty(index as u32 + 1, 0);
            };
            let mut total = YearProjection::empty(first.year, first.calendar_year);
            total.accumulate(first);
            for year in present {
                total.accumulate(year);
            }
            total
        })
        .collect()
}

/// Projects each property independently and sums the results.
pub fn project_portfolio(
    entries: &[PortfolioEntry],
    settings: &ProjectionSettings,
    rules: &RuleSet,
) -> PortfolioResult {
    let properties: Vec<ProjectionResult> = entries
        .iter()
        .map(|entry| project(&entry.property, &entry.investors, settings, rules))
        .collect();
    let years = aggregate_portfolio(&properties);

    PortfolioResult { properties, years }
}
