//! Multi-investor tax allocation.
//!
//! This module distributes a property's net taxable result across its
//! investors by ownership share and measures each investor's tax saving
//! (or extra tax) against their position without the property.

use rust_decimal::Decimal;

use crate::config::TaxSchedule;
use crate::models::{InvestorAllocation, InvestorTaxOutcome};

use super::rounding::percent;

/// The allocation of one year's property result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocationResult {
    /// Sum of all investors' tax benefit.
    pub total_tax_benefit: Decimal,
    /// Sum of stated ownership percentages.
    pub ownership_total: Decimal,
    /// Per-investor outcomes, in input order.
    pub investors: Vec<InvestorTaxOutcome>,
}

/// Allocates a property's net taxable result across investors.
///
/// Each investor receives `net_result × ownership_percentage / 100`. The tax
/// benefit is the total tax (income tax plus Medicare levy) on their other
/// income alone, less the total tax once their share is added. A loss share
/// lowers taxable income, so negative gearing produces a positive benefit.
///
/// Percentages are used as stated. If they do not total 100 the investors'
/// shares will not account for the whole result.
///
/// # Examples
///
/// ```
/// use property_projection::calculation::allocate_tax_result;
/// use property_projection::config::RuleSet;
/// use property_projection::models::InvestorAllocation;
/// use rust_decimal::Decimal;
///
/// let investors = vec![InvestorAllocation {
///     investor_id: "inv_001".to_string(),
///     ownership_percentage: Decimal::from(100),
///     annual_income: Decimal::from(150_000),
///     other_income: Decimal::ZERO,
///     has_medicare_levy: true,
/// }];
/// let result = allocate_tax_result(Decimal::from(-20_000), &investors, RuleSet::canonical().tax());
/// assert!(result.total_tax_benefit > Decimal::ZERO);
/// ```
pub fn allocate_tax_result(
    net_result: Decimal,
    investors: &[InvestorAllocation],
    schedule: &TaxSchedule,
) -> AllocationResult {
    let outcomes: Vec<InvestorTaxOutcome> = investors
        .iter()
        .map(|investor| investor_outcome(net_result, investor, schedule))
        .collect();

    AllocationResult {
        total_tax_benefit: outcomes.iter().map(|o| o.tax_benefit).sum(),
        ownership_total: investors.iter().map(|i| i.ownership_percentage).sum(),
        investors: outcomes,
    }
}

fn investor_outcome(
    net_result: Decimal,
    investor: &InvestorAllocation,
    schedule: &TaxSchedule,
) -> InvestorTaxOutcome {
    let share_of_result = net_result * percent(investor.ownership_percentage);
    let income_without = investor.base_income();
    let income_with = income_without + share_of_result;

    let tax_without_property = schedule.total_tax(income_without, investor.has_medicare_levy);
    let tax_with_property = schedule.total_tax(income_with, investor.has_medicare_levy);

    InvestorTaxOutcome {
        investor_id: investor.investor_id.clone(),
        ownership_percentage: investor.ownership_percentage,
        share_of_result,
        tax_without_property,
        tax_with_property,
        tax_benefit: tax_without_property - tax_with_property,
        marginal_rate_without: schedule.marginal_rate(income_without),
        marginal_rate_with: schedule.marginal_rate(income_with),
    }
}
