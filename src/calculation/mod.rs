//! Calculation logic for the Property Projection Engine.
//!
//! This module contains the individual calculators (income tax and Medicare
//! levy, Division 43 and Division 40 depreciation, loan repayments,
//! construction holding costs and multi-investor tax allocation) and the
//! year-by-year projection and portfolio aggregation built on them.

mod allocation;
mod construction;
mod depreciation;
mod loan;
mod portfolio;
mod projection;
mod rounding;
mod tax;
mod validation;

pub use allocation::{AllocationResult, allocate_tax_result};
pub use construction::{
    NormalisedDraw, NormalisedSchedule, PROGRESS_PAYMENT_TOLERANCE, calculate_construction_costs,
    normalise_progress_payments, split_construction_value,
};
pub use depreciation::{
    CategoryDepreciation, DepreciationInput, DepreciationResult, calculate_depreciation,
    capital_works_eligible,
};
pub use loan::{
    AmortizationPeriod, LoanYear, RepaymentPhase, amortization_schedule, calculate_loan_payment,
    current_year_payment, interest_only_payment, period_rate, project_loan_year,
};
pub use portfolio::{PortfolioEntry, aggregate_portfolio, project_portfolio};
pub use projection::project;
pub use rounding::{non_negative, percent, round_money};
pub use tax::{income_tax, marginal_rate, medicare_levy, total_tax};
pub use validation::{
    MAX_LOAN_TERM_YEARS, MAX_MONEY_AMOUNT, OWNERSHIP_TOLERANCE, clamp_horizon, collect_warnings,
    validate_investors, validate_property, validate_request, validate_settings,
};
