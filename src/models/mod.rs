//! Core data models for the Property Projection Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod investor;
mod projection_result;
mod property;

pub use investor::InvestorAllocation;
pub use projection_result::{
    AuditStep, AuditTrace, AuditWarning, ConstructionCosts, DEFAULT_PROJECTION_YEARS, Drawdown,
    InvestorTaxOutcome, MAX_PROJECTION_YEARS, PortfolioResult, ProjectionResult,
    ProjectionSettings, ProjectionSummary, YearProjection, YearTaxAllocation,
};
pub use property::{
    ConstructionTerms, DepreciationMethod, DepreciationSettings, ExpenseAssumptions,
    HoldingCostFunding, LoanTerms, LoanType, PaymentFrequency, ProgressPayment, PropertyInput,
    RECONCILIATION_TOLERANCE, Reconciliation,
};
