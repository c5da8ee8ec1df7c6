//! Projection result models for the Property Projection Engine.
//!
//! This module contains the [`ProjectionResult`] type and its associated
//! structures that capture all outputs from a projection run: the year-by-year
//! records, per-investor tax allocations, construction holding costs, a
//! summary, and an audit trace.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{HoldingCostFunding, PaymentFrequency};

/// The longest horizon the engine will project.
pub const MAX_PROJECTION_YEARS: u32 = 40;

/// The horizon used when the caller does not supply one.
pub const DEFAULT_PROJECTION_YEARS: u32 = 30;

fn default_years() -> u32 {
    DEFAULT_PROJECTION_YEARS
}

fn default_start_year() -> i32 {
    2025
}

/// Settings controlling a projection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionSettings {
    /// Number of years to project (1 to 40).
    #[serde(default = "default_years")]
    pub years: u32,
    /// Calendar year corresponding to projection year 1.
    #[serde(default = "default_start_year")]
    pub start_year: i32,
    /// Loan repayment frequency.
    #[serde(default)]
    pub payment_frequency: PaymentFrequency,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            years: default_years(),
            start_year: default_start_year(),
            payment_frequency: PaymentFrequency::default(),
        }
    }
}

/// A single step in the audit trace recording a run-level decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Legislative reference for the rule (e.g., "ITAA 1997 Div 43").
    pub legislation_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during a projection.
///
/// Warnings flag inputs that break an invariant but do not stop the
/// calculation; the engine computes with the values as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

impl AuditWarning {
    /// Creates a new warning.
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        severity: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity: severity.into(),
        }
    }
}

/// The complete audit trace for a projection.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditTrace {
    /// Run-level calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during the projection.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// One progress-payment draw in the construction timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drawdown {
    /// Month of the draw (clamped into the construction period).
    pub month: u32,
    /// Percentage drawn after normalisation.
    pub percentage: Decimal,
    /// Stage description.
    pub description: String,
    /// Dollar amount drawn.
    pub amount: Decimal,
    /// Interest accrued on this draw until completion.
    pub interest_accrued: Decimal,
}

/// Interest-during-construction outcome for a build project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructionCosts {
    /// Length of the build in months.
    pub period_months: u32,
    /// Interest on the land value over the whole build.
    pub land_holding_interest: Decimal,
    /// Interest on progress draws.
    pub construction_holding_interest: Decimal,
    /// Land plus construction holding interest.
    pub total_holding_interest: Decimal,
    /// How the interest is funded.
    pub funding: HoldingCostFunding,
    /// Interest added to the main loan's opening balance.
    pub capitalised_interest: Decimal,
    /// Interest paid from investor cash in year 1.
    pub cash_funded_interest: Decimal,
    /// Sum of the stated progress-payment percentages.
    pub stated_percentage_total: Decimal,
    /// Whether the schedule had to be rescaled to 100%.
    pub normalised: bool,
    /// The draws, in schedule order.
    pub draws: Vec<Drawdown>,
}

/// One investor's share of a year's property result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestorTaxOutcome {
    /// Identifier of the investor.
    pub investor_id: String,
    /// Ownership share in percent as stated.
    pub ownership_percentage: Decimal,
    /// The investor's share of the property's taxable result.
    pub share_of_result: Decimal,
    /// Total tax on the investor's other income alone.
    pub tax_without_property: Decimal,
    /// Total tax including the property share.
    pub tax_with_property: Decimal,
    /// `tax_without_property - tax_with_property`.
    pub tax_benefit: Decimal,
    /// Marginal rate before the property is included.
    pub marginal_rate_without: Decimal,
    /// Marginal rate after the property is included.
    pub marginal_rate_with: Decimal,
}

/// Tax allocation across investors for a single year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearTaxAllocation {
    /// The projection year (1-based).
    pub year: u32,
    /// Sum of all investors' tax benefit.
    pub total_tax_benefit: Decimal,
    /// Per-investor breakdown.
    pub investors: Vec<InvestorTaxOutcome>,
}

/// The projected position of a property for one year.
///
/// Money fields are rounded to cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearProjection {
    /// The projection year (1-based).
    pub year: u32,
    /// The calendar year this projection year corresponds to.
    pub calendar_year: i32,
    /// Rent before vacancy.
    pub gross_rental_income: Decimal,
    /// Rent after vacancy.
    pub rental_income: Decimal,
    /// Market value of the property.
    pub property_value: Decimal,
    /// Main loan balance at year end.
    pub main_loan_balance: Decimal,
    /// Equity loan balance at year end.
    pub equity_loan_balance: Decimal,
    /// Interest paid on the main loan.
    pub main_loan_interest: Decimal,
    /// Interest paid on the equity loan.
    pub equity_loan_interest: Decimal,
    /// Total interest paid.
    pub total_interest: Decimal,
    /// Principal repaid across both loans.
    pub principal_repaid: Decimal,
    /// Property management fees.
    pub property_management: Decimal,
    /// Council rates, insurance and repairs.
    pub other_expenses: Decimal,
    /// Property management plus other expenses.
    pub operating_expenses: Decimal,
    /// Division 43 deduction.
    pub capital_works_depreciation: Decimal,
    /// Division 40 deduction.
    pub plant_equipment_depreciation: Decimal,
    /// Total depreciation.
    pub total_depreciation: Decimal,
    /// Net taxable result of the property (negative when geared).
    pub taxable_income: Decimal,
    /// Aggregate tax saving across investors.
    pub tax_benefit: Decimal,
    /// Construction interest paid from cash this year.
    pub holding_costs_paid: Decimal,
    /// Rent less expenses and interest, plus tax benefit.
    pub after_tax_cash_flow: Decimal,
    /// Running sum of after-tax cash flow.
    pub cumulative_cash_flow: Decimal,
    /// Property value less all loan balances.
    pub property_equity: Decimal,
    /// Equity gain since settlement plus cumulative cash flow.
    pub total_return: Decimal,
}

impl YearProjection {
    /// Returns an all-zero record for the given year.
    pub fn empty(year: u32, calendar_year: i32) -> Self {
        Self {
            year,
            calendar_year,
            gross_rental_income: Decimal::ZERO,
            rental_income: Decimal::ZERO,
            property_value: Decimal::ZERO,
            main_loan_balance: Decimal::ZERO,
            equity_loan_balance: Decimal::ZERO,
            main_loan_interest: Decimal::ZERO,
            equity_loan_interest: Decimal::ZERO,
            total_interest: Decimal::ZERO,
            principal_repaid: Decimal::ZERO,
            property_management: Decimal::ZERO,
            other_expenses: Decimal::ZERO,
            operating_expenses: Decimal::ZERO,
            capital_works_depreciation: Decimal::ZERO,
            plant_equipment_depreciation: Decimal::ZERO,
            total_depreciation: Decimal::ZERO,
            taxable_income: Decimal::ZERO,
            tax_benefit: Decimal::ZERO,
            holding_costs_paid: Decimal::ZERO,
            after_tax_cash_flow: Decimal::ZERO,
            cumulative_cash_flow: Decimal::ZERO,
            property_equity: Decimal::ZERO,
            total_return: Decimal::ZERO,
        }
    }

    /// Adds every monetary field of `other` into `self`.
    pub fn accumulate(&mut self, other: &YearProjection) {
        self.gross_rental_income += other.gross_rental_income;
        self.rental_income += other.rental_income;
        self.property_value += other.property_value;
        self.main_loan_balance += other.main_loan_balance;
        self.equity_loan_balance += other.equity_loan_balance;
        self.main_loan_interest += other.main_loan_interest;
        self.equity_loan_interest += other.equity_loan_interest;
        self.total_interest += other.total_interest;
        self.principal_repaid += other.principal_repaid;
        self.property_management += other.property_management;
        self.other_expenses += other.other_expenses;
        self.operating_expenses += other.operating_expenses;
        self.capital_works_depreciation += other.capital_works_depreciation;
        self.plant_equipment_depreciation += other.plant_equipment_depreciation;
        self.total_depreciation += other.total_depreciation;
        self.taxable_income += other.taxable_income;
        self.tax_benefit += other.tax_benefit;
        self.holding_costs_paid += other.holding_costs_paid;
        self.after_tax_cash_flow += other.after_tax_cash_flow;
        self.cumulative_cash_flow += other.cumulative_cash_flow;
        self.property_equity += other.property_equity;
        self.total_return += other.total_return;
    }
}

/// Headline figures for a projection run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    /// Number of years projected.
    pub years: u32,
    /// Cash contributed at settlement (purchase price less borrowings).
    pub initial_equity: Decimal,
    /// Rental income over all years.
    pub total_rental_income: Decimal,
    /// Tax benefit over all years.
    pub total_tax_benefit: Decimal,
    /// Property value in the final year.
    pub final_property_value: Decimal,
    /// Equity in the final year.
    pub final_equity: Decimal,
    /// Cumulative cash flow in the final year.
    pub final_cumulative_cash_flow: Decimal,
    /// Total return in the final year.
    pub final_total_return: Decimal,
}

/// The complete result of a projection run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionResult {
    /// Unique identifier for this run.
    pub calculation_id: Uuid,
    /// When the projection was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that produced the result.
    pub engine_version: String,
    /// The property the projection is for.
    pub property_id: String,
    /// Code of the rule set used.
    pub rule_set: String,
    /// Settings the run used, after clamping.
    pub settings: ProjectionSettings,
    /// Construction holding costs, for construction projects.
    pub construction: Option<ConstructionCosts>,
    /// Year-by-year projection.
    pub years: Vec<YearProjection>,
    /// Per-year, per-investor tax breakdown.
    pub tax_allocations: Vec<YearTaxAllocation>,
    /// Headline figures.
    pub summary: ProjectionSummary,
    /// Audit trace of run-level decisions and warnings.
    pub audit_trace: AuditTrace,
}

/// Independent projections for several properties plus their per-year sums.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioResult {
    /// One result per property, in request order.
    pub properties: Vec<ProjectionResult>,
    /// Pointwise sums by year index.
    pub years: Vec<YearProjection>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_settings_defaults() {
        let settings: ProjectionSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, ProjectionSettings::default());
        assert_eq!(settings.years, 30);
        assert_eq!(settings.payment_frequency, PaymentFrequency::Monthly);
    }

    #[test]
    fn test_accumulate_sums_money_fields_and_keeps_year() {
        let mut total = YearProjection::empty(3, 2027);
        let mut a = YearProjection::empty(3, 2027);
        a.rental_income = dec("30000.50");
        a.after_tax_cash_flow = dec("-1200.25");
        let mut b = YearProjection::empty(3, 2027);
        b.rental_income = dec("25000.00");
        b.after_tax_cash_flow = dec("800.00");

        total.accumulate(&a);
        total.accumulate(&b);

        assert_eq!(total.year, 3);
        assert_eq!(total.rental_income, dec("55000.50"));
        assert_eq!(total.after_tax_cash_flow, dec("-400.25"));
    }

    #[test]
    fn test_year_projection_serializes_decimals_as_strings() {
        let mut year = YearProjection::empty(1, 2025);
        year.taxable_income = dec("-30365.95");

        let json = serde_json::to_value(&year).unwrap();
        assert_eq!(json["taxable_income"].as_str().unwrap(), "-30365.95");
        assert_eq!(json["year"].as_u64().unwrap(), 1);
    }

    #[test]
    fn test_audit_warning_new() {
        let warning = AuditWarning::new("OWNERSHIP_NOT_100", "sums to 90", "medium");
        assert_eq!(warning.code, "OWNERSHIP_NOT_100");
        assert_eq!(warning.severity, "medium");
    }

    #[test]
    fn test_holding_cost_funding_roundtrip_in_construction_costs() {
        let costs = ConstructionCosts {
            period_months: 12,
            land_holding_interest: dec("21000"),
            construction_holding_interest: dec("9000"),
            total_holding_interest: dec("30000"),
            funding: HoldingCostFunding::CashFunded,
            capitalised_interest: Decimal::ZERO,
            cash_funded_interest: dec("30000"),
            stated_percentage_total: dec("100"),
            normalised: false,
            draws: vec![],
        };

        let json = serde_json::to_string(&costs).unwrap();
        assert!(json.contains("\"funding\":\"cash_funded\""));
        let back: ConstructionCosts = serde_json::from_str(&json).unwrap();
        assert_eq!(back, costs);
    }
}
