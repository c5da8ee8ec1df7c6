//! Year-by-year projection of an investment property.
//!
//! This module ties the calculators together. One call to [`project`] walks
//! the property from year 1 to the horizon, carrying loan balances and
//! cumulative cash flow from year to year, and returns a complete
//! [`ProjectionResult`] with its audit trace.
//!
//! The projection never fails. Inputs that break an invariant are used as
//! given and reported as warnings.

use std::time::Instant;

use chrono::Utc;
use rust_decimal::{Decimal, MathematicalOps};
use tracing::debug;
use uuid::Uuid;

use crate::config::RuleSet;
use crate::models::{
    AuditStep, AuditTrace, ConstructionCosts, InvestorAllocation, InvestorTaxOutcome,
    ProjectionResult, ProjectionSettings, ProjectionSummary, PropertyInput, YearProjection,
    YearTaxAllocation,
};

use super::allocation::allocate_tax_result;
use super::construction::{calculate_construction_costs, split_construction_value};
use super::depreciation::{DepreciationInput, calculate_depreciation};
use super::loan::project_loan_year;
use super::rounding::{non_negative, percent, round_money};
use super::validation::{clamp_horizon, collect_warnings};

/// Projects a property over the horizon in `settings`.
///
/// Each year:
///
/// 1. rent grows by the rental growth rate and is reduced by vacancy;
/// 2. property value grows by the capital growth rate;
/// 3. the main and equity loans are rolled forward from their current balances;
/// 4. operating expenses are property management on rent plus the fixed
///    amounts, grown by the expense growth rate;
/// 5. depreciation is claimed for the assessment year;
/// 6. the taxable result is rent less interest, expenses and depreciation;
/// 7. the result is allocated across investors for the tax benefit;
/// 8. after-tax cash flow is rent less expenses and interest plus the tax benefit,
///    less any construction interest paid from cash in year 1.
///
/// Money fields are rounded to cents and the cumulative cash flow is the
/// running sum of the rounded after-tax cash flows.
///
/// # Arguments
///
/// * `property` - The property under analysis
/// * `investors` - Ownership and income of each investor
/// * `settings` - Horizon, start year and repayment frequency
/// * `rules` - Tax and depreciation rule set
pub fn project(
    property: &PropertyInput,
    investors: &[InvestorAllocation],
    settings: &ProjectionSettings,
    rules: &RuleSet,
) -> ProjectionResult {
    let start_time = Instant::now();

    let mut warnings = collect_warnings(property, investors);
    let (horizon, clamp_warning) = clamp_horizon(settings.years);
    warnings.extend(clamp_warning);
    let settings = ProjectionSettings {
        years: horizon,
        ..*settings
    };

    let mut steps = Vec::new();
    let mut step_number: u32 = 1;

    let construction = property.is_construction_project.then(|| {
        calculate_construction_costs(
            property.land_value,
            property.construction_value,
            &property.construction,
        )
    });
    if let Some(costs) = &construction {
        debug!(
            property_id = %property.id,
            total_holding_interest = %costs.total_holding_interest,
            funding = ?costs.funding,
            "Construction holding costs calculated"
        );
        steps.push(construction_step(step_number, costs));
        step_number += 1;
    }

    let (building_value, plant_equipment_value) = if property.is_construction_project {
        split_construction_value(
            property.construction_value,
            property.building_value,
            property.plant_equipment_value,
            rules.depreciation().plant_equipment.default_share,
        )
    } else {
        (property.building_value, property.plant_equipment_value)
    };
    steps.push(depreciation_step(
        step_number,
        property,
        building_value,
        plant_equipment_value,
    ));
    step_number += 1;

    let capitalised_interest = construction
        .as_ref()
        .map_or(Decimal::ZERO, |c| c.capitalised_interest);
    let cash_funded_interest = construction
        .as_ref()
        .map_or(Decimal::ZERO, |c| c.cash_funded_interest);

    let mut main_balance = non_negative(property.main_loan.amount) + capitalised_interest;
    let mut equity_balance = property
        .equity_loan
        .as_ref()
        .map_or(Decimal::ZERO, |l| non_negative(l.amount));
    steps.push(loan_step(step_number, property, main_balance, &settings));
    step_number += 1;

    steps.push(ownership_step(step_number, investors));

    let initial_equity = property.purchase_price - property.total_borrowed();
    let frequency = settings.payment_frequency;
    let annual_rent = property.annual_rent();
    let rental_growth = Decimal::ONE + percent(property.rental_growth_rate);
    let capital_growth = Decimal::ONE + percent(property.capital_growth_rate);
    let expense_growth = Decimal::ONE + percent(property.expenses.growth_rate);
    let occupancy = Decimal::ONE - percent(property.vacancy_rate);
    let fixed_expenses =
        property.expenses.council_rates + property.expenses.insurance + property.expenses.repairs;

    let mut years = Vec::with_capacity(horizon as usize);
    let mut tax_allocations = Vec::with_capacity(horizon as usize);
    let mut cumulative_cash_flow = Decimal::ZERO;

    for year in 1..=horizon {
        let elapsed = i64::from(year - 1);
        let calendar_year = settings.start_year + (year as i32) - 1;

        let gross_rental_income = annual_rent * rental_growth.powi(elapsed);
        let rental_income = gross_rental_income * occupancy;
        let property_value = property.purchase_price * capital_growth.powi(elapsed);

        let main = project_loan_year(main_balance, &property.main_loan, year, frequency);
        let equity = property
            .equity_loan
            .as_ref()
            .map(|terms| project_loan_year(equity_balance, terms, year, frequency));
        let equity_interest = equity.map_or(Decimal::ZERO, |e| e.interest);
        let equity_principal = equity.map_or(Decimal::ZERO, |e| e.principal);
        main_balance = main.closing_balance;
        equity_balance = equity.map_or(Decimal::ZERO, |e| e.closing_balance);
        let total_interest = main.interest + equity_interest;

        let property_management =
            rental_income * percent(property.expenses.property_management_rate);
        let other_expenses = fixed_expenses * expense_growth.powi(elapsed);
        let operating_expenses = property_management + other_expenses;

        let depreciation = calculate_depreciation(
            &DepreciationInput {
                building_value,
                plant_equipment_value,
                construction_year: property.depreciation.construction_year,
                method: property.depreciation.method,
                is_new_property: property.depreciation.is_new_property,
                assessment_year: calendar_year,
                year_of_ownership: year,
            },
            rules.depreciation(),
        );

        let taxable_income =
            rental_income - total_interest - operating_expenses - depreciation.total;
        let allocation = allocate_tax_result(taxable_income, investors, rules.tax());

        let holding_costs_paid = if year == 1 {
            cash_funded_interest
        } else {
            Decimal::ZERO
        };
        let after_tax_cash_flow = round_money(
            rental_income - operating_expenses - total_interest + allocation.total_tax_benefit
                - holding_costs_paid,
        );
        cumulative_cash_flow += after_tax_cash_flow;

        let property_value = round_money(property_value);
        let main_loan_balance = round_money(main_balance);
        let equity_loan_balance = round_money(equity_balance);
        let property_equity = property_value - main_loan_balance - equity_loan_balance;

        years.push(YearProjection {
            year,
            calendar_year,
            gross_rental_income: round_money(gross_rental_income),
            rental_income: round_money(rental_income),
            property_value,
            main_loan_balance,
            equity_loan_balance,
            main_loan_interest: round_money(main.interest),
            equity_loan_interest: round_money(equity_interest),
            total_interest: round_money(total_interest),
            principal_repaid: round_money(main.principal + equity_principal),
            property_management: round_money(property_management),
            other_expenses: round_money(other_expenses),
            operating_expenses: round_money(operating_expenses),
            capital_works_depreciation: round_money(depreciation.capital_works),
            plant_equipment_depreciation: round_money(depreciation.plant_equipment),
            total_depreciation: round_money(depreciation.total),
            taxable_income: round_money(taxable_income),
            tax_benefit: round_money(allocation.total_tax_benefit),
            holding_costs_paid: round_money(holding_costs_paid),
            after_tax_cash_flow,
            cumulative_cash_flow,
            property_equity,
            total_return: property_equity - initial_equity + cumulative_cash_flow,
        });

        tax_allocations.push(YearTaxAllocation {
            year,
            total_tax_benefit: round_money(allocation.total_tax_benefit),
            investors: allocation.investors.into_iter().map(round_outcome).collect(),
        });
    }

    let summary = summarise(&years, initial_equity);
    let duration_us = start_time.elapsed().as_micros() as u64;

    debug!(
        property_id = %property.id,
        years = horizon,
        warnings = warnings.len(),
        final_total_return = %summary.final_total_return,
        duration_us,
        "Projection completed"
    );

    ProjectionResult {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        property_id: property.id.clone(),
        rule_set: rules.metadata().code.clone(),
        settings,
        construction,
        years,
        tax_allocations,
        summary,
        audit_trace: AuditTrace {
            steps,
            warnings,
            duration_us,
        },
    }
}

fn summarise(years: &[YearProjection], initial_equity: Decimal) -> ProjectionSummary {
    let last = years.last();
    ProjectionSummary {
        years: years.len() as u32,
        initial_equity,
        total_rental_income: years.iter().map(|y| y.rental_income).sum(),
        total_tax_benefit: years.iter().map(|y| y.tax_benefit).sum(),
        final_property_value: last.map_or(Decimal::ZERO, |y| y.property_value),
        final_equity: last.map_or(Decimal::ZERO, |y| y.property_equity),
        final_cumulative_cash_flow: last.map_or(Decimal::ZERO, |y| y.cumulative_cash_flow),
        final_total_return: last.map_or(Decimal::ZERO, |y| y.total_return),
    }
}

fn round_outcome(outcome: InvestorTaxOutcome) -> InvestorTaxOutcome {
    InvestorTaxOutcome {
        share_of_result: round_money(outcome.share_of_result),
        tax_without_property: round_money(outcome.tax_without_property),
        tax_with_property: round_money(outcome.tax_with_property),
        tax_benefit: round_money(outcome.tax_benefit),
        ..outcome
    }
}

fn construction_step(step_number: u32, costs: &ConstructionCosts) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: "construction_holding_costs".to_string(),
        rule_name: "Interest During Construction".to_string(),
        legislation_ref: "ITAA 1997 s 8-1".to_string(),
        input: serde_json::json!({
            "period_months": costs.period_months,
            "draws": costs.draws.len(),
            "stated_percentage_total": costs.stated_percentage_total.normalize().to_string(),
        }),
        output: serde_json::json!({
            "land_holding_interest": costs.land_holding_interest.to_string(),
            "construction_holding_interest": costs.construction_holding_interest.to_string(),
            "total_holding_interest": costs.total_holding_interest.to_string(),
            "capitalised_interest": costs.capitalised_interest.to_string(),
            "cash_funded_interest": costs.cash_funded_interest.to_string(),
        }),
        reasoning: format!(
            "${} land + ${} construction interest over {} months, {}",
            costs.land_holding_interest,
            costs.construction_holding_interest,
            costs.period_months,
            if costs.capitalised_interest.is_zero() {
                "paid from cash in year 1"
            } else {
                "added to the main loan"
            }
        ),
    }
}

fn depreciation_step(
    step_number: u32,
    property: &PropertyInput,
    building_value: Decimal,
    plant_equipment_value: Decimal,
) -> AuditStep {
    let settings = &property.depreciation;
    let derived = property.is_construction_project
        && property.building_value.is_zero()
        && property.plant_equipment_value.is_zero();
    AuditStep {
        step_number,
        rule_id: "depreciation_basis".to_string(),
        rule_name: "Depreciation Basis".to_string(),
        legislation_ref: "ITAA 1997 Div 43, Div 40".to_string(),
        input: serde_json::json!({
            "construction_year": settings.construction_year,
            "is_new_property": settings.is_new_property,
            "method": settings.method,
        }),
        output: serde_json::json!({
            "building_value": building_value.normalize().to_string(),
            "plant_equipment_value": plant_equipment_value.normalize().to_string(),
            "split_derived": derived,
        }),
        reasoning: if derived {
            format!(
                "Construction value ${} split into building ${} and plant & equipment ${}",
                property.construction_value.normalize(),
                building_value.normalize(),
                plant_equipment_value.normalize()
            )
        } else {
            format!(
                "Building ${} and plant & equipment ${} as supplied",
                building_value.normalize(),
                plant_equipment_value.normalize()
            )
        },
    }
}

fn loan_step(
    step_number: u32,
    property: &PropertyInput,
    opening_main_balance: Decimal,
    settings: &ProjectionSettings,
) -> AuditStep {
    let main = &property.main_loan;
    AuditStep {
        step_number,
        rule_id: "loan_structure".to_string(),
        rule_name: "Loan Structure".to_string(),
        legislation_ref: "ITAA 1997 s 8-1".to_string(),
        input: serde_json::json!({
            "main_loan": main,
            "equity_loan": property.equity_loan,
            "payment_frequency": settings.payment_frequency,
        }),
        output: serde_json::json!({
            "opening_main_balance": opening_main_balance.normalize().to_string(),
            "main_interest_only_years": main.interest_only_years(),
            "equity_interest_only_years": property.equity_loan.as_ref().map(|l| l.interest_only_years()),
        }),
        reasoning: format!(
            "Main loan ${} at {}% over {} years, interest only for {} years",
            opening_main_balance.normalize(),
            main.interest_rate.normalize(),
            main.term_years,
            main.interest_only_years()
        ),
    }
}

fn ownership_step(step_number: u32, investors: &[InvestorAllocation]) -> AuditStep {
    let total: Decimal = investors.iter().map(|i| i.ownership_percentage).sum();
    AuditStep {
        step_number,
        rule_id: "ownership_allocation".to_string(),
        rule_name: "Ownership Allocation".to_string(),
        legislation_ref: "ITAA 1936 s 92".to_string(),
        input: serde_json::json!({
            "investors": investors
                .iter()
                .map(|i| serde_json::json!({
                    "investor_id": i.investor_id,
                    "ownership_percentage": i.ownership_percentage.normalize().to_string(),
                }))
                .collect::<Vec<_>>(),
        }),
        output: serde_json::json!({
            "ownership_total": total.normalize().to_string(),
        }),
        reasoning: format!(
            "{} investor(s) share the property result in proportion to {}% total ownership",
            investors.len(),
            total.normalize()
        ),
    }
}
