//! Input checks that run before and alongside a projection.
//!
//! Two kinds of check live here. [`collect_warnings`] reports invariant
//! violations that the projection tolerates; they end up in the result's
//! audit trace. The `validate_*` functions are the request pre-check used by
//! the HTTP layer and reject values the projection cannot make sense of.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditWarning, InvestorAllocation, LoanTerms, MAX_PROJECTION_YEARS, PropertyInput,
    ProjectionSettings,
};

use super::construction::PROGRESS_PAYMENT_TOLERANCE;
use super::rounding::non_negative;

/// Allowed deviation of the ownership total from 100%.
pub const OWNERSHIP_TOLERANCE: Decimal = dec!(0.1);

/// Longest loan term accepted by the request pre-check.
pub const MAX_LOAN_TERM_YEARS: u32 = 50;

/// Largest money amount accepted by the request pre-check.
///
/// Keeps 40 years of 100% growth inside the decimal range.
pub const MAX_MONEY_AMOUNT: Decimal = dec!(1000000000000);

/// Collects the warnings for a property and its investors.
///
/// Covers the value-decomposition reconciliation, the progress-payment total
/// of a construction project, the ownership total and a missing investor
/// list. None of these stop the projection.
pub fn collect_warnings(
    property: &PropertyInput,
    investors: &[InvestorAllocation],
) -> Vec<AuditWarning> {
    let mut warnings = property.reconcile().into_warnings();

    if property.is_construction_project {
        let payments = &property.construction.progress_payments;
        let total: Decimal = payments.iter().map(|p| non_negative(p.percentage)).sum();
        if payments.is_empty() {
            warnings.push(AuditWarning::new(
                "PROGRESS_PAYMENTS_NOT_100",
                "No progress payments supplied; the full construction value is drawn at completion",
                "medium",
            ));
        } else if total.is_zero() {
            warnings.push(AuditWarning::new(
                "PROGRESS_PAYMENTS_NOT_100",
                "Progress payments total 0%; the full construction value is drawn at completion",
                "medium",
            ));
        } else if (total - Decimal::ONE_HUNDRED).abs() > PROGRESS_PAYMENT_TOLERANCE {
            warnings.push(AuditWarning::new(
                "PROGRESS_PAYMENTS_NOT_100",
                format!(
                    "Progress payments total {}%; draws were rescaled proportionally to 100%",
                    total.normalize()
                ),
                "medium",
            ));
        }
    }

    if investors.is_empty() {
        warnings.push(AuditWarning::new(
            "NO_INVESTORS",
            "No investors supplied; tax benefit is zero for every year",
            "high",
        ));
    } else {
        let total: Decimal = investors.iter().map(|i| i.ownership_percentage).sum();
        if (total - Decimal::ONE_HUNDRED).abs() > OWNERSHIP_TOLERANCE {
            warnings.push(AuditWarning::new(
                "OWNERSHIP_NOT_100",
                format!(
                    "Ownership percentages total {}%; shares are allocated as stated",
                    total.normalize()
                ),
                "medium",
            ));
        }
    }

    warnings
}

/// Clamps a requested horizon into `1..=MAX_PROJECTION_YEARS`.
///
/// Returns the horizon to use and a warning when it differs from the request.
pub fn clamp_horizon(requested: u32) -> (u32, Option<AuditWarning>) {
    let years = requested.clamp(1, MAX_PROJECTION_YEARS);
    if years == requested {
        return (years, None);
    }
    let warning = AuditWarning::new(
        "HORIZON_CLAMPED",
        format!(
            "Requested {} years; projecting {} years (allowed range 1 to {})",
            requested, years, MAX_PROJECTION_YEARS
        ),
        "low",
    );
    (years, Some(warning))
}

/// Validates projection settings.
pub fn validate_settings(settings: &ProjectionSettings) -> EngineResult<()> {
    if settings.years == 0 || settings.years > MAX_PROJECTION_YEARS {
        return Err(invalid(
            "settings.years",
            format!(
                "must be between 1 and {}, got {}",
                MAX_PROJECTION_YEARS, settings.years
            ),
        ));
    }
    Ok(())
}

/// Validates a property's rates and amounts.
///
/// `prefix` names the property in error messages (e.g. `"property"`).
pub fn validate_property(property: &PropertyInput, prefix: &str) -> EngineResult<()> {
    check_money(prefix, "purchase_price", property.purchase_price)?;
    check_money(prefix, "land_value", property.land_value)?;
    check_money(prefix, "construction_value", property.construction_value)?;
    check_money(prefix, "building_value", property.building_value)?;
    check_money(prefix, "plant_equipment_value", property.plant_equipment_value)?;
    check_money(prefix, "weekly_rent", property.weekly_rent)?;

    check_rate(prefix, "rental_growth_rate", property.rental_growth_rate)?;
    check_rate(prefix, "vacancy_rate", property.vacancy_rate)?;
    check_rate(prefix, "capital_growth_rate", property.capital_growth_rate)?;

    validate_loan(&property.main_loan, &format!("{prefix}.main_loan"))?;
    if let Some(equity_loan) = &property.equity_loan {
        validate_loan(equity_loan, &format!("{prefix}.equity_loan"))?;
    }

    let expenses = &property.expenses;
    let expense_prefix = format!("{prefix}.expenses");
    check_rate(&expense_prefix, "property_management_rate", expenses.property_management_rate)?;
    check_rate(&expense_prefix, "growth_rate", expenses.growth_rate)?;
    check_money(&expense_prefix, "council_rates", expenses.council_rates)?;
    check_money(&expense_prefix, "insurance", expenses.insurance)?;
    check_money(&expense_prefix, "repairs", expenses.repairs)?;

    if property.is_construction_project {
        let construction_prefix = format!("{prefix}.construction");
        check_rate(&construction_prefix, "interest_rate", property.construction.interest_rate)?;
        for (i, payment) in property.construction.progress_payments.iter().enumerate() {
            check_rate(
                &format!("{construction_prefix}.progress_payments[{i}]"),
                "percentage",
                payment.percentage,
            )?;
        }
    }

    Ok(())
}

/// Validates investor allocations.
pub fn validate_investors(investors: &[InvestorAllocation], prefix: &str) -> EngineResult<()> {
    for (i, investor) in investors.iter().enumerate() {
        let investor_prefix = format!("{prefix}[{i}]");
        check_rate(&investor_prefix, "ownership_percentage", investor.ownership_percentage)?;
        check_money(&investor_prefix, "annual_income", investor.annual_income)?;
        check_money(&investor_prefix, "other_income", investor.other_income)?;
    }
    Ok(())
}

/// Validates a single-property request.
pub fn validate_request(
    property: &PropertyInput,
    investors: &[InvestorAllocation],
    settings: &ProjectionSettings,
) -> EngineResult<()> {
    validate_settings(settings)?;
    validate_property(property, "property")?;
    validate_investors(investors, "investors")
}

fn validate_loan(loan: &LoanTerms, prefix: &str) -> EngineResult<()> {
    check_money(prefix, "amount", loan.amount)?;
    check_rate(prefix, "interest_rate", loan.interest_rate)?;
    if loan.term_years == 0 && !loan.amount.is_zero() {
        return Err(invalid(
            &format!("{prefix}.term_years"),
            "must be at least 1 for a non-zero loan",
        ));
    }
    if loan.term_years > MAX_LOAN_TERM_YEARS {
        return Err(invalid(
            &format!("{prefix}.term_years"),
            format!(
                "must be at most {}, got {}",
                MAX_LOAN_TERM_YEARS, loan.term_years
            ),
        ));
    }
    Ok(())
}

fn check_rate(prefix: &str, field: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(invalid(
            &format!("{prefix}.{field}"),
            format!("must be between 0 and 100, got {}", value),
        ));
    }
    Ok(())
}

fn check_money(prefix: &str, field: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO {
        return Err(invalid(
            &format!("{prefix}.{field}"),
            format!("must not be negative, got {}", value),
        ));
    }
    if value > MAX_MONEY_AMOUNT {
        return Err(invalid(
            &format!("{prefix}.{field}"),
            format!("must be at most {}, got {}", MAX_MONEY_AMOUNT, value),
        ));
    }
    Ok(())
}

fn invalid(field: &str, message: impl Into<String>) -> EngineError {
    EngineError::InvalidInput {
        field: field.to_string(),
        message: message.into(),
    }
}
