//! Construction-phase holding costs.
//!
//! This module turns a progress-payment schedule into dollar draws, accrues
//! interest on the land and on each draw until completion, and decides
//! whether that interest is capitalised into the loan or paid from cash.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{ConstructionCosts, ConstructionTerms, Drawdown, HoldingCostFunding};

use super::rounding::{non_negative, percent, round_money};

/// Allowed deviation of the progress-payment total from 100%.
pub const PROGRESS_PAYMENT_TOLERANCE: Decimal = dec!(0.1);

/// A draw after clamping and normalisation.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalisedDraw {
    /// Month of the draw, clamped to the construction period.
    pub month: u32,
    /// Percentage of construction value drawn.
    pub percentage: Decimal,
    /// Stage description.
    pub description: String,
}

/// A progress-payment schedule ready for interest accrual.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalisedSchedule {
    /// The draws, in schedule order.
    pub draws: Vec<NormalisedDraw>,
    /// Sum of the percentages as supplied.
    pub stated_total: Decimal,
    /// Whether the percentages were rescaled or replaced.
    pub normalised: bool,
}

/// Normalises a progress-payment schedule so its percentages total 100.
///
/// Months beyond the construction period are clamped to the final month.
/// A schedule already within ±0.1 of 100 is kept as stated; any other
/// positive total is rescaled proportionally. An empty or zero-total schedule
/// becomes a single 100% draw at completion.
pub fn normalise_progress_payments(terms: &ConstructionTerms) -> NormalisedSchedule {
    let period = terms.period_months;
    let stated_total: Decimal = terms
        .progress_payments
        .iter()
        .map(|p| non_negative(p.percentage))
        .sum();

    if stated_total <= Decimal::ZERO {
        return NormalisedSchedule {
            draws: vec![NormalisedDraw {
                month: period,
                percentage: Decimal::ONE_HUNDRED,
                description: "Completion".to_string(),
            }],
            stated_total,
            normalised: true,
        };
    }

    let rescale = (stated_total - Decimal::ONE_HUNDRED).abs() > PROGRESS_PAYMENT_TOLERANCE;
    let draws = terms
        .progress_payments
        .iter()
        .map(|p| {
            let percentage = non_negative(p.percentage);
            NormalisedDraw {
                month: p.month.min(period),
                percentage: if rescale {
                    percentage * Decimal::ONE_HUNDRED / stated_total
                } else {
                    percentage
                },
                description: p.description.clone(),
            }
        })
        .collect();

    NormalisedSchedule {
        draws,
        stated_total,
        normalised: rescale,
    }
}

/// Calculates interest during construction.
///
/// Interest accrues monthly at `interest_rate / 12` on the land from month 0
/// and on each draw from the month after it is made, up to completion. The
/// accrual is simple interest on drawn funds. With capitalised funding the
/// total is added to the main loan; with cash funding it is paid by the
/// investors in year 1.
///
/// # Examples
///
/// ```
/// use property_projection::calculation::calculate_construction_costs;
/// use property_projection::models::{ConstructionTerms, ProgressPayment};
/// use rust_decimal::Decimal;
///
/// let terms = ConstructionTerms {
///     period_months: 12,
///     interest_rate: Decimal::from(6),
///     progress_payments: vec![ProgressPayment {
///         percentage: Decimal::from(100),
///         month: 12,
///         description: "Handover".to_string(),
///     }],
///     ..Default::default()
/// };
/// let costs = calculate_construction_costs(Decimal::from(300_000), Decimal::from(400_000), &terms);
/// assert_eq!(costs.land_holding_interest, Decimal::from(18_000));
/// assert_eq!(costs.construction_holding_interest, Decimal::ZERO);
/// ```
pub fn calculate_construction_costs(
    land_value: Decimal,
    construction_value: Decimal,
    terms: &ConstructionTerms,
) -> ConstructionCosts {
    let period = terms.period_months;
    let monthly_rate = percent(non_negative(terms.interest_rate)) / Decimal::from(12);
    let construction_value = non_negative(construction_value);

    let land_holding_interest =
        round_money(non_negative(land_value) * monthly_rate * Decimal::from(period));

    let schedule = normalise_progress_payments(terms);
    let draws: Vec<Drawdown> = schedule
        .draws
        .into_iter()
        .map(|draw| {
            let amount = construction_value * percent(draw.percentage);
            let months_accruing = period - draw.month;
            Drawdown {
                month: draw.month,
                percentage: draw.percentage,
                description: draw.description,
                amount: round_money(amount),
                interest_accrued: round_money(
                    amount * monthly_rate * Decimal::from(months_accruing),
                ),
            }
        })
        .collect();

    let construction_holding_interest: Decimal = draws.iter().map(|d| d.interest_accrued).sum();
    let total_holding_interest = land_holding_interest + construction_holding_interest;

    let (capitalised_interest, cash_funded_interest) = match terms.holding_cost_funding {
        HoldingCostFunding::Capitalised => (total_holding_interest, Decimal::ZERO),
        HoldingCostFunding::CashFunded => (Decimal::ZERO, total_holding_interest),
    };

    ConstructionCosts {
        period_months: period,
        land_holding_interest,
        construction_holding_interest,
        total_holding_interest,
        funding: terms.holding_cost_funding,
        capitalised_interest,
        cash_funded_interest,
        stated_percentage_total: schedule.stated_total,
        normalised: schedule.normalised,
        draws,
    }
}

/// Splits a construction value into building and plant & equipment values.
///
/// Supplied values are returned unchanged. When neither is supplied, the
/// default plant & equipment share of the construction value is used and the
/// remainder is building.
///
/// # Examples
///
/// ```
/// use property_projection::calculation::split_construction_value;
/// use rust_decimal::Decimal;
/// use rust_decimal_macros::dec;
///
/// let (building, plant) =
///     split_construction_value(dec!(450000), Decimal::ZERO, Decimal::ZERO, dec!(0.10));
/// assert_eq!(building, dec!(405000));
/// assert_eq!(plant, dec!(45000));
/// ```
pub fn split_construction_value(
    construction_value: Decimal,
    building_value: Decimal,
    plant_equipment_value: Decimal,
    default_plant_share: Decimal,
) -> (Decimal, Decimal) {
    if !building_value.is_zero() || !plant_equipment_value.is_zero() {
        return (building_value, plant_equipment_value);
    }
    let construction_value = non_negative(construction_value);
    let plant = construction_value * default_plant_share;
    (construction_value - plant, plant)
}
