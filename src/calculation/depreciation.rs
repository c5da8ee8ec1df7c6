//! Division 43 and Division 40 depreciation.
//!
//! This module calculates the annual capital works deduction on the building
//! and the plant & equipment deduction on its fixtures and fittings, split
//! across the asset categories of the rule set.

use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

use crate::config::DepreciationRules;
use crate::models::DepreciationMethod;

use super::rounding::non_negative;

/// Inputs for a single year's depreciation claim.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepreciationInput {
    /// Depreciable building value.
    pub building_value: Decimal,
    /// Depreciable plant & equipment value.
    pub plant_equipment_value: Decimal,
    /// Calendar year construction was completed.
    pub construction_year: i32,
    /// Division 40 method.
    pub method: DepreciationMethod,
    /// Whether the property and its fittings are new.
    pub is_new_property: bool,
    /// Calendar year of the claim.
    pub assessment_year: i32,
    /// Year of ownership the claim falls in (1-based).
    pub year_of_ownership: u32,
}

/// The deduction for one plant & equipment category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDepreciation {
    /// Category name.
    pub name: String,
    /// Share of plant & equipment value allocated to the category.
    pub value: Decimal,
    /// Effective life in years.
    pub effective_life_years: u32,
    /// This year's deduction.
    pub deduction: Decimal,
}

/// The result of a depreciation calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepreciationResult {
    /// Division 43 deduction.
    pub capital_works: Decimal,
    /// Division 40 deduction.
    pub plant_equipment: Decimal,
    /// Sum of both.
    pub total: Decimal,
    /// Whether the established-property restriction reduced the Division 40 claim.
    pub established_restriction_applied: bool,
    /// Division 40 breakdown by category.
    pub categories: Vec<CategoryDepreciation>,
}

/// Calculates a year's depreciation.
///
/// Capital works is `building_value × rate` for each year of the effective
/// life, provided construction finished in or after the eligibility year
/// (1987). Plant & equipment is split across the configured categories:
///
/// - prime cost claims `value / effective_life` each year of the life;
/// - diminishing value claims `written_down_value × multiplier / effective_life`,
///   so the first year is `value × (1 / effective_life) × 1.5`.
///
/// When the property is not new and has aged past its construction year, the
/// plant & equipment claim is scaled by the established-property factor
/// (0.3). This is a policy constant standing in for the 2017 rule that
/// denies most purchasers deductions on previously used assets.
///
/// # Examples
///
/// ```
/// use property_projection::calculation::{DepreciationInput, calculate_depreciation};
/// use property_projection::config::RuleSet;
/// use property_projection::models::DepreciationMethod;
/// use rust_decimal::Decimal;
///
/// let input = DepreciationInput {
///     building_value: Decimal::from(400_000),
///     plant_equipment_value: Decimal::ZERO,
///     construction_year: 2024,
///     method: DepreciationMethod::PrimeCost,
///     is_new_property: true,
///     assessment_year: 2025,
///     year_of_ownership: 1,
/// };
/// let result = calculate_depreciation(&input, RuleSet::canonical().depreciation());
/// assert_eq!(result.capital_works, Decimal::from(10_000));
/// ```
pub fn calculate_depreciation(
    input: &DepreciationInput,
    rules: &DepreciationRules,
) -> DepreciationResult {
    let capital_works = capital_works_deduction(input, rules);

    let plant = &rules.plant_equipment;
    let plant_value = non_negative(input.plant_equipment_value);
    let restricted =
        !input.is_new_property && input.assessment_year > input.construction_year;
    let factor = if restricted {
        plant.established_property_factor
    } else {
        Decimal::ONE
    };

    let mut unrestricted_total = Decimal::ZERO;
    let categories: Vec<CategoryDepreciation> = plant
        .categories
        .iter()
        .map(|category| {
            let value = plant_value * category.share;
            let deduction = category_deduction(
                value,
                category.effective_life_years,
                input.method,
                plant.diminishing_value_multiplier,
                input.year_of_ownership,
            );
            unrestricted_total += deduction;
            CategoryDepreciation {
                name: category.name.clone(),
                value,
                effective_life_years: category.effective_life_years,
                deduction: deduction * factor,
            }
        })
        .collect();

    let plant_equipment = unrestricted_total * factor;

    DepreciationResult {
        capital_works,
        plant_equipment,
        total: capital_works + plant_equipment,
        established_restriction_applied: restricted,
        categories,
    }
}

/// Whether a building completed in `construction_year` qualifies for capital works.
pub fn capital_works_eligible(construction_year: i32, rules: &DepreciationRules) -> bool {
    construction_year >= rules.capital_works.eligibility_year
}

fn capital_works_deduction(input: &DepreciationInput, rules: &DepreciationRules) -> Decimal {
    let config = &rules.capital_works;
    let within_life =
        input.year_of_ownership >= 1 && input.year_of_ownership <= config.effective_life_years;
    if capital_works_eligible(input.construction_year, rules) && within_life {
        non_negative(input.building_value) * config.rate
    } else {
        Decimal::ZERO
    }
}

fn category_deduction(
    value: Decimal,
    effective_life_years: u32,
    method: DepreciationMethod,
    dv_multiplier: Decimal,
    year_of_ownership: u32,
) -> Decimal {
    if effective_life_years == 0 || year_of_ownership == 0 || value.is_zero() {
        return Decimal::ZERO;
    }
    let life = Decimal::from(effective_life_years);

    match method {
        DepreciationMethod::PrimeCost => {
            if year_of_ownership <= effective_life_years {
                value / life
            } else {
                Decimal::ZERO
            }
        }
        DepreciationMethod::DiminishingValue => {
            let rate = (dv_multiplier / life).min(Decimal::ONE);
            let elapsed = i64::from(year_of_ownership - 1);
            let written_down = value * (Decimal::ONE - rate).powi(elapsed);
            written_down * rate
        }
    }
}
