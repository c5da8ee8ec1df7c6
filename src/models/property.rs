//! Property input model and related types.
//!
//! This module defines [`PropertyInput`], the immutable record describing a
//! property for one analysis run, together with its loan, construction,
//! expense and depreciation sub-records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AuditWarning;

/// Tolerance, in dollars, for the value-decomposition invariants.
pub const RECONCILIATION_TOLERANCE: Decimal = Decimal::ONE;

/// The repayment structure of a loan facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanType {
    /// Interest only for `io_term_years`, then principal and interest.
    InterestOnly,
    /// Principal and interest from the first year.
    PrincipalAndInterest,
}

/// How often loan repayments are made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    /// 52 repayments per year.
    Weekly,
    /// 12 repayments per year.
    #[default]
    Monthly,
}

impl PaymentFrequency {
    /// Returns the number of repayment periods in a year.
    pub fn periods_per_year(self) -> u32 {
        match self {
            PaymentFrequency::Weekly => 52,
            PaymentFrequency::Monthly => 12,
        }
    }
}

/// Terms of a single loan facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// The amount borrowed.
    pub amount: Decimal,
    /// Annual interest rate in percent (e.g., 6.8).
    pub interest_rate: Decimal,
    /// Full loan term in years.
    pub term_years: u32,
    /// Years of interest-only repayments for an interest-only loan.
    #[serde(default)]
    pub io_term_years: u32,
    /// The repayment structure.
    pub loan_type: LoanType,
}

impl LoanTerms {
    /// Returns the number of leading interest-only years.
    ///
    /// An interest-only loan with no stated IO term, or one at least as long
    /// as the loan term, is interest only for the whole term.
    /// Principal-and-interest loans ignore `io_term_years`.
    ///
    /// # Examples
    ///
    /// ```
    /// use property_projection::models::{LoanTerms, LoanType};
    /// use rust_decimal::Decimal;
    ///
    /// let loan = LoanTerms {
    ///     amount: Decimal::from(600_000),
    ///     interest_rate: Decimal::new(68, 1),
    ///     term_years: 30,
    ///     io_term_years: 5,
    ///     loan_type: LoanType::InterestOnly,
    /// };
    /// assert_eq!(loan.interest_only_years(), 5);
    /// ```
    pub fn interest_only_years(&self) -> u32 {
        match self.loan_type {
            LoanType::PrincipalAndInterest => 0,
            LoanType::InterestOnly => {
                if self.io_term_years == 0 || self.io_term_years >= self.term_years {
                    self.term_years
                } else {
                    self.io_term_years
                }
            }
        }
    }
}

/// A single staged construction payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressPayment {
    /// Percentage of construction value drawn at this stage.
    pub percentage: Decimal,
    /// Month of the construction period the draw happens in.
    pub month: u32,
    /// Stage description (e.g., "Slab").
    #[serde(default)]
    pub description: String,
}

/// How interest during construction is funded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldingCostFunding {
    /// Interest is added to the loan balance.
    #[default]
    Capitalised,
    /// Interest is paid from investor cash.
    CashFunded,
}

/// Construction-phase terms for a build project.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConstructionTerms {
    /// Length of the build in months.
    #[serde(default)]
    pub period_months: u32,
    /// Annual interest rate in percent charged on drawn funds.
    #[serde(default)]
    pub interest_rate: Decimal,
    /// Ordered progress payment schedule.
    #[serde(default)]
    pub progress_payments: Vec<ProgressPayment>,
    /// How construction-period interest is funded.
    #[serde(default)]
    pub holding_cost_funding: HoldingCostFunding,
}

/// Annual operating expense assumptions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExpenseAssumptions {
    /// Property management fee as a percent of rental income.
    #[serde(default)]
    pub property_management_rate: Decimal,
    /// Annual council rates.
    #[serde(default)]
    pub council_rates: Decimal,
    /// Annual insurance premium.
    #[serde(default)]
    pub insurance: Decimal,
    /// Annual repairs and maintenance.
    #[serde(default)]
    pub repairs: Decimal,
    /// Annual growth in percent applied to the fixed amounts (0 = flat).
    #[serde(default)]
    pub growth_rate: Decimal,
}

/// Division 40 depreciation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepreciationMethod {
    /// Straight line over each asset's effective life.
    #[default]
    PrimeCost,
    /// Accelerated, applied to the written-down value.
    DiminishingValue,
}

/// Depreciation settings for a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepreciationSettings {
    /// Division 40 method.
    #[serde(default)]
    pub method: DepreciationMethod,
    /// Whether the property (and its fittings) is new.
    pub is_new_property: bool,
    /// Calendar year construction was completed.
    pub construction_year: i32,
}

/// Outcome of checking a property's value decomposition.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconciliation {
    /// All value invariants hold within tolerance.
    Reconciled,
    /// One or more invariants are violated; computation proceeds with the
    /// values as given.
    Unreconciled(Vec<AuditWarning>),
}

impl Reconciliation {
    /// Returns the warnings, empty when reconciled.
    pub fn into_warnings(self) -> Vec<AuditWarning> {
        match self {
            Reconciliation::Reconciled => Vec::new(),
            Reconciliation::Unreconciled(warnings) => warnings,
        }
    }
}

/// A property under analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyInput {
    /// Identifier of the property record.
    pub id: String,
    /// Whether this is a house-and-land build rather than a purchase.
    #[serde(default)]
    pub is_construction_project: bool,
    /// Total acquisition cost.
    pub purchase_price: Decimal,
    /// Land component of a construction project.
    #[serde(default)]
    pub land_value: Decimal,
    /// Build contract value of a construction project.
    #[serde(default)]
    pub construction_value: Decimal,
    /// Depreciable building (capital works) value.
    #[serde(default)]
    pub building_value: Decimal,
    /// Depreciable plant & equipment value.
    #[serde(default)]
    pub plant_equipment_value: Decimal,
    /// Weekly rent at the start of the projection.
    pub weekly_rent: Decimal,
    /// Annual rental growth in percent.
    #[serde(default)]
    pub rental_growth_rate: Decimal,
    /// Vacancy allowance in percent of gross rent.
    #[serde(default)]
    pub vacancy_rate: Decimal,
    /// Annual capital growth in percent.
    #[serde(default)]
    pub capital_growth_rate: Decimal,
    /// Construction-phase terms (ignored unless a construction project).
    #[serde(default)]
    pub construction: ConstructionTerms,
    /// The main loan facility.
    pub main_loan: LoanTerms,
    /// An optional second facility secured against other equity.
    #[serde(default)]
    pub equity_loan: Option<LoanTerms>,
    /// Operating expense assumptions.
    #[serde(default)]
    pub expenses: ExpenseAssumptions,
    /// Depreciation settings.
    pub depreciation: DepreciationSettings,
}

impl PropertyInput {
    /// Annual rent before vacancy.
    pub fn annual_rent(&self) -> Decimal {
        self.weekly_rent * Decimal::from(52)
    }

    /// Sum of all loan amounts at settlement.
    pub fn total_borrowed(&self) -> Decimal {
        self.main_loan.amount + self.equity_loan.as_ref().map_or(Decimal::ZERO, |l| l.amount)
    }

    /// Checks the value-decomposition invariants of a construction project.
    ///
    /// `land_value + construction_value` should equal `purchase_price` and
    /// `building_value + plant_equipment_value` should equal
    /// `construction_value`, each within one dollar. The building/plant check
    /// is skipped when neither value is supplied, since the engine derives
    /// the split in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use property_projection::models::Reconciliation;
    /// # use property_projection::models::*;
    /// # use rust_decimal::Decimal;
    /// # let mut property = PropertyInput {
    /// #     id: "p1".to_string(),
    /// #     is_construction_project: true,
    /// #     purchase_price: Decimal::from(800_000),
    /// #     land_value: Decimal::from(350_000),
    /// #     construction_value: Decimal::from(450_000),
    /// #     building_value: Decimal::from(400_000),
    /// #     plant_equipment_value: Decimal::from(50_000),
    /// #     weekly_rent: Decimal::from(650),
    /// #     rental_growth_rate: Decimal::ZERO,
    /// #     vacancy_rate: Decimal::ZERO,
    /// #     capital_growth_rate: Decimal::ZERO,
    /// #     construction: ConstructionTerms::default(),
    /// #     main_loan: LoanTerms {
    /// #         amount: Decimal::from(640_000),
    /// #         interest_rate: Decimal::from(6),
    /// #         term_years: 30,
    /// #         io_term_years: 0,
    /// #         loan_type: LoanType::PrincipalAndInterest,
    /// #     },
    /// #     equity_loan: None,
    /// #     expenses: ExpenseAssumptions::default(),
    /// #     depreciation: DepreciationSettings {
    /// #         method: DepreciationMethod::PrimeCost,
    /// #         is_new_property: true,
    /// #         construction_year: 2025,
    /// #     },
    /// # };
    /// assert_eq!(property.reconcile(), Reconciliation::Reconciled);
    ///
    /// property.land_value = Decimal::from(300_000);
    /// assert!(matches!(property.reconcile(), Reconciliation::Unreconciled(_)));
    /// ```
    pub fn reconcile(&self) -> Reconciliation {
        if !self.is_construction_project {
            return Reconciliation::Reconciled;
        }

        let mut warnings = Vec::new();

        let land_and_build = self.land_value + self.construction_value;
        if (land_and_build - self.purchase_price).abs() > RECONCILIATION_TOLERANCE {
            warnings.push(AuditWarning::new(
                "LAND_CONSTRUCTION_MISMATCH",
                format!(
                    "Land value ${} plus construction value ${} is ${}, not the purchase price ${}",
                    self.land_value, self.construction_value, land_and_build, self.purchase_price
                ),
                "medium",
            ));
        }

        let split_supplied =
            !self.building_value.is_zero() || !self.plant_equipment_value.is_zero();
        let split_total = self.building_value + self.plant_equipment_value;
        if split_supplied && (split_total - self.construction_value).abs() > RECONCILIATION_TOLERANCE
        {
            warnings.push(AuditWarning::new(
                "BUILDING_PLANT_MISMATCH",
                format!(
                    "Building value ${} plus plant & equipment ${} is ${}, not the construction value ${}",
                    self.building_value,
                    self.plant_equipment_value,
                    split_total,
                    self.construction_value
                ),
                "medium",
            ));
        }

        if warnings.is_empty() {
            Reconciliation::Reconciled
        } else {
            Reconciliation::Unreconciled(warnings)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_construction_property() -> PropertyInput {
        PropertyInput {
            id: "prop_001".to_string(),
            is_construction_project: true,
            purchase_price: dec("800000"),
            land_value: dec("350000"),
            construction_value: dec("450000"),
            building_value: dec("405000"),
            plant_equipment_value: dec("45000"),
            weekly_rent: dec("650"),
            rental_growth_rate: dec("3"),
            vacancy_rate: dec("2"),
            capital_growth_rate: dec("5"),
            construction: ConstructionTerms::default(),
            main_loan: LoanTerms {
                amount: dec("640000"),
                interest_rate: dec("6.5"),
                term_years: 30,
                io_term_years: 0,
                loan_type: LoanType::PrincipalAndInterest,
            },
            equity_loan: None,
            expenses: ExpenseAssumptions::default(),
            depreciation: DepreciationSettings {
                method: DepreciationMethod::PrimeCost,
                is_new_property: true,
                construction_year: 2025,
            },
        }
    }

    #[test]
    fn test_reconciled_construction_project() {
        let property = create_construction_property();
        assert_eq!(property.reconcile(), Reconciliation::Reconciled);
    }

    #[test]
    fn test_land_mismatch_within_tolerance_is_reconciled() {
        let mut property = create_construction_property();
        property.land_value = dec("350000.90");
        assert_eq!(property.reconcile(), Reconciliation::Reconciled);
    }

    #[test]
    fn test_land_mismatch_is_reported() {
        let mut property = create_construction_property();
        property.land_value = dec("340000");

        let warnings = property.reconcile().into_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, "LAND_CONSTRUCTION_MISMATCH");
        assert!(warnings[0].message.contains("790000"));
    }

    #[test]
    fn test_building_plant_mismatch_is_reported() {
        let mut property = create_construction_property();
        property.plant_equipment_value = dec("60000");

        let warnings = property.reconcile().into_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, "BUILDING_PLANT_MISMATCH");
    }

    #[test]
    fn test_missing_split_is_not_a_mismatch() {
        let mut property = create_construction_property();
        property.building_value = Decimal::ZERO;
        property.plant_equipment_value = Decimal::ZERO;
        assert_eq!(property.reconcile(), Reconciliation::Reconciled);
    }

    #[test]
    fn test_purchase_is_not_checked() {
        let mut property = create_construction_property();
        property.is_construction_project = false;
        property.land_value = Decimal::ZERO;
        assert_eq!(property.reconcile(), Reconciliation::Reconciled);
    }

    #[test]
    fn test_interest_only_years() {
        let mut loan = create_construction_property().main_loan;
        assert_eq!(loan.interest_only_years(), 0);

        loan.loan_type = LoanType::InterestOnly;
        loan.io_term_years = 5;
        assert_eq!(loan.interest_only_years(), 5);

        loan.io_term_years = 0;
        assert_eq!(loan.interest_only_years(), 30);

        loan.io_term_years = 35;
        assert_eq!(loan.interest_only_years(), 30);
    }

    #[test]
    fn test_periods_per_year() {
        assert_eq!(PaymentFrequency::Weekly.periods_per_year(), 52);
        assert_eq!(PaymentFrequency::Monthly.periods_per_year(), 12);
    }

    #[test]
    fn test_deserialize_purchase_with_defaults() {
        let json = r#"{
            "id": "prop_002",
            "purchase_price": "750000",
            "weekly_rent": "680",
            "main_loan": {
                "amount": "600000",
                "interest_rate": "6.8",
                "term_years": 30,
                "io_term_years": 5,
                "loan_type": "interest_only"
            },
            "depreciation": {
                "method": "diminishing_value",
                "is_new_property": false,
                "construction_year": 2010
            }
        }"#;

        let property: PropertyInput = serde_json::from_str(json).unwrap();
        assert!(!property.is_construction_project);
        assert_eq!(property.annual_rent(), dec("35360"));
        assert_eq!(property.main_loan.loan_type, LoanType::InterestOnly);
        assert_eq!(
            property.depreciation.method,
            DepreciationMethod::DiminishingValue
        );
        assert_eq!(
            property.construction.holding_cost_funding,
            HoldingCostFunding::Capitalised
        );
        assert!(property.equity_loan.is_none());
        assert_eq!(property.total_borrowed(), dec("600000"));
    }

    #[test]
    fn test_enum_serialization() {
        assert_eq!(
            serde_json::to_string(&LoanType::PrincipalAndInterest).unwrap(),
            "\"principal_and_interest\""
        );
        assert_eq!(
            serde_json::to_string(&HoldingCostFunding::CashFunded).unwrap(),
            "\"cash_funded\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentFrequency::Weekly).unwrap(),
            "\"weekly\""
        );
    }
}
