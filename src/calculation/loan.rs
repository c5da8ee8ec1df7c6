//! Loan repayment and amortization calculations.
//!
//! This module provides interest-only and principal-and-interest repayment
//! amounts, a full per-period amortization schedule, and the one-year roll
//! forward used by the projection engine, including the switch from
//! interest-only to principal-and-interest partway through a loan.

use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

use crate::models::{LoanTerms, PaymentFrequency};

use super::rounding::{non_negative, percent};

/// The repayment phase a loan is in for a given year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepaymentPhase {
    /// Interest is paid; the balance does not change.
    InterestOnly,
    /// Repayments cover interest and reduce the balance.
    PrincipalAndInterest,
    /// Nothing is owed.
    Repaid,
}

/// One period of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationPeriod {
    /// Period number (1-based).
    pub period: u32,
    /// Total repayment for the period.
    pub payment: Decimal,
    /// Interest component.
    pub interest: Decimal,
    /// Principal component.
    pub principal: Decimal,
    /// Balance after the repayment.
    pub closing_balance: Decimal,
}

/// A loan's activity over one projection year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanYear {
    /// Balance at the start of the year.
    pub opening_balance: Decimal,
    /// Repayment per period for the year.
    pub payment_per_period: Decimal,
    /// Interest paid over the year.
    pub interest: Decimal,
    /// Principal repaid over the year.
    pub principal: Decimal,
    /// Balance at the end of the year.
    pub closing_balance: Decimal,
    /// The repayment phase for the year.
    pub phase: RepaymentPhase,
}

/// Interest rate per repayment period.
///
/// # Examples
///
/// ```
/// use property_projection::calculation::period_rate;
/// use property_projection::models::PaymentFrequency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(period_rate(dec!(6), PaymentFrequency::Monthly), dec!(0.005));
/// ```
pub fn period_rate(annual_rate_percent: Decimal, frequency: PaymentFrequency) -> Decimal {
    percent(non_negative(annual_rate_percent)) / Decimal::from(frequency.periods_per_year())
}

/// Interest-only repayment per period.
pub fn interest_only_payment(
    principal: Decimal,
    annual_rate_percent: Decimal,
    frequency: PaymentFrequency,
) -> Decimal {
    non_negative(principal) * period_rate(annual_rate_percent, frequency)
}

/// Principal-and-interest repayment per period.
///
/// Uses the standard annuity formula
/// `P × r × (1 + r)^N / ((1 + r)^N − 1)` with `N = term_years × periods per year`.
/// A zero rate repays in equal instalments of `P / N`; a zero term repays
/// the whole principal at once. When `(1 + r)^N` exceeds the decimal range
/// the repayment has converged on the interest-only repayment, which is
/// returned instead.
///
/// # Examples
///
/// ```
/// use property_projection::calculation::calculate_loan_payment;
/// use property_projection::models::PaymentFrequency;
/// use rust_decimal::Decimal;
///
/// let payment = calculate_loan_payment(
///     Decimal::from(120_000),
///     Decimal::ZERO,
///     10,
///     PaymentFrequency::Monthly,
/// );
/// assert_eq!(payment, Decimal::from(1_000));
/// ```
pub fn calculate_loan_payment(
    principal: Decimal,
    annual_rate_percent: Decimal,
    term_years: u32,
    frequency: PaymentFrequency,
) -> Decimal {
    let periods = term_years.saturating_mul(frequency.periods_per_year());
    annuity_payment(
        non_negative(principal),
        period_rate(annual_rate_percent, frequency),
        periods,
    )
}

/// Repayment per period in `current_year` of a loan with a leading
/// interest-only period.
///
/// During the interest-only years this is the interest-only repayment on
/// `outstanding_principal`. Afterwards it is the principal-and-interest
/// repayment that retires `outstanding_principal` over the remaining
/// `term_years - interest_only_years`.
pub fn current_year_payment(
    outstanding_principal: Decimal,
    annual_rate_percent: Decimal,
    term_years: u32,
    interest_only_years: u32,
    current_year: u32,
    frequency: PaymentFrequency,
) -> Decimal {
    if current_year <= interest_only_years {
        interest_only_payment(outstanding_principal, annual_rate_percent, frequency)
    } else {
        calculate_loan_payment(
            outstanding_principal,
            annual_rate_percent,
            term_years.saturating_sub(interest_only_years),
            frequency,
        )
    }
}

/// Builds the full principal-and-interest schedule for a loan.
///
/// The final period retires whatever balance remains, so the principal
/// components always sum to the original principal.
pub fn amortization_schedule(
    principal: Decimal,
    annual_rate_percent: Decimal,
    term_years: u32,
    frequency: PaymentFrequency,
) -> Vec<AmortizationPeriod> {
    let rate = period_rate(annual_rate_percent, frequency);
    let periods = term_years.saturating_mul(frequency.periods_per_year());
    let payment = calculate_loan_payment(principal, annual_rate_percent, term_years, frequency);

    let mut balance = non_negative(principal);
    let mut schedule = Vec::with_capacity(periods as usize);

    for period in 1..=periods {
        let interest = balance * rate;
        let principal_part = if period == periods {
            balance
        } else {
            (payment - interest).min(balance)
        };
        balance -= principal_part;
        schedule.push(AmortizationPeriod {
            period,
            payment: interest + principal_part,
            interest,
            principal: principal_part,
            closing_balance: balance,
        });
    }

    schedule
}

/// Rolls a loan forward through one projection year.
///
/// Years within the interest-only period, and any years after the term has
/// ended with a balance still owing, pay interest only. Principal-and-interest
/// years re-derive the repayment from the current balance over the periods
/// left in the term, which matches the repayment fixed at the end of the
/// interest-only period.
///
/// # Arguments
///
/// * `opening_balance` - Balance at the start of the year
/// * `terms` - The loan's terms
/// * `year` - Projection year (1-based)
/// * `frequency` - Repayment frequency
pub fn project_loan_year(
    opening_balance: Decimal,
    terms: &LoanTerms,
    year: u32,
    frequency: PaymentFrequency,
) -> LoanYear {
    let opening_balance = non_negative(opening_balance);
    if opening_balance.is_zero() {
        return LoanYear {
            opening_balance,
            payment_per_period: Decimal::ZERO,
            interest: Decimal::ZERO,
            principal: Decimal::ZERO,
            closing_balance: Decimal::ZERO,
            phase: RepaymentPhase::Repaid,
        };
    }

    let periods_per_year = frequency.periods_per_year();
    let rate = period_rate(terms.interest_rate, frequency);
    let io_years = terms.interest_only_years();

    if year <= io_years || year > terms.term_years {
        let interest = opening_balance * percent(non_negative(terms.interest_rate));
        return LoanYear {
            opening_balance,
            payment_per_period: interest / Decimal::from(periods_per_year),
            interest,
            principal: Decimal::ZERO,
            closing_balance: opening_balance,
            phase: RepaymentPhase::InterestOnly,
        };
    }

    let periods_left = (terms.term_years - (year - 1)).saturating_mul(periods_per_year);
    let payment = annuity_payment(opening_balance, rate, periods_left);

    let mut balance = opening_balance;
    let mut interest_total = Decimal::ZERO;
    let mut principal_total = Decimal::ZERO;
    for period in 1..=periods_per_year {
        let interest = balance * rate;
        let final_period = year == terms.term_years && period == periods_per_year;
        let principal = if final_period {
            balance
        } else {
            (payment - interest).min(balance)
        };
        balance -= principal;
        interest_total += interest;
        principal_total += principal;
    }

    LoanYear {
        opening_balance,
        payment_per_period: payment,
        interest: interest_total,
        principal: principal_total,
        closing_balance: balance,
        phase: RepaymentPhase::PrincipalAndInterest,
    }
}

fn annuity_payment(principal: Decimal, rate: Decimal, periods: u32) -> Decimal {
    if periods == 0 {
        return principal;
    }
    if rate.is_zero() {
        return principal / Decimal::from(periods);
    }
    let interest_only = principal * rate;
    (Decimal::ONE + rate)
        .checked_powi(i64::from(periods))
        .and_then(|growth| growth.checked_div(growth - Decimal::ONE))
        .and_then(|factor| interest_only.checked_mul(factor))
        .unwrap_or(interest_only)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LoanType;
    use rust_decimal_macros::dec;

    fn create_loan(loan_type: LoanType, io_term_years: u32) -> LoanTerms {
        LoanTerms {
            amount: dec!(600000),
            interest_rate: dec!(6.8),
            term_years: 30,
            io_term_years,
            loan_type,
        }
    }

    fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {} within {} of {}",
            actual,
            tolerance,
            expected
        );
    }

    #[test]
    fn test_period_rate_weekly() {
        assert_eq!(period_rate(dec!(5.2), PaymentFrequency::Weekly), dec!(0.001));
    }

    #[test]
    fn test_interest_only_payment() {
        let payment = interest_only_payment(dec!(600000), dec!(6), PaymentFrequency::Monthly);
        assert_eq!(payment, dec!(3000));
    }

    #[test]
    fn test_zero_rate_payment_is_straight_line() {
        let payment =
            calculate_loan_payment(dec!(120000), Decimal::ZERO, 10, PaymentFrequency::Monthly);
        assert_eq!(payment, dec!(120000) / dec!(120));
    }

    #[test]
    fn test_zero_term_repays_principal() {
        let payment = calculate_loan_payment(dec!(50000), dec!(6), 0, PaymentFrequency::Monthly);
        assert_eq!(payment, dec!(50000));
    }

    #[test]
    fn test_payment_beyond_decimal_range_falls_back_to_interest_only() {
        // (1 + 1/52)^5200 is far outside the decimal range
        let payment = calculate_loan_payment(dec!(600000), dec!(100), 100, PaymentFrequency::Weekly);
        assert_eq!(
            payment,
            interest_only_payment(dec!(600000), dec!(100), PaymentFrequency::Weekly)
        );
    }

    #[test]
    fn test_period_count_saturates_for_huge_terms() {
        let payment =
            calculate_loan_payment(dec!(600000), dec!(6), 100_000_000, PaymentFrequency::Weekly);
        assert_eq!(
            payment,
            interest_only_payment(dec!(600000), dec!(6), PaymentFrequency::Weekly)
        );

        let loan = LoanTerms {
            term_years: 100_000_000,
            ..create_loan(LoanType::PrincipalAndInterest, 0)
        };
        let year = project_loan_year(dec!(600000), &loan, 1, PaymentFrequency::Weekly);
        assert_eq!(year.phase, RepaymentPhase::PrincipalAndInterest);
        assert_eq!(year.closing_balance, dec!(600000));
    }

    #[test]
    fn test_standard_monthly_payment() {
        // 500k over 30 years at 6% is 2997.75 a month
        let payment = calculate_loan_payment(dec!(500000), dec!(6), 30, PaymentFrequency::Monthly);
        assert_close(payment, dec!(2997.75), dec!(0.01));
    }

    #[test]
    fn test_schedule_principal_sums_to_original() {
        let schedule = amortization_schedule(dec!(600000), dec!(6.8), 30, PaymentFrequency::Monthly);

        assert_eq!(schedule.len(), 360);
        let principal: Decimal = schedule.iter().map(|p| p.principal).sum();
        assert_close(principal, dec!(600000), dec!(0.01));
        assert_eq!(schedule.last().unwrap().closing_balance, Decimal::ZERO);
    }

    #[test]
    fn test_schedule_splits_first_period() {
        let schedule = amortization_schedule(dec!(120000), dec!(6), 10, PaymentFrequency::Monthly);
        let first = &schedule[0];

        assert_eq!(first.interest, dec!(600));
        assert_eq!(first.principal, first.payment - first.interest);
    }

    #[test]
    fn test_current_year_payment_switches_after_io_period() {
        let io = current_year_payment(dec!(600000), dec!(6), 30, 5, 5, PaymentFrequency::Monthly);
        assert_eq!(io, dec!(3000));

        let pi = current_year_payment(dec!(600000), dec!(6), 30, 5, 6, PaymentFrequency::Monthly);
        let expected = calculate_loan_payment(dec!(600000), dec!(6), 25, PaymentFrequency::Monthly);
        assert_eq!(pi, expected);
    }

    #[test]
    fn test_io_year_keeps_balance_flat() {
        let loan = create_loan(LoanType::InterestOnly, 5);
        let year = project_loan_year(dec!(600000), &loan, 1, PaymentFrequency::Monthly);

        assert_eq!(year.phase, RepaymentPhase::InterestOnly);
        assert_eq!(year.interest, dec!(40800));
        assert_eq!(year.principal, Decimal::ZERO);
        assert_eq!(year.closing_balance, dec!(600000));
    }

    #[test]
    fn test_first_pi_year_after_io_matches_remaining_term_payment() {
        let loan = create_loan(LoanType::InterestOnly, 5);
        let year = project_loan_year(dec!(600000), &loan, 6, PaymentFrequency::Monthly);

        let expected =
            current_year_payment(dec!(600000), dec!(6.8), 30, 5, 6, PaymentFrequency::Monthly);
        assert_eq!(year.phase, RepaymentPhase::PrincipalAndInterest);
        assert_eq!(year.payment_per_period, expected);
        assert!(year.closing_balance < dec!(600000));
        assert_close(year.interest + year.principal, expected * dec!(12), dec!(0.000001));
    }

    #[test]
    fn test_pi_loan_fully_repaid_at_term_end() {
        let loan = create_loan(LoanType::PrincipalAndInterest, 0);
        let mut balance = loan.amount;
        let mut principal_repaid = Decimal::ZERO;

        for year in 1..=30 {
            let loan_year = project_loan_year(balance, &loan, year, PaymentFrequency::Weekly);
            principal_repaid += loan_year.principal;
            balance = loan_year.closing_balance;
        }

        assert_eq!(balance, Decimal::ZERO);
        assert_close(principal_repaid, dec!(600000), dec!(0.01));

        let after = project_loan_year(balance, &loan, 31, PaymentFrequency::Weekly);
        assert_eq!(after.phase, RepaymentPhase::Repaid);
        assert_eq!(after.interest, Decimal::ZERO);
    }

    #[test]
    fn test_yearly_payment_is_stable_across_pi_years() {
        let loan = create_loan(LoanType::PrincipalAndInterest, 0);
        let year_one = project_loan_year(dec!(600000), &loan, 1, PaymentFrequency::Monthly);
        let year_two =
            project_loan_year(year_one.closing_balance, &loan, 2, PaymentFrequency::Monthly);

        assert_close(
            year_one.payment_per_period,
            year_two.payment_per_period,
            dec!(0.0000001),
        );
    }

    #[test]
    fn test_interest_only_to_maturity_keeps_charging_interest() {
        let loan = create_loan(LoanType::InterestOnly, 0);
        let year = project_loan_year(dec!(600000), &loan, 31, PaymentFrequency::Monthly);

        assert_eq!(year.phase, RepaymentPhase::InterestOnly);
        assert_eq!(year.closing_balance, dec!(600000));
    }
}
