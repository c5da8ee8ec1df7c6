//! Australian resident income tax and Medicare levy.
//!
//! Pure functions of income. The free functions use the built-in 2024-25
//! schedule; the [`TaxSchedule`] methods work with any loaded rule set.
//! Negative income is treated as zero.

use rust_decimal::Decimal;

use crate::config::{RuleSet, TaxSchedule};

use super::rounding::non_negative;

impl TaxSchedule {
    /// Progressive income tax on `income`, applied bracket by bracket.
    pub fn income_tax(&self, income: Decimal) -> Decimal {
        let income = non_negative(income);
        let mut tax = Decimal::ZERO;

        for (i, bracket) in self.brackets.iter().enumerate() {
            if income <= bracket.threshold {
                break;
            }
            let taxed_to = match self.brackets.get(i + 1) {
                Some(next) => income.min(next.threshold),
                None => income,
            };
            tax += (taxed_to - bracket.threshold) * bracket.rate;
        }

        tax
    }

    /// The rate of the bracket containing `income`.
    ///
    /// A bracket contains incomes above its threshold up to and including
    /// the next threshold, so income exactly on a threshold takes the lower
    /// bracket's rate.
    pub fn marginal_rate(&self, income: Decimal) -> Decimal {
        let income = non_negative(income);
        self.brackets
            .iter()
            .rev()
            .find(|b| income > b.threshold)
            .or(self.brackets.first())
            .map_or(Decimal::ZERO, |b| b.rate)
    }

    /// Flat Medicare levy on the whole income once above the threshold.
    pub fn medicare_levy(&self, income: Decimal, applies: bool) -> Decimal {
        let income = non_negative(income);
        let levy = &self.medicare_levy;
        if applies && income > levy.threshold {
            income * levy.rate
        } else {
            Decimal::ZERO
        }
    }

    /// Income tax plus Medicare levy.
    pub fn total_tax(&self, income: Decimal, has_medicare_levy: bool) -> Decimal {
        self.income_tax(income) + self.medicare_levy(income, has_medicare_levy)
    }
}

/// Income tax on `income` under the 2024-25 schedule.
///
/// # Examples
///
/// ```
/// use property_projection::calculation::income_tax;
/// use rust_decimal::Decimal;
///
/// assert_eq!(income_tax(Decimal::from(18_200)), Decimal::ZERO);
/// assert_eq!(income_tax(Decimal::from(45_000)), Decimal::from(5_092));
/// ```
pub fn income_tax(income: Decimal) -> Decimal {
    RuleSet::canonical().tax().income_tax(income)
}

/// Marginal rate for `income` under the 2024-25 schedule.
pub fn marginal_rate(income: Decimal) -> Decimal {
    RuleSet::canonical().tax().marginal_rate(income)
}

/// Medicare levy on `income` under the 2024-25 schedule.
pub fn medicare_levy(income: Decimal, applies: bool) -> Decimal {
    RuleSet::canonical().tax().medicare_levy(income, applies)
}

/// Income tax plus Medicare levy under the 2024-25 schedule.
pub fn total_tax(income: Decimal, has_medicare_levy: bool) -> Decimal {
    RuleSet::canonical().tax().total_tax(income, has_medicare_levy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tax_free_threshold() {
        assert_eq!(income_tax(dec!(18200)), Decimal::ZERO);
        assert_eq!(income_tax(dec!(10000)), Decimal::ZERO);
    }

    #[test]
    fn test_second_bracket_boundary() {
        assert_eq!(income_tax(dec!(45000)), (dec!(45000) - dec!(18200)) * dec!(0.19));
    }

    #[test]
    fn test_tax_at_each_threshold() {
        assert_eq!(income_tax(dec!(120000)), dec!(29467));
        assert_eq!(income_tax(dec!(180000)), dec!(51667));
    }

    #[test]
    fn test_top_bracket() {
        // 51,667 + 20,000 x 45%
        assert_eq!(income_tax(dec!(200000)), dec!(60667));
    }

    #[test]
    fn test_marginal_rate_boundaries() {
        assert_eq!(marginal_rate(dec!(0)), Decimal::ZERO);
        assert_eq!(marginal_rate(dec!(18200)), Decimal::ZERO);
        assert_eq!(marginal_rate(dec!(18201)), dec!(0.19));
        assert_eq!(marginal_rate(dec!(120000)), dec!(0.325));
        assert_eq!(marginal_rate(dec!(120001)), dec!(0.37));
        assert_eq!(marginal_rate(dec!(500000)), dec!(0.45));
    }

    #[test]
    fn test_medicare_levy_threshold() {
        assert_eq!(medicare_levy(dec!(26000), true), Decimal::ZERO);
        assert_eq!(medicare_levy(dec!(26001), true), dec!(520.02));
    }

    #[test]
    fn test_medicare_levy_exempt() {
        assert_eq!(medicare_levy(dec!(100000), false), Decimal::ZERO);
    }

    #[test]
    fn test_total_tax_combines_tax_and_levy() {
        assert_eq!(total_tax(dec!(180000), true), dec!(55267));
        assert_eq!(total_tax(dec!(180000), false), dec!(51667));
    }

    #[test]
    fn test_negative_income_is_clamped() {
        assert_eq!(income_tax(dec!(-50000)), Decimal::ZERO);
        assert_eq!(marginal_rate(dec!(-50000)), Decimal::ZERO);
        assert_eq!(medicare_levy(dec!(-50000), true), Decimal::ZERO);
    }

    #[test]
    fn test_schedule_methods_match_free_functions() {
        let schedule = RuleSet::au_2024_25().tax().clone();
        let income = dec!(97345.67);
        assert_eq!(schedule.income_tax(income), income_tax(income));
        assert_eq!(schedule.total_tax(income, true), total_tax(income, true));
    }
}
