use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ratio of gross profit to gross loss across closed trades. A value above 1
/// indicates a net-profitable strategy.
///
/// When there is no gross loss to divide by, the factor is reported as the
/// gross profit itself rather than an unbounded infinity, and as zero when
/// there is neither profit nor loss to measure.
///
/// Reference: <https://www.investopedia.com/articles/fundamental-analysis/10/strategy-performance-reports.asp#toc-profit-factor>
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct ProfitFactor {
    pub value: Decimal,
}

impl ProfitFactor {
    /// `profits_gross_abs` and `losses_gross_abs` are both non-negative.
    pub fn calculate(profits_gross_abs: Decimal, losses_gross_abs: Decimal) -> Self {
        let value = if losses_gross_abs > Decimal::ZERO {
            profits_gross_abs
                .checked_div(losses_gross_abs)
                .unwrap_or(Decimal::ZERO)
        } else if profits_gross_abs > Decimal::ZERO {
            profits_gross_abs
        } else {
            Decimal::ZERO
        };

        Self { value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn both_zero_is_zero() {
        assert_eq!(ProfitFactor::calculate(dec!(0), dec!(0)).value, Decimal::ZERO);
    }

    #[test]
    fn no_losses_reports_gross_profit() {
        assert_eq!(ProfitFactor::calculate(dec!(50), dec!(0)).value, dec!(50));
    }

    #[test]
    fn no_profits_is_zero() {
        assert_eq!(ProfitFactor::calculate(dec!(0), dec!(10)).value, Decimal::ZERO);
    }

    #[test]
    fn divides_profit_by_loss() {
        assert_eq!(ProfitFactor::calculate(dec!(10), dec!(5)).value, dec!(2));
    }

    #[test]
    fn precise_decimal_division() {
        assert_eq!(
            ProfitFactor::calculate(dec!(10.5555), dec!(5.2345)).value,
            Decimal::from_str("2.016524978507975928933040405").unwrap()
        );
    }
}
