use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Risk-adjusted return: mean per-period return divided by the standard
/// deviation of per-period returns.
///
/// Reference: <https://www.investopedia.com/articles/07/sharpe_ratio.asp>
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct SharpeRatio {
    pub value: Decimal,
}

impl SharpeRatio {
    /// Zero when `std_dev_returns` is zero or undefined — an equity curve
    /// with no volatility yet carries no risk-adjusted signal.
    pub fn calculate(risk_free_return: Decimal, mean_return: Decimal, std_dev_returns: Decimal) -> Self {
        if std_dev_returns.is_zero() {
            return Self { value: Decimal::ZERO };
        }
        let excess = mean_return - risk_free_return;
        Self {
            value: excess.checked_div(std_dev_returns).unwrap_or(Decimal::ZERO),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn zero_std_dev_is_zero_not_infinite() {
        let result = SharpeRatio::calculate(dec!(0), dec!(0.002), dec!(0));
        assert_eq!(result.value, Decimal::ZERO);
    }

    #[test]
    fn calculates_excess_over_std_dev() {
        let result = SharpeRatio::calculate(dec!(0.0015), dec!(0.0025), dec!(0.02));
        assert_eq!(result.value, dec!(0.05));
    }
}
