use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Maximum peak-to-trough decline observed over an equity curve.
///
/// Reference: <https://www.investopedia.com/terms/m/maximum-drawdown-mdd.asp>
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct Drawdown {
    pub value: Decimal,
    pub value_pct: Decimal,
}

/// Streaming peak tracker: each call folds in one more equity sample and
/// returns the maximum drawdown seen so far. `peak` starts at the initial
/// capital so a dip on the very first sample still registers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawdownTracker {
    peak: Decimal,
    max_drawdown: Decimal,
    max_drawdown_pct: Decimal,
}

impl DrawdownTracker {
    pub fn new(initial_value: Decimal) -> Self {
        Self {
            peak: initial_value,
            max_drawdown: Decimal::ZERO,
            max_drawdown_pct: Decimal::ZERO,
        }
    }

    pub fn observe(&mut self, value: Decimal) {
        if value > self.peak {
            self.peak = value;
        }

        let drawdown = self.peak - value;
        if drawdown > self.max_drawdown {
            self.max_drawdown = drawdown;
            self.max_drawdown_pct = if self.peak > Decimal::ZERO {
                drawdown / self.peak * Decimal::from(100)
            } else {
                Decimal::ZERO
            };
        }
    }

    pub fn result(&self) -> Drawdown {
        Drawdown {
            value: self.max_drawdown,
            value_pct: self.max_drawdown_pct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn tracks_max_drawdown_across_a_recovery() {
        let mut tracker = DrawdownTracker::new(dec!(100_000));
        for v in [dec!(100_000), dec!(110_000), dec!(95_000), dec!(105_000)] {
            tracker.observe(v);
        }
        let dd = tracker.result();
        assert_eq!(dd.value, dec!(15_000));
        assert!((dd.value_pct - dec!(13.636363636363636363636363636)).abs() < dec!(0.001));
    }

    #[test]
    fn no_dip_is_zero_drawdown() {
        let mut tracker = DrawdownTracker::new(dec!(100));
        tracker.observe(dec!(110));
        tracker.observe(dec!(120));
        assert_eq!(tracker.result().value, Decimal::ZERO);
    }
}
