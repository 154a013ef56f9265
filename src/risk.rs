// =============================================================================
// Risk Sizer — fixed-fractional position sizing and ATR trade setups
// =============================================================================
//
//   risk_amount   = capital * risk_percent
//   risk_per_unit = |entry - stop|
//   size          = risk_amount / risk_per_unit     (4 decimals)
//
// An entry equal to the stop is a degenerate setup with size 0, not an error.
//
// Synthetic setup for risk-managed instruments:
//   stop        = entry - 1.5 * ATR
//   take_profit = entry + 3.0 * ATR
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::numeric::round_to;

pub const STOP_ATR_MULTIPLIER: f64 = 1.5;
pub const TARGET_ATR_MULTIPLIER: f64 = 3.0;

/// Account-level sizing inputs, supplied by configuration at call time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskSettings {
    /// Account capital in quote currency.
    pub capital: f64,
    /// Fraction of capital risked per trade (e.g. 0.01 = 1 %).
    pub risk_percent: f64,
}

impl Default for RiskSettings {
    fn default() -> Self {
        Self {
            capital: 10_000.0,
            risk_percent: 0.01,
        }
    }
}

/// Entry / stop / target / size for one instrument, rounded for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeSetup {
    pub entry: f64,
    pub stop: f64,
    pub take_profit: f64,
    pub size: f64,
}

impl TradeSetup {
    /// Build the ATR-based long setup from the latest close.
    ///
    /// Sizing uses the full-precision prices; the stored prices are rounded to
    /// 4 decimals.
    pub fn from_atr(entry: f64, atr: f64, settings: &RiskSettings) -> Self {
        let stop = entry - STOP_ATR_MULTIPLIER * atr;
        let take_profit = entry + TARGET_ATR_MULTIPLIER * atr;
        let size = position_size(settings.capital, settings.risk_percent, entry, stop);

        Self {
            entry: round_to(entry, 4),
            stop: round_to(stop, 4),
            take_profit: round_to(take_profit, 4),
            size,
        }
    }

    /// Reward-to-risk ratio `(tp - entry) / (entry - stop)`, 1 decimal.
    ///
    /// 0.0 when entry equals stop.
    pub fn risk_reward(&self) -> f64 {
        let risk = self.entry - self.stop;
        if risk == 0.0 {
            return 0.0;
        }
        round_to((self.take_profit - self.entry) / risk, 1)
    }
}

/// Units to buy so that hitting `stop_price` loses `capital * risk_percent`.
pub fn position_size(capital: f64, risk_percent: f64, entry_price: f64, stop_price: f64) -> f64 {
    let risk_amount = capital * risk_percent;
    let risk_per_unit = (entry_price - stop_price).abs();

    if risk_per_unit == 0.0 {
        return 0.0;
    }

    round_to(risk_amount / risk_per_unit, 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_equals_stop_is_zero() {
        assert_eq!(position_size(10_000.0, 0.01, 100.0, 100.0), 0.0);
    }

    #[test]
    fn ten_units_for_ten_point_stop() {
        assert_eq!(position_size(10_000.0, 0.01, 100.0, 90.0), 10.0);
    }

    #[test]
    fn stop_above_entry_uses_distance() {
        assert_eq!(position_size(10_000.0, 0.01, 100.0, 110.0), 10.0);
    }

    #[test]
    fn size_rounded_to_four_places() {
        assert_eq!(position_size(10_000.0, 0.01, 154.0, 150.625), 29.6296);
    }

    #[test]
    fn atr_setup() {
        let setup = TradeSetup::from_atr(154.0, 2.25, &RiskSettings::default());
        assert_eq!(setup.entry, 154.0);
        assert_eq!(setup.stop, 150.625);
        assert_eq!(setup.take_profit, 160.75);
        assert_eq!(setup.size, 29.6296);
        assert_eq!(setup.risk_reward(), 2.0);
    }

    #[test]
    fn zero_atr_setup_is_degenerate() {
        let setup = TradeSetup::from_atr(50.0, 0.0, &RiskSettings::default());
        assert_eq!(setup.stop, 50.0);
        assert_eq!(setup.size, 0.0);
        assert_eq!(setup.risk_reward(), 0.0);
    }
}
