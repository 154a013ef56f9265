// =============================================================================
// Breakout Detection — close versus the prior high/low band
// =============================================================================
//
// The band is the rolling max-high / min-low over `lookback` bars, taken one
// bar before the latest so the current bar never sees itself.

use crate::indicators::sma::{rolling_max, rolling_min};
use crate::market_data::Bar;
use crate::types::Breakout;

pub const BREAKOUT_LOOKBACK: usize = 20;

/// Classify the latest close against the prior `lookback`-bar band.
///
/// Requires at least `lookback + 2` bars; otherwise `NoBreakout`.
pub fn breakout_signal(bars: &[Bar], lookback: usize) -> Breakout {
    if lookback == 0 || bars.len() < lookback + 2 {
        return Breakout::NoBreakout;
    }

    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let prior = bars.len() - 2;

    let recent_high = rolling_max(&highs, lookback)[prior];
    let recent_low = rolling_min(&lows, lookback)[prior];
    let close = bars[bars.len() - 1].close;

    if matches!(recent_high, Some(h) if close > h) {
        return Breakout::BullishBreakout;
    }
    if matches!(recent_low, Some(l) if close < l) {
        return Breakout::BearishBreakdown;
    }
    Breakout::NoBreakout
}
