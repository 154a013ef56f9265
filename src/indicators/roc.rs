// =============================================================================
// Rate of Change (ROC) — percentage change over a bar offset
// =============================================================================
//
//   ROC = ((close - close_n) / close_n) * 100
//
// Weekly change compares the last close with the close 7 bars earlier
// (offset -8 from the end); monthly change uses offset -31.

use crate::market_data::Bar;
use crate::numeric::pct_change;

/// Bars back (from the end, inclusive) used for the weekly reference close.
pub const WEEK_OFFSET: usize = 8;
/// Bars back (from the end, inclusive) used for the monthly reference close.
pub const MONTH_OFFSET: usize = 31;

/// Percentage change from the close at `offset` bars from the end to the
/// latest close.
///
/// Returns 0.0 when fewer than `offset` bars exist, when `offset` is zero, or
/// when the reference close is exactly zero.
pub fn change_over(bars: &[Bar], offset: usize) -> f64 {
    if offset == 0 || bars.len() < offset {
        return 0.0;
    }
    let reference = bars[bars.len() - offset].close;
    let current = bars[bars.len() - 1].close;
    pct_change(reference, current)
}

/// % change of close over the last 7 bars.
pub fn weekly_change(bars: &[Bar]) -> f64 {
    change_over(bars, WEEK_OFFSET)
}

/// % change of close over the last 30 bars.
pub fn monthly_change(bars: &[Bar]) -> f64 {
    change_over(bars, MONTH_OFFSET)
}
