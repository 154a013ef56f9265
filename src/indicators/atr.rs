// =============================================================================
// Average True Range (ATR) — rolling mean of True Range
// =============================================================================
//
// True Range (TR) for each bar:
//   TR = max(H - L, |H - prevClose|, |L - prevClose|)
//
// The first bar has no previous close; its TR is H - L.
//
// ATR is the simple rolling mean of TR over `period` bars.
// Default period: 14
// =============================================================================

use super::sma::rolling_mean;
use crate::market_data::Bar;

/// True Range for every bar, aligned one-to-one with `bars`.
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    let mut out = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        let hl = bar.high - bar.low;
        if i == 0 {
            out.push(hl);
            continue;
        }
        let prev_close = bars[i - 1].close;
        let hc = (bar.high - prev_close).abs();
        let lc = (bar.low - prev_close).abs();
        // f64::max ignores NaN; a bar with bad data must stay non-finite.
        if hl.is_nan() || hc.is_nan() || lc.is_nan() {
            out.push(f64::NAN);
        } else {
            out.push(hl.max(hc).max(lc));
        }
    }
    out
}

/// ATR column: rolling mean of [`true_range`] over `period` bars.
///
/// Position `i` is `None` while fewer than `period` bars are available.
pub fn calculate_atr(bars: &[Bar], period: usize) -> Vec<Option<f64>> {
    rolling_mean(&true_range(bars), period)
}
