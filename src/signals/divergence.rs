// =============================================================================
// RSI Divergence — price and momentum disagreeing across two 5-bar windows
// =============================================================================
//
// Windows: recent = last 5 bars, prior = the 5 bars before that.
//
//   Bullish: price makes a lower low   while RSI makes a higher low
//   Bearish: price makes a higher high while RSI makes a lower high
//
// Bullish is checked first. At least 20 bars of history are required even
// though only the last 10 are compared.

use crate::indicators::IndicatorFrame;
use crate::types::Divergence;

pub const DIVERGENCE_MIN_BARS: usize = 20;
const WINDOW: usize = 5;

/// Classify price/RSI divergence on the frame's RSI column.
pub fn detect_rsi_divergence(frame: &IndicatorFrame<'_>) -> Divergence {
    let n = frame.len();
    if n < DIVERGENCE_MIN_BARS {
        return Divergence::None;
    }

    let closes = frame.closes();
    let rsi = frame.rsi();

    let recent = n - WINDOW..n;
    let prior = n - 2 * WINDOW..n - WINDOW;

    let price_recent = &closes[recent.clone()];
    let price_prior = &closes[prior.clone()];
    let rsi_recent = &rsi[recent];
    let rsi_prior = &rsi[prior];

    let lower_low = lt(min_of(price_recent.iter().copied()), min_of(price_prior.iter().copied()));
    let rsi_higher_low = gt(
        min_of(rsi_recent.iter().flatten().copied()),
        min_of(rsi_prior.iter().flatten().copied()),
    );
    if lower_low && rsi_higher_low {
        return Divergence::BullishDivergence;
    }

    let higher_high = gt(max_of(price_recent.iter().copied()), max_of(price_prior.iter().copied()));
    let rsi_lower_high = lt(
        max_of(rsi_recent.iter().flatten().copied()),
        max_of(rsi_prior.iter().flatten().copied()),
    );
    if higher_high && rsi_lower_high {
        return Divergence::BearishDivergence;
    }

    Divergence::None
}

// NaN-skipping extremes; `None` when nothing finite remains.
fn min_of(values: impl Iterator<Item = f64>) -> Option<f64> {
    values.filter(|v| !v.is_nan()).reduce(f64::min)
}

fn max_of(values: impl Iterator<Item = f64>) -> Option<f64> {
    values.filter(|v| !v.is_nan()).reduce(f64::max)
}

fn lt(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a < b)
}

fn gt(a: Option<f64>, b: Option<f64>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a > b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::{Bar, PriceSeries};
    use chrono::{Duration, NaiveDate};

    fn series_from_closes(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(start + Duration::days(i as i64), c, c, c, c, 1.0))
            .collect();
        PriceSeries::new("TEST", bars)
    }

    #[test]
    fn requires_twenty_bars() {
        let closes: Vec<f64> = (0..19).map(|i| 100.0 - i as f64).collect();
        let s = series_from_closes(&closes);
        let frame = IndicatorFrame::compute(&s);
        assert_eq!(detect_rsi_divergence(&frame), Divergence::None);
    }

    #[test]
    fn bullish_lower_low_with_higher_rsi_low() {
        // Steep selloff into bar 24, then a shallow dip to a marginally lower
        // low at bar 29: price low is lower, RSI low is higher.
        let mut closes: Vec<f64> = (0..20).map(|i| 100.0 + (i % 2) as f64).collect();
        closes.extend([95.0, 90.0, 85.0, 80.0, 75.0]);
        closes.extend([78.0, 80.0, 79.0, 77.0, 74.9]);
        let s = series_from_closes(&closes);
        let frame = IndicatorFrame::compute(&s);

        let rsi = frame.rsi();
        let prior_min = rsi[20..25].iter().flatten().copied().fold(f64::INFINITY, f64::min);
        let recent_min = rsi[25..30].iter().flatten().copied().fold(f64::INFINITY, f64::min);
        assert!(recent_min > prior_min);
        assert_eq!(detect_rsi_divergence(&frame), Divergence::BullishDivergence);
    }

    #[test]
    fn bearish_higher_high_with_lower_rsi_high() {
        let mut closes: Vec<f64> = (0..20).map(|i| 100.0 + (i % 2) as f64).collect();
        closes.extend([105.0, 110.0, 115.0, 120.0, 125.0]);
        closes.extend([122.0, 120.0, 121.0, 123.0, 125.1]);
        let s = series_from_closes(&closes);
        let frame = IndicatorFrame::compute(&s);
        assert_eq!(detect_rsi_divergence(&frame), Divergence::BearishDivergence);
    }

    #[test]
    fn steady_trend_has_no_divergence() {
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let s = series_from_closes(&closes);
        let frame = IndicatorFrame::compute(&s);
        assert_eq!(detect_rsi_divergence(&frame), Divergence::None);
    }

    #[test]
    fn undefined_rsi_window_is_no_divergence() {
        let closes: Vec<f64> = (0..25).map(|i| 100.0 - i as f64).collect();
        let s = series_from_closes(&closes);
        let frame = IndicatorFrame::new(&s);
        assert_eq!(detect_rsi_divergence(&frame), Divergence::None);
    }
}
