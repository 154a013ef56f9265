// =============================================================================
// Volatility Classification and Moving-Average Position
// =============================================================================
//
//   pct = ATR / close * 100
//   Low    pct <  1.5
//   Medium pct <  4.0
//   High   otherwise
//
// A zero close is `Unknown`; an undefined ATR counts as 0%.

use crate::indicators::frame::MA_SLOW;
use crate::indicators::IndicatorFrame;
use crate::types::VolatilityLevel;

const LOW_BELOW_PCT: f64 = 1.5;
const MEDIUM_BELOW_PCT: f64 = 4.0;

/// Classify the latest ATR as a share of the latest close.
pub fn volatility_level(frame: &IndicatorFrame<'_>) -> (VolatilityLevel, f64) {
    if frame.is_empty() {
        return (VolatilityLevel::Unknown, 0.0);
    }
    let close = frame.latest().map_or(0.0, |bar| bar.close);
    if close == 0.0 {
        return (VolatilityLevel::Unknown, 0.0);
    }

    let atr = frame.latest_atr().unwrap_or(0.0);
    let pct = atr / close * 100.0;
    (classify_pct(pct), pct)
}

/// Bucket an ATR percentage. Boundaries belong to the higher bucket.
pub fn classify_pct(pct: f64) -> VolatilityLevel {
    if pct < LOW_BELOW_PCT {
        VolatilityLevel::Low
    } else if pct < MEDIUM_BELOW_PCT {
        VolatilityLevel::Medium
    } else {
        VolatilityLevel::High
    }
}

/// Latest close above MA50 / above MA200.
///
/// Both are `None` with fewer than 200 bars.
pub fn ma_position(frame: &IndicatorFrame<'_>) -> (Option<bool>, Option<bool>) {
    if frame.len() < MA_SLOW {
        return (None, None);
    }
    let close = match frame.latest() {
        Some(bar) => bar.close,
        None => return (None, None),
    };
    let above_ma50 = frame.latest_ma50().map(|ma| close > ma);
    let above_ma200 = frame.latest_ma200().map(|ma| close > ma);
    (above_ma50, above_ma200)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::{Bar, PriceSeries};
    use chrono::{Duration, NaiveDate};

    fn series(n: usize, close: impl Fn(usize) -> f64, spread: f64) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let bars = (0..n)
            .map(|i| {
                let c = close(i);
                Bar::new(start + Duration::days(i as i64), c, c + spread / 2.0, c - spread / 2.0, c, 1.0)
            })
            .collect();
        PriceSeries::new("TEST", bars)
    }

    #[test]
    fn boundaries_go_up() {
        assert_eq!(classify_pct(1.49), VolatilityLevel::Low);
        assert_eq!(classify_pct(1.5), VolatilityLevel::Medium);
        assert_eq!(classify_pct(3.99), VolatilityLevel::Medium);
        assert_eq!(classify_pct(4.0), VolatilityLevel::High);
    }

    #[test]
    fn level_from_frame() {
        // Flat close 100 with a 2.0 range => ATR 2.0 => 2%.
        let s = series(30, |_| 100.0, 2.0);
        let frame = IndicatorFrame::compute(&s);
        let (level, pct) = volatility_level(&frame);
        assert_eq!(level, VolatilityLevel::Medium);
        assert!((pct - 2.0).abs() < 1e-10);
    }

    #[test]
    fn exact_boundary_from_frame() {
        // ATR 1.5 on a 100 close => exactly 1.5% => Medium.
        let s = series(30, |_| 100.0, 1.5);
        let (level, _) = volatility_level(&IndicatorFrame::compute(&s));
        assert_eq!(level, VolatilityLevel::Medium);

        let s = series(30, |_| 100.0, 4.0);
        let (level, _) = volatility_level(&IndicatorFrame::compute(&s));
        assert_eq!(level, VolatilityLevel::High);
    }

    #[test]
    fn zero_close_is_unknown() {
        let s = series(30, |_| 0.0, 0.0);
        assert_eq!(volatility_level(&IndicatorFrame::compute(&s)), (VolatilityLevel::Unknown, 0.0));
    }

    #[test]
    fn empty_frame_is_unknown() {
        let s = PriceSeries::new("EMPTY", Vec::new());
        assert_eq!(volatility_level(&IndicatorFrame::compute(&s)), (VolatilityLevel::Unknown, 0.0));
    }

    #[test]
    fn undefined_atr_counts_as_zero() {
        let s = series(5, |_| 100.0, 2.0);
        assert_eq!(volatility_level(&IndicatorFrame::compute(&s)), (VolatilityLevel::Low, 0.0));
    }

    #[test]
    fn ma_position_needs_200_bars() {
        let s = series(199, |i| 100.0 + i as f64, 1.0);
        assert_eq!(ma_position(&IndicatorFrame::compute(&s)), (None, None));
    }

    #[test]
    fn ma_position_rising_and_falling() {
        let up = series(210, |i| 100.0 + i as f64, 1.0);
        assert_eq!(ma_position(&IndicatorFrame::compute(&up)), (Some(true), Some(true)));

        let down = series(210, |i| 400.0 - i as f64, 1.0);
        assert_eq!(ma_position(&IndicatorFrame::compute(&down)), (Some(false), Some(false)));
    }
}
