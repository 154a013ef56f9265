// =============================================================================
// Price Levels — support/resistance band and the trailing weekly range
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::indicators::sma::{rolling_max, rolling_min};
use crate::market_data::Bar;

pub const LEVELS_LOOKBACK: usize = 20;
const WEEK_BARS: usize = 7;

/// Support (rolling min-low) and resistance (rolling max-high).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyLevels {
    pub support: f64,
    pub resistance: f64,
}

/// Open of the first bar and the high/low extremes over the last 7 bars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeeklyRange {
    pub open: f64,
    pub high: f64,
    pub low: f64,
}

/// Rolling min-low / max-high over `lookback` bars at the latest position.
///
/// `None` with fewer than `lookback` bars.
pub fn key_levels(bars: &[Bar], lookback: usize) -> Option<KeyLevels> {
    if lookback == 0 || bars.len() < lookback {
        return None;
    }
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();

    let resistance = rolling_max(&highs, lookback).last().copied().flatten()?;
    let support = rolling_min(&lows, lookback).last().copied().flatten()?;
    Some(KeyLevels {
        support,
        resistance,
    })
}

/// Weekly open/high/low over the last 7 bars. `None` with fewer than 7 bars.
pub fn weekly_ohlc(bars: &[Bar]) -> Option<WeeklyRange> {
    if bars.len() < WEEK_BARS {
        return None;
    }
    let week = &bars[bars.len() - WEEK_BARS..];
    let high = week.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    let low = week.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    Some(WeeklyRange {
        open: week[0].open,
        high,
        low,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn bars_from_ranges(ranges: &[(f64, f64)]) -> Vec<Bar> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        ranges
            .iter()
            .enumerate()
            .map(|(i, &(low, high))| {
                let mid = (low + high) / 2.0;
                Bar::new(start + Duration::days(i as i64), mid, high, low, mid, 1.0)
            })
            .collect()
    }

    #[test]
    fn key_levels_needs_lookback_bars() {
        let bars = bars_from_ranges(&vec![(9.0, 11.0); 19]);
        assert!(key_levels(&bars, 20).is_none());
    }

    #[test]
    fn key_levels_over_window() {
        let mut ranges = vec![(1.0, 100.0)]; // outside the window
        ranges.extend(vec![(9.0, 11.0); 18]);
        ranges.push((8.0, 10.0));
        ranges.push((10.0, 13.0));
        let levels = key_levels(&bars_from_ranges(&ranges), 20).unwrap();
        assert_eq!(levels.support, 8.0);
        assert_eq!(levels.resistance, 13.0);
    }

    #[test]
    fn inside_bar_leaves_levels_unchanged() {
        let mut ranges = vec![(9.0, 11.0); 10];
        ranges.push((5.0, 20.0));
        ranges.extend(vec![(9.0, 11.0); 14]);
        let mut bars = bars_from_ranges(&ranges);
        let before = key_levels(&bars, 20).unwrap();

        let next_day = bars.last().unwrap().date + Duration::days(1);
        bars.push(Bar::new(next_day, 10.0, 12.0, 8.0, 10.0, 1.0));
        let after = key_levels(&bars, 20).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn weekly_range() {
        assert!(weekly_ohlc(&bars_from_ranges(&[(1.0, 2.0); 6])).is_none());

        let mut ranges = vec![(0.0, 100.0)];
        ranges.extend([(9.0, 11.0), (8.0, 12.0), (10.0, 15.0), (9.0, 10.0), (7.0, 9.0), (8.0, 9.0), (9.0, 10.0)]);
        let range = weekly_ohlc(&bars_from_ranges(&ranges)).unwrap();
        assert_eq!(range.open, 10.0);
        assert_eq!(range.high, 15.0);
        assert_eq!(range.low, 7.0);
    }
}
