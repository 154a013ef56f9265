use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// One daily OHLCV bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

// ---------------------------------------------------------------------------
// PriceSeries -- ordered daily bars for one instrument
// ---------------------------------------------------------------------------

/// Daily bars for a single instrument, ascending by date with no duplicate
/// dates. The most recent bar is the last element.
///
/// The series is immutable once built; the indicator engine borrows it and
/// produces its derived columns separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Build a series, sorting bars by date and collapsing duplicate dates.
    ///
    /// When a date appears more than once the last occurrence wins (a live
    /// intraday bar supersedes an earlier snapshot of the same day).
    pub fn new(symbol: impl Into<String>, mut bars: Vec<Bar>) -> Self {
        // Stable sort keeps input order among equal dates.
        bars.sort_by_key(|b| b.date);

        let mut canonical: Vec<Bar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match canonical.last_mut() {
                Some(last) if last.date == bar.date => *last = bar,
                _ => canonical.push(bar),
            }
        }

        Self {
            symbol: symbol.into(),
            bars: canonical,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Most recent bar, if any.
    pub fn latest(&self) -> Option<&Bar> {
        self.bars.last()
    }
}
