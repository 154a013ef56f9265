// =============================================================================
// Indicator Frame — derived per-bar columns over a borrowed price series
// =============================================================================
//
// The frame borrows the caller's bars immutably and owns its derived columns
// (MA50, MA200, RSI, ATR). Each `with_*` step consumes the frame and returns
// a new one, so analysing the same series twice (or concurrently) never
// observes another run's columns.
// =============================================================================

use super::atr::calculate_atr;
use super::rsi::calculate_rsi;
use super::sma::rolling_mean;
use crate::market_data::{Bar, PriceSeries};

pub const MA_FAST: usize = 50;
pub const MA_SLOW: usize = 200;
pub const RSI_PERIOD: usize = 14;
pub const ATR_PERIOD: usize = 14;

/// A price series plus its derived indicator columns.
///
/// Every column is aligned one-to-one with the bars. A column that has not
/// been computed yet reads as undefined (`None`) at every position.
#[derive(Debug, Clone)]
pub struct IndicatorFrame<'a> {
    bars: &'a [Bar],
    ma50: Vec<Option<f64>>,
    ma200: Vec<Option<f64>>,
    rsi: Vec<Option<f64>>,
    atr: Vec<Option<f64>>,
}

impl<'a> IndicatorFrame<'a> {
    /// Frame with no derived columns yet.
    pub fn new(series: &'a PriceSeries) -> Self {
        Self::from_bars(series.bars())
    }

    pub fn from_bars(bars: &'a [Bar]) -> Self {
        let empty = vec![None; bars.len()];
        Self {
            bars,
            ma50: empty.clone(),
            ma200: empty.clone(),
            rsi: empty.clone(),
            atr: empty,
        }
    }

    /// All columns in the fixed order: moving averages, RSI, ATR.
    pub fn compute(series: &'a PriceSeries) -> Self {
        Self::new(series)
            .with_moving_averages()
            .with_rsi(RSI_PERIOD)
            .with_atr(ATR_PERIOD)
    }

    /// Add the 50- and 200-bar simple moving averages of the close.
    pub fn with_moving_averages(self) -> Self {
        let closes = self.closes();
        Self {
            ma50: rolling_mean(&closes, MA_FAST),
            ma200: rolling_mean(&closes, MA_SLOW),
            ..self
        }
    }

    /// Add the RSI column.
    pub fn with_rsi(self, period: usize) -> Self {
        let closes = self.closes();
        Self {
            rsi: calculate_rsi(&closes, period),
            ..self
        }
    }

    /// Add the ATR column.
    pub fn with_atr(self, period: usize) -> Self {
        Self {
            atr: calculate_atr(self.bars, period),
            ..self
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn bars(&self) -> &'a [Bar] {
        self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn latest(&self) -> Option<&'a Bar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    #[cfg(test)]
    pub fn ma50(&self) -> &[Option<f64>] {
        &self.ma50
    }

    #[cfg(test)]
    pub fn ma200(&self) -> &[Option<f64>] {
        &self.ma200
    }

    pub fn rsi(&self) -> &[Option<f64>] {
        &self.rsi
    }

    pub fn latest_ma50(&self) -> Option<f64> {
        self.ma50.last().copied().flatten()
    }

    pub fn latest_ma200(&self) -> Option<f64> {
        self.ma200.last().copied().flatten()
    }

    pub fn latest_rsi(&self) -> Option<f64> {
        self.rsi.last().copied().flatten()
    }

    pub fn latest_atr(&self) -> Option<f64> {
        self.atr.last().copied().flatten()
    }
}
