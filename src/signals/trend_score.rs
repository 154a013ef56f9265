// =============================================================================
// Trend Strength — additive 0..100 score
// =============================================================================
//
//   +30  MA50 > MA200
//   +20  50 < RSI < 70
//   +20  volume spike on the latest bar
//   +30  bullish breakout
//
// Requires 200 bars (MA200 is undefined before that); otherwise 0.

use tracing::debug;

use super::breakout::{breakout_signal, BREAKOUT_LOOKBACK};
use super::volume::volume_spike;
use crate::indicators::frame::MA_SLOW;
use crate::indicators::IndicatorFrame;
use crate::types::Breakout;

const MA_CROSS_POINTS: u32 = 30;
const RSI_BAND_POINTS: u32 = 20;
const VOLUME_SPIKE_POINTS: u32 = 20;
const BREAKOUT_POINTS: u32 = 30;

/// Score the latest bar of a fully computed frame.
pub fn trend_strength(frame: &IndicatorFrame<'_>) -> u32 {
    if frame.len() < MA_SLOW {
        return 0;
    }

    let mut score = 0;

    if let (Some(fast), Some(slow)) = (frame.latest_ma50(), frame.latest_ma200()) {
        if fast > slow {
            score += MA_CROSS_POINTS;
        }
    }
    if let Some(rsi) = frame.latest_rsi() {
        if rsi > 50.0 && rsi < 70.0 {
            score += RSI_BAND_POINTS;
        }
    }
    if volume_spike(frame.bars()) {
        score += VOLUME_SPIKE_POINTS;
    }
    if breakout_signal(frame.bars(), BREAKOUT_LOOKBACK) == Breakout::BullishBreakout {
        score += BREAKOUT_POINTS;
    }

    debug!(score, bars = frame.len(), "trend strength scored");
    score
}
