// =============================================================================
// Volume Signals — spike detection and week-over-week trend
// =============================================================================

use crate::indicators::sma::rolling_mean;
use crate::market_data::Bar;
use crate::numeric::mean;
use crate::types::VolumeTrend;

const SPIKE_WINDOW: usize = 20;
const SPIKE_MULTIPLIER: f64 = 2.0;
const TREND_WINDOW: usize = 7;
const RISING_RATIO: f64 = 1.2;
const FALLING_RATIO: f64 = 0.8;

/// True iff the latest volume exceeds twice the 20-bar rolling mean volume
/// (the mean includes the latest bar). False with fewer than 20 bars.
pub fn volume_spike(bars: &[Bar]) -> bool {
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
    let avg = match rolling_mean(&volumes, SPIKE_WINDOW).last().copied().flatten() {
        Some(avg) => avg,
        None => return false,
    };
    match volumes.last() {
        Some(&latest) => latest > SPIKE_MULTIPLIER * avg,
        None => false,
    }
}

/// Mean volume of the last 7 bars against the preceding 7.
///
/// `Unknown` with fewer than 14 bars or a zero prior mean.
pub fn volume_trend(bars: &[Bar]) -> VolumeTrend {
    let n = bars.len();
    if n < 2 * TREND_WINDOW {
        return VolumeTrend::Unknown;
    }

    let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();
    let recent = mean(&volumes[n - TREND_WINDOW..]);
    let prior = mean(&volumes[n - 2 * TREND_WINDOW..n - TREND_WINDOW]);

    let (recent, prior) = match (recent, prior) {
        (Some(r), Some(p)) if p != 0.0 => (r, p),
        _ => return VolumeTrend::Unknown,
    };

    let ratio = recent / prior;
    if ratio > RISING_RATIO {
        VolumeTrend::Rising
    } else if ratio < FALLING_RATIO {
        VolumeTrend::Falling
    } else {
        VolumeTrend::Stable
    }
}
