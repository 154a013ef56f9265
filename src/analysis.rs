// =============================================================================
// Asset Analyzer — one instrument, one flat result
// =============================================================================
//
// Pipeline:
//   1. Derive indicator columns (MA50/MA200 -> RSI -> ATR)
//   2. Read every scalar signal off the latest bar
//   3. Optionally attach an ATR trade setup (risk-managed instruments)
//
// Rounding happens here, once: 2 decimals for RSI and percentages, 4 for
// prices. Intermediate computation keeps full precision.
// =============================================================================

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::indicators::roc::{monthly_change, weekly_change};
use crate::indicators::IndicatorFrame;
use crate::market_data::PriceSeries;
use crate::numeric::round_to;
use crate::risk::{RiskSettings, TradeSetup};
use crate::signals::breakout::BREAKOUT_LOOKBACK;
use crate::signals::levels::LEVELS_LOOKBACK;
use crate::signals::{
    breakout_signal, detect_rsi_divergence, key_levels, ma_position, trend_strength,
    volatility_level, volume_trend, weekly_ohlc,
};
use crate::types::{Breakout, Divergence, VolatilityLevel, VolumeTrend};

/// Failures the analyzer does not degrade gracefully.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("no price data for {symbol}")]
    EmptySeries { symbol: String },
}

/// Every signal computed for one instrument on one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub price: f64,
    pub rsi: Option<f64>,
    pub atr: Option<f64>,
    pub trend_score: u32,
    pub breakout: Breakout,
    pub divergence: Divergence,
    pub week_change: f64,
    pub month_change: f64,
    pub volatility: VolatilityLevel,
    pub volatility_pct: f64,
    pub above_ma50: Option<bool>,
    pub above_ma200: Option<bool>,
    pub week_open: Option<f64>,
    pub week_high: Option<f64>,
    pub week_low: Option<f64>,
    pub volume_trend: VolumeTrend,
    pub support: Option<f64>,
    pub resistance: Option<f64>,
    /// Present only for risk-managed instruments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_setup: Option<TradeSetup>,
}

/// Analyze `series`, attaching a trade setup when `risk_managed`.
pub fn analyze(
    series: &PriceSeries,
    risk_managed: bool,
    settings: &RiskSettings,
) -> Result<AnalysisResult, AnalysisError> {
    let latest = series.latest().ok_or_else(|| AnalysisError::EmptySeries {
        symbol: series.symbol().to_string(),
    })?;

    // ── 1. Derived columns ──────────────────────────────────────────────
    let frame = IndicatorFrame::compute(series);
    let bars = frame.bars();

    // ── 2. Scalar signals ───────────────────────────────────────────────
    let rsi = frame.latest_rsi();
    let atr = frame.latest_atr();
    let breakout = breakout_signal(bars, BREAKOUT_LOOKBACK);
    let divergence = detect_rsi_divergence(&frame);
    let trend_score = trend_strength(&frame);
    let (volatility, volatility_pct) = volatility_level(&frame);
    let (above_ma50, above_ma200) = ma_position(&frame);
    let week = weekly_ohlc(bars);
    let levels = key_levels(bars, LEVELS_LOOKBACK);

    // ── 3. Trade setup ──────────────────────────────────────────────────
    let trade_setup = if risk_managed {
        Some(TradeSetup::from_atr(latest.close, atr.unwrap_or(0.0), settings))
    } else {
        None
    };

    let result = AnalysisResult {
        price: round_to(latest.close, 4),
        rsi: rsi.map(|v| round_to(v, 2)),
        atr: atr.map(|v| round_to(v, 4)),
        trend_score,
        breakout,
        divergence,
        week_change: round_to(weekly_change(bars), 2),
        month_change: round_to(monthly_change(bars), 2),
        volatility,
        volatility_pct: round_to(volatility_pct, 2),
        above_ma50,
        above_ma200,
        week_open: week.map(|w| round_to(w.open, 4)),
        week_high: week.map(|w| round_to(w.high, 4)),
        week_low: week.map(|w| round_to(w.low, 4)),
        volume_trend: volume_trend(bars),
        support: levels.map(|l| round_to(l.support, 4)),
        resistance: levels.map(|l| round_to(l.resistance, 4)),
        trade_setup,
    };

    debug!(
        symbol = series.symbol(),
        bars = series.len(),
        trend_score,
        breakout = %breakout,
        divergence = %divergence,
        "analysis complete"
    );

    Ok(result)
}
