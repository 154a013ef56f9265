// =============================================================================
// Signals Module
// =============================================================================
//
// Single-value signals read off the latest bar of an indicator frame:
// - Breakout / breakdown against the prior 20-bar band
// - Price/RSI divergence
// - Volume spike and volume trend
// - Support/resistance and the trailing weekly range
// - Volatility bucket and moving-average position
// - Additive trend-strength score

pub mod breakout;
pub mod divergence;
pub mod levels;
pub mod trend_score;
pub mod volatility;
pub mod volume;

pub use breakout::breakout_signal;
pub use divergence::detect_rsi_divergence;
pub use levels::{key_levels, weekly_ohlc};
pub use trend_score::trend_strength;
pub use volatility::{ma_position, volatility_level};
pub use volume::volume_trend;
