// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free column computations over daily bars. Columns are
// aligned one-to-one with the input and use `None` for positions without
// enough history, so callers are forced to handle the warm-up period.

pub mod atr;
pub mod frame;
pub mod roc;
pub mod rsi;
pub mod sma;

pub use frame::IndicatorFrame;
