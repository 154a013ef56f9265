pub mod series;
pub mod yahoo;

// Re-export for convenient access (e.g. `use crate::market_data::PriceSeries`).
pub use series::{Bar, PriceSeries};
pub use yahoo::{BarProvider, YahooClient};
