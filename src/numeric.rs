// =============================================================================
// Numeric helpers shared by the indicator engine and the analyzer
// =============================================================================
//
// Intermediate computation always keeps full precision; rounding happens only
// when a value enters the analysis result.

/// Round `value` to `decimals` places (half away from zero).
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Arithmetic mean of a slice. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Percentage change from `reference` to `current`.
///
/// A zero reference yields 0.0 instead of a division fault.
pub fn pct_change(reference: f64, current: f64) -> f64 {
    if reference == 0.0 {
        return 0.0;
    }
    (current - reference) / reference * 100.0
}
