// =============================================================================
// Simple Moving Average (SMA) — rolling window mean
// =============================================================================
//
// SMA_t = (x_{t-window+1} + ... + x_t) / window
//
// The first `window - 1` positions are undefined.
// =============================================================================

/// Rolling mean of `values` over `window` positions.
///
/// The output has the same length as the input; position `i` is `None` until
/// a full window is available (`i < window - 1`) or when the window holds a
/// non-finite value.
///
/// # Edge cases
/// - `window == 0` => every position is `None`
/// - `values.len() < window` => every position is `None`
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |w| w.iter().sum::<f64>() / w.len() as f64)
}

/// Rolling maximum over `window` positions, aligned like [`rolling_mean`].
pub fn rolling_max(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |w| w.iter().copied().fold(f64::NEG_INFINITY, f64::max))
}

/// Rolling minimum over `window` positions, aligned like [`rolling_mean`].
pub fn rolling_min(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |w| w.iter().copied().fold(f64::INFINITY, f64::min))
}

fn rolling<F>(values: &[f64], window: usize, reduce: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }

    for end in window - 1..values.len() {
        let slice = &values[end + 1 - window..=end];
        if slice.iter().any(|v| !v.is_finite()) {
            continue;
        }
        out[end] = Some(reduce(slice));
    }
    out
}
