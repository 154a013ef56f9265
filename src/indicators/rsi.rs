// =============================================================================
// Relative Strength Index (RSI) — rolling-mean variant
// =============================================================================
//
// RSI measures the balance of recent up moves against down moves.
//
// Step 1 — Compute close-to-close deltas. The first bar has no predecessor;
//          its delta counts as 0.
// Step 2 — gain_t = max(delta_t, 0), loss_t = max(-delta_t, 0)
// Step 3 — mean_gain / mean_loss = rolling mean over `period` bars
// Step 4 — RS  = mean_gain / mean_loss
//          RSI = 100 - 100 / (1 + RS)
//
// A window with no losses has an undefined RS; it resolves to RSI = 100.
// =============================================================================

use super::sma::rolling_mean;

/// Compute the RSI column for `closes`, aligned one-to-one with the input.
///
/// Position `i` is `None` while fewer than `period` bars are available
/// (`i < period - 1`) or when the window holds non-finite data.
///
/// # Edge cases
/// - `period == 0` => every position is `None`
/// - mean loss of exactly zero => 100.0 (this includes a flat window)
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if closes.is_empty() {
        return Vec::new();
    }

    let mut gains = Vec::with_capacity(closes.len());
    let mut losses = Vec::with_capacity(closes.len());
    gains.push(0.0);
    losses.push(0.0);
    for w in closes.windows(2) {
        let delta = w[1] - w[0];
        gains.push(if delta > 0.0 { delta } else { 0.0 });
        losses.push(if delta < 0.0 { -delta } else { 0.0 });
    }

    let mean_gains = rolling_mean(&gains, period);
    let mean_losses = rolling_mean(&losses, period);

    mean_gains
        .iter()
        .zip(mean_losses.iter())
        .map(|(g, l)| match (g, l) {
            (Some(g), Some(l)) => rsi_from_means(*g, *l),
            _ => None,
        })
        .collect()
}

// =============================================================================
// Internal helpers
// =============================================================================

fn rsi_from_means(mean_gain: f64, mean_loss: f64) -> Option<f64> {
    let rsi = if mean_loss == 0.0 {
        100.0
    } else {
        let rs = mean_gain / mean_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    if rsi.is_finite() {
        Some(rsi)
    } else {
        None
    }
}
