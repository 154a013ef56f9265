// =============================================================================
// Verdict & Narrative — rule-based reading of an analysis result
// =============================================================================
//
// Verdict: independent bullish / bearish point counters.
//
//   trend_score >= 70        bull +2     trend_score < 30         bear +2
//   rsi > 50                 bull +1     rsi < 50                 bear +1
//   rsi < 30 (oversold)      bull +1     rsi > 70 (overbought)    bear +1
//   bullish breakout         bull +2     bearish breakdown        bear +2
//   bullish divergence       bull +2     bearish divergence       bear +2
//   close > MA50             bull +1     close <= MA50            bear +1
//   close > MA200            bull +1     close <= MA200           bear +1
//
// BULLISH at 5 bull points, checked before BEARISH at 5 bear points.
//
// Narrative: one sentence per category, fixed order, categories with nothing
// to say are skipped.
// =============================================================================

use std::cmp::Ordering;

use crate::analysis::AnalysisResult;
use crate::types::{Breakout, Divergence, VolatilityLevel, VolumeTrend, Verdict};

pub const VERDICT_THRESHOLD: u32 = 5;

const STRONG_TREND: u32 = 70;
const WEAK_TREND: u32 = 30;
const MODERATE_TREND: u32 = 40;
const RSI_MIDLINE: f64 = 50.0;
const RSI_OVERBOUGHT: f64 = 70.0;
const RSI_OVERSOLD: f64 = 30.0;

/// Bullish and bearish point totals for `result`.
pub fn points(result: &AnalysisResult) -> (u32, u32) {
    let mut bull = 0;
    let mut bear = 0;

    if result.trend_score >= STRONG_TREND {
        bull += 2;
    } else if result.trend_score < WEAK_TREND {
        bear += 2;
    }

    if let Some(rsi) = result.rsi {
        if rsi > RSI_MIDLINE {
            bull += 1;
        } else if rsi < RSI_MIDLINE {
            bear += 1;
        }
        if rsi < RSI_OVERSOLD {
            bull += 1;
        } else if rsi > RSI_OVERBOUGHT {
            bear += 1;
        }
    }

    match result.breakout {
        Breakout::BullishBreakout => bull += 2,
        Breakout::BearishBreakdown => bear += 2,
        Breakout::NoBreakout => {}
    }

    match result.divergence {
        Divergence::BullishDivergence => bull += 2,
        Divergence::BearishDivergence => bear += 2,
        Divergence::None => {}
    }

    for above in [result.above_ma50, result.above_ma200].into_iter().flatten() {
        if above {
            bull += 1;
        } else {
            bear += 1;
        }
    }

    (bull, bear)
}

/// Categorical call. Bullish wins when both sides reach the threshold.
pub fn verdict(result: &AnalysisResult) -> Verdict {
    let (bull, bear) = points(result);
    if bull >= VERDICT_THRESHOLD {
        Verdict::Bullish
    } else if bear >= VERDICT_THRESHOLD {
        Verdict::Bearish
    } else {
        Verdict::Neutral
    }
}

/// Multi-sentence plain-text summary of `result`.
///
/// The risk/reward sentence is only produced for risk-managed instruments
/// that carry a trade setup.
pub fn narrative(result: &AnalysisResult, risk_managed: bool) -> String {
    let mut sentences: Vec<String> = Vec::with_capacity(9);

    sentences.push(trend_sentence(result.trend_score).to_string());

    if let Some(s) = change_sentence(result.week_change, result.month_change) {
        sentences.push(s.to_string());
    }

    if let Some(s) = volume_sentence(result.volume_trend) {
        sentences.push(s.to_string());
    }

    if let Some(rsi) = result.rsi {
        sentences.push(rsi_sentence(rsi));
    }

    if let Some(s) = ma_sentence(result.above_ma50, result.above_ma200) {
        sentences.push(s.to_string());
    }

    match result.breakout {
        Breakout::BullishBreakout => {
            sentences.push("Price has broken above its 20-day range.".to_string())
        }
        Breakout::BearishBreakdown => {
            sentences.push("Price has broken below its 20-day range.".to_string())
        }
        Breakout::NoBreakout => {}
    }

    match result.divergence {
        Divergence::BullishDivergence => sentences
            .push("A bullish RSI divergence points to a possible reversal higher.".to_string()),
        Divergence::BearishDivergence => sentences
            .push("A bearish RSI divergence points to a possible reversal lower.".to_string()),
        Divergence::None => {}
    }

    if let Some(s) = volatility_sentence(result.volatility, result.volatility_pct) {
        sentences.push(s);
    }

    if risk_managed {
        if let Some(setup) = &result.trade_setup {
            sentences.push(format!(
                "Risk/reward is {:.1}:1 with a stop at {} and a target at {}.",
                setup.risk_reward(),
                setup.stop,
                setup.take_profit
            ));
        }
    }

    sentences.join(" ")
}

fn trend_sentence(score: u32) -> &'static str {
    if score >= STRONG_TREND {
        "Strong trend: averages, momentum and price structure are aligned."
    } else if score >= MODERATE_TREND {
        "Moderate trend strength with partial confirmation."
    } else {
        "Weak trend with little confirmation."
    }
}

fn sign(value: f64) -> Ordering {
    value.partial_cmp(&0.0).unwrap_or(Ordering::Equal)
}

fn change_sentence(week: f64, month: f64) -> Option<&'static str> {
    use Ordering::{Equal, Greater, Less};
    match (sign(week), sign(month)) {
        (Greater, Greater) => Some("Gaining on both the weekly and the monthly view."),
        (Less, Less) => Some("Losing ground on both the weekly and the monthly view."),
        (Greater, _) => Some("Bouncing this week against a softer month."),
        (_, Greater) => Some("Pulling back this week inside a positive month."),
        (Equal, Equal) => None,
        _ => Some("Drifting lower."),
    }
}

fn volume_sentence(trend: VolumeTrend) -> Option<&'static str> {
    match trend {
        VolumeTrend::Rising => Some("Volume is rising."),
        VolumeTrend::Falling => Some("Volume is fading."),
        VolumeTrend::Stable => Some("Volume is steady."),
        VolumeTrend::Unknown => None,
    }
}

fn rsi_sentence(rsi: f64) -> String {
    if rsi > RSI_OVERBOUGHT {
        format!("RSI {rsi} is overbought.")
    } else if rsi < RSI_OVERSOLD {
        format!("RSI {rsi} is oversold.")
    } else if rsi >= RSI_MIDLINE {
        format!("RSI {rsi} shows bullish momentum.")
    } else {
        format!("RSI {rsi} shows bearish momentum.")
    }
}

fn ma_sentence(above_ma50: Option<bool>, above_ma200: Option<bool>) -> Option<&'static str> {
    match (above_ma50?, above_ma200?) {
        (true, true) => Some("Trading above both the 50-day and 200-day averages."),
        (true, false) => Some("Above the 50-day but still below the 200-day average."),
        (false, true) => Some("Below the 50-day but holding above the 200-day average."),
        (false, false) => Some("Trading below both the 50-day and 200-day averages."),
    }
}

fn volatility_sentence(level: VolatilityLevel, pct: f64) -> Option<String> {
    let word = match level {
        VolatilityLevel::Low => "low",
        VolatilityLevel::Medium => "moderate",
        VolatilityLevel::High => "high",
        VolatilityLevel::Unknown => return None,
    };
    Some(format!("Volatility is {word} ({pct}% daily ATR)."))
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::analysis::tests::golden_series;
    use crate::risk::RiskSettings;

    fn neutral_result() -> AnalysisResult {
        AnalysisResult {
            price: 100.0,
            rsi: Some(50.0),
            atr: Some(1.0),
            trend_score: 50,
            breakout: Breakout::NoBreakout,
            divergence: Divergence::None,
            week_change: 0.0,
            month_change: 0.0,
            volatility: VolatilityLevel::Unknown,
            volatility_pct: 0.0,
            above_ma50: None,
            above_ma200: None,
            week_open: None,
            week_high: None,
            week_low: None,
            volume_trend: VolumeTrend::Unknown,
            support: None,
            resistance: None,
            trade_setup: None,
        }
    }

    #[test]
    fn no_signals_is_neutral() {
        let r = neutral_result();
        assert_eq!(points(&r), (0, 0));
        assert_eq!(verdict(&r), Verdict::Neutral);
    }

    #[test]
    fn tie_at_threshold_goes_bullish() {
        // bull: trend 2 + rsi>50 1 + MA50 1 + MA200 1 = 5
        // bear: overbought 1 + breakdown 2 + divergence 2 = 5
        let r = AnalysisResult {
            trend_score: 80,
            rsi: Some(75.0),
            breakout: Breakout::BearishBreakdown,
            divergence: Divergence::BearishDivergence,
            above_ma50: Some(true),
            above_ma200: Some(true),
            ..neutral_result()
        };
        assert_eq!(points(&r), (5, 5));
        assert_eq!(verdict(&r), Verdict::Bullish);
    }

    #[test]
    fn bearish_setup() {
        let r = AnalysisResult {
            trend_score: 0,
            rsi: Some(40.0),
            breakout: Breakout::BearishBreakdown,
            above_ma50: Some(false),
            above_ma200: Some(true),
            ..neutral_result()
        };
        assert_eq!(points(&r), (1, 6));
        assert_eq!(verdict(&r), Verdict::Bearish);
    }

    #[test]
    fn oversold_counts_both_rsi_checks() {
        let r = AnalysisResult {
            rsi: Some(25.0),
            ..neutral_result()
        };
        assert_eq!(points(&r), (1, 1));
    }

    #[test]
    fn four_points_is_not_enough() {
        let r = AnalysisResult {
            trend_score: 90,
            breakout: Breakout::BullishBreakout,
            ..neutral_result()
        };
        assert_eq!(verdict(&r), Verdict::Neutral);
    }

    #[test]
    fn golden_verdict_and_narrative() {
        let result = analyze(&golden_series(), true, &RiskSettings::default()).unwrap();
        assert_eq!(points(&result), (7, 0));
        assert_eq!(verdict(&result), Verdict::Bullish);

        let expected = "Strong trend: averages, momentum and price structure are aligned. \
             Gaining on both the weekly and the monthly view. \
             Volume is rising. \
             RSI 57.14 shows bullish momentum. \
             Trading above both the 50-day and 200-day averages. \
             Price has broken above its 20-day range. \
             Volatility is low (1.46% daily ATR). \
             Risk/reward is 2.0:1 with a stop at 150.625 and a target at 160.75.";
        assert_eq!(narrative(&result, true), expected);
    }

    #[test]
    fn informational_narrative_has_no_risk_reward() {
        let result = analyze(&golden_series(), true, &RiskSettings::default()).unwrap();
        assert!(!narrative(&result, false).contains("Risk/reward"));
    }

    #[test]
    fn sparse_result_only_reports_trend() {
        let r = AnalysisResult {
            rsi: None,
            trend_score: 0,
            ..neutral_result()
        };
        assert_eq!(narrative(&r, true), "Weak trend with little confirmation.");
    }

    #[test]
    fn category_order_is_fixed() {
        let r = AnalysisResult {
            week_change: -1.0,
            month_change: 3.0,
            rsi: Some(20.0),
            divergence: Divergence::BullishDivergence,
            volatility: VolatilityLevel::High,
            volatility_pct: 5.5,
            ..neutral_result()
        };
        let text = narrative(&r, false);
        let pullback = text.find("Pulling back").unwrap();
        let rsi = text.find("oversold").unwrap();
        let divergence = text.find("bullish RSI divergence").unwrap();
        let volatility = text.find("Volatility is high (5.5% daily ATR)").unwrap();
        assert!(pullback < rsi && rsi < divergence && divergence < volatility);
    }

    #[test]
    fn change_combinations() {
        assert_eq!(change_sentence(0.0, 0.0), None);
        assert_eq!(change_sentence(-1.0, 0.0), Some("Drifting lower."));
        assert_eq!(
            change_sentence(2.0, -1.0),
            Some("Bouncing this week against a softer month.")
        );
    }
}
