// =============================================================================
// Report Renderer — plain-text blocks for the delivery channel
// =============================================================================

use chrono::NaiveDate;

use crate::analysis::AnalysisResult;
use crate::types::Verdict;

pub const SCORE_BAR_LENGTH: usize = 10;

const FILLED: char = '█';
const EMPTY: char = '░';

/// Proportional bar: `round(score / 100 * length)` filled cells of `length`.
pub fn score_bar(score: u32, length: usize) -> String {
    let filled = ((score as f64 / 100.0) * length as f64).round() as usize;
    let filled = filled.min(length);
    let mut bar = String::with_capacity(length * FILLED.len_utf8());
    bar.extend(std::iter::repeat(FILLED).take(filled));
    bar.extend(std::iter::repeat(EMPTY).take(length - filled));
    bar
}

fn arrow(change: f64) -> &'static str {
    if change > 0.0 {
        "▲"
    } else if change < 0.0 {
        "▼"
    } else {
        "▬"
    }
}

fn verdict_icon(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Bullish => "🟢",
        Verdict::Bearish => "🔴",
        Verdict::Neutral => "⚪",
    }
}

fn opt<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| v.to_string())
}

fn position(above: Option<bool>) -> &'static str {
    match above {
        Some(true) => "above",
        Some(false) => "below",
        None => "n/a",
    }
}

/// One instrument's block.
pub fn render_block(name: &str, result: &AnalysisResult, verdict: Verdict, narrative: &str) -> String {
    let mut lines = vec![
        format!("{} {name} | {verdict}", verdict_icon(verdict)),
        format!("Price: {}", result.price),
        format!(
            "Score: {} {}/100",
            score_bar(result.trend_score, SCORE_BAR_LENGTH),
            result.trend_score
        ),
        format!(
            "RSI: {} | Volatility: {} ({}%)",
            opt(result.rsi),
            result.volatility,
            result.volatility_pct
        ),
        format!(
            "Week: {} {}% | Month: {} {}%",
            arrow(result.week_change),
            result.week_change,
            arrow(result.month_change),
            result.month_change
        ),
        format!(
            "MA50: {} | MA200: {}",
            position(result.above_ma50),
            position(result.above_ma200)
        ),
        format!("Breakout: {} | Divergence: {}", result.breakout, result.divergence),
        format!(
            "Support: {} | Resistance: {}",
            opt(result.support),
            opt(result.resistance)
        ),
    ];

    if let Some(setup) = &result.trade_setup {
        lines.push(format!(
            "Entry: {} | Stop: {} | TP: {} | Size: {}",
            setup.entry, setup.stop, setup.take_profit, setup.size
        ));
    }

    lines.push(format!("Summary: {narrative}"));
    lines.join("\n")
}

/// Header line for a group report.
pub fn group_header(icon: &str, title: &str, date: NaiveDate) -> String {
    format!("{icon} {} REPORT | {}", title.to_uppercase(), date.format("%Y-%m-%d"))
}

/// Header, blank line, then blocks separated by blank lines.
pub fn render_group(header: &str, blocks: &[String]) -> String {
    let mut text = String::from(header);
    text.push_str("\n\n");
    text.push_str(&blocks.join("\n\n"));
    text
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
    use crate::verdict::{narrative, verdict};

    #[test]
    fn score_bar_proportions() {
        assert_eq!(score_bar(0, 10), "░░░░░░░░░░");
        assert_eq!(score_bar(100, 10), "██████████");
        assert_eq!(score_bar(70, 10), "███████░░░");
        assert_eq!(score_bar(50, 4), "██░░");
        assert_eq!(score_bar(250, 5).chars().count(), 5);
    }

    #[test]
    fn golden_block_layout() {
        let result = analyze(&golden_series(), true, &RiskSettings::default()).unwrap();
        let v = verdict(&result);
        let text = narrative(&result, true);
        let block = render_block("Gold", &result, v, &text);
        let lines: Vec<&str> = block.lines().collect();

        assert_eq!(lines[0], "🟢 Gold | BULLISH");
        assert_eq!(lines[1], "Price: 154");
        assert_eq!(lines[2], "Score: ██████████ 100/100");
        assert_eq!(lines[3], "RSI: 57.14 | Volatility: Low (1.46%)");
        assert_eq!(lines[4], "Week: ▲ 2.33% | Month: ▲ 5.12%");
        assert_eq!(lines[5], "MA50: above | MA200: above");
        assert_eq!(lines[6], "Breakout: Bullish Breakout | Divergence: None");
        assert_eq!(lines[7], "Support: 147.25 | Resistance: 154.25");
        assert_eq!(lines[8], "Entry: 154 | Stop: 150.625 | TP: 160.75 | Size: 29.6296");
        assert_eq!(lines[9], format!("Summary: {text}"));
        assert_eq!(lines.len(), 10);
    }

    #[test]
    fn informational_block_has_no_setup_line() {
        let result = analyze(&golden_series(), false, &RiskSettings::default()).unwrap();
        let block = render_block("Gold", &result, verdict(&result), "x");
        assert!(!block.contains("Entry:"));
    }

    #[test]
    fn group_text_joins_blocks() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let header = group_header("📊", "Crypto", date);
        assert_eq!(header, "📊 CRYPTO REPORT | 2024-03-05");

        let text = render_group(&header, &["a\nb".to_string(), "c".to_string()]);
        assert_eq!(text, "📊 CRYPTO REPORT | 2024-03-05\n\na\nb\n\nc");
    }
}
