// =============================================================================
// Shared types used across the Market Pulse report engine
// =============================================================================

use serde::{Deserialize, Serialize};

/// Where the latest close sits relative to the prior 20-bar high/low band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Breakout {
    BullishBreakout,
    BearishBreakdown,
    NoBreakout,
}

impl Default for Breakout {
    fn default() -> Self {
        Self::NoBreakout
    }
}

impl std::fmt::Display for Breakout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BullishBreakout => write!(f, "Bullish Breakout"),
            Self::BearishBreakdown => write!(f, "Bearish Breakdown"),
            Self::NoBreakout => write!(f, "No Breakout"),
        }
    }
}

/// Price/RSI divergence over the last two 5-bar windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Divergence {
    BullishDivergence,
    BearishDivergence,
    None,
}

impl Default for Divergence {
    fn default() -> Self {
        Self::None
    }
}

impl std::fmt::Display for Divergence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BullishDivergence => write!(f, "Bullish Divergence"),
            Self::BearishDivergence => write!(f, "Bearish Divergence"),
            Self::None => write!(f, "None"),
        }
    }
}

/// ATR-as-percent-of-price bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolatilityLevel {
    Low,
    Medium,
    High,
    Unknown,
}

impl std::fmt::Display for VolatilityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Direction of the 7-bar mean volume versus the preceding 7 bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeTrend {
    Rising,
    Falling,
    Stable,
    Unknown,
}

impl std::fmt::Display for VolumeTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rising => write!(f, "Rising"),
            Self::Falling => write!(f, "Falling"),
            Self::Stable => write!(f, "Stable"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Overall categorical call derived from an analysis result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Bullish,
    Bearish,
    Neutral,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "BULLISH"),
            Self::Bearish => write!(f, "BEARISH"),
            Self::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_report_labels() {
        assert_eq!(Breakout::BullishBreakout.to_string(), "Bullish Breakout");
        assert_eq!(Breakout::NoBreakout.to_string(), "No Breakout");
        assert_eq!(Divergence::BearishDivergence.to_string(), "Bearish Divergence");
        assert_eq!(Divergence::None.to_string(), "None");
        assert_eq!(Verdict::Neutral.to_string(), "NEUTRAL");
    }

    #[test]
    fn enums_serialise_as_variant_names() {
        let json = serde_json::to_string(&VolumeTrend::Rising).unwrap();
        assert_eq!(json, "\"Rising\"");
        let back: VolatilityLevel = serde_json::from_str("\"High\"").unwrap();
        assert_eq!(back, VolatilityLevel::High);
    }
}
