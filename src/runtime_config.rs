// =============================================================================
// Runtime Configuration — instrument universe, sizing and scheduling
// =============================================================================
//
// Loaded from an optional JSON file, then overridden from the environment
// (`.env` is read by `main` before this runs). Every field carries a serde
// default so a partial file only needs the keys it changes.
//
// Secrets (bot token, chat id, admin token) come from the environment only
// and are never serialised back out.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::risk::RiskSettings;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_capital() -> f64 {
    10_000.0
}

fn default_risk_percent() -> f64 {
    0.01
}

fn default_report_interval_minutes() -> u64 {
    1440
}

fn default_history_range() -> String {
    "1y".to_string()
}

fn default_bind_addr() -> String {
    "0.0.0.0:3002".to_string()
}

fn instruments(pairs: &[(&str, &str)]) -> Vec<Instrument> {
    pairs
        .iter()
        .map(|&(name, symbol)| Instrument {
            name: name.to_string(),
            symbol: symbol.to_string(),
        })
        .collect()
}

fn default_groups() -> Vec<InstrumentGroup> {
    vec![
        InstrumentGroup {
            title: "Crypto".to_string(),
            icon: "📊".to_string(),
            risk_managed: true,
            instruments: instruments(&[
                ("Bitcoin", "BTC-USD"),
                ("Ethereum", "ETH-USD"),
                ("Solana", "SOL-USD"),
                ("Arweave", "AR-USD"),
                ("Bittensor", "TAO-USD"),
                ("Chainlink", "LINK-USD"),
                ("Litecoin", "LTC-USD"),
                ("SUI", "SUI-USD"),
                ("BNB", "BNB-USD"),
                ("Cardano", "ADA-USD"),
            ]),
        },
        InstrumentGroup {
            title: "Stocks".to_string(),
            icon: "📈".to_string(),
            risk_managed: false,
            instruments: instruments(&[
                ("S&P 500", "^GSPC"),
                ("Tesla", "TSLA"),
                ("Apple", "AAPL"),
                ("NVIDIA", "NVDA"),
                ("Palantir", "PLTR"),
                ("Google", "GOOGL"),
                ("Meta", "META"),
            ]),
        },
    ]
}

// =============================================================================
// Instrument universe
// =============================================================================

/// Display name plus provider ticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub name: String,
    pub symbol: String,
}

/// Instruments reported together in one message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentGroup {
    pub title: String,
    #[serde(default)]
    pub icon: String,
    /// Attach an ATR trade setup to every instrument in the group.
    #[serde(default)]
    pub risk_managed: bool,
    pub instruments: Vec<Instrument>,
}

// =============================================================================
// RuntimeConfig
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default = "default_groups")]
    pub groups: Vec<InstrumentGroup>,

    /// Account capital used for position sizing.
    #[serde(default = "default_capital")]
    pub capital: f64,

    /// Fraction of capital risked per trade (0.01 = 1 %).
    #[serde(default = "default_risk_percent")]
    pub risk_percent: f64,

    #[serde(default = "default_report_interval_minutes")]
    pub report_interval_minutes: u64,

    /// Provider history range, e.g. "1y".
    #[serde(default = "default_history_range")]
    pub history_range: String,

    /// Status API listen address.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Run a single report cycle and exit.
    #[serde(default)]
    pub run_once: bool,

    // --- Secrets (environment only) -----------------------------------------

    #[serde(default, skip_serializing)]
    pub telegram_token: Option<String>,

    #[serde(default, skip_serializing)]
    pub chat_id: Option<String>,

    /// Bearer token for the protected API routes. Empty rejects every call.
    #[serde(default, skip_serializing)]
    pub admin_token: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            groups: default_groups(),
            capital: default_capital(),
            risk_percent: default_risk_percent(),
            report_interval_minutes: default_report_interval_minutes(),
            history_range: default_history_range(),
            bind_addr: default_bind_addr(),
            run_once: false,
            telegram_token: None,
            chat_id: None,
            admin_token: String::new(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            groups = config.groups.len(),
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Load from `path` when it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "runtime config not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`. Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(token) = get("TELEGRAM_TOKEN") {
            self.telegram_token = Some(token);
        }
        if let Some(chat_id) = get("CHAT_ID") {
            self.chat_id = Some(chat_id);
        }
        if let Some(raw) = get("CAPITAL") {
            self.capital = raw
                .parse()
                .with_context(|| format!("CAPITAL is not a number: {raw}"))?;
        }
        if let Some(raw) = get("RISK_PERCENT") {
            self.risk_percent = raw
                .parse()
                .with_context(|| format!("RISK_PERCENT is not a number: {raw}"))?;
        }
        if let Some(raw) = get("REPORT_INTERVAL_MINUTES") {
            self.report_interval_minutes = raw
                .parse()
                .with_context(|| format!("REPORT_INTERVAL_MINUTES is not an integer: {raw}"))?;
        }
        if let Some(addr) = get("PULSE_BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(token) = get("PULSE_ADMIN_TOKEN") {
            self.admin_token = token;
        }
        if let Some(raw) = get("RUN_ONCE") {
            self.run_once = matches!(raw.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        Ok(())
    }

    /// Reject settings the report cycle cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(self.capital > 0.0) {
            anyhow::bail!("capital must be positive, got {}", self.capital);
        }
        if !(self.risk_percent > 0.0 && self.risk_percent < 1.0) {
            anyhow::bail!("risk_percent must be a fraction in (0, 1), got {}", self.risk_percent);
        }
        if self.report_interval_minutes == 0 {
            anyhow::bail!("report_interval_minutes must be at least 1");
        }
        if self.groups.is_empty() {
            anyhow::bail!("no instrument groups configured");
        }
        if let Some(group) = self.groups.iter().find(|g| g.instruments.is_empty()) {
            anyhow::bail!("instrument group {} is empty", group.title);
        }
        Ok(())
    }

    pub fn risk_settings(&self) -> RiskSettings {
        RiskSettings {
            capital: self.capital,
            risk_percent: self.risk_percent,
        }
    }
}
