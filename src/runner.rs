// =============================================================================
// Report Cycle — fetch, analyze, render and deliver every group
// =============================================================================
//
// One cycle:
//   1. Fetch every instrument of a group concurrently
//   2. Analyze each series (trade setup only for risk-managed groups)
//   3. Verdict + narrative + rendered block per instrument
//   4. Assemble the group text and hand it to the notifier
//
// A failed fetch or an empty series becomes a one-line block for that
// instrument; nothing short of a config error aborts the batch.
// =============================================================================

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use futures_util::future::join_all;
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::analysis::{analyze, AnalysisError, AnalysisResult};
use crate::market_data::{BarProvider, PriceSeries};
use crate::notify::Notifier;
use crate::report::{group_header, render_block, render_group};
use crate::risk::RiskSettings;
use crate::runtime_config::{Instrument, InstrumentGroup, RuntimeConfig};
use crate::types::Verdict;
use crate::verdict::{narrative, verdict};

/// Outcome for one instrument in one cycle.
#[derive(Debug, Clone, Serialize)]
pub struct InstrumentReport {
    pub name: String,
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Rendered text block as delivered.
    pub block: String,
}

/// One group's rendered report.
#[derive(Debug, Clone, Serialize)]
pub struct GroupReport {
    pub title: String,
    pub risk_managed: bool,
    pub generated_at: DateTime<Utc>,
    pub instruments: Vec<InstrumentReport>,
    pub text: String,
}

fn instrument_report(
    instrument: &Instrument,
    fetched: Result<PriceSeries>,
    risk_managed: bool,
    settings: &RiskSettings,
) -> InstrumentReport {
    let mut report = InstrumentReport {
        name: instrument.name.clone(),
        symbol: instrument.symbol.clone(),
        analysis: None,
        verdict: None,
        narrative: None,
        error: None,
        block: String::new(),
    };

    let series = match fetched {
        Ok(series) => series,
        Err(e) => {
            warn!(symbol = %instrument.symbol, error = %e, "fetch failed");
            report.block = format!("{}: Error — {}", instrument.name, e);
            report.error = Some(e.to_string());
            return report;
        }
    };

    match analyze(&series, risk_managed, settings) {
        Ok(result) => {
            let v = verdict(&result);
            let text = narrative(&result, risk_managed);
            report.block = render_block(&instrument.name, &result, v, &text);
            report.analysis = Some(result);
            report.verdict = Some(v);
            report.narrative = Some(text);
        }
        Err(e @ AnalysisError::EmptySeries { .. }) => {
            warn!(symbol = %instrument.symbol, "no price data");
            report.block = format!("{}: No data available", instrument.name);
            report.error = Some(e.to_string());
        }
    }
    report
}

/// Build a group report from already-fetched series, in configured order.
pub fn build_group_report(
    group: &InstrumentGroup,
    fetched: Vec<Result<PriceSeries>>,
    settings: &RiskSettings,
    now: DateTime<Utc>,
) -> GroupReport {
    let instruments: Vec<InstrumentReport> = group
        .instruments
        .iter()
        .zip(fetched)
        .map(|(instrument, result)| {
            instrument_report(instrument, result, group.risk_managed, settings)
        })
        .collect();

    let date: NaiveDate = now.date_naive();
    let header = group_header(&group.icon, &group.title, date);
    let blocks: Vec<String> = instruments.iter().map(|r| r.block.clone()).collect();
    let text = render_group(&header, &blocks);

    GroupReport {
        title: group.title.clone(),
        risk_managed: group.risk_managed,
        generated_at: now,
        instruments,
        text,
    }
}

/// Run one full cycle over every configured group.
///
/// Delivery failures are logged; the built reports are returned regardless.
#[instrument(skip_all, name = "runner::cycle")]
pub async fn run_report_cycle<P, N>(config: &RuntimeConfig, provider: &P, notifier: &N) -> Vec<GroupReport>
where
    P: BarProvider,
    N: Notifier,
{
    let settings = config.risk_settings();
    let mut reports = Vec::with_capacity(config.groups.len());

    for group in &config.groups {
        let fetched = join_all(
            group
                .instruments
                .iter()
                .map(|instrument| provider.fetch_daily(&instrument.symbol)),
        )
        .await;

        let report = build_group_report(group, fetched, &settings, Utc::now());
        let failed = report.instruments.iter().filter(|r| r.error.is_some()).count();
        info!(
            group = %report.title,
            instruments = report.instruments.len(),
            failed,
            "group report built"
        );

        if let Err(e) = notifier.send(&report.text).await {
            error!(group = %report.title, error = %e, "report delivery failed");
        }
        reports.push(report);
    }

    reports
}
