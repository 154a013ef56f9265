// =============================================================================
// Market Pulse — Main Entry Point
// =============================================================================
//
// Runs one report cycle at startup, then one every REPORT_INTERVAL_MINUTES
// (or on demand through the status API) until Ctrl+C. With RUN_ONCE set the
// process exits after the first cycle and no API server is started.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod analysis;
mod api;
mod app_state;
mod indicators;
mod market_data;
mod notify;
mod numeric;
mod report;
mod risk;
mod runner;
mod runtime_config;
mod signals;
mod types;
mod verdict;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::app_state::AppState;
use crate::market_data::YahooClient;
use crate::notify::TelegramNotifier;
use crate::runner::run_report_cycle;
use crate::runtime_config::RuntimeConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║        Market Pulse — Starting Up                        ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    let config_path =
        std::env::var("PULSE_CONFIG").unwrap_or_else(|_| "pulse_config.json".to_string());
    let mut config = RuntimeConfig::load_or_default(&config_path)?;
    config.apply_env()?;
    config.validate().context("invalid configuration")?;

    info!(
        groups = config.groups.len(),
        instruments = config.groups.iter().map(|g| g.instruments.len()).sum::<usize>(),
        capital = config.capital,
        risk_percent = config.risk_percent,
        interval_minutes = config.report_interval_minutes,
        "Configuration ready"
    );

    // ── 2. Clients ───────────────────────────────────────────────────────
    let provider = YahooClient::new(config.history_range.clone())?;
    let notifier = TelegramNotifier::new(config.telegram_token.clone(), config.chat_id.clone())?;
    if !notifier.is_enabled() {
        info!("TELEGRAM_TOKEN or CHAT_ID not set, reports will be logged only");
    }

    if config.run_once {
        let reports = run_report_cycle(&config, &provider, &notifier).await;
        info!(groups = reports.len(), "Single run complete");
        return Ok(());
    }

    // ── 3. Shared state ──────────────────────────────────────────────────
    let (run_tx, mut run_rx) = mpsc::channel(1);
    let state = Arc::new(AppState::new(config, run_tx));

    // ── 4. Status API ────────────────────────────────────────────────────
    let bind_addr = state.runtime_config.bind_addr.clone();
    let app = api::rest::router(state.clone());
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind status API on {bind_addr}"))?;
    info!(addr = %bind_addr, "Status API listening");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!(error = %e, "Status API server error");
        }
    });

    // ── 5. Scheduler ─────────────────────────────────────────────────────
    let period = Duration::from_secs(state.runtime_config.report_interval_minutes * 60);
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            // The first tick completes immediately, giving the startup run.
            _ = ticker.tick() => {
                info!("Scheduled report cycle starting");
            }
            Some(run_id) = run_rx.recv() => {
                info!(%run_id, "Manual report cycle starting");
            }
            _ = &mut shutdown => {
                info!("Ctrl+C received, shutting down");
                break;
            }
        }

        let cycle = run_report_cycle(&state.runtime_config, &provider, &notifier);
        let reports = match unless_shutdown(cycle, &mut shutdown).await {
            Some(reports) => reports,
            None => {
                info!("Ctrl+C received during a report cycle, shutting down");
                break;
            }
        };
        let runs = state.record_cycle(reports);
        info!(runs_completed = runs, "Report cycle complete");
    }

    Ok(())
}

/// Drive `work` to completion unless `shutdown` resolves first.
async fn unless_shutdown<T, S>(work: impl Future<Output = T>, shutdown: S) -> Option<T>
where
    S: Future,
{
    tokio::select! {
        value = work => Some(value),
        _ = shutdown => None,
    }
}
