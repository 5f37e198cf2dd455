//! Sync commands: queue status, replay, connectivity watch, prefetch

use std::sync::Arc;

use colored::Colorize;
use futures::future::join_all;
use serde::Serialize;
use serde_json::{Value, json};
use tabled::Tabled;

use crate::cache::TtlClass;
use crate::cli::context::store_dir;
use crate::cli::{CommandContext, OutputFormat, SyncCommands};
use crate::client::actions::region_data_path;
use crate::client::{Region, Resource};
use crate::error::{Error, Result};
use crate::models::PendingActionDisplay;
use crate::output::table;
use crate::sync::{DrainOutcome, NetworkState, SyncCoordinator};

pub async fn run(ctx: &CommandContext, cmd: SyncCommands) -> Result<()> {
    match cmd {
        SyncCommands::Status => status(ctx).await,
        SyncCommands::Run => run_once(ctx).await,
        SyncCommands::Watch => watch(ctx).await,
        SyncCommands::Prefetch => prefetch(ctx).await,
    }
}

async fn probe(ctx: &CommandContext) -> NetworkState {
    ctx.service.probe(&ctx.config.sync.probe_path).await
}

fn state_label(state: NetworkState) -> String {
    match state {
        NetworkState::Online => state.to_string().green().to_string(),
        NetworkState::Offline => state.to_string().red().to_string(),
    }
}

async fn status(ctx: &CommandContext) -> Result<()> {
    let state = probe(ctx).await;
    let pending = ctx.service.pending_actions()?;
    let unsynced: Vec<PendingActionDisplay> = pending
        .iter()
        .filter(|a| !a.synced)
        .map(PendingActionDisplay::from)
        .collect();

    match ctx.format {
        OutputFormat::Json => ctx.print_value(&json!({
            "api_url": ctx.config.api_url,
            "network": state,
            "pending": unsynced,
        })),
        OutputFormat::Table => {
            let store = store_dir(&ctx.config)
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "unknown".to_string());
            println!(
                "{}",
                table::format_fields(&[
                    ("Backend", ctx.config.api_url.clone()),
                    ("Network", state_label(state)),
                    ("Offline store", store),
                    ("Pending writes", unsynced.len().to_string()),
                ])
            );
            if !unsynced.is_empty() {
                println!();
                println!("{}", table::format_table(&unsynced));
            }
            Ok(())
        }
    }
}

fn report_drain(ctx: &CommandContext, outcome: &DrainOutcome) -> Result<()> {
    if ctx.format == OutputFormat::Json {
        ctx.print_value(outcome)?;
    }

    let report = match outcome {
        DrainOutcome::AlreadyRunning => {
            if ctx.format == OutputFormat::Table {
                println!("A sync pass is already running");
            }
            return Ok(());
        }
        DrainOutcome::Completed(report) => report,
    };

    if ctx.format == OutputFormat::Table {
        if report.replayed.is_empty() && report.failed.is_none() {
            println!("Nothing to sync");
        } else if !report.replayed.is_empty() {
            println!(
                "{} Replayed {} pending action(s)",
                "✓".green(),
                report.replayed.len()
            );
        }
    }

    match &report.failed {
        Some(failed) => Err(Error::Other(format!(
            "Sync stopped at action {} ({}): {}; {} action(s) left pending",
            failed.id, failed.action, failed.error, report.remaining
        ))),
        None => Ok(()),
    }
}

async fn run_once(ctx: &CommandContext) -> Result<()> {
    if probe(ctx).await == NetworkState::Offline {
        let pending = ctx
            .service
            .pending_actions()?
            .iter()
            .filter(|a| !a.synced)
            .count();
        return Err(Error::Other(format!(
            "Backend unreachable at {}; {} action(s) left pending",
            ctx.config.api_url, pending
        )));
    }

    let coordinator = SyncCoordinator::new(Arc::clone(&ctx.service));
    let outcome = coordinator.drain().await?;
    report_drain(ctx, &outcome)
}

async fn watch(ctx: &CommandContext) -> Result<()> {
    if !ctx.service.has_offline_store() {
        return Err(Error::Other(
            "Offline store is not available; nothing to sync".to_string(),
        ));
    }

    let coordinator = Arc::new(SyncCoordinator::new(Arc::clone(&ctx.service)));
    let runner = {
        let coordinator = Arc::clone(&coordinator);
        tokio::spawn(async move { coordinator.run().await })
    };

    let mut last = probe(ctx).await;
    println!(
        "Watching {} every {}s (Ctrl-C to stop): {}",
        ctx.config.api_url,
        ctx.config.sync.probe_interval_secs,
        state_label(last)
    );

    // Already online: flush whatever an earlier session queued
    if last == NetworkState::Online {
        let outcome = coordinator.drain().await?;
        if let Err(e) = report_drain(ctx, &outcome) {
            log::warn!("{}", e);
        }
    }

    let mut ticker = tokio::time::interval(ctx.config.probe_interval());
    ticker.tick().await;
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                let state = probe(ctx).await;
                if state != last {
                    println!(
                        "{} Backend is now {}",
                        chrono::Local::now().format("%H:%M:%S"),
                        state_label(state)
                    );
                    last = state;
                }
            }
        }
    }

    runner.abort();
    Ok(())
}

#[derive(Debug, Tabled, Serialize)]
struct PrefetchDisplay {
    #[tabled(rename = "RESOURCE")]
    resource: String,

    #[tabled(rename = "STATUS")]
    status: String,

    #[tabled(rename = "RECORDS")]
    records: usize,
}

fn prefetch_row(resource: String, result: &Result<Value>) -> PrefetchDisplay {
    match result {
        Ok(value) => PrefetchDisplay {
            resource,
            status: "ok".to_string(),
            records: value.as_array().map(Vec::len).unwrap_or(1),
        },
        Err(e) => PrefetchDisplay {
            resource,
            status: e.to_string(),
            records: 0,
        },
    }
}

/// Fetch every resource group, then every region's detail, concurrently
async fn prefetch(ctx: &CommandContext) -> Result<()> {
    let service = &ctx.service;

    let results = join_all(
        Resource::ALL
            .iter()
            .map(|r| async move { (*r, service.read(&r.path(), r.ttl()).await) }),
    )
    .await;

    let mut rows: Vec<PrefetchDisplay> = results
        .iter()
        .map(|(r, result)| prefetch_row(r.name().to_string(), result))
        .collect();

    let region_ids: Vec<i64> = results
        .iter()
        .find(|(r, _)| *r == Resource::Regions)
        .and_then(|(_, result)| result.as_ref().ok())
        .and_then(|value| serde_json::from_value::<Vec<Region>>(value.clone()).ok())
        .map(|regions| regions.iter().map(|r| r.id).collect())
        .unwrap_or_default();

    let details = join_all(region_ids.iter().map(|id| async move {
        let path = region_data_path(*id);
        let result = service.read(&path, Some(TtlClass::Short)).await;
        prefetch_row(path, &result)
    }))
    .await;
    rows.extend(details);

    let failed = rows.iter().filter(|r| r.status != "ok").count();
    ctx.print_rows(&rows)?;

    if failed == rows.len() {
        return Err(Error::Other(format!(
            "Prefetch failed: backend unreachable at {}",
            ctx.config.api_url
        )));
    }
    if failed > 0 {
        log::warn!("{} of {} prefetches failed", failed, rows.len());
    }
    Ok(())
}
