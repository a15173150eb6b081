//! `netwarden watch` -- continuous polling with periodic re-render.
//!
//! Starts the full monitor (per-source timers active) and prints a status
//! summary on an interval until interrupted. Teardown stops the monitor,
//! which cancels timers and discards in-flight responses.

use std::time::Duration;

use chrono::Local;

use netwarden_core::DashboardAggregate;
use netwarden_core::model::SourceId;

use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;

pub async fn handle(args: &WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (config, _) = super::resolve_config(global)?;

    let handle = DashboardAggregate::start(config).await?;
    let mut ticker = tokio::time::interval(Duration::from_secs(args.interval.max(1)));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                render_tick(&handle, global.quiet);
            }
        }
    }

    handle.stop().await;
    Ok(())
}

fn render_tick(handle: &netwarden_core::DashboardHandle, quiet: bool) {
    if quiet {
        return;
    }

    let view = handle.snapshot();
    let stamp = Local::now().format("%H:%M:%S");

    let system = view
        .system
        .as_ref()
        .map(|s| format!("cpu {:.0}% mem {:.0}% ({})", s.cpu, s.memory_percent, s.health()))
        .unwrap_or_else(|| "no data".into());

    let events = format!("{} events", view.events.len());
    let alerts = format!("{} alerts", view.alerts.len());
    let rules = view
        .rules
        .as_ref()
        .map(|c| format!("{} rules ({} high)", c.len(), c.high_severity()))
        .unwrap_or_else(|| "rules unavailable".into());

    let down: Vec<String> = SourceId::ALL
        .into_iter()
        .filter(|s| *s != SourceId::AlertStream)
        .filter_map(|s| {
            view.health_of(s)
                .filter(|h| !h.connected)
                .map(|_| s.to_string())
        })
        .collect();
    let health = if down.is_empty() {
        "all sources up".to_owned()
    } else {
        format!("down: {}", down.join(", "))
    };

    println!("[{stamp}] {system} | {rules} | {events} | {alerts} | {health}");
}
