//! `netwarden status` -- one-shot backend summary.

use std::sync::Arc;

use owo_colors::OwoColorize;
use serde::Serialize;

use netwarden_core::model::SourceId;
use netwarden_core::{AggregateView, DashboardAggregate};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

/// Serializable summary assembled from the aggregate view.
#[derive(Serialize)]
struct StatusReport {
    system: Option<SystemReport>,
    ids: Option<IdsReport>,
    firewall: Option<FirewallReport>,
    model: Option<ModelReport>,
    sources: Vec<SourceReport>,
}

#[derive(Serialize)]
struct SystemReport {
    health: String,
    cpu_percent: f64,
    memory_percent: f64,
    uptime: String,
    platform: String,
    processes: u64,
}

#[derive(Serialize)]
struct IdsReport {
    active: bool,
    version: String,
    alerts: u64,
    memory: String,
}

#[derive(Serialize)]
struct FirewallReport {
    active: bool,
    input_policy: String,
    rule_count: usize,
    blocked_ips: u64,
}

#[derive(Serialize)]
struct ModelReport {
    accuracy: f64,
    precision: f64,
    recall: f64,
    f1_score: f64,
}

#[derive(Serialize)]
struct SourceReport {
    source: String,
    connected: bool,
    last_error: Option<String>,
}

pub async fn handle(global: &GlobalOpts) -> Result<(), CliError> {
    let (config, _) = super::resolve_config(global)?;

    let view = DashboardAggregate::oneshot(config, |handle| async move {
        Ok(handle.snapshot())
    })
    .await?;

    let report = build_report(&view);
    let rendered = output::render_single(&global.output, &report, render_detail, |r| {
        r.sources
            .iter()
            .map(|s| format!("{}={}", s.source, if s.connected { "up" } else { "down" }))
            .collect::<Vec<_>>()
            .join("\n")
    });
    output::print_output(&rendered, global.quiet);
    Ok(())
}

fn build_report(view: &Arc<AggregateView>) -> StatusReport {
    StatusReport {
        system: view.system.as_ref().map(|s| SystemReport {
            health: s.health().to_string(),
            cpu_percent: s.cpu,
            memory_percent: s.memory_percent,
            uptime: s.format_uptime(),
            platform: s.platform.clone(),
            processes: s.processes,
        }),
        ids: view.ids.as_ref().map(|i| IdsReport {
            active: i.is_active(),
            version: i.version.clone(),
            alerts: i.alerts,
            memory: i.memory.clone(),
        }),
        firewall: view.firewall.as_ref().map(|f| FirewallReport {
            active: f.is_active(),
            input_policy: f.input_policy.clone(),
            rule_count: f.input_rule_count,
            blocked_ips: f.blocked_ips,
        }),
        model: view.ml.as_ref().map(|m| ModelReport {
            accuracy: m.accuracy,
            precision: m.precision,
            recall: m.recall,
            f1_score: m.f1_score,
        }),
        sources: SourceId::ALL
            .into_iter()
            .filter_map(|source| {
                view.health_of(source).map(|h| SourceReport {
                    source: source.to_string(),
                    connected: h.connected,
                    last_error: h.last_error.clone(),
                })
            })
            .collect(),
    }
}

fn render_detail(report: &StatusReport) -> String {
    let mut lines = Vec::new();

    match &report.system {
        Some(s) => lines.push(format!(
            "System:   {} (cpu {:.0}%, mem {:.0}%, up {}, {} processes, {})",
            s.health, s.cpu_percent, s.memory_percent, s.uptime, s.processes, s.platform
        )),
        None => lines.push("System:   no data".into()),
    }

    match &report.ids {
        Some(i) => lines.push(format!(
            "IDS:      {} (v{}, {} alerts, mem {})",
            if i.active { "active" } else { "inactive" },
            i.version,
            i.alerts,
            i.memory
        )),
        None => lines.push("IDS:      no data".into()),
    }

    match &report.firewall {
        Some(f) => lines.push(format!(
            "Firewall: {} (INPUT {}, {} rules, {} blocked IPs)",
            if f.active { "active" } else { "inactive" },
            f.input_policy,
            f.rule_count,
            f.blocked_ips
        )),
        None => lines.push("Firewall: no data".into()),
    }

    match &report.model {
        Some(m) => lines.push(format!(
            "Model:    acc {:.1}% / prec {:.1}% / rec {:.1}% / f1 {:.1}%",
            m.accuracy, m.precision, m.recall, m.f1_score
        )),
        None => lines.push("Model:    no data".into()),
    }

    lines.push(String::new());
    lines.push("Sources:".into());
    for s in &report.sources {
        let dot = if s.connected {
            "●".green().to_string()
        } else {
            "●".red().to_string()
        };
        let mut line = format!("  {dot} {}", s.source);
        if let Some(err) = &s.last_error {
            line.push_str(&format!("  ({err})"));
        }
        lines.push(line);
    }

    lines.join("\n")
}
