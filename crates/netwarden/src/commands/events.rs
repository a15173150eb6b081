//! `netwarden events` -- filtered, paged event listing.

use tabled::Tabled;

use netwarden_core::model::SecurityEvent;
use netwarden_core::{DashboardAggregate, EventQuery, FilterPager, Selection, TimeRange};

use crate::cli::{EventsArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Signature")]
    signature: String,
    #[tabled(rename = "Source")]
    src: String,
    #[tabled(rename = "Dest")]
    dest: String,
    #[tabled(rename = "Action")]
    action: String,
}

impl From<&&SecurityEvent> for EventRow {
    fn from(e: &&SecurityEvent) -> Self {
        Self {
            time: e.format_timestamp(),
            kind: e.kind.to_string(),
            severity: e.severity.band().to_string(),
            signature: e.signature.clone().unwrap_or_else(|| "-".into()),
            src: e.src_ip.clone().unwrap_or_else(|| "-".into()),
            dest: e.dest_ip.clone().unwrap_or_else(|| "-".into()),
            action: e.action.to_string(),
        }
    }
}

pub async fn handle(args: &EventsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (mut config, file) = super::resolve_config(global)?;

    let range: TimeRange = args.range.parse().map_err(|_| CliError::Validation {
        field: "range".into(),
        reason: format!("expected one of 1h/24h/7d/all, got {}", args.range),
    })?;

    // The type and range go to the backend; search/severity/paging are
    // applied locally on the normalized set.
    config.event_query = EventQuery {
        event_type: args.event_type.parse().ok(),
        time_range: range,
    };

    let view = DashboardAggregate::oneshot(config, |handle| async move {
        Ok(handle.snapshot())
    })
    .await?;

    let mut pager = FilterPager::new(args.page_size.unwrap_or(file.page_size));
    pager.set_time_range(range);
    pager.set_severity(Selection::parse(&args.severity));
    if let Some(search) = &args.search {
        pager.set_search(search.clone());
    }
    pager.goto_page(args.page);

    let page = pager.page(&view.events);
    let rendered = output::render_list(&global.output, &page.items, |e| EventRow::from(e), |e| {
        e.id.clone()
    });
    output::print_output(&rendered, global.quiet);

    if matches!(global.output, crate::cli::OutputFormat::Table) && !global.quiet {
        println!(
            "page {}/{} -- {} of {} events",
            page.page,
            page.total_pages,
            page.items.len(),
            page.total_items
        );
    }
    Ok(())
}
