//! `netwarden rules` and `netwarden block-ip` -- firewall management.

use tabled::Tabled;

use netwarden_core::model::{Chain, FirewallRule};
use netwarden_core::{
    Command as CoreCommand, CommandResult, DashboardAggregate, FilterPager, Selection,
};

use crate::cli::{BlockIpArgs, GlobalOpts, RulesArgs, RulesCommand};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Direction")]
    direction: String,
    #[tabled(rename = "Severity")]
    severity: String,
    #[tabled(rename = "Rule")]
    summary: String,
}

impl From<&&FirewallRule> for RuleRow {
    fn from(r: &&FirewallRule) -> Self {
        Self {
            key: r.key.to_string(),
            direction: r.direction().to_string(),
            severity: r.severity().to_string(),
            summary: r.summary.clone(),
        }
    }
}

pub async fn handle(args: RulesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        RulesCommand::List(list) => {
            let (config, file) = super::resolve_config(global)?;
            let view = DashboardAggregate::oneshot(config, |handle| async move {
                Ok(handle.snapshot())
            })
            .await?;

            let rules: Vec<FirewallRule> = view
                .rules
                .as_ref()
                .map(|catalog| catalog.rules().to_vec())
                .unwrap_or_default();

            let mut pager = FilterPager::new(list.page_size.unwrap_or(file.page_size));
            pager.set_category(Selection::parse(&list.direction));
            pager.goto_page(list.page);

            let page = pager.page(&rules);
            let rendered =
                output::render_list(&global.output, &page.items, |r| RuleRow::from(r), |r| {
                    r.key.to_string()
                });
            output::print_output(&rendered, global.quiet);

            if matches!(global.output, crate::cli::OutputFormat::Table) && !global.quiet {
                println!(
                    "page {}/{} -- {} of {} rules",
                    page.page,
                    page.total_pages,
                    page.items.len(),
                    page.total_items
                );
            }
            Ok(())
        }

        RulesCommand::Add(add) => {
            let (config, _) = super::resolve_config(global)?;
            let text = add.text.join(" ");

            let spec = DashboardAggregate::oneshot(config, |handle| async move {
                handle.submit_rule_text(&text).await
            })
            .await?;

            let rendered = output::render_single(
                &global.output,
                &spec,
                |s| {
                    format!(
                        "added: {} {} from {} to {} port {}",
                        s.target, s.protocol, s.source, s.destination, s.port
                    )
                },
                |s| format!("{}/{}", s.chain, s.port),
            );
            output::print_output(&rendered, global.quiet);
            Ok(())
        }

        RulesCommand::Delete(del) => {
            let chain: Chain = del.chain.parse().map_err(|_| CliError::Validation {
                field: "chain".into(),
                reason: format!("expected INPUT, OUTPUT or FORWARD, got {}", del.chain),
            })?;

            let (config, _) = super::resolve_config(global)?;
            let ordinal = del.ordinal;
            DashboardAggregate::oneshot(config, |handle| async move {
                handle
                    .execute(CoreCommand::DeleteRule { chain, ordinal })
                    .await
            })
            .await?;

            output::print_output(&format!("deleted rule {chain}/{ordinal}"), global.quiet);
            Ok(())
        }
    }
}

pub async fn handle_block_ip(args: &BlockIpArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (config, _) = super::resolve_config(global)?;
    let ip = args.ip.clone();

    let result = DashboardAggregate::oneshot(config, |handle| async move {
        handle.execute(CoreCommand::BlockIp { ip }).await
    })
    .await?;

    let message = match result {
        CommandResult::Message(m) => m,
        CommandResult::Ok => format!("blocked {}", args.ip),
    };
    output::print_output(&message, global.quiet);
    Ok(())
}
