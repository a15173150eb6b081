//! Command handlers.

pub mod events;
pub mod rules;
pub mod status;
pub mod watch;

use std::time::Duration;

use netwarden_config::FileConfig;
use netwarden_core::MonitorConfig;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a parsed command to its handler.
pub async fn dispatch(command: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match command {
        Command::Status => status::handle(global).await,
        Command::Events(args) => events::handle(&args, global).await,
        Command::Rules(args) => rules::handle(args, global).await,
        Command::BlockIp(args) => rules::handle_block_ip(&args, global).await,
        Command::Watch(args) => watch::handle(&args, global).await,
        // Handled in main before dispatch; no backend needed.
        Command::Completions(_) => Ok(()),
    }
}

/// Load the config file and layer CLI flags on top.
pub(crate) fn resolve_config(
    global: &GlobalOpts,
) -> Result<(MonitorConfig, FileConfig), CliError> {
    let file = match &global.config {
        Some(path) => netwarden_config::load_from(path)?,
        None => netwarden_config::load()?,
    };
    let mut config = file.into_monitor_config()?;

    if let Some(backend) = &global.backend {
        config.base_url = backend.parse().map_err(|e| CliError::Validation {
            field: "backend".into(),
            reason: format!("{e}: {backend}"),
        })?;
    }
    config.timeout = Duration::from_secs(global.timeout);
    config.accept_invalid_certs = global.insecure;

    Ok((config, file))
}
