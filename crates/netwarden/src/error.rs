//! CLI error type with exit codes and miette diagnostics.

use miette::Diagnostic;
use thiserror::Error;

use netwarden_core::CoreError;

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] netwarden_config::ConfigError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },
}

impl CliError {
    /// Process exit code: 2 for caller mistakes, 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Validation { .. }
            | Self::Core(CoreError::Translation(_) | CoreError::StaleRuleHandle { .. }) => 2,
            _ => 1,
        }
    }
}
