//! Argument groups shared by several checks.

use std::time::Duration;

use clap::Args;

/// Default time allowed for an external command before it is killed.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// verbosity flag (debug diagnostics on stderr)
    #[arg(long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Args)]
pub struct CommandArgs {
    /// seconds allowed for the external command
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,
}

impl CommandArgs {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for CommandArgs {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}
