//! `sidebar reset` command implementation.

use clap::Args;
use sidebar_config::CliSettings;
use sidebar_store::FileStore;

use super::CommonArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the reset command.
#[derive(Args)]
pub(crate) struct ResetArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

impl ResetArgs {
    /// Execute the reset command.
    ///
    /// Deletes the session file, ending the simulated browsing session.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the file cannot be removed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.common.load_config(CliSettings::default())?;

        let store = FileStore::new(&config.session_resolved.path);
        store.clear()?;

        output.success(&format!("Session cleared: {}", store.path().display()));
        Ok(())
    }
}
