//! `sidebar inspect` command implementation.

use clap::Args;

use super::{CommonArgs, PageArgs, PageSession};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the inspect command.
#[derive(Args)]
pub(crate) struct InspectArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    page: PageArgs,
}

impl InspectArgs {
    /// Execute the inspect command.
    ///
    /// Loads the page like a browser would and prints the restored tree.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the page cannot be read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.common.load_config(self.page.cli_settings())?;

        let session = PageSession::open(&self.page, config)?;
        session.print(&self.page, &output)
    }
}
