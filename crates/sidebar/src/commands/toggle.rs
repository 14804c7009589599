//! `sidebar toggle` command implementation.

use clap::Args;
use sidebar_nav::{StructuralLookup, UiEvent};

use super::{CommonArgs, PageArgs, PageSession};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the toggle command.
#[derive(Args)]
pub(crate) struct ToggleArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    page: PageArgs,

    /// Group ids to toggle, in order.
    #[arg(required = true)]
    groups: Vec<String>,
}

impl ToggleArgs {
    /// Execute the toggle command.
    ///
    /// Loads the page, clicks each group in turn and prints the result. The
    /// new expansion set is written to the session after every click.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the page cannot be read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let config = self.common.load_config(self.page.cli_settings())?;

        let mut session = PageSession::open(&self.page, config)?;
        for group in self.groups {
            if !session.controller.lookup().is_group(&group) {
                output.warning(&format!("'{group}' is not a group on this page"));
            }
            session.controller.handle(UiEvent::Toggle(group));
        }

        session.print(&self.page, &output)
    }
}
