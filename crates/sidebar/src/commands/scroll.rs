//! `sidebar scroll` command implementation.

use clap::Args;
use sidebar_nav::{ScrollPosition, UiEvent};

use super::{CommonArgs, PageArgs, PageSession};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the scroll command.
#[derive(Args)]
pub(crate) struct ScrollArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[command(flatten)]
    page: PageArgs,

    /// New scroll offset of the navigation panel, in pixels.
    offset: f64,
}

impl ScrollArgs {
    /// Execute the scroll command.
    ///
    /// # Errors
    ///
    /// Returns an error if the offset is negative or not a number, if
    /// configuration fails or the page cannot be read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        if ScrollPosition::new(self.offset).is_none() {
            return Err(CliError::Validation(format!(
                "Invalid scroll offset: {}",
                self.offset
            )));
        }
        let config = self.common.load_config(self.page.cli_settings())?;

        let mut session = PageSession::open(&self.page, config)?;
        session.controller.handle(UiEvent::Scroll(self.offset));

        session.print(&self.page, &output)
    }
}
