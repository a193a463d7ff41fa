use anyhow::Result;
use clap::Args;
use std::path::Path;
use std::time::Duration;

use crate::ui::Shell;

#[derive(Args)]
pub struct DashboardCommand {}

impl DashboardCommand {
    pub async fn execute(self, config: Option<&Path>) -> Result<()> {
        let controller = super::connect(config).await?;
        let tick_rate = Duration::from_millis(controller.backend().config().ui.tick_rate_ms);

        let mut shell = Shell::new(controller, tick_rate)?;
        let result = shell.run().await;
        shell.cleanup()?;

        result
    }
}
