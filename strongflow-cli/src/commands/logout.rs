use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;

use crate::config::Config;

#[derive(Args)]
pub struct LogoutCommand {}

impl LogoutCommand {
    pub async fn execute(self, config: Option<&Path>) -> Result<()> {
        if !Config::resolve(config)?.is_authenticated() {
            println!("You are not logged in.");
            return Ok(());
        }

        let mut controller = super::connect(config).await?;
        controller.sign_out().await;
        controller.shutdown();

        println!("{} Logged out successfully!", "✓".green());

        Ok(())
    }
}
