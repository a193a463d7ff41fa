use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;

#[derive(Args)]
pub struct WhoamiCommand {}

impl WhoamiCommand {
    pub async fn execute(self, config: Option<&Path>) -> Result<()> {
        let mut controller = super::connect(config).await?;

        let Some(session) = controller.session().cloned() else {
            println!("You are not logged in.");
            println!();
            println!("Use 'strongflow login' to authenticate.");
            return Ok(());
        };

        let state = controller.state();
        println!("{} Authenticated as:", "✓".green());
        println!();
        println!(
            "  Email:    {}",
            session.user.email.as_deref().unwrap_or("(unknown)")
        );
        println!("  User ID:  {}", session.user.id);
        if let Some(profile) = &state.profile {
            println!("  Name:     {}", profile.username);
        }
        if let Some(expires_at) = session.expires_at {
            println!("  Expires:  {}", expires_at.with_timezone(&chrono::Local));
        }

        if let Some(error) = controller.take_error() {
            println!();
            println!("{} {}", "!".yellow(), error);
        }

        controller.shutdown();
        Ok(())
    }
}
