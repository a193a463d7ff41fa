use anyhow::Result;
use clap::Args;
use colored::Colorize;
use dialoguer::{Input, Password};
use std::path::Path;

use crate::api::SignUpOutcome;

#[derive(Args)]
pub struct LoginCommand {
    /// Account email; prompted for when omitted
    #[arg(short, long)]
    email: Option<String>,
}

#[derive(Args)]
pub struct SignupCommand {
    /// Account email; prompted for when omitted
    #[arg(short, long)]
    email: Option<String>,
}

fn prompt_credentials(email: Option<String>, confirm: bool) -> Result<(String, String)> {
    let email = match email {
        Some(email) => email,
        None => Input::new().with_prompt("Email").interact_text()?,
    };

    let mut prompt = Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    let password = prompt.interact()?;

    Ok((email.trim().to_string(), password))
}

impl LoginCommand {
    pub async fn execute(self, config: Option<&Path>) -> Result<()> {
        println!("💎 StrongFlow - Login");
        println!();

        let (email, password) = prompt_credentials(self.email, false)?;
        println!();

        let mut controller = super::connect(config).await?;
        let pb = super::spinner(&format!("Signing in as {}...", email));
        let result = controller.sign_in(&email, &password).await;
        pb.finish_and_clear();

        match result {
            Ok(()) => {
                let summary = controller.summary();
                println!("{} Login successful!", "✓".green());
                println!();
                println!("Welcome, {}! ✨", summary.display_name);
                println!();
                println!("You can now use StrongFlow commands.");
                controller.shutdown();
                Ok(())
            }
            Err(e) => {
                println!("{} Login failed: {}", "✗".red(), e);
                controller.shutdown();
                Err(e.into())
            }
        }
    }
}

impl SignupCommand {
    pub async fn execute(self, config: Option<&Path>) -> Result<()> {
        println!("💎 StrongFlow - Create account");
        println!();

        let (email, password) = prompt_credentials(self.email, true)?;
        println!();

        let mut controller = super::connect(config).await?;
        let pb = super::spinner("Creating account...");
        let result = controller.sign_up(&email, &password).await;
        pb.finish_and_clear();
        controller.shutdown();

        match result {
            Ok(SignUpOutcome::SignedIn(_)) => {
                println!("{} Account created and signed in!", "✓".green());
                Ok(())
            }
            Ok(SignUpOutcome::ConfirmationRequired { email }) => {
                println!("{} Account created!", "✓".green());
                println!();
                println!("Confirm the address {} and then run 'strongflow login'.", email);
                Ok(())
            }
            Err(e) => {
                println!("{} Sign-up failed: {}", "✗".red(), e);
                Err(e.into())
            }
        }
    }
}
