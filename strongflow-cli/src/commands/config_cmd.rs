use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use std::process::Command;

use crate::config::Config;

pub async fn show_config(path: Option<&Path>) -> Result<()> {
    let mut config = Config::resolve(path)?;
    // Tokens stay out of the terminal
    if config.is_authenticated() {
        config.auth.access_token = "********".to_string();
        config.auth.refresh_token = "********".to_string();
    }
    let config_str = toml::to_string_pretty(&config)?;

    println!("Current Configuration ({})", config.path()?.display());
    println!("────────────────────────────────");
    println!();
    println!("{}", config_str);

    let overrides = config.overrides();
    if let Some(url) = &overrides.url {
        println!("{} STRONGFLOW_URL overrides backend.url: {}", "!".yellow(), url);
    }
    if overrides.anon_key.is_some() {
        println!("{} STRONGFLOW_ANON_KEY overrides backend.anon_key", "!".yellow());
    }

    Ok(())
}

pub async fn edit_config(path: Option<&Path>) -> Result<()> {
    let config = Config::resolve(path)?;
    let config_file = config.path()?;

    // Ensure config file exists
    if !config_file.exists() {
        config.save()?;
    }

    // Open in default editor
    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vim".to_string());

    Command::new(editor).arg(&config_file).status()?;

    println!("{} Configuration saved!", "✓".green());

    Ok(())
}

pub async fn init_config(path: Option<&Path>, force: bool) -> Result<()> {
    let config_file = match path {
        Some(path) => path.to_path_buf(),
        None => Config::config_file()?,
    };

    if config_file.exists() && !force {
        println!(
            "Configuration file already exists at: {}",
            config_file.display()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    Config::default_at(&config_file).save()?;

    println!(
        "{} Configuration initialized at: {}",
        "✓".green(),
        config_file.display()
    );
    println!();
    println!("You can edit it with: strongflow config edit");

    Ok(())
}
