use anyhow::Result;
use clap::Parser;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use strongflow_cli::commands::Cli;
use strongflow_cli::config::Config;

fn init_logging(cli: &Cli) {
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    // The dashboard owns the terminal, so its logs go to a file
    if cli.is_interactive() {
        let log_file = Config::config_dir().ok().and_then(|dir| {
            std::fs::create_dir_all(&dir).ok()?;
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join("strongflow.log"))
                .ok()
        });

        if let Some(file) = log_file {
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
            return;
        }
    }

    // stderr keeps stdout clean for command output
    builder.with_writer(std::io::stderr).init();
}

fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    init_logging(&cli);

    // Initialize tokio runtime
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async { cli.execute().await })
}
