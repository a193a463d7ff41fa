mod config_cmd;
mod dashboard;
mod login;
mod logout;
mod measure;
mod stats;
mod training;
mod whoami;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::SupabaseBackend;
use crate::config::Config;
use crate::session::SessionController;

pub use dashboard::DashboardCommand;
pub use login::{LoginCommand, SignupCommand};
pub use logout::LogoutCommand;
pub use measure::MeasureCommand;
pub use stats::StatsCommand;
pub use training::LogCommand;
pub use whoami::WhoamiCommand;

#[derive(Parser)]
#[command(name = "strongflow")]
#[command(about = "Strength training and body measurement tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to configuration file
    #[arg(long, global = true, env = "STRONGFLOW_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in to StrongFlow
    Login(LoginCommand),

    /// Create a StrongFlow account
    Signup(SignupCommand),

    /// Sign out and forget the stored session
    Logout(LogoutCommand),

    /// Show current user information
    Whoami(WhoamiCommand),

    /// Record a training set
    Log(LogCommand),

    /// Record body measurements
    Measure(MeasureCommand),

    /// Show the dashboard summary
    Stats(StatsCommand),

    /// Launch interactive dashboard
    Dashboard(DashboardCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigSubcommands),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Show current configuration
    Show,

    /// Edit configuration file
    Edit,

    /// Initialize configuration with defaults
    Init {
        /// Overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Whether the command takes over the terminal
    pub fn is_interactive(&self) -> bool {
        matches!(self.command, Commands::Dashboard(_))
    }

    pub async fn execute(self) -> Result<()> {
        if self.verbose {
            tracing::debug!("Verbose mode enabled");
        }

        let config = self.config.as_deref();

        match self.command {
            Commands::Login(cmd) => cmd.execute(config).await,
            Commands::Signup(cmd) => cmd.execute(config).await,
            Commands::Logout(cmd) => cmd.execute(config).await,
            Commands::Whoami(cmd) => cmd.execute(config).await,
            Commands::Log(cmd) => cmd.execute(config).await,
            Commands::Measure(cmd) => cmd.execute(config).await,
            Commands::Stats(cmd) => cmd.execute(config).await,
            Commands::Dashboard(cmd) => cmd.execute(config).await,
            Commands::Config(subcmd) => match subcmd {
                ConfigSubcommands::Show => config_cmd::show_config(config).await,
                ConfigSubcommands::Edit => config_cmd::edit_config(config).await,
                ConfigSubcommands::Init { force } => config_cmd::init_config(config, force).await,
            },
            Commands::Completions { shell } => {
                generate_completions(shell);
                Ok(())
            }
        }
    }
}

/// Build a controller from the config and load the stored session
pub(crate) async fn connect(config: Option<&Path>) -> Result<SessionController<SupabaseBackend>> {
    let config = Config::resolve(config)?;
    let defaults = config.profile.clone();
    let backend = SupabaseBackend::new(config)?;

    let mut controller = SessionController::new(backend, defaults);
    controller
        .start()
        .await
        .context("Failed to restore session")?;

    Ok(controller)
}

/// Like `connect`, but fails when no session is stored
pub(crate) async fn connect_authenticated(
    config: Option<&Path>,
) -> Result<SessionController<SupabaseBackend>> {
    let controller = connect(config).await?;
    if controller.session().is_none() {
        anyhow::bail!("You are not logged in. Use 'strongflow login' to authenticate.");
    }
    Ok(controller)
}

/// Spinner shown while waiting on the backend
pub(crate) fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.magenta} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn generate_completions(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
