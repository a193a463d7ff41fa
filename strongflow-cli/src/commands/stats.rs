use anyhow::Result;
use clap::Args;
use colored::Colorize;
use console::style;
use std::path::Path;

use crate::stats::DashboardSummary;

#[derive(Args)]
pub struct StatsCommand {
    /// Number of recent training logs to list
    #[arg(short, long, default_value = "5")]
    limit: usize,
}

const BAR_WIDTH: usize = 20;

fn bar(value: f64, max: f64) -> String {
    let filled = if max > 0.0 {
        ((value / max) * BAR_WIDTH as f64).round() as usize
    } else {
        0
    };
    "█".repeat(filled.min(BAR_WIDTH))
}

fn print_summary(summary: &DashboardSummary) {
    println!("Hi, {}! ✨", style(&summary.display_name).bold().magenta());
    println!();
    println!(
        "  Weight:     {} kg → {} kg ({:.1}%)",
        summary.current_weight, summary.target_weight, summary.progress_percent
    );
    println!("  Last squat: {} kg", summary.last_squat);
    println!("  Glutes:     {} cm", summary.last_glutes);
    println!();

    if summary.chart.is_empty() {
        println!("No training logged yet... let's go! 🔥");
        return;
    }

    println!("{}", style("Load trend").underlined());
    let max = summary
        .chart
        .iter()
        .map(|p| p.weight)
        .fold(0.0_f64, f64::max);
    for point in &summary.chart {
        println!("  {} {:<20} {} kg", point.label, bar(point.weight, max).magenta(), point.weight);
    }
}

impl StatsCommand {
    pub async fn execute(self, config: Option<&Path>) -> Result<()> {
        let mut controller = super::connect_authenticated(config).await?;
        let date_format = controller.backend().config().ui.date_format;

        if let Some(error) = controller.take_error() {
            println!("{} {}", "!".yellow(), error);
            println!();
        }

        print_summary(&controller.summary());

        let logs = &controller.state().logs;
        if !logs.is_empty() {
            println!();
            println!("{}", style("Recent training").underlined());
            for log in logs.iter().take(self.limit) {
                println!(
                    "  {}  {:<12} {:>6} kg × {:<3} {}",
                    log.created_at
                        .with_timezone(&chrono::Local)
                        .format(&date_format),
                    log.exercise_name,
                    log.weight,
                    log.reps,
                    log.feeling.as_deref().unwrap_or_default()
                );
            }
        }

        controller.shutdown();
        Ok(())
    }
}
