use anyhow::Result;
use clap::Args;
use colored::Colorize;
use dialoguer::{Input, Select};
use std::path::Path;

use crate::models::{Exercise, TrainingEntry, DEFAULT_FEELING};

#[derive(Args)]
pub struct LogCommand {
    /// Exercise (Sentadilla, "Hip Thrust", "Peso Muerto", Zancadas)
    #[arg(short, long)]
    exercise: Option<Exercise>,

    /// Load in kilograms
    #[arg(short, long)]
    weight: Option<String>,

    /// Repetitions
    #[arg(short, long)]
    reps: Option<String>,

    /// How the set felt
    #[arg(short, long, default_value = DEFAULT_FEELING)]
    feeling: String,
}

impl LogCommand {
    /// Fill in whatever was not given on the command line
    fn entry(self) -> Result<TrainingEntry> {
        let exercise = match self.exercise {
            Some(exercise) => exercise,
            None => {
                let names: Vec<&str> = Exercise::ALL.iter().map(Exercise::name).collect();
                let idx = Select::new()
                    .with_prompt("Exercise")
                    .items(&names)
                    .default(0)
                    .interact()?;
                Exercise::ALL[idx]
            }
        };

        let weight = match self.weight {
            Some(weight) => weight,
            None => Input::new().with_prompt("Weight (kg)").interact_text()?,
        };
        let reps = match self.reps {
            Some(reps) => reps,
            None => Input::new().with_prompt("Reps").interact_text()?,
        };

        Ok(TrainingEntry::from_inputs(exercise, &weight, &reps)?.with_feeling(self.feeling))
    }

    pub async fn execute(self, config: Option<&Path>) -> Result<()> {
        let entry = self.entry()?;
        let mut controller = super::connect_authenticated(config).await?;

        let pb = super::spinner("Saving training...");
        let result = controller.save_log(entry).await;
        pb.finish_and_clear();
        controller.shutdown();

        match result {
            Ok(log) => {
                println!(
                    "{} Training saved ✨ {} · {} kg × {}",
                    "✓".green(),
                    log.exercise_name,
                    log.weight,
                    log.reps
                );
                Ok(())
            }
            Err(e) => {
                println!("{} Training not saved: {}", "✗".red(), e);
                Err(e.into())
            }
        }
    }
}
