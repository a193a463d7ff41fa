use anyhow::Result;
use clap::Args;
use colored::Colorize;
use dialoguer::Input;
use std::path::Path;

use crate::models::MeasurementEntry;

#[derive(Args)]
pub struct MeasureCommand {
    /// Glutes circumference in centimetres
    #[arg(short, long)]
    glutes: Option<String>,

    /// Thigh circumference in centimetres
    #[arg(short, long)]
    thigh: Option<String>,
}

impl MeasureCommand {
    fn entry(self) -> Result<MeasurementEntry> {
        let glutes = match self.glutes {
            Some(glutes) => glutes,
            None => Input::new().with_prompt("Glutes (cm)").interact_text()?,
        };
        let thigh = match self.thigh {
            Some(thigh) => thigh,
            None => Input::new().with_prompt("Thigh (cm)").interact_text()?,
        };

        Ok(MeasurementEntry::from_inputs(&glutes, &thigh)?)
    }

    pub async fn execute(self, config: Option<&Path>) -> Result<()> {
        let entry = self.entry()?;
        let mut controller = super::connect_authenticated(config).await?;

        let pb = super::spinner("Saving measurements...");
        let result = controller.save_measurement(entry).await;
        pb.finish_and_clear();
        controller.shutdown();

        match result {
            Ok(m) => {
                println!(
                    "{} Measurements updated 🍑 glutes {} cm · thigh {} cm",
                    "✓".green(),
                    m.glutes_cm,
                    m.thigh_cm
                );
                Ok(())
            }
            Err(e) => {
                println!("{} Measurement not saved: {}", "✗".red(), e);
                Err(e.into())
            }
        }
    }
}
