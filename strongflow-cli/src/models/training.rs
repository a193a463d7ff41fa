use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{parse_number, InputError};

/// Feeling tag recorded when none is chosen
pub const DEFAULT_FEELING: &str = "Buena";

/// Exercises offered by the training form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exercise {
    #[serde(rename = "Sentadilla")]
    Sentadilla,
    #[serde(rename = "Hip Thrust")]
    HipThrust,
    #[serde(rename = "Peso Muerto")]
    PesoMuerto,
    #[serde(rename = "Zancadas")]
    Zancadas,
}

impl Exercise {
    pub const ALL: [Exercise; 4] = [
        Exercise::Sentadilla,
        Exercise::HipThrust,
        Exercise::PesoMuerto,
        Exercise::Zancadas,
    ];

    /// Name stored in the `exercise_name` column
    pub fn name(&self) -> &'static str {
        match self {
            Exercise::Sentadilla => "Sentadilla",
            Exercise::HipThrust => "Hip Thrust",
            Exercise::PesoMuerto => "Peso Muerto",
            Exercise::Zancadas => "Zancadas",
        }
    }

    /// Next exercise in form order, wrapping around
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|e| *e == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous exercise in form order, wrapping around
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|e| *e == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl Default for Exercise {
    fn default() -> Self {
        Exercise::Sentadilla
    }
}

impl std::fmt::Display for Exercise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Exercise {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_lowercase();

        match key.as_str() {
            "sentadilla" | "squat" => Ok(Exercise::Sentadilla),
            "hipthrust" => Ok(Exercise::HipThrust),
            "pesomuerto" | "deadlift" => Ok(Exercise::PesoMuerto),
            "zancadas" | "lunges" | "lunge" => Ok(Exercise::Zancadas),
            _ => Err(anyhow::anyhow!("Invalid exercise: {}", s)),
        }
    }
}

/// A row of the `training_logs` table as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingLog {
    #[serde(deserialize_with = "super::record_id")]
    pub id: String,
    pub exercise_name: String,
    pub weight: f64,
    pub reps: u32,
    #[serde(default)]
    pub feeling: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Values captured by the training form, before they are tied to a user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingEntry {
    pub exercise_name: Exercise,
    pub weight: f64,
    pub reps: u32,
    pub feeling: String,
}

impl TrainingEntry {
    pub fn new(exercise: Exercise, weight: f64, reps: u32) -> Self {
        Self {
            exercise_name: exercise,
            weight,
            reps,
            feeling: DEFAULT_FEELING.to_string(),
        }
    }

    /// Build an entry from raw form input; both numeric fields are required
    pub fn from_inputs(exercise: Exercise, weight: &str, reps: &str) -> Result<Self, InputError> {
        let weight: f64 = parse_number("weight", weight)?;
        let reps: u32 = parse_number("reps", reps)?;
        Ok(Self::new(exercise, weight, reps))
    }

    pub fn with_feeling(mut self, feeling: impl Into<String>) -> Self {
        self.feeling = feeling.into();
        self
    }

    /// Attach the owning user for insertion
    pub fn for_user(self, user_id: Uuid) -> NewTrainingLog {
        NewTrainingLog {
            user_id,
            entry: self,
        }
    }
}

/// Insert payload for `training_logs`
#[derive(Debug, Clone, Serialize)]
pub struct NewTrainingLog {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub entry: TrainingEntry,
}
