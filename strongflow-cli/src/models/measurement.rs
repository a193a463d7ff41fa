use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{parse_number, InputError};

/// A row of the `measurements` table, circumferences in centimetres
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    #[serde(deserialize_with = "super::record_id")]
    pub id: String,
    #[serde(rename = "gluteos")]
    pub glutes_cm: f64,
    #[serde(rename = "muslos")]
    pub thigh_cm: f64,
    pub created_at: DateTime<Utc>,
}

/// Values captured by the measurement form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementEntry {
    #[serde(rename = "gluteos")]
    pub glutes_cm: f64,
    #[serde(rename = "muslos")]
    pub thigh_cm: f64,
}

impl MeasurementEntry {
    pub fn new(glutes_cm: f64, thigh_cm: f64) -> Self {
        Self {
            glutes_cm,
            thigh_cm,
        }
    }

    /// Build an entry from raw form input; both fields are required
    pub fn from_inputs(glutes: &str, thigh: &str) -> Result<Self, InputError> {
        let glutes_cm = parse_number("glutes", glutes)?;
        let thigh_cm = parse_number("thigh", thigh)?;
        Ok(Self::new(glutes_cm, thigh_cm))
    }

    pub fn for_user(self, user_id: Uuid) -> NewMeasurement {
        NewMeasurement {
            user_id,
            entry: self,
        }
    }
}

/// Insert payload for `measurements`
#[derive(Debug, Clone, Serialize)]
pub struct NewMeasurement {
    pub user_id: Uuid,
    #[serde(flatten)]
    pub entry: MeasurementEntry,
}
