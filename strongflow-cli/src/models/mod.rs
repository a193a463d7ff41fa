pub mod measurement;
pub mod profile;
pub mod session;
pub mod training;

pub use measurement::{Measurement, MeasurementEntry, NewMeasurement};
pub use profile::Profile;
pub use session::{Credentials, Session, User};
pub use training::{Exercise, NewTrainingLog, TrainingEntry, TrainingLog, DEFAULT_FEELING};

use serde::{Deserialize, Deserializer};
use std::str::FromStr;
use thiserror::Error;

/// Rejected form input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{field} must be a number, got '{value}'")]
    Invalid { field: &'static str, value: String },
}

pub(crate) fn parse_number<T: FromStr>(field: &'static str, input: &str) -> Result<T, InputError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(InputError::Missing(field));
    }

    input.parse().map_err(|_| InputError::Invalid {
        field,
        value: input.to_string(),
    })
}

/// Deserialize a record id that the backend may send as a string or an integer
pub(crate) fn record_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}
