//! Pass-through reads and writes of the three user collections.

use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::api::{ApiError, Backend, Collection, Query};
use crate::config::ProfileDefaults;
use crate::models::{Measurement, NewMeasurement, NewTrainingLog, Profile, TrainingLog};

fn decode_all<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, ApiError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(ApiError::from))
        .collect()
}

/// Read the user's profile, inserting one with default values if none exists
pub async fn fetch_profile<B: Backend + ?Sized>(
    backend: &B,
    user_id: Uuid,
    defaults: &ProfileDefaults,
) -> Result<Profile, ApiError> {
    let query = Query::new(Collection::Profiles).eq("id", user_id);

    if let Some(row) = backend.select_one(&query).await? {
        return Ok(serde_json::from_value(row)?);
    }

    tracing::info!("No profile for user {}, creating default profile", user_id);

    let profile = Profile::with_defaults(user_id, defaults);
    let row = backend
        .insert(Collection::Profiles, serde_json::to_value(&profile)?)
        .await?;

    Ok(serde_json::from_value(row)?)
}

/// All training logs of the user, newest first
pub async fn fetch_logs<B: Backend + ?Sized>(
    backend: &B,
    user_id: Uuid,
) -> Result<Vec<TrainingLog>, ApiError> {
    let query = Query::new(Collection::TrainingLogs)
        .eq("user_id", user_id)
        .order_desc("created_at");

    decode_all(backend.select(&query).await?)
}

/// All measurements of the user, newest first
pub async fn fetch_measurements<B: Backend + ?Sized>(
    backend: &B,
    user_id: Uuid,
) -> Result<Vec<Measurement>, ApiError> {
    let query = Query::new(Collection::Measurements)
        .eq("user_id", user_id)
        .order_desc("created_at");

    decode_all(backend.select(&query).await?)
}

pub async fn insert_log<B: Backend + ?Sized>(
    backend: &B,
    log: &NewTrainingLog,
) -> Result<TrainingLog, ApiError> {
    let row = backend
        .insert(Collection::TrainingLogs, serde_json::to_value(log)?)
        .await?;
    Ok(serde_json::from_value(row)?)
}

pub async fn insert_measurement<B: Backend + ?Sized>(
    backend: &B,
    measurement: &NewMeasurement,
) -> Result<Measurement, ApiError> {
    let row = backend
        .insert(Collection::Measurements, serde_json::to_value(measurement)?)
        .await?;
    Ok(serde_json::from_value(row)?)
}
