use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ProfileDefaults;

/// One row of the `profiles` table, keyed by the owning user's id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    pub current_weight: f64,
    pub target_weight: f64,
}

impl Profile {
    /// Build the profile inserted the first time a user signs in
    pub fn with_defaults(user_id: Uuid, defaults: &ProfileDefaults) -> Self {
        Self {
            id: user_id,
            username: defaults.username.clone(),
            current_weight: defaults.current_weight,
            target_weight: defaults.target_weight,
        }
    }
}
