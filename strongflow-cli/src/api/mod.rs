use async_trait::async_trait;
use serde_json::Value;

use crate::models::{Credentials, Session};

mod client;
mod error;
mod events;

pub use client::SupabaseBackend;
pub use error::ApiError;
pub use events::{AuthEvent, AuthEvents, Subscription};

/// User-scoped record stores hosted by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Profiles,
    TrainingLogs,
    Measurements,
}

impl Collection {
    pub fn table(&self) -> &'static str {
        match self {
            Collection::Profiles => "profiles",
            Collection::TrainingLogs => "training_logs",
            Collection::Measurements => "measurements",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub descending: bool,
}

/// Equality-filtered, optionally ordered read of one collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub collection: Collection,
    pub filters: Vec<(String, String)>,
    pub order: Option<Order>,
}

impl Query {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            filters: Vec::new(),
            order: None,
        }
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters.push((column.to_string(), value.to_string()));
        self
    }

    pub fn order_desc(mut self, column: &str) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            descending: true,
        });
        self
    }

    /// Query string parameters in the table endpoint's filter syntax
    pub fn params(&self, limit: Option<usize>) -> Vec<(String, String)> {
        let mut params = vec![("select".to_string(), "*".to_string())];

        for (column, value) in &self.filters {
            params.push((column.clone(), format!("eq.{}", value)));
        }

        if let Some(order) = &self.order {
            let direction = if order.descending { "desc" } else { "asc" };
            params.push(("order".to_string(), format!("{}.{}", order.column, direction)));
        }

        if let Some(limit) = limit {
            params.push(("limit".to_string(), limit.to_string()));
        }

        params
    }
}

/// Result of a sign-up request
#[derive(Debug, Clone, PartialEq)]
pub enum SignUpOutcome {
    /// Account created and signed in
    SignedIn(Session),
    /// Account created; the backend requires email confirmation before sign-in
    ConfirmationRequired { email: String },
}

/// Identity and storage surface of the hosted backend
#[async_trait]
pub trait Backend: Send + Sync {
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, ApiError>;

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, ApiError>;

    async fn sign_out(&self) -> Result<(), ApiError>;

    async fn current_session(&self) -> Result<Option<Session>, ApiError>;

    /// Register for session-change notifications
    fn subscribe(&self) -> Subscription;

    async fn select(&self, query: &Query) -> Result<Vec<Value>, ApiError>;

    async fn select_one(&self, query: &Query) -> Result<Option<Value>, ApiError>;

    /// Insert one record and return it as stored
    async fn insert(&self, collection: Collection, record: Value) -> Result<Value, ApiError>;
}
