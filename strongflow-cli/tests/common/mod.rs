#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use strongflow_cli::api::{
    ApiError, AuthEvent, AuthEvents, Backend, Collection, Query, SignUpOutcome, Subscription,
};
use strongflow_cli::models::{Credentials, Session, User};

/// In-memory stand-in for the hosted backend
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<FakeState>,
    events: AuthEvents,
}

#[derive(Default)]
pub struct FakeState {
    pub accounts: HashMap<String, (String, Uuid)>,
    pub session: Option<Session>,
    pub rows: HashMap<Collection, Vec<Value>>,
    pub inserts: HashMap<Collection, usize>,
    pub selects: usize,
    pub sign_outs: usize,
    pub fail_selects: bool,
    pub fail_inserts: bool,
    pub fail_sign_out: bool,
    pub require_confirmation: bool,
    seq: i64,
}

impl FakeState {
    fn next_seq(&mut self) -> i64 {
        self.seq += 1;
        self.seq
    }
}

pub fn session_for(email: &str, user_id: Uuid, token: &str) -> Session {
    Session {
        access_token: token.to_string(),
        refresh_token: format!("{}-refresh", token),
        expires_at: Some(Utc::now() + Duration::hours(1)),
        user: User {
            id: user_id,
            email: Some(email.to_string()),
        },
    }
}

fn matches(row: &Value, column: &str, expected: &str) -> bool {
    match row.get(column) {
        Some(Value::String(s)) => s == expected,
        Some(other) => other.to_string() == expected,
        None => false,
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Register an account and return its user id
    pub fn with_account(self, email: &str, password: &str) -> (Self, Uuid) {
        let user_id = Uuid::new_v4();
        self.state()
            .accounts
            .insert(email.to_string(), (password.to_string(), user_id));
        (self, user_id)
    }

    /// Pretend a session was stored by an earlier run
    pub fn with_stored_session(self, session: Session) -> Self {
        self.state().session = Some(session);
        self
    }

    /// Add a row directly, bypassing insert counters
    pub fn seed(&self, collection: Collection, mut row: Value) {
        let mut state = self.state();
        let seq = state.next_seq();
        if row.get("id").is_none() {
            row["id"] = json!(seq);
        }
        if row.get("created_at").is_none() {
            let created_at = Utc.timestamp_opt(1_700_000_000 + seq * 86_400, 0).unwrap();
            row["created_at"] = json!(created_at.to_rfc3339());
        }
        state.rows.entry(collection).or_default().push(row);
    }

    pub fn rows(&self, collection: Collection) -> Vec<Value> {
        self.state().rows.get(&collection).cloned().unwrap_or_default()
    }

    pub fn insert_count(&self, collection: Collection) -> usize {
        self.state().inserts.get(&collection).copied().unwrap_or(0)
    }

    /// Simulate the backend rotating tokens on its own
    pub fn refresh_token(&self) -> Session {
        let session = {
            let mut state = self.state();
            let seq = state.next_seq();
            let session = state.session.clone().expect("no session to refresh");
            let refreshed = session_for(
                session.user.email.as_deref().unwrap_or_default(),
                session.user_id(),
                &format!("token-{}", seq),
            );
            state.session = Some(refreshed.clone());
            refreshed
        };
        self.events.emit(AuthEvent::TokenRefreshed(session.clone()));
        session
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, ApiError> {
        let session = {
            let mut state = self.state();
            if state.accounts.contains_key(&credentials.email) {
                return Err(ApiError::AuthenticationFailed(
                    "User already registered".to_string(),
                ));
            }
            let user_id = Uuid::new_v4();
            state.accounts.insert(
                credentials.email.clone(),
                (credentials.password.clone(), user_id),
            );
            if state.require_confirmation {
                return Ok(SignUpOutcome::ConfirmationRequired {
                    email: credentials.email.clone(),
                });
            }
            let session = session_for(&credentials.email, user_id, "signup-token");
            state.session = Some(session.clone());
            session
        };

        self.events.emit(AuthEvent::SignedIn(session.clone()));
        Ok(SignUpOutcome::SignedIn(session))
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        let session = {
            let mut state = self.state();
            let user_id = match state.accounts.get(&credentials.email) {
                Some((password, id)) if *password == credentials.password => *id,
                _ => {
                    return Err(ApiError::AuthenticationFailed(
                        "Invalid login credentials".to_string(),
                    ))
                }
            };
            let session = session_for(&credentials.email, user_id, "access-token");
            state.session = Some(session.clone());
            session
        };

        self.events.emit(AuthEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), ApiError> {
        let fail = {
            let mut state = self.state();
            state.sign_outs += 1;
            state.session = None;
            state.fail_sign_out
        };
        self.events.emit(AuthEvent::SignedOut);

        if fail {
            Err(ApiError::NetworkError("connection reset".to_string()))
        } else {
            Ok(())
        }
    }

    async fn current_session(&self) -> Result<Option<Session>, ApiError> {
        Ok(self.state().session.clone())
    }

    fn subscribe(&self) -> Subscription {
        self.events.subscribe()
    }

    async fn select(&self, query: &Query) -> Result<Vec<Value>, ApiError> {
        let mut state = self.state();
        state.selects += 1;
        if state.fail_selects {
            return Err(ApiError::NetworkError("backend unreachable".to_string()));
        }

        let mut rows: Vec<Value> = state
            .rows
            .get(&query.collection)
            .map(|rows| {
                rows.iter()
                    .filter(|row| query.filters.iter().all(|(c, v)| matches(row, c, v)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let a = a.get(&order.column).map(|v| v.to_string()).unwrap_or_default();
                let b = b.get(&order.column).map(|v| v.to_string()).unwrap_or_default();
                if order.descending {
                    b.cmp(&a)
                } else {
                    a.cmp(&b)
                }
            });
        }

        Ok(rows)
    }

    async fn select_one(&self, query: &Query) -> Result<Option<Value>, ApiError> {
        Ok(self.select(query).await?.into_iter().next())
    }

    async fn insert(&self, collection: Collection, record: Value) -> Result<Value, ApiError> {
        if self.state().fail_inserts {
            return Err(ApiError::ServerError("insert rejected".to_string()));
        }

        *self.state().inserts.entry(collection).or_default() += 1;
        self.seed(collection, record);

        self.rows(collection)
            .pop()
            .ok_or_else(|| ApiError::InvalidResponse("no row".to_string()))
    }
}
