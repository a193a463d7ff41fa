use uuid::Uuid;

use super::data;
use crate::api::{ApiError, AuthEvent, Backend, SignUpOutcome, Subscription};
use crate::config::ProfileDefaults;
use crate::models::{
    Credentials, Measurement, MeasurementEntry, Profile, Session, TrainingEntry, TrainingLog,
};
use crate::stats::DashboardSummary;

/// Two-state authentication machine
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Authenticated(Session),
}

impl AuthState {
    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::Authenticated(session) => Some(session),
            AuthState::Unauthenticated => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }
}

/// Everything views read: the session and the collections fetched for it
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub auth: AuthState,
    pub profile: Option<Profile>,
    pub logs: Vec<TrainingLog>,
    pub measurements: Vec<Measurement>,
    /// Most recent fetch failure, for display
    pub last_error: Option<String>,
}

/// Owns the session and the fetched collections, and applies session changes
pub struct SessionController<B: Backend> {
    backend: B,
    profile_defaults: ProfileDefaults,
    state: AppState,
    subscription: Option<Subscription>,
}

impl<B: Backend> SessionController<B> {
    pub fn new(backend: B, profile_defaults: ProfileDefaults) -> Self {
        Self {
            backend,
            profile_defaults,
            state: AppState::default(),
            subscription: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn session(&self) -> Option<&Session> {
        self.state.auth.session()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary::new(
            self.state.profile.as_ref(),
            &self.state.logs,
            &self.state.measurements,
        )
    }

    /// Take the pending fetch failure message, if any
    pub fn take_error(&mut self) -> Option<String> {
        self.state.last_error.take()
    }

    /// Load the stored session and start listening for session changes
    pub async fn start(&mut self) -> Result<(), ApiError> {
        let session = self.backend.current_session().await?;

        if self.subscription.is_none() {
            self.subscription = Some(self.backend.subscribe());
        }

        self.replace_session(session).await;
        Ok(())
    }

    /// Apply every notification received since the last call
    pub async fn pump_events(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.subscription.as_mut().and_then(Subscription::try_next) {
            self.apply(event).await;
            handled += 1;
        }
        handled
    }

    pub async fn apply(&mut self, event: AuthEvent) {
        match event {
            AuthEvent::SignedIn(session) => {
                tracing::debug!("Session event: signed in as {}", session.user_id());
                self.replace_session(Some(session)).await;
            }
            AuthEvent::TokenRefreshed(session) => {
                tracing::debug!("Session event: token refreshed for {}", session.user_id());
                self.replace_session(Some(session)).await;
            }
            AuthEvent::SignedOut => {
                tracing::debug!("Session event: signed out");
                self.clear();
            }
        }
    }

    async fn replace_session(&mut self, session: Option<Session>) {
        match session {
            Some(session) => {
                let user_id = session.user_id();
                // Data fetched for another user must not survive a failed refetch
                if self.session().is_some_and(|s| s.user_id() != user_id) {
                    self.clear();
                }
                self.state.auth = AuthState::Authenticated(session);
                self.refresh_all_for(user_id).await;
            }
            None => self.clear(),
        }
    }

    /// Drop the session and everything fetched for it
    fn clear(&mut self) {
        self.state = AppState::default();
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<(), ApiError> {
        let session = self
            .backend
            .sign_in(&Credentials::new(email, password))
            .await?;

        if self.pump_events().await == 0 {
            self.apply(AuthEvent::SignedIn(session)).await;
        }
        Ok(())
    }

    pub async fn sign_up(&mut self, email: &str, password: &str) -> Result<SignUpOutcome, ApiError> {
        let outcome = self
            .backend
            .sign_up(&Credentials::new(email, password))
            .await?;

        if let SignUpOutcome::SignedIn(session) = &outcome {
            if self.pump_events().await == 0 {
                self.apply(AuthEvent::SignedIn(session.clone())).await;
            }
        }
        Ok(outcome)
    }

    /// Clear local state immediately, then revoke the session on the backend
    pub async fn sign_out(&mut self) {
        self.clear();

        if let Err(e) = self.backend.sign_out().await {
            tracing::warn!("Sign-out request failed: {}", e);
        }

        self.pump_events().await;
    }

    /// Refetch profile, logs and measurements for the current session
    pub async fn refresh_all(&mut self) {
        if let Some(user_id) = self.session().map(Session::user_id) {
            self.refresh_all_for(user_id).await;
        }
    }

    async fn refresh_all_for(&mut self, user_id: Uuid) {
        let (profile, logs, measurements) = tokio::join!(
            data::fetch_profile(&self.backend, user_id, &self.profile_defaults),
            data::fetch_logs(&self.backend, user_id),
            data::fetch_measurements(&self.backend, user_id),
        );

        match profile {
            Ok(profile) => self.state.profile = Some(profile),
            Err(e) => self.record_failure("profile", &e),
        }
        match logs {
            Ok(logs) => self.state.logs = logs,
            Err(e) => self.record_failure("training logs", &e),
        }
        match measurements {
            Ok(measurements) => self.state.measurements = measurements,
            Err(e) => self.record_failure("measurements", &e),
        }
    }

    async fn reload_logs(&mut self, user_id: Uuid) {
        match data::fetch_logs(&self.backend, user_id).await {
            Ok(logs) => self.state.logs = logs,
            Err(e) => self.record_failure("training logs", &e),
        }
    }

    async fn reload_measurements(&mut self, user_id: Uuid) {
        match data::fetch_measurements(&self.backend, user_id).await {
            Ok(measurements) => self.state.measurements = measurements,
            Err(e) => self.record_failure("measurements", &e),
        }
    }

    fn record_failure(&mut self, what: &str, err: &ApiError) {
        tracing::warn!("Failed to load {}: {}", what, err);
        self.state.last_error = Some(format!("Could not load {}: {}", what, err));
    }

    fn require_user(&self) -> Result<Uuid, ApiError> {
        self.session()
            .map(Session::user_id)
            .ok_or(ApiError::NotAuthenticated)
    }

    /// Insert a training log, then refetch the list; no refetch if the insert failed
    pub async fn save_log(&mut self, entry: TrainingEntry) -> Result<TrainingLog, ApiError> {
        let user_id = self.require_user()?;

        let saved = data::insert_log(&self.backend, &entry.for_user(user_id))
            .await
            .map_err(|e| {
                tracing::warn!("Failed to save training log: {}", e);
                e
            })?;

        tracing::info!("Saved training log {}", saved.id);
        self.reload_logs(user_id).await;
        Ok(saved)
    }

    /// Insert a measurement, then refetch the list; no refetch if the insert failed
    pub async fn save_measurement(
        &mut self,
        entry: MeasurementEntry,
    ) -> Result<Measurement, ApiError> {
        let user_id = self.require_user()?;

        let saved = data::insert_measurement(&self.backend, &entry.for_user(user_id))
            .await
            .map_err(|e| {
                tracing::warn!("Failed to save measurement: {}", e);
                e
            })?;

        tracing::info!("Saved measurement {}", saved.id);
        self.reload_measurements(user_id).await;
        Ok(saved)
    }

    /// Release the session-change subscription
    pub fn shutdown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }
    }
}
