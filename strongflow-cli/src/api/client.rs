use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::{ApiError, AuthEvent, AuthEvents, Backend, Collection, Query, SignUpOutcome, Subscription};
use crate::config::Config;
use crate::models::{Credentials, Session, User};

/// Token refresh request
#[derive(Debug, Serialize)]
struct RefreshTokenRequest<'a> {
    refresh_token: &'a str,
}

/// Session payload returned by the token and signup endpoints
#[derive(Debug, Deserialize)]
struct SessionResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: User,
}

impl From<SessionResponse> for Session {
    fn from(resp: SessionResponse) -> Self {
        let expires_at = match (resp.expires_at, resp.expires_in) {
            (Some(ts), _) => Utc.timestamp_opt(ts, 0).single(),
            (None, Some(secs)) => Some(Utc::now() + ChronoDuration::seconds(secs)),
            (None, None) => None,
        };

        Session {
            access_token: resp.access_token,
            refresh_token: resp.refresh_token,
            expires_at,
            user: resp.user,
        }
    }
}

/// HTTP client for a Supabase-compatible backend (auth under `/auth/v1`, tables under `/rest/v1`)
pub struct SupabaseBackend {
    client: Client,
    base_url: String,
    anon_key: String,
    config: Arc<Mutex<Config>>,
    events: AuthEvents,
    /// Held for the whole refresh so concurrent 401s share one token exchange
    refresh_lock: tokio::sync::Mutex<()>,
}

impl SupabaseBackend {
    /// Create a new backend client
    pub fn new(config: Config) -> Result<Self> {
        let backend = config.effective_backend();
        let timeout = Duration::from_secs(backend.timeout_seconds);
        let base_url = backend.url.trim_end_matches('/').to_string();
        let anon_key = backend.anon_key;

        if anon_key.is_empty() {
            tracing::warn!("No anon key configured; the backend will likely reject requests");
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url,
            anon_key,
            config: Arc::new(Mutex::new(config)),
            events: AuthEvents::default(),
            refresh_lock: tokio::sync::Mutex::new(()),
        })
    }

    /// Snapshot of the current configuration, including stored tokens
    pub fn config(&self) -> Config {
        self.lock_config().clone()
    }

    fn lock_config(&self) -> MutexGuard<'_, Config> {
        self.config.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn rest_url(&self, collection: Collection) -> String {
        format!("{}/rest/v1/{}", self.base_url, collection.table())
    }

    /// Write the session (or its absence) to the config file
    fn persist_session(&self, session: Option<&Session>) -> Result<(), ApiError> {
        let mut config = self.lock_config();
        match session {
            Some(session) => config.set_session(session),
            None => config.clear_session(),
        }
        config
            .save()
            .map_err(|e| ApiError::Config(format!("{:#}", e)))
    }

    fn stored_session(&self) -> Option<Session> {
        self.lock_config().session()
    }

    async fn token_request<T: Serialize + ?Sized>(
        &self,
        grant_type: &str,
        body: &T,
    ) -> Result<Session, ApiError> {
        let response = self
            .client
            .post(self.auth_url("token"))
            .query(&[("grant_type", grant_type)])
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let session: SessionResponse = response.json().await?;
            Ok(session.into())
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ApiError::from_auth_body(status, &error_text))
        }
    }

    /// Exchange the stored refresh token for a new session and save it
    async fn refresh_session(&self) -> Result<Session, ApiError> {
        let refresh_token = {
            let config = self.lock_config();
            if config.auth.refresh_token.is_empty() {
                return Err(ApiError::NotAuthenticated);
            }
            config.auth.refresh_token.clone()
        };

        tracing::debug!("Attempting to refresh access token");

        let session = self
            .token_request(
                "refresh_token",
                &RefreshTokenRequest {
                    refresh_token: &refresh_token,
                },
            )
            .await?;

        self.persist_session(Some(&session))?;
        self.events.emit(AuthEvent::TokenRefreshed(session.clone()));

        tracing::info!("Successfully refreshed and saved access token");
        Ok(session)
    }

    /// Refresh after `rejected` was refused, unless another request already replaced it
    async fn refresh_rejected(&self, rejected: &str) -> Result<Session, ApiError> {
        let _guard = self.refresh_lock.lock().await;

        if let Some(session) = self
            .stored_session()
            .filter(|s| s.access_token != rejected)
        {
            tracing::debug!("Access token already refreshed, reusing it");
            return Ok(session);
        }

        self.refresh_session().await
    }

    /// Refresh the stored session if it is still expired once the refresh lock is held
    async fn refresh_expired(&self) -> Result<Option<Session>, ApiError> {
        let _guard = self.refresh_lock.lock().await;

        match self.stored_session() {
            Some(session) if !session.is_expired() => Ok(Some(session)),
            Some(_) => self.refresh_session().await.map(Some),
            None => Ok(None),
        }
    }

    /// Send an authenticated request, refreshing the token once on 401
    async fn send_authorized<F>(&self, build: F) -> Result<Response, ApiError>
    where
        F: Fn(&str) -> RequestBuilder,
    {
        let token = {
            let config = self.lock_config();
            if !config.is_authenticated() {
                return Err(ApiError::NotAuthenticated);
            }
            config.auth.access_token.clone()
        };

        let response = build(&token)
            .header("apikey", &self.anon_key)
            .bearer_auth(&token)
            .send()
            .await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        tracing::debug!("Received 401, attempting token refresh");
        let session = self.refresh_rejected(&token).await?;

        let response = build(&session.access_token)
            .header("apikey", &self.anon_key)
            .bearer_auth(&session.access_token)
            .send()
            .await?;

        Ok(response)
    }

    async fn read_records(response: Response) -> Result<Vec<Value>, ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ApiError::from_body(status, &error_text))
        }
    }
}

#[async_trait]
impl Backend for SupabaseBackend {
    async fn sign_up(&self, credentials: &Credentials) -> Result<SignUpOutcome, ApiError> {
        tracing::debug!("Signing up {}", credentials.email);

        let response = self
            .client
            .post(self.auth_url("signup"))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .json(credentials)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ApiError::from_auth_body(status, &error_text));
        }

        let body: Value = response.json().await?;

        if body.get("access_token").is_none() {
            let email = body
                .get("email")
                .and_then(Value::as_str)
                .unwrap_or(&credentials.email)
                .to_string();
            tracing::info!("Account {} created, confirmation pending", email);
            return Ok(SignUpOutcome::ConfirmationRequired { email });
        }

        let session: Session = serde_json::from_value::<SessionResponse>(body)?.into();
        self.persist_session(Some(&session))?;
        self.events.emit(AuthEvent::SignedIn(session.clone()));

        tracing::info!("Account {} created and signed in", credentials.email);
        Ok(SignUpOutcome::SignedIn(session))
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        tracing::debug!("Signing in as {}", credentials.email);

        let session = self.token_request("password", credentials).await?;
        self.persist_session(Some(&session))?;
        self.events.emit(AuthEvent::SignedIn(session.clone()));

        tracing::info!("Successfully signed in as {}", credentials.email);
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), ApiError> {
        let token = self.lock_config().auth.access_token.clone();

        let result = if token.is_empty() {
            Ok(())
        } else {
            match self
                .client
                .post(self.auth_url("logout"))
                .header("apikey", &self.anon_key)
                .bearer_auth(&token)
                .send()
                .await
            {
                Ok(response) if response.status().is_success() => Ok(()),
                // An already expired token is as good as revoked
                Ok(response) if response.status() == StatusCode::UNAUTHORIZED => Ok(()),
                Ok(response) => {
                    let status = response.status();
                    let error_text = response.text().await.unwrap_or_default();
                    Err(ApiError::from_body(status, &error_text))
                }
                Err(e) => Err(e.into()),
            }
        };

        // Local session is dropped whatever the backend answered
        self.persist_session(None)?;
        self.events.emit(AuthEvent::SignedOut);

        tracing::info!("Signed out");
        result
    }

    async fn current_session(&self) -> Result<Option<Session>, ApiError> {
        let session = match self.stored_session() {
            Some(session) => session,
            None => return Ok(None),
        };

        if !session.is_expired() {
            return Ok(Some(session));
        }

        tracing::debug!("Stored session expired, refreshing");
        match self.refresh_expired().await {
            Ok(session) => Ok(session),
            Err(e) if e.is_auth() => {
                tracing::warn!("Stored session could not be refreshed: {}", e);
                self.persist_session(None)?;
                self.events.emit(AuthEvent::SignedOut);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn subscribe(&self) -> Subscription {
        self.events.subscribe()
    }

    async fn select(&self, query: &Query) -> Result<Vec<Value>, ApiError> {
        let url = self.rest_url(query.collection);
        let params = query.params(None);

        tracing::debug!("Selecting from {}", query.collection);

        let response = self
            .send_authorized(|_| self.client.get(&url).query(&params))
            .await?;

        Self::read_records(response).await
    }

    async fn select_one(&self, query: &Query) -> Result<Option<Value>, ApiError> {
        let url = self.rest_url(query.collection);
        let params = query.params(Some(1));

        tracing::debug!("Selecting one from {}", query.collection);

        let response = self
            .send_authorized(|_| self.client.get(&url).query(&params))
            .await?;

        Ok(Self::read_records(response).await?.into_iter().next())
    }

    async fn insert(&self, collection: Collection, record: Value) -> Result<Value, ApiError> {
        let url = self.rest_url(collection);
        let body = Value::Array(vec![record]);

        tracing::debug!("Inserting into {}", collection);

        let response = self
            .send_authorized(|_| {
                self.client
                    .post(&url)
                    .header("Prefer", "return=representation")
                    .json(&body)
            })
            .await?;

        Self::read_records(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::InvalidResponse(format!("insert into {} returned no rows", collection)))
    }
}
