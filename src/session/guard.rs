//! Session guard
//!
//! Single authority on whether the current visitor is signed in and with
//! which role. Expired or unreadable sessions found during a check are torn
//! down on the spot and announced on the [`SessionEvents`] feed.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::sync::broadcast;
use validator::Validate;

use super::claims::TokenClaims;
use super::events::{LogoutReason, SessionEvent, SessionEvents};
use crate::{
    error::{AppError, AppResult},
    http::ApiClient,
    models::{
        user::{LoginRequest, LoginResponse},
        Role, Session, SessionState, UserProfile,
    },
    storage::TokenStore,
};

#[derive(Clone)]
pub struct SessionGuard {
    api: ApiClient,
    store: TokenStore,
    events: SessionEvents,
}

impl SessionGuard {
    /// Guard sharing the client's token store and event feed
    pub fn new(api: ApiClient) -> Self {
        let store = api.store().clone();
        let events = api.events().clone();
        Self { api, store, events }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated_at(Utc::now())
    }

    /// Token present and not expired as of `now`. Tokens whose payload cannot
    /// be read, or that carry no `exp`, are accepted.
    pub fn is_authenticated_at(&self, now: DateTime<Utc>) -> bool {
        let token = match self.store.token() {
            Ok(Some(token)) => token,
            Ok(None) => return false,
            Err(e) => {
                tracing::warn!("Could not read stored token: {}", e);
                return false;
            }
        };

        match TokenClaims::from_token(&token) {
            Some(claims) if claims.is_expired_at(now) => {
                tracing::info!(
                    "Stored token expired at {}",
                    claims
                        .expires_at()
                        .map(|t| t.to_rfc3339())
                        .unwrap_or_else(|| "an unknown time".to_string())
                );
                self.teardown(LogoutReason::Expired);
                false
            }
            _ => true,
        }
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        self.stored_session().map(|session| session.user)
    }

    pub fn state(&self) -> SessionState {
        self.state_at(Utc::now())
    }

    pub fn state_at(&self, now: DateTime<Utc>) -> SessionState {
        if !self.is_authenticated_at(now) {
            return SessionState::Anonymous;
        }
        match self.stored_session() {
            Some(session) => SessionState::Authenticated(session),
            None => SessionState::Anonymous,
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.current_user().map(|user| user.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }

    pub fn is_librarian(&self) -> bool {
        self.role() == Some(Role::Librarian)
    }

    /// Sign in and persist the session
    pub async fn login(&self, username: &str, password: &str) -> AppResult<UserProfile> {
        let request = LoginRequest::new(username, password);
        request.validate()?;

        tracing::info!("Logging in as {}", request.username);
        let response: LoginResponse = self.api.post("/auth/login", &request).await?;

        if !response.success {
            let message = response
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "Login failed".to_string());
            tracing::warn!("Login refused for {}: {}", request.username, message);
            return Err(AppError::Authentication(message));
        }

        let token = response
            .token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                AppError::Authentication("No authentication token received from server".to_string())
            })?;

        let profile = response.profile(&request.username);
        self.store.set(token, &profile)?;

        self.events.emit(SessionEvent::LoggedIn {
            username: profile.username.clone(),
            role: profile.role,
        });

        Ok(profile)
    }

    /// Sign out. The local session is gone once this returns, whatever the
    /// backend answers.
    pub async fn logout(&self) {
        self.teardown(LogoutReason::Explicit);

        if let Err(e) = self.api.post_empty::<Value>("/auth/logout").await {
            tracing::warn!("Backend logout failed: {}", e);
        }
    }

    /// Ask the backend whether the stored token is still honoured
    pub async fn validate_token(&self) -> bool {
        if !self.is_authenticated() {
            return false;
        }

        match self.api.get::<Value>("/auth/me").await {
            Ok(body) => body.get("success").and_then(Value::as_bool).unwrap_or(true),
            // the client has already torn the session down
            Err(AppError::Unauthorized(_)) => false,
            Err(AppError::Forbidden(message)) => {
                tracing::warn!("Token refused by backend: {}", message);
                self.teardown(LogoutReason::Rejected);
                false
            }
            Err(e) => {
                tracing::warn!("Token validation failed: {}", e);
                false
            }
        }
    }

    /// Drop the local session. A `LoggedOut` event is emitted only when
    /// there was a session to end; returns whether one was.
    pub fn teardown(&self, reason: LogoutReason) -> bool {
        let ended = self.store.clear().unwrap_or_else(|e| {
            tracing::error!("Failed to clear session: {}", e);
            true
        });
        if ended {
            self.events.emit(SessionEvent::LoggedOut { reason });
        } else {
            tracing::debug!("No session to end ({:?})", reason);
        }
        ended
    }

    fn stored_session(&self) -> Option<Session> {
        match self.store.get() {
            Ok(session) => session,
            Err(AppError::MalformedLocalState(message)) => {
                tracing::warn!("Discarding unreadable session: {}", message);
                self.teardown(LogoutReason::Corrupted);
                None
            }
            Err(e) => {
                tracing::warn!("Could not read stored session: {}", e);
                None
            }
        }
    }
}
