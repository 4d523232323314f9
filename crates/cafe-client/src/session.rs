//! # Session Manager
//!
//! Owns the authentication state. Every change goes through
//! [`cafe_core::reduce`]; the manager only decides which action to dispatch
//! after talking to the backend and the token store.
//!
//! ## Operation → Action
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operation       Remote call          Success            Failure        │
//! │  ─────────       ───────────          ───────            ───────        │
//! │  check_token     GET  /auth           SignUp + persist   NotAuthenticated│
//! │  sign_in         POST /auth/login     SignUp + persist   AddError(msg)  │
//! │  sign_up         POST /usuarios       SignUp + persist   AddError(msg)  │
//! │  log_out         (none)               remove + LogOut                   │
//! │  remove_error    (none)               RemoveError                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! State is held in a `tokio::sync::watch` sender. Modifications are applied
//! to the value current at the time of dispatch, and subscribers are woken
//! only when the state actually changed.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::CafeApi;
use crate::config::SessionSettings;
use crate::error::ClientResult;
use cafe_core::{
    reduce, AuthStatus, LoginData, LoginResponse, RegisterData, SessionAction, SessionState, User,
    DEFAULT_AUTH_ERROR,
};
use cafe_store::TokenStore;

/// Authentication state container.
pub struct SessionManager {
    api: Arc<CafeApi>,
    tokens: Arc<dyn TokenStore>,
    state: watch::Sender<SessionState>,
    validate_without_token: bool,
}

impl SessionManager {
    /// Creates the manager in the `Checking` state.
    ///
    /// Call [`check_token`](Self::check_token) once at startup to resolve it.
    pub fn new(api: Arc<CafeApi>, tokens: Arc<dyn TokenStore>, settings: &SessionSettings) -> Self {
        let (state, _) = watch::channel(SessionState::checking());

        SessionManager {
            api,
            tokens,
            state,
            validate_without_token: settings.validate_without_token,
        }
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// Current state.
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver notified after every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn status(&self) -> AuthStatus {
        self.state.borrow().status
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Resolves the startup `Checking` state.
    ///
    /// ## Flow
    /// 1. Read the stored token. None ⇒ `NotAuthenticated` right away.
    /// 2. `GET /auth` (also without a token unless disabled in config).
    /// 3. 200 ⇒ `SignUp` with the returned token, which is persisted.
    ///    Anything else ⇒ `NotAuthenticated`.
    ///
    /// Backend and transport failures are not errors here; they resolve to
    /// `NotAuthenticated`. Only a failure to persist the renewed token is
    /// returned, after the session has already been marked authenticated.
    pub async fn check_token(&self) -> ClientResult<AuthStatus> {
        let stored = match self.tokens.get_token().await {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Could not read stored token");
                None
            }
        };

        if stored.is_none() {
            self.dispatch(SessionAction::NotAuthenticated);

            if !self.validate_without_token {
                debug!("No stored token; skipping validation");
                return Ok(AuthStatus::NotAuthenticated);
            }
            warn!("No stored token; validating with the backend anyway");
        }

        match self.api.renew_token().await {
            Ok(LoginResponse { token, user }) => {
                info!(user_id = %user.id, "Stored token accepted");
                self.dispatch(SessionAction::SignUp {
                    token: token.clone(),
                    user,
                });
                self.tokens.set_token(&token).await?;
                Ok(AuthStatus::Authenticated)
            }
            Err(e) => {
                info!(error = %e, "Token validation failed");
                self.dispatch(SessionAction::NotAuthenticated);
                Ok(AuthStatus::NotAuthenticated)
            }
        }
    }

    /// Logs in with email and password.
    ///
    /// On rejection the session carries the backend's `msg` (or the default
    /// message) and the error is also returned.
    pub async fn sign_in(&self, data: LoginData) -> ClientResult<User> {
        debug!(email = %data.email, "Signing in");

        match self.api.login(&data).await {
            Ok(response) => self.authenticate(response).await,
            Err(e) => {
                let message = e.backend_message().unwrap_or(DEFAULT_AUTH_ERROR).to_string();
                warn!(error = %e, "Sign-in rejected");
                self.dispatch(SessionAction::AddError(message));
                Err(e)
            }
        }
    }

    /// Registers a new user and logs them in.
    ///
    /// The error message prefers the first field error (`errors[0].msg`),
    /// then `msg`, then the default message.
    pub async fn sign_up(&self, data: RegisterData) -> ClientResult<User> {
        debug!(email = %data.email, "Signing up");

        match self.api.register(&data).await {
            Ok(response) => self.authenticate(response).await,
            Err(e) => {
                let message = e
                    .first_field_error()
                    .or_else(|| e.backend_message())
                    .unwrap_or(DEFAULT_AUTH_ERROR)
                    .to_string();
                warn!(error = %e, "Sign-up rejected");
                self.dispatch(SessionAction::AddError(message));
                Err(e)
            }
        }
    }

    /// Forgets the stored token and resets the session.
    ///
    /// The session is reset even if the token store fails.
    pub async fn log_out(&self) -> ClientResult<()> {
        let removed = self.tokens.remove_token().await;
        self.dispatch(SessionAction::LogOut);
        info!("Logged out");
        Ok(removed?)
    }

    /// Clears the error message.
    pub fn remove_error(&self) {
        self.dispatch(SessionAction::RemoveError);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn authenticate(&self, response: LoginResponse) -> ClientResult<User> {
        let LoginResponse { token, user } = response;
        info!(user_id = %user.id, role = %user.role, "Authenticated");

        self.dispatch(SessionAction::SignUp {
            token: token.clone(),
            user: user.clone(),
        });
        self.tokens.set_token(&token).await?;

        Ok(user)
    }

    fn dispatch(&self, action: SessionAction) {
        let name = action.name();

        self.state.send_if_modified(|state| {
            let next = reduce(state, action);
            if next == *state {
                return false;
            }
            *state = next;
            true
        });

        debug!(action = name, status = %self.status(), "Session action applied");
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("status", &self.status())
            .field("validate_without_token", &self.validate_without_token)
            .finish_non_exhaustive()
    }
}
