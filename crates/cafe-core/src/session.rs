//! # Session State Machine
//!
//! The authentication state of the current user and the pure function that
//! moves it between states.
//!
//! ## States
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Session Transitions                               │
//! │                                                                         │
//! │                       ┌────────────┐                                    │
//! │                       │  Checking  │  (process start)                   │
//! │                       └─────┬──────┘                                    │
//! │               SignUp        │        NotAuthenticated / AddError        │
//! │          ┌──────────────────┴───────────────────┐                       │
//! │          ▼                                      ▼                       │
//! │  ┌───────────────┐        LogOut        ┌──────────────────┐            │
//! │  │ Authenticated │ ───────────────────► │ NotAuthenticated │            │
//! │  │ token + user  │ ◄─────────────────── │ no token/user    │            │
//! │  └───────────────┘        SignUp        └──────────────────┘            │
//! │                                                                         │
//! │  AddError:    any state → NotAuthenticated, error_message = msg        │
//! │  RemoveError: error_message = ""   (status untouched)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariant
//! `status == Authenticated` ⇔ `token` and `user` are both present. Every
//! action that leaves `Authenticated` clears both in the same step.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::User;

/// Authentication status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum AuthStatus {
    /// Stored token not validated yet.
    #[default]
    Checking,
    Authenticated,
    NotAuthenticated,
}

impl std::fmt::Display for AuthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthStatus::Checking => write!(f, "checking"),
            AuthStatus::Authenticated => write!(f, "authenticated"),
            AuthStatus::NotAuthenticated => write!(f, "not-authenticated"),
        }
    }
}

/// Snapshot of the session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub status: AuthStatus,
    pub token: Option<String>,
    pub user: Option<User>,
    /// Empty string means no error.
    pub error_message: String,
}

impl SessionState {
    /// The state at process start.
    pub fn checking() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.status == AuthStatus::Authenticated
    }

    pub fn has_error(&self) -> bool {
        !self.error_message.is_empty()
    }

    /// Checks the status/credentials invariant.
    ///
    /// `Checking` and `NotAuthenticated` both require token and user absent.
    pub fn is_consistent(&self) -> bool {
        match self.status {
            AuthStatus::Authenticated => self.token.is_some() && self.user.is_some(),
            AuthStatus::Checking | AuthStatus::NotAuthenticated => {
                self.token.is_none() && self.user.is_none()
            }
        }
    }
}

/// Tagged actions accepted by [`reduce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// A sign-in, sign-up or token validation succeeded.
    SignUp { token: String, user: User },
    NotAuthenticated,
    LogOut,
    AddError(String),
    RemoveError,
}

impl SessionAction {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            SessionAction::SignUp { .. } => "sign_up",
            SessionAction::NotAuthenticated => "not_authenticated",
            SessionAction::LogOut => "log_out",
            SessionAction::AddError(_) => "add_error",
            SessionAction::RemoveError => "remove_error",
        }
    }
}

/// Computes the next session state.
///
/// Pure and total: every action is valid in every state.
pub fn reduce(state: &SessionState, action: SessionAction) -> SessionState {
    match action {
        SessionAction::SignUp { token, user } => SessionState {
            status: AuthStatus::Authenticated,
            token: Some(token),
            user: Some(user),
            error_message: state.error_message.clone(),
        },
        SessionAction::NotAuthenticated => SessionState {
            status: AuthStatus::NotAuthenticated,
            token: None,
            user: None,
            error_message: state.error_message.clone(),
        },
        SessionAction::LogOut => SessionState {
            status: AuthStatus::NotAuthenticated,
            token: None,
            user: None,
            error_message: String::new(),
        },
        SessionAction::AddError(message) => SessionState {
            status: AuthStatus::NotAuthenticated,
            token: None,
            user: None,
            error_message: message,
        },
        SessionAction::RemoveError => SessionState {
            error_message: String::new(),
            ..state.clone()
        },
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
