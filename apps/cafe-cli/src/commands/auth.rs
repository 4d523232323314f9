//! # Auth Commands
//!
//! Login, registration and logout on top of the session manager.
//!
//! The session keeps the failure message in `error_message`. A command
//! reports that message once and clears it, the way a login screen shows an
//! alert and dismisses it.

use serde::Serialize;
use tracing::debug;

use crate::error::ApiError;
use cafe_client::{ClientError, SessionManager};
use cafe_core::validation::{validate_login, validate_registration};
use cafe_core::{AuthStatus, LoginData, RegisterData, User};

/// User DTO for output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub image: Option<String>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        UserDto {
            id: u.id,
            name: u.name,
            email: u.email,
            role: u.role,
            image: u.image,
        }
    }
}

/// Session summary for `cafe status`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDto {
    pub status: AuthStatus,
    pub user: Option<UserDto>,
}

/// Logs in and persists the returned token.
pub async fn login(session: &SessionManager, data: LoginData) -> Result<UserDto, ApiError> {
    debug!(email = %data.email, "login command");
    validate_login(&data)?;

    match session.sign_in(data).await {
        Ok(user) => Ok(UserDto::from(user)),
        Err(e) => Err(take_session_error(session, e)),
    }
}

/// Creates an account and logs in with it.
pub async fn register(session: &SessionManager, data: RegisterData) -> Result<UserDto, ApiError> {
    debug!(email = %data.email, "register command");
    validate_registration(&data)?;

    match session.sign_up(data).await {
        Ok(user) => Ok(UserDto::from(user)),
        Err(e) => Err(take_session_error(session, e)),
    }
}

pub async fn logout(session: &SessionManager) -> Result<(), ApiError> {
    debug!("logout command");
    session.log_out().await?;
    Ok(())
}

/// Current session as resolved at startup.
pub fn session_status(session: &SessionManager) -> SessionDto {
    let state = session.snapshot();

    SessionDto {
        status: state.status,
        user: state.user.map(UserDto::from),
    }
}

/// Reads the session's error message, clears it, and keeps the error's code.
fn take_session_error(session: &SessionManager, err: ClientError) -> ApiError {
    let message = session.snapshot().error_message;
    session.remove_error();

    let mut api = ApiError::from(err);
    if !message.is_empty() {
        api.message = message;
    }
    api
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use cafe_client::{CafeApi, ClientConfig};
    use cafe_store::{MemoryTokenStore, TokenStore};
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        std::net::TcpListener::bind("127.0.0.1:0").is_ok()
    }

    fn session_for(server: &MockServer, tokens: Arc<MemoryTokenStore>) -> SessionManager {
        let config = ClientConfig::with_base_url(format!("{}/api", server.uri()));
        let api = Arc::new(CafeApi::new(&config.api, tokens.clone()).unwrap());
        SessionManager::new(api, tokens, &config.session)
    }

    fn login_body(token: &str) -> serde_json::Value {
        json!({
            "token": token,
            "usuario": {
                "uid": "u1",
                "nombre": "Ana",
                "correo": "a@b.com",
                "rol": "ADMIN_ROLE"
            }
        })
    }

    #[tokio::test]
    async fn test_login_returns_user() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(login_body("jwt")))
            .mount(&server)
            .await;

        let tokens = Arc::new(MemoryTokenStore::new());
        let session = session_for(&server, tokens.clone());

        let user = login(&session, LoginData::new("a@b.com", "123456"))
            .await
            .unwrap();

        assert_eq!(user.name, "Ana");
        assert_eq!(session_status(&session).status, AuthStatus::Authenticated);
        assert_eq!(tokens.get_token().await.unwrap().as_deref(), Some("jwt"));
    }

    #[tokio::test]
    async fn test_login_failure_reports_and_clears_session_message() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({ "msg": "Usuario / Password no son correctos" })),
            )
            .mount(&server)
            .await;

        let session = session_for(&server, Arc::new(MemoryTokenStore::new()));

        let err = login(&session, LoginData::new("a@b.com", "bad"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "Usuario / Password no son correctos");
        assert!(session.snapshot().error_message.is_empty());
        assert_eq!(session.status(), AuthStatus::NotAuthenticated);
    }

    #[tokio::test]
    async fn test_register_rejects_short_password_before_request() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/usuarios"))
            .respond_with(ResponseTemplate::new(201).set_body_json(login_body("jwt")))
            .expect(0)
            .mount(&server)
            .await;

        let session = session_for(&server, Arc::new(MemoryTokenStore::new()));

        let err = register(&session, RegisterData::new("a@b.com", "123", "Ana"))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("password"));
    }

    #[tokio::test]
    async fn test_logout_resets_status() {
        if !can_bind_localhost() {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
        let server = MockServer::start().await;
        let tokens = Arc::new(MemoryTokenStore::with_token("jwt"));
        let session = session_for(&server, tokens.clone());

        logout(&session).await.unwrap();

        let status = session_status(&session);
        assert_eq!(status.status, AuthStatus::NotAuthenticated);
        assert!(status.user.is_none());
        assert_eq!(tokens.get_token().await.unwrap(), None);
    }
}
