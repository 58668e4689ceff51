//! Account operations
//!
//! Registration, login/logout and the signed-in user's profile. Login is
//! the only place a bearer token enters the token store; logout is the only
//! place it leaves.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{AccountError, ApiError, ApiResult};
use crate::models::{Credentials, Registration, User};
use crate::token::{load_auth_token, TokenStore, AUTH_TOKEN_KEY};
use crate::transport::{ApiRequest, Transport};

/// Message the server uses for a duplicate username
const USERNAME_TAKEN: &str = "Username already exists";

/// Client for the `/auth` endpoints
pub struct AccountClient {
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenStore>,
}

impl AccountClient {
    pub fn new(transport: Arc<dyn Transport>, tokens: Arc<dyn TokenStore>) -> Self {
        Self { transport, tokens }
    }

    /// Register a new account
    ///
    /// A rejected username is reported as [`AccountError::UsernameTaken`]
    /// or [`AccountError::InvalidUsername`]; anything else as
    /// [`AccountError::RegistrationFailed`].
    pub async fn register(&self, registration: &Registration) -> Result<(), AccountError> {
        let body = serde_json::to_value(registration)
            .map_err(|e| AccountError::RegistrationFailed(e.into()))?;
        let response = self
            .transport
            .send(ApiRequest::post(["auth", "register"], body))
            .await
            .map_err(AccountError::RegistrationFailed)?;

        if response.is_success() {
            info!("Registered user '{}'", registration.username);
            return Ok(());
        }

        let username_error = response.json().ok().and_then(|body| {
            body.pointer("/errors/username")
                .and_then(Value::as_str)
                .map(str::to_owned)
        });

        warn!(
            "Registration of '{}' rejected with status {}",
            registration.username, response.status
        );
        Err(match username_error {
            Some(message) if message == USERNAME_TAKEN => AccountError::UsernameTaken,
            Some(message) => AccountError::InvalidUsername(message),
            None => AccountError::RegistrationFailed(ApiError::Status {
                status: response.status,
            }),
        })
    }

    /// Log in and store the issued token
    pub async fn login(&self, credentials: &Credentials) -> Result<(), AccountError> {
        let token = self
            .request_token(credentials)
            .await
            .map_err(AccountError::LoginFailed)?;
        self.tokens.set(AUTH_TOKEN_KEY, &token)?;
        info!("Logged in as '{}'", credentials.username);
        Ok(())
    }

    async fn request_token(&self, credentials: &Credentials) -> ApiResult<String> {
        let body = serde_json::to_value(credentials)?;
        let response = self
            .transport
            .send(ApiRequest::post(["auth", "login"], body))
            .await?
            .error_for_status()?;
        let body = response.json()?;

        body.get("token")
            .or_else(|| body.pointer("/data/token"))
            .and_then(Value::as_str)
            .filter(|token| !token.trim().is_empty())
            .map(str::to_owned)
            .ok_or_else(|| ApiError::InvalidResponse("response has no token".to_string()))
    }

    /// Forget the stored token
    pub fn logout(&self) -> Result<(), AccountError> {
        self.tokens.remove(AUTH_TOKEN_KEY)?;
        info!("Logged out");
        Ok(())
    }

    /// Whether a usable token is stored
    pub fn is_logged_in(&self) -> bool {
        load_auth_token(self.tokens.as_ref()).is_some()
    }

    /// Fetch the signed-in user's profile
    ///
    /// Returns `Ok(None)` without any request when no token is stored. The
    /// user is read from `data` when the body is an envelope, otherwise
    /// from the body itself.
    pub async fn profile(&self) -> ApiResult<Option<User>> {
        let Some(token) = load_auth_token(self.tokens.as_ref()) else {
            debug!("No auth token; skipping profile fetch");
            return Ok(None);
        };

        let response = self
            .transport
            .send(ApiRequest::get(["auth", "profile"]).with_bearer(Some(token)))
            .await?
            .error_for_status()?;
        let mut body = response.json()?;

        let user = match body.get_mut("data").map(Value::take) {
            Some(data) if data.is_object() => data,
            _ => body,
        };
        Ok(Some(serde_json::from_value(user)?))
    }

    /// Fetch the profile, treating any failure as "no user"
    pub async fn load_profile(&self) -> Option<User> {
        match self.profile().await {
            Ok(user) => user,
            Err(e) => {
                warn!("Failed to fetch user profile: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::MemoryTokenStore;
    use crate::transport::mock::MockTransport;
    use crate::transport::Method;
    use serde_json::json;

    fn client(token: Option<&str>) -> (MockTransport, Arc<MemoryTokenStore>, AccountClient) {
        let transport = MockTransport::new();
        let tokens = Arc::new(match token {
            Some(t) => MemoryTokenStore::with_token(t),
            None => MemoryTokenStore::new(),
        });
        let client = AccountClient::new(Arc::new(transport.clone()), tokens.clone());
        (transport, tokens, client)
    }

    fn registration() -> Registration {
        Registration {
            username: "boss".to_string(),
            password: "hunter2".to_string(),
            email: "boss@example.com".to_string(),
        }
    }

    fn credentials() -> Credentials {
        Credentials {
            username: "boss".to_string(),
            password: "hunter2".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_success() {
        let (transport, _, client) = client(None);
        transport.reply_json(201, json!({"message": "created"}));

        client.register(&registration()).await.unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.path(), "auth/register");
        assert!(request.bearer.is_none());
        assert_eq!(
            request.body,
            Some(json!({
                "username": "boss",
                "password": "hunter2",
                "email": "boss@example.com"
            }))
        );
    }

    #[tokio::test]
    async fn test_register_username_taken() {
        let (transport, _, client) = client(None);
        transport.reply_json(
            400,
            json!({"errors": {"username": "Username already exists"}}),
        );

        let err = client.register(&registration()).await.unwrap_err();
        assert!(matches!(err, AccountError::UsernameTaken));
    }

    #[tokio::test]
    async fn test_register_invalid_username() {
        let (transport, _, client) = client(None);
        transport.reply_json(400, json!({"errors": {"username": "Too short"}}));

        let err = client.register(&registration()).await.unwrap_err();
        assert!(matches!(err, AccountError::InvalidUsername(ref m) if m == "Too short"));
    }

    #[tokio::test]
    async fn test_register_other_failures() {
        let (transport, _, client) = client(None);
        transport
            .reply_json(500, json!({"message": "db down"}))
            .fail_network();

        for _ in 0..2 {
            let err = client.register(&registration()).await.unwrap_err();
            assert_eq!(err.user_message(), "Registration failed. Please try again.");
        }
    }

    #[tokio::test]
    async fn test_login_stores_token() {
        let (transport, tokens, client) = client(None);
        transport.reply_json(200, json!({"token": "abc"}));

        assert!(!client.is_logged_in());
        client.login(&credentials()).await.unwrap();

        assert_eq!(
            tokens.get(AUTH_TOKEN_KEY).unwrap(),
            Some("abc".to_string())
        );
        assert!(client.is_logged_in());
    }

    #[tokio::test]
    async fn test_login_accepts_data_envelope() {
        let (transport, tokens, client) = client(None);
        transport.reply_json(200, json!({"data": {"token": "xyz"}}));

        client.login(&credentials()).await.unwrap();
        assert_eq!(
            tokens.get(AUTH_TOKEN_KEY).unwrap(),
            Some("xyz".to_string())
        );
    }

    #[tokio::test]
    async fn test_login_failure_keeps_store() {
        let (transport, tokens, client) = client(Some("old"));
        transport
            .reply_json(401, json!({"message": "bad credentials"}))
            .reply_json(200, json!({"token": ""}));

        for _ in 0..2 {
            let err = client.login(&credentials()).await.unwrap_err();
            assert!(matches!(err, AccountError::LoginFailed(_)));
        }
        assert_eq!(
            tokens.get(AUTH_TOKEN_KEY).unwrap(),
            Some("old".to_string())
        );
    }

    #[tokio::test]
    async fn test_logout_removes_token() {
        let (_, tokens, client) = client(Some("abc"));
        client.logout().unwrap();
        assert_eq!(tokens.get(AUTH_TOKEN_KEY).unwrap(), None);
        assert!(!client.is_logged_in());
    }

    #[tokio::test]
    async fn test_profile_without_token_skips_request() {
        let (transport, _, client) = client(None);
        assert_eq!(client.profile().await.unwrap(), None);
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_profile_envelope_and_bare() {
        let (transport, _, client) = client(Some("abc"));
        transport
            .reply_json(
                200,
                json!({"data": {"_id": "u1", "username": "boss", "email": "boss@example.com"}}),
            )
            .reply_json(200, json!({"username": "boss", "email": "boss@example.com"}));

        let user = client.profile().await.unwrap().unwrap();
        assert_eq!(user.id.as_deref(), Some("u1"));
        assert_eq!(user.username, "boss");

        let user = client.profile().await.unwrap().unwrap();
        assert!(user.id.is_none());
        assert_eq!(user.email, "boss@example.com");

        let request = &transport.requests()[0];
        assert_eq!(request.path(), "auth/profile");
        assert_eq!(request.bearer, crate::token::AuthToken::new("abc"));
    }

    #[tokio::test]
    async fn test_load_profile_swallows_errors() {
        let (transport, _, client) = client(Some("abc"));
        transport
            .reply_json(401, json!({"message": "expired"}))
            .fail_network();

        assert!(client.load_profile().await.is_none());
        assert!(client.load_profile().await.is_none());
    }
}
