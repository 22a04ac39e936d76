//! Client side of the logout boundary
//!
//! `SessionClient` owns the token a UI holds locally. Logging out asks the
//! server to revoke the token and only drops the local copy once the server
//! confirms, so a failed revocation never looks like a finished logout.

use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::RwLock;
use thiserror::Error;
use tracing::{info, warn};

use crate::dto::auth::{LoginRequest, LoginResponse};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("No active session")]
    NoSession,

    /// The server did not record the revocation; the session is still active
    #[error("Revocation failed on the server")]
    RevocationFailed,

    #[error("Request rejected with status {status}")]
    Rejected { status: u16 },

    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

/// Calls the server on behalf of a `SessionClient`
#[async_trait]
pub trait SessionTransport: Send + Sync {
    /// Exchange credentials for an access token
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ClientError>;

    /// Ask the server to revoke `token`
    async fn logout(&self, token: &str) -> Result<(), ClientError>;
}

/// Locally held session
pub struct SessionClient<T: SessionTransport> {
    transport: T,
    token: RwLock<Option<String>>,
}

impl<T: SessionTransport> SessionClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            token: RwLock::new(None),
        }
    }

    /// Resume a session from a previously stored token
    pub fn with_token(transport: T, token: impl Into<String>) -> Self {
        Self {
            transport,
            token: RwLock::new(Some(token.into())),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Log in and keep the issued token
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let response = self.transport.login(username, password).await?;
        *self.token.write().unwrap_or_else(|e| e.into_inner()) =
            Some(response.access_token.clone());
        Ok(response)
    }

    /// Invalidate the current session
    ///
    /// The stored token is cleared only after the server confirms the
    /// revocation. On any error it is kept and the error returned.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let token = self.token().ok_or(ClientError::NoSession)?;

        if let Err(err) = self.transport.logout(&token).await {
            warn!(error = %err, "Logout failed, keeping local session");
            return Err(err);
        }

        let mut stored = self.token.write().unwrap_or_else(|e| e.into_inner());
        // A login that raced this logout stored a newer token
        if stored.as_deref() == Some(token.as_str()) {
            *stored = None;
        }
        info!("Local session cleared");
        Ok(())
    }
}

/// `SessionTransport` over HTTP
#[derive(Debug, Clone)]
pub struct HttpSessionTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSessionTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl SessionTransport for HttpSessionTransport {
    async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ClientError> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self
            .client
            .post(self.url("/api/v1/auth/login"))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClientError::Rejected {
                status: response.status().as_u16(),
            });
        }

        Ok(response.json::<LoginResponse>().await?)
    }

    async fn logout(&self, token: &str) -> Result<(), ClientError> {
        let response = self
            .client
            .post(self.url("/api/v1/auth/logout"))
            .bearer_auth(token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::SERVICE_UNAVAILABLE => Err(ClientError::RevocationFailed),
            status => Err(ClientError::Rejected {
                status: status.as_u16(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sh_core::domain::entities::Role;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[derive(Default)]
    struct MockTransport {
        fail_revocation: AtomicBool,
        logout_calls: AtomicUsize,
    }

    #[async_trait]
    impl SessionTransport for MockTransport {
        async fn login(&self, username: &str, _password: &str) -> Result<LoginResponse, ClientError> {
            Ok(LoginResponse {
                access_token: format!("token-for-{}", username),
                token_type: "Bearer".to_string(),
                expires_in: 3600,
                expires_at: Utc::now(),
                role: Role::Staff,
            })
        }

        async fn logout(&self, _token: &str) -> Result<(), ClientError> {
            self.logout_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_revocation.load(Ordering::SeqCst) {
                Err(ClientError::RevocationFailed)
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn test_logout_clears_token_after_server_confirms() {
        let client = SessionClient::new(MockTransport::default());
        client.login("alice", "pw").await.unwrap();
        assert_eq!(client.token().as_deref(), Some("token-for-alice"));

        client.logout().await.unwrap();

        assert!(!client.is_authenticated());
        assert_eq!(client.transport.logout_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_logout_keeps_token_when_revocation_fails() {
        let transport = MockTransport::default();
        transport.fail_revocation.store(true, Ordering::SeqCst);
        let client = SessionClient::with_token(transport, "held.token.value");

        let result = client.logout().await;

        assert!(matches!(result, Err(ClientError::RevocationFailed)));
        assert_eq!(client.token().as_deref(), Some("held.token.value"));
    }

    #[tokio::test]
    async fn test_logout_without_session() {
        let client = SessionClient::new(MockTransport::default());

        assert!(matches!(client.logout().await, Err(ClientError::NoSession)));
        assert_eq!(client.transport.logout_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_http_transport_maps_service_unavailable() {
        use wiremock::matchers::{header, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/logout"))
            .and(header("authorization", "Bearer held.token.value"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            SessionClient::with_token(HttpSessionTransport::new(server.uri()), "held.token.value");

        assert!(matches!(
            client.logout().await,
            Err(ClientError::RevocationFailed)
        ));
        assert!(client.is_authenticated());
    }

    #[tokio::test]
    async fn test_http_transport_logout_success() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/logout"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "message": "Logged out" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = SessionClient::with_token(HttpSessionTransport::new(server.uri()), "t.o.k");

        client.logout().await.unwrap();
        assert!(!client.is_authenticated());
    }
}
