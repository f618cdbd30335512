use async_trait::async_trait;
use chrono::Utc;
use lodge_core::repository::SignUpResponse;
use lodge_core::{AuthError, AuthProvider, BackendError};
use lodge_shared::{AuthUser, Masked, Session};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::http::{send, BackendClient};

/// [`AuthProvider`] over the backend's GoTrue endpoint (`/auth/v1`).
#[derive(Debug, Clone)]
pub struct AuthClient {
    client: BackendClient,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: AuthUser,
}

impl From<TokenResponse> for Session {
    fn from(token: TokenResponse) -> Self {
        let expires_at = token
            .expires_at
            .or_else(|| token.expires_in.map(|secs| Utc::now().timestamp() + secs));
        Session {
            access_token: Masked(token.access_token),
            refresh_token: token.refresh_token.map(Masked),
            expires_at,
            user: token.user,
        }
    }
}

/// Client errors are the provider's verdict on the request (bad password,
/// unconfirmed e-mail, weak password); anything else is an outage.
fn classify(err: BackendError) -> AuthError {
    match err {
        BackendError::Http { status, message } if (400..500).contains(&status) => {
            AuthError::Rejected(message)
        }
        other => AuthError::Backend(other),
    }
}

fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, AuthError> {
    serde_json::from_value(value).map_err(|e| AuthError::Backend(BackendError::from(e)))
}

impl AuthClient {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, AuthError> {
        let request = self
            .client
            .authorize(self.client.http().post(self.client.url(path)))
            .json(&body);
        let response = send(request).await.map_err(classify)?;
        response
            .json::<Value>()
            .await
            .map_err(|e| AuthError::Backend(BackendError::Decode(e.to_string())))
    }
}

/// Signup answers with a full session when the project auto-confirms, and with
/// the bare user (or `{ "user": .. }`) when a confirmation e-mail went out.
pub fn parse_sign_up(body: Value) -> Result<SignUpResponse, AuthError> {
    if body.get("access_token").is_some_and(|t| !t.is_null()) {
        let token: TokenResponse = decode(body)?;
        return Ok(SignUpResponse::SignedIn(token.into()));
    }
    let user = match body.get("user") {
        Some(user) if !user.is_null() => user.clone(),
        _ => body,
    };
    Ok(SignUpResponse::ConfirmationRequired(decode(user)?))
}

#[async_trait]
impl AuthProvider for AuthClient {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        debug!(email, "password sign-in");
        let body = self
            .post(
                "auth/v1/token?grant_type=password",
                json!({ "email": email, "password": password }),
            )
            .await?;
        let token: TokenResponse = decode(body)?;
        info!(user_id = %token.user.id, "signed in");
        Ok(token.into())
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpResponse, AuthError> {
        debug!(email, "sign-up");
        let body = self
            .post("auth/v1/signup", json!({ "email": email, "password": password }))
            .await?;
        parse_sign_up(body)
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, AuthError> {
        let body = self
            .post(
                "auth/v1/token?grant_type=refresh_token",
                json!({ "refresh_token": refresh_token }),
            )
            .await?;
        let token: TokenResponse = decode(body)?;
        Ok(token.into())
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        let request = self
            .client
            .authorize_as(self.client.http().post(self.client.url("auth/v1/logout")), access_token);
        send(request).await.map_err(classify)?;
        Ok(())
    }

    async fn current_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        let request = self
            .client
            .authorize_as(self.client.http().get(self.client.url("auth/v1/user")), access_token);
        let response = send(request).await.map_err(classify)?;
        response
            .json::<AuthUser>()
            .await
            .map_err(|e| AuthError::Backend(BackendError::Decode(e.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_client_errors_as_rejections() {
        let err = classify(BackendError::Http {
            status: 400,
            message: "Invalid login credentials".into(),
        });
        assert!(matches!(err, AuthError::Rejected(ref m) if m == "Invalid login credentials"));

        let err = classify(BackendError::Http { status: 503, message: "down".into() });
        assert!(matches!(err, AuthError::Backend(_)));

        let err = classify(BackendError::Transport("connection refused".into()));
        assert!(matches!(err, AuthError::Backend(_)));
    }

    #[test]
    fn test_parse_sign_up_pending_confirmation() {
        let body = json!({
            "id": "9b0d4c7e-3f7c-4c55-a0f4-6a1d0c5e2b11",
            "email": "owner@example.com",
            "confirmation_sent_at": "2026-01-01T00:00:00Z"
        });
        match parse_sign_up(body).unwrap() {
            SignUpResponse::ConfirmationRequired(user) => {
                assert_eq!(user.email.as_deref(), Some("owner@example.com"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_sign_up_auto_confirmed() {
        let body = json!({
            "access_token": "jwt",
            "refresh_token": "r1",
            "expires_in": 3600,
            "user": { "id": "9b0d4c7e-3f7c-4c55-a0f4-6a1d0c5e2b11", "email": "owner@example.com" }
        });
        match parse_sign_up(body).unwrap() {
            SignUpResponse::SignedIn(session) => {
                assert_eq!(session.access_token.expose(), "jwt");
                assert!(session.expires_at.is_some());
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
