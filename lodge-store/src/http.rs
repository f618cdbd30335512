//! Shared plumbing for the hosted backend's HTTP endpoints.

use lodge_core::BackendError;
use lodge_shared::Masked;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;

use crate::app_config::BackendConfig;

/// Base URL, project key and (optionally) the signed-in user's access token.
///
/// Requests authenticate with the access token when one is set, and with the
/// anonymous project key otherwise.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    anon_key: Masked<String>,
    token: Option<Masked<String>>,
}

impl BackendClient {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            anon_key: config.anon_key.clone(),
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(Masked(token.into()));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn bearer(&self) -> String {
        let token = self.token.as_ref().unwrap_or(&self.anon_key);
        format!("Bearer {}", token.expose())
    }

    /// Adds the project key and bearer headers every endpoint expects.
    pub fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", self.anon_key.expose())
            .header(reqwest::header::AUTHORIZATION, self.bearer())
    }

    /// Same as [`authorize`](Self::authorize) but with an explicit user token.
    pub fn authorize_as(&self, request: RequestBuilder, access_token: &str) -> RequestBuilder {
        request
            .header("apikey", self.anon_key.expose())
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", access_token))
    }

    pub fn http(&self) -> &Client {
        &self.client
    }
}

pub(crate) async fn send(request: RequestBuilder) -> Result<Response, BackendError> {
    let response = request
        .send()
        .await
        .map_err(|e| BackendError::Transport(e.to_string()))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response
        .text()
        .await
        .map_err(|e| BackendError::Transport(e.to_string()))?;
    Err(BackendError::Http { status: status.as_u16(), message: error_message(&text) })
}

/// Pulls the human-readable message out of a PostgREST, GoTrue or Storage
/// error body. Falls back to the raw text.
pub(crate) fn error_message(body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for key in ["error_description", "msg", "message", "error"] {
            if let Some(Value::String(message)) = map.get(key) {
                return message.clone();
            }
        }
    }
    body.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_description() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;
        assert_eq!(error_message(body), "Invalid login credentials");
    }

    #[test]
    fn test_error_message_postgrest_shape() {
        let body = r#"{"code":"23502","message":"null value in column \"check_in_date\"","details":null}"#;
        assert_eq!(error_message(body), "null value in column \"check_in_date\"");
    }

    #[test]
    fn test_error_message_plain_text() {
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_url_joins_paths() {
        let config = BackendConfig {
            url: "https://project.example.co/".into(),
            anon_key: Masked::from("anon"),
            timeout_seconds: 5,
        };
        let client = BackendClient::new(&config).unwrap();
        assert_eq!(client.url("/rest/v1/rooms"), "https://project.example.co/rest/v1/rooms");
    }
}
