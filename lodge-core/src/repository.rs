use async_trait::async_trait;
use lodge_shared::{AuthUser, Session};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::error::{AuthError, BackendError, StoreError};
use crate::query::SelectQuery;
use crate::shell::Preferences;
use crate::CoreResult;

/// Row-oriented access to the hosted tables.
#[async_trait]
pub trait DataApi: Send + Sync {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, BackendError>;

    async fn insert(&self, table: &str, row: Value) -> Result<(), BackendError>;

    /// Overwrites the columns present in `patch` on the row with this id.
    async fn update(&self, table: &str, id: Uuid, patch: Value) -> Result<(), BackendError>;

    async fn delete(&self, table: &str, id: Uuid) -> Result<(), BackendError>;
}

/// Public file storage (guest-house logos).
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), BackendError>;

    fn public_url(&self, bucket: &str, path: &str) -> String;
}

#[derive(Debug, Clone, PartialEq)]
pub enum SignUpResponse {
    /// Account created; the provider sent a confirmation e-mail.
    ConfirmationRequired(AuthUser),
    /// Auto-confirmed accounts come back signed in.
    SignedIn(Session),
}

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpResponse, AuthError>;

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, AuthError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError>;

    async fn current_user(&self, access_token: &str) -> Result<AuthUser, AuthError>;
}

/// Small client-side persistence: the signed-in session and UI preferences.
pub trait LocalStore: Send + Sync {
    fn load_session(&self) -> Result<Option<Session>, StoreError>;
    fn save_session(&self, session: &Session) -> Result<(), StoreError>;
    fn clear_session(&self) -> Result<(), StoreError>;
    fn load_preferences(&self) -> Result<Preferences, StoreError>;
    fn save_preferences(&self, preferences: &Preferences) -> Result<(), StoreError>;
}

/// Runs `query` and decodes every row into `T`. A row that does not decode
/// is logged and skipped; the rest are still returned.
pub async fn fetch_all<T: DeserializeOwned>(
    api: &dyn DataApi,
    query: &SelectQuery,
) -> CoreResult<Vec<T>> {
    let rows = api.select(query).await?;
    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let id = row.get("id").cloned().unwrap_or(Value::Null);
            match serde_json::from_value(row) {
                Ok(item) => Some(item),
                Err(e) => {
                    warn!(table = %query.table, %id, "Skipping row that does not decode: {}", e);
                    None
                }
            }
        })
        .collect())
}

/// First row of `query`, if any.
pub async fn fetch_first<T: DeserializeOwned>(
    api: &dyn DataApi,
    query: SelectQuery,
) -> CoreResult<Option<T>> {
    let mut rows = fetch_all(api, &query.limit(1)).await?;
    if rows.is_empty() {
        Ok(None)
    } else {
        Ok(Some(rows.remove(0)))
    }
}
