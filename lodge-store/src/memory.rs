//! In-process stand-ins for the hosted backend, shared by the test suites of
//! every crate.

use async_trait::async_trait;
use chrono::Utc;
use lodge_core::query::Embed;
use lodge_core::repository::SignUpResponse;
use lodge_core::shell::Preferences;
use lodge_core::{
    AuthError, AuthProvider, BackendError, DataApi, LocalStore, ObjectStore, SelectQuery,
    StoreError,
};
use lodge_shared::{AuthUser, Masked, Session};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

/// Every table the dashboard reads or writes.
pub const TABLES: [&str; 8] = [
    "bookings",
    "countries",
    "customers",
    "guest_houses",
    "meal_plans",
    "room_types",
    "rooms",
    "transfer_types",
];

/// One request as seen by [`MemoryBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Select(String),
    Insert(String),
    Update(String, Uuid),
    Delete(String, Uuid),
    Upload(String, String),
}

type Row = Map<String, Value>;

/// Table rows, uploaded objects and a log of every call made.
pub struct MemoryBackend {
    tables: Mutex<HashMap<String, Vec<Row>>>,
    objects: Mutex<HashMap<String, Vec<u8>>>,
    calls: Mutex<Vec<Call>>,
    failing: Mutex<HashSet<String>>,
    latency: Option<Duration>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        let tables = TABLES.iter().map(|t| (t.to_string(), Vec::new())).collect();
        Self {
            tables: Mutex::new(tables),
            objects: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            failing: Mutex::new(HashSet::new()),
            latency: None,
        }
    }

    /// Delays every select by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Inserts a row directly, without logging a call. Returns its id.
    pub fn seed(&self, table: &str, row: Value) -> Uuid {
        let mut row = match row {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let id = fill_defaults(&mut row);
        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        tables.entry(table.to_string()).or_default().push(row);
        id
    }

    /// Makes every subsequent call touching `table` fail with a 500.
    pub fn fail_table(&self, table: &str) {
        self.failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(table.to_string());
    }

    pub fn heal_table(&self, table: &str) {
        self.failing.lock().unwrap_or_else(|e| e.into_inner()).remove(table);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    /// Raw rows of `table`, insertion order.
    pub fn rows(&self, table: &str) -> Vec<Value> {
        let tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        tables
            .get(table)
            .map(|rows| rows.iter().cloned().map(Value::Object).collect())
            .unwrap_or_default()
    }

    pub fn object(&self, bucket: &str, path: &str) -> Option<Vec<u8>> {
        let objects = self.objects.lock().unwrap_or_else(|e| e.into_inner());
        objects.get(&format!("{}/{}", bucket, path)).cloned()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).push(call);
    }

    fn check(&self, table: &str) -> Result<(), BackendError> {
        if self.failing.lock().unwrap_or_else(|e| e.into_inner()).contains(table) {
            return Err(BackendError::Http {
                status: 500,
                message: format!("{} is unavailable", table),
            });
        }
        Ok(())
    }

    fn run_select(&self, query: &SelectQuery) -> Result<Vec<Value>, BackendError> {
        let tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        let rows = tables
            .get(&query.table)
            .ok_or_else(|| BackendError::UnknownTable(query.table.clone()))?;

        let mut rows: Vec<Row> = rows.clone();
        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ordering = compare(a.get(&order.column), b.get(&order.column));
                match (is_null(a.get(&order.column)), is_null(b.get(&order.column))) {
                    (false, false) if !order.ascending => ordering.reverse(),
                    _ => ordering,
                }
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let mut projected = project(&row, &query.columns);
            for embed in &query.embeds {
                projected.insert(embed.alias.clone(), resolve_embed(&tables, &row, embed)?);
            }
            out.push(Value::Object(projected));
        }
        Ok(out)
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn fill_defaults(row: &mut Row) -> Uuid {
    let id = row
        .get("id")
        .and_then(Value::as_str)
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);
    row.insert("id".into(), Value::String(id.to_string()));
    row.entry("created_at")
        .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));
    id
}

fn row_id(row: &Row) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

fn is_null(value: Option<&Value>) -> bool {
    matches!(value, None | Some(Value::Null))
}

/// Nulls sort after everything else in both directions.
fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (x, y) => is_null(x).cmp(&is_null(y)),
    }
}

fn project(row: &Row, columns: &[String]) -> Row {
    if columns.is_empty() || columns.iter().any(|c| c == "*") {
        return row.clone();
    }
    columns
        .iter()
        .filter_map(|c| row.get(c).map(|v| (c.clone(), v.clone())))
        .collect()
}

fn resolve_embed(
    tables: &HashMap<String, Vec<Row>>,
    row: &Row,
    embed: &Embed,
) -> Result<Value, BackendError> {
    let related = tables
        .get(&embed.table)
        .ok_or_else(|| BackendError::UnknownTable(embed.table.clone()))?;

    let Some(target) = row.get(&embed.foreign_key).and_then(Value::as_str) else {
        return Ok(Value::Null);
    };
    Ok(related
        .iter()
        .find(|r| row_id(r) == Some(target))
        .map(|r| Value::Object(project(r, &embed.columns)))
        .unwrap_or(Value::Null))
}

#[async_trait]
impl DataApi for MemoryBackend {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<Value>, BackendError> {
        self.record(Call::Select(query.table.clone()));
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.check(&query.table)?;
        self.run_select(query)
    }

    async fn insert(&self, table: &str, row: Value) -> Result<(), BackendError> {
        self.record(Call::Insert(table.to_string()));
        self.check(table)?;
        let Value::Object(mut row) = row else {
            return Err(BackendError::Http { status: 400, message: "expected an object".into() });
        };
        fill_defaults(&mut row);

        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| BackendError::UnknownTable(table.to_string()))?;
        rows.push(row);
        Ok(())
    }

    async fn update(&self, table: &str, id: Uuid, patch: Value) -> Result<(), BackendError> {
        self.record(Call::Update(table.to_string(), id));
        self.check(table)?;
        let Value::Object(patch) = patch else {
            return Err(BackendError::Http { status: 400, message: "expected an object".into() });
        };

        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| BackendError::UnknownTable(table.to_string()))?;
        let id = id.to_string();
        for row in rows.iter_mut().filter(|r| row_id(r) == Some(id.as_str())) {
            for (key, value) in &patch {
                row.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }

    async fn delete(&self, table: &str, id: Uuid) -> Result<(), BackendError> {
        self.record(Call::Delete(table.to_string(), id));
        self.check(table)?;

        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        let rows = tables
            .get_mut(table)
            .ok_or_else(|| BackendError::UnknownTable(table.to_string()))?;
        let id = id.to_string();
        rows.retain(|r| row_id(r) != Some(id.as_str()));
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for MemoryBackend {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), BackendError> {
        self.record(Call::Upload(bucket.to_string(), path.to_string()));
        self.check(bucket)?;
        self.objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(format!("{}/{}", bucket, path), bytes);
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("memory://storage/v1/object/public/{}/{}", bucket, path)
    }
}

struct Account {
    user: AuthUser,
    password: Masked<String>,
    confirmed: bool,
}

#[derive(Default)]
struct AuthTables {
    accounts: HashMap<String, Account>,
    access_tokens: HashMap<String, Uuid>,
    refresh_tokens: HashMap<String, Uuid>,
}

/// Password accounts with issued tokens, held in memory.
pub struct MemoryAuth {
    tables: Mutex<AuthTables>,
    auto_confirm: bool,
    offline: Mutex<bool>,
    session_ttl_seconds: i64,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(AuthTables::default()),
            auto_confirm: false,
            offline: Mutex::new(false),
            session_ttl_seconds: 3600,
        }
    }

    /// Sign-ups come back already signed in.
    pub fn auto_confirm(mut self) -> Self {
        self.auto_confirm = true;
        self
    }

    /// Sessions issued from now on are already expired.
    pub fn with_session_ttl(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    /// Adds a confirmed account.
    pub fn with_user(self, email: &str, password: &str) -> Self {
        {
            let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
            tables.accounts.insert(email.to_string(), new_account(email, password, true));
        }
        self
    }

    pub fn confirm(&self, email: &str) {
        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(account) = tables.accounts.get_mut(email) {
            account.confirmed = true;
        }
    }

    /// Simulates an unreachable provider.
    pub fn set_offline(&self, offline: bool) {
        *self.offline.lock().unwrap_or_else(|e| e.into_inner()) = offline;
    }

    /// Drops every issued access token, as if they had been revoked server-side.
    pub fn revoke_all(&self) {
        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        tables.access_tokens.clear();
    }

    fn ensure_online(&self) -> Result<(), AuthError> {
        if *self.offline.lock().unwrap_or_else(|e| e.into_inner()) {
            return Err(AuthError::Backend(BackendError::Transport(
                "connection refused".into(),
            )));
        }
        Ok(())
    }

    fn issue(&self, tables: &mut AuthTables, user: &AuthUser) -> Session {
        let access = format!("access-{}", Uuid::new_v4());
        let refresh = format!("refresh-{}", Uuid::new_v4());
        tables.access_tokens.insert(access.clone(), user.id);
        tables.refresh_tokens.insert(refresh.clone(), user.id);
        Session {
            access_token: Masked(access),
            refresh_token: Some(Masked(refresh)),
            expires_at: Some(Utc::now().timestamp() + self.session_ttl_seconds),
            user: user.clone(),
        }
    }
}

impl Default for MemoryAuth {
    fn default() -> Self {
        Self::new()
    }
}

fn new_account(email: &str, password: &str, confirmed: bool) -> Account {
    Account {
        user: AuthUser {
            id: Uuid::new_v4(),
            email: Some(email.to_string()),
            created_at: Some(Utc::now()),
        },
        password: Masked::from(password),
        confirmed,
    }
}

fn user_by_id(tables: &AuthTables, id: Uuid) -> Option<AuthUser> {
    tables.accounts.values().find(|a| a.user.id == id).map(|a| a.user.clone())
}

#[async_trait]
impl AuthProvider for MemoryAuth {
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.ensure_online()?;
        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        let account = tables
            .accounts
            .get(email)
            .filter(|a| a.password.expose() == password)
            .ok_or_else(|| AuthError::Rejected("Invalid login credentials".into()))?;
        if !account.confirmed {
            return Err(AuthError::Rejected("Email not confirmed".into()));
        }
        let user = account.user.clone();
        Ok(self.issue(&mut tables, &user))
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpResponse, AuthError> {
        self.ensure_online()?;
        if password.len() < 6 {
            return Err(AuthError::Rejected(
                "Password should be at least 6 characters".into(),
            ));
        }
        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        if tables.accounts.contains_key(email) {
            return Err(AuthError::Rejected("User already registered".into()));
        }
        let account = new_account(email, password, self.auto_confirm);
        let user = account.user.clone();
        tables.accounts.insert(email.to_string(), account);

        if self.auto_confirm {
            Ok(SignUpResponse::SignedIn(self.issue(&mut tables, &user)))
        } else {
            Ok(SignUpResponse::ConfirmationRequired(user))
        }
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, AuthError> {
        self.ensure_online()?;
        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        let user_id = tables
            .refresh_tokens
            .remove(refresh_token)
            .ok_or_else(|| AuthError::Rejected("Invalid Refresh Token".into()))?;
        let user = user_by_id(&tables, user_id)
            .ok_or_else(|| AuthError::Rejected("User not found".into()))?;
        Ok(self.issue(&mut tables, &user))
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthError> {
        self.ensure_online()?;
        let mut tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        tables.access_tokens.remove(access_token);
        Ok(())
    }

    async fn current_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        self.ensure_online()?;
        let tables = self.tables.lock().unwrap_or_else(|e| e.into_inner());
        tables
            .access_tokens
            .get(access_token)
            .and_then(|id| user_by_id(&tables, *id))
            .ok_or_else(|| AuthError::Rejected("invalid JWT".into()))
    }
}

/// [`LocalStore`] that forgets everything when dropped.
#[derive(Default)]
pub struct MemoryLocalStore {
    session: Mutex<Option<Session>>,
    preferences: Mutex<Preferences>,
}

impl MemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self { session: Mutex::new(Some(session)), ..Self::default() }
    }
}

impl LocalStore for MemoryLocalStore {
    fn load_session(&self) -> Result<Option<Session>, StoreError> {
        Ok(self.session.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save_session(&self, session: &Session) -> Result<(), StoreError> {
        *self.session.lock().unwrap_or_else(|e| e.into_inner()) = Some(session.clone());
        Ok(())
    }

    fn clear_session(&self) -> Result<(), StoreError> {
        *self.session.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }

    fn load_preferences(&self) -> Result<Preferences, StoreError> {
        Ok(self.preferences.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    fn save_preferences(&self, preferences: &Preferences) -> Result<(), StoreError> {
        *self.preferences.lock().unwrap_or_else(|e| e.into_inner()) = preferences.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_select_orders_and_embeds() {
        let backend = MemoryBackend::new();
        let suite = backend.seed("room_types", json!({ "name": "Suite", "total_rooms": 2 }));
        backend.seed("rooms", json!({ "room_no": "201", "room_type_id": suite.to_string() }));
        backend.seed("rooms", json!({ "room_no": "101", "room_type_id": null }));

        let query = SelectQuery::from("rooms")
            .embed("room_type", "room_types", "room_type_id", &["name"])
            .order_by("room_no", true);
        let rows = backend.select(&query).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["room_no"], "101");
        assert_eq!(rows[0]["room_type"], Value::Null);
        assert_eq!(rows[1]["room_type"], json!({ "name": "Suite" }));
        assert_eq!(backend.calls(), vec![Call::Select("rooms".into())]);
    }

    #[tokio::test]
    async fn test_descending_order_keeps_nulls_last() {
        let backend = MemoryBackend::new();
        backend.seed("countries", json!({ "country_name": "Austria" }));
        backend.seed("countries", json!({ "country_name": null }));
        backend.seed("countries", json!({ "country_name": "Chile" }));

        let rows = backend
            .select(&SelectQuery::from("countries").order_by("country_name", false))
            .await
            .unwrap();
        let names: Vec<&Value> = rows.iter().map(|r| &r["country_name"]).collect();
        assert_eq!(names, vec![&json!("Chile"), &json!("Austria"), &Value::Null]);
    }

    #[tokio::test]
    async fn test_update_merges_and_delete_removes() {
        let backend = MemoryBackend::new();
        let id = backend.seed("countries", json!({ "country_name": "Peru", "is_active": true }));

        backend
            .update("countries", id, json!({ "is_active": false }))
            .await
            .unwrap();
        let rows = backend.rows("countries");
        assert_eq!(rows[0]["country_name"], "Peru");
        assert_eq!(rows[0]["is_active"], false);

        backend.delete("countries", id).await.unwrap();
        assert!(backend.rows("countries").is_empty());
    }

    #[tokio::test]
    async fn test_failing_table() {
        let backend = MemoryBackend::new();
        backend.fail_table("bookings");
        let err = backend.select(&SelectQuery::from("bookings")).await.unwrap_err();
        assert!(matches!(err, BackendError::Http { status: 500, .. }));

        backend.heal_table("bookings");
        assert!(backend.select(&SelectQuery::from("bookings")).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_table() {
        let backend = MemoryBackend::new();
        let err = backend.insert("invoices", json!({})).await.unwrap_err();
        assert!(matches!(err, BackendError::UnknownTable(t) if t == "invoices"));
    }

    #[tokio::test]
    async fn test_auth_sign_up_then_confirm() {
        let auth = MemoryAuth::new();
        let response = auth.sign_up("owner@example.com", "secret1").await.unwrap();
        assert!(matches!(response, SignUpResponse::ConfirmationRequired(_)));

        let err = auth.sign_in_with_password("owner@example.com", "secret1").await.unwrap_err();
        assert_eq!(err.to_string(), "Email not confirmed");

        auth.confirm("owner@example.com");
        let session = auth.sign_in_with_password("owner@example.com", "secret1").await.unwrap();
        let user = auth.current_user(session.access_token.expose()).await.unwrap();
        assert_eq!(user.email.as_deref(), Some("owner@example.com"));
    }

    #[tokio::test]
    async fn test_auth_wrong_password() {
        let auth = MemoryAuth::new().with_user("owner@example.com", "secret1");
        let err = auth.sign_in_with_password("owner@example.com", "nope").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid login credentials");
    }

    #[tokio::test]
    async fn test_refresh_token_is_single_use() {
        let auth = MemoryAuth::new().with_user("owner@example.com", "secret1");
        let session = auth.sign_in_with_password("owner@example.com", "secret1").await.unwrap();
        let refresh = session.refresh_token.unwrap().into_inner();

        assert!(auth.refresh_session(&refresh).await.is_ok());
        assert!(matches!(
            auth.refresh_session(&refresh).await,
            Err(AuthError::Rejected(_))
        ));
    }
}
