use lodge_core::identity::AuthContext;
use lodge_core::routing::{gate, GateDecision, Route};
use lodge_core::shell::ThemeContext;
use lodge_core::{DataApi, LocalStore, ObjectStore};
use lodge_store::app_config::Config;
use lodge_store::{AuthClient, BackendClient, FileLocalStore, RestClient, StorageClient};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::AppError;

/// Everything a command needs, built once per invocation.
pub struct AppState {
    pub config: Config,
    pub auth: AuthContext,
    pub local: Arc<dyn LocalStore>,
    pub api: Arc<dyn DataApi>,
    pub objects: Arc<dyn ObjectStore>,
    pub lifetime: CancellationToken,
}

impl AppState {
    /// Resolves the stored session and builds backend clients that act as
    /// that user (or anonymously when there is none).
    pub async fn connect(config: Config) -> Result<Self, AppError> {
        let client = BackendClient::new(&config.backend)?;
        let local: Arc<dyn LocalStore> = Arc::new(FileLocalStore::new(config.local.data_dir.clone()));

        let mut auth = AuthContext::new(Arc::new(AuthClient::new(client.clone())), local.clone());
        auth.resolve().await;

        let client = match auth.session() {
            Some(session) => client.with_token(session.access_token.expose().clone()),
            None => client,
        };
        info!(backend = %client.base_url(), signed_in = auth.session().is_some(), "Connected");

        Ok(Self::from_parts(
            config,
            auth,
            local,
            Arc::new(RestClient::new(client.clone())),
            Arc::new(StorageClient::new(client)),
        ))
    }

    pub fn from_parts(
        config: Config,
        auth: AuthContext,
        local: Arc<dyn LocalStore>,
        api: Arc<dyn DataApi>,
        objects: Arc<dyn ObjectStore>,
    ) -> Self {
        Self { config, auth, local, api, objects, lifetime: CancellationToken::new() }
    }

    /// Runs the route gate for a command. Only `Render` lets it proceed.
    pub fn require(&self, route: Route) -> Result<(), AppError> {
        match gate(route.path(), self.auth.state()) {
            GateDecision::Render(_) => Ok(()),
            GateDecision::Redirect { from, .. } => Err(AppError::NotSignedIn { from }),
            GateDecision::Loading => Err(AppError::NotSignedIn { from: Some(route) }),
        }
    }

    pub fn theme(&self) -> ThemeContext {
        ThemeContext::load(self.local.clone())
    }

    pub fn login_timeout(&self) -> Duration {
        Duration::from_secs(self.config.ui.login_timeout_seconds)
    }

    pub fn view_lifetime(&self) -> CancellationToken {
        self.lifetime.child_token()
    }
}
