use chrono::Utc;
use lodge_shared::{AuthUser, Session};
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::AuthError;
use crate::repository::{AuthProvider, LocalStore, SignUpResponse};

#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Loading,
    Authenticated(Session),
    Unauthenticated,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SignUpOutcome {
    ConfirmationSent,
    SignedIn,
}

/// The signed-in state of the dashboard. Starts in [`AuthState::Loading`]
/// until [`AuthContext::resolve`] has checked the persisted session.
pub struct AuthContext {
    provider: Arc<dyn AuthProvider>,
    store: Arc<dyn LocalStore>,
    state: AuthState,
}

impl AuthContext {
    pub fn new(provider: Arc<dyn AuthProvider>, store: Arc<dyn LocalStore>) -> Self {
        Self { provider, store, state: AuthState::Loading }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, AuthState::Loading)
    }

    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            AuthState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.session().map(|s| &s.user)
    }

    /// Loads the stored session, refreshes it when expired and confirms it
    /// with the provider. A session the provider rejects is discarded; one
    /// that cannot be checked because the provider is unreachable is kept on
    /// disk. An expired session that could not be refreshed leaves this run
    /// signed out either way.
    pub async fn resolve(&mut self) -> &AuthState {
        self.state = match self.restore().await {
            Some(session) => AuthState::Authenticated(session),
            None => AuthState::Unauthenticated,
        };
        &self.state
    }

    async fn restore(&self) -> Option<Session> {
        let stored = match self.store.load_session() {
            Ok(stored) => stored?,
            Err(e) => {
                warn!("Ignoring unreadable session: {}", e);
                return None;
            }
        };

        let mut session = if stored.is_expired(Utc::now()) {
            let Some(refresh_token) = stored.refresh_token.as_ref().map(|t| t.expose().clone()) else {
                info!("Stored session expired and cannot be refreshed");
                self.clear();
                return None;
            };
            match self.provider.refresh_session(&refresh_token).await {
                Ok(session) => {
                    self.save(&session);
                    session
                }
                Err(AuthError::Backend(e)) => {
                    warn!("Could not refresh session, keeping it for the next start: {}", e);
                    return None;
                }
                Err(e) => {
                    info!("Session refresh rejected: {}", e);
                    self.clear();
                    return None;
                }
            }
        } else {
            stored
        };

        match self.provider.current_user(session.access_token.expose()).await {
            Ok(user) => {
                session.user = user;
                Some(session)
            }
            Err(AuthError::Backend(e)) => {
                warn!("Could not verify session, keeping it: {}", e);
                Some(session)
            }
            Err(e) => {
                info!("Stored session rejected: {}", e);
                self.clear();
                None
            }
        }
    }

    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<&Session, AuthError> {
        let session = self.provider.sign_in_with_password(email, password).await?;
        self.store.save_session(&session)?;
        info!("Signed in as {}", session.user.email.as_deref().unwrap_or("<no email>"));
        self.state = AuthState::Authenticated(session);
        self.session().ok_or(AuthError::NoSession)
    }

    pub async fn sign_up(&mut self, email: &str, password: &str) -> Result<SignUpOutcome, AuthError> {
        match self.provider.sign_up(email, password).await? {
            SignUpResponse::ConfirmationRequired(_) => Ok(SignUpOutcome::ConfirmationSent),
            SignUpResponse::SignedIn(session) => {
                self.store.save_session(&session)?;
                self.state = AuthState::Authenticated(session);
                Ok(SignUpOutcome::SignedIn)
            }
        }
    }

    /// Ends the session locally even when the provider call fails.
    pub async fn sign_out(&mut self) {
        if let Some(session) = self.session() {
            if let Err(e) = self.provider.sign_out(session.access_token.expose()).await {
                warn!("Remote sign-out failed: {}", e);
            }
        }
        self.clear();
        self.state = AuthState::Unauthenticated;
        info!("Signed out");
    }

    fn save(&self, session: &Session) {
        if let Err(e) = self.store.save_session(session) {
            warn!("Failed to persist session: {}", e);
        }
    }

    fn clear(&self) {
        if let Err(e) = self.store.clear_session() {
            warn!("Failed to clear session: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BackendError, StoreError};
    use crate::shell::Preferences;
    use async_trait::async_trait;
    use lodge_shared::Masked;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    struct FakeStore {
        session: Mutex<Option<Session>>,
    }

    impl LocalStore for FakeStore {
        fn load_session(&self) -> Result<Option<Session>, StoreError> {
            Ok(self.session.lock().unwrap().clone())
        }
        fn save_session(&self, session: &Session) -> Result<(), StoreError> {
            *self.session.lock().unwrap() = Some(session.clone());
            Ok(())
        }
        fn clear_session(&self) -> Result<(), StoreError> {
            *self.session.lock().unwrap() = None;
            Ok(())
        }
        fn load_preferences(&self) -> Result<Preferences, StoreError> {
            Ok(Preferences::default())
        }
        fn save_preferences(&self, _: &Preferences) -> Result<(), StoreError> {
            Ok(())
        }
    }

    enum Verdict {
        Accept,
        Reject,
        Unreachable,
    }

    struct FakeProvider {
        verdict: Verdict,
    }

    fn session(token: &str, expires_at: Option<i64>) -> Session {
        Session {
            access_token: Masked::from(token),
            refresh_token: Some(Masked::from("refresh")),
            expires_at,
            user: AuthUser { id: Uuid::nil(), email: Some("desk@lodge.test".into()), created_at: None },
        }
    }

    #[async_trait]
    impl AuthProvider for FakeProvider {
        async fn sign_in_with_password(&self, _: &str, password: &str) -> Result<Session, AuthError> {
            if password == "secret" {
                Ok(session("fresh", None))
            } else {
                Err(AuthError::Rejected("Invalid login credentials".into()))
            }
        }
        async fn sign_up(&self, _: &str, _: &str) -> Result<SignUpResponse, AuthError> {
            Ok(SignUpResponse::ConfirmationRequired(session("x", None).user))
        }
        async fn refresh_session(&self, _: &str) -> Result<Session, AuthError> {
            match self.verdict {
                Verdict::Accept => Ok(session("refreshed", None)),
                Verdict::Reject => Err(AuthError::Rejected("Invalid Refresh Token".into())),
                Verdict::Unreachable => Err(AuthError::Backend(BackendError::Transport("offline".into()))),
            }
        }
        async fn sign_out(&self, _: &str) -> Result<(), AuthError> {
            Err(AuthError::Backend(BackendError::Transport("offline".into())))
        }
        async fn current_user(&self, _: &str) -> Result<AuthUser, AuthError> {
            match self.verdict {
                Verdict::Accept => Ok(session("x", None).user),
                Verdict::Reject => Err(AuthError::Rejected("JWT expired".into())),
                Verdict::Unreachable => Err(AuthError::Backend(BackendError::Transport("offline".into()))),
            }
        }
    }

    fn context(verdict: Verdict, stored: Option<Session>) -> (AuthContext, Arc<FakeStore>) {
        let store = Arc::new(FakeStore { session: Mutex::new(stored) });
        let ctx = AuthContext::new(Arc::new(FakeProvider { verdict }), store.clone());
        (ctx, store)
    }

    #[tokio::test]
    async fn test_starts_loading_then_resolves_anonymous() {
        let (mut ctx, _) = context(Verdict::Accept, None);
        assert!(ctx.is_loading());
        assert_eq!(ctx.resolve().await, &AuthState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_restores_valid_session() {
        let (mut ctx, _) = context(Verdict::Accept, Some(session("stored", None)));
        ctx.resolve().await;
        assert_eq!(ctx.session().unwrap().access_token.expose(), "stored");
    }

    #[tokio::test]
    async fn test_rejected_session_is_cleared() {
        let (mut ctx, store) = context(Verdict::Reject, Some(session("stored", None)));
        assert_eq!(ctx.resolve().await, &AuthState::Unauthenticated);
        assert!(store.load_session().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_provider_keeps_session() {
        let (mut ctx, _) = context(Verdict::Unreachable, Some(session("stored", None)));
        ctx.resolve().await;
        assert!(ctx.session().is_some());
    }

    #[tokio::test]
    async fn test_expired_session_is_refreshed() {
        let (mut ctx, store) = context(Verdict::Accept, Some(session("old", Some(0))));
        ctx.resolve().await;
        assert_eq!(ctx.session().unwrap().access_token.expose(), "refreshed");
        assert_eq!(store.load_session().unwrap().unwrap().access_token.expose(), "refreshed");
    }

    #[tokio::test]
    async fn test_expired_session_kept_when_refresh_unreachable() {
        let (mut ctx, store) = context(Verdict::Unreachable, Some(session("old", Some(0))));
        assert_eq!(ctx.resolve().await, &AuthState::Unauthenticated);
        assert_eq!(store.load_session().unwrap().unwrap().access_token.expose(), "old");
    }

    #[tokio::test]
    async fn test_expired_session_cleared_when_refresh_rejected() {
        let (mut ctx, store) = context(Verdict::Reject, Some(session("old", Some(0))));
        assert_eq!(ctx.resolve().await, &AuthState::Unauthenticated);
        assert!(store.load_session().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_without_refresh_token_is_cleared() {
        let mut stored = session("old", Some(0));
        stored.refresh_token = None;
        let (mut ctx, store) = context(Verdict::Accept, Some(stored));
        assert_eq!(ctx.resolve().await, &AuthState::Unauthenticated);
        assert!(store.load_session().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sign_in_failure_surfaces_backend_message() {
        let (mut ctx, _) = context(Verdict::Accept, None);
        ctx.resolve().await;
        let err = ctx.sign_in("desk@lodge.test", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid login credentials");
        assert_eq!(ctx.state(), &AuthState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_sign_out_clears_even_when_remote_fails() {
        let (mut ctx, store) = context(Verdict::Accept, None);
        ctx.sign_in("desk@lodge.test", "secret").await.unwrap();
        assert!(store.load_session().unwrap().is_some());

        ctx.sign_out().await;
        assert_eq!(ctx.state(), &AuthState::Unauthenticated);
        assert!(store.load_session().unwrap().is_none());
    }
}
