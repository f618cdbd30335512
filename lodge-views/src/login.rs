use lodge_core::identity::{AuthContext, SignUpOutcome};
use lodge_core::routing::Route;
use std::time::Duration;
use tokio::time::Instant;
use tracing::warn;

pub const CONFIRMATION_SENT: &str = "Check your email for the confirmation link!";

/// A loading indicator that switches itself off after `timeout`, whether or
/// not the request it tracks has finished.
#[derive(Debug, Clone)]
struct Spinner {
    started: Option<Instant>,
    timeout: Duration,
}

impl Spinner {
    fn new(timeout: Duration) -> Self {
        Self { started: None, timeout }
    }

    fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    fn stop(&mut self) {
        self.started = None;
    }

    fn is_on(&self) -> bool {
        self.started.is_some_and(|started| started.elapsed() < self.timeout)
    }
}

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    error: Option<String>,
    spinner: Spinner,
}

impl LoginForm {
    pub fn new(loading_timeout: Duration) -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            error: None,
            spinner: Spinner::new(loading_timeout),
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.spinner.is_on()
    }

    /// Signs in. On success returns where to go next; on failure keeps the
    /// provider's message for display.
    pub async fn submit(&mut self, auth: &mut AuthContext) -> Option<Route> {
        self.error = None;
        self.spinner.start();

        match auth.sign_in(&self.email, &self.password).await {
            Ok(_) => Some(Route::DashboardHome),
            Err(e) => {
                warn!("Sign-in failed: {}", e);
                self.error = Some(e.to_string());
                self.spinner.stop();
                None
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    error: Option<String>,
    message: Option<String>,
    spinner: Spinner,
}

impl SignupForm {
    pub fn new(loading_timeout: Duration) -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            error: None,
            message: None,
            spinner: Spinner::new(loading_timeout),
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.spinner.is_on()
    }

    /// Registers the account. Returns the dashboard route only when the
    /// provider signed the user straight in.
    pub async fn submit(&mut self, auth: &mut AuthContext) -> Option<Route> {
        self.error = None;
        self.message = None;
        self.spinner.start();

        let result = auth.sign_up(&self.email, &self.password).await;
        self.spinner.stop();
        match result {
            Ok(SignUpOutcome::ConfirmationSent) => {
                self.message = Some(CONFIRMATION_SENT.to_string());
                None
            }
            Ok(SignUpOutcome::SignedIn) => Some(Route::DashboardHome),
            Err(e) => {
                warn!("Sign-up failed: {}", e);
                self.error = Some(e.to_string());
                None
            }
        }
    }
}
