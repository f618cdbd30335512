use lodge_core::routing::Route;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    /// The gate sent the command to the login page.
    NotSignedIn { from: Option<Route> },
    /// The auth provider refused; carries its message verbatim.
    Rejected(String),
    Validation(String),
    NotFound(String),
    Backend(String),
    Anyhow(anyhow::Error),
}

impl AppError {
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::NotSignedIn { .. } => 2,
            AppError::Validation(_) => 3,
            _ => 1,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotSignedIn { from: Some(route) } => {
                write!(f, "Not signed in; run `lodge login` to open {}", route.path())
            }
            AppError::NotSignedIn { from: None } => write!(f, "Not signed in; run `lodge login`"),
            AppError::Rejected(msg) => write!(f, "{}", msg),
            AppError::Validation(msg) => write!(f, "{}", msg),
            AppError::NotFound(what) => write!(f, "Not found: {}", what),
            AppError::Backend(msg) => write!(f, "{} (see log for details)", msg),
            AppError::Anyhow(err) => write!(f, "{:#}", err),
        }
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Anyhow(err.into())
    }
}
