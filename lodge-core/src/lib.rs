pub mod booking;
pub mod error;
pub mod forms;
pub mod identity;
pub mod query;
pub mod repository;
pub mod routing;
pub mod search;
pub mod shell;
pub mod tables;

pub use error::{AuthError, BackendError, StoreError, ValidationError};
pub use query::SelectQuery;
pub use repository::{AuthProvider, DataApi, LocalStore, ObjectStore};
pub use tables::Entity;

pub type CoreResult<T> = Result<T, BackendError>;
