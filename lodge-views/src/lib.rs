pub mod bookings;
pub mod confirm;
pub mod entity_list;
pub mod home;
pub mod login;
pub mod settings;
pub mod shell;

pub use bookings::{BookingLookups, BookingsView};
pub use confirm::{AlwaysConfirm, Confirm, NeverConfirm};
pub use entity_list::{CountriesView, DeleteOutcome, EntityList, LoadOutcome, SubmitOutcome};
pub use home::{DashboardHome, DashboardSummary};
pub use login::{LoginForm, SignupForm, CONFIRMATION_SENT};
pub use settings::{ProfileEditor, SettingsTab, SettingsView};
pub use shell::{DashboardShell, NavItem};
