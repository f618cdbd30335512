use chrono::NaiveDate;
use lodge_core::identity::{AuthContext, AuthState};
use lodge_core::routing::{gate, GateDecision, Route};
use lodge_core::shell::ThemeContext;
use lodge_core::LocalStore;
use lodge_store::{MemoryAuth, MemoryBackend, MemoryLocalStore};
use lodge_views::{
    AlwaysConfirm, BookingsView, DashboardShell, DeleteOutcome, LoadOutcome, LoginForm,
    SubmitOutcome,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_sign_in_then_manage_bookings() {
    let auth = Arc::new(MemoryAuth::new().with_user("desk@palm.test", "secret1"));
    let store = Arc::new(MemoryLocalStore::new());
    let backend = Arc::new(MemoryBackend::new());
    backend.seed("guest_houses", json!({ "gh_name": "Palm Lodge" }));

    let mut context = AuthContext::new(auth.clone(), store.clone());
    assert_eq!(gate("/dashboard/bookings", context.state()), GateDecision::Loading);

    context.resolve().await;
    assert_eq!(
        gate("/dashboard/bookings", context.state()),
        GateDecision::Redirect { to: Route::Login, from: Some(Route::Bookings) }
    );

    let mut login = LoginForm::new(Duration::from_secs(10));
    login.email = "desk@palm.test".into();
    login.password = "secret1".into();
    assert_eq!(login.submit(&mut context).await, Some(Route::DashboardHome));
    assert!(store.load_session().unwrap().is_some());
    assert_eq!(
        gate("/dashboard/bookings", context.state()),
        GateDecision::Render(Route::Bookings)
    );

    let lifetime = CancellationToken::new();
    let mut shell = DashboardShell::new(backend.clone(), ThemeContext::load(store.clone()), lifetime.child_token());
    shell.load_gh_name().await;
    shell.navigate(Route::Bookings);
    assert_eq!(shell.gh_name(), "Palm Lodge");

    let mut bookings = BookingsView::new(backend.clone(), lifetime.child_token());
    assert_eq!(bookings.load().await, LoadOutcome::Loaded(0));

    bookings.list.open_editor(None);
    let form = bookings.list.form_mut().unwrap();
    form.booking_name = "John Smith".into();
    form.adults = 2;
    form.childs = 1;
    form.check_in_date = NaiveDate::from_ymd_opt(2024, 1, 10);
    form.check_out_date = NaiveDate::from_ymd_opt(2024, 1, 15);
    assert_eq!(bookings.editor_totals().map(|t| (t.total_guests, t.bed_nights)), Some((3, 4)));
    assert_eq!(bookings.list.submit().await, SubmitOutcome::Saved);
    assert_eq!(bookings.list.items().len(), 1);

    let id = bookings.list.items()[0].id;
    assert_eq!(bookings.list.delete(id, &AlwaysConfirm).await, DeleteOutcome::Deleted);
    assert!(bookings.list.items().is_empty());

    lifetime.cancel();
    assert_eq!(bookings.load().await, LoadOutcome::Cancelled);

    context.sign_out().await;
    assert_eq!(context.state(), &AuthState::Unauthenticated);
    assert!(store.load_session().unwrap().is_none());
}

#[tokio::test]
async fn test_stored_session_survives_restart() {
    let auth = Arc::new(MemoryAuth::new().with_user("desk@palm.test", "secret1"));
    let store = Arc::new(MemoryLocalStore::new());

    let mut first = AuthContext::new(auth.clone(), store.clone());
    first.sign_in("desk@palm.test", "secret1").await.unwrap();

    let mut second = AuthContext::new(auth.clone(), store.clone());
    second.resolve().await;
    assert_eq!(second.user().and_then(|u| u.email.as_deref()), Some("desk@palm.test"));

    auth.revoke_all();
    let mut third = AuthContext::new(auth, store.clone());
    third.resolve().await;
    assert_eq!(third.state(), &AuthState::Unauthenticated);
    assert!(store.load_session().unwrap().is_none());
}
