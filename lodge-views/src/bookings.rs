use lodge_core::booking::{BookingForm, BookingTotals};
use lodge_core::repository::fetch_all;
use lodge_core::tables::GUEST_HOUSES;
use lodge_core::{DataApi, Entity, SelectQuery};
use lodge_shared::{Country, Customer, GuestHouse, MealPlan, Room, RoomType, TransferType};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::entity_list::{EntityList, LoadOutcome};

/// Choices for the booking editor's pickers.
#[derive(Debug, Clone, Default)]
pub struct BookingLookups {
    pub customers: Vec<Customer>,
    pub guest_houses: Vec<GuestHouse>,
    pub room_types: Vec<RoomType>,
    pub rooms: Vec<Room>,
    pub countries: Vec<Country>,
    pub meal_plans: Vec<MealPlan>,
    pub transfer_types: Vec<TransferType>,
}

async fn lookup<T: DeserializeOwned>(api: &dyn DataApi, query: SelectQuery) -> Vec<T> {
    match fetch_all(api, &query).await {
        Ok(rows) => rows,
        Err(e) => {
            error!("Error fetching {}: {}", query.table, e);
            Vec::new()
        }
    }
}

impl BookingLookups {
    /// Fetches every lookup concurrently. Each one that fails is logged and
    /// left empty on its own.
    pub async fn fetch(api: &dyn DataApi) -> Self {
        let (customers, guest_houses, room_types, rooms, countries, meal_plans, transfer_types) = tokio::join!(
            lookup(api, Customer::list_query()),
            lookup(api, SelectQuery::from(GUEST_HOUSES).order_by("gh_name", true)),
            lookup(api, RoomType::list_query()),
            lookup(api, Room::list_query()),
            lookup(api, Country::list_query()),
            lookup(api, MealPlan::list_query()),
            lookup(api, TransferType::list_query()),
        );
        Self { customers, guest_houses, room_types, rooms, countries, meal_plans, transfer_types }
    }
}

pub struct BookingsView {
    api: Arc<dyn DataApi>,
    pub list: EntityList<BookingForm>,
    lookups: BookingLookups,
}

impl BookingsView {
    pub fn new(api: Arc<dyn DataApi>, lifetime: CancellationToken) -> Self {
        Self {
            list: EntityList::with_lifetime(api.clone(), "booking", lifetime),
            api,
            lookups: BookingLookups::default(),
        }
    }

    /// Loads the bookings and all lookups in parallel.
    pub async fn load(&mut self) -> LoadOutcome {
        let token = self.list.lifetime().clone();
        let api = self.api.clone();
        let (outcome, lookups) = tokio::join!(self.list.load(), BookingLookups::fetch(api.as_ref()));
        if !token.is_cancelled() {
            self.lookups = lookups;
        }
        outcome
    }

    pub fn lookups(&self) -> &BookingLookups {
        &self.lookups
    }

    /// Guests and bed-nights of the open editor.
    pub fn editor_totals(&self) -> Option<BookingTotals> {
        self.list.editor().map(|editor| editor.form.totals())
    }

    /// Rooms the room picker offers for the editor's current room type.
    pub fn room_choices(&self) -> Vec<&Room> {
        match self.list.editor() {
            Some(editor) => editor.form.room_choices(&self.lookups.rooms),
            None => self.lookups.rooms.iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::AlwaysConfirm;
    use crate::entity_list::{DeleteOutcome, SubmitOutcome};
    use chrono::NaiveDate;
    use lodge_store::{Call, MemoryBackend};
    use serde_json::json;

    fn backend() -> Arc<MemoryBackend> {
        let backend = Arc::new(MemoryBackend::new());
        let customer = backend.seed("customers", json!({ "name": "John Smith", "is_active": true }));
        let deluxe = backend.seed("room_types", json!({ "name": "Deluxe", "total_rooms": 4 }));
        let standard = backend.seed("room_types", json!({ "name": "Standard", "total_rooms": 8 }));
        backend.seed("rooms", json!({ "room_no": "101", "room_type_id": deluxe.to_string() }));
        backend.seed("rooms", json!({ "room_no": "201", "room_type_id": standard.to_string() }));
        backend.seed("bookings", json!({
            "booking_name": "Smith party",
            "customer_id": customer.to_string(),
            "booking_method": "Foreign Tour Operator",
            "check_in_date": "2024-01-10",
            "check_out_date": "2024-01-15",
            "adults": 2, "childs": 1, "infants": 0,
            "created_at": "2024-01-01T00:00:00Z"
        }));
        backend.seed("bookings", json!({
            "booking_name": "Johnson family",
            "booking_ref": "OTA-778",
            "booking_method": "Online Travel Agent (OTA)",
            "check_in_date": "2024-02-01",
            "check_out_date": "2024-02-03",
            "adults": 2, "childs": 0, "infants": 1,
            "created_at": "2024-01-02T00:00:00Z"
        }));
        backend
    }

    #[tokio::test]
    async fn test_load_with_lookups() {
        let backend = backend();
        let mut view = BookingsView::new(backend.clone(), CancellationToken::new());

        assert_eq!(view.load().await, LoadOutcome::Loaded(2));
        // Newest first.
        assert_eq!(view.list.items()[0].booking_name, "Johnson family");
        assert_eq!(view.list.items()[1].customer_name(), Some("John Smith"));
        assert_eq!(view.lookups().room_types.len(), 2);
        assert_eq!(view.lookups().customers.len(), 1);
    }

    #[tokio::test]
    async fn test_odd_row_does_not_hide_the_others() {
        let backend = backend();
        backend.seed("bookings", json!({
            "booking_name": "Walk-in guest",
            "booking_method": "Walk-in",
            "check_in_date": "2024-03-01",
            "check_out_date": "2024-03-02",
            "created_at": "2024-01-03T00:00:00Z"
        }));
        let mut view = BookingsView::new(backend.clone(), CancellationToken::new());

        assert_eq!(view.load().await, LoadOutcome::Loaded(2));
        let names: Vec<_> = view.list.items().iter().map(|b| b.booking_name.as_str()).collect();
        assert_eq!(names, ["Johnson family", "Smith party"]);
    }

    #[tokio::test]
    async fn test_failing_lookup_is_isolated() {
        let backend = backend();
        backend.fail_table("meal_plans");
        let mut view = BookingsView::new(backend.clone(), CancellationToken::new());

        assert_eq!(view.load().await, LoadOutcome::Loaded(2));
        assert!(view.lookups().meal_plans.is_empty());
        assert_eq!(view.lookups().rooms.len(), 2);
    }

    #[tokio::test]
    async fn test_search_by_customer_name() {
        let backend = backend();
        let mut view = BookingsView::new(backend.clone(), CancellationToken::new());
        view.load().await;

        view.list.set_search("smith");
        let hits = view.list.filtered();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].booking_name, "Smith party");

        view.list.set_search("ota-7");
        assert_eq!(view.list.filtered()[0].booking_name, "Johnson family");
    }

    #[tokio::test]
    async fn test_empty_name_issues_no_call() {
        let backend = backend();
        let mut view = BookingsView::new(backend.clone(), CancellationToken::new());
        view.list.open_editor(None);
        let form = view.list.form_mut().unwrap();
        form.check_in_date = NaiveDate::from_ymd_opt(2024, 3, 1);
        form.check_out_date = NaiveDate::from_ymd_opt(2024, 3, 4);

        assert!(matches!(view.list.submit().await, SubmitOutcome::Invalid(_)));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_editor_totals_and_room_picker() {
        let backend = backend();
        let mut view = BookingsView::new(backend.clone(), CancellationToken::new());
        view.load().await;
        let deluxe = view.lookups().room_types.iter().find(|t| t.name == "Deluxe").unwrap().id;

        view.list.open_editor(None);
        assert_eq!(view.room_choices().len(), 2);

        let form = view.list.form_mut().unwrap();
        form.room_type_id = Some(deluxe);
        form.adults = 2;
        form.childs = 1;
        form.check_in_date = NaiveDate::from_ymd_opt(2024, 1, 10);
        form.check_out_date = NaiveDate::from_ymd_opt(2024, 1, 15);

        let rooms: Vec<&str> = view.room_choices().iter().map(|r| r.room_no.as_str()).collect();
        assert_eq!(rooms, vec!["101"]);
        let totals = view.editor_totals().unwrap();
        assert_eq!(totals.total_guests, 3);
        assert_eq!(totals.bed_nights, 4);
    }

    #[tokio::test]
    async fn test_create_sends_payload_without_totals() {
        let backend = backend();
        let mut view = BookingsView::new(backend.clone(), CancellationToken::new());
        view.list.open_editor(None);
        let form = view.list.form_mut().unwrap();
        form.booking_name = "Walk-in".into();
        form.adults = 1;
        form.check_in_date = NaiveDate::from_ymd_opt(2024, 5, 1);
        form.check_out_date = NaiveDate::from_ymd_opt(2024, 5, 2);

        assert_eq!(view.list.submit().await, SubmitOutcome::Saved);
        let row = backend
            .rows("bookings")
            .into_iter()
            .find(|r| r["booking_name"] == "Walk-in")
            .unwrap();
        assert_eq!(row["booking_ref"], serde_json::Value::Null);
        assert!(row.get("total_guests").is_none());
        assert_eq!(view.list.items().len(), 3);
    }

    #[tokio::test]
    async fn test_confirmed_delete_removes_exactly_that_row() {
        let backend = backend();
        let mut view = BookingsView::new(backend.clone(), CancellationToken::new());
        view.load().await;
        let target = view.list.items()[1].id;
        backend.clear_calls();

        assert_eq!(view.list.delete(target, &AlwaysConfirm).await, DeleteOutcome::Deleted);
        assert_eq!(backend.calls(), vec![Call::Delete("bookings".into(), target)]);
        assert_eq!(view.list.items().len(), 1);
        assert!(view.list.get(target).is_none());
    }
}
