use lodge_shared::{Booking, Country, Customer, MealPlan, Room, RoomType, TransferType};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::query::SelectQuery;

/// A table-backed record that list views can fetch, edit and remove by id.
pub trait Entity: DeserializeOwned + Clone + Send + Sync + 'static {
    const TABLE: &'static str;

    fn id(&self) -> Uuid;

    /// The query a list view issues on mount: full rows, related labels and
    /// the fixed sort order.
    fn list_query() -> SelectQuery;
}

impl Entity for Booking {
    const TABLE: &'static str = "bookings";

    fn id(&self) -> Uuid {
        self.id
    }

    fn list_query() -> SelectQuery {
        SelectQuery::from(Self::TABLE)
            .embed("customer", "customers", "customer_id", &["name"])
            .embed("room", "rooms", "room_id", &["room_no"])
            .embed("room_type", "room_types", "room_type_id", &["name"])
            .embed("country", "countries", "country_id", &["country_name"])
            .embed("meal_plan", "meal_plans", "meal_id", &["meal_plan"])
            .embed("transfer_type", "transfer_types", "transfer_id", &["transfer_type"])
            .order_by("created_at", false)
    }
}

impl Entity for Country {
    const TABLE: &'static str = "countries";

    fn id(&self) -> Uuid {
        self.id
    }

    fn list_query() -> SelectQuery {
        SelectQuery::from(Self::TABLE).order_by("country_name", true)
    }
}

impl Entity for Customer {
    const TABLE: &'static str = "customers";

    fn id(&self) -> Uuid {
        self.id
    }

    fn list_query() -> SelectQuery {
        SelectQuery::from(Self::TABLE)
            .embed("country", "countries", "country_id", &["country_name"])
            .order_by("name", true)
    }
}

impl Entity for RoomType {
    const TABLE: &'static str = "room_types";

    fn id(&self) -> Uuid {
        self.id
    }

    fn list_query() -> SelectQuery {
        SelectQuery::from(Self::TABLE).order_by("name", true)
    }
}

impl Entity for Room {
    const TABLE: &'static str = "rooms";

    fn id(&self) -> Uuid {
        self.id
    }

    fn list_query() -> SelectQuery {
        SelectQuery::from(Self::TABLE)
            .embed("room_type", "room_types", "room_type_id", &["name"])
            .order_by("room_no", true)
    }
}

impl Entity for MealPlan {
    const TABLE: &'static str = "meal_plans";

    fn id(&self) -> Uuid {
        self.id
    }

    fn list_query() -> SelectQuery {
        SelectQuery::from(Self::TABLE).order_by("meal_code", true)
    }
}

impl Entity for TransferType {
    const TABLE: &'static str = "transfer_types";

    fn id(&self) -> Uuid {
        self.id
    }

    fn list_query() -> SelectQuery {
        SelectQuery::from(Self::TABLE).order_by("transfer_type", true)
    }
}

/// Table holding the single guest-house profile row.
pub const GUEST_HOUSES: &str = "guest_houses";
