//! Record types matching the backend tables.
//!
//! Every table row carries a backend-generated `id`. Columns that may come back
//! as `null`, or be left out of a narrow `select`, deserialize to their
//! defaults so the same type serves full rows and lookup projections.

pub mod auth;
pub mod booking;
pub mod country;
pub mod customer;
pub mod guest_house;
pub mod lookup;
pub mod room;

pub use auth::{AuthUser, Session};
pub use booking::{
    Booking, BookingMethod, CountryRef, CustomerRef, MealPlanRef, RoomRef, RoomTypeRef,
    TransferTypeRef,
};
pub use country::Country;
pub use customer::Customer;
pub use guest_house::GuestHouse;
pub use lookup::{MealPlan, TransferType};
pub use room::{Room, RoomType};

use serde::{Deserialize, Deserializer};

/// Treats an explicit `null` the same as a missing column.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
