pub mod models;
pub mod pii;

pub use models::{
    AuthUser, Booking, BookingMethod, Country, Customer, GuestHouse, MealPlan, Room, RoomType,
    Session, TransferType,
};
pub use pii::Masked;
