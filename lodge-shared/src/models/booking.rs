use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::null_as_default;

/// Channel through which a booking arrived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingMethod {
    #[default]
    #[serde(rename = "Foreign Tour Operator")]
    ForeignTourOperator,
    #[serde(rename = "Local Tour Operator Direct Booking (FIT)")]
    LocalTourOperatorFit,
    #[serde(rename = "Online Travel Agent (OTA)")]
    OnlineTravelAgent,
}

impl BookingMethod {
    pub const ALL: [BookingMethod; 3] = [
        BookingMethod::ForeignTourOperator,
        BookingMethod::LocalTourOperatorFit,
        BookingMethod::OnlineTravelAgent,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            BookingMethod::ForeignTourOperator => "Foreign Tour Operator",
            BookingMethod::LocalTourOperatorFit => "Local Tour Operator Direct Booking (FIT)",
            BookingMethod::OnlineTravelAgent => "Online Travel Agent (OTA)",
        }
    }
}

impl fmt::Display for BookingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub room_no: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomTypeRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CountryRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub country_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealPlanRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub meal_plan: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransferTypeRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub transfer_type: String,
}

/// A guest booking. Total guests and bed-nights are not stored here; they are
/// derived from the dates and party composition wherever they are shown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: Uuid,
    #[serde(default, deserialize_with = "null_as_default")]
    pub booking_name: String,
    #[serde(default)]
    pub customer_id: Option<Uuid>,
    #[serde(default)]
    pub gh_id: Option<Uuid>,
    #[serde(default)]
    pub room_type_id: Option<Uuid>,
    #[serde(default)]
    pub room_id: Option<Uuid>,
    #[serde(default)]
    pub country_id: Option<Uuid>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub booking_method: BookingMethod,
    #[serde(default)]
    pub booking_ref: Option<String>,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    #[serde(default, deserialize_with = "null_as_default")]
    pub adults: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub childs: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub infants: u32,
    #[serde(default)]
    pub meal_id: Option<Uuid>,
    #[serde(default)]
    pub transfer_id: Option<Uuid>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<RoomRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_type: Option<RoomTypeRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<CountryRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_plan: Option<MealPlanRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transfer_type: Option<TransferTypeRef>,
}

impl Booking {
    pub fn customer_name(&self) -> Option<&str> {
        self.customer.as_ref().map(|c| c.name.as_str())
    }

    pub fn room_no(&self) -> Option<&str> {
        self.room.as_ref().map(|r| r.room_no.as_str())
    }

    pub fn room_type_name(&self) -> Option<&str> {
        self.room_type.as_ref().map(|r| r.name.as_str())
    }
}
