use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::country::default_active;
use super::null_as_default;

/// The property managed by this dashboard. Only the first row of
/// `guest_houses` is used.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GuestHouse {
    #[serde(default)]
    pub id: Option<Uuid>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gh_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contact_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub website: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tin_no: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub permit_no: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company_reg_no: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}
