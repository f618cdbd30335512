use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::booking::CountryRef;
use super::country::default_active;
use super::null_as_default;

/// A booking source: tour operator, OTA or direct customer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: Uuid,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub customer_type: Option<String>,
    #[serde(default)]
    pub contact_person: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub country_id: Option<Uuid>,
    #[serde(default = "default_active")]
    pub is_active: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<CountryRef>,
}

impl Customer {
    pub fn country_name(&self) -> Option<&str> {
        self.country.as_ref().map(|c| c.country_name.as_str())
    }
}
