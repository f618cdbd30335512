use chrono::{DateTime, Utc};
use lodge_shared::{Country, Customer, GuestHouse, Room, RoomType};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::tables::Entity;

/// Editor state for one entity type.
pub trait EntityForm: Default + Clone + Send + Sync {
    type Entity: Entity;

    /// Prefills the editor from an existing row.
    fn from_entity(entity: &Self::Entity) -> Self;

    /// Required-field presence only. A failing form is never submitted.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Column values written on create and update.
    fn payload(&self) -> Value;
}

pub(crate) fn blank_to_null(value: &str) -> Value {
    if value.is_empty() {
        Value::Null
    } else {
        Value::String(value.to_string())
    }
}

/// Stamps an update payload with its modification time.
pub fn with_updated_at(mut payload: Value, now: DateTime<Utc>) -> Value {
    if let Value::Object(map) = &mut payload {
        map.insert("updated_at".into(), Value::String(now.to_rfc3339()));
    }
    payload
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountryForm {
    pub country_name: String,
    pub is_active: bool,
}

impl Default for CountryForm {
    fn default() -> Self {
        Self { country_name: String::new(), is_active: true }
    }
}

impl EntityForm for CountryForm {
    type Entity = Country;

    fn from_entity(country: &Country) -> Self {
        Self { country_name: country.country_name.clone(), is_active: country.is_active }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.country_name.trim().is_empty() {
            return Err(ValidationError::MissingField("country_name"));
        }
        Ok(())
    }

    fn payload(&self) -> Value {
        json!({ "country_name": self.country_name, "is_active": self.is_active })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomTypeForm {
    pub gh_id: Option<Uuid>,
    pub name: String,
    pub total_rooms: u32,
}

impl EntityForm for RoomTypeForm {
    type Entity = RoomType;

    fn from_entity(room_type: &RoomType) -> Self {
        Self {
            gh_id: room_type.gh_id,
            name: room_type.name.clone(),
            total_rooms: room_type.total_rooms,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        Ok(())
    }

    fn payload(&self) -> Value {
        json!({ "gh_id": self.gh_id, "name": self.name, "total_rooms": self.total_rooms })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomForm {
    pub room_no: String,
    pub room_type_id: Option<Uuid>,
    pub size: String,
}

impl EntityForm for RoomForm {
    type Entity = Room;

    fn from_entity(room: &Room) -> Self {
        Self {
            room_no: room.room_no.clone(),
            room_type_id: room.room_type_id,
            size: room.size.clone().unwrap_or_default(),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.room_no.is_empty() {
            return Err(ValidationError::MissingField("room_no"));
        }
        if self.room_type_id.is_none() {
            return Err(ValidationError::MissingField("room_type_id"));
        }
        Ok(())
    }

    fn payload(&self) -> Value {
        json!({
            "room_no": self.room_no,
            "room_type_id": self.room_type_id,
            "size": blank_to_null(&self.size),
        })
    }
}

/// Operator / customer editor.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerForm {
    pub name: String,
    pub customer_type: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub country_id: Option<Uuid>,
    pub is_active: bool,
}

impl Default for CustomerForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            customer_type: String::new(),
            contact_person: String::new(),
            email: String::new(),
            phone: String::new(),
            country_id: None,
            is_active: true,
        }
    }
}

impl EntityForm for CustomerForm {
    type Entity = Customer;

    fn from_entity(customer: &Customer) -> Self {
        Self {
            name: customer.name.clone(),
            customer_type: customer.customer_type.clone().unwrap_or_default(),
            contact_person: customer.contact_person.clone().unwrap_or_default(),
            email: customer.email.clone().unwrap_or_default(),
            phone: customer.phone.clone().unwrap_or_default(),
            country_id: customer.country_id,
            is_active: customer.is_active,
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        Ok(())
    }

    fn payload(&self) -> Value {
        json!({
            "name": self.name,
            "customer_type": blank_to_null(&self.customer_type),
            "contact_person": blank_to_null(&self.contact_person),
            "email": blank_to_null(&self.email),
            "phone": blank_to_null(&self.phone),
            "country_id": self.country_id,
            "is_active": self.is_active,
        })
    }
}

/// Column values written when the guest-house profile is saved.
pub fn guest_house_payload(profile: &GuestHouse) -> Value {
    json!({
        "gh_name": profile.gh_name,
        "contact_number": profile.contact_number,
        "email": profile.email,
        "website": profile.website,
        "address": profile.address,
        "tin_no": profile.tin_no,
        "permit_no": profile.permit_no,
        "company_name": profile.company_name,
        "company_reg_no": profile.company_reg_no,
        "logo_url": profile.logo_url,
        "is_active": profile.is_active,
    })
}
