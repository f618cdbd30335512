use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::booking::RoomTypeRef;
use super::null_as_default;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomType {
    pub id: Uuid,
    #[serde(default)]
    pub gh_id: Option<Uuid>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_rooms: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Room {
    pub id: Uuid,
    #[serde(default, deserialize_with = "null_as_default")]
    pub room_no: String,
    #[serde(default)]
    pub room_type_id: Option<Uuid>,
    #[serde(default)]
    pub size: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_type: Option<RoomTypeRef>,
}

impl Room {
    pub fn room_type_name(&self) -> Option<&str> {
        self.room_type.as_ref().map(|r| r.name.as_str())
    }
}
