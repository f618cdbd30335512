use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::null_as_default;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealPlan {
    pub id: Uuid,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meal_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub meal_plan: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransferType {
    pub id: Uuid,
    #[serde(default, deserialize_with = "null_as_default")]
    pub transfer_code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub transfer_type: String,
}
