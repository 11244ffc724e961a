//! Menu item model

use crate::types::EntityId;
use serde::{Deserialize, Serialize};

/// Menu category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MenuCategory {
    Food,
    Drink,
    Snack,
}

/// Menu item entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuItem {
    pub id: EntityId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: f64,
    pub category: MenuCategory,
    pub is_available: bool,
    pub stock: i32,
    /// Opaque reference served by the image endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}
