//! Category Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category entity
///
/// Slug is unique. A category referenced by products cannot be removed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub display_order: i32,
}
