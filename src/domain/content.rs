use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// =============================================================================
// Gallery
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryItem {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
    pub category: String,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateGalleryItemRequest {
    #[validate(length(min = 1, max = 200, message = "must not be empty"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub image_url: String,
    #[validate(length(min = 1, max = 50, message = "must not be empty"))]
    pub category: String,
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
pub struct UpdateGalleryItemRequest {
    #[validate(length(min = 1, max = 200, message = "must not be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

// =============================================================================
// Stats
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stat {
    pub id: Uuid,
    pub label: String,
    pub value: i64,
    pub icon: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateStatRequest {
    #[validate(length(min = 1, max = 100, message = "must not be empty"))]
    pub label: String,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub value: i64,
    pub icon: Option<String>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
pub struct UpdateStatRequest {
    #[validate(length(min = 1, max = 100, message = "must not be empty"))]
    pub label: Option<String>,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub value: Option<i64>,
    pub icon: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

// =============================================================================
// Team showcase
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub description: Option<String>,
    pub avatar_url: Option<String>,
    pub expertise: Vec<String>,
    pub achievements: Vec<String>,
    pub social_links: serde_json::Map<String, serde_json::Value>,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTeamMemberRequest {
    #[validate(length(min = 1, max = 200, message = "must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, max = 100, message = "must not be empty"))]
    pub role: String,
    pub description: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub expertise: Vec<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub social_links: serde_json::Map<String, serde_json::Value>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
pub struct UpdateTeamMemberRequest {
    #[validate(length(min = 1, max = 200, message = "must not be empty"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "must not be empty"))]
    pub role: Option<String>,
    pub description: Option<String>,
    pub avatar_url: Option<String>,
    pub expertise: Option<Vec<String>>,
    pub achievements: Option<Vec<String>>,
    pub social_links: Option<serde_json::Map<String, serde_json::Value>>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}
