use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub name: String,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeStep {
    pub position: u32,
    pub text: String,
    /// Suggested timer length for this step, when the backend detected one.
    pub timer_minutes: Option<u32>,
}

/// Per-user fields attached to a recipe. Only these are ever set
/// optimistically; aggregate fields stay server-owned.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeUserData {
    pub rating: Option<u8>,
    pub is_favorite: bool,
    pub cook_count: u32,
    pub last_cooked_at: Option<DateTime<Utc>>,
}

/// Server-computed rating aggregate. Never recomputed client-side.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummary {
    pub average: f64,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub locale: Option<String>,
    pub cook_time_minutes: Option<u32>,
    pub servings: Option<u32>,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<RecipeStep>,
    #[serde(default)]
    pub rating_summary: RatingSummary,
    #[serde(default)]
    pub user_data: RecipeUserData,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
