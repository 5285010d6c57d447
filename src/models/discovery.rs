use serde::{Deserialize, Serialize};

use super::recipe::Recipe;

/// A named, server-ranked recipe list shown on the home feed (trending,
/// highest-rated, and so on). Ordering is server-owned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoverySection {
    pub id: String,
    pub title: String,
    pub recipes: Vec<Recipe>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryFeed {
    pub locale: String,
    pub sections: Vec<DiscoverySection>,
}
