use serde::Serialize;

use crate::models::Recipe;

use super::{ApiClient, ApiError};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RateRecipeBody {
    rating: u8,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CookTimeBody {
    cook_time_minutes: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FavoriteBody {
    is_favorite: bool,
}

impl ApiClient {
    pub async fn get_recipe(&self, recipe_id: &str) -> Result<Recipe, ApiError> {
        self.get(&format!("/recipes/{recipe_id}")).await
    }

    pub async fn list_my_recipes(&self) -> Result<Vec<Recipe>, ApiError> {
        self.get("/recipes").await
    }

    /// Records the user's own rating; the response carries the recipe with
    /// the server-recomputed rating aggregate.
    pub async fn rate_recipe(&self, recipe_id: &str, rating: u8) -> Result<Recipe, ApiError> {
        self.post(
            &format!("/recipes/{recipe_id}/rating"),
            &RateRecipeBody { rating },
        )
        .await
    }

    pub async fn set_cook_time(
        &self,
        recipe_id: &str,
        cook_time_minutes: u32,
    ) -> Result<Recipe, ApiError> {
        self.patch(
            &format!("/recipes/{recipe_id}"),
            &CookTimeBody { cook_time_minutes },
        )
        .await
    }

    pub async fn set_favorite(
        &self,
        recipe_id: &str,
        is_favorite: bool,
    ) -> Result<Recipe, ApiError> {
        self.post(
            &format!("/recipes/{recipe_id}/favorite"),
            &FavoriteBody { is_favorite },
        )
        .await
    }

    pub async fn delete_recipe(&self, recipe_id: &str) -> Result<(), ApiError> {
        self.delete::<serde_json::Value>(&format!("/recipes/{recipe_id}"))
            .await
            .map(|_| ())
    }
}
