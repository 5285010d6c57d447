use serde::Serialize;

use crate::models::Collection;

use super::{ApiClient, ApiError};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateCollectionBody<'a> {
    name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CollectionRecipeBody<'a> {
    recipe_id: &'a str,
}

impl ApiClient {
    pub async fn list_collections(&self) -> Result<Vec<Collection>, ApiError> {
        self.get("/collections").await
    }

    pub async fn create_collection(&self, name: &str) -> Result<Collection, ApiError> {
        self.post("/collections", &CreateCollectionBody { name })
            .await
    }

    pub async fn add_recipe_to_collection(
        &self,
        collection_id: &str,
        recipe_id: &str,
    ) -> Result<Collection, ApiError> {
        self.post(
            &format!("/collections/{collection_id}/recipes"),
            &CollectionRecipeBody { recipe_id },
        )
        .await
    }

    pub async fn remove_recipe_from_collection(
        &self,
        collection_id: &str,
        recipe_id: &str,
    ) -> Result<Collection, ApiError> {
        self.delete(&format!("/collections/{collection_id}/recipes/{recipe_id}"))
            .await
    }
}
