use serde_json::{json, Value};

use crate::{
    api::ApiError,
    cache::{EntityKind, QueryCache, QueryKey},
    models::Recipe,
};

use super::{run_optimistic, Mutations};

/// Applies `patch` to the cached recipe wherever it appears: the detail
/// entry and every cached recipe list containing it. Works on raw JSON so
/// untouched fields (aggregates in particular) pass through unchanged.
fn patch_cached_recipe(cache: &QueryCache, recipe_id: &str, patch: impl Fn(&mut Value)) {
    let detail = QueryKey::recipe(recipe_id);
    if let Some(mut value) = cache.get_raw(&detail) {
        patch(&mut value);
        cache.put_raw(detail, value);
    }

    cache.patch_entries(EntityKind::RecipeList, |_, list| {
        if let Some(items) = list.as_array_mut() {
            for item in items.iter_mut() {
                if item["id"] == recipe_id {
                    patch(item);
                }
            }
        }
    });
}

/// Only the user's own rating is set optimistically; the aggregate
/// `ratingSummary` stays untouched until the server responds, since the
/// client cannot do the aggregate math correctly.
pub(crate) fn apply_user_rating(cache: &QueryCache, recipe_id: &str, rating: u8) {
    patch_cached_recipe(cache, recipe_id, |recipe| {
        recipe["userData"]["rating"] = json!(rating);
    });
}

pub(crate) fn apply_favorite(cache: &QueryCache, recipe_id: &str, is_favorite: bool) {
    patch_cached_recipe(cache, recipe_id, |recipe| {
        recipe["userData"]["isFavorite"] = json!(is_favorite);
    });
}

pub(crate) fn apply_cook_time(cache: &QueryCache, recipe_id: &str, minutes: u32) {
    patch_cached_recipe(cache, recipe_id, |recipe| {
        recipe["cookTimeMinutes"] = json!(minutes);
    });
}

/// Overwrites the optimistic value with the authoritative server recipe, in
/// the detail entry and inside every cached list holding it, including the
/// recipe rows embedded in cached discovery-feed sections.
pub(crate) fn commit_recipe(cache: &QueryCache, recipe: &Recipe) {
    cache.put(QueryKey::recipe(&recipe.id), recipe);

    let server = match serde_json::to_value(recipe) {
        Ok(value) => value,
        Err(err) => {
            log::error!("Failed to serialize recipe {}: {err}", recipe.id);
            return;
        }
    };

    cache.patch_entries(EntityKind::RecipeList, |_, list| {
        if let Some(items) = list.as_array_mut() {
            for item in items.iter_mut() {
                if item["id"] == recipe.id.as_str() {
                    *item = server.clone();
                }
            }
        }
    });

    cache.patch_entries(EntityKind::DiscoveryFeed, |_, feed| {
        let Some(sections) = feed["sections"].as_array_mut() else {
            return;
        };
        for section in sections.iter_mut() {
            if let Some(items) = section["recipes"].as_array_mut() {
                for item in items.iter_mut() {
                    if item["id"] == recipe.id.as_str() {
                        *item = server.clone();
                    }
                }
            }
        }
    });
}

impl Mutations {
    pub async fn rate_recipe(&self, recipe_id: &str, rating: u8) -> Result<Recipe, ApiError> {
        let keys = [QueryKey::recipe(recipe_id), QueryKey::my_recipes()];
        run_optimistic(
            &self.cache,
            self.notifier.as_ref(),
            &keys,
            &[EntityKind::RecipeList],
            |cache| apply_user_rating(cache, recipe_id, rating),
            self.api.rate_recipe(recipe_id, rating),
            |cache, recipe| commit_recipe(cache, recipe),
        )
        .await
    }

    pub async fn set_favorite(
        &self,
        recipe_id: &str,
        is_favorite: bool,
    ) -> Result<Recipe, ApiError> {
        let keys = [QueryKey::recipe(recipe_id), QueryKey::my_recipes()];
        run_optimistic(
            &self.cache,
            self.notifier.as_ref(),
            &keys,
            &[EntityKind::RecipeList],
            |cache| apply_favorite(cache, recipe_id, is_favorite),
            self.api.set_favorite(recipe_id, is_favorite),
            |cache, recipe| commit_recipe(cache, recipe),
        )
        .await
    }

    pub async fn set_cook_time(&self, recipe_id: &str, minutes: u32) -> Result<Recipe, ApiError> {
        let keys = [QueryKey::recipe(recipe_id), QueryKey::my_recipes()];
        run_optimistic(
            &self.cache,
            self.notifier.as_ref(),
            &keys,
            &[EntityKind::RecipeList],
            |cache| apply_cook_time(cache, recipe_id, minutes),
            self.api.set_cook_time(recipe_id, minutes),
            |cache, recipe| commit_recipe(cache, recipe),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutations::test_support::RecordingNotifier;

    fn cached_recipe(rating: u8) -> Value {
        json!({
            "id": "r1",
            "title": "Pasta",
            "userData": { "rating": rating, "isFavorite": false, "cookCount": 2 },
            "ratingSummary": { "average": 4.2, "count": 17 }
        })
    }

    #[tokio::test]
    async fn rating_is_optimistic_and_rolls_back_on_failure() {
        let cache = QueryCache::new();
        let notifier = RecordingNotifier::default();
        let detail = QueryKey::recipe("r1");
        cache.put_raw(detail.clone(), cached_recipe(3));
        cache.put_raw(QueryKey::my_recipes(), json!([cached_recipe(3)]));

        // The request future runs after the optimistic apply, so it observes
        // the tentative value the UI would render before the response lands.
        let result: Result<Recipe, ApiError> = run_optimistic(
            &cache,
            &notifier,
            &[detail.clone(), QueryKey::my_recipes()],
            &[EntityKind::RecipeList],
            |cache| apply_user_rating(cache, "r1", 5),
            async {
                let tentative = cache.get_raw(&detail).unwrap();
                assert_eq!(tentative["userData"]["rating"], 5);
                // Aggregate untouched by the optimistic write.
                assert_eq!(tentative["ratingSummary"]["average"], 4.2);
                Err(ApiError::Status {
                    status: 500,
                    message: "rating failed".into(),
                })
            },
            |cache, recipe| commit_recipe(cache, recipe),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(cache.get_raw(&detail), Some(cached_recipe(3)));
        assert_eq!(
            cache.get_raw(&QueryKey::my_recipes()),
            Some(json!([cached_recipe(3)]))
        );
        // Exactly one failure toast.
        assert_eq!(notifier.messages(), vec!["rating failed".to_string()]);
    }

    #[tokio::test]
    async fn failure_restores_every_cached_list_variant() {
        let cache = QueryCache::new();
        let notifier = RecordingNotifier::default();
        let detail = QueryKey::recipe("r1");
        // A list entry beyond the keys named by the mutation, e.g. cached
        // search results for another locale.
        let search = QueryKey::new(EntityKind::RecipeList, "search").with_variant("de");
        cache.put_raw(detail.clone(), cached_recipe(3));
        cache.put_raw(QueryKey::my_recipes(), json!([cached_recipe(3)]));
        cache.put_raw(search.clone(), json!([cached_recipe(3)]));

        let result: Result<Recipe, ApiError> = run_optimistic(
            &cache,
            &notifier,
            &[detail.clone(), QueryKey::my_recipes()],
            &[EntityKind::RecipeList],
            |cache| apply_user_rating(cache, "r1", 5),
            async {
                // The apply fanned out into the variant list as well.
                let tentative = cache.get_raw(&search).unwrap();
                assert_eq!(tentative[0]["userData"]["rating"], 5);
                Err(ApiError::Status {
                    status: 500,
                    message: "rating failed".into(),
                })
            },
            |cache, recipe| commit_recipe(cache, recipe),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(cache.get_raw(&detail), Some(cached_recipe(3)));
        assert_eq!(
            cache.get_raw(&QueryKey::my_recipes()),
            Some(json!([cached_recipe(3)]))
        );
        assert_eq!(cache.get_raw(&search), Some(json!([cached_recipe(3)])));
        assert_eq!(notifier.messages(), vec!["rating failed".to_string()]);
    }

    #[tokio::test]
    async fn rate_recipe_failure_notifies_with_generic_message() {
        // Nothing listens on this port, so the request fails at the
        // transport layer and the toast falls back to the generic text.
        let api = crate::api::ApiClient::new("http://127.0.0.1:9");
        let cache = QueryCache::new();
        let notifier = std::sync::Arc::new(RecordingNotifier::default());
        cache.put_raw(QueryKey::recipe("r1"), cached_recipe(3));

        let mutations = Mutations::new(cache.clone(), api, notifier.clone());
        let result = mutations.rate_recipe("r1", 5).await;

        assert!(result.is_err());
        assert_eq!(
            cache.get_raw(&QueryKey::recipe("r1")),
            Some(cached_recipe(3))
        );
        assert_eq!(notifier.messages().len(), 1);
    }

    #[test]
    fn commit_recipe_keeps_list_and_detail_consistent() {
        let cache = QueryCache::new();
        cache.put_raw(QueryKey::recipe("r1"), cached_recipe(3));
        cache.put_raw(
            QueryKey::my_recipes(),
            json!([cached_recipe(3), { "id": "r2", "title": "Ramen" }]),
        );

        let server: Recipe = serde_json::from_value(json!({
            "id": "r1",
            "title": "Pasta",
            "ingredients": [],
            "steps": [],
            "userData": { "rating": 5, "isFavorite": false, "cookCount": 2 },
            "ratingSummary": { "average": 4.3, "count": 18 },
            "createdAt": "2026-01-01T00:00:00Z",
            "updatedAt": "2026-01-02T00:00:00Z"
        }))
        .unwrap();

        commit_recipe(&cache, &server);

        let detail = cache.get_raw(&QueryKey::recipe("r1")).unwrap();
        assert_eq!(detail["userData"]["rating"], 5);
        assert_eq!(detail["ratingSummary"]["count"], 18);

        let list = cache.get_raw(&QueryKey::my_recipes()).unwrap();
        assert_eq!(list[0]["ratingSummary"]["count"], 18);
        // Unrelated entries pass through untouched.
        assert_eq!(list[1]["id"], "r2");
    }

    #[test]
    fn commit_recipe_updates_discovery_feed_sections() {
        let cache = QueryCache::new();
        cache.put_raw(
            QueryKey::discovery_feed("en"),
            json!({
                "locale": "en",
                "sections": [
                    { "id": "trending", "title": "Trending", "recipes": [cached_recipe(3)] },
                    { "id": "top", "title": "Highest rated", "recipes": [{ "id": "r2" }] }
                ]
            }),
        );

        let server: Recipe = serde_json::from_value(json!({
            "id": "r1",
            "title": "Pasta",
            "ingredients": [],
            "steps": [],
            "userData": { "rating": 5, "isFavorite": false, "cookCount": 2 },
            "ratingSummary": { "average": 4.3, "count": 18 },
            "createdAt": "2026-01-01T00:00:00Z",
            "updatedAt": "2026-01-02T00:00:00Z"
        }))
        .unwrap();

        commit_recipe(&cache, &server);

        let feed = cache.get_raw(&QueryKey::discovery_feed("en")).unwrap();
        assert_eq!(feed["sections"][0]["recipes"][0]["userData"]["rating"], 5);
        assert_eq!(
            feed["sections"][0]["recipes"][0]["ratingSummary"]["count"],
            18
        );
        assert_eq!(feed["sections"][1]["recipes"][0]["id"], "r2");
    }

    #[test]
    fn optimistic_apply_skips_absent_entries() {
        let cache = QueryCache::new();
        // No cached detail or lists; applying must not create entries.
        apply_user_rating(&cache, "r1", 5);
        assert!(cache.get_raw(&QueryKey::recipe("r1")).is_none());
    }
}
