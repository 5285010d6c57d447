use serde_json::{json, Value};

use crate::{
    api::ApiError,
    cache::{EntityKind, QueryCache, QueryKey},
    models::Collection,
};

use super::{run_optimistic, Mutations};

fn patch_cached_collection(cache: &QueryCache, collection_id: &str, patch: impl Fn(&mut Value)) {
    let detail = QueryKey::collection(collection_id);
    if let Some(mut value) = cache.get_raw(&detail) {
        patch(&mut value);
        cache.put_raw(detail, value);
    }

    cache.patch_entries(EntityKind::CollectionList, |_, list| {
        if let Some(items) = list.as_array_mut() {
            for item in items.iter_mut() {
                if item["id"] == collection_id {
                    patch(item);
                }
            }
        }
    });
}

fn apply_membership(cache: &QueryCache, collection_id: &str, recipe_id: &str, member: bool) {
    patch_cached_collection(cache, collection_id, |collection| {
        let Some(ids) = collection["recipeIds"].as_array_mut() else {
            return;
        };
        ids.retain(|id| id != recipe_id);
        if member {
            ids.push(json!(recipe_id));
        }
    });
}

fn commit_collection(cache: &QueryCache, collection: &Collection) {
    cache.put(QueryKey::collection(&collection.id), collection);

    let server = match serde_json::to_value(collection) {
        Ok(value) => value,
        Err(err) => {
            log::error!("Failed to serialize collection {}: {err}", collection.id);
            return;
        }
    };

    cache.patch_entries(EntityKind::CollectionList, |_, list| {
        if let Some(items) = list.as_array_mut() {
            for item in items.iter_mut() {
                if item["id"] == collection.id.as_str() {
                    *item = server.clone();
                }
            }
        }
    });
}

impl Mutations {
    pub async fn add_to_collection(
        &self,
        collection_id: &str,
        recipe_id: &str,
    ) -> Result<Collection, ApiError> {
        let keys = [
            QueryKey::collection(collection_id),
            QueryKey::collection_list(),
        ];
        run_optimistic(
            &self.cache,
            self.notifier.as_ref(),
            &keys,
            &[EntityKind::CollectionList],
            |cache| apply_membership(cache, collection_id, recipe_id, true),
            self.api.add_recipe_to_collection(collection_id, recipe_id),
            |cache, collection| commit_collection(cache, collection),
        )
        .await
    }

    pub async fn remove_from_collection(
        &self,
        collection_id: &str,
        recipe_id: &str,
    ) -> Result<Collection, ApiError> {
        let keys = [
            QueryKey::collection(collection_id),
            QueryKey::collection_list(),
        ];
        run_optimistic(
            &self.cache,
            self.notifier.as_ref(),
            &keys,
            &[EntityKind::CollectionList],
            |cache| apply_membership(cache, collection_id, recipe_id, false),
            self.api
                .remove_recipe_from_collection(collection_id, recipe_id),
            |cache, collection| commit_collection(cache, collection),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutations::test_support::RecordingNotifier;

    fn cached_collection(recipe_ids: &[&str]) -> Value {
        json!({
            "id": "c1",
            "name": "Weeknight",
            "kind": "userCreated",
            "recipeIds": recipe_ids,
        })
    }

    #[tokio::test]
    async fn add_is_optimistic_in_detail_and_list_and_rolls_back() {
        let cache = QueryCache::new();
        let notifier = RecordingNotifier::default();
        let detail = QueryKey::collection("c1");
        cache.put_raw(detail.clone(), cached_collection(&["r1"]));
        cache.put_raw(QueryKey::collection_list(), json!([cached_collection(&["r1"])]));

        let result: Result<Collection, ApiError> = run_optimistic(
            &cache,
            &notifier,
            &[detail.clone(), QueryKey::collection_list()],
            &[EntityKind::CollectionList],
            |cache| apply_membership(cache, "c1", "r2", true),
            async {
                let tentative = cache.get_raw(&detail).unwrap();
                assert_eq!(tentative["recipeIds"], json!(["r1", "r2"]));
                let list = cache.get_raw(&QueryKey::collection_list()).unwrap();
                assert_eq!(list[0]["recipeIds"], json!(["r1", "r2"]));
                Err(ApiError::Status {
                    status: 409,
                    message: "already saved".into(),
                })
            },
            |cache, collection| commit_collection(cache, collection),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(cache.get_raw(&detail), Some(cached_collection(&["r1"])));
        assert_eq!(notifier.messages(), vec!["already saved".to_string()]);
    }

    #[test]
    fn membership_apply_adds_once_and_removes() {
        let cache = QueryCache::new();
        let detail = QueryKey::collection("c1");
        cache.put_raw(detail.clone(), cached_collection(&["r1", "r2"]));

        // Adding an existing member keeps a single entry.
        apply_membership(&cache, "c1", "r2", true);
        assert_eq!(
            cache.get_raw(&detail).unwrap()["recipeIds"],
            json!(["r1", "r2"])
        );

        apply_membership(&cache, "c1", "r1", false);
        assert_eq!(cache.get_raw(&detail).unwrap()["recipeIds"], json!(["r2"]));
    }

    #[test]
    fn commit_collection_replaces_list_entry() {
        let cache = QueryCache::new();
        cache.put_raw(
            QueryKey::collection_list(),
            json!([cached_collection(&["r1"]), { "id": "c2", "name": "Other" }]),
        );

        let server: Collection = serde_json::from_value(json!({
            "id": "c1",
            "name": "Weeknight",
            "kind": "userCreated",
            "recipeIds": ["r1", "r2"],
            "createdAt": "2026-01-01T00:00:00Z",
            "updatedAt": "2026-01-02T00:00:00Z"
        }))
        .unwrap();

        assert!(server.contains("r2"));
        assert!(!server.contains("r9"));

        commit_collection(&cache, &server);

        let list = cache.get_raw(&QueryKey::collection_list()).unwrap();
        assert_eq!(list[0]["recipeIds"], json!(["r1", "r2"]));
        assert_eq!(list[1]["id"], "c2");
    }
}
