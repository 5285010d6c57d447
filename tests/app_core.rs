use std::sync::Arc;

use plateful_core::{
    ApiClient, AppCore, CookingSessionManager, FileStore, LogNotifier, MeasurementSystem,
    SettingsStore,
};

fn api() -> ApiClient {
    ApiClient::new("http://127.0.0.1:9")
}

#[tokio::test]
async fn core_boots_with_empty_storage() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::new(dir.path().to_path_buf()).unwrap());

    let core = AppCore::init(store, api(), Arc::new(LogNotifier)).await;

    assert!(core.session.active_session().await.is_none());
    assert!(core.settings.current().await.auto_translate_recipes);
    assert_eq!(core.session.formatted_elapsed().await, "0m");
}

#[tokio::test]
async fn settings_and_session_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::new(dir.path().to_path_buf()).unwrap());

    {
        let core = AppCore::init(store.clone(), api(), Arc::new(LogNotifier)).await;
        core.settings
            .set_measurement_system(MeasurementSystem::Imperial)
            .await
            .unwrap();
        core.session.start_session("r1", "Pasta").await;
    }

    // Second init over the same data directory plays the part of a fresh
    // process.
    let core = AppCore::init(store, api(), Arc::new(LogNotifier)).await;

    assert_eq!(
        core.settings.current().await.measurement_system,
        MeasurementSystem::Imperial
    );
    let session = core.session.active_session().await.unwrap();
    assert_eq!(session.recipe_id, "r1");
    assert_eq!(session.recipe_title, "Pasta");

    let elapsed = core.session.end_session().await;
    assert!(matches!(elapsed, Some(minutes) if minutes >= 0));
    assert_eq!(core.session.end_session().await, None);

    // The durable slot was cleared with the session.
    let again = CookingSessionManager::new(Arc::new(
        FileStore::new(dir.path().to_path_buf()).unwrap(),
    ));
    again.restore().await;
    assert!(again.active_session().await.is_none());
}

#[tokio::test]
async fn settings_reset_clears_persisted_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileStore::new(dir.path().to_path_buf()).unwrap());

    let settings = SettingsStore::load(store.clone()).await;
    settings.set_auto_translate_recipes(false).await.unwrap();
    settings.reset().await.unwrap();

    let reloaded = SettingsStore::load(store).await;
    assert!(reloaded.current().await.auto_translate_recipes);
}
