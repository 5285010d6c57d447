mod api;
mod cache;
mod models;
mod mutations;
mod session;
mod settings;
mod storage;
mod utils;

pub use api::{ApiClient, ApiError, SubmitExtractionRequest};
pub use cache::{CacheTxn, EntityKind, QueryCache, QueryKey};
pub use models::{
    Collection, CollectionKind, CreditBalance, DiscoveryFeed, DiscoverySection, ExtractionJob,
    ExtractionSource, ExtractionStatus, Ingredient, RatingSummary, Recipe, RecipeStep,
    RecipeUserData,
};
pub use mutations::{
    run_optimistic, LogNotifier, Mutations, Notification, NotificationKind, Notifier,
};
pub use session::{CookingSession, CookingSessionManager};
pub use settings::{AppSettings, MeasurementSystem, SettingsStore};
pub use storage::{FileStore, KeyValueStore, MemoryStore, COOKING_SESSION_KEY, SETTINGS_KEY};
pub use utils::logging::init_logging;

use std::sync::Arc;

const ENABLE_LOGS: bool = true;

/// The client core, constructed once at process start and passed by
/// reference to the UI layer. No ambient singletons: every service hangs off
/// this struct.
pub struct AppCore {
    pub settings: SettingsStore,
    pub session: CookingSessionManager,
    pub cache: QueryCache,
    pub api: ApiClient,
    pub mutations: Mutations,
}

impl AppCore {
    /// Loads settings and restores any persisted cooking session. Startup
    /// never fails: defaults are safe and a missing session slot means Idle.
    pub async fn init(
        store: Arc<dyn KeyValueStore>,
        api: ApiClient,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let settings = SettingsStore::load(store.clone()).await;

        let session = CookingSessionManager::new(store);
        session.restore().await;
        if session.active_session().await.is_some() {
            log_info!("Restored an in-progress cooking session");
        }

        let cache = QueryCache::new();
        let mutations = Mutations::new(cache.clone(), api.clone(), notifier);

        Self {
            settings,
            session,
            cache,
            api,
            mutations,
        }
    }
}
