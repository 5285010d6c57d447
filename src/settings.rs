use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::storage::{KeyValueStore, SETTINGS_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MeasurementSystem {
    Metric,
    Imperial,
}

impl Default for MeasurementSystem {
    fn default() -> Self {
        MeasurementSystem::Metric
    }
}

/// User preferences persisted under [`SETTINGS_KEY`].
///
/// Every field has a serde default so blobs written by older app versions
/// load with newer keys back-filled instead of failing or leaving holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub auto_translate_recipes: bool,
    pub measurement_system: MeasurementSystem,
    pub cooking_mode_keep_awake: bool,
    pub notifications_enabled: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            auto_translate_recipes: true,
            measurement_system: MeasurementSystem::default(),
            cooking_mode_keep_awake: true,
            notifications_enabled: true,
        }
    }
}

/// Durable settings store. Single-key updates apply in memory first, then
/// write the whole object through; a failed write surfaces to the caller so
/// the UI never silently pretends persistence succeeded.
///
/// Holding `data` across the write serializes concurrent updates (one
/// writer, FIFO), so two racing updates cannot interleave their blobs.
pub struct SettingsStore {
    store: Arc<dyn KeyValueStore>,
    data: Mutex<AppSettings>,
}

impl SettingsStore {
    /// Loads settings from durable storage. Absence or a corrupt blob
    /// resolves to defaults; load never fails.
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let data = match store.get(SETTINGS_KEY).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                log::warn!("Discarding corrupt settings blob: {err}");
                AppSettings::default()
            }),
            Ok(None) => AppSettings::default(),
            Err(err) => {
                log::warn!("Failed to read settings, using defaults: {err}");
                AppSettings::default()
            }
        };

        Self {
            store,
            data: Mutex::new(data),
        }
    }

    pub async fn current(&self) -> AppSettings {
        self.data.lock().await.clone()
    }

    pub async fn set_auto_translate_recipes(&self, enabled: bool) -> Result<()> {
        self.update(|s| s.auto_translate_recipes = enabled).await
    }

    pub async fn set_measurement_system(&self, system: MeasurementSystem) -> Result<()> {
        self.update(|s| s.measurement_system = system).await
    }

    pub async fn set_cooking_mode_keep_awake(&self, enabled: bool) -> Result<()> {
        self.update(|s| s.cooking_mode_keep_awake = enabled).await
    }

    pub async fn set_notifications_enabled(&self, enabled: bool) -> Result<()> {
        self.update(|s| s.notifications_enabled = enabled).await
    }

    /// Restores and persists the full default set in one operation.
    pub async fn reset(&self) -> Result<()> {
        let mut guard = self.data.lock().await;
        *guard = AppSettings::default();
        self.persist(&guard).await
    }

    async fn update(&self, apply: impl FnOnce(&mut AppSettings)) -> Result<()> {
        let mut guard = self.data.lock().await;
        apply(&mut guard);
        self.persist(&guard).await
    }

    async fn persist(&self, data: &AppSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        self.store
            .set(SETTINGS_KEY, &serialized)
            .await
            .context("Failed to persist settings")
    }
}
