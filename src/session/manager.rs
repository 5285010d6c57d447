use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::storage::{KeyValueStore, COOKING_SESSION_KEY};
use crate::{log_error, log_warn};

use super::state::{format_minutes, CookingSession};

const ENABLE_LOGS: bool = true;

/// Tracks the one in-progress cooking timer across app restarts.
///
/// A single global slot, not per-recipe: starting a new session overwrites
/// the previous one without reporting its elapsed time. A session that is
/// never ended persists indefinitely until explicitly ended or cancelled.
///
/// Persistence failures are logged and swallowed: losing the durable copy
/// only costs restart recovery, and `start_session` must always succeed.
#[derive(Clone)]
pub struct CookingSessionManager {
    store: Arc<dyn KeyValueStore>,
    current: Arc<Mutex<Option<CookingSession>>>,
}

impl CookingSessionManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            current: Arc::new(Mutex::new(None)),
        }
    }

    /// Reads the persisted slot back on process start so an active timer
    /// survives restarts. A corrupt slot clears to Idle.
    pub async fn restore(&self) {
        let raw = match self.store.get(COOKING_SESSION_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(err) => {
                log_warn!("Failed to read persisted cooking session: {err}");
                return;
            }
        };

        match serde_json::from_str::<CookingSession>(&raw) {
            Ok(session) => {
                *self.current.lock().await = Some(session);
            }
            Err(err) => {
                log_warn!("Discarding corrupt cooking session: {err}");
                if let Err(err) = self.store.remove(COOKING_SESSION_KEY).await {
                    log_error!("Failed to clear corrupt cooking session: {err}");
                }
            }
        }
    }

    /// Starts a timer for `recipe_id`, overwriting any active session.
    /// Always succeeds.
    pub async fn start_session(&self, recipe_id: impl Into<String>, recipe_title: impl Into<String>) {
        let session = CookingSession::begin(recipe_id.into(), recipe_title.into(), Utc::now());

        let mut guard = self.current.lock().await;
        *guard = Some(session.clone());
        self.persist(Some(&session)).await;
    }

    /// Ends the active session, returning elapsed whole minutes, or `None`
    /// when idle. Clears the in-memory and durable slot as one replacement.
    pub async fn end_session(&self) -> Option<i64> {
        let mut guard = self.current.lock().await;
        let session = guard.take()?;
        let elapsed = session.elapsed_minutes_at(Utc::now());
        self.persist(None).await;
        Some(elapsed)
    }

    /// Discards the active session without computing a duration. A no-op
    /// when idle.
    pub async fn cancel_session(&self) {
        let mut guard = self.current.lock().await;
        if guard.take().is_some() {
            self.persist(None).await;
        }
    }

    pub async fn active_session(&self) -> Option<CookingSession> {
        self.current.lock().await.clone()
    }

    /// Elapsed whole minutes of the active session, or zero when idle.
    pub async fn elapsed_minutes(&self) -> i64 {
        match self.current.lock().await.as_ref() {
            Some(session) => session.elapsed_minutes_at(Utc::now()),
            None => 0,
        }
    }

    /// Display form of the elapsed time; "0m" when idle.
    pub async fn formatted_elapsed(&self) -> String {
        match self.current.lock().await.as_ref() {
            Some(session) => session.formatted_elapsed_at(Utc::now()),
            None => format_minutes(0),
        }
    }

    async fn persist(&self, session: Option<&CookingSession>) {
        let result = match session {
            Some(session) => match serde_json::to_string(session) {
                Ok(serialized) => self.store.set(COOKING_SESSION_KEY, &serialized).await,
                Err(err) => {
                    log_error!("Failed to serialize cooking session: {err}");
                    return;
                }
            },
            None => self.store.remove(COOKING_SESSION_KEY).await,
        };

        if let Err(err) = result {
            log_error!("Failed to persist cooking session: {err}");
        }
    }
}
