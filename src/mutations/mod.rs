//! Optimistic mutation protocol.
//!
//! Every mutation follows the same five steps: cancel in-flight refetches
//! for the affected keys, snapshot them, apply a locally computed next value,
//! then either overwrite with the authoritative server response (detail key
//! and any list caches containing the entity) or roll the snapshot back and
//! fire a single failure notification. No automatic retry; the user
//! re-triggers the action.

mod collections;
mod notify;
mod recipes;

pub use notify::{LogNotifier, Notification, NotificationKind, Notifier};

use std::future::Future;
use std::sync::Arc;

use crate::{
    api::{ApiClient, ApiError},
    cache::{EntityKind, QueryCache, QueryKey},
};

/// Runs one optimistic mutation. `apply` writes the tentative value,
/// `on_success` writes the authoritative one; the snapshot taken up front is
/// restored verbatim on failure.
///
/// `kinds` names the entity kinds `apply` fans out over (list caches in all
/// their variants), so the snapshot covers every entry the apply touches,
/// not just the keys listed explicitly.
pub async fn run_optimistic<T, Fut>(
    cache: &QueryCache,
    notifier: &dyn Notifier,
    keys: &[QueryKey],
    kinds: &[EntityKind],
    apply: impl FnOnce(&QueryCache),
    request: Fut,
    on_success: impl FnOnce(&QueryCache, &T),
) -> Result<T, ApiError>
where
    Fut: Future<Output = Result<T, ApiError>>,
{
    for key in keys {
        cache.cancel_refetch(key);
    }

    let txn = cache.begin_scope(keys, kinds);
    apply(cache);

    match request.await {
        Ok(value) => {
            on_success(cache, &value);
            txn.commit();
            Ok(value)
        }
        Err(err) => {
            txn.rollback();
            notifier.notify(Notification::error(err.user_message()));
            Err(err)
        }
    }
}

/// Mutation entry points handed to the UI layer. One instance per process,
/// sharing the process-wide cache.
#[derive(Clone)]
pub struct Mutations {
    pub(crate) cache: QueryCache,
    pub(crate) api: ApiClient,
    pub(crate) notifier: Arc<dyn Notifier>,
}

impl Mutations {
    pub fn new(cache: QueryCache, api: ApiClient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            cache,
            api,
            notifier,
        }
    }
}
