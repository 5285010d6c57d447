use crate::models::DiscoveryFeed;

use super::{ApiClient, ApiError};

impl ApiClient {
    /// Fetches the home feed's server-ranked sections for a locale.
    pub async fn get_discovery_feed(&self, locale: &str) -> Result<DiscoveryFeed, ApiError> {
        self.get(&format!("/discovery/feed?locale={locale}")).await
    }
}
