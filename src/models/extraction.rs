use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the user handed the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtractionSource {
    Photo,
    Link,
    Voice,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExtractionStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ExtractionStatus {
    /// Whether the job has reached a terminal state and polling can stop.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExtractionStatus::Completed | ExtractionStatus::Failed)
    }
}

/// A backend-tracked asynchronous task converting a photo/link/voice/text
/// source into a structured recipe. The client only polls status/id fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionJob {
    pub id: String,
    pub source: ExtractionSource,
    pub status: ExtractionStatus,
    /// Set once the job completes.
    pub recipe_id: Option<String>,
    /// Backend-supplied reason when the job failed.
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Remaining extraction credits on the user's subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditBalance {
    pub remaining: u32,
    pub renews_at: Option<DateTime<Utc>>,
}
