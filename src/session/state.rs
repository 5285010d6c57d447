use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const MS_PER_MINUTE: i64 = 60_000;

/// The single in-progress cooking timer. Replaced wholesale on every
/// transition, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookingSession {
    pub recipe_id: String,
    pub recipe_title: String,
    /// Wall-clock start, persisted as milliseconds since epoch. Elapsed time
    /// is derived from the wall clock, so it shifts with device clock
    /// changes; no monotonic source is used.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub started_at: DateTime<Utc>,
}

impl CookingSession {
    pub fn begin(recipe_id: String, recipe_title: String, started_at: DateTime<Utc>) -> Self {
        Self {
            recipe_id,
            recipe_title,
            started_at,
        }
    }

    /// Whole minutes elapsed at `now`, floored; clamped to zero when the
    /// clock has moved backwards past the start.
    pub fn elapsed_minutes_at(&self, now: DateTime<Utc>) -> i64 {
        let elapsed_ms = now.timestamp_millis() - self.started_at.timestamp_millis();
        (elapsed_ms / MS_PER_MINUTE).max(0)
    }

    pub fn formatted_elapsed_at(&self, now: DateTime<Utc>) -> String {
        format_minutes(self.elapsed_minutes_at(now))
    }
}

/// Renders a minute count the way cooking mode shows it: "42m" under an
/// hour, "1h 5m" above.
pub fn format_minutes(minutes: i64) -> String {
    if minutes >= 60 {
        format!("{}h {}m", minutes / 60, minutes % 60)
    } else {
        format!("{minutes}m")
    }
}
