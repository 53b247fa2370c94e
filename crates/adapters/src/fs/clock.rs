use std::time::{SystemTime, UNIX_EPOCH};

use meme_studio_application::Clock;

/// Seconds since the Unix epoch, as stored in `created_at` columns.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_timestamp_string(&self) -> String {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_secs())
            .unwrap_or_default()
            .to_string()
    }
}
