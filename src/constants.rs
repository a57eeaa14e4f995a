use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Per-IP windows untouched for this long are dropped.
pub const RATE_LIMIT_IDLE_TTL_SECS: u64 = 60 * 60;
