//! Cache Utilities
//!
//! Timestamp handling and input hygiene shared by the store and the cache.

mod time;
mod validation;

pub use time::{days_since, format_timestamp, learning_id, parse_timestamp};
pub use validation::{normalize_tags, validate_content};
