//! Shared utility functions used across multiple modules.

use std::sync::Arc;

/// Millisecond clock used to stamp entity timestamps.
///
/// Services take a clock so tests can pin time; production code uses
/// [`system_clock`].
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Clock backed by the system time in Unix milliseconds.
pub fn system_clock() -> Clock {
    Arc::new(now_millis)
}

/// Current Unix timestamp in milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Trimmed contents of `value`, dropping blank strings.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string)
}

pub fn is_http_url(value: &str) -> bool {
    ["http://", "https://"]
        .iter()
        .any(|scheme| value.starts_with(scheme))
}

/// Short single-paragraph excerpt of a relay response body
pub fn compact_text(value: &str) -> String {
    value.trim().chars().take(180).collect()
}

/// At most `max_len` characters; longer text is cut and suffixed with `...`
pub fn truncate_text(text: &str, max_len: usize) -> String {
    match text.char_indices().nth(max_len) {
        None => text.to_string(),
        Some(_) => {
            let kept = text.chars().take(max_len.saturating_sub(3));
            kept.chain("...".chars()).collect()
        }
    }
}
