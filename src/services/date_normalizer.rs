use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

fn iso_date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("static ISO date pattern"))
}

/// Returns the first `yyyy-mm-dd` substring of `raw`.
///
/// Upstream dates sometimes arrive wrapped in serialization noise, e.g.
/// `"Ticker\n   2024-11-22\nName: 0, dtype: datetime64[ns]"`. Strings without
/// any ISO date are returned unchanged so they can still label a chart point.
pub fn normalize_date(raw: &str) -> String {
    match extract_iso_date(raw) {
        Some(date) => date.to_string(),
        None => {
            warn!("No ISO date found in {:?}, using raw value as label", raw);
            raw.to_string()
        }
    }
}

/// Strict variant of [`normalize_date`]: `None` when nothing matches.
pub fn extract_iso_date(raw: &str) -> Option<&str> {
    iso_date_pattern().find(raw).map(|m| m.as_str())
}
