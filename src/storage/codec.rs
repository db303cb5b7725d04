use crate::constants::START_TIME_FORMAT;
use chrono::NaiveDateTime;

/// Split a comma-joined column ("Jazz, Blues,") into trimmed, non-empty items.
pub fn split_list(joined: &str) -> Vec<String> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn join_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}

/// Case-insensitive substring test over full Unicode case folding.
/// SQLite's `LIKE` only folds ASCII, so text searches filter with this instead.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(START_TIME_FORMAT).to_string()
}

/// Accepts the storage format plus the minute-precision and `T`-separated
/// variants browsers submit.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    [
        START_TIME_FORMAT,
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}
