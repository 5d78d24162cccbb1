use regex::Regex;
use std::sync::OnceLock;

/// The bytes after the last `.` in `hostname`, or all of it when there is no
/// dot. A trailing dot yields an empty suffix.
pub fn extract_tld(hostname: &[u8]) -> &[u8] {
    match hostname.iter().rposition(|&b| b == b'.') {
        Some(dot) => &hostname[dot + 1..],
        None => hostname,
    }
}

fn hostname_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_-]+(\.[A-Za-z0-9_-]+)*$").expect("hostname pattern compiles")
    })
}

/// Dot-separated labels of letters, digits, `-` and `_`, with no empty label.
pub fn is_valid_hostname(hostname: &str) -> bool {
    hostname.len() <= 253 && hostname_pattern().is_match(hostname)
}

/// Reduce a log field to a bare hostname. Absolute URLs contribute their
/// host; anything else is taken as-is.
pub fn host_of(field: &str) -> Option<String> {
    if field.contains("://") {
        let url = url::Url::parse(field).ok()?;
        return url.host_str().map(str::to_string);
    }
    Some(field.to_string())
}
