//! Masking and truncation applied to everything that leaves the engine.

use std::collections::BTreeMap;

pub const MASK: &str = "***MASKED***";

pub const TRUNCATION_MARKER: &str = "\n... [TRUNCATED]";

/// Header names whose values must never reach a result record or log,
/// matched case-insensitively.
const SENSITIVE_HEADERS: [&str; 9] = [
    "authorization",
    "x-api-key",
    "api-key",
    "token",
    "x-auth-token",
    "cookie",
    "set-cookie",
    "x-access-token",
    "x-secret",
];

/// Replace sensitive header values with [`MASK`], leaving all others
/// untouched. Applied to every persisted request header map.
pub fn mask_headers(headers: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    headers
        .iter()
        .map(|(k, v)| {
            let value = if is_sensitive(k) { MASK.to_string() } else { v.clone() };
            (k.clone(), value)
        })
        .collect()
}

fn is_sensitive(name: &str) -> bool {
    SENSITIVE_HEADERS.iter().any(|s| name.eq_ignore_ascii_case(s))
}

/// Cap a stored body copy at `max_bytes`, appending [`TRUNCATION_MARKER`]
/// when anything was cut. The cut lands on a char boundary.
pub fn truncate_body(text: &str, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text.to_string();
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{}", &text[..end], TRUNCATION_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn masks_sensitive_headers_in_any_case() {
        let input = headers(&[
            ("Authorization", "Bearer secret"),
            ("X-API-KEY", "k"),
            ("set-Cookie", "session=1"),
            ("Content-Type", "application/json"),
        ]);
        let masked = mask_headers(&input);
        assert_eq!(masked["Authorization"], MASK);
        assert_eq!(masked["X-API-KEY"], MASK);
        assert_eq!(masked["set-Cookie"], MASK);
        assert_eq!(masked["Content-Type"], "application/json");
    }

    #[test]
    fn masking_covers_every_listed_name() {
        let input = headers(&[
            ("authorization", "a"),
            ("x-api-key", "b"),
            ("api-key", "c"),
            ("token", "d"),
            ("x-auth-token", "e"),
            ("cookie", "f"),
            ("set-cookie", "g"),
            ("x-access-token", "h"),
            ("x-secret", "i"),
        ]);
        let masked = mask_headers(&input);
        assert!(masked.values().all(|v| v == MASK));
    }

    #[test]
    fn short_bodies_pass_through() {
        assert_eq!(truncate_body("hello", 10), "hello");
    }

    #[test]
    fn long_bodies_get_the_marker() {
        let body = "x".repeat(20);
        let out = truncate_body(&body, 10);
        assert_eq!(out, format!("{}{}", "x".repeat(10), TRUNCATION_MARKER));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let body = "ééééé"; // 2 bytes per char
        let out = truncate_body(body, 5);
        assert!(out.starts_with("éé"));
        assert!(out.ends_with(TRUNCATION_MARKER));
    }
}
