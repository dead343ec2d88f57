//! Dotted/indexed JSON path lookup, e.g. `data.items[0].name`.

use serde_json::Value as JsonValue;

/// Walk `path` through `data`, returning `None` on any dead end.
///
/// Each `.`-separated segment descends into an object key; a `[n]` suffix
/// then indexes into the sequence found there. A segment like `[0]` (empty
/// key) indexes the current value directly. Lookups never error: missing
/// keys, out-of-range indexes, malformed indexes, and type mismatches all
/// short-circuit to `None`.
pub fn extract_path<'a>(data: Option<&'a JsonValue>, path: &str) -> Option<&'a JsonValue> {
    if path.is_empty() {
        return None;
    }
    let mut current = data?;

    for segment in path.split('.') {
        current = match parse_segment(segment) {
            Some((key, Some(index))) => {
                let seq = if key.is_empty() {
                    current
                } else {
                    match current {
                        JsonValue::Object(map) => map.get(key)?,
                        _ => return None,
                    }
                };
                match seq {
                    JsonValue::Array(items) => items.get(index)?,
                    _ => return None,
                }
            }
            Some((key, None)) => match current {
                JsonValue::Object(map) => map.get(key)?,
                _ => return None,
            },
            None => return None,
        };
        if current.is_null() {
            return None;
        }
    }

    Some(current)
}

/// Split a segment into its key and optional `[index]` suffix.
fn parse_segment(segment: &str) -> Option<(&str, Option<usize>)> {
    match (segment.find('['), segment.find(']')) {
        (Some(open), Some(close)) if open < close => {
            let index: usize = segment[open + 1..close].parse().ok()?;
            Some((&segment[..open], Some(index)))
        }
        (None, None) => Some((segment, None)),
        _ => None,
    }
}
