//! Case-insensitive key matching over the configuration tree.
//!
//! The store keeps keys as written in the files, while environment
//! variables arrive lower-cased. Lookups match either way, preferring the
//! exact spelling when several keys differ only by case.

use serde_json::{Map, Value};

/// Keys of `map` matching `segment`, exact spelling first.
fn candidates<'a>(
    map: &'a Map<String, Value>,
    segment: &'a str,
) -> impl Iterator<Item = (&'a String, &'a Value)> {
    map.get_key_value(segment).into_iter().chain(
        map.iter()
            .filter(move |(key, _)| key.as_str() != segment && key.eq_ignore_ascii_case(segment)),
    )
}

/// Stored spelling of the path `segments`, or `None` if nothing matches.
pub(crate) fn resolve_path(node: &Value, segments: &[&str]) -> Option<Vec<String>> {
    let Some((first, rest)) = segments.split_first() else {
        return Some(Vec::new());
    };
    let Value::Object(map) = node else {
        return None;
    };

    candidates(map, first).find_map(|(key, child)| {
        let mut path = resolve_path(child, rest)?;
        path.insert(0, key.clone());
        Some(path)
    })
}

/// Respells the leading segments that already exist in `root`; the rest
/// are kept as given.
pub(crate) fn stored_spelling(root: &Value, segments: &[String]) -> Vec<String> {
    let mut node = Some(root);
    segments
        .iter()
        .map(|segment| {
            let found = match node {
                Some(Value::Object(map)) => candidates(map, segment).next(),
                _ => None,
            };
            node = found.map(|(_, child)| child);
            found.map(|(key, _)| key.clone()).unwrap_or_else(|| segment.clone())
        })
        .collect()
}
