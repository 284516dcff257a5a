use crate::path::{parse_path, split_at_fan_out, Segment};
use serde_json::{Map, Value};
use tracing::debug;

/// A concrete step taken through a source document, with the key spelled
/// the way the source spells it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<'a> {
    Key(&'a str),
    Index(usize),
}

/// Result of walking a simple path: the steps taken and the value reached.
#[derive(Debug, Clone)]
pub struct Located<'a> {
    pub steps: Vec<Step<'a>>,
    pub value: &'a Value,
}

/// Case-insensitive object lookup: exact match first, then the first key
/// whose lowercase form matches. Returns the stored key with its value.
pub fn get_ci<'a>(map: &'a Map<String, Value>, key: &str) -> Option<(&'a str, &'a Value)> {
    if let Some((k, v)) = map.get_key_value(key) {
        return Some((k.as_str(), v));
    }
    let lower = key.to_lowercase();
    map.iter()
        .find(|(k, _)| k.to_lowercase() == lower)
        .map(|(k, v)| (k.as_str(), v))
}

/// Normalise a possibly negative index against `len`.
pub fn normalize_index(i: i64, len: usize) -> Option<usize> {
    let len = len as i64;
    let idx = if i < 0 { len + i } else { i };
    (0..len).contains(&idx).then_some(idx as usize)
}

/// Walk key and index segments. Any type mismatch, missing key, out of range
/// index or fan-out segment yields `None`.
pub fn locate<'a>(value: &'a Value, segments: &[Segment]) -> Option<Located<'a>> {
    let mut current = value;
    let mut steps = Vec::with_capacity(segments.len());
    for seg in segments {
        match (seg, current) {
            (Segment::Key(k), Value::Object(map)) => {
                let (actual, child) = get_ci(map, k)?;
                steps.push(Step::Key(actual));
                current = child;
            }
            (Segment::Index(i), Value::Array(arr)) => {
                let idx = normalize_index(*i, arr.len())?;
                steps.push(Step::Index(idx));
                current = &arr[idx];
            }
            _ => return None,
        }
    }
    Some(Located { steps, value: current })
}

/// The `(index, element)` pairs an array-selecting segment picks out.
/// Indices are positions in the source array.
pub fn resolve_list_segment<'a>(arr: &'a [Value], seg: &Segment) -> Vec<(usize, &'a Value)> {
    match seg {
        Segment::Iterate => arr.iter().enumerate().collect(),
        Segment::Index(i) => normalize_index(*i, arr.len())
            .map(|idx| vec![(idx, &arr[idx])])
            .unwrap_or_default(),
        Segment::Slice { start, stop } => {
            let (lo, hi) = slice_bounds(*start, *stop, arr.len());
            (lo..hi).map(|i| (i, &arr[i])).collect()
        }
        Segment::Key(_) => Vec::new(),
    }
}

// Step-1 slice bounds, clamped into `0..=len`.
fn slice_bounds(start: Option<i64>, stop: Option<i64>, len: usize) -> (usize, usize) {
    let n = len as i64;
    let norm = |i: i64| -> usize {
        if i < 0 {
            (n + i).clamp(0, n) as usize
        } else {
            i.clamp(0, n) as usize
        }
    };
    let lo = start.map(norm).unwrap_or(0);
    let hi = stop.map(norm).unwrap_or(len);
    (lo, hi.max(lo))
}

/// Pull a single value out of `data` for exports and assertions.
///
/// A leading `body.` is ignored. Paths with `[]` or a slice return an array
/// of whatever each selected element yields for the rest of the path;
/// elements that yield nothing are left out. Missing values and `null` both
/// come back as `None`.
pub fn extract_value(data: &Value, path: &str) -> Option<Value> {
    let path = strip_body_prefix(path.trim());
    let segments = parse_path(path);

    if let Some((prefix, coll, suffix)) = split_at_fan_out(&segments) {
        let arr = match locate(data, prefix)?.value {
            Value::Array(arr) => arr,
            _ => return None,
        };
        let results = resolve_list_segment(arr, coll)
            .into_iter()
            .filter_map(|(_, item)| {
                if suffix.is_empty() {
                    Some(item.clone())
                } else {
                    locate(item, suffix).map(|found| found.value.clone())
                }
            })
            .collect::<Vec<_>>();
        debug!(path, matched = results.len(), "extracted collection");
        return Some(Value::Array(results));
    }

    locate(data, &segments)
        .map(|found| found.value.clone())
        .filter(|v| !v.is_null())
}

fn strip_body_prefix(path: &str) -> &str {
    match path.get(..5) {
        Some(head) if head.eq_ignore_ascii_case("body.") => &path[5..],
        _ => path,
    }
}
