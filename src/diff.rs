use crate::output::display_value;
use crate::response::Response;
use crate::snapshot::Snapshot;
use itertools::Itertools;
use serde_json::{Map, Value};

const SUMMARY_LIMIT: usize = 80;

/// Compare a saved snapshot with a live response.
///
/// Returns one human-readable line per difference; empty means identical.
/// Object bodies are compared key by key (sorted), recursing into nested
/// objects; anything else is compared whole.
pub fn diff_snapshot(snapshot: &Snapshot, live: &Response) -> Vec<String> {
    let mut diffs = Vec::new();

    if snapshot.status_code != Some(live.status_code) {
        let old = snapshot
            .status_code
            .map_or_else(|| "(absent)".to_string(), |s| s.to_string());
        diffs.push(format!("status_code: {old} → {}", live.status_code));
    }

    match (&snapshot.body, &live.body) {
        (Value::Object(old), Value::Object(new)) => diff_objects("body", old, new, &mut diffs),
        (old, new) if old != new => {
            diffs.push(format!("body: {} → {}", summarize(old), summarize(new)));
        }
        _ => {}
    }

    diffs
}

fn diff_objects(prefix: &str, old: &Map<String, Value>, new: &Map<String, Value>, diffs: &mut Vec<String>) {
    for key in old.keys().chain(new.keys()).sorted().dedup() {
        let path = format!("{prefix}.{key}");
        match (old.get(key), new.get(key)) {
            (None, Some(n)) => diffs.push(format!("{path}: (absent) → {}", summarize(n))),
            (Some(o), None) => diffs.push(format!("{path}: {} → (absent)", summarize(o))),
            (Some(Value::Object(o)), Some(Value::Object(n))) => diff_objects(&path, o, n, diffs),
            (Some(o), Some(n)) if o != n => {
                diffs.push(format!("{path}: {} → {}", summarize(o), summarize(n)));
            }
            _ => {}
        }
    }
}

/// Short form of a value for a diff line, cut to 80 characters.
fn summarize(value: &Value) -> String {
    let s = display_value(value);
    if s.chars().count() > SUMMARY_LIMIT {
        let head = s.chars().take(SUMMARY_LIMIT - 3).collect::<String>();
        format!("{head}...")
    } else {
        s
    }
}
