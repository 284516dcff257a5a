//! Projection of a JSON document onto a set of filter paths.
//!
//! Every spec is applied to the same output object in turn, so later specs
//! extend containers that earlier ones created. Keys in the output keep the
//! casing of the source document.

use crate::extract::{locate, resolve_list_segment, Step};
use crate::path::{parse_path, split_at_collection, Segment};
use serde_json::{Map, Value};
use std::mem;
use tracing::{debug, trace};

/// Keep only the fields named by `field_specs`.
///
/// Returns `data` unchanged when there are no specs, when any spec is `*`,
/// or when `data` is not an object. A spec that matches nothing simply adds
/// nothing to the result.
pub fn filter_response<S: AsRef<str>>(data: &Value, field_specs: &[S]) -> Value {
    let cleaned = field_specs
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>();
    if cleaned.is_empty() || cleaned.contains(&"*") {
        return data.clone();
    }
    if !data.is_object() {
        debug!("filter skipped, response body is not an object");
        return data.clone();
    }

    let mut result = empty_object();
    for spec in cleaned {
        apply_spec(data, spec, &mut result);
    }
    result
}

fn apply_spec(data: &Value, spec: &str, result: &mut Value) {
    let segments = parse_path(spec);
    if segments.is_empty() {
        debug!(spec, "filter spec has no usable segments");
        return;
    }

    let Some((prefix, coll, suffix)) = split_at_collection(&segments) else {
        match locate(data, &segments) {
            Some(found) => set_in_result(result, &found.steps, found.value.clone()),
            None => trace!(spec, "filter spec matched nothing"),
        }
        return;
    };

    let Some(found) = locate(data, prefix) else {
        trace!(spec, "filter prefix matched nothing");
        return;
    };
    let Value::Array(arr) = found.value else {
        trace!(spec, "filter prefix is not an array");
        return;
    };
    let pairs = resolve_list_segment(arr, coll);
    if pairs.is_empty() {
        return;
    }
    let Some(Value::Array(container)) = container_at(result, &found.steps, empty_array) else {
        trace!(spec, "output already holds a non-array at the prefix");
        return;
    };

    if *coll == Segment::Iterate {
        // Stay index-aligned with the source so sibling specs merge per element.
        if container.len() < arr.len() {
            container.resize_with(arr.len(), empty_object);
        }
        for (j, item) in pairs {
            if suffix.is_empty() {
                container[j] = item.clone();
                continue;
            }
            if let Some(hit) = locate(item, suffix) {
                claim(&mut container[j], shell_for(&hit.steps));
                set_in_result(&mut container[j], &hit.steps, hit.value.clone());
            }
        }
    } else {
        // Slices and negative indices produce a compact, freshly indexed list.
        for (_, item) in pairs {
            if suffix.is_empty() {
                container.push(item.clone());
                continue;
            }
            if let Some(hit) = locate(item, suffix) {
                let mut entry = shell_for(&hit.steps);
                set_in_result(&mut entry, &hit.steps, hit.value.clone());
                container.push(entry);
            }
        }
    }
}

/// Write `value` at `steps`, creating intermediate containers on the way.
/// Lists are padded with `{}` before the slot being walked into and with
/// `null` at the leaf.
fn set_in_result(result: &mut Value, steps: &[Step<'_>], value: Value) {
    let Some((last, parents)) = steps.split_last() else {
        return;
    };
    let leaf: fn() -> Value = match last {
        Step::Key(_) => empty_object,
        Step::Index(_) => empty_array,
    };
    match (last, container_at(result, parents, leaf)) {
        (Step::Key(k), Some(Value::Object(map))) => {
            map.insert((*k).to_string(), value);
        }
        (Step::Index(idx), Some(Value::Array(arr))) => {
            if arr.len() <= *idx {
                arr.resize(idx + 1, Value::Null);
            }
            arr[*idx] = value;
        }
        _ => trace!(?steps, "output shape conflicts with path, value dropped"),
    }
}

/// Walk `steps` through the output tree, creating what is missing. A missing
/// child becomes a list when the next step is an index, an object when it is
/// a key, and `leaf()` at the end of the walk. `{}` padding left by an
/// earlier spec is reshaped the same way. `None` on a shape conflict.
fn container_at<'v>(
    target: &'v mut Value,
    steps: &[Step<'_>],
    leaf: fn() -> Value,
) -> Option<&'v mut Value> {
    let mut target = target;
    for (i, step) in steps.iter().enumerate() {
        let make = || match steps.get(i + 1) {
            Some(Step::Index(_)) => empty_array(),
            Some(Step::Key(_)) => empty_object(),
            None => leaf(),
        };
        target = match (step, target) {
            (Step::Key(k), Value::Object(map)) => map.entry(*k).or_insert_with(make),
            (Step::Index(idx), Value::Array(arr)) => {
                if arr.len() <= *idx {
                    arr.resize_with(*idx, empty_object);
                    arr.push(make());
                }
                let slot = &mut arr[*idx];
                claim(slot, make());
                slot
            }
            _ => return None,
        };
    }
    Some(target)
}

/// The container a located path's first step writes into.
fn shell_for(steps: &[Step<'_>]) -> Value {
    match steps.first() {
        Some(Step::Index(_)) => empty_array(),
        _ => empty_object(),
    }
}

/// Swap a placeholder (`null`, `{}` or `[]`) for `shell` when the two differ
/// in kind. Values written by earlier specs are never replaced.
fn claim(slot: &mut Value, shell: Value) {
    let placeholder = match slot {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(arr) => arr.is_empty(),
        _ => false,
    };
    if placeholder && mem::discriminant(&*slot) != mem::discriminant(&shell) {
        *slot = shell;
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

fn empty_array() -> Value {
    Value::Array(Vec::new())
}
