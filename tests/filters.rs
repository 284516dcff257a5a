use pretty_assertions::assert_eq;
use proptest::prelude::*;
use reqcap::{extract_value, filter_response};
use serde_json::{json, Map, Value};

fn users() -> Value {
    json!({
        "total": 3,
        "data": [
            {"id": 1, "name": "A", "email": "a@x.io", "tags": ["t1"]},
            {"id": 2, "name": "B", "email": "b@x.io", "tags": []},
            {"id": 3, "name": "C", "email": "c@x.io", "tags": ["t3", "t4"]}
        ],
        "meta": {"Page": 1, "Next": null}
    })
}

#[test]
fn top_level_fields() {
    let data = json!({"id": 1, "name": "Alice", "email": "a@b.com", "role": "admin"});
    assert_eq!(filter_response(&data, &["id", "name"]), json!({"id": 1, "name": "Alice"}));
}

#[test]
fn iteration_keeps_alignment() {
    let data = json!({"data": [{"id": 1, "name": "A"}, {"id": 2, "name": "B"}]});
    assert_eq!(filter_response(&data, &["data[].id"]), json!({"data": [{"id": 1}, {"id": 2}]}));
}

#[test]
fn slice_is_compacted() {
    let data = json!({"items": [{"id": 1}, {"id": 2}, {"id": 3}]});
    assert_eq!(filter_response(&data, &["items[1:3]"]), json!({"items": [{"id": 2}, {"id": 3}]}));
}

#[test]
fn negative_index_is_compacted() {
    let data = json!({"items": [{"id": 1}, {"id": 2}, {"id": 3}]});
    assert_eq!(filter_response(&data, &["items[-1].id"]), json!({"items": [{"id": 3}]}));
}

#[test]
fn missing_fields_are_absent() {
    let data = json!({"id": 1, "name": "Alice"});
    assert_eq!(filter_response(&data, &["nonexistent"]), json!({}));
    assert_eq!(filter_response(&data, &["id", "nonexistent"]), json!({"id": 1}));
    assert_eq!(filter_response(&json!({"user": {"name": "Bob"}}), &["user.missing.deep"]), json!({}));
}

#[test]
fn wildcard_and_empty_return_input() {
    let data = users();
    assert_eq!(filter_response(&data, &["*"]), data);
    assert_eq!(filter_response(&data, &["id", "*"]), data);
    assert_eq!(filter_response::<&str>(&data, &[]), data);
}

#[test]
fn non_object_roots_pass_through() {
    let arr = json!([{"id": 1, "name": "A"}, {"id": 2, "name": "B"}]);
    assert_eq!(filter_response(&arr, &["id"]), arr);
    let text = json!("plain text response");
    assert_eq!(filter_response(&text, &["id"]), text);
}

#[test]
fn many_specs_merge_into_one_tree() {
    let out = filter_response(&users(), &["total", "data[].id", "data[].tags[0]", "meta.page", "data[-1].name"]);
    assert_eq!(
        out,
        json!({
            "total": 3,
            "data": [{"id": 1, "tags": ["t1"]}, {"id": 2}, {"id": 3, "tags": ["t3"]}, {"name": "C"}],
            "meta": {"Page": 1}
        })
    );
}

#[test]
fn null_values_are_kept() {
    assert_eq!(filter_response(&users(), &["meta.next"]), json!({"meta": {"Next": null}}));
}

#[test]
fn bracket_key_access() {
    let data = json!({"headers": {"Content-Type": "json", "X-Id": "7"}});
    assert_eq!(
        filter_response(&data, &["headers[content-type]"]),
        json!({"headers": {"Content-Type": "json"}})
    );
    assert_eq!(extract_value(&data, "headers[Content-Type]"), Some(json!("json")));
}

#[test]
fn nested_array_paths_keep_their_values() {
    let data = json!({"m": [[1, 2], [3, 4]], "grid": {"rows": [[{"v": 1}], [{"v": 2}]]}});
    for path in ["m[0][1]", "m.1.0", "m[1][-1]", "grid.rows[1][0].v"] {
        let projected = filter_response(&data, &[path]);
        assert_eq!(extract_value(&projected, path), extract_value(&data, path), "{path}");
    }
    assert_eq!(filter_response(&data, &["m[1][]"]), json!({"m": [{}, [3, 4]]}));
    assert_eq!(extract_value(&filter_response(&data, &["m[1][]"]), "m[1][]"), Some(json!([3, 4])));
}

#[test]
fn projected_keys_follow_spec_order() {
    let data = json!({"b": 1, "a": 2, "c": 3});
    let out = filter_response(&data, &["c", "b", "a"]);
    let keys = out.as_object().unwrap().keys().cloned().collect::<Vec<_>>();
    assert_eq!(keys, vec!["c", "b", "a"]);
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        "[a-z]{0,6}".prop_map(Value::String),
    ]
}

fn object_key() -> impl Strategy<Value = String> {
    prop_oneof![Just("id".to_string()), Just("name".to_string()), Just("tags".to_string()), "[a-z]{1,4}"]
}

fn document() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map(object_key(), inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn object_document() -> impl Strategy<Value = Value> {
    prop::collection::btree_map(object_key(), document(), 0..5)
        .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>()))
}

fn matrix() -> impl Strategy<Value = Value> {
    prop::collection::vec(prop::collection::vec(leaf(), 0..4).prop_map(Value::Array), 0..4)
        .prop_map(Value::Array)
}

/// Objects whose members are likely to hold arrays of arrays.
fn nested_array_document() -> impl Strategy<Value = Value> {
    prop::collection::btree_map(object_key(), prop_oneof![matrix(), document()], 1..4)
        .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>()))
}

/// Paths made only of keys and non-negative indices.
fn plain_path() -> impl Strategy<Value = String> {
    (object_key(), object_key(), 0..3usize, 0..3usize).prop_flat_map(|(a, b, i, j)| {
        prop::sample::select(vec![
            format!("{a}.{b}"),
            format!("{a}[{i}]"),
            format!("{a}.{i}"),
            format!("{a}[{i}][{j}]"),
            format!("{a}.{i}.{j}"),
            format!("{a}[{i}].{b}"),
            format!("{a}.{b}[{i}]"),
        ])
    })
}

proptest! {
    #[test]
    fn identity_for_wildcard(v in object_document()) {
        prop_assert_eq!(filter_response(&v, &["*"]), v.clone());
        prop_assert_eq!(filter_response::<&str>(&v, &[]), v);
    }

    #[test]
    fn non_objects_unchanged(v in document(), spec in "[a-z]{1,4}(\\[\\])?") {
        prop_assume!(!v.is_object());
        prop_assert_eq!(filter_response(&v, &[spec]), v);
    }

    #[test]
    fn plain_paths_survive_projection(
        v in prop_oneof![object_document(), nested_array_document()],
        path in plain_path(),
    ) {
        prop_assume!(!path.starts_with("body."));
        if let Some(expected) = extract_value(&v, &path) {
            let projected = filter_response(&v, &[path.as_str()]);
            prop_assert_eq!(extract_value(&projected, &path), Some(expected));
        }
    }

    #[test]
    fn iterate_specs_commute(ids in prop::collection::vec(any::<i16>(), 0..6), names in prop::collection::vec("[a-z]{1,3}", 0..6)) {
        let data: Vec<Value> = ids
            .iter()
            .zip(names.iter().chain(std::iter::repeat(&String::new())))
            .enumerate()
            .map(|(i, (id, name))| if i % 2 == 0 { json!({"id": id, "name": name}) } else { json!({"id": id}) })
            .collect();
        let v = json!({"data": data});
        prop_assert_eq!(
            filter_response(&v, &["data[].id", "data[].name"]),
            filter_response(&v, &["data[].name", "data[].id"])
        );
    }
}
