//! Path-based restructuring of flat rows into nested JSON.
//!
//! A joined query returns a flat row where related-table columns sit next to
//! the main row's columns. `PathMapper` moves those columns to nested
//! positions described by dot-delimited destination paths, e.g.
//! `"category_id" -> "category.category_id"`. Paths are parsed once at
//! construction; `transform` is pure and reusable across calls.

use crate::error::{AppError, ConfigError};
use serde_json::{Map, Value};

/// Destination path delimiter.
pub const PATH_DELIMITER: char = '.';

/// One element of a destination path. A segment that parses as a
/// non-negative base-10 integer addresses an array index; anything else
/// addresses an object key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    fn parse(s: &str) -> Segment {
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = s.parse::<usize>() {
                return Segment::Index(n);
            }
        }
        Segment::Key(s.to_string())
    }
}

#[derive(Clone, Debug)]
struct Entry {
    source_key: String,
    path: String,
    segments: Vec<Segment>,
}

/// Moves flat keys to nested destinations. Immutable after construction;
/// safe to share across tasks.
#[derive(Clone, Debug)]
pub struct PathMapper {
    entries: Vec<Entry>,
}

impl PathMapper {
    /// Build a mapper from `(source_key, destination_path)` pairs. Entries
    /// apply in the given order, so later entries win ties on the same leaf.
    pub fn new(spec: &[(&str, &str)]) -> Result<PathMapper, ConfigError> {
        if spec.is_empty() {
            return Err(ConfigError::EmptySpec);
        }
        let mut entries = Vec::with_capacity(spec.len());
        for (source_key, path) in spec {
            if path.is_empty() {
                return Err(ConfigError::EmptyPath {
                    source_key: source_key.to_string(),
                });
            }
            let mut segments = Vec::new();
            for piece in path.split(PATH_DELIMITER) {
                if piece.is_empty() {
                    return Err(ConfigError::EmptySegment {
                        source_key: source_key.to_string(),
                        path: path.to_string(),
                    });
                }
                segments.push(Segment::parse(piece));
            }
            entries.push(Entry {
                source_key: source_key.to_string(),
                path: path.to_string(),
                segments,
            });
        }
        Ok(PathMapper { entries })
    }

    /// Restructure one flat record. The input is never mutated; the result
    /// starts as a copy, so keys not named in the spec pass through
    /// untouched. A source key absent from the record is skipped.
    pub fn transform(&self, record: &Map<String, Value>) -> Result<Map<String, Value>, AppError> {
        let mut out = record.clone();
        for entry in &self.entries {
            let Some(value) = out.remove(&entry.source_key) else {
                continue;
            };
            place(&mut out, &entry.segments, value).map_err(|_| AppError::PathConflict {
                path: entry.path.clone(),
            })?;
        }
        Ok(out)
    }
}

/// An existing non-null scalar blocks descent, or a key segment hit an array.
struct Conflict;

fn empty_container(next: &Segment) -> Value {
    match next {
        Segment::Key(_) => Value::Object(Map::new()),
        Segment::Index(_) => Value::Array(Vec::new()),
    }
}

/// Make `slot` usable as a container for `next`. Null counts as absent and
/// is replaced; existing containers are reused as-is.
fn ensure_container(slot: &mut Value, next: &Segment) -> Result<(), Conflict> {
    match slot {
        Value::Null => {
            *slot = empty_container(next);
            Ok(())
        }
        Value::Object(_) | Value::Array(_) => Ok(()),
        _ => Err(Conflict),
    }
}

/// Write `value` at `segments` below the record's top level, creating
/// containers on the way down. The record root is always an object, so a
/// leading index segment addresses it by its decimal string.
fn place(root: &mut Map<String, Value>, segments: &[Segment], value: Value) -> Result<(), Conflict> {
    let Some((seg, rest)) = segments.split_first() else {
        return Err(Conflict);
    };
    let key = match seg {
        Segment::Key(k) => k.clone(),
        Segment::Index(i) => i.to_string(),
    };
    if rest.is_empty() {
        root.insert(key, value);
        return Ok(());
    }
    let slot = root.entry(key).or_insert(Value::Null);
    ensure_container(slot, &rest[0])?;
    descend(slot, rest, value)
}

fn descend(current: &mut Value, segments: &[Segment], value: Value) -> Result<(), Conflict> {
    let Some((seg, rest)) = segments.split_first() else {
        return Ok(());
    };
    let slot = match (current, seg) {
        (Value::Object(map), Segment::Key(k)) => map.entry(k.clone()).or_insert(Value::Null),
        // objects address numeric segments by their decimal string; only
        // arrays use them as true indexes
        (Value::Object(map), Segment::Index(i)) => map.entry(i.to_string()).or_insert(Value::Null),
        (Value::Array(arr), Segment::Index(i)) => {
            if arr.len() <= *i {
                arr.resize(*i + 1, Value::Null);
            }
            &mut arr[*i]
        }
        (Value::Array(_), Segment::Key(_)) => return Err(Conflict),
        _ => return Err(Conflict),
    };
    if rest.is_empty() {
        // last write wins
        *slot = value;
        Ok(())
    } else {
        ensure_container(slot, &rest[0])?;
        descend(slot, rest, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(v: Value) -> Map<String, Value> {
        match v {
            Value::Object(m) => m,
            other => panic!("expected object, got {}", other),
        }
    }

    #[test]
    fn places_value_at_nested_path() {
        let mapper = PathMapper::new(&[("category_id", "category.category_id")]).unwrap();
        let record = obj(json!({ "product_id": 1, "category_id": 5 }));
        let out = mapper.transform(&record).unwrap();
        assert_eq!(
            Value::Object(out),
            json!({ "product_id": 1, "category": { "category_id": 5 } })
        );
    }

    #[test]
    fn unmanaged_keys_pass_through() {
        let mapper = PathMapper::new(&[("category_id", "category.category_id")]).unwrap();
        let record = obj(json!({ "a": "x", "b": null, "category_id": 5, "c": [1, 2] }));
        let out = mapper.transform(&record).unwrap();
        assert_eq!(out.get("a"), Some(&json!("x")));
        assert_eq!(out.get("b"), Some(&Value::Null));
        assert_eq!(out.get("c"), Some(&json!([1, 2])));
    }

    #[test]
    fn managed_key_is_consumed_from_top_level() {
        let mapper = PathMapper::new(&[("category_id", "category.category_id")]).unwrap();
        let record = obj(json!({ "category_id": 5 }));
        let out = mapper.transform(&record).unwrap();
        assert!(!out.contains_key("category_id"));
    }

    #[test]
    fn shared_prefix_entries_merge_into_one_container() {
        let mapper = PathMapper::new(&[
            ("category_id", "category.category_id"),
            ("category_name", "category.category_name"),
        ])
        .unwrap();
        let record = obj(json!({ "category_id": 5, "category_name": "Tools" }));
        let out = mapper.transform(&record).unwrap();
        assert_eq!(
            Value::Object(out),
            json!({ "category": { "category_id": 5, "category_name": "Tools" } })
        );
    }

    #[test]
    fn index_segment_creates_array() {
        let mapper = PathMapper::new(&[("first_tag", "tags.0")]).unwrap();
        let record = obj(json!({ "first_tag": "new" }));
        let out = mapper.transform(&record).unwrap();
        assert_eq!(Value::Object(out), json!({ "tags": ["new"] }));
    }

    #[test]
    fn array_is_null_padded_up_to_index() {
        let mapper = PathMapper::new(&[("third_tag", "tags.2")]).unwrap();
        let record = obj(json!({ "third_tag": "sale" }));
        let out = mapper.transform(&record).unwrap();
        assert_eq!(Value::Object(out), json!({ "tags": [null, null, "sale"] }));
    }

    #[test]
    fn absent_source_key_is_skipped() {
        let mapper = PathMapper::new(&[("missing", "nested.missing")]).unwrap();
        let record = obj(json!({ "present": 1 }));
        let out = mapper.transform(&record).unwrap();
        assert_eq!(Value::Object(out), json!({ "present": 1 }));
    }

    #[test]
    fn spec_touching_no_keys_returns_deep_equal_copy() {
        let mapper = PathMapper::new(&[("not_here", "elsewhere")]).unwrap();
        let record = obj(json!({ "a": 1, "b": { "c": [true, "x"] } }));
        let out = mapper.transform(&record).unwrap();
        assert_eq!(out, record);
    }

    #[test]
    fn input_record_is_not_mutated() {
        let mapper = PathMapper::new(&[("category_id", "category.category_id")]).unwrap();
        let record = obj(json!({ "product_id": 1, "category_id": 5 }));
        let snapshot = record.clone();
        let _ = mapper.transform(&record).unwrap();
        assert_eq!(record, snapshot);
    }

    #[test]
    fn later_entry_wins_on_same_leaf() {
        let mapper = PathMapper::new(&[
            ("first", "slot.value"),
            ("second", "slot.value"),
        ])
        .unwrap();
        let record = obj(json!({ "first": 1, "second": 2 }));
        let out = mapper.transform(&record).unwrap();
        assert_eq!(Value::Object(out), json!({ "slot": { "value": 2 } }));
    }

    #[test]
    fn existing_container_is_reused_not_replaced() {
        let mapper = PathMapper::new(&[("extra", "meta.extra")]).unwrap();
        let record = obj(json!({ "meta": { "kept": true }, "extra": 7 }));
        let out = mapper.transform(&record).unwrap();
        assert_eq!(
            Value::Object(out),
            json!({ "meta": { "kept": true, "extra": 7 } })
        );
    }

    #[test]
    fn null_at_intermediate_position_is_replaced_by_container() {
        let mapper = PathMapper::new(&[("v", "meta.v")]).unwrap();
        let record = obj(json!({ "meta": null, "v": 1 }));
        let out = mapper.transform(&record).unwrap();
        assert_eq!(Value::Object(out), json!({ "meta": { "v": 1 } }));
    }

    #[test]
    fn scalar_at_intermediate_position_is_a_conflict() {
        let mapper = PathMapper::new(&[("v", "meta.v")]).unwrap();
        let record = obj(json!({ "meta": 3, "v": 1 }));
        let err = mapper.transform(&record).unwrap_err();
        assert!(matches!(err, AppError::PathConflict { ref path } if path == "meta.v"));
    }

    #[test]
    fn key_segment_into_existing_array_is_a_conflict() {
        let mapper = PathMapper::new(&[("v", "items.name")]).unwrap();
        let record = obj(json!({ "items": [1, 2], "v": 1 }));
        assert!(mapper.transform(&record).is_err());
    }

    #[test]
    fn mapper_survives_a_conflicting_record() {
        let mapper = PathMapper::new(&[("v", "meta.v")]).unwrap();
        let bad = obj(json!({ "meta": 3, "v": 1 }));
        assert!(mapper.transform(&bad).is_err());
        let good = obj(json!({ "v": 1 }));
        let out = mapper.transform(&good).unwrap();
        assert_eq!(Value::Object(out), json!({ "meta": { "v": 1 } }));
    }

    #[test]
    fn deep_path_creates_all_intermediates() {
        let mapper = PathMapper::new(&[("v", "a.b.0.c")]).unwrap();
        let record = obj(json!({ "v": 9 }));
        let out = mapper.transform(&record).unwrap();
        assert_eq!(Value::Object(out), json!({ "a": { "b": [{ "c": 9 }] } }));
    }

    #[test]
    fn empty_spec_is_rejected() {
        assert!(matches!(PathMapper::new(&[]), Err(ConfigError::EmptySpec)));
    }

    #[test]
    fn empty_destination_path_is_rejected() {
        let err = PathMapper::new(&[("k", "")]).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyPath { ref source_key } if source_key == "k"));
    }

    #[test]
    fn doubled_delimiter_is_rejected() {
        assert!(matches!(
            PathMapper::new(&[("k", "a..b")]),
            Err(ConfigError::EmptySegment { .. })
        ));
    }

    #[test]
    fn leading_and_trailing_delimiters_are_rejected() {
        assert!(PathMapper::new(&[("k", ".a")]).is_err());
        assert!(PathMapper::new(&[("k", "a.")]).is_err());
    }

    #[test]
    fn segment_parsing_tags_digits_as_indexes() {
        assert_eq!(Segment::parse("0"), Segment::Index(0));
        assert_eq!(Segment::parse("12"), Segment::Index(12));
        assert_eq!(Segment::parse("name"), Segment::Key("name".into()));
        assert_eq!(Segment::parse("-1"), Segment::Key("-1".into()));
        assert_eq!(Segment::parse("1a"), Segment::Key("1a".into()));
    }
}
