use crate::domain::model::BinaryEntry;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Dot-separated key path such as `level1.level2.key`. Segments are literal
/// keys; there is no escaping of dots.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path.split('.').map(str::to_string).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn has_empty_segment(&self) -> bool {
        self.segments.iter().any(|segment| segment.is_empty())
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl From<&str> for KeyPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

/// A closed recursive tree that can be navigated one key at a time.
pub trait PathTree: Sized {
    fn child(&self, key: &str) -> Option<&Self>;

    fn child_mut(&mut self, key: &str) -> Option<&mut Self>;

    /// Returns the slot for `key`, turning `self` into a branch first if it
    /// is a leaf. A missing slot is created with a placeholder that the
    /// caller either descends through or overwrites.
    fn child_entry(&mut self, key: &str) -> &mut Self;

    fn take_child(&mut self, key: &str) -> Option<Self>;
}

pub fn get<'a, T: PathTree>(tree: &'a T, path: &KeyPath) -> Option<&'a T> {
    path.segments()
        .iter()
        .try_fold(tree, |node, key| node.child(key))
}

/// Writes `value` at `path`, creating intermediate branches. Intermediate
/// leaves are replaced by branches.
pub fn set<T: PathTree>(tree: &mut T, path: &KeyPath, value: T) {
    let mut node = tree;
    for key in path.segments() {
        node = node.child_entry(key);
    }
    *node = value;
}

/// Removes and returns the value at `path`. No-op when the path is absent.
pub fn unset<T: PathTree>(tree: &mut T, path: &KeyPath) -> Option<T> {
    let (last, parents) = path.segments().split_last()?;
    let parent = parents
        .iter()
        .try_fold(tree, |node, key| node.child_mut(key))?;
    parent.take_child(last)
}

fn sequence_index(items: &[Value], key: &str) -> Option<usize> {
    key.parse::<usize>().ok().filter(|index| *index < items.len())
}

impl PathTree for Value {
    fn child(&self, key: &str) -> Option<&Self> {
        match self {
            Value::Object(map) => map.get(key),
            Value::Array(items) => match sequence_index(items, key) {
                Some(index) => items.get(index),
                None => None,
            },
            _ => None,
        }
    }

    fn child_mut(&mut self, key: &str) -> Option<&mut Self> {
        match self {
            Value::Object(map) => map.get_mut(key),
            Value::Array(items) => match sequence_index(items, key) {
                Some(index) => items.get_mut(index),
                None => None,
            },
            _ => None,
        }
    }

    fn child_entry(&mut self, key: &str) -> &mut Self {
        let index = key.parse::<usize>().ok();
        match self {
            Value::Array(items) if index.is_none() => {
                let entries = std::mem::take(items)
                    .into_iter()
                    .enumerate()
                    .map(|(position, item)| (position.to_string(), item))
                    .collect();
                *self = Value::Object(entries);
            }
            Value::Array(_) | Value::Object(_) => {}
            _ => *self = Value::Object(Map::new()),
        }
        match (self, index) {
            (Value::Array(items), Some(index)) => {
                if index >= items.len() {
                    items.resize(index + 1, Value::Null);
                }
                &mut items[index]
            }
            (Value::Object(map), _) => map.entry(key.to_string()).or_insert(Value::Null),
            _ => unreachable!("leaf nodes are replaced by objects above"),
        }
    }

    fn take_child(&mut self, key: &str) -> Option<Self> {
        match self {
            Value::Object(map) => map.remove(key),
            Value::Array(items) => sequence_index(items, key).map(|index| items.remove(index)),
            _ => None,
        }
    }
}

impl PathTree for BinaryEntry {
    fn child(&self, key: &str) -> Option<&Self> {
        match self {
            BinaryEntry::Group(entries) => entries.get(key),
            BinaryEntry::Payload(_) => None,
        }
    }

    fn child_mut(&mut self, key: &str) -> Option<&mut Self> {
        match self {
            BinaryEntry::Group(entries) => entries.get_mut(key),
            BinaryEntry::Payload(_) => None,
        }
    }

    fn child_entry(&mut self, key: &str) -> &mut Self {
        if let BinaryEntry::Payload(payload) = self {
            tracing::warn!(
                "Replacing {} payload with a group to write '{}' below it",
                payload.mime_type,
                key
            );
            *self = BinaryEntry::Group(BTreeMap::new());
        }
        match self {
            BinaryEntry::Group(entries) => entries
                .entry(key.to_string())
                .or_insert_with(|| BinaryEntry::Group(BTreeMap::new())),
            BinaryEntry::Payload(_) => unreachable!("payload replaced by a group above"),
        }
    }

    fn take_child(&mut self, key: &str) -> Option<Self> {
        match self {
            BinaryEntry::Group(entries) => entries.remove(key),
            BinaryEntry::Payload(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::BinaryPayload;
    use serde_json::json;

    #[test]
    fn test_get_nested_value() {
        let tree = json!({"level1": {"level2": {"key": "v"}}, "list": [1, {"x": 2}]});
        assert_eq!(get(&tree, &"level1.level2.key".into()), Some(&json!("v")));
        assert_eq!(get(&tree, &"list.1.x".into()), Some(&json!(2)));
        assert_eq!(get(&tree, &"level1.missing".into()), None);
        assert_eq!(get(&tree, &"list.7".into()), None);
        assert_eq!(get(&tree, &"level1.level2.key.deeper".into()), None);
    }

    #[test]
    fn test_set_creates_intermediate_maps() {
        let mut tree = json!({"keep": true});
        set(&mut tree, &"a.b.c".into(), json!(1));
        assert_eq!(tree, json!({"keep": true, "a": {"b": {"c": 1}}}));
    }

    #[test]
    fn test_set_replaces_leaf_intermediate() {
        let mut tree = json!({"a": "text"});
        set(&mut tree, &"a.b".into(), json!(2));
        assert_eq!(tree, json!({"a": {"b": 2}}));

        let mut scalar_root = json!(5);
        set(&mut scalar_root, &"x".into(), json!(true));
        assert_eq!(scalar_root, json!({"x": true}));
    }

    #[test]
    fn test_set_into_existing_sequence_element() {
        let mut tree = json!({"items": [{"id": 1}, {"id": 2}]});
        set(&mut tree, &"items.1.name".into(), json!("second"));
        assert_eq!(tree, json!({"items": [{"id": 1}, {"id": 2, "name": "second"}]}));
    }

    #[test]
    fn test_set_past_end_pads_sequence_with_nulls() {
        let mut tree = json!({"items": [1, 2]});
        set(&mut tree, &"items.5".into(), json!("hi"));
        assert_eq!(tree, json!({"items": [1, 2, null, null, null, "hi"]}));

        set(&mut tree, &"items.2.name".into(), json!("x"));
        assert_eq!(tree["items"][2], json!({"name": "x"}));
    }

    #[test]
    fn test_set_named_key_on_sequence_keeps_elements() {
        let mut tree = json!({"items": [1, {"id": 2}]});
        set(&mut tree, &"items.label".into(), json!("pair"));
        assert_eq!(
            tree,
            json!({"items": {"0": 1, "1": {"id": 2}, "label": "pair"}})
        );
    }

    #[test]
    fn test_unset_removes_only_target() {
        let mut tree = json!({"a": {"b": 1, "c": 2}, "d": 3});
        assert_eq!(unset(&mut tree, &"a.b".into()), Some(json!(1)));
        assert_eq!(tree, json!({"a": {"c": 2}, "d": 3}));
    }

    #[test]
    fn test_unset_missing_path_is_noop() {
        let mut tree = json!({"a": {"c": 2}});
        assert_eq!(unset(&mut tree, &"a.b.z".into()), None);
        assert_eq!(unset(&mut tree, &"x".into()), None);
        assert_eq!(tree, json!({"a": {"c": 2}}));
    }

    #[test]
    fn test_binary_tree_navigation() {
        let payload = BinaryPayload::new("aGk=", "text/plain");
        let mut tree = BinaryEntry::Group(BTreeMap::new());
        set(&mut tree, &"files.first".into(), BinaryEntry::Payload(payload.clone()));

        match get(&tree, &"files.first".into()) {
            Some(BinaryEntry::Payload(found)) => assert_eq!(found, &payload),
            other => panic!("unexpected entry: {:?}", other),
        }
        assert!(get(&tree, &"files.first.data".into()).is_none());

        assert!(unset(&mut tree, &"files.first".into()).is_some());
        match get(&tree, &"files".into()) {
            Some(BinaryEntry::Group(entries)) => assert!(entries.is_empty()),
            other => panic!("unexpected entry: {:?}", other),
        }
    }

    #[test]
    fn test_set_below_payload_turns_it_into_group() {
        let mut tree = BinaryEntry::Group(BTreeMap::new());
        set(&mut tree, &"data".into(), BinaryEntry::Payload(BinaryPayload::new("a2VlcA==", "text/plain")));

        let nested = BinaryPayload::new("bmV3", "application/json");
        set(&mut tree, &"data.extra".into(), BinaryEntry::Payload(nested.clone()));

        match get(&tree, &"data".into()) {
            Some(BinaryEntry::Group(entries)) => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries.get("extra"), Some(&BinaryEntry::Payload(nested)));
            }
            other => panic!("unexpected entry: {:?}", other),
        }
    }

    #[test]
    fn test_key_path_display_and_validation() {
        let path = KeyPath::parse("a.b");
        assert_eq!(path.to_string(), "a.b");
        assert_eq!(path.segments().len(), 2);
        assert!(!path.has_empty_segment());
        assert!(KeyPath::parse("a..b").has_empty_segment());
        assert!(KeyPath::parse("").has_empty_segment());
    }
}
