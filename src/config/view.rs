//! Read-only recursive view over a configuration document.
//!
//! Member access through a [`View`] or [`Node`] is lenient: asking for a key
//! that does not exist yields [`Node::Absent`] instead of an error. Strict
//! lookups go through [`crate::config::key_path`].

use std::collections::{BTreeMap, BTreeSet};

use serde_yaml::{Mapping, Number, Value};
use tracing::warn;

static ABSENT: Node = Node::Absent;

/// A single node of the configuration view.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Mapping(View),
    Sequence(Vec<Node>),
    Scalar(Scalar),
    /// Returned for members that do not exist.
    Absent,
}

/// Leaf values, kept exactly as the document encodes them.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

/// A mapping node: named members, each wrapped recursively.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct View {
    members: BTreeMap<String, Node>,
}

impl View {
    /// Builds a view over a document mapping.
    ///
    /// Keys that are strings, numbers or booleans become member names; other
    /// key kinds cannot be addressed by name and are left out. When a number
    /// or boolean key spells the same name as a string key (`1` and `"1"`),
    /// the string key wins; among converted keys the last one wins.
    pub fn from_mapping(mapping: &Mapping) -> Self {
        let mut members = BTreeMap::new();
        let mut literal = BTreeSet::new();

        for (key, value) in mapping {
            let Some(name) = member_name(key) else {
                continue;
            };
            let is_string = matches!(key, Value::String(_));
            if !is_string && literal.contains(&name) {
                warn!("Ignoring key {key:?}: member {name:?} is already defined by a string key");
                continue;
            }
            if members.contains_key(&name) {
                warn!("Key {key:?} collides with an existing member {name:?}");
            }
            if is_string {
                literal.insert(name.clone());
            }
            members.insert(name, Node::from_value(value));
        }

        Self { members }
    }

    /// Member names. Callers must not rely on their order.
    pub fn keys(&self) -> Vec<&str> {
        self.members.keys().map(String::as_str).collect()
    }

    /// Returns the member called `name`, or [`Node::Absent`].
    pub fn get(&self, name: &str) -> &Node {
        self.members.get(name).unwrap_or(&ABSENT)
    }

    /// Returns the member called `key`, or `default` when there is none.
    pub fn fetch<'a>(&'a self, key: &str, default: &'a Node) -> &'a Node {
        self.members.get(key).unwrap_or(default)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.members.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.members.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Converts the view back into a document mapping.
    pub fn to_mapping(&self) -> Mapping {
        self.members
            .iter()
            .map(|(k, v)| (Value::String(k.clone()), v.to_value()))
            .collect()
    }
}

impl Node {
    /// Wraps a document value, recursing through mappings and sequences.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Mapping(m) => Node::Mapping(View::from_mapping(m)),
            Value::Sequence(items) => Node::Sequence(items.iter().map(Node::from_value).collect()),
            Value::Null => Node::Scalar(Scalar::Null),
            Value::Bool(b) => Node::Scalar(Scalar::Bool(*b)),
            Value::Number(n) => Node::Scalar(Scalar::Number(n.clone())),
            Value::String(s) => Node::Scalar(Scalar::String(s.clone())),
            Value::Tagged(tagged) => Node::from_value(&tagged.value),
        }
    }

    /// Lenient member access. Non-mapping nodes have no members.
    pub fn get(&self, name: &str) -> &Node {
        match self {
            Node::Mapping(view) => view.get(name),
            _ => &ABSENT,
        }
    }

    /// Lenient element access for sequence nodes.
    pub fn at(&self, index: usize) -> &Node {
        match self {
            Node::Sequence(items) => items.get(index).unwrap_or(&ABSENT),
            _ => &ABSENT,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Node::Absent)
    }

    /// False for absent members, `null` and `false`; true for everything else.
    pub fn is_truthy(&self) -> bool {
        !matches!(
            self,
            Node::Absent | Node::Scalar(Scalar::Null) | Node::Scalar(Scalar::Bool(false))
        )
    }

    pub fn as_view(&self) -> Option<&View> {
        match self {
            Node::Mapping(view) => Some(view),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Node::Scalar(Scalar::Number(n)) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Node::Scalar(Scalar::Number(n)) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Converts the node back into a document value. Absent becomes null.
    pub fn to_value(&self) -> Value {
        match self {
            Node::Mapping(view) => Value::Mapping(view.to_mapping()),
            Node::Sequence(items) => Value::Sequence(items.iter().map(Node::to_value).collect()),
            Node::Scalar(Scalar::Null) | Node::Absent => Value::Null,
            Node::Scalar(Scalar::Bool(b)) => Value::Bool(*b),
            Node::Scalar(Scalar::Number(n)) => Value::Number(n.clone()),
            Node::Scalar(Scalar::String(s)) => Value::String(s.clone()),
        }
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<i64> for Node {
    fn from(n: i64) -> Self {
        Node::Scalar(Scalar::Number(n.into()))
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Scalar(Scalar::Bool(b))
    }
}

fn member_name(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => member_name(&tagged.value),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(yaml: &str) -> View {
        View::from_mapping(&serde_yaml::from_str(yaml).unwrap())
    }

    #[test]
    fn test_keys() {
        let v = view("key1: value1\nkey2: value2");
        let keys = v.keys();

        assert_eq!(keys.len(), 2);
        assert!(keys.contains(&"key1"));
        assert!(keys.contains(&"key2"));
    }

    #[test]
    fn test_fetch_with_default() {
        let v = view("key1: value1");
        let default = Node::from("default");

        assert_eq!(v.fetch("key1", &default).as_str(), Some("value1"));
        assert_eq!(v.fetch("monkey", &default).as_str(), Some("default"));
    }

    #[test]
    fn test_missing_member_is_absent() {
        let v = view("a: {b: 1}");

        assert!(v.get("x").is_absent());
        assert!(v.get("a").get("x").is_absent());
        assert!(v.get("a").get("b").get("c").is_absent());
        assert!(v.get("x").get("y").is_absent());
    }

    #[test]
    fn test_nested_mappings_become_views() {
        let v = view("db: {host: localhost, port: 5432}");
        let db = v.get("db").as_view().unwrap();

        assert_eq!(db.get("host").as_str(), Some("localhost"));
        assert_eq!(db.get("port").as_i64(), Some(5432));
    }

    #[test]
    fn test_sequence_elements_wrapped() {
        let v = view("servers:\n  - {name: a}\n  - {name: b}\n  - plain");
        let servers = v.get("servers");

        assert_eq!(servers.as_sequence().map(<[Node]>::len), Some(3));
        assert_eq!(servers.at(1).get("name").as_str(), Some("b"));
        assert_eq!(servers.at(2).as_str(), Some("plain"));
        assert!(servers.at(9).is_absent());
    }

    #[test]
    fn test_non_string_keys_addressable() {
        let v = view("8080: http\ntrue: yes-key");

        assert_eq!(v.get("8080").as_str(), Some("http"));
        assert_eq!(v.get("true").as_str(), Some("yes-key"));
    }

    #[test]
    fn test_string_key_wins_over_converted_key() {
        let before = view("1: number\n'1': string");
        let after = view("'1': string\n1: number");

        assert_eq!(before.get("1").as_str(), Some("string"));
        assert_eq!(after.get("1").as_str(), Some("string"));
        assert_eq!(before.len(), 1);
    }

    #[test]
    fn test_truthiness() {
        let v = view("off: false\nnothing: ~\nzero: 0\nempty: ''");

        assert!(!v.get("off").is_truthy());
        assert!(!v.get("nothing").is_truthy());
        assert!(!v.get("missing").is_truthy());
        assert!(v.get("zero").is_truthy());
        assert!(v.get("empty").is_truthy());
    }

    #[test]
    fn test_to_mapping_preserves_content() {
        let mapping: Mapping = serde_yaml::from_str("a: {b: [1, {c: x}]}\nd: 2.5").unwrap();
        assert_eq!(View::from_mapping(&mapping).to_mapping(), mapping);
    }
}
