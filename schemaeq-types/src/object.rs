use crate::node::SchemaNode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Attribute name to node mapping for a resource or a nested record type.
///
/// Backed by a `BTreeMap`: key order carries no meaning, and iteration is sorted so walks over a
/// schema are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectSchema(BTreeMap<String, SchemaNode>);

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, node: SchemaNode) -> Self {
        self.0.insert(key.into(), node);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, node: SchemaNode) -> Option<SchemaNode> {
        self.0.insert(key.into(), node)
    }

    pub fn remove(&mut self, key: &str) -> Option<SchemaNode> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&SchemaNode> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut SchemaNode> {
        self.0.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, SchemaNode> {
        self.0.iter()
    }

    pub fn values_mut(&mut self) -> btree_map::ValuesMut<'_, String, SchemaNode> {
        self.0.values_mut()
    }
}

impl<K: Into<String>> FromIterator<(K, SchemaNode)> for ObjectSchema {
    fn from_iter<I: IntoIterator<Item = (K, SchemaNode)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl IntoIterator for ObjectSchema {
    type Item = (String, SchemaNode);
    type IntoIter = btree_map::IntoIter<String, SchemaNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ObjectSchema {
    type Item = (&'a String, &'a SchemaNode);
    type IntoIter = btree_map::Iter<'a, String, SchemaNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<BTreeMap<String, SchemaNode>> for ObjectSchema {
    fn from(map: BTreeMap<String, SchemaNode>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_order_does_not_affect_equality() {
        let a = ObjectSchema::new()
            .with("b", SchemaNode::string())
            .with("a", SchemaNode::int());
        let b = ObjectSchema::new()
            .with("a", SchemaNode::int())
            .with("b", SchemaNode::string());
        assert_eq!(a, b);
        assert_eq!(a.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn collects_from_pairs() {
        let schema: ObjectSchema = vec![("name", SchemaNode::string().required())]
            .into_iter()
            .collect();
        assert_eq!(schema.len(), 1);
        assert!(schema.get("name").is_some_and(|n| n.required));
    }
}
