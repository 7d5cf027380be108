use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};

use crate::{
    interpreter::value::collation::CollationKey,
    util::num::{number_to_string, string_to_number},
};

/// A single value: a string or a finite double.
///
/// The two representations are freely interconvertible; which one a scalar
/// currently carries is an artifact of how it was produced, not a type
/// distinction the language exposes. Arithmetic coerces with
/// [`Scalar::as_number`], output and equality with [`Scalar::as_text`].
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// A numeric value.
    Number(f64),
    /// A string value.
    Text(String),
}

impl Scalar {
    /// The empty string, the value of every unset slot.
    #[must_use]
    pub const fn empty() -> Self {
        Self::Text(String::new())
    }

    /// Coerces the scalar to a number via the longest-numeric-prefix rule.
    #[must_use]
    pub fn as_number(&self) -> f64 {
        match self {
            Self::Number(value) => *value,
            Self::Text(text) => string_to_number(text),
        }
    }

    /// Coerces the scalar to its canonical string form.
    #[must_use]
    pub fn as_text(&self) -> String {
        match self {
            Self::Number(value) => number_to_string(*value),
            Self::Text(text) => text.clone(),
        }
    }

    /// Tests the scalar as a condition: true iff it coerces to a non-zero
    /// number.
    #[must_use]
    pub fn is_true(&self) -> bool {
        self.as_number() != 0.0
    }

    /// Builds the conventional `1`/`0` result of a comparison or logical
    /// operator.
    #[must_use]
    pub const fn from_bool(value: bool) -> Self {
        Self::Number(if value { 1.0 } else { 0.0 })
    }
}

impl Default for Scalar {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

/// The content of one environment slot.
#[derive(Debug, Clone, PartialEq)]
pub enum MValue {
    /// A plain scalar.
    Scalar(Scalar),
    /// A sparse tree of keyed values.
    Array(ArrayNode),
    /// A redirection to another environment slot, planted by a `.name`
    /// call argument. Name resolution follows it; it never nests inside an
    /// array.
    Indirect {
        /// The environment frame holding the referenced slot.
        frame: usize,
        /// The referenced name.
        name:  String,
    },
}

impl MValue {
    /// Reduces the slot to a scalar: arrays yield their self-value or the
    /// empty string.
    #[must_use]
    pub fn as_scalar(&self) -> Scalar {
        match self {
            Self::Scalar(scalar) => scalar.clone(),
            Self::Array(node) => node.value.clone().unwrap_or_default(),
            Self::Indirect { .. } => Scalar::empty(),
        }
    }
}

/// One node of a sparse, ordered, string-keyed tree.
///
/// A node carries an optional *self-value* (the scalar addressable without
/// further subscripts) and an ordered map of children. Child keys collate
/// numerics-first (see [`CollationKey`]); the empty-string key is excluded so
/// that neighbour queries can use it as the before-the-first and
/// after-the-last marker. Storage is a `BTreeMap`, which makes both
/// directions of a neighbour query O(log n).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayNode {
    /// The scalar stored directly at this node, if any.
    pub value: Option<Scalar>,
    children:  BTreeMap<CollationKey, ArrayNode>,
}

impl ArrayNode {
    /// Creates an empty node with no self-value.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a node that preserves `value` as its self-value. This is the
    /// promotion applied when a subscripted write lands on a slot currently
    /// holding a scalar.
    #[must_use]
    pub const fn from_scalar(value: Scalar) -> Self {
        Self { value: Some(value),
               children: BTreeMap::new() }
    }

    /// Looks up a child by key.
    #[must_use]
    pub fn child(&self, key: &str) -> Option<&Self> {
        self.children.get(&CollationKey::new(key))
    }

    /// Looks up a child by key for mutation.
    pub fn child_mut(&mut self, key: &str) -> Option<&mut Self> {
        self.children.get_mut(&CollationKey::new(key))
    }

    /// Returns the child for `key`, creating an empty node if absent.
    pub fn ensure_child(&mut self, key: &str) -> &mut Self {
        self.children.entry(CollationKey::new(key)).or_default()
    }

    /// Removes a child and its entire subtree.
    pub fn remove_child(&mut self, key: &str) -> Option<Self> {
        self.children.remove(&CollationKey::new(key))
    }

    /// Whether this node has any children.
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns the first child key after `after` in collation order, where
    /// the empty string means "before the first key".
    #[must_use]
    pub fn next_key(&self, after: &str) -> Option<&str> {
        let entry = if after.is_empty() {
            self.children.keys().next()
        } else {
            self.children
                .range((Excluded(CollationKey::new(after)), Unbounded))
                .map(|(key, _)| key)
                .next()
        };
        entry.map(CollationKey::as_str)
    }

    /// Returns the last child key before `before` in collation order, where
    /// the empty string means "after the last key".
    #[must_use]
    pub fn prev_key(&self, before: &str) -> Option<&str> {
        let entry = if before.is_empty() {
            self.children.keys().next_back()
        } else {
            self.children
                .range((Unbounded, Excluded(CollationKey::new(before))))
                .map(|(key, _)| key)
                .next_back()
        };
        entry.map(CollationKey::as_str)
    }

    /// Deep-copies every child subtree of `source` into this node.
    ///
    /// Self-values of copied nodes overwrite self-values already present;
    /// keys present here but absent in `source` are preserved, at every
    /// level.
    pub fn merge_from(&mut self, source: &Self) {
        for (key, child) in &source.children {
            let target = self.ensure_child(key.as_str());
            if let Some(value) = &child.value {
                target.value = Some(value.clone());
            }
            target.merge_from(child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_with(keys: &[&str]) -> ArrayNode {
        let mut node = ArrayNode::new();
        for key in keys {
            node.ensure_child(key).value = Some(Scalar::from(*key));
        }
        node
    }

    #[test]
    fn neighbour_queries_follow_collation() {
        let node = node_with(&["1", "2", "10", "apple"]);

        assert_eq!(node.next_key(""), Some("1"));
        assert_eq!(node.next_key("2"), Some("10"));
        assert_eq!(node.next_key("apple"), None);
        assert_eq!(node.prev_key(""), Some("apple"));
        assert_eq!(node.prev_key("10"), Some("2"));
        assert_eq!(node.prev_key("1"), None);
    }

    #[test]
    fn missing_start_key_still_orders() {
        let node = node_with(&["3", "7"]);

        assert_eq!(node.next_key("5"), Some("7"));
        assert_eq!(node.prev_key("5"), Some("3"));
    }

    #[test]
    fn merge_preserves_disjoint_keys() {
        let mut target = node_with(&["a", "b"]);
        target.ensure_child("a").ensure_child("x").value = Some(Scalar::from("deep"));
        let source = node_with(&["a", "c"]);

        target.merge_from(&source);

        assert_eq!(target.child("a").unwrap().value, Some(Scalar::from("a")));
        assert_eq!(target.child("a").unwrap().child("x").unwrap().value,
                   Some(Scalar::from("deep")));
        assert_eq!(target.child("b").unwrap().value, Some(Scalar::from("b")));
        assert_eq!(target.child("c").unwrap().value, Some(Scalar::from("c")));
    }
}
