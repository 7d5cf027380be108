use std::cmp::Ordering;

use ordered_float::OrderedFloat;

use crate::util::num::canonical_number;

/// An array subscript in collation order.
///
/// Keys that are numbers in canonical form sort before all other keys and
/// among themselves by numeric value; the rest sort lexicographically. The
/// numeric interpretation is computed once at construction so that tree
/// lookups and neighbour queries never re-parse key text.
///
/// # Example
/// ```
/// use mumble::interpreter::value::collation::CollationKey;
///
/// let mut keys = vec![CollationKey::new("10"),
///                     CollationKey::new("apple"),
///                     CollationKey::new("2")];
/// keys.sort();
///
/// let order: Vec<&str> = keys.iter().map(CollationKey::as_str).collect();
/// assert_eq!(order, ["2", "10", "apple"]);
/// ```
#[derive(Debug, Clone)]
pub struct CollationKey {
    text:    String,
    numeric: Option<OrderedFloat<f64>>,
}

impl CollationKey {
    /// Wraps a key string, caching its canonical-numeric interpretation.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let numeric = canonical_number(&text).map(OrderedFloat);
        Self { text, numeric }
    }

    /// Returns the key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl PartialEq for CollationKey {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for CollationKey {}

impl Ord for CollationKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.numeric, &other.numeric) {
            (Some(a), Some(b)) => a.cmp(b).then_with(|| self.text.cmp(&other.text)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.text.cmp(&other.text),
        }
    }
}

impl PartialOrd for CollationKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_sort_before_strings() {
        let mut keys = ["b", "10", "a", "2", "-1", "1.5"].map(CollationKey::new);
        keys.sort();

        let order: Vec<&str> = keys.iter().map(CollationKey::as_str).collect();
        assert_eq!(order, ["-1", "1.5", "2", "10", "a", "b"]);
    }

    #[test]
    fn non_canonical_numbers_are_strings() {
        let mut keys = ["1.0", "2", "01"].map(CollationKey::new);
        keys.sort();

        let order: Vec<&str> = keys.iter().map(CollationKey::as_str).collect();
        assert_eq!(order, ["2", "01", "1.0"]);
    }
}
