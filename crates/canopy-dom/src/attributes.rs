//! Element attribute storage.
//!
//! [§ 4.9.2 Interface Attr](https://dom.spec.whatwg.org/#interface-attr)
//!
//! "An element has an associated attribute list... Unless explicitly given
//! when an element is created, its attribute list is empty."
//!
//! Attributes keep the order in which they were first set. Setting a name that
//! is already present replaces its value in place.

/// Insertion-ordered attribute list of an element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    /// Create an empty attribute list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// [§ 4.9 set an attribute value](https://dom.spec.whatwg.org/#concept-element-attributes-set-value)
    ///
    /// Sets `name` to `value`. An existing attribute keeps its position and
    /// takes the new value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    /// Value of the attribute called `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether an attribute called `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Remove the attribute called `name`, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Number of attributes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no attributes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether both lists hold the same name/value pairs, in any order.
    #[must_use]
    pub fn same_set(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(n, v)| other.get(n) == Some(v))
    }

    /// Iterate `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for (name, value) in iter {
            attrs.set(name, value);
        }
        attrs
    }
}

#[cfg(test)]
mod tests {
    use super::Attributes;

    #[test]
    fn test_set_keeps_first_position_and_last_value() {
        let mut attrs = Attributes::new();
        attrs.set("id", "a");
        attrs.set("class", "x");
        attrs.set("id", "b");

        let pairs: Vec<(&str, &str)> = attrs.iter().collect();
        assert_eq!(pairs, vec![("id", "b"), ("class", "x")]);
    }

    #[test]
    fn test_same_set_ignores_order() {
        let a: Attributes = [("id", "x"), ("class", "y")].into_iter().collect();
        let b: Attributes = [("class", "y"), ("id", "x")].into_iter().collect();
        let c: Attributes = [("class", "y"), ("id", "z")].into_iter().collect();
        assert!(a.same_set(&b));
        assert!(!a.same_set(&c));
        assert!(!a.same_set(&Attributes::new()));
    }

    #[test]
    fn test_remove_returns_value() {
        let mut attrs: Attributes = [("name", "q"), ("type", "text")].into_iter().collect();
        assert_eq!(attrs.remove("name").as_deref(), Some("q"));
        assert!(!attrs.contains("name"));
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.remove("missing"), None);
    }
}
