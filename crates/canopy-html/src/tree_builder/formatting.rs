//! [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
//!
//! "Initially, the list of active formatting elements is empty. It is used to
//! handle mis-nested formatting element tags."

use canopy_dom::{Attributes, NodeId};

/// "The list contains elements in the formatting category, and markers."
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormattingEntry {
    /// "A marker is an entry in the list of active formatting elements that is
    /// distinct from any element."
    Marker,
    /// A formatting element, with "the token for which the element was created"
    /// reduced to what reconstruction needs.
    Element {
        /// The element in the tree.
        node: NodeId,
        /// Its local name.
        tag: String,
        /// The attributes it was created with.
        attrs: Attributes,
    },
}

impl FormattingEntry {
    /// The element this entry refers to, if it is not a marker.
    #[must_use]
    pub const fn node(&self) -> Option<NodeId> {
        match self {
            Self::Marker => None,
            Self::Element { node, .. } => Some(*node),
        }
    }
}

/// The list of active formatting elements.
#[derive(Debug, Clone, Default)]
pub struct ActiveFormattingList {
    entries: Vec<FormattingEntry>,
}

impl ActiveFormattingList {
    /// An empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of entries, markers included.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&FormattingEntry> {
        self.entries.get(index)
    }

    /// All entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[FormattingEntry] {
        &self.entries
    }

    /// [§ 13.2.4.3 Push onto the list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
    ///
    /// "1. If there are already three elements in the list of active formatting
    /// elements after the last marker, if any, or anywhere in the list if there
    /// are no markers, that have the same tag name, namespace, and attributes
    /// as element, then remove the earliest such element from the list of
    /// active formatting elements.
    ///  2. Add element to the list of active formatting elements."
    pub fn push(&mut self, node: NodeId, tag: &str, attrs: Attributes) {
        let start = self.last_marker().map_or(0, |m| m + 1);
        let matching: Vec<usize> = (start..self.entries.len())
            .filter(|&i| {
                matches!(
                    &self.entries[i],
                    FormattingEntry::Element { tag: t, attrs: a, .. } if t == tag && a.same_set(&attrs)
                )
            })
            .collect();
        if matching.len() >= 3 {
            let _ = self.entries.remove(matching[0]);
        }
        self.entries.push(FormattingEntry::Element {
            node,
            tag: tag.to_string(),
            attrs,
        });
    }

    /// "Insert a marker at the end of the list of active formatting elements."
    pub fn insert_marker(&mut self) {
        self.entries.push(FormattingEntry::Marker);
    }

    fn last_marker(&self) -> Option<usize> {
        self.entries
            .iter()
            .rposition(|e| matches!(e, FormattingEntry::Marker))
    }

    /// [§ 13.2.4.3 Clear the list of active formatting elements up to the last marker](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    ///
    /// "1. Let entry be the last (most recently added) entry in the list of
    /// active formatting elements.
    ///  2. Remove entry from the list of active formatting elements.
    ///  3. If entry was a marker, then stop the algorithm at this point.
    ///  4. Go to step 1."
    pub fn clear_to_last_marker(&mut self) {
        while let Some(entry) = self.entries.pop() {
            if entry == FormattingEntry::Marker {
                break;
            }
        }
    }

    /// The last element with this tag name between the end of the list and the
    /// last marker, with its index.
    #[must_use]
    pub fn find_after_last_marker(&self, tag: &str) -> Option<(usize, NodeId)> {
        for (index, entry) in self.entries.iter().enumerate().rev() {
            match entry {
                FormattingEntry::Marker => return None,
                FormattingEntry::Element { node, tag: t, .. } if t == tag => {
                    return Some((index, *node));
                }
                FormattingEntry::Element { .. } => {}
            }
        }
        None
    }

    /// Index of the entry for `node`.
    #[must_use]
    pub fn position(&self, node: NodeId) -> Option<usize> {
        self.entries.iter().position(|e| e.node() == Some(node))
    }

    /// Whether `node` has an entry.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.position(node).is_some()
    }

    /// Remove the entry for `node`, if any.
    pub fn remove(&mut self, node: NodeId) {
        if let Some(index) = self.position(node) {
            let _ = self.entries.remove(index);
        }
    }

    /// Replace the entry at `index`.
    pub fn replace_at(&mut self, index: usize, entry: FormattingEntry) {
        if let Some(slot) = self.entries.get_mut(index) {
            *slot = entry;
        }
    }

    /// Insert an entry at `index`, shifting later entries.
    pub fn insert_at(&mut self, index: usize, entry: FormattingEntry) {
        let index = index.min(self.entries.len());
        self.entries.insert(index, entry);
    }
}

#[cfg(test)]
mod tests {
    use super::{ActiveFormattingList, FormattingEntry};
    use canopy_dom::{Attributes, NodeId};

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_noahs_ark_keeps_three_identical_entries() {
        let mut list = ActiveFormattingList::new();
        for i in 1..=4 {
            list.push(NodeId(i), "b", attrs(&[("class", "x")]));
        }
        assert_eq!(list.len(), 3);
        assert_eq!(list.position(NodeId(1)), None);
        assert_eq!(list.position(NodeId(2)), Some(0));
    }

    #[test]
    fn test_noahs_ark_compares_attributes() {
        let mut list = ActiveFormattingList::new();
        for i in 1..=3 {
            list.push(NodeId(i), "b", Attributes::new());
        }
        list.push(NodeId(4), "b", attrs(&[("id", "other")]));
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn test_noahs_ark_ignores_attribute_order() {
        let mut list = ActiveFormattingList::new();
        list.push(NodeId(1), "b", attrs(&[("id", "a"), ("class", "x")]));
        list.push(NodeId(2), "b", attrs(&[("class", "x"), ("id", "a")]));
        list.push(NodeId(3), "b", attrs(&[("id", "a"), ("class", "x")]));
        list.push(NodeId(4), "b", attrs(&[("class", "x"), ("id", "a")]));
        assert_eq!(list.len(), 3);
        assert_eq!(list.position(NodeId(1)), None);
    }

    #[test]
    fn test_marker_bounds_search_and_clear() {
        let mut list = ActiveFormattingList::new();
        list.push(NodeId(1), "a", Attributes::new());
        list.insert_marker();
        list.push(NodeId(2), "b", Attributes::new());

        assert_eq!(list.find_after_last_marker("a"), None);
        assert_eq!(list.find_after_last_marker("b"), Some((2, NodeId(2))));

        list.clear_to_last_marker();
        assert_eq!(list.entries().len(), 1);
        assert_eq!(list.get(0).and_then(FormattingEntry::node), Some(NodeId(1)));
    }
}
