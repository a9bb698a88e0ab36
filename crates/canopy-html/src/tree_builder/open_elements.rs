//! [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
//!
//! "Initially, the stack of open elements is empty. The stack grows downwards;
//! the topmost node on the stack is the first one added to the stack, and the
//! bottommost node of the stack is the most recently added node in the stack."
//!
//! Here index 0 is the topmost node (the `html` element) and the last entry is
//! the current node.

use canopy_dom::NodeId;

/// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#special)
///
/// "The following elements have varying levels of special parsing rules"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementCategory {
    /// "Ordinary: All other elements found while parsing an HTML document."
    Ordinary,
    /// "Special" elements, which stop the adoption agency's furthest-block
    /// search and the "any other end tag" walk.
    Special,
    /// "Formatting: The following HTML elements are those that end up in the
    /// list of active formatting elements"
    Formatting,
}

impl ElementCategory {
    /// Category of an HTML element by tag name.
    #[must_use]
    pub fn of(tag: &str) -> Self {
        if is_formatting(tag) {
            Self::Formatting
        } else if is_special(tag) {
            Self::Special
        } else {
            Self::Ordinary
        }
    }
}

/// "address, applet, area, article, aside, base, basefont, bgsound, blockquote,
/// body, br, button, caption, center, col, colgroup, dd, details, dir, div, dl,
/// dt, embed, fieldset, figcaption, figure, footer, form, frame, frameset, h1,
/// h2, h3, h4, h5, h6, head, header, hgroup, hr, html, iframe, img, input,
/// keygen, li, link, listing, main, marquee, menu, meta, nav, noembed,
/// noframes, noscript, object, ol, p, param, plaintext, pre, script, search,
/// section, select, source, style, summary, table, tbody, td, template,
/// textarea, tfoot, th, thead, title, tr, track, ul, wbr, xmp"
#[must_use]
pub fn is_special(tag: &str) -> bool {
    matches!(
        tag,
        "address"
            | "applet"
            | "area"
            | "article"
            | "aside"
            | "base"
            | "basefont"
            | "bgsound"
            | "blockquote"
            | "body"
            | "br"
            | "button"
            | "caption"
            | "center"
            | "col"
            | "colgroup"
            | "dd"
            | "details"
            | "dir"
            | "div"
            | "dl"
            | "dt"
            | "embed"
            | "fieldset"
            | "figcaption"
            | "figure"
            | "footer"
            | "form"
            | "frame"
            | "frameset"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "head"
            | "header"
            | "hgroup"
            | "hr"
            | "html"
            | "iframe"
            | "img"
            | "input"
            | "keygen"
            | "li"
            | "link"
            | "listing"
            | "main"
            | "marquee"
            | "menu"
            | "meta"
            | "nav"
            | "noembed"
            | "noframes"
            | "noscript"
            | "object"
            | "ol"
            | "p"
            | "param"
            | "plaintext"
            | "pre"
            | "script"
            | "search"
            | "section"
            | "select"
            | "source"
            | "style"
            | "summary"
            | "table"
            | "tbody"
            | "td"
            | "template"
            | "textarea"
            | "tfoot"
            | "th"
            | "thead"
            | "title"
            | "tr"
            | "track"
            | "ul"
            | "wbr"
            | "xmp"
    )
}

/// "a, b, big, code, em, font, i, nobr, s, small, strike, strong, tt, u"
#[must_use]
pub fn is_formatting(tag: &str) -> bool {
    matches!(
        tag,
        "a" | "b"
            | "big"
            | "code"
            | "em"
            | "font"
            | "i"
            | "nobr"
            | "s"
            | "small"
            | "strike"
            | "strong"
            | "tt"
            | "u"
    )
}

/// [§ 13.2.4.2 Has an element in scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// "has an element in scope"
    Default,
    /// "has an element in list item scope": default plus ol, ul.
    ListItem,
    /// "has an element in button scope": default plus button.
    Button,
    /// "has an element in table scope": html, table, template.
    Table,
    /// "has an element in select scope": everything except optgroup, option.
    Select,
}

impl ScopeKind {
    /// Whether an element with this tag ends the scope walk.
    fn is_boundary(self, tag: &str) -> bool {
        let default = matches!(
            tag,
            "applet" | "caption" | "html" | "table" | "td" | "th" | "marquee" | "object"
                | "template"
        );
        match self {
            Self::Default => default,
            Self::ListItem => default || matches!(tag, "ol" | "ul"),
            Self::Button => default || tag == "button",
            Self::Table => matches!(tag, "html" | "table" | "template"),
            Self::Select => !matches!(tag, "optgroup" | "option"),
        }
    }
}

/// One open element, with the tag name it was created with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackEntry {
    /// The element in the tree.
    pub node: NodeId,
    /// Its local name.
    pub tag: String,
    /// Its parsing category.
    pub category: ElementCategory,
}

/// The stack of open elements.
#[derive(Debug, Clone, Default)]
pub struct OpenElements {
    entries: Vec<StackEntry>,
}

impl OpenElements {
    /// An empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Push an element; it becomes the current node.
    pub fn push(&mut self, node: NodeId, tag: &str) {
        self.entries.push(StackEntry {
            node,
            tag: tag.to_string(),
            category: ElementCategory::of(tag),
        });
    }

    /// Pop the current node.
    pub fn pop(&mut self) -> Option<NodeId> {
        self.entries.pop().map(|e| e.node)
    }

    /// "The current node is the bottommost node in this stack of open elements."
    #[must_use]
    pub fn current(&self) -> Option<NodeId> {
        self.entries.last().map(|e| e.node)
    }

    /// Tag name of the current node.
    #[must_use]
    pub fn current_tag(&self) -> Option<&str> {
        self.entries.last().map(|e| e.tag.as_str())
    }

    /// Whether the current node has one of the given tag names.
    #[must_use]
    pub fn current_is_one_of(&self, tags: &[&str]) -> bool {
        self.current_tag().is_some_and(|t| tags.contains(&t))
    }

    /// Number of open elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no element is open.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, topmost (html) first.
    #[must_use]
    pub fn entries(&self) -> &[StackEntry] {
        &self.entries
    }

    /// The element at `index`, counting from the html element.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.entries.get(index).map(|e| e.node)
    }

    /// Tag name of the element at `index`.
    #[must_use]
    pub fn tag_at(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|e| e.tag.as_str())
    }

    /// Whether `node` is on the stack.
    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.position(node).is_some()
    }

    /// Whether an element with this tag is anywhere on the stack.
    #[must_use]
    pub fn contains_tag(&self, tag: &str) -> bool {
        self.entries.iter().any(|e| e.tag == tag)
    }

    /// Index of `node` on the stack.
    #[must_use]
    pub fn position(&self, node: NodeId) -> Option<usize> {
        self.entries.iter().position(|e| e.node == node)
    }

    /// Index of the lowest (most recently pushed) element with this tag.
    #[must_use]
    pub fn last_index_of(&self, tag: &str) -> Option<usize> {
        self.entries.iter().rposition(|e| e.tag == tag)
    }

    /// Remove `node` from wherever it is on the stack.
    pub fn remove(&mut self, node: NodeId) {
        if let Some(index) = self.position(node) {
            let _ = self.entries.remove(index);
        }
    }

    /// Replace `old` with `new` in place.
    pub fn replace(&mut self, old: NodeId, new: NodeId, tag: &str) {
        if let Some(index) = self.position(old) {
            self.entries[index] = StackEntry {
                node: new,
                tag: tag.to_string(),
                category: ElementCategory::of(tag),
            };
        }
    }

    /// Insert `node` immediately below `anchor`, i.e. nearer the current node.
    pub fn insert_after(&mut self, anchor: NodeId, node: NodeId, tag: &str) {
        let index = self.position(anchor).map_or(self.entries.len(), |i| i + 1);
        self.entries.insert(
            index,
            StackEntry {
                node,
                tag: tag.to_string(),
                category: ElementCategory::of(tag),
            },
        );
    }

    /// Truncate the stack so that `len` entries remain.
    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    /// "Pop elements from the stack of open elements until an element with
    /// the same tag name as the token has been popped from the stack."
    pub fn pop_until_tag(&mut self, tag: &str) {
        while let Some(entry) = self.entries.pop() {
            if entry.tag == tag {
                break;
            }
        }
    }

    /// Pop until an element with one of these tag names has been popped.
    pub fn pop_until_one_of(&mut self, tags: &[&str]) {
        while let Some(entry) = self.entries.pop() {
            if tags.contains(&entry.tag.as_str()) {
                break;
            }
        }
    }

    /// Pop until `node` has been popped.
    pub fn pop_until_node(&mut self, node: NodeId) {
        while let Some(popped) = self.pop() {
            if popped == node {
                break;
            }
        }
    }

    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    ///
    /// "1. Initialize node to be the current node (the bottommost node of the stack).
    ///  2. If node is the target node, terminate in a match state.
    ///  3. Otherwise, if node is one of the element types in list, terminate in a failure state.
    ///  4. Otherwise, set node to the previous entry in the stack of open elements
    ///     and return to step 2."
    #[must_use]
    pub fn has_element_in_scope(&self, tag: &str, scope: ScopeKind) -> bool {
        self.has_one_in_scope(&[tag], scope)
    }

    /// Whether any of `tags` is in the given scope.
    #[must_use]
    pub fn has_one_in_scope(&self, tags: &[&str], scope: ScopeKind) -> bool {
        for entry in self.entries.iter().rev() {
            if tags.contains(&entry.tag.as_str()) {
                return true;
            }
            if scope.is_boundary(&entry.tag) {
                return false;
            }
        }
        false
    }

    /// Scope query for a specific element rather than a tag name.
    #[must_use]
    pub fn has_node_in_scope(&self, node: NodeId, scope: ScopeKind) -> bool {
        for entry in self.entries.iter().rev() {
            if entry.node == node {
                return true;
            }
            if scope.is_boundary(&entry.tag) {
                return false;
            }
        }
        false
    }

    fn clear_back_to(&mut self, stop: &[&str]) {
        while let Some(tag) = self.current_tag() {
            if stop.contains(&tag) {
                break;
            }
            let _ = self.pop();
        }
    }

    /// [§ 13.2.6.4.9](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-context)
    ///
    /// "pop elements from the stack of open elements until the current node is
    /// a table, template, or html element."
    pub fn clear_to_table_context(&mut self) {
        self.clear_back_to(&["table", "template", "html"]);
    }

    /// [§ 13.2.6.4.13](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-body-context)
    ///
    /// "until the current node is a tbody, tfoot, thead, template, or html element."
    pub fn clear_to_table_body_context(&mut self) {
        self.clear_back_to(&["tbody", "tfoot", "thead", "template", "html"]);
    }

    /// [§ 13.2.6.4.14](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-row-context)
    ///
    /// "until the current node is a tr, template, or html element."
    pub fn clear_to_table_row_context(&mut self) {
        self.clear_back_to(&["tr", "template", "html"]);
    }
}

#[cfg(test)]
mod tests {
    use super::{OpenElements, ScopeKind};
    use canopy_dom::NodeId;

    fn stack(tags: &[&str]) -> OpenElements {
        let mut stack = OpenElements::new();
        for (i, tag) in tags.iter().enumerate() {
            stack.push(NodeId(i + 1), tag);
        }
        stack
    }

    #[test]
    fn test_default_scope_stops_at_table() {
        let stack = stack(&["html", "body", "p", "table", "tr", "td"]);
        assert!(!stack.has_element_in_scope("p", ScopeKind::Default));
        assert!(stack.has_element_in_scope("td", ScopeKind::Default));
        assert!(stack.has_element_in_scope("tr", ScopeKind::Table));
    }

    #[test]
    fn test_button_and_list_item_scopes() {
        let stack = stack(&["html", "body", "p", "button"]);
        assert!(stack.has_element_in_scope("p", ScopeKind::Default));
        assert!(!stack.has_element_in_scope("p", ScopeKind::Button));

        let stack = self::stack(&["html", "body", "li", "ul"]);
        assert!(!stack.has_element_in_scope("li", ScopeKind::ListItem));
    }

    #[test]
    fn test_select_scope_only_crosses_options() {
        let stack = stack(&["html", "body", "select", "optgroup", "option"]);
        assert!(stack.has_element_in_scope("select", ScopeKind::Select));
        let stack = self::stack(&["html", "body", "select", "div"]);
        assert!(!stack.has_element_in_scope("select", ScopeKind::Select));
    }

    #[test]
    fn test_clear_to_table_body_context() {
        let mut stack = stack(&["html", "body", "table", "tbody", "tr", "td"]);
        stack.clear_to_table_body_context();
        assert_eq!(stack.current_tag(), Some("tbody"));
    }

    #[test]
    fn test_pop_until_tag_pops_the_match() {
        let mut stack = stack(&["html", "body", "div", "span", "b"]);
        stack.pop_until_tag("div");
        assert_eq!(stack.current_tag(), Some("body"));
    }

    #[test]
    fn test_insert_after_and_replace() {
        let mut stack = stack(&["html", "body", "b"]);
        stack.insert_after(NodeId(2), NodeId(10), "i");
        assert_eq!(stack.tag_at(2), Some("i"));
        stack.replace(NodeId(3), NodeId(11), "em");
        assert_eq!(stack.current(), Some(NodeId(11)));
        assert_eq!(stack.current_tag(), Some("em"));
    }
}
