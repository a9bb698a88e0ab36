//! [§ 13.3 Serializing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#serialising-html-fragments)
//!
//! Turns a subtree back into markup. Parsing the output of
//! [`serialize_document`] yields a tree of the same shape as the input.

use crate::{DomTree, NodeId, NodeType};

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements: area, base, br, col, embed, hr, img, input, link, meta,
/// source, track, wbr"
///
/// Also includes the legacy names the serializer must not give end tags.
#[must_use]
pub fn is_void_element(tag_name: &str) -> bool {
    matches!(
        tag_name,
        "area"
            | "base"
            | "basefont"
            | "bgsound"
            | "br"
            | "col"
            | "embed"
            | "frame"
            | "hr"
            | "img"
            | "input"
            | "keygen"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// "If the parent of current node is a style, script, xmp, iframe, noembed,
/// noframes, or plaintext element, or if the parent of current node is a
/// noscript element and scripting is enabled for the node, then append the
/// value of current node's data literally."
fn is_raw_text_parent(tag_name: &str) -> bool {
    matches!(
        tag_name,
        "style" | "script" | "xmp" | "iframe" | "noembed" | "noframes" | "plaintext" | "noscript"
    )
}

/// Serializes the children of `id` (the `innerHTML` getter).
#[must_use]
pub fn inner_html(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    serialize_children(tree, id, &mut out);
    out
}

/// Serializes `id` itself followed by its subtree (the `outerHTML` getter).
#[must_use]
pub fn outer_html(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    serialize_node(tree, id, &mut out);
    out
}

/// Serializes a whole document, including its DOCTYPE.
#[must_use]
pub fn serialize_document(tree: &DomTree) -> String {
    let mut out = String::new();
    if let Some(doctype) = tree.doctype() {
        out.push_str("<!DOCTYPE ");
        out.push_str(&doctype.name);
        out.push('>');
    }
    serialize_children(tree, tree.root(), &mut out);
    out
}

fn serialize_children(tree: &DomTree, id: NodeId, out: &mut String) {
    let parent_tag = tree.tag_name(id);

    // "If current node is a pre, textarea, or listing element, and the first
    // child node of the element, if any, is a Text node whose character data
    // has as its first character a U+000A LINE FEED (LF) character, then
    // append a U+000A LINE FEED (LF) character."
    if matches!(parent_tag, Some("pre" | "textarea" | "listing"))
        && tree
            .first_child(id)
            .and_then(|c| tree.as_text(c))
            .is_some_and(|t| t.starts_with('\n'))
    {
        out.push('\n');
    }

    for &child in tree.children(id) {
        match tree.get(child).map(|n| &n.node_type) {
            Some(NodeType::Text(text)) => {
                if parent_tag.is_some_and(is_raw_text_parent) {
                    out.push_str(text);
                } else {
                    escape_into(text, false, out);
                }
            }
            _ => serialize_node(tree, child, out),
        }
    }
}

fn serialize_node(tree: &DomTree, id: NodeId, out: &mut String) {
    let Some(node) = tree.get(id) else {
        return;
    };
    match &node.node_type {
        NodeType::Document => serialize_children(tree, id, out),
        NodeType::Element(data) => {
            out.push('<');
            out.push_str(&data.tag_name);
            for (name, value) in data.attrs.iter() {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_into(value, true, out);
                out.push('"');
            }
            out.push('>');
            if is_void_element(&data.tag_name) {
                return;
            }
            serialize_children(tree, id, out);
            out.push_str("</");
            out.push_str(&data.tag_name);
            out.push('>');
        }
        NodeType::Text(text) => escape_into(text, false, out),
        NodeType::Comment(data) => {
            out.push_str("<!--");
            out.push_str(data);
            out.push_str("-->");
        }
    }
}

/// [§ 13.3 Escaping a string](https://html.spec.whatwg.org/multipage/parsing.html#escapingString)
fn escape_into(text: &str, attribute_mode: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{00A0}' => out.push_str("&nbsp;"),
            '"' if attribute_mode => out.push_str("&quot;"),
            '<' if !attribute_mode => out.push_str("&lt;"),
            '>' if !attribute_mode => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}
