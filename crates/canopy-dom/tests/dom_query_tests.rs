//! Tests for DOM queries: tree order, document accessors, form ownership and
//! serialization.

use canopy_dom::serialize::{inner_html, outer_html, serialize_document};
use canopy_dom::{Attributes, DocumentType, DomTree, ElementData, NodeId, NodeType};

fn element(tree: &mut DomTree, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
    let attrs: Attributes = attrs.iter().copied().collect();
    let id = tree.alloc(NodeType::Element(ElementData::new(tag, attrs)));
    tree.append_child(parent, id);
    id
}

fn text(tree: &mut DomTree, parent: NodeId, data: &str) -> NodeId {
    let id = tree.alloc(NodeType::Text(data.to_string()));
    tree.append_child(parent, id);
    id
}

/// html > (head, body > (div#a > span, p))
fn sample_document() -> (DomTree, NodeId, NodeId, NodeId, NodeId) {
    let mut tree = DomTree::new();
    let html = element(&mut tree, NodeId::ROOT, "html", &[]);
    let _ = element(&mut tree, html, "head", &[]);
    let body = element(&mut tree, html, "body", &[]);
    let div = element(&mut tree, body, "div", &[("id", "a")]);
    let span = element(&mut tree, div, "span", &[]);
    let p = element(&mut tree, body, "p", &[]);
    (tree, body, div, span, p)
}

#[test]
fn test_descendants_are_in_tree_order() {
    let (tree, body, div, span, p) = sample_document();
    let order: Vec<NodeId> = tree.descendants(body).collect();
    assert_eq!(order, vec![div, span, p]);
}

#[test]
fn test_document_accessors() {
    let (tree, body, div, _, _) = sample_document();
    let html = tree.document_element().expect("html element");
    assert_eq!(tree.tag_name(html), Some("html"));
    assert_eq!(tree.tag_name(tree.head().expect("head")), Some("head"));
    assert_eq!(tree.body(), Some(body));
    assert_eq!(tree.get_element_by_id("a"), Some(div));
    assert_eq!(tree.get_elements_by_tag_name("SPAN").len(), 1);
}

#[test]
fn test_text_content_concatenates_descendants() {
    let mut tree = DomTree::new();
    let div = element(&mut tree, NodeId::ROOT, "div", &[]);
    let _ = text(&mut tree, div, "a");
    let b = element(&mut tree, div, "b", &[]);
    let _ = text(&mut tree, b, "b");
    let _ = text(&mut tree, div, "c");
    assert_eq!(tree.text_content(div), "abc");
}

#[test]
fn test_form_elements_include_controls_outside_the_form() {
    let mut tree = DomTree::new();
    let body = element(&mut tree, NodeId::ROOT, "body", &[]);
    let outside = element(&mut tree, body, "input", &[("name", "before")]);
    let form = element(&mut tree, body, "form", &[]);
    let inside = element(&mut tree, form, "input", &[("name", "inside")]);
    let unowned = element(&mut tree, body, "input", &[]);

    tree.set_form_owner(inside, Some(form));
    tree.set_form_owner(outside, Some(form));

    assert_eq!(tree.form_elements(form), vec![outside, inside]);
    assert_eq!(tree.form_owner(unowned), None);
    assert_eq!(tree.forms(), vec![form]);
}

#[test]
fn test_inner_and_outer_html() {
    let mut tree = DomTree::new();
    let div = element(&mut tree, NodeId::ROOT, "div", &[("title", "a\"b&c")]);
    let _ = text(&mut tree, div, "1 < 2 & 3\u{a0}");
    let _ = element(&mut tree, div, "br", &[]);
    let comment = tree.alloc(NodeType::Comment(" note ".to_string()));
    tree.append_child(div, comment);

    assert_eq!(
        inner_html(&tree, div),
        "1 &lt; 2 &amp; 3&nbsp;<br><!-- note -->"
    );
    assert_eq!(
        outer_html(&tree, div),
        "<div title=\"a&quot;b&amp;c\">1 &lt; 2 &amp; 3&nbsp;<br><!-- note --></div>"
    );
}

#[test]
fn test_raw_text_and_leading_newline() {
    let mut tree = DomTree::new();
    let style = element(&mut tree, NodeId::ROOT, "style", &[]);
    let _ = text(&mut tree, style, "a > b { }");
    let pre = element(&mut tree, NodeId::ROOT, "pre", &[]);
    let _ = text(&mut tree, pre, "\nline");

    assert_eq!(outer_html(&tree, style), "<style>a > b { }</style>");
    assert_eq!(outer_html(&tree, pre), "<pre>\n\nline</pre>");
}

#[test]
fn test_serialize_document_with_doctype() {
    let mut tree = DomTree::new();
    tree.set_doctype(DocumentType {
        name: "html".to_string(),
        ..DocumentType::default()
    });
    let html = element(&mut tree, NodeId::ROOT, "html", &[]);
    let _ = element(&mut tree, html, "body", &[]);

    assert_eq!(
        serialize_document(&tree),
        "<!DOCTYPE html><html><body></body></html>"
    );
}
