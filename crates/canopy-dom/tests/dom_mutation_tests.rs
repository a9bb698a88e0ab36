//! Tests for DOM tree mutation: append_child, insert_before, remove_child,
//! detach and move_children.

use canopy_dom::{Attributes, DomTree, ElementData, NodeId, NodeType};

/// Helper to create an element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::new(tag, Attributes::new())))
}

/// Helper to create a parent `div` attached to the document.
fn attached_div(tree: &mut DomTree) -> NodeId {
    let div = alloc_element(tree, "div");
    tree.append_child(NodeId::ROOT, div);
    div
}

// ========== remove_child ==========

#[test]
fn test_remove_child_single_child() {
    let mut tree = DomTree::new();
    let parent = attached_div(&mut tree);
    let child = alloc_element(&mut tree, "p");
    tree.append_child(parent, child);

    tree.remove_child(parent, child);

    assert!(tree.children(parent).is_empty());
    assert_eq!(tree.parent(child), None);
    assert_eq!(tree.prev_sibling(child), None);
    assert_eq!(tree.next_sibling(child), None);
}

#[test]
fn test_remove_child_middle_of_three() {
    let mut tree = DomTree::new();
    let parent = attached_div(&mut tree);
    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    let c = alloc_element(&mut tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);

    tree.remove_child(parent, b);

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
}

#[test]
fn test_remove_child_ignores_non_child() {
    let mut tree = DomTree::new();
    let parent = attached_div(&mut tree);
    let other = attached_div(&mut tree);
    let child = alloc_element(&mut tree, "p");
    tree.append_child(other, child);

    tree.remove_child(parent, child);

    assert_eq!(tree.parent(child), Some(other));
    assert_eq!(tree.children(other), &[child]);
}

// ========== insert_before ==========

#[test]
fn test_insert_before_first_child() {
    let mut tree = DomTree::new();
    let parent = attached_div(&mut tree);
    let existing = alloc_element(&mut tree, "b");
    tree.append_child(parent, existing);

    let new_child = alloc_element(&mut tree, "a");
    tree.insert_before(parent, new_child, Some(existing));

    assert_eq!(tree.children(parent), &[new_child, existing]);
    assert_eq!(tree.parent(new_child), Some(parent));
    assert_eq!(tree.prev_sibling(new_child), None);
    assert_eq!(tree.prev_sibling(existing), Some(new_child));
}

#[test]
fn test_insert_before_none_appends() {
    let mut tree = DomTree::new();
    let parent = attached_div(&mut tree);
    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    tree.append_child(parent, a);

    tree.insert_before(parent, b, None);

    assert_eq!(tree.children(parent), &[a, b]);
}

#[test]
fn test_insert_before_reparents_from_old_parent() {
    let mut tree = DomTree::new();
    let old_parent = attached_div(&mut tree);
    let new_parent = attached_div(&mut tree);
    let anchor = alloc_element(&mut tree, "span");
    tree.append_child(new_parent, anchor);

    let moving = alloc_element(&mut tree, "em");
    tree.append_child(old_parent, moving);

    tree.insert_before(new_parent, moving, Some(anchor));

    assert!(tree.children(old_parent).is_empty());
    assert_eq!(tree.children(new_parent), &[moving, anchor]);
    assert_eq!(tree.parent(moving), Some(new_parent));
}

// ========== detach / move_children ==========

#[test]
fn test_detach_disconnects_subtree() {
    let mut tree = DomTree::new();
    let parent = attached_div(&mut tree);
    let child = alloc_element(&mut tree, "p");
    tree.append_child(parent, child);
    assert!(tree.is_connected(child));

    tree.detach(parent);

    assert!(!tree.is_connected(child));
    assert_eq!(tree.tree_root(child), parent);
    assert!(tree.children(NodeId::ROOT).is_empty());
}

#[test]
fn test_move_children_appends_to_existing() {
    let mut tree = DomTree::new();
    let from = attached_div(&mut tree);
    let to = attached_div(&mut tree);

    let existing = alloc_element(&mut tree, "x");
    tree.append_child(to, existing);
    let first = alloc_element(&mut tree, "y");
    let second = alloc_element(&mut tree, "z");
    tree.append_child(from, first);
    tree.append_child(from, second);

    tree.move_children(from, to);

    assert!(tree.children(from).is_empty());
    assert_eq!(tree.children(to), &[existing, first, second]);
    assert_eq!(tree.parent(second), Some(to));
    assert_eq!(tree.next_sibling(existing), Some(first));
}

#[test]
fn test_move_children_empty_source() {
    let mut tree = DomTree::new();
    let from = attached_div(&mut tree);
    let to = attached_div(&mut tree);

    tree.move_children(from, to);

    assert!(tree.children(from).is_empty());
    assert!(tree.children(to).is_empty());
}
