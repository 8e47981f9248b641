//! Tests for DOM tree construction, traversal iterators, and text access.

use std::collections::HashMap;

use wallaby_dom::{DomTree, ElementData, NodeId, NodeType};

/// Helper to create an element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData {
        tag_name: tag.to_string(),
        attrs: Default::default(),
    }))
}

fn alloc_text(tree: &mut DomTree, text: &str) -> NodeId {
    tree.alloc(NodeType::Text(text.to_string()))
}

// ========== append_child ==========

#[test]
fn test_append_child_sets_links() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    tree.append_child(parent, a);
    tree.append_child(parent, b);

    assert_eq!(tree.children(parent), &[a, b]);
    assert_eq!(tree.parent(a), Some(parent));
    assert_eq!(tree.parent(b), Some(parent));
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.prev_sibling(b), Some(a));
    assert_eq!(tree.prev_sibling(a), None);
    assert_eq!(tree.next_sibling(b), None);
    assert_eq!(tree.first_child(parent), Some(a));
    assert_eq!(tree.last_child(parent), Some(b));
}

#[test]
fn test_new_tree_has_only_document_node() {
    let tree = DomTree::new();
    assert_eq!(tree.len(), 1);
    assert!(!tree.is_empty());
    assert_eq!(tree.root(), NodeId::ROOT);
    assert!(tree.children(tree.root()).is_empty());
    assert!(tree.document_element().is_none());
}

// ========== iterators ==========

#[test]
fn test_ancestors_walks_to_root() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);
    let body = alloc_element(&mut tree, "body");
    tree.append_child(html, body);
    let p = alloc_element(&mut tree, "p");
    tree.append_child(body, p);

    let chain: Vec<NodeId> = tree.ancestors(p).collect();
    assert_eq!(chain, vec![body, html, NodeId::ROOT]);
}

#[test]
fn test_sibling_iterators() {
    let mut tree = DomTree::new();
    let ul = alloc_element(&mut tree, "ul");
    tree.append_child(NodeId::ROOT, ul);
    let items: Vec<NodeId> = (0..4)
        .map(|_| {
            let li = alloc_element(&mut tree, "li");
            tree.append_child(ul, li);
            li
        })
        .collect();

    let before: Vec<NodeId> = tree.preceding_siblings(items[2]).collect();
    assert_eq!(before, vec![items[1], items[0]]);

    let after: Vec<NodeId> = tree.following_siblings(items[1]).collect();
    assert_eq!(after, vec![items[2], items[3]]);
}

#[test]
fn test_descendants_is_preorder() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);
    let head = alloc_element(&mut tree, "head");
    tree.append_child(html, head);
    let title = alloc_element(&mut tree, "title");
    tree.append_child(head, title);
    let body = alloc_element(&mut tree, "body");
    tree.append_child(html, body);

    let order: Vec<NodeId> = tree.descendants(html).collect();
    assert_eq!(order, vec![head, title, body]);
}

#[test]
fn test_is_descendant_of() {
    let mut tree = DomTree::new();
    let outer = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, outer);
    let inner = alloc_element(&mut tree, "span");
    tree.append_child(outer, inner);
    let other = alloc_element(&mut tree, "p");
    tree.append_child(NodeId::ROOT, other);

    assert!(tree.is_descendant_of(inner, outer));
    assert!(tree.is_descendant_of(inner, NodeId::ROOT));
    assert!(!tree.is_descendant_of(outer, inner));
    assert!(!tree.is_descendant_of(other, outer));
}

// ========== text ==========

#[test]
fn test_text_content_concatenates_descendants() {
    let mut tree = DomTree::new();
    let p = alloc_element(&mut tree, "p");
    tree.append_child(NodeId::ROOT, p);
    let hello = alloc_text(&mut tree, "hello ");
    tree.append_child(p, hello);
    let em = alloc_element(&mut tree, "em");
    tree.append_child(p, em);
    let world = alloc_text(&mut tree, "world");
    tree.append_child(em, world);

    assert_eq!(tree.text_content(p), "hello world");
    assert_eq!(tree.text_content(hello), "hello ");
    assert_eq!(tree.as_text(world), Some("world"));
    assert!(tree.as_text(p).is_none());
}

// ========== element lookup ==========

#[test]
fn test_element_by_id_searches_subtree() {
    let mut tree = DomTree::new();
    let body = alloc_element(&mut tree, "body");
    tree.append_child(NodeId::ROOT, body);

    let mut attrs = HashMap::new();
    let _ = attrs.insert("id".to_string(), "target".to_string());
    let target = tree.alloc(NodeType::Element(ElementData::new("div".to_string(), attrs)));
    tree.append_child(body, target);

    assert_eq!(tree.element_by_id(NodeId::ROOT, "target"), Some(target));
    assert_eq!(tree.element_by_id(body, "target"), Some(target));
    // The scope node itself is not a candidate.
    assert_eq!(tree.element_by_id(target, "target"), None);
    assert_eq!(tree.element_by_id(NodeId::ROOT, "missing"), None);
}

#[test]
fn test_document_element() {
    let mut tree = DomTree::new();
    let comment = tree.alloc(NodeType::Comment("banner".to_string()));
    tree.append_child(NodeId::ROOT, comment);
    let html = alloc_element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);

    assert_eq!(tree.document_element(), Some(html));
}

// ========== element data ==========

#[test]
fn test_classes_and_has_class() {
    let mut attrs = HashMap::new();
    let _ = attrs.insert("class".to_string(), "nav  active".to_string());
    let element = ElementData::new("li".to_string(), attrs);

    assert!(element.has_class("nav"));
    assert!(element.has_class("active"));
    assert!(!element.has_class("act"));
    assert_eq!(element.classes().len(), 2);
    assert!(element.id().is_none());
}
