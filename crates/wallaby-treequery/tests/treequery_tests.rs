//! Integration tests for path evaluation: axes, predicates, functions, and
//! error reporting.

use std::collections::HashMap;

use wallaby_dom::{DomTree, ElementData, NodeId, NodeType};
use wallaby_treequery::{QueryError, evaluate};

fn alloc_element(tree: &mut DomTree, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
    let mut map = HashMap::new();
    for (k, v) in attrs {
        let _ = map.insert((*k).to_string(), (*v).to_string());
    }
    tree.alloc(NodeType::Element(ElementData::new(tag.to_string(), map)))
}

/// A small document:
///
/// ```text
/// html > body > ul#menu > li.item "one"
///                         li.item.active "two"
///                         li "three"
///               p "hello world"
/// ```
fn sample_tree() -> (DomTree, Vec<NodeId>) {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html", &[]);
    tree.append_child(NodeId::ROOT, html);
    let body = alloc_element(&mut tree, "body", &[]);
    tree.append_child(html, body);
    let ul = alloc_element(&mut tree, "ul", &[("id", "menu")]);
    tree.append_child(body, ul);

    let mut items = Vec::new();
    for (text, class) in [("one", "item"), ("two", "item active"), ("three", "")] {
        let attrs: Vec<(&str, &str)> = if class.is_empty() {
            vec![]
        } else {
            vec![("class", class)]
        };
        let li = alloc_element(&mut tree, "li", &attrs);
        tree.append_child(ul, li);
        let t = tree.alloc(NodeType::Text(text.to_string()));
        tree.append_child(li, t);
        items.push(li);
    }

    let p = alloc_element(&mut tree, "p", &[]);
    tree.append_child(body, p);
    let t = tree.alloc(NodeType::Text("hello world".to_string()));
    tree.append_child(p, t);

    items.push(p);
    (tree, items)
}

fn ids(tree: &DomTree, context: NodeId, path: &str) -> Vec<NodeId> {
    evaluate(tree, context, path).unwrap().iter().collect()
}

// ========== axes ==========

#[test]
fn test_descendant_axis() {
    let (tree, items) = sample_tree();
    assert_eq!(
        ids(&tree, tree.root(), ".//li"),
        vec![items[0], items[1], items[2]]
    );
}

#[test]
fn test_child_axis() {
    let (tree, items) = sample_tree();
    let ul = tree.parent(items[0]).unwrap();
    assert_eq!(ids(&tree, ul, "./li"), vec![items[0], items[1], items[2]]);
    // No li children directly below the context node.
    assert!(ids(&tree, tree.root(), "./li").is_empty());
}

#[test]
fn test_following_sibling_axis() {
    let (tree, items) = sample_tree();
    assert_eq!(
        ids(&tree, items[0], "./following-sibling::li"),
        vec![items[1], items[2]]
    );
}

#[test]
fn test_star_matches_any_element() {
    let (tree, _) = sample_tree();
    let snapshot = evaluate(&tree, tree.root(), ".//*").unwrap();
    assert_eq!(snapshot.len(), 7);
}

// ========== predicates ==========

#[test]
fn test_position_predicate() {
    let (tree, items) = sample_tree();
    assert_eq!(ids(&tree, tree.root(), ".//li[2]"), vec![items[1]]);
    assert_eq!(ids(&tree, tree.root(), ".//li[last()]"), vec![items[2]]);
    assert!(ids(&tree, tree.root(), ".//li[0]").is_empty());
}

#[test]
fn test_attribute_equality_predicate() {
    let (tree, items) = sample_tree();
    let ul = tree.parent(items[0]).unwrap();
    assert_eq!(ids(&tree, tree.root(), ".//ul[@id=\"menu\"]"), vec![ul]);
    assert!(ids(&tree, tree.root(), ".//ul[@id=\"other\"]").is_empty());
}

#[test]
fn test_attribute_existence_predicate() {
    let (tree, items) = sample_tree();
    assert_eq!(
        ids(&tree, tree.root(), ".//li[@class]"),
        vec![items[0], items[1]]
    );
}

#[test]
fn test_inequality_holds_for_absent_attribute() {
    let (tree, items) = sample_tree();
    // items[2] has no class attribute at all, yet still differs from "item".
    assert_eq!(
        ids(&tree, tree.root(), ".//li[@class != \"item\"]"),
        vec![items[1], items[2]]
    );
}

#[test]
fn test_sibling_count_predicates() {
    let (tree, items) = sample_tree();
    assert_eq!(
        ids(&tree, tree.root(), ".//li[count(preceding-sibling::*) = 0]"),
        vec![items[0]]
    );
    assert_eq!(
        ids(&tree, tree.root(), ".//li[not(following-sibling::*)]"),
        vec![items[2]]
    );
    assert_eq!(
        ids(&tree, tree.root(), ".//li[count(preceding-sibling::*) mod 2 = 0]"),
        vec![items[0], items[2]]
    );
}

#[test]
fn test_boolean_connectives() {
    let (tree, items) = sample_tree();
    assert_eq!(
        ids(
            &tree,
            tree.root(),
            ".//li[@class = \"item\" or not(preceding-sibling::*)]"
        ),
        vec![items[0]]
    );
    assert_eq!(
        ids(
            &tree,
            tree.root(),
            ".//li[@class and count(preceding-sibling::*) = 1]"
        ),
        vec![items[1]]
    );
}

// ========== functions ==========

#[test]
fn test_contains_and_starts_with() {
    let (tree, items) = sample_tree();
    assert_eq!(
        ids(&tree, tree.root(), ".//p[contains(text(), \"world\")]"),
        vec![items[3]]
    );
    assert_eq!(
        ids(&tree, tree.root(), ".//li[starts-with(@class, \"item\")]"),
        vec![items[0], items[1]]
    );
}

#[test]
fn test_concat_padding_idiom() {
    let (tree, items) = sample_tree();
    // Whole-word class matching via space padding.
    assert_eq!(
        ids(
            &tree,
            tree.root(),
            ".//li[contains(concat(\" \", @class, \" \"), \" active \")]"
        ),
        vec![items[1]]
    );
}

#[test]
fn test_substring_and_string_length() {
    let (tree, items) = sample_tree();
    // @class of items[1] is "item active"; its last six characters.
    assert_eq!(
        ids(
            &tree,
            tree.root(),
            ".//li[substring(@class, string-length(@class) - 5) = \"active\"]"
        ),
        vec![items[1]]
    );
}

#[test]
fn test_empty_check_via_node() {
    let mut tree = DomTree::new();
    let div = alloc_element(&mut tree, "div", &[]);
    tree.append_child(NodeId::ROOT, div);
    let hollow = alloc_element(&mut tree, "span", &[]);
    tree.append_child(div, hollow);
    let full = alloc_element(&mut tree, "span", &[]);
    tree.append_child(div, full);
    let t = tree.alloc(NodeType::Text("x".to_string()));
    tree.append_child(full, t);

    assert_eq!(ids(&tree, tree.root(), ".//span[not(node())]"), vec![hollow]);
}

// ========== errors ==========

#[test]
fn test_syntax_error() {
    let (tree, _) = sample_tree();
    assert!(matches!(
        evaluate(&tree, tree.root(), ".//li["),
        Err(QueryError::Syntax { .. })
    ));
    assert!(matches!(
        evaluate(&tree, tree.root(), ".//li[@]"),
        Err(QueryError::Syntax { .. })
    ));
}

#[test]
fn test_unknown_function() {
    let (tree, _) = sample_tree();
    assert!(matches!(
        evaluate(&tree, tree.root(), ".//li[frobnicate(@id)]"),
        Err(QueryError::UnknownFunction(name)) if name == "frobnicate"
    ));
}

#[test]
fn test_mod_by_zero() {
    let (tree, _) = sample_tree();
    assert!(matches!(
        evaluate(&tree, tree.root(), ".//li[count(preceding-sibling::*) mod 0 = 0]"),
        Err(QueryError::BadArgument(_))
    ));
}
