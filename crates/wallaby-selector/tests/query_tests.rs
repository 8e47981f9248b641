//! Integration tests for the query entry points: `find_all`, `find_first`,
//! and the `Queryable` scope handles, run against a fixed document.

use std::collections::HashMap;

use wallaby_dom::{DomTree, ElementData, NodeId, NodeType};
use wallaby_selector::{
    CompiledSelector, Engine, MatchStrategy, NodeRef, Queryable, SelectorError, find_all,
    find_first,
};

fn el(tree: &mut DomTree, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
    let mut map = HashMap::new();
    for (k, v) in attrs {
        let _ = map.insert((*k).to_string(), (*v).to_string());
    }
    let id = tree.alloc(NodeType::Element(ElementData::new(tag.to_string(), map)));
    tree.append_child(parent, id);
    id
}

fn text(tree: &mut DomTree, parent: NodeId, value: &str) {
    let id = tree.alloc(NodeType::Text(value.to_string()));
    tree.append_child(parent, id);
}

/// A fixed document exercising every selector feature:
///
/// ```text
/// html > body
///   ul#menu.nav
///     li.item > a[href=https://example.com/intro] "Intro"
///     li.item.foobar > a[href=http://example.com/guide.pdf][title=guide] "Guide"
///     li.item > ul > li.sub "Deep"
///     li.foo > span "Last"
///   p#lead.foo "hello world"
///   h2 "Heading"
///   p "after heading"
///   span (no children)
///   input[type=text]
///   input[type=text][disabled=disabled]
/// ```
struct Fixture {
    tree: DomTree,
    menu: NodeId,
    items: [NodeId; 4],
    anchors: [NodeId; 2],
    nested_ul: NodeId,
    sub_item: NodeId,
    lead: NodeId,
    heading: NodeId,
    trailing_p: NodeId,
    hollow_span: NodeId,
    inputs: [NodeId; 2],
}

fn fixture() -> Fixture {
    let mut tree = DomTree::new();
    let html = el(&mut tree, NodeId::ROOT, "html", &[]);
    let body = el(&mut tree, html, "body", &[]);

    let menu = el(&mut tree, body, "ul", &[("id", "menu"), ("class", "nav")]);

    let li1 = el(&mut tree, menu, "li", &[("class", "item")]);
    let a1 = el(&mut tree, li1, "a", &[("href", "https://example.com/intro")]);
    text(&mut tree, a1, "Intro");

    let li2 = el(&mut tree, menu, "li", &[("class", "item foobar")]);
    let a2 = el(
        &mut tree,
        li2,
        "a",
        &[("href", "http://example.com/guide.pdf"), ("title", "guide")],
    );
    text(&mut tree, a2, "Guide");

    let li3 = el(&mut tree, menu, "li", &[("class", "item")]);
    let nested_ul = el(&mut tree, li3, "ul", &[]);
    let sub_item = el(&mut tree, nested_ul, "li", &[("class", "sub")]);
    text(&mut tree, sub_item, "Deep");

    let li4 = el(&mut tree, menu, "li", &[("class", "foo")]);
    let span = el(&mut tree, li4, "span", &[]);
    text(&mut tree, span, "Last");

    let lead = el(&mut tree, body, "p", &[("id", "lead"), ("class", "foo")]);
    text(&mut tree, lead, "hello world");
    let heading = el(&mut tree, body, "h2", &[]);
    text(&mut tree, heading, "Heading");
    let trailing_p = el(&mut tree, body, "p", &[]);
    text(&mut tree, trailing_p, "after heading");
    let hollow_span = el(&mut tree, body, "span", &[]);

    let input_on = el(&mut tree, body, "input", &[("type", "text")]);
    let input_off = el(
        &mut tree,
        body,
        "input",
        &[("type", "text"), ("disabled", "disabled")],
    );

    Fixture {
        tree,
        menu,
        items: [li1, li2, li3, li4],
        anchors: [a1, a2],
        nested_ul,
        sub_item,
        lead,
        heading,
        trailing_p,
        hollow_span,
        inputs: [input_on, input_off],
    }
}

fn all(f: &Fixture, selector: &str) -> Vec<NodeId> {
    find_all(&f.tree, None, selector).unwrap()
}

// ========== basic selectors ==========

#[test]
fn test_universal_selector_matches_every_element() {
    let f = fixture();
    assert_eq!(all(&f, "*").len(), 18);
}

#[test]
fn test_id_selector() {
    let f = fixture();
    assert_eq!(all(&f, "#lead"), vec![f.lead]);
    assert_eq!(all(&f, "p#lead"), vec![f.lead]);
    // Tag mismatch on an id hit is a miss, not an error.
    assert!(all(&f, "div#lead").is_empty());
    assert!(all(&f, "#missing").is_empty());
}

#[test]
fn test_class_matching_is_whole_word() {
    let f = fixture();
    // `.foo` must not match `class="item foobar"`.
    assert_eq!(all(&f, ".foo"), vec![f.items[3], f.lead]);
    assert_eq!(all(&f, "li.foo"), vec![f.items[3]]);
}

#[test]
fn test_results_are_in_document_order() {
    let f = fixture();
    assert_eq!(
        all(&f, "li"),
        vec![f.items[0], f.items[1], f.items[2], f.sub_item, f.items[3]]
    );
}

// ========== combinators ==========

#[test]
fn test_descendant_vs_child() {
    let f = fixture();
    // Descendant reaches into the nested list; child does not.
    assert_eq!(all(&f, "#menu li").len(), 5);
    assert_eq!(
        all(&f, "#menu > li"),
        vec![f.items[0], f.items[1], f.items[2], f.items[3]]
    );
    assert_eq!(all(&f, "ul > li").len(), 5);
}

#[test]
fn test_adjacent_sibling_is_nearest_matching_tag() {
    let f = fixture();
    assert_eq!(all(&f, "h2 + p"), vec![f.trailing_p]);
    assert_eq!(all(&f, "p + h2"), vec![f.heading]);
    // The nearest following input of the menu, skipping other tags.
    assert_eq!(all(&f, "ul + input"), vec![f.inputs[0]]);
}

#[test]
fn test_general_sibling() {
    let f = fixture();
    assert_eq!(all(&f, "h2 ~ p"), vec![f.trailing_p]);
    assert_eq!(all(&f, "ul ~ p"), vec![f.lead, f.trailing_p]);
}

// ========== attribute selectors ==========

#[test]
fn test_attribute_operators() {
    let f = fixture();
    assert_eq!(all(&f, "a[href^=https]"), vec![f.anchors[0]]);
    assert_eq!(all(&f, "a[href$=.pdf]"), vec![f.anchors[1]]);
    assert_eq!(all(&f, "a[href*=example]"), f.anchors.to_vec());
    assert_eq!(all(&f, "a[title=guide]"), vec![f.anchors[1]]);
    assert_eq!(all(&f, "a[title]"), vec![f.anchors[1]]);
    assert_eq!(all(&f, "li[class~=foobar]"), vec![f.items[1]]);
}

#[test]
fn test_not_equals_matches_absent_attribute() {
    let f = fixture();
    // anchors[0] has no title at all and still counts.
    assert_eq!(all(&f, "a[title!=x]"), f.anchors.to_vec());
    assert_eq!(all(&f, "a[title!=guide]"), vec![f.anchors[0]]);
}

#[test]
fn test_quoted_values_and_empty_value_degradation() {
    let f = fixture();
    assert_eq!(all(&f, "a[title=\"guide\"]"), vec![f.anchors[1]]);
    assert_eq!(all(&f, "a[title='guide']"), vec![f.anchors[1]]);
    // An empty comparison value degrades to a bare existence test.
    assert_eq!(all(&f, "a[title=]"), vec![f.anchors[1]]);
    assert_eq!(all(&f, "a[title=\"\"]"), vec![f.anchors[1]]);
}

// ========== pseudo-classes ==========

#[test]
fn test_odd_even_partition_direct_children() {
    let f = fixture();
    let odd = all(&f, "#menu > li:odd");
    let even = all(&f, "#menu > li:even");
    // Zero-based sibling counting: odd takes positions 0 and 2.
    assert_eq!(odd, vec![f.items[0], f.items[2]]);
    assert_eq!(even, vec![f.items[1], f.items[3]]);
}

#[test]
fn test_nth_exact_and_step() {
    let f = fixture();
    assert_eq!(all(&f, "#menu > li:nth(2)"), vec![f.items[2]]);
    assert_eq!(
        all(&f, "#menu > li:nth(3n)"),
        vec![f.items[0], f.items[3]]
    );
    // A zero step matches nothing.
    assert!(all(&f, "#menu > li:nth(0n+1)").is_empty());
}

#[test]
fn test_first_last_only() {
    let f = fixture();
    assert_eq!(all(&f, "li:first-child"), vec![f.items[0], f.sub_item]);
    assert_eq!(all(&f, "#menu > li:last-child"), vec![f.items[3]]);
    assert_eq!(all(&f, "li:only-child"), vec![f.sub_item]);
}

#[test]
fn test_empty_and_contains() {
    let f = fixture();
    assert_eq!(all(&f, "span:empty"), vec![f.hollow_span]);
    assert_eq!(all(&f, "p:contains(world)"), vec![f.lead]);
    assert_eq!(all(&f, "li:contains(Deep)"), vec![f.items[2], f.sub_item]);
}

#[test]
fn test_enabled_and_attribute_fallback() {
    let f = fixture();
    assert_eq!(all(&f, "input:enabled"), vec![f.inputs[0]]);
    // An unrecognized pseudo name falls back to an attribute test.
    assert_eq!(all(&f, "input:disabled"), vec![f.inputs[1]]);
}

// ========== selector lists and scoping ==========

#[test]
fn test_comma_list_unions_in_document_order() {
    let f = fixture();
    assert_eq!(all(&f, "h2, #lead"), vec![f.lead, f.heading]);
    // Overlapping parts are deduplicated.
    assert_eq!(
        all(&f, "ul li, li.sub"),
        vec![f.items[0], f.items[1], f.items[2], f.sub_item, f.items[3]]
    );
}

#[test]
fn test_node_ref_scopes_to_subtree() {
    let f = fixture();
    let scope = NodeRef::new(&f.tree, f.nested_ul);
    assert_eq!(scope.get_elements("li").unwrap(), vec![f.sub_item]);
    assert_eq!(f.tree.get_elements("li").unwrap().len(), 5);
    assert_eq!(
        f.tree.get_elements_by_selector("h2, #lead").unwrap(),
        vec![f.lead, f.heading]
    );
    assert_eq!(
        f.tree.get_element("li").unwrap(),
        Some(f.items[0])
    );
}

#[test]
fn test_scoped_query_excludes_the_scope_itself() {
    let f = fixture();
    let scope = NodeRef::new(&f.tree, f.menu);
    assert_eq!(scope.get_elements("ul").unwrap(), vec![f.nested_ul]);
}

#[test]
fn test_find_first() {
    let f = fixture();
    assert_eq!(find_first(&f.tree, None, "li").unwrap(), Some(f.items[0]));
    assert_eq!(find_first(&f.tree, None, "table").unwrap(), None);
}

// ========== engine plumbing ==========

#[test]
fn test_engine_accepts_custom_strategy() {
    struct MatchNothing;
    impl MatchStrategy for MatchNothing {
        fn matches(
            &self,
            _tree: &DomTree,
            _context: NodeId,
            _selector: &CompiledSelector,
        ) -> Result<Vec<NodeId>, SelectorError> {
            Ok(Vec::new())
        }
    }

    let f = fixture();
    let engine = Engine::new(Box::new(MatchNothing));
    let compiled = wallaby_selector::compile("li").unwrap();
    assert!(engine.matches(&f.tree, f.tree.root(), &compiled).unwrap().is_empty());
}

// ========== error propagation ==========

#[test]
fn test_malformed_selectors_error_before_matching() {
    let f = fixture();
    assert!(matches!(
        find_all(&f.tree, None, ""),
        Err(SelectorError::BadSelector(_))
    ));
    assert!(matches!(
        find_all(&f.tree, None, "li:nth(x)"),
        Err(SelectorError::BadNthParameter(_))
    ));
    assert!(matches!(
        find_all(&f.tree, None, "li:nth(2n"),
        Err(SelectorError::BadPseudoSelector(_))
    ));
}
