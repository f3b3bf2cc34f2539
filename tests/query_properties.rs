//! Behavioural properties of the query layer over parsed documents.
//!
//! Each test parses a small document and checks one observable property of
//! the walker, cursor or facade: case-insensitivity, document order,
//! laziness, determinism and rendering.

#![allow(clippy::unwrap_used)]

use std::fmt::Write;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use xmlquery::query::Matches;
use xmlquery::{Cursor, Document, KindSet, Node, NodeId, Query, StaticKey};

fn ids<'a>(nodes: impl Iterator<Item = Node<'a>>) -> Vec<NodeId> {
    nodes.map(Node::id).collect()
}

// ---------------------------------------------------------------------------
// Name matching
// ---------------------------------------------------------------------------

#[test]
fn test_case_variants_select_the_same_elements() {
    let doc = Document::parse_str("<Root><Item/><ITEM/><item/><items/></Root>").unwrap();
    let root = doc.root_element_node().unwrap();
    let lower = ids(root.children_named("item"));
    assert_eq!(lower.len(), 3);
    assert_eq!(ids(root.children_named("ITEM")), lower);
    assert_eq!(ids(root.children_named("iTeM")), lower);
    assert_eq!(ids(root.children_named(StaticKey::new("Item"))), lower);
}

#[test]
fn test_static_key_constants_work_in_queries() {
    const ENTRY: StaticKey = StaticKey::new("entry");
    let doc = Document::parse_str("<feed><ENTRY/><entry/></feed>").unwrap();
    let feed = doc.root_element_node().unwrap();
    assert_eq!(feed.children_named(ENTRY).count(), 2);
    assert_eq!(feed.first_child(ENTRY), feed.children_named("Entry").next());
}

#[test]
fn test_prefix_matching_ignores_case_but_not_uri() {
    let doc = Document::parse_str(
        r#"<r xmlns:A="urn:one" xmlns:b="urn:one"><A:x/><b:x/><x/></r>"#,
    )
    .unwrap();
    let r = doc.root_element_node().unwrap();
    let by_a: Vec<_> = r
        .children_named_in("x", "a")
        .map(|n| n.namespace_prefix().unwrap())
        .collect();
    assert_eq!(by_a, vec!["A"]);
    assert_eq!(r.children_named_in("X", "B").count(), 1);
    assert_eq!(r.children_named("x").count(), 3);
}

// ---------------------------------------------------------------------------
// Document order and scope
// ---------------------------------------------------------------------------

#[test]
fn test_descendants_follow_preorder() {
    let doc = Document::parse_str(
        "<a><s id=\"1\"><s id=\"2\"><s id=\"3\"/></s><t><s id=\"4\"/></t></s><s id=\"5\"/></a>",
    )
    .unwrap();
    let a = doc.root_element_node().unwrap();
    let order: Vec<_> = a
        .descendants_named("s")
        .map(|n| n.attribute("id").unwrap())
        .collect();
    assert_eq!(order, vec!["1", "2", "3", "4", "5"]);
}

#[test]
fn test_children_scope_is_one_level() {
    let doc = Document::parse_str("<a><b><b/></b><c><b/></c><b/></a>").unwrap();
    let a = doc.root_element_node().unwrap();
    assert_eq!(a.children_named("b").count(), 2);
    assert_eq!(a.descendants_named("b").count(), 4);
}

#[test]
fn test_first_is_head_of_all() {
    let doc = Document::parse_str("<r><x><y n=\"1\"/></x><y n=\"2\"/></r>").unwrap();
    let r = doc.root_element_node().unwrap();
    assert_eq!(r.first_descendant("y"), r.descendants_named("y").next());
    assert_eq!(r.first_child("y"), r.children_named("y").next());
    assert_eq!(r.first_descendant("y").unwrap().attribute("n"), Some("1"));
    assert_eq!(r.first_child("y").unwrap().attribute("n"), Some("2"));
}

#[test]
fn test_results_are_lazy_and_partial() {
    let mut xml = String::from("<r>");
    for i in 0..1_000 {
        let _ = write!(xml, "<i n=\"{i}\"/>");
    }
    xml.push_str("</r>");
    let doc = Document::parse_str(&xml).unwrap();
    let r = doc.root_element();

    let mut matches: Matches<'_, &str, StaticKey> = Query::children("i").all(&doc, r);
    let first_two: Vec<_> = matches.by_ref().take(2).collect();
    assert_eq!(first_two.len(), 2);
    assert_eq!(doc.attribute(first_two[1], "n"), Some("1"));
    let next = matches.next().unwrap();
    assert_eq!(doc.attribute(next, "n"), Some("2"));
}

#[test]
fn test_queries_are_deterministic() {
    let doc = Document::parse_str("<r><a><b/></a><b><a/></b></r>").unwrap();
    let r = doc.root_element_node().unwrap();
    let once = ids(r.descendants_named("a"));
    for _ in 0..3 {
        assert_eq!(ids(r.descendants_named("a")), once);
    }
}

#[test]
fn test_element_without_children() {
    let doc = Document::parse_str("<r>only text</r>").unwrap();
    let r = doc.root_element_node().unwrap();
    assert_eq!(r.children().count(), 0);
    assert_eq!(r.first_child("anything"), None);
    assert_eq!(r.descendants_named("anything").count(), 0);
    assert_eq!(r.child_nodes(KindSet::TEXT).count(), 1);
}

#[test]
fn test_cursor_over_mixed_content() {
    let doc = Document::parse_str("<p>Hello <b>bold</b> and <i>italic</i>!</p>").unwrap();
    let p = doc.root_element().unwrap();
    let text: String = Cursor::children_of(&doc, p, KindSet::TEXT)
        .filter_map(|id| doc.node_text(id))
        .collect();
    assert_eq!(text, "Hello  and !");
    assert_eq!(Cursor::children_of(&doc, p, KindSet::default()).count(), 2);
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[test]
fn test_render_reproduces_subtree() {
    let xml = r#"<cfg xmlns:x="urn:x"><x:opt name="a &amp; b">1 &lt; 2</x:opt><!--note--><empty/></cfg>"#;
    let doc = Document::parse_str(xml).unwrap();
    assert_eq!(doc.render(), xml);
    let opt = doc.root_node().first_descendant_in("opt", "x").unwrap();
    assert_eq!(opt.render(), r#"<x:opt name="a &amp; b">1 &lt; 2</x:opt>"#);
    assert_eq!(format!("{opt}"), opt.render());
}

#[test]
fn test_rendered_output_reparses_to_same_shape() {
    let doc = Document::parse_str("<a><b k=\"v\"><c>t</c></b><b/></a>").unwrap();
    let again = Document::parse_str(&doc.render()).unwrap();
    assert_eq!(again.render(), doc.render());
    assert_eq!(again.node_count(), doc.node_count());
}

#[test]
fn test_empty_document_renders_empty() {
    assert_eq!(Document::new().render(), "");
    assert_eq!(Document::new().to_string(), "");
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

fn random_tree() -> impl Strategy<Value = String> {
    let names = prop::sample::select(vec!["a", "B", "c", "Ab", "ab"]);
    let leaf = names.prop_map(|n| format!("<{n}/>"));
    leaf.prop_recursive(4, 32, 4, |inner| {
        (
            prop::sample::select(vec!["a", "B", "c", "Ab", "ab"]),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(n, kids)| format!("<{n}>{}</{n}>", kids.concat()))
    })
}

proptest! {
    #[test]
    fn descendants_match_every_case_variant(body in random_tree(), upper in any::<bool>()) {
        let xml = format!("<root>{body}</root>");
        let doc = Document::parse_str(&xml).unwrap();
        let root = doc.root_element_node().unwrap();
        let key = if upper { "AB" } else { "ab" };
        let hits = ids(root.descendants_named(key));
        let expected: Vec<_> = doc
            .descendants(root.id())
            .filter(|&id| doc.node_name(id).is_some_and(|n| n.eq_ignore_ascii_case("ab")))
            .collect();
        prop_assert_eq!(hits, expected);
    }

    #[test]
    fn first_descendant_is_head(body in random_tree()) {
        let xml = format!("<root>{body}</root>");
        let doc = Document::parse_str(&xml).unwrap();
        let root = doc.root_node();
        for key in ["a", "b", "c", "ab"] {
            prop_assert_eq!(root.first_descendant(key), root.descendants_named(key).next());
        }
    }

    #[test]
    fn render_is_stable(body in random_tree()) {
        let doc = Document::parse_str(&body).unwrap();
        let rendered = doc.render();
        let again = Document::parse_str(&rendered).unwrap();
        prop_assert_eq!(again.render(), rendered);
    }
}

#[test]
fn test_document_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Document>();

    let doc = Document::parse_str("<r><x/><x/></r>").unwrap();
    std::thread::scope(|s| {
        let workers: Vec<_> = (0..4)
            .map(|_| s.spawn(|| doc.root_node().descendants_named("x").count()))
            .collect();
        for worker in workers {
            assert_eq!(worker.join().unwrap(), 2);
        }
    });
}
