#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::fmt::Write;
use xmlquery::{Document, Query, StaticKey};

// ---------------------------------------------------------------------------
// Document generators
// ---------------------------------------------------------------------------

/// Generates a catalog of `n` books, each with a few child elements.
fn make_catalog(n: usize) -> String {
    let mut xml = String::from("<?xml version=\"1.0\"?>\n<catalog xmlns:dc=\"http://purl.org/dc/elements/1.1/\">\n");
    for i in 0..n {
        let _ = writeln!(
            xml,
            "  <Book id=\"bk{i}\"><dc:title>Title {i}</dc:title>\
             <author>Author {i}</author><price>{}.99</price></Book>",
            10 + i
        );
    }
    xml.push_str("</catalog>\n");
    xml
}

/// Generates an HTML page with `n` table rows.
fn make_html(n: usize) -> String {
    let mut html = String::from("<HTML><HEAD><TITLE>Rows</TITLE></HEAD><BODY><TABLE>");
    for i in 0..n {
        let _ = write!(html, "<TR><TD>{i}<TD><A href=\"/r/{i}\">row</A>");
    }
    html.push_str("</TABLE></BODY></HTML>");
    html
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_children(c: &mut Criterion) {
    const BOOK: StaticKey = StaticKey::new("BOOK");
    let doc = Document::parse_str(&make_catalog(1_000)).unwrap();
    let catalog = doc.root_element_node().unwrap();

    c.bench_function("children_named/1000", |b| {
        b.iter(|| black_box(catalog.children_named(black_box("book")).count()));
    });

    c.bench_function("children_named_static/1000", |b| {
        b.iter(|| black_box(catalog.children_named(BOOK).count()));
    });
}

fn bench_descendants(c: &mut Criterion) {
    let doc = Document::parse_str(&make_catalog(1_000)).unwrap();
    let root = doc.root_node();

    c.bench_function("descendants_named/1000", |b| {
        b.iter(|| black_box(root.descendants_named(black_box("price")).count()));
    });
    c.bench_function("descendants_named_in/1000", |b| {
        b.iter(|| black_box(root.descendants_named_in("title", "dc").count()));
    });
    c.bench_function("first_descendant_last/1000", |b| {
        let last = format!("bk{}", 999);
        b.iter(|| {
            black_box(
                Query::descendants("book")
                    .all(&doc, Some(doc.root()))
                    .find(|&id| doc.attribute(id, "id") == Some(last.as_str())),
            )
        });
    });
}

fn bench_html(c: &mut Criterion) {
    let html = make_html(500);
    c.bench_function("parse_html/500_rows", |b| {
        b.iter(|| black_box(Document::parse_html(black_box(&html)).unwrap()));
    });

    let doc = Document::parse_html(&html).unwrap();
    c.bench_function("html_links/500_rows", |b| {
        b.iter(|| {
            black_box(
                doc.html_body()
                    .unwrap()
                    .descendants_named("a")
                    .filter_map(|a| a.attribute("href"))
                    .count(),
            )
        });
    });
}

fn bench_render(c: &mut Criterion) {
    let doc = Document::parse_str(&make_catalog(100)).unwrap();
    c.bench_function("render/100", |b| b.iter(|| black_box(doc.render())));
}

criterion_group!(benches, bench_children, bench_descendants, bench_html, bench_render);
criterion_main!(benches);
