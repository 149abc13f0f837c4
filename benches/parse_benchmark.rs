//! Benchmarks for helpdoc parsing, rendering and streaming.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic articles of increasing size.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use helpdoc::render::{to_markup, to_text};
use helpdoc::stream::InsertionPipeline;
use helpdoc::{parse_markup_to_document, render_document_to_markup, Document};

/// Creates a synthetic article with the given number of sections.
fn create_article(sections: usize) -> String {
    let mut article = String::new();
    for i in 0..sections {
        article.push_str(&format!("## Section {}\n", i + 1));
        article.push_str("Intro with **bold**, _italic_ and a [link](https://example.com).\n");
        for j in 0..4 {
            article.push_str(&format!("* Step {} of section {}\n", j + 1, i + 1));
        }
        article.push_str("> Note: remember to save.\n\n");
    }
    article
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for sections in [10, 100, 1000] {
        let article = create_article(sections);
        group.bench_with_input(BenchmarkId::from_parameter(sections), &article, |b, text| {
            b.iter(|| parse_markup_to_document(black_box(text)))
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let doc = parse_markup_to_document(&create_article(100));

    c.bench_function("render_html", |b| {
        b.iter(|| render_document_to_markup(black_box(&doc)))
    });
    c.bench_function("render_text", |b| b.iter(|| to_text(black_box(&doc))));
    c.bench_function("render_markup", |b| b.iter(|| to_markup(black_box(&doc))));
}

fn bench_streaming(c: &mut Criterion) {
    let article = create_article(100);
    // Chunks of a few bytes, split on char boundaries, like token streams.
    let chunks: Vec<String> = article
        .chars()
        .collect::<Vec<_>>()
        .chunks(7)
        .map(|c| c.iter().collect())
        .collect();

    c.bench_function("stream_insert_100_sections", |b| {
        b.iter(|| {
            let mut doc = Document::new();
            let mut pipeline = InsertionPipeline::default();
            pipeline.start(&mut doc, None, false);
            for chunk in &chunks {
                let _ = pipeline.push_chunk(&mut doc, chunk);
            }
            let _ = pipeline.finish(&mut doc);
            black_box(doc)
        })
    });
}

criterion_group!(benches, bench_parse, bench_render, bench_streaming);
criterion_main!(benches);
