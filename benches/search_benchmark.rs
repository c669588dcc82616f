// Performance benchmarks for text encoding and index search
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use std::sync::Arc;

use riskwise_core::{Backend, HashEncoder, TextEncoder, VectorIndex};

const WORDS: &[&str] = &[
    "beton", "kalıp", "vinç", "tedarik", "gecikme", "izin", "kalite", "saha", "montaj", "plan",
    "risk", "kontrol", "sevkiyat", "deprem", "iskele", "zemin",
];

fn synthetic_corpus(n: usize) -> Vec<String> {
    let mut rng = rand::rng();
    (0..n)
        .map(|_| {
            let len = rng.random_range(4..12);
            (0..len)
                .map(|_| WORDS[rng.random_range(0..WORDS.len())])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

fn build_index(texts: &[String], flat: bool, dim: usize) -> VectorIndex {
    let encoder = Arc::new(HashEncoder::new(dim));
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let matrix = encoder.encode_batch(&refs);
    VectorIndex::fit(
        encoder,
        Backend::from_flag(flat, dim),
        matrix,
        (0..texts.len() as i64).collect(),
        texts.to_vec(),
        vec![String::new(); texts.len()],
    )
    .unwrap()
}

fn benchmark_encode(c: &mut Criterion) {
    let encoder = HashEncoder::new(384);
    let text = "beton dökümünde kür planı ve sevkiyat programı gecikme riski";

    c.bench_function("encode_384", |b| {
        b.iter(|| black_box(encoder.encode(black_box(text))));
    });
}

fn benchmark_encode_batch(c: &mut Criterion) {
    let texts = synthetic_corpus(1000);
    let encoder = HashEncoder::new(384);
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();

    c.bench_function("encode_batch_1000", |b| {
        b.iter(|| black_box(encoder.encode_batch(black_box(&refs))));
    });
}

fn benchmark_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    for size in [100, 1000, 10000].iter() {
        let texts = synthetic_corpus(*size);
        let scan = build_index(&texts, false, 384);
        let flat = build_index(&texts, true, 384);

        group.bench_with_input(BenchmarkId::new("cosine_scan", size), size, |b, _| {
            b.iter(|| black_box(scan.search(black_box("beton tedarik gecikme"), 5)));
        });
        group.bench_with_input(BenchmarkId::new("flat_ip", size), size, |b, _| {
            b.iter(|| black_box(flat.search(black_box("beton tedarik gecikme"), 5)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_encode,
    benchmark_encode_batch,
    benchmark_search
);
criterion_main!(benches);
