//! Parser throughput on generated sources

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use docblocks::{DocParser, Settings, sort};
use std::hint::black_box;
use std::path::Path;
use std::sync::Arc;

const HEADER: &str = "////\n/// @name Bench\n/// @page bench/generated\n/// @author Bench\n////\n\n";

fn generate_source(blocks: usize) -> String {
    let mut source = String::from(HEADER);
    for i in 0..blocks {
        source.push_str(&format!(
            "/// @name block_{i}\n\
             /// @description\n\
             /// Adds `{i}` to the value.\n\
             /// @arg {{number}} value [0] - Input\n\
             /// @returns {{number}} The sum\n\
             /// @markup\n\
             /// <div class=\"${{@state.class}}\">{i}</div>\n\
             /// @states\n\
             /// - .is-active\n\
             function block_{i}(value) {{\n  return value + {i};\n}}\n\n\
             // plain comment\n\n"
        ));
    }
    source
}

fn bench_parse_source(c: &mut Criterion) {
    let parser = DocParser::new(Arc::new(Settings::default())).expect("default settings");
    let mut group = c.benchmark_group("parse_source");

    for blocks in [10, 100, 1000] {
        let source = generate_source(blocks);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(blocks), &source, |b, source| {
            b.iter(|| parser.parse_source(Path::new("bench.js"), black_box(source)));
        });
    }
    group.finish();
}

fn bench_extract_blocks(c: &mut Criterion) {
    let parser = DocParser::new(Arc::new(Settings::default())).expect("default settings");
    let source = generate_source(1000);

    c.bench_function("extract_blocks_1000", |b| {
        b.iter(|| parser.extract_blocks(Path::new("bench.js"), black_box(&source)));
    });
}

fn bench_sort(c: &mut Criterion) {
    let parser = DocParser::new(Arc::new(Settings::default())).expect("default settings");
    let files: Vec<_> = (0..50)
        .map(|i| parser.parse_source(Path::new(&format!("file_{i}.js")), &generate_source(20)))
        .collect();

    c.bench_function("sort_50_files", |b| {
        b.iter(|| sort(black_box(&files), "general"));
    });
}

criterion_group!(benches, bench_parse_source, bench_extract_blocks, bench_sort);
criterion_main!(benches);
