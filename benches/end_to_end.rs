//! End-to-end benchmarks for the grok engine.
//!
//! These benchmarks measure the complete pipeline from template compilation
//! through matching and capture merging, providing realistic performance
//! metrics for production use.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use grok_engine::{Compiler, GrokConfig, GrokFilter, PatternRegistry, Record};

const APACHE_TEMPLATE: &str =
    "%{IP:client} %{WORD:method} %{URIPATHPARAM:request} %{NUMBER:bytes:int} %{NUMBER:duration:float}";
const APACHE_LINE: &str = "55.3.244.1 GET /index.html 15824 0.043";
const UNPARSEABLE_LINE: &str = "plain text that matches none of the patterns";

fn build_filter() -> GrokFilter {
    let config = GrokConfig::new().with_match("message", [APACHE_TEMPLATE]);
    GrokFilter::new(config).expect("benchmark filter compiles")
}

fn bench_compilation(c: &mut Criterion) {
    let registry = PatternRegistry::with_defaults();
    let compiler = Compiler::new();

    c.bench_function("compile_apache_template", |b| {
        b.iter(|| {
            compiler
                .compile(black_box(APACHE_TEMPLATE), &registry)
                .expect("template compiles")
        })
    });

    c.bench_function("compile_combined_apache_log", |b| {
        b.iter(|| {
            compiler
                .compile(black_box("%{COMBINEDAPACHELOG}"), &registry)
                .expect("template compiles")
        })
    });
}

fn bench_single_event(c: &mut Criterion) {
    let filter = build_filter();

    c.bench_function("filter_matching_line", |b| {
        b.iter(|| {
            let mut record = Record::from_message(black_box(APACHE_LINE));
            filter.filter(&mut record);
            record
        })
    });

    c.bench_function("filter_unparseable_line", |b| {
        b.iter(|| {
            let mut record = Record::from_message(black_box(UNPARSEABLE_LINE));
            filter.filter(&mut record);
            record
        })
    });
}

fn bench_batches(c: &mut Criterion) {
    let filter = build_filter();
    let mut group = c.benchmark_group("filter_batch");

    for batch_size in [10usize, 100, 1000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(batch_size),
            &batch_size,
            |b, &size| {
                let records: Vec<Record> = (0..size)
                    .map(|i| {
                        if i % 4 == 0 {
                            Record::from_message(UNPARSEABLE_LINE)
                        } else {
                            Record::from_message(APACHE_LINE)
                        }
                    })
                    .collect();

                b.iter(|| {
                    let mut batch = records.clone();
                    filter.filter_batch(&mut batch);
                    batch
                })
            },
        );
    }
    group.finish();
}

fn bench_prefilter_effect(c: &mut Criterion) {
    let templates = [
        "ERROR %{GREEDYDATA:error_message}",
        "WARN %{GREEDYDATA:warn_message}",
        "FATAL %{GREEDYDATA:fatal_message}",
    ];

    let with_prefilter = GrokFilter::new(
        GrokConfig::new()
            .with_match("message", templates)
            .with_prefilter(true),
    )
    .expect("filter compiles");
    let without_prefilter = GrokFilter::new(
        GrokConfig::new()
            .with_match("message", templates)
            .with_prefilter(false),
    )
    .expect("filter compiles");

    let mut group = c.benchmark_group("prefilter_non_matching");
    group.bench_function("enabled", |b| {
        b.iter(|| {
            let mut record = Record::from_message(black_box(UNPARSEABLE_LINE));
            with_prefilter.filter(&mut record);
            record
        })
    });
    group.bench_function("disabled", |b| {
        b.iter(|| {
            let mut record = Record::from_message(black_box(UNPARSEABLE_LINE));
            without_prefilter.filter(&mut record);
            record
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_compilation,
    bench_single_event,
    bench_batches,
    bench_prefilter_effect
);
criterion_main!(benches);
