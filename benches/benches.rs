#[macro_use]
extern crate slog;

use criterion::BatchSize;
use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::{criterion_group, criterion_main};
use kvmap::{Importer, Lookup, MalformedPolicy, MemoryStore, Namespace};
use rand::distributions::Alphanumeric;
use rand::Rng;
use slog::{Discard, Logger};
use std::io::{sink, Cursor};

fn import(c: &mut Criterion) {
    let mut group = c.benchmark_group("import");

    for lines in &[100, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(lines), lines, |b, &lines| {
            let importer = Importer::new(
                Logger::root(Discard, o!()),
                Namespace::default(),
                MalformedPolicy::Skip,
            );
            let text = gen_mapping(lines);
            b.iter_batched(
                MemoryStore::new,
                |mut store| {
                    importer
                        .import(&text, &mut store, &mut sink())
                        .expect("import failed")
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for lines in &[100, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(lines), lines, |b, &lines| {
            let log = Logger::root(Discard, o!());
            let text = gen_mapping(lines);
            let mut store = MemoryStore::new();
            Importer::new(log.clone(), Namespace::default(), MalformedPolicy::Skip)
                .import(&text, &mut store, &mut sink())
                .expect("import failed");

            // Every other key misses.
            let input: String = text
                .lines()
                .enumerate()
                .map(|(i, line)| {
                    let source = line.split_whitespace().next().unwrap_or_default();
                    if i % 2 == 0 {
                        format!("{}\n", source)
                    } else {
                        format!("{}-missing\n", source)
                    }
                })
                .collect();

            let lookup = Lookup::new(log, Namespace::default(), "NULL");
            b.iter(|| {
                lookup
                    .run(&mut Cursor::new(input.as_bytes()), &mut sink(), &mut store)
                    .expect("lookup failed")
            })
        });
    }

    group.finish();
}

fn gen_mapping(lines: usize) -> String {
    (0..lines)
        .map(|_| format!("/{} /{}\n", gen_random_string(), gen_random_string()))
        .collect()
}

fn gen_random_string() -> String {
    let mut rng = rand::thread_rng();
    let len = rng.gen_range(1, 64);
    rng.sample_iter(&Alphanumeric).take(len).collect()
}

criterion_group!(benches, import, lookup);
criterion_main!(benches);
