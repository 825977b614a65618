//! Benchmarks for the rights engine
//!
//! Measures performance of:
//! - Rule compilation
//! - Pattern matching
//! - First-match resolution over growing tables
//! - Full enforcement with handler dispatch

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use cretoai_rights::{Context, MatchMode, Pattern, RightsTable};
use std::collections::HashMap;

fn rules(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("resource_{}.action_*.scope_{}", i, i))
        .collect()
}

fn bench_compilation(c: &mut Criterion) {
    let mut group = c.benchmark_group("compilation");
    let data = HashMap::new();

    for count in [1, 10, 50] {
        let rules = rules(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &rules, |b, rules| {
            b.iter(|| RightsTable::compile(black_box(rules), &data, MatchMode::Anchored).unwrap());
        });
    }

    group.finish();
}

fn bench_pattern_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("pattern_matching");

    let cases = [
        ("literal", "users"),
        ("prefix", "user*"),
        ("inner", "u*e*s"),
    ];

    for (name, raw) in cases {
        for mode in [MatchMode::Anchored, MatchMode::Substring] {
            let pattern = Pattern::compile(raw, mode);
            group.bench_function(format!("{}_{}", name, mode), |b| {
                b.iter(|| pattern.matches(black_box("superusers")));
            });
        }
    }

    group.finish();
}

fn bench_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolution");

    for count in [1, 10, 50] {
        let table = RightsTable::compile(rules(count), &HashMap::new(), MatchMode::Anchored).unwrap();
        let last = format!("resource_{}", count - 1);

        group.bench_with_input(BenchmarkId::new("last_rule", count), &last, |b, resource| {
            b.iter(|| table.resolve(black_box("action_read"), black_box(resource)));
        });
        group.bench_with_input(BenchmarkId::new("no_match", count), &count, |b, _| {
            b.iter(|| table.resolve(black_box("action_read"), black_box("missing")));
        });
    }

    group.finish();
}

fn bench_enforcement(c: &mut Criterion) {
    let ctx = Context::builder()
        .rights(["users.read.me", "posts.*.all", "*.list.any"])
        .build()
        .unwrap();

    c.bench_function("enforce_me", |b| {
        b.iter(|| {
            ctx.can_enforce(black_box("read"), black_box("users"), |h| {
                h.all(|| Ok(0)).me(|| Ok(1)).any(|_| Ok(2)).otherwise(|| Ok(3));
            })
            .unwrap()
        });
    });
}

criterion_group!(
    benches,
    bench_compilation,
    bench_pattern_matching,
    bench_resolution,
    bench_enforcement
);
criterion_main!(benches);
