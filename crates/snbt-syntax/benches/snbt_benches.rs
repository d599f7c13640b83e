//! SNBT parse and format benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use snbt_syntax::{format_snbt, parse_snbt, FormatOptions};

const INPUTS: &[(&str, &str)] = &[
    ("int", "42"),
    ("double", "-1.5e+2"),
    ("hex_unsigned", "0xFFub"),
    ("string", r#""hello \"world\" é""#),
    ("unquoted", "minecraft.stone"),
    ("int_array", "[I; 1, 2, 3, 4, 5, 6, 7, 8]"),
    ("list", "[1.0f, 2.0f, 3.0f, 4.0f]"),
    (
        "entity",
        r#"{id: "minecraft:zombie", Health: 20.0f, Pos: [1.5d, 64.0d, -3.25d], CustomNameVisible: true, Tags: [hostile, undead], HandItems: [{id: "minecraft:iron_sword", Count: 1b}, {}]}"#,
    ),
];

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("snbt/parse");
    for (name, input) in INPUTS {
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), input, |b, input| {
            b.iter(|| parse_snbt(black_box(input)));
        });
    }
    group.finish();
}

fn bench_format(c: &mut Criterion) {
    let mut group = c.benchmark_group("snbt/format");
    for indent in [0, 2, 4] {
        let options = FormatOptions::with_indent(indent);
        group.bench_with_input(BenchmarkId::from_parameter(indent), &options, |b, options| {
            b.iter(|| format_snbt(black_box(INPUTS[7].1), options));
        });
    }
    group.finish();
}

/// Lists of growing length
fn bench_large_lists(c: &mut Criterion) {
    let mut group = c.benchmark_group("snbt/large_lists");
    for size in [10usize, 100, 1000] {
        let input = format!(
            "[{}]",
            (0..size).map(|i| format!("{{slot: {}b, count: {i}}}", i % 100)).collect::<Vec<_>>().join(", ")
        );
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| parse_snbt(black_box(input)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_format, bench_large_lists);
criterion_main!(benches);
