use std::hint::black_box;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use esparto_core::parser::scanner::Scanner;
use esparto_core::{ParseOptions, parse_expression, parse_program, parse_program_with};

const LIBRARY: &str = r#"
var util = (function () {
    "use strict";
    var cache = {}, hits = 0;

    function memo(key, compute) {
        if (Object.prototype.hasOwnProperty.call(cache, key)) {
            hits++;
            return cache[key];
        }
        return (cache[key] = compute(key));
    }

    function range(n) {
        var out = [];
        for (var i = 0; i < n; i++) out.push(i * 2 + 1);
        return out;
    }

    var api = {
        get hits() { return hits; },
        memo: memo,
        range: range,
        words: function (s) { return s.split(/\s+/g).filter(w => w.length > 0); },
        sum: (xs, start = 0) => xs.reduce((a, b) => a + b, start)
    };

    outer: for (var k in api) {
        switch (typeof api[k]) {
            case "function": continue outer;
            default: break outer;
        }
    }
    try { api.memo("x", function (k) { return k + k; }); } catch (e) { throw e; } finally {}
    return api;
}());
"#;

/// `LIBRARY` repeated until it is roughly `bytes` long.
fn corpus(bytes: usize) -> String {
    LIBRARY.repeat(bytes / LIBRARY.len() + 1)
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

fn bench_tokenize(c: &mut Criterion) {
    let source = corpus(64 * 1024);
    let mut group = c.benchmark_group("scanner");
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("tokenize_64k", |b| {
        b.iter(|| Scanner::tokenize_all(black_box(&source)));
    });
    group.finish();
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

fn bench_parse_program(c: &mut Criterion) {
    let source = corpus(64 * 1024);
    let located = ParseOptions::located().with_source();
    let mut group = c.benchmark_group("parser");
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("parse_64k", |b| {
        b.iter(|| parse_program(black_box(&source)));
    });
    group.bench_function("parse_64k_located", |b| {
        b.iter(|| parse_program_with(black_box(&source), &located));
    });
    group.finish();
}

fn bench_parse_expressions(c: &mut Criterion) {
    c.bench_function("parse_arithmetic_expression", |b| {
        b.iter(|| parse_expression(black_box("a * (b + c) - d / e % f << 2 >>> g")));
    });
    c.bench_function("parse_arrow_with_defaults", |b| {
        b.iter(|| parse_expression(black_box("(a, b = [1, 2], {c, d: e}, ...rest) => a + b")));
    });
}

// ---------------------------------------------------------------------------
// Group & main
// ---------------------------------------------------------------------------

criterion_group!(
    benches,
    bench_tokenize,
    bench_parse_program,
    bench_parse_expressions,
);
criterion_main!(benches);
