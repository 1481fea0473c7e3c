//! Lexer benchmarks.
//!
//! Run with `cargo bench --package lox-lex`.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use lox_lex::scan_tokens;
use lox_util::Handler;

fn token_count(source: &str) -> usize {
    let handler = Handler::new();
    scan_tokens(source, &handler).len()
}

fn bench_lexer_simple(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");

    let source = "var x = 42; fun main() { var y = x + 1; return y; }";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("simple_var", |b| {
        b.iter(|| token_count(black_box("var x = 42;")))
    });

    group.bench_function("function_with_body", |b| {
        b.iter(|| token_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_complex(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_complex");

    let source = r#"
        fun fib(n) {
            if (n <= 1) { return n; }
            return fib(n - 1) + fib(n - 2);
        }

        class Point {
            init(x, y) {
                this.x = x;
                this.y = y;
            }
            length() {
                return this.x * this.x + this.y * this.y;
            }
        }

        var p = Point(3, 4);
        print "length: ";
        print p.length();
    "#;
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("classes_and_functions", |b| {
        b.iter(|| token_count(black_box(source)))
    });

    group.finish();
}

criterion_group!(benches, bench_lexer_simple, bench_lexer_complex);
criterion_main!(benches);
