//! Lexer benchmarks.
//!
//! Run with `cargo bench --package adac-lex`.

use adac_util::Handler;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use adac_lex::Lexer;

fn lexer_token_count(source: &str) -> usize {
    let mut handler = Handler::new();
    Lexer::new(source, &mut handler).count()
}

fn bench_lexer_keywords(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");

    let source = "procedure Main is begin X := X + 1; end Main;";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("short_procedure", |b| {
        b.iter(|| lexer_token_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_complex(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_complex");

    let source = r#"
        procedure Fibonacci is
            function Fib (N : Integer) return Integer is
            begin
                if N <= 1 then
                    return N;
                end if;
                return Fib (N - 1) + Fib (N - 2);
            end Fib;

            type Point is record
                X, Y : Integer;
            end record;

            type Color is (Red, Green, Blue);

            P : Point;
        begin
            P.X := 0;
            P.Y := 0;
            for I in 1 .. 10 loop
                P.X := P.X + Fib (I);
            end loop;
        end Fibonacci;
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("complex_source", |b| {
        b.iter(|| lexer_token_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_strings");

    group.bench_function("short_string", |b| {
        b.iter(|| lexer_token_count(black_box("S : String := \"hello\";")))
    });

    group.bench_function("long_string_with_embedded_quotes", |b| {
        let source = "S : String := \"This is a longer string with \"\"embedded\"\" quotes for benchmarking purposes.\";";
        b.iter(|| lexer_token_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_numbers(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_numbers");

    group.bench_function("integer", |b| {
        b.iter(|| lexer_token_count(black_box("X : Integer := 123_456;")))
    });

    group.bench_function("real", |b| {
        b.iter(|| lexer_token_count(black_box("X : Float := 3.14159;")))
    });

    group.bench_function("based", |b| {
        b.iter(|| lexer_token_count(black_box("X : Integer := 16#DEAD_BEEF#;")))
    });

    group.finish();
}

fn bench_lexer_identifiers(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_identifiers");

    group.bench_function("short_ident", |b| {
        b.iter(|| lexer_token_count(black_box("X : Integer := 42;")))
    });

    group.bench_function("long_ident", |b| {
        b.iter(|| lexer_token_count(black_box("Very_Long_Variable_Name : Integer := 42;")))
    });

    group.bench_function("many_ident", |b| {
        b.iter(|| {
            lexer_token_count(black_box(
                "A : Integer := 1; B : Integer := 2; C : Integer := 3; D : Integer := 4;",
            ))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_lexer_keywords,
    bench_lexer_complex,
    bench_lexer_strings,
    bench_lexer_numbers,
    bench_lexer_identifiers
);
criterion_main!(benches);
