//! Parser benchmarks.
//!
//! Run with: `cargo bench --package adac-par`

use adac_par::Parser;
use adac_util::Handler;
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn parse_source(source: &str) {
    let mut handler = Handler::new();
    let mut parser = Parser::new(source, &mut handler);
    let _ = parser.parse_compilation_unit();
}

fn bench_parser_object_decl(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_object_decl");

    let source = r#"
        procedure Main is
            X : Integer := 42;
        begin
            null;
        end Main;
    "#;
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("object_decl", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_subprograms(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_subprograms");

    let source = r#"
        procedure Main is
            function Fib (N : Integer) return Integer is
            begin
                if N <= 1 then
                    return N;
                end if;
                return Fib(N - 1) + Fib(N - 2);
            end Fib;

            Y : Integer;
        begin
            Y := Fib(10);
        end Main;
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("subprograms", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_records(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_records");

    let source = r#"
        package Geometry is
            type Point is record
                X : Integer;
                Y : Integer;
            end record;

            type Rectangle is record
                Origin : Point;
                Width  : Integer;
                Height : Integer;
            end record;

            function Distance (A, B : Point) return Integer;
            function Area (R : Rectangle) return Integer;
        end Geometry;
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("records", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_enums_and_arrays(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_enums_and_arrays");

    let source = r#"
        package Colors is
            type Color is (Red, Green, Blue, Custom);

            type Palette is array (1 .. 8) of Color;

            type Row_Count is range 0 .. 100;
            type Matrix is array (Row_Count range <>) of Integer;
        end Colors;
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("enums_and_arrays", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_control_flow(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_control_flow");

    let source = r#"
        procedure Process (N : Integer; Result : out Integer) is
            Sum : Integer := 0;
            I   : Integer := 0;
        begin
            if N < 0 then
                Result := -1;
            elsif N = 0 then
                Result := 0;
            else
                case N is
                    when 1 =>
                        Result := 1;
                    when 2 =>
                        Result := 2;
                    when others =>
                        while I < N loop
                            Sum := Sum + I;
                            I := I + 1;
                        end loop;
                        Result := Sum;
                end case;
            end if;
        end Process;
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("control_flow", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_parser_complex(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_complex");

    let source = r#"
        with Ada.Text_IO;
        use Ada.Text_IO;

        package body Shapes is
            type Point is record
                X, Y : Integer;
            end record;

            type Rectangle is record
                Origin        : Point;
                Width, Height : Integer;
            end record;

            function Make_Point (X, Y : Integer) return Point is
            begin
                return (X => X, Y => Y);
            end Make_Point;

            function Make_Rectangle (X, Y, W, H : Integer) return Rectangle is
            begin
                return (Origin => Make_Point(X, Y), Width => W, Height => H);
            end Make_Rectangle;

            function Area (R : Rectangle) return Integer is
            begin
                return R.Width * R.Height;
            end Area;

            procedure Draw (P : Point) is
            begin
                Put_Line("Point at" & Integer'Image(P.X) & Integer'Image(P.Y));
            end Draw;

            procedure Run is
                P : Point := Make_Point(10, 20);
                R : Rectangle := Make_Rectangle(0, 0, 5, 5);
            begin
                Draw(P);
                if Area(R) > 0 and then R.Width in 1 .. 100 then
                    Put_Line("area ok");
                end if;
            end Run;
        end Shapes;
    "#;

    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("complex_source", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

criterion_group!(
    benches,
    bench_parser_object_decl,
    bench_parser_subprograms,
    bench_parser_records,
    bench_parser_enums_and_arrays,
    bench_parser_control_flow,
    bench_parser_complex
);
criterion_main!(benches);
