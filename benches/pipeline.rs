//! Pipeline benchmarks

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use minipas::render::{RenderOptions, render_program};

/// A program with `procedures` sibling procedures and a long main body
fn synthetic(procedures: usize, statements: usize) -> String {
    let mut src = String::from("program Bench;\nvar a, b, c : integer;\n    r : real;\n");
    for i in 0..procedures {
        src.push_str(&format!(
            "procedure P{i}(x : integer; y : real);\nvar t : integer;\nbegin\n  t := x * 2 + a;\n  y := t / 3\nend;\n"
        ));
    }
    src.push_str("begin\n  a := 1;\n  b := 2;\n  c := 3");
    for i in 0..statements {
        src.push_str(&format!(";\n  a := (a + b * {i}) div (c + 1) - -b;\n  r := a / 7 + 0.5"));
    }
    src.push_str("\nend.\n");
    src
}

fn bench_pipeline(c: &mut Criterion) {
    let source = synthetic(50, 500);

    c.bench_function("lex", |b| {
        b.iter(|| minipas::lexer::lex(black_box(&source)))
    });
    c.bench_function("parse", |b| b.iter(|| minipas::parse(black_box(&source))));
    c.bench_function("check", |b| b.iter(|| minipas::check(black_box(&source))));
    c.bench_function("run", |b| b.iter(|| minipas::run(black_box(&source))));

    if let Ok(program) = minipas::parse(&source) {
        let options = RenderOptions::default();
        c.bench_function("render", |b| {
            b.iter(|| render_program(black_box(&program), &options))
        });
    }
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
