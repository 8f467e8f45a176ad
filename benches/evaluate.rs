//! Criterion benchmarks for expression compilation and per-sample evaluation.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use sigexpr::Function;

const FILTER: &str = "in * (1 - exp_k) + prev * exp_k";
const NOISE: &str = "gain * (rand() - 0.5) + max(min(in, 1), -1)";
const NESTED: &str = "sin(2 * 3.14159 * f * t) * cos(3.14159 * f * t / 3) ^ 2 + 1.5e-3 * trunc(t * 100)";

const FILTER_INPUTS: [&str; 3] = ["in", "prev", "exp_k"];
const NOISE_INPUTS: [&str; 2] = ["gain", "in"];
const NESTED_INPUTS: [&str; 2] = ["f", "t"];

// ---------------------------------------------------------------------------
// Compile benchmarks
// ---------------------------------------------------------------------------

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    group.bench_function("filter_infix", |b| {
        b.iter(|| Function::<f64>::compile(black_box(FILTER), &FILTER_INPUTS).expect("compile"));
    });

    group.bench_function("filter_postfix", |b| {
        b.iter(|| {
            Function::<f64>::compile(black_box("rpn:in 1 exp_k - * prev exp_k * +"), &FILTER_INPUTS)
                .expect("compile")
        });
    });

    group.bench_function("nested_infix", |b| {
        b.iter(|| Function::<f64>::compile(black_box(NESTED), &NESTED_INPUTS).expect("compile"));
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Evaluate benchmarks
// ---------------------------------------------------------------------------

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    let mut filter = Function::<f64>::compile(FILTER, &FILTER_INPUTS).expect("compile");
    group.bench_function("filter_1k_samples", |b| {
        b.iter(|| {
            let mut prev = 0.0;
            for i in 0..1000 {
                let input = if i % 100 < 50 { 1.0 } else { 0.0 };
                prev = filter.evaluate(&[input, prev, 0.95]);
            }
            black_box(prev)
        });
    });

    let mut noise = Function::<f64>::compile(NOISE, &NOISE_INPUTS).expect("compile");
    group.bench_function("noise_1k_samples", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for _ in 0..1000 {
                acc += noise.evaluate(black_box(&[0.1, 0.5]));
            }
            black_box(acc)
        });
    });

    let mut nested = Function::<f32>::compile(NESTED, &NESTED_INPUTS).expect("compile");
    group.bench_function("nested_f32_1k_samples", |b| {
        b.iter(|| {
            let mut acc = 0.0f32;
            for i in 0..1000 {
                acc += nested.evaluate(&[440.0, i as f32 / 48_000.0]);
            }
            black_box(acc)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_compile, bench_evaluate);
criterion_main!(benches);
