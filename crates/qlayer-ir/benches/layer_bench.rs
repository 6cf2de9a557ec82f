//! Benchmarks for operator construction
//!
//! Run with: cargo bench -p qlayer-ir

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use qlayer_ir::{Gate, Layer, StateVector};

/// Benchmark building H^{⊗n}
fn bench_hadamard(c: &mut Criterion) {
    let mut group = c.benchmark_group("hadamard");

    for n in &[1_u32, 2, 4, 6, 8] {
        group.bench_with_input(BenchmarkId::new("n_bits", n), n, |b, &n| {
            b.iter(|| Gate::hadamard(black_box(n)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark evaluating a layer of single-qubit gates
fn bench_layer_eval(c: &mut Criterion) {
    let mut group = c.benchmark_group("layer_eval");

    for width in &[2_usize, 4, 6, 8] {
        let gates: Vec<Gate> = (0..*width)
            .map(|i| if i % 2 == 0 { Gate::not() } else { Gate::id() })
            .collect();
        let layer = Layer::new(gates).unwrap();
        group.bench_with_input(BenchmarkId::new("width", width), &layer, |b, layer| {
            b.iter(|| black_box(layer).eval());
        });
    }

    group.finish();
}

/// Benchmark applying a composite operator to a state
fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply");

    for n in &[2_u32, 4, 6, 8] {
        let matrix = Gate::hadamard(*n).unwrap().matrix().clone();
        let state = StateVector::basis(*n, 0).unwrap();
        group.bench_with_input(BenchmarkId::new("qubits", n), &state, |b, state| {
            b.iter(|| matrix.apply(black_box(state)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_hadamard, bench_layer_eval, bench_apply);
criterion_main!(benches);
