//! Statevector and end-to-end evaluation benchmarks (Criterion)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use qclique_core::{CircuitBuilder, Graph, QaoaConfig, QaoaRunner, RegisterLayout, StateVector};

fn benchmark_hadamard_layer(c: &mut Criterion) {
    let mut group = c.benchmark_group("hadamard_layer");
    group.sample_size(20);

    for n_qubits in [4, 8, 12, 16, 20] {
        group.bench_with_input(BenchmarkId::from_parameter(n_qubits), &n_qubits, |b, &n| {
            b.iter(|| {
                let mut state = StateVector::new(black_box(n), 24).unwrap();
                for q in 0..n {
                    state.apply_hadamard(q);
                }
                black_box(state)
            });
        });
    }

    group.finish();
}

fn benchmark_clique_circuit(c: &mut Criterion) {
    let mut group = c.benchmark_group("clique_circuit");
    group.sample_size(20);

    for n_nodes in [4, 8, 12, 16] {
        let graph = Graph::cycle(n_nodes).unwrap();
        let layout = RegisterLayout::new(1, n_nodes);
        let circuit = CircuitBuilder::new(layout, 1).build(&graph, 1.0, 0.5).unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(n_nodes), &circuit, |b, circuit| {
            b.iter(|| {
                let mut state = StateVector::new(circuit.n_qubits(), 24).unwrap();
                for op in circuit.ops() {
                    state.apply(op);
                }
                black_box(state)
            });
        });
    }

    group.finish();
}

fn benchmark_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate_1024_shots");

    for n_nodes in [4, 8, 12] {
        let graph = Graph::cycle(n_nodes).unwrap();
        let config = QaoaConfig::default().with_seed(42);
        let mut runner = QaoaRunner::new(graph, config).unwrap();

        group.bench_function(BenchmarkId::from_parameter(n_nodes), |b| {
            b.iter(|| black_box(runner.expectation(black_box(1.0), black_box(0.5)).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_hadamard_layer,
    benchmark_clique_circuit,
    benchmark_evaluate
);
criterion_main!(benches);
