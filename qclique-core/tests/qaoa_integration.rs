//! End-to-end properties of the clique QAOA pipeline
//!
//! - Normalization after arbitrary gate sequences
//! - Builder determinism
//! - Marginalization conservation
//! - Known-graph scores
//! - Uniform sampling at γ = β = 0

use qclique_core::{
    clique_score, instances, marginalize, CircuitBuilder, Counts, Edge, GateOp, Graph, Outcome,
    QaoaConfig, QaoaRunner, RegisterLayout, Selection, StatevectorSimulator,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const NORM_EPSILON: f64 = 1e-9;

// =============================================================================
// Normalization
// =============================================================================

#[test]
fn test_norm_preserved_across_parameters() {
    let graph = instances::demo_graph();
    let simulator = StatevectorSimulator::default();

    for depth in 1..=3 {
        let builder = CircuitBuilder::new(RegisterLayout::new(1, 4), depth);
        for &(gamma, beta) in &[(0.0, 0.0), (0.3, 2.9), (3.1, 2.5), (6.0, 0.1), (-1.0, 4.0)] {
            let circuit = builder.build(&graph, gamma, beta).unwrap();
            let state = simulator.run(&circuit).unwrap();
            let total = state.total_probability();
            assert!(
                (total - 1.0).abs() < NORM_EPSILON,
                "p={} γ={} β={}: total={}",
                depth,
                gamma,
                beta,
                total
            );
        }
    }
}

#[test]
fn test_norm_after_random_gate_sequence() {
    let mut rng = StdRng::seed_from_u64(2024);
    let n = 6;
    let mut state = qclique_core::StateVector::new(n, 24).unwrap();

    for _ in 0..200 {
        let op = match rng.gen_range(0..3) {
            0 => GateOp::Hadamard {
                qubit: rng.gen_range(0..n),
            },
            1 => GateOp::Phase {
                qubit: rng.gen_range(0..n),
                angle: rng.gen_range(-10.0..10.0),
            },
            _ => {
                let control = rng.gen_range(0..n);
                let target = (control + rng.gen_range(1..n)) % n;
                GateOp::ControlledPhase {
                    control,
                    target,
                    angle: rng.gen_range(-10.0..10.0),
                }
            }
        };
        state.apply(&op);
        assert!((state.total_probability() - 1.0).abs() < NORM_EPSILON);
    }
}

// =============================================================================
// Circuit Builder
// =============================================================================

#[test]
fn test_builder_deterministic() {
    let graph = instances::demo_graph();
    let builder = CircuitBuilder::new(RegisterLayout::new(1, 4), 2);

    let a = builder.build(&graph, 1.234, 0.567).unwrap();
    let b = builder.build(&graph, 1.234, 0.567).unwrap();
    assert_eq!(a, b);

    let c = builder.build(&graph.clone(), 1.234, 0.567).unwrap();
    assert_eq!(a, c);
}

// =============================================================================
// Marginalization
// =============================================================================

#[test]
fn test_marginalization_conserves_total() {
    let mut rng = StdRng::seed_from_u64(99);

    for n_ancilla in 0..=3 {
        let layout = RegisterLayout::new(n_ancilla, 4);
        let dim = 1usize << layout.total_qubits();

        let mut counts = Counts::new(5000);
        for _ in 0..60 {
            let outcome = Outcome::from_index(rng.gen_range(0..dim), layout);
            counts.add(outcome, rng.gen_range(1..100));
        }

        let reduced = marginalize(&counts);
        assert_eq!(reduced.total(), counts.total(), "n_ancilla={}", n_ancilla);
        assert!(reduced.len() <= 16);
        assert!(reduced.iter().all(|(s, _)| s.n_nodes() == 4));
    }
}

// =============================================================================
// Known Graph
// =============================================================================

#[test]
fn test_known_graph_complement() {
    let graph = Graph::from_edges(4, &[(0, 1), (1, 2), (2, 3), (3, 0), (3, 1)]).unwrap();
    assert_eq!(graph.penalty(), 5);
    assert_eq!(graph.complement_edges(), &[Edge::new(0, 2)]);
}

#[test]
fn test_known_graph_scores() {
    let graph = instances::demo_graph();

    let all = Selection::new(0b1111, 4);
    assert_eq!(all.to_string(), "1111");
    assert_eq!(clique_score(&all, &graph), 0);

    let pair = Selection::from_nodes(&[0, 1], 4);
    assert_eq!(pair.to_string(), "1100");
    assert_eq!(clique_score(&pair, &graph), 1);
}

#[test]
fn test_ancilla_count_does_not_change_scores() {
    let graph = instances::demo_graph();
    let narrow = QaoaConfig::default().with_seed(8).with_ancillas(1);
    let wide = QaoaConfig::default().with_seed(8).with_ancillas(3);

    let a = QaoaRunner::new(graph.clone(), narrow).unwrap();
    let b = QaoaRunner::new(graph, wide).unwrap();

    let ea = a.exact_expectation(2.2, 1.3).unwrap();
    let eb = b.exact_expectation(2.2, 1.3).unwrap();
    assert!((ea - eb).abs() < 1e-9);
}

// =============================================================================
// Uniform Mixing
// =============================================================================

#[test]
fn test_uniform_distribution_at_zero_angles() {
    let config = QaoaConfig::default().with_seed(1234).with_shots(1024);
    let mut runner = QaoaRunner::new(instances::demo_graph(), config).unwrap();
    let eval = runner.evaluate(0.0, 0.0).unwrap();

    assert_eq!(eval.counts.total(), 1024);

    // Chi-square against 64 expected hits per selection, 15 degrees of freedom.
    // 37.70 is the 0.999 quantile.
    let expected = 1024.0 / 16.0;
    let chi2: f64 = eval
        .counts
        .histogram(4)
        .iter()
        .map(|entry| {
            let d = entry.count as f64 - expected;
            d * d / expected
        })
        .sum();
    assert!(chi2 < 37.70, "chi-square {} too large", chi2);
}
