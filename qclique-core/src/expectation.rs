//! Clique scoring of measurement results
//!
//! Each input selection S is scored as
//!
//! score(S) = |{(i,j) ∈ E : i,j ∈ S}| − penalty · |{(i,j) ∈ Ē : i,j ∈ S}|
//!
//! so a true clique scores its edge count and any selected non-edge
//! drags the score down by the penalty. The expectation weights each
//! observed selection by count / requested shots.

use crate::graph::Graph;
use crate::measurement::{Counts, Outcome, Selection};
use crate::state::{RegisterLayout, StateVector};

/// Drop the ancilla segment and merge outcomes with equal input bits.
///
/// The total count is unchanged.
pub fn marginalize(counts: &Counts<Outcome>) -> Counts<Selection> {
    let mut reduced = Counts::new(counts.shots());
    for (outcome, &count) in counts.iter() {
        reduced.add(outcome.input(), count);
    }
    reduced
}

/// Clique score of a selection
pub fn clique_score(selection: &Selection, graph: &Graph) -> i64 {
    let both = |u: usize, v: usize| selection.contains(u) && selection.contains(v);

    let rewarded = graph.edges().iter().filter(|e| both(e.u, e.v)).count() as i64;
    let penalized = graph
        .complement_edges()
        .iter()
        .filter(|e| both(e.u, e.v))
        .count() as i64;

    rewarded - graph.penalty() * penalized
}

/// Σ (count / shots) · score over observed selections.
///
/// Divides by the requested shot count, not the observed total.
pub fn expectation_value(counts: &Counts<Selection>, graph: &Graph) -> f64 {
    if counts.shots() == 0 {
        return 0.0;
    }

    let shots = counts.shots() as f64;
    counts
        .iter()
        .map(|(selection, &count)| count as f64 / shots * clique_score(selection, graph) as f64)
        .sum()
}

/// Exact expectation from the statevector probabilities, no sampling
pub fn exact_expectation(state: &StateVector, layout: RegisterLayout, graph: &Graph) -> f64 {
    state
        .amplitudes
        .indexed_iter()
        .map(|(index, amp)| {
            let p = amp.norm_sqr();
            if p == 0.0 {
                0.0
            } else {
                let selection = Outcome::from_index(index, layout).input();
                p * clique_score(&selection, graph) as f64
            }
        })
        .sum()
}

/// Largest score reachable on `graph`, by enumerating every selection.
///
/// Exponential in the node count; meant as a reference on small graphs.
pub fn best_score(graph: &Graph) -> (Selection, i64) {
    let n = graph.n_nodes();
    (0..1usize << n)
        .map(|bits| {
            let s = Selection::new(bits, n);
            (s, clique_score(&s, graph))
        })
        .fold((Selection::new(0, n), 0), |best, cand| {
            if cand.1 > best.1 {
                cand
            } else {
                best
            }
        })
}
