//! Measurement outcomes and shot sampling
//!
//! An [`Outcome`] is one shot over the whole register. Its ancilla and input
//! segments are read through named accessors instead of string slicing, and
//! [`Outcome::input`] yields the [`Selection`] of graph nodes the shot
//! picked. Both print one character per qubit in register order: ancillas
//! first, then input qubits by ascending node index.

use std::collections::hash_map;
use std::fmt;
use std::hash::Hash;

use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::graph::Graph;
use crate::state::{RegisterLayout, StateVector};

/// Default number of measurement shots
pub const DEFAULT_SHOTS: usize = 1024;

// =============================================================================
// Outcome / Selection
// =============================================================================

/// Measured basis state of the full register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Outcome {
    index: usize,
    layout: RegisterLayout,
}

impl Outcome {
    /// Outcome for basis index `index` (bit q = qubit q)
    pub fn from_index(index: usize, layout: RegisterLayout) -> Self {
        Self { index, layout }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn layout(&self) -> RegisterLayout {
        self.layout
    }

    /// Value of qubit `qubit`
    pub fn qubit(&self, qubit: usize) -> bool {
        (self.index >> qubit) & 1 == 1
    }

    /// Ancilla segment, ancilla 0 in bit 0
    pub fn ancilla_bits(&self) -> usize {
        self.index & ((1usize << self.layout.n_ancilla) - 1)
    }

    /// Input segment, node 0 in bit 0
    pub fn input(&self) -> Selection {
        Selection::new(self.index >> self.layout.n_ancilla, self.layout.n_input)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for q in 0..self.layout.total_qubits() {
            f.write_str(if self.qubit(q) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Subset of graph nodes encoded by the input qubits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Selection {
    bits: usize,
    n_nodes: usize,
}

impl Selection {
    /// Selection with node i included iff bit i of `bits` is set
    pub fn new(bits: usize, n_nodes: usize) -> Self {
        let mask = if n_nodes >= usize::BITS as usize {
            usize::MAX
        } else {
            (1usize << n_nodes) - 1
        };
        Self {
            bits: bits & mask,
            n_nodes,
        }
    }

    /// Selection containing exactly `nodes`
    pub fn from_nodes(nodes: &[usize], n_nodes: usize) -> Self {
        let bits = nodes
            .iter()
            .filter(|&&n| n < n_nodes)
            .fold(0usize, |acc, &n| acc | (1 << n));
        Self::new(bits, n_nodes)
    }

    pub fn bits(&self) -> usize {
        self.bits
    }

    pub fn n_nodes(&self) -> usize {
        self.n_nodes
    }

    pub fn contains(&self, node: usize) -> bool {
        node < self.n_nodes && (self.bits >> node) & 1 == 1
    }

    /// Selected nodes in ascending order
    pub fn nodes(&self) -> Vec<usize> {
        (0..self.n_nodes).filter(|&n| self.contains(n)).collect()
    }

    /// Number of selected nodes
    pub fn size(&self) -> usize {
        self.bits.count_ones() as usize
    }

    /// True if the selected nodes are pairwise adjacent in `graph`
    pub fn is_clique(&self, graph: &Graph) -> bool {
        graph.is_clique(&self.nodes())
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for n in 0..self.n_nodes {
            f.write_str(if self.contains(n) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

// =============================================================================
// Counts
// =============================================================================

/// Shot histogram keyed by outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counts<K: Eq + Hash> {
    counts: FxHashMap<K, usize>,
    /// Number of shots requested when sampling
    shots: usize,
}

impl<K: Eq + Hash> Counts<K> {
    /// Empty histogram for a run of `shots` shots
    pub fn new(shots: usize) -> Self {
        Self {
            counts: FxHashMap::default(),
            shots,
        }
    }

    /// Record one occurrence
    pub fn record(&mut self, key: K) {
        self.add(key, 1);
    }

    /// Record `count` occurrences
    pub fn add(&mut self, key: K, count: usize) {
        if count > 0 {
            *self.counts.entry(key).or_insert(0) += count;
        }
    }

    pub fn get(&self, key: &K) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Requested shot count
    pub fn shots(&self) -> usize {
        self.shots
    }

    /// Sum of all recorded counts
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Number of distinct outcomes observed
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, K, usize> {
        self.counts.iter()
    }

    /// Observed frequency of `key` relative to the requested shots
    pub fn frequency(&self, key: &K) -> f64 {
        if self.shots == 0 {
            0.0
        } else {
            self.get(key) as f64 / self.shots as f64
        }
    }
}

impl<K: Eq + Hash + Ord + Copy> Counts<K> {
    /// Entries ordered by key
    pub fn sorted(&self) -> Vec<(K, usize)> {
        let mut entries: Vec<(K, usize)> = self.counts.iter().map(|(&k, &c)| (k, c)).collect();
        entries.sort_by_key(|&(k, _)| k);
        entries
    }

    /// The `k` most frequent outcomes, ties broken by key
    pub fn most_frequent(&self, k: usize) -> Vec<(K, usize)> {
        let mut entries = self.sorted();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries.truncate(k);
        entries
    }
}

impl Ord for Outcome {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.index
            .cmp(&other.index)
            .then(self.layout.n_ancilla.cmp(&other.layout.n_ancilla))
            .then(self.layout.n_input.cmp(&other.layout.n_input))
    }
}

impl PartialOrd for Outcome {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// One histogram bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistogramEntry {
    /// Selection printed in node order
    pub bitstring: String,
    pub count: usize,
}

impl Counts<Selection> {
    /// Dense histogram over all 2^n selections in index order, zeros included
    pub fn histogram(&self, n_nodes: usize) -> Vec<HistogramEntry> {
        (0..1usize << n_nodes)
            .map(|bits| {
                let selection = Selection::new(bits, n_nodes);
                HistogramEntry {
                    bitstring: selection.to_string(),
                    count: self.get(&selection),
                }
            })
            .collect()
    }
}

// =============================================================================
// Sampling
// =============================================================================

/// Draw `shots` independent samples from |amplitude|².
///
/// The returned counts always sum to exactly `shots`.
pub fn sample_measurement<R: Rng>(
    state: &StateVector,
    layout: RegisterLayout,
    shots: usize,
    rng: &mut R,
) -> Counts<Outcome> {
    debug_assert_eq!(state.num_qubits, layout.total_qubits());

    let mut cdf = Vec::with_capacity(state.dimension());
    let mut cumulative = 0.0;
    for amp in state.amplitudes.iter() {
        cumulative += amp.norm_sqr();
        cdf.push(cumulative);
    }
    let total = cumulative;
    let last = state.dimension() - 1;

    let mut counts = Counts::new(shots);
    for _ in 0..shots {
        let r = rng.gen::<f64>() * total;
        let index = cdf.partition_point(|&c| c <= r).min(last);
        counts.record(Outcome::from_index(index, layout));
    }
    counts
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::instances;
    use crate::state::DEFAULT_MAX_QUBITS;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_outcome_segments() {
        let layout = RegisterLayout::new(1, 4);
        // ancilla = 1, nodes 0 and 1 selected
        let outcome = Outcome::from_index(0b00111, layout);

        assert_eq!(outcome.ancilla_bits(), 1);
        assert_eq!(outcome.input(), Selection::from_nodes(&[0, 1], 4));
        assert_eq!(outcome.to_string(), "11100");
        assert_eq!(outcome.input().to_string(), "1100");
    }

    #[test]
    fn test_selection_accessors() {
        let s = Selection::from_nodes(&[1, 3], 4);
        assert!(s.contains(1));
        assert!(!s.contains(0));
        assert!(!s.contains(9));
        assert_eq!(s.nodes(), vec![1, 3]);
        assert_eq!(s.size(), 2);
        assert_eq!(s.to_string(), "0101");
    }

    #[test]
    fn test_selection_is_clique() {
        let graph = instances::demo_graph();
        assert!(Selection::from_nodes(&[0, 1, 3], 4).is_clique(&graph));
        assert!(!Selection::from_nodes(&[0, 2], 4).is_clique(&graph));
    }

    #[test]
    fn test_counts_basic() {
        let mut counts: Counts<Selection> = Counts::new(10);
        let a = Selection::new(0b01, 2);
        let b = Selection::new(0b10, 2);
        counts.add(a, 7);
        counts.record(b);
        counts.add(b, 0);

        assert_eq!(counts.get(&a), 7);
        assert_eq!(counts.total(), 8);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts.shots(), 10);
        assert!((counts.frequency(&a) - 0.7).abs() < 1e-12);
        assert_eq!(counts.most_frequent(1), vec![(a, 7)]);
    }

    #[test]
    fn test_histogram_is_dense() {
        let mut counts: Counts<Selection> = Counts::new(4);
        counts.add(Selection::new(0b11, 2), 4);

        let hist = counts.histogram(2);
        assert_eq!(hist.len(), 4);
        assert_eq!(hist[0].bitstring, "00");
        assert_eq!(hist[0].count, 0);
        assert_eq!(hist[3].bitstring, "11");
        assert_eq!(hist[3].count, 4);
    }

    #[test]
    fn test_sampling_sums_to_shots() {
        let layout = RegisterLayout::new(1, 3);
        let mut state = StateVector::new(4, DEFAULT_MAX_QUBITS).unwrap();
        for q in layout.input_qubits() {
            state.apply_hadamard(q);
        }

        let mut rng = StdRng::seed_from_u64(7);
        let counts = sample_measurement(&state, layout, 1000, &mut rng);
        assert_eq!(counts.total(), 1000);
        assert!(counts.iter().all(|(o, _)| o.ancilla_bits() == 0));
    }

    #[test]
    fn test_sampling_deterministic_state() {
        let layout = RegisterLayout::new(1, 2);
        let mut state = StateVector::new(3, DEFAULT_MAX_QUBITS).unwrap();
        state.amplitudes[0] = num_complex::Complex64::new(0.0, 0.0);
        state.amplitudes[0b110] = num_complex::Complex64::new(1.0, 0.0);

        let mut rng = StdRng::seed_from_u64(1);
        let counts = sample_measurement(&state, layout, 50, &mut rng);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts.get(&Outcome::from_index(0b110, layout)), 50);
    }

    #[test]
    fn test_sampling_seed_reproducible() {
        let layout = RegisterLayout::new(1, 2);
        let mut state = StateVector::new(3, DEFAULT_MAX_QUBITS).unwrap();
        state.apply_hadamard(1);
        state.apply_hadamard(2);

        let a = sample_measurement(&state, layout, 200, &mut StdRng::seed_from_u64(3));
        let b = sample_measurement(&state, layout, 200, &mut StdRng::seed_from_u64(3));
        assert_eq!(a, b);
    }
}
