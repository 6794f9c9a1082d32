// QuiZX - Rust library for quantum circuit rewriting and optimisation
//         using the ZX-calculus
// Copyright (C) 2021 - Aleks Kissinger
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//    http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Circuit extraction from graph-like diagrams.
//!
//! The [Extractor] walks backwards from the outputs, pulling gates off the
//! frontier into a circuit until only a permutation of wires is left. When
//! no frontier spider can be extracted directly, it looks for CNOTs that
//! free one up: first by a bounded search over sets of frontier rows, then,
//! if configured, by Gaussian elimination of the whole frontier.

use crate::basic_rules::{boundary_pivot, remove_id};
use crate::budget::Budget;
use crate::circuit::*;
use crate::gate::*;
use crate::graph::*;
use crate::linalg::*;
use crate::phase::Phase;
use itertools::Itertools;
use log::{debug, trace, warn};
use num::Zero;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Extraction couldn't finish.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    /// The subset search hit its cap (or the budget ran out) on a stuck
    /// frontier, and no fallback was configured.
    #[error("no extractable vertex within {cap} row combinations of frontier {frontier:?}")]
    Intractable { cap: usize, frontier: Vec<V> },
    #[error("no extractable vertex in frontier {0:?}")]
    NotExtractable(Vec<V>),
    #[error("malformed diagram: {0}")]
    Malformed(String),
}

/// What to do when the subset search gives up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fallback {
    #[default]
    Fail,
    /// Gaussian elimination of the whole frontier
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Maximum number of row subsets examined per stuck frontier
    pub search_cap: usize,
    pub fallback: Fallback,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        ExtractConfig {
            search_cap: 4096,
            fallback: Fallback::Fail,
        }
    }
}

impl ExtractConfig {
    /// Number of subsets of at least two rows of an `n`-row frontier
    ///
    /// With this cap the search is exhaustive, so it never gives up.
    pub fn max_search_cap(n: usize) -> usize {
        if n >= usize::BITS as usize {
            return usize::MAX;
        }
        (1usize << n).saturating_sub(n + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractState {
    Initializing,
    Extracting,
    Stuck,
    Done,
}

/// An extracted circuit, which implements the diagram once input `permutation[q]`
/// is routed to output `q`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub circuit: Circuit,
    pub permutation: Vec<usize>,
}

impl Extraction {
    pub fn is_identity_permutation(&self) -> bool {
        self.permutation.iter().enumerate().all(|(q, &p)| q == p)
    }

    /// The extracted circuit, preceded by SWAP gates routing each input to
    /// the right output
    pub fn to_circuit_with_swaps(&self) -> Circuit {
        let mut cur: Vec<usize> = (0..self.permutation.len()).collect();
        let mut swaps = Vec::new();
        for (q, &p) in self.permutation.iter().enumerate() {
            if let Some(j) = cur.iter().position(|&x| x == p) {
                if j != q {
                    cur.swap(q, j);
                    swaps.push(Gate::new(SWAP, vec![q, j]));
                }
            }
        }

        let mut c = self.circuit.clone();
        for g in swaps.into_iter().rev() {
            c.push_front(g);
        }
        c
    }
}

pub trait ToCircuit: GraphLike {
    /// Extract a copy of the diagram with the default configuration, routing
    /// the final permutation with SWAP gates
    fn to_circuit(&self) -> Result<Circuit, ExtractError> {
        let mut g = self.clone();
        let e = Extractor::new(&mut g).extract()?;
        Ok(e.to_circuit_with_swaps())
    }
}

impl<G: GraphLike> ToCircuit for G {}

pub struct Extractor<'a, G: GraphLike> {
    g: &'a mut G,
    config: ExtractConfig,
    budget: Budget,
    state: ExtractState,
    circuit: Circuit,
    frontier: Vec<(usize, V)>,
    gadgets: FxHashSet<V>,
    permutation: Vec<usize>,
}

impl<'a, G: GraphLike> Extractor<'a, G> {
    pub fn new(g: &'a mut G) -> Self {
        Extractor {
            g,
            config: ExtractConfig::default(),
            budget: Budget::unlimited(),
            state: ExtractState::Initializing,
            circuit: Circuit::new(0),
            frontier: Vec::new(),
            gadgets: FxHashSet::default(),
            permutation: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: ExtractConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }

    pub fn state(&self) -> ExtractState {
        self.state
    }

    /// The gates extracted so far
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn frontier(&self) -> Vec<V> {
        self.frontier.iter().map(|&(_, v)| v).collect()
    }

    /// Advance the state machine by one step
    ///
    /// Stepping a finished extraction does nothing.
    pub fn step(&mut self) -> Result<ExtractState, ExtractError> {
        self.state = match self.state {
            ExtractState::Initializing => {
                self.initialize()?;
                ExtractState::Extracting
            }
            ExtractState::Extracting => {
                self.prepare_frontier()?;
                if self.frontier.is_empty() {
                    self.read_permutation()?;
                    ExtractState::Done
                } else if self.fix_gadgets()? || self.extract_from_frontier() {
                    ExtractState::Extracting
                } else {
                    ExtractState::Stuck
                }
            }
            ExtractState::Stuck => {
                self.unstick()?;
                if self.extract_from_frontier() {
                    ExtractState::Extracting
                } else {
                    return Err(ExtractError::NotExtractable(self.frontier()));
                }
            }
            ExtractState::Done => ExtractState::Done,
        };
        trace!("extractor: {:?}, {} gates", self.state, self.circuit.num_gates());
        Ok(self.state)
    }

    /// Run to completion
    pub fn extract(mut self) -> Result<Extraction, ExtractError> {
        while self.step()? != ExtractState::Done {}
        debug!(
            "extracted {} gates on {} qubits",
            self.circuit.num_gates(),
            self.circuit.num_qubits()
        );
        Ok(Extraction {
            circuit: self.circuit,
            permutation: self.permutation,
        })
    }

    fn initialize(&mut self) -> Result<(), ExtractError> {
        let (ni, no) = (self.g.inputs().len(), self.g.outputs().len());
        if ni != no {
            return Err(ExtractError::Malformed(format!(
                "{ni} inputs but {no} outputs"
            )));
        }
        for &o in self.g.outputs() {
            if self.g.degree(o) != 1 {
                return Err(ExtractError::Malformed(format!(
                    "output {o} has degree {}",
                    self.g.degree(o)
                )));
            }
        }

        // Extraction only ever removes phase gadgets, never creates new ones.
        self.gadgets.clear();
        for v in self.g.vertices() {
            if self.g.degree(v) == 1 && self.g.vertex_type(v) == VType::Z {
                if let Some(n) = self.g.neighbors(v).next() {
                    if self.g.vertex_type(n) == VType::Z {
                        self.gadgets.insert(n);
                    }
                }
            }
        }

        self.circuit = Circuit::new(no);
        Ok(())
    }

    /// Identify the frontier and pull Hadamards, phases and CZs from it into
    /// the circuit
    fn prepare_frontier(&mut self) -> Result<(), ExtractError> {
        self.frontier = Vec::new();

        for q in 0..self.g.outputs().len() {
            let o = self.g.outputs()[q];
            let Some((v, et)) = self.g.incident_edges(o).next() else {
                return Err(ExtractError::Malformed(format!("output {o} is disconnected")));
            };

            if et == EType::H {
                self.circuit.push_front(Gate::new(HAD, vec![q]));
                self.g.set_edge_type(v, o, EType::N);
            }

            // wire already extracted
            if self.g.vertex_type(v) == VType::B {
                continue;
            }

            self.frontier.push((q, v));

            let p = self.g.phase(v);
            if !p.is_zero() {
                self.circuit
                    .push_front(Gate::new_with_phase(ZPhase, vec![q], p));
                self.g.set_phase(v, Phase::zero());
            }

            for n in self.g.neighbor_vec(v) {
                if n == o {
                    continue;
                } else if self.g.vertex_type(n) == VType::B {
                    if !self.g.inputs().contains(&n) {
                        return Err(ExtractError::Malformed(format!(
                            "two outputs connected to vertex {v}"
                        )));
                    }

                    // pad the input with an identity so v can later be
                    // extracted as a spider with a single neighbour
                    if self.g.degree(v) > 2 {
                        let vd = VData {
                            ty: VType::Z,
                            phase: Phase::zero(),
                            qubit: self.g.qubit(n),
                            row: self.g.row(n) + 1.0,
                        };
                        let n1 = self.g.add_vertex_with_data(vd);
                        self.g
                            .add_edge_with_type(n, n1, self.g.edge_type(n, v).opposite());
                        self.g.add_edge_with_type(n1, v, EType::H);
                        self.g.remove_edge(n, v);
                    }
                } else if let Some(&(r, _)) = self.frontier.iter().find(|&&(_, w)| w == n) {
                    self.g.remove_edge(v, n);
                    self.circuit.push_front(Gate::new(CZ, vec![q, r]));
                } else if self.g.vertex_type(n) != VType::Z {
                    return Err(ExtractError::Malformed(format!(
                        "frontier vertex {v} has a {:?} neighbour {n}",
                        self.g.vertex_type(n)
                    )));
                }
            }
        }

        Ok(())
    }

    /// Pivot away a phase gadget adjacent to the frontier, if there is one
    fn fix_gadgets(&mut self) -> Result<bool, ExtractError> {
        for &(_, v) in &self.frontier {
            for n in self.g.neighbor_vec(v) {
                if self.gadgets.contains(&n) {
                    boundary_pivot(&mut *self.g, v, n).map_err(|e| {
                        ExtractError::Malformed(format!("could not remove gadget: {e}"))
                    })?;
                    trace!("removed gadget {n} next to frontier vertex {v}");
                    self.gadgets.remove(&n);
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Extract every phase-free frontier spider with a single non-output
    /// neighbour, in qubit order
    fn extract_from_frontier(&mut self) -> bool {
        let mut found = false;
        for &(_, v) in &self.frontier {
            if remove_id(&mut *self.g, v).is_ok() {
                found = true;
            }
        }
        found
    }

    /// Biadjacency matrix of the frontier (rows) and its Z neighbours
    /// (columns, sorted)
    fn frontier_biadj(&self) -> (Vec<V>, Mat2) {
        let mut neighbor_set = FxHashSet::default();
        for &(_, v) in &self.frontier {
            for n in self.g.neighbors(v) {
                if self.g.vertex_type(n) == VType::Z {
                    neighbor_set.insert(n);
                }
            }
        }
        let mut neighbors: Vec<V> = neighbor_set.into_iter().collect();
        neighbors.sort();

        let m = Mat2::build(self.frontier.len(), neighbors.len(), |i, j| {
            self.g.connected(self.frontier[i].1, neighbors[j])
        });

        (neighbors, m)
    }

    /// Set edges between frontier and given neighbors to match biadj. matrix
    fn update_frontier_biadj(&mut self, neighbors: &[V], m: &Mat2) {
        for (i, &(_, v)) in self.frontier.iter().enumerate() {
            for (j, &w) in neighbors.iter().enumerate() {
                if m[(i, j)] == 1 {
                    if !self.g.connected(v, w) {
                        self.g.add_edge_with_type(v, w, EType::H);
                    }
                } else if self.g.connected(v, w) {
                    self.g.remove_edge(v, w);
                }
            }
        }
    }

    /// Push the gates in `c1` on to the front of the circuit
    ///
    /// Gates in `c1` refer to frontier rows, so they are lifted to qubits. The
    /// order of the gates gets reversed.
    fn update_frontier_circuit(&mut self, c1: &Circuit) {
        for gate in &c1.gates {
            let mut gate = gate.clone();
            for q in gate.qs.iter_mut() {
                *q = self.frontier[*q].0;
            }
            self.circuit.push_front(gate);
        }
    }

    /// Search for a set of frontier rows whose sum has a single 1
    ///
    /// Returns `Ok(None)` if the search was exhaustive and found nothing, and
    /// `Err(())` if it gave up with subsets left to examine.
    fn search_subsets(&self, m: &Mat2) -> Result<Option<Vec<usize>>, ()> {
        let n = m.num_rows();
        let mut examined = 0;
        for k in 2..=n {
            for rows in (0..n).combinations(k) {
                if examined >= self.config.search_cap || self.budget.is_exhausted() {
                    return Err(());
                }
                examined += 1;
                if m.row_sum(&rows).iter().filter(|&&b| b != 0).count() == 1 {
                    trace!("freed a frontier vertex with rows {rows:?} after {examined} subsets");
                    return Ok(Some(rows));
                }
            }
        }
        Ok(None)
    }

    /// Apply CNOTs to the frontier so that some vertex becomes extractable
    fn unstick(&mut self) -> Result<(), ExtractError> {
        let (neighbors, mut m) = self.frontier_biadj();
        let mut c1 = Circuit::new(self.frontier.len());

        match self.search_subsets(&m) {
            Ok(Some(rows)) => {
                let target = rows[0];
                for &i in &rows[1..] {
                    m.row_add(i, target);
                    c1.row_add(i, target);
                }
            }
            Ok(None) => return Err(ExtractError::NotExtractable(self.frontier())),
            Err(()) => match self.config.fallback {
                Fallback::Fail => {
                    return Err(ExtractError::Intractable {
                        cap: self.config.search_cap,
                        frontier: self.frontier(),
                    })
                }
                Fallback::Linear => {
                    warn!(
                        "subset search gave up on a frontier of {} vertices, falling back to Gaussian elimination",
                        self.frontier.len()
                    );
                    m.gauss_x(true, 3, &mut c1);
                }
            },
        }

        self.update_frontier_circuit(&c1);
        self.update_frontier_biadj(&neighbors, &m);
        Ok(())
    }

    fn read_permutation(&mut self) -> Result<(), ExtractError> {
        let mut perm = Vec::with_capacity(self.g.outputs().len());
        for &o in self.g.outputs() {
            let i = self
                .g
                .neighbors(o)
                .next()
                .and_then(|n| self.g.inputs().iter().position(|&i| i == n))
                .ok_or_else(|| {
                    ExtractError::Malformed(format!("output {o} is not connected to an input"))
                })?;
            perm.push(i);
        }
        self.permutation = perm;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simplify::*;
    use crate::tensor::*;
    use crate::vec_graph::Graph;
    use rstest::rstest;

    /// A 3-qubit diagram whose frontier is stuck, but freed by adding row 2
    /// to row 0
    fn stuck_graph() -> Graph {
        let mut g = Graph::new();
        let is: Vec<_> = (0..3).map(|_| g.add_vertex(VType::B)).collect();
        let ws: Vec<_> = (0..3).map(|_| g.add_vertex(VType::Z)).collect();
        let fs: Vec<_> = (0..3).map(|_| g.add_vertex(VType::Z)).collect();
        let os: Vec<_> = (0..3).map(|_| g.add_vertex(VType::B)).collect();
        for q in 0..3 {
            g.add_edge_with_type(is[q], ws[q], EType::N);
            g.add_edge_with_type(fs[q], os[q], EType::N);
        }
        let rows = [[1, 1, 0], [0, 1, 1], [1, 1, 1]];
        for (i, row) in rows.iter().enumerate() {
            for (j, &b) in row.iter().enumerate() {
                if b == 1 {
                    g.add_edge_with_type(fs[i], ws[j], EType::H);
                }
            }
        }
        g.set_inputs(is);
        g.set_outputs(os);
        g
    }

    fn permutation_graph(perm: &[usize]) -> Graph {
        let mut g = Graph::new();
        let is: Vec<_> = perm.iter().map(|_| g.add_vertex(VType::B)).collect();
        let os: Vec<_> = perm.iter().map(|_| g.add_vertex(VType::B)).collect();
        for (q, &p) in perm.iter().enumerate() {
            g.add_edge_with_type(is[p], os[q], EType::N);
        }
        g.set_inputs(is);
        g.set_outputs(os);
        g
    }

    #[rstest]
    #[case(0, 0)]
    #[case(1, 0)]
    #[case(2, 1)]
    #[case(3, 4)]
    #[case(4, 11)]
    fn search_caps(#[case] n: usize, #[case] cap: usize) {
        assert_eq!(ExtractConfig::max_search_cap(n), cap);
    }

    #[test]
    fn id_test() {
        let g = permutation_graph(&[0, 1, 2, 3]);
        let mut h = g.clone();
        let e = Extractor::new(&mut h).extract().unwrap();
        assert_eq!(e.circuit.num_gates(), 0);
        assert!(e.is_identity_permutation());
    }

    #[test]
    fn perm_test() {
        let g = permutation_graph(&[1, 2, 0, 3]);
        let mut h = g.clone();
        let e = Extractor::new(&mut h).extract().unwrap();
        assert_eq!(e.permutation, vec![1, 2, 0, 3]);
        let c = e.to_circuit_with_swaps();
        assert_eq!(c.num_gates_of_type(SWAP), 2);
        assert!(Tensor::compare(&g, &c));
    }

    #[test]
    fn extract_h() {
        let mut c = Circuit::new(1);
        c.add_gate("h", vec![0]);
        let mut g: Graph = c.to_graph();
        clifford_simp(&mut g);

        let c1 = g.to_circuit().unwrap();
        assert!(Tensor::scalar_compare(&c, &c1));
    }

    #[test]
    fn extract_swap() {
        let mut c = Circuit::new(2);
        c.add_gate("cx", vec![0, 1]);
        c.add_gate("cx", vec![1, 0]);
        c.add_gate("cx", vec![0, 1]);
        let mut g: Graph = c.to_graph();
        clifford_simp(&mut g);

        let c1 = g.to_circuit().unwrap();
        assert!(Tensor::scalar_compare(&c, &c1));
    }

    #[test]
    fn extract_cnots() {
        let mut c = Circuit::new(4);
        c.add_gate("cx", vec![0, 1]);
        c.add_gate("cx", vec![0, 2]);
        c.add_gate("cx", vec![0, 3]);
        c.add_gate("cx", vec![1, 2]);
        c.add_gate("cx", vec![2, 1]);
        c.add_gate("cx", vec![1, 2]);
        c.add_gate("cx", vec![1, 3]);
        c.add_gate("cx", vec![1, 0]);
        let mut g: Graph = c.to_graph();
        clifford_simp(&mut g);

        let c1 = g.to_circuit().unwrap();
        assert!(Tensor::scalar_compare(&c, &c1));
    }

    #[test]
    fn states_advance() {
        let mut c = Circuit::new(2);
        c.add_gate("cx", vec![0, 1]);
        let mut g: Graph = c.to_graph();
        clifford_simp(&mut g);

        let mut e = Extractor::new(&mut g);
        assert_eq!(e.state(), ExtractState::Initializing);
        assert_eq!(e.step(), Ok(ExtractState::Extracting));
        let mut steps = 0;
        while e.step().unwrap() != ExtractState::Done {
            steps += 1;
            assert!(steps < 100);
        }
        assert_eq!(e.step(), Ok(ExtractState::Done));
    }

    #[test]
    fn stuck_frontier_search() {
        let g = stuck_graph();
        let mut h = g.clone();
        let mut e = Extractor::new(&mut h);
        e.step().unwrap();
        assert_eq!(e.step(), Ok(ExtractState::Stuck));
        assert_eq!(e.step(), Ok(ExtractState::Extracting));
        assert_eq!(e.circuit().num_gates_of_type(CNOT), 1);

        let mut h = g.clone();
        let ext = Extractor::new(&mut h).extract().unwrap();
        assert!(Tensor::scalar_compare(&g, &ext.to_circuit_with_swaps()));
    }

    #[test]
    fn zero_cap_is_intractable() {
        let g = stuck_graph();
        let mut h = g.clone();
        let cfg = ExtractConfig {
            search_cap: 0,
            fallback: Fallback::Fail,
        };
        let res = Extractor::new(&mut h).with_config(cfg).extract();
        assert!(matches!(res, Err(ExtractError::Intractable { cap: 0, .. })));
    }

    #[test]
    fn exhausted_budget_is_intractable() {
        let g = stuck_graph();
        let mut h = g.clone();
        let budget = Budget::unlimited().with_timeout(std::time::Duration::ZERO);
        let res = Extractor::new(&mut h).with_budget(budget).extract();
        assert!(matches!(res, Err(ExtractError::Intractable { .. })));
    }

    #[test]
    fn linear_fallback() {
        let g = stuck_graph();
        let mut h = g.clone();
        let cfg = ExtractConfig {
            search_cap: 0,
            fallback: Fallback::Linear,
        };
        let ext = Extractor::new(&mut h).with_config(cfg).extract().unwrap();
        assert!(Tensor::scalar_compare(&g, &ext.to_circuit_with_swaps()));
    }

    #[test]
    fn max_cap_never_intractable() {
        let g = stuck_graph();
        let mut h = g.clone();
        let cfg = ExtractConfig {
            search_cap: ExtractConfig::max_search_cap(3),
            fallback: Fallback::Fail,
        };
        let ext = Extractor::new(&mut h).with_config(cfg).extract().unwrap();
        assert!(Tensor::scalar_compare(&g, &ext.to_circuit_with_swaps()));
    }

    #[test]
    fn malformed_outputs() {
        let mut g = Graph::new();
        let i = g.add_vertex(VType::B);
        let o = g.add_vertex(VType::B);
        g.set_inputs(vec![i]);
        g.set_outputs(vec![o]);
        let res = Extractor::new(&mut g).extract();
        assert!(matches!(res, Err(ExtractError::Malformed(_))));

        let mut g = permutation_graph(&[0, 1]);
        g.set_inputs(vec![0]);
        let res = Extractor::new(&mut g).extract();
        assert!(matches!(res, Err(ExtractError::Malformed(_))));
    }

    #[rstest]
    #[case(1337, 20)]
    #[case(1337, 30)]
    #[case(42, 40)]
    fn random_extract(#[case] seed: u64, #[case] depth: usize) {
        let c = Circuit::random()
            .seed(seed)
            .qubits(5)
            .depth(depth)
            .p_t(0.2)
            .with_cliffords()
            .build();
        let mut g: Graph = c.to_graph();
        clifford_simp(&mut g);
        assert!(Tensor::compare(&c, &g));

        let c1 = g.to_circuit().expect("Circuit should extract.");
        assert!(Tensor::scalar_compare(&c, &c1));
    }

    #[test]
    fn regression_extract_1() {
        // frontier is only a subset of the qubits towards the end
        let mut c = Circuit::new(5);
        c.add_gate("cx", vec![3, 4]);
        c.add_gate("tdg", vec![4]);
        c.add_gate("cx", vec![0, 3]);
        c.add_gate("tdg", vec![3]);
        c.add_gate("cx", vec![0, 3]);
        c.add_gate("cx", vec![1, 4]);
        c.add_gate("cx", vec![0, 4]);
        c.add_gate("cx", vec![1, 4]);
        c.add_gate("tdg", vec![4]);
        c.add_gate("t", vec![0]);

        let mut g: Graph = c.to_graph();
        clifford_simp(&mut g);
        assert!(Tensor::scalar_compare(&g, &c));
        let c1 = g.to_circuit().unwrap();
        assert!(Tensor::scalar_compare(&c, &c1));
    }

    #[test]
    fn full_simp_then_extract() {
        let c = Circuit::random()
            .seed(5)
            .qubits(4)
            .depth(40)
            .p_t(0.3)
            .with_cliffords()
            .build();
        let mut g: Graph = c.to_graph();
        full_simp(&mut g);
        let c1 = g.to_circuit().unwrap();
        assert!(Tensor::scalar_compare(&c, &c1));
    }
}
