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

use crate::phase::Phase;
use crate::scalar::Scalar;
use num::{One, Zero};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

pub type V = usize;

/// The type of a vertex in a graph.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VType {
    B, // Boundary
    #[default]
    Z, // Z-spider
    X, // X-spider
    #[serde(rename = "hadamard")]
    H, // arity-2 Hadamard node
}

impl VType {
    /// Returns `true` for the spider types that fuse and carry phases.
    pub fn is_spider(&self) -> bool {
        matches!(self, VType::Z | VType::X)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VData {
    pub ty: VType,
    pub phase: Phase,
    pub qubit: f64,
    pub row: f64,
}

impl Default for VData {
    fn default() -> Self {
        VData {
            ty: VType::B,
            phase: Phase::zero(),
            qubit: 0.0,
            row: 0.0,
        }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EType {
    /// Normal edge.
    #[default]
    #[serde(rename = "simple")]
    N,
    /// Hadamard edge.
    #[serde(rename = "hadamard")]
    H,
}

impl EType {
    pub fn opposite(&self) -> EType {
        match self {
            EType::N => EType::H,
            EType::H => EType::N,
        }
    }

    /// The type of the edge obtained by composing two edges along a wire.
    pub fn merge(et0: EType, et1: EType) -> EType {
        if et0 == EType::N {
            et1
        } else {
            et1.opposite()
        }
    }
}

/// Errors raised by the checked graph edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    #[error("vertex {0} does not exist")]
    InvalidReference(V),
    #[error("edit would break the boundary vertex {0}")]
    BoundaryViolation(V),
    #[error("unsupported parallel edge or self-loop between {0} and {1}")]
    UnsupportedEdge(V, V),
}

pub trait GraphLike: Clone + Sized + Send + Sync + std::fmt::Debug {
    /// Initialise a new empty graph
    fn new() -> Self;

    /// Next fresh vertex index
    fn vindex(&self) -> V;

    /// Number of vertices
    fn num_vertices(&self) -> usize;

    /// Number of edges
    fn num_edges(&self) -> usize;

    /// Get iterator over all vertices
    fn vertices(&self) -> impl Iterator<Item = V>;

    /// Get iterator over all edges
    ///
    /// An "edge" is a triple (s, t, edge_type), where s <= t.
    fn edges(&self) -> impl Iterator<Item = (V, V, EType)>;

    /// List of boundary vertices which serve as inputs
    fn inputs(&self) -> &Vec<V>;

    /// Mutable list of boundary vertices which serve as inputs
    fn inputs_mut(&mut self) -> &mut Vec<V>;

    /// Set inputs for the graph
    fn set_inputs(&mut self, inputs: Vec<V>);

    /// List of boundary vertices which serve as outputs
    fn outputs(&self) -> &Vec<V>;

    /// Mutable list of boundary vertices which serve as outputs
    fn outputs_mut(&mut self) -> &mut Vec<V>;

    /// Set outputs for the graph
    fn set_outputs(&mut self, outputs: Vec<V>);

    /// Add a vertex with the given type
    fn add_vertex(&mut self, ty: VType) -> V;

    /// Add a vertex with the given VData struct
    fn add_vertex_with_data(&mut self, d: VData) -> V;

    /// Remove a vertex from a graph
    ///
    /// Panics if the vertex is not in the graph.
    fn remove_vertex(&mut self, v: V);

    /// Add an edge with the given type
    ///
    /// Behaviour is undefined if an edge already exists between s and t.
    fn add_edge_with_type(&mut self, s: V, t: V, ety: EType);

    /// Remove an edge from a graph
    ///
    /// Panics if there is no edge between s and t.
    fn remove_edge(&mut self, s: V, t: V);

    /// Get the data associated to the given vertex
    fn vertex_data(&self, v: V) -> &VData;

    /// Get a mutable ref to the data associated to the given vertex
    fn vertex_data_mut(&mut self, v: V) -> &mut VData;
    fn set_edge_type(&mut self, s: V, t: V, ety: EType);
    fn edge_type_opt(&self, s: V, t: V) -> Option<EType>;
    fn neighbors(&self, v: V) -> impl Iterator<Item = V>;
    fn incident_edges(&self, v: V) -> impl Iterator<Item = (V, EType)>;
    fn degree(&self, v: V) -> usize;
    fn scalar(&self) -> &Scalar;
    fn scalar_mut(&mut self) -> &mut Scalar;
    fn find_edge<F>(&self, f: F) -> Option<(V, V, EType)>
    where
        F: Fn(V, V, EType) -> bool;
    fn find_vertex<F>(&self, f: F) -> Option<V>
    where
        F: Fn(V) -> bool;
    fn contains_vertex(&self, v: V) -> bool;

    /// Set the phase of a vertex
    fn set_phase(&mut self, v: V, phase: impl Into<Phase>) {
        self.vertex_data_mut(v).phase = phase.into();
    }

    /// Returns the phase of vertex `v`
    fn phase(&self, v: V) -> Phase {
        self.vertex_data(v).phase
    }

    /// Adds a value to the phase of a vertex
    fn add_to_phase(&mut self, v: V, phase: impl Into<Phase>) {
        let vd = self.vertex_data_mut(v);
        vd.phase += phase.into();
    }

    fn set_vertex_type(&mut self, v: V, ty: VType) {
        self.vertex_data_mut(v).ty = ty;
    }

    fn vertex_type(&self, v: V) -> VType {
        self.vertex_data(v).ty
    }

    fn is_boundary(&self, v: V) -> bool {
        self.vertex_type(v) == VType::B
    }

    /// Sets the qubit index of the given vertex
    ///
    /// Layout only. `qubit` and `row` may take fractional values.
    fn set_qubit(&mut self, v: V, qubit: f64) {
        self.vertex_data_mut(v).qubit = qubit;
    }

    fn qubit(&self, v: V) -> f64 {
        self.vertex_data(v).qubit
    }

    fn set_row(&mut self, v: V, row: f64) {
        self.vertex_data_mut(v).row = row;
    }

    fn row(&self, v: V) -> f64 {
        self.vertex_data(v).row
    }

    /// Add a spider with the given type and phase
    fn add_vertex_with_phase(&mut self, ty: VType, phase: impl Into<Phase>) -> V {
        let v = self.add_vertex(ty);
        self.set_phase(v, phase.into());
        v
    }

    /// Checked edge insertion.
    ///
    /// Parallel edges and self-loops are merged away with [`GraphLike::add_edge_smart`].
    /// Fails if a vertex is missing, if a boundary vertex would end up with
    /// more than one edge, or if the merge is not defined for the vertex types.
    fn add_edge(&mut self, s: V, t: V, ety: EType) -> Result<(), GraphError> {
        for v in [s, t] {
            if !self.contains_vertex(v) {
                return Err(GraphError::InvalidReference(v));
            }
        }
        let (st, tt) = (self.vertex_type(s), self.vertex_type(t));

        if s == t {
            if !st.is_spider() {
                return Err(GraphError::UnsupportedEdge(s, t));
            }
        } else if self.connected(s, t) {
            for (v, ty) in [(s, st), (t, tt)] {
                if ty == VType::B {
                    return Err(GraphError::BoundaryViolation(v));
                }
            }
            if !(st.is_spider() && tt.is_spider()) {
                return Err(GraphError::UnsupportedEdge(s, t));
            }
        } else {
            for (v, ty) in [(s, st), (t, tt)] {
                if ty == VType::B && self.degree(v) > 0 {
                    return Err(GraphError::BoundaryViolation(v));
                }
            }
        }

        self.add_edge_smart(s, t, ety);
        Ok(())
    }

    /// Checked spider removal. Boundary vertices can't be removed this way.
    fn remove_spider(&mut self, v: V) -> Result<(), GraphError> {
        if !self.contains_vertex(v) {
            return Err(GraphError::InvalidReference(v));
        }
        if self.is_boundary(v) {
            return Err(GraphError::BoundaryViolation(v));
        }
        self.remove_vertex(v);
        Ok(())
    }

    fn edge_type(&self, s: V, t: V) -> EType {
        self.edge_type_opt(s, t).expect("Edge not found")
    }

    fn connected(&self, v0: V, v1: V) -> bool {
        self.edge_type_opt(v0, v1).is_some()
    }

    fn toggle_edge_type(&mut self, v0: V, v1: V) {
        self.set_edge_type(v0, v1, self.edge_type(v0, v1).opposite());
    }

    fn vertex_vec(&self) -> Vec<V> {
        self.vertices().collect()
    }
    fn edge_vec(&self) -> Vec<(V, V, EType)> {
        self.edges().collect()
    }
    fn neighbor_vec(&self, v: V) -> Vec<V> {
        self.neighbors(v).collect()
    }
    fn incident_edge_vec(&self, v: V) -> Vec<(V, EType)> {
        self.incident_edges(v).collect()
    }

    /// Convert all X spiders to Z with the colour-change rule
    fn x_to_z(&mut self) {
        for v in self.vertex_vec() {
            if self.vertex_type(v) == VType::X {
                self.set_vertex_type(v, VType::Z);
                for w in self.neighbor_vec(v) {
                    self.toggle_edge_type(v, w);
                }
            }
        }
    }

    /// Add an edge and simplify if necessary to remove parallel edges
    ///
    /// The behaviour of this function depends on the type of source/target
    /// vertex as well as the type of the existing edge (if there is one).
    /// Panics on self-loops or parallel edges that are not between Z/X spiders.
    fn add_edge_smart(&mut self, s: V, t: V, ety: EType) {
        let st = self.vertex_type(s);
        if s == t {
            if st.is_spider() {
                if ety == EType::H {
                    self.add_to_phase(s, Phase::one());
                    self.scalar_mut().mul_sqrt2_pow(-1);
                }
            } else {
                panic!("Self-loops only supported on Z and X nodes");
            }
        } else if let Some(ety0) = self.edge_type_opt(s, t) {
            let tt = self.vertex_type(t);
            match (st, tt) {
                (VType::Z, VType::Z) | (VType::X, VType::X) => {
                    match (ety0, ety) {
                        (EType::N, EType::N) => {} // ignore new edge
                        (EType::H, EType::H) => {
                            self.remove_edge(s, t);
                            self.scalar_mut().mul_sqrt2_pow(-2);
                        }
                        (EType::H, EType::N) => {
                            self.set_edge_type(s, t, EType::N);
                            self.add_to_phase(s, Phase::one());
                            self.scalar_mut().mul_sqrt2_pow(-1);
                        }
                        (EType::N, EType::H) => {
                            self.add_to_phase(s, Phase::one());
                            self.scalar_mut().mul_sqrt2_pow(-1);
                        }
                    }
                }
                (VType::Z, VType::X) | (VType::X, VType::Z) => {
                    match (ety0, ety) {
                        (EType::N, EType::N) => {
                            self.remove_edge(s, t);
                            self.scalar_mut().mul_sqrt2_pow(-2);
                        }
                        (EType::N, EType::H) => {
                            self.set_edge_type(s, t, EType::H);
                            self.add_to_phase(s, Phase::one());
                            self.scalar_mut().mul_sqrt2_pow(-1);
                        }
                        (EType::H, EType::N) => {
                            self.add_to_phase(s, Phase::one());
                            self.scalar_mut().mul_sqrt2_pow(-1);
                        }
                        (EType::H, EType::H) => {} // ignore new edge
                    }
                }
                _ => panic!(
                    "Parallel edges only supported between Z and X vertices ({st:?} --> {tt:?})"
                ),
            }
        } else {
            self.add_edge_with_type(s, t, ety);
        }
    }

    /// Appends the given graph to the current one, with fresh names.
    ///
    /// The renaming map is returned. The scalars are multiplied, but the inputs/outputs
    /// of `self` are NOT updated.
    fn append_graph(&mut self, other: &impl GraphLike) -> FxHashMap<V, V> {
        let mut vmap = FxHashMap::default();

        for v in other.vertices() {
            let v1 = self.add_vertex_with_data(other.vertex_data(v).clone());
            vmap.insert(v, v1);
        }

        for (v0, v1, et) in other.edges() {
            self.add_edge_with_type(vmap[&v0], vmap[&v1], et);
        }

        *self.scalar_mut() *= other.scalar();

        vmap
    }

    /// Plug the given graph into the outputs and multiply scalars
    ///
    /// Panics if the outputs of `self` are not the same length as the inputs of `other`.
    fn plug(&mut self, other: &impl GraphLike) {
        if other.inputs().len() != self.outputs().len() {
            panic!("Outputs and inputs must match");
        }

        let vmap = self.append_graph(other);

        for k in 0..self.outputs().len() {
            let o = self.outputs()[k];
            let i = vmap[&other.inputs()[k]];
            let (no, et0) = self
                .incident_edges(o)
                .next()
                .unwrap_or_else(|| panic!("Bad output: {o}"));
            let (ni, et1) = self
                .incident_edges(i)
                .next()
                .unwrap_or_else(|| panic!("Bad input: {i}"));
            let et = EType::merge(et0, et1);

            self.remove_vertex(o);
            self.remove_vertex(i);
            self.add_edge_smart(no, ni, et);
        }

        let outp = other.outputs().iter().map(|o| vmap[o]).collect();
        self.set_outputs(outp);
    }

    /// Checks if the given graph only consists of plain wires from the inputs to outputs (in order)
    fn is_identity(&self) -> bool {
        let n = self.inputs().len();
        self.outputs().len() == n
            && self.num_vertices() == 2 * n
            && (0..n).all(|i| {
                self.edge_type_opt(self.inputs()[i], self.outputs()[i]) == Some(EType::N)
            })
    }

    /// Return number of Z or X spiders with non-Clifford phase
    fn tcount(&self) -> usize {
        self.vertices()
            .filter(|&v| self.vertex_type(v).is_spider() && !self.phase(v).is_clifford())
            .count()
    }

    /// Exchange inputs and outputs and reverse all phases
    fn adjoint(&mut self) {
        for v in self.vertex_vec() {
            let p = self.phase(v);
            self.set_phase(v, -p);
        }

        let inp = self.inputs().clone();
        self.set_inputs(self.outputs().clone());
        self.set_outputs(inp);
        let s = self.scalar().conj();
        *(self.scalar_mut()) = s;
    }

    /// Same as GraphLike::adjoint(), but return as a copy
    fn to_adjoint(&self) -> Self {
        let mut g = self.clone();
        g.adjoint();
        g
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::{CompareTensors, Tensor, ToTensor};
    use crate::vec_graph::Graph;

    #[test]
    fn smart_edges() {
        let mut g = Graph::new();
        g.add_vertex(VType::B);
        g.add_vertex(VType::Z);
        g.add_vertex(VType::Z);
        g.add_vertex(VType::X);
        g.add_vertex(VType::B);
        g.add_edge_smart(0, 1, EType::N);
        g.add_edge_smart(1, 2, EType::N);
        g.add_edge_smart(2, 3, EType::N);
        g.add_edge_smart(1, 3, EType::N);
        g.add_edge_smart(3, 4, EType::N);
        g.set_inputs(vec![0]);
        g.set_outputs(vec![4]);

        let mut h = Graph::new();
        h.add_vertex(VType::B);
        h.add_vertex(VType::Z);
        h.add_vertex(VType::X);
        h.add_vertex(VType::B);
        h.add_edge_smart(0, 1, EType::N);
        h.add_edge_smart(1, 2, EType::N);
        h.add_edge_smart(1, 2, EType::N);
        h.add_edge_smart(2, 3, EType::N);
        h.set_inputs(vec![0]);
        h.set_outputs(vec![3]);

        assert_eq!(h.num_edges(), 2);
        assert!(Tensor::compare(&g, &h));
    }

    #[test]
    fn smart_hadamard_edges() {
        // Z - Z with a plain and a Hadamard edge is Z(pi) - Z with one plain edge.
        let mut g = Graph::new();
        let b0 = g.add_vertex(VType::B);
        let z0 = g.add_vertex(VType::Z);
        let z1 = g.add_vertex(VType::Z);
        let b1 = g.add_vertex(VType::B);
        g.add_edge_with_type(b0, z0, EType::N);
        g.add_edge_with_type(z1, b1, EType::N);
        g.add_edge_with_type(z0, z1, EType::H);
        g.add_edge_smart(z0, z1, EType::N);

        assert_eq!(g.num_edges(), 3);
        assert_eq!(g.edge_type(z0, z1), EType::N);
        assert_eq!(g.phase(z0), Phase::one());
        assert_eq!(g.scalar().power_of_sqrt2(), -1);
    }

    #[test]
    fn checked_edges() {
        let mut g = Graph::new();
        let b = g.add_vertex(VType::B);
        let z = g.add_vertex(VType::Z);
        let x = g.add_vertex(VType::X);
        let h = g.add_vertex(VType::H);

        assert_eq!(g.add_edge(b, 17, EType::N), Err(GraphError::InvalidReference(17)));
        assert_eq!(g.add_edge(b, z, EType::N), Ok(()));
        assert_eq!(g.add_edge(b, x, EType::N), Err(GraphError::BoundaryViolation(b)));
        assert_eq!(g.add_edge(z, b, EType::H), Err(GraphError::BoundaryViolation(b)));
        assert_eq!(g.add_edge(h, h, EType::N), Err(GraphError::UnsupportedEdge(h, h)));
        assert_eq!(g.add_edge(z, h, EType::N), Ok(()));
        assert_eq!(g.add_edge(z, h, EType::N), Err(GraphError::UnsupportedEdge(z, h)));

        // parallel N edges between Z and X cancel
        assert_eq!(g.add_edge(z, x, EType::N), Ok(()));
        assert_eq!(g.add_edge(z, x, EType::N), Ok(()));
        assert!(!g.connected(z, x));
        assert_eq!(g.scalar().power_of_sqrt2(), -2);

        // Hadamard self-loop adds pi
        assert_eq!(g.add_edge(x, x, EType::H), Ok(()));
        assert_eq!(g.phase(x), Phase::one());
    }

    #[test]
    fn checked_removal() {
        let mut g = Graph::new();
        let b = g.add_vertex(VType::B);
        let z = g.add_vertex(VType::Z);
        g.add_edge_with_type(b, z, EType::N);

        assert_eq!(g.remove_spider(b), Err(GraphError::BoundaryViolation(b)));
        assert_eq!(g.remove_spider(9), Err(GraphError::InvalidReference(9)));
        assert_eq!(g.remove_spider(z), Ok(()));
        assert_eq!(g.degree(b), 0);
        assert_eq!(g.remove_spider(z), Err(GraphError::InvalidReference(z)));
    }

    #[test]
    fn plugs() {
        let mut g = Graph::new();
        g.add_vertex(VType::B);
        g.add_vertex(VType::Z);
        g.add_vertex(VType::B);
        g.add_vertex(VType::B);
        g.add_edge_with_type(0, 1, EType::N);
        g.add_edge_with_type(1, 2, EType::N);
        g.add_edge_with_type(1, 3, EType::N);
        g.set_inputs(vec![0]);
        g.set_outputs(vec![2, 3]);

        let mut h = Graph::new();
        h.add_vertex(VType::B);
        h.add_vertex(VType::B);
        h.add_vertex(VType::Z);
        h.add_vertex(VType::B);
        h.add_edge_with_type(0, 2, EType::N);
        h.add_edge_with_type(1, 2, EType::N);
        h.add_edge_with_type(2, 3, EType::N);
        h.set_inputs(vec![0, 1]);
        h.set_outputs(vec![3]);

        g.plug(&h);
        assert_eq!(g.num_vertices(), 4);
        assert_eq!(g.num_edges(), 3);
        let zs: Vec<_> = g
            .vertices()
            .filter(|&v| g.vertex_type(v) == VType::Z)
            .collect();
        assert_eq!(zs.len(), 2);
        assert!(g.connected(zs[0], zs[1]));
    }

    #[test]
    fn x_to_z_toggles_edges() {
        let mut g = Graph::new();
        let b0 = g.add_vertex(VType::B);
        let x = g.add_vertex_with_phase(VType::X, Phase::from((1, 4)));
        let b1 = g.add_vertex(VType::B);
        g.add_edge_with_type(b0, x, EType::N);
        g.add_edge_with_type(x, b1, EType::H);
        g.set_inputs(vec![b0]);
        g.set_outputs(vec![b1]);
        let before = g.to_tensor();

        g.x_to_z();
        assert_eq!(g.vertex_type(x), VType::Z);
        assert_eq!(g.edge_type(b0, x), EType::H);
        assert_eq!(g.edge_type(x, b1), EType::N);
        assert!(Tensor::approx_eq(&before, &g.to_tensor()));
        assert_eq!(g.tcount(), 1);
    }
}
