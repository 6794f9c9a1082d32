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

use crate::gate::*;
use crate::graph::*;
use crate::linalg::RowOps;
use crate::phase::Phase;
use num::Zero;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// A type for quantum circuits
#[derive(PartialEq, Eq, Clone, Debug, Serialize, Deserialize)]
pub struct Circuit {
    nqubits: usize,
    pub gates: VecDeque<Gate>,
}

#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct CircuitStats {
    pub qubits: usize,
    pub total: usize,
    pub oneq: usize,
    pub twoq: usize,
    pub cliff: usize,
    pub non_cliff: usize,
}

impl CircuitStats {
    pub fn make(c: &Circuit) -> Self {
        let mut s = CircuitStats {
            qubits: c.num_qubits(),
            total: c.num_gates(),
            ..Default::default()
        };
        for g in &c.gates {
            if g.qs.len() == 1 {
                s.oneq += 1;
            } else {
                s.twoq += 1;
            }
            if g.is_clifford() {
                s.cliff += 1;
            } else {
                s.non_cliff += 1;
            }
        }
        s
    }
}

impl fmt::Display for CircuitStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} qubits, {} gates ({} 1-qubit, {} 2-qubit, {} non-clifford)",
            self.qubits, self.total, self.oneq, self.twoq, self.non_cliff
        )
    }
}

impl Circuit {
    pub fn new(nqubits: usize) -> Circuit {
        Circuit {
            gates: VecDeque::new(),
            nqubits,
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.nqubits
    }

    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    pub fn num_gates_of_type(&self, t: GType) -> usize {
        self.gates.iter().filter(|g| g.t == t).count()
    }

    /// Number of gates acting on two qubits
    pub fn num_two_qubit_gates(&self) -> usize {
        self.gates.iter().filter(|g| g.qs.len() == 2).count()
    }

    pub fn push(&mut self, g: Gate) {
        self.gates.push_back(g);
    }

    pub fn push_back(&mut self, g: Gate) {
        self.gates.push_back(g);
    }

    pub fn push_front(&mut self, g: Gate) {
        self.gates.push_front(g);
    }

    /// Add a gate by its short name
    ///
    /// Panics if the name is not a known gate type.
    pub fn add_gate_with_phase(&mut self, name: &str, qs: Vec<usize>, phase: impl Into<Phase>) {
        let t = GType::from_name(name).unwrap_or_else(|| panic!("Unknown gate: {name}"));
        self.push(Gate::new_with_phase(t, qs, phase));
    }

    pub fn add_gate(&mut self, name: &str, qs: Vec<usize>) {
        self.add_gate_with_phase(name, qs, Phase::zero());
    }

    pub fn reverse(&mut self) {
        self.gates.make_contiguous().reverse();
    }

    pub fn adjoint(&mut self) {
        self.reverse();
        for g in &mut self.gates {
            g.adjoint();
        }
    }

    pub fn to_adjoint(&self) -> Circuit {
        let mut c = self.clone();
        c.adjoint();
        c
    }

    /// Build the ZX-diagram of the circuit
    ///
    /// Each gate becomes one or two spiders on the wires it acts on, or a
    /// Hadamard node for HAD. The scalar is set so that the diagram is equal
    /// to the circuit on the nose.
    pub fn to_graph<G: GraphLike>(&self) -> G {
        let mut graph = G::new();
        let mut inputs = Vec::with_capacity(self.nqubits);

        // rows start at 1, so (0,0) can mean "no coordinate"
        for i in 0..self.nqubits {
            let v = graph.add_vertex_with_data(VData {
                ty: VType::B,
                phase: Phase::zero(),
                qubit: i as f64,
                row: 1.0,
            });
            inputs.push(v);
        }

        let mut qs = inputs.clone();
        graph.set_inputs(inputs);

        for g in &self.gates {
            g.add_to_graph(&mut graph, &mut qs);
        }

        let last_row = qs.iter().map(|&v| graph.row(v)).fold(0.0, f64::max);

        let mut outputs = Vec::with_capacity(self.nqubits);
        for (i, &v0) in qs.iter().enumerate() {
            let v = graph.add_vertex_with_data(VData {
                ty: VType::B,
                phase: Phase::zero(),
                qubit: i as f64,
                row: last_row + 1.0,
            });
            graph.add_edge_with_type(v0, v, EType::N);
            outputs.push(v);
        }

        graph.set_outputs(outputs);
        graph
    }

    pub fn stats(&self) -> CircuitStats {
        CircuitStats::make(self)
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "circuit on {} qubits", self.num_qubits())?;
        for g in &self.gates {
            writeln!(f, "  {g}")?;
        }
        Ok(())
    }
}

impl std::ops::Add<&Circuit> for Circuit {
    type Output = Circuit;
    fn add(mut self, rhs: &Circuit) -> Self::Output {
        self += rhs;
        self
    }
}

impl std::ops::Add<&Circuit> for &Circuit {
    type Output = Circuit;
    fn add(self, rhs: &Circuit) -> Self::Output {
        self.clone() + rhs
    }
}

impl std::ops::AddAssign<&Circuit> for Circuit {
    fn add_assign(&mut self, rhs: &Self) {
        if self.num_qubits() != rhs.num_qubits() {
            panic!("Cannot append circuits with different numbers of qubits");
        }
        self.gates.extend(rhs.gates.iter().cloned());
    }
}

/// A circuit can pretend to be a matrix, where row operations correspond
/// to appending CNOT gates.
///
/// For example, we can synthesise a CNOT circuit corresponding to the parity
/// matrix `m` as follows:
///
/// ```
/// use zxreduce::circuit::Circuit;
/// use zxreduce::linalg::*;
/// let mut c = Circuit::new(3); // c|b> = |id * b>
/// let mut m = Mat2::new(vec![vec![1,1,1], vec![0,1,1], vec![0,0,1]]);
/// m.gauss_x(true, 1, &mut c);  // c|b> = |m^-1 * b>
/// c.reverse();                 // c|b> = |m * b>
/// assert_eq!(c.num_gates(), 3);
/// ```
impl RowOps for Circuit {
    fn row_add(&mut self, r0: usize, r1: usize) {
        self.push_back(Gate::new(CNOT, vec![r1, r0]));
    }

    fn row_swap(&mut self, r0: usize, r1: usize) {
        self.push_back(Gate::new(SWAP, vec![r0, r1]));
    }
}
