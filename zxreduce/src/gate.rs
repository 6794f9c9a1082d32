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

use crate::graph::*;
use crate::phase::Phase;
use num::{One, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash, Serialize, Deserialize)]
pub enum GType {
    XPhase,
    NOT,
    ZPhase,
    Y,
    Z,
    S,
    T,
    Sdg,
    Tdg,
    CNOT,
    CZ,
    SWAP,
    HAD,
}

pub use GType::*;

impl GType {
    /// Look up a gate type by its short name, e.g. "cx" or "rz"
    pub fn from_name(s: &str) -> Option<GType> {
        let t = match s {
            "rz" => ZPhase,
            "rx" => XPhase,
            "x" => NOT,
            "y" => Y,
            "z" => Z,
            "s" => S,
            "t" => T,
            "sdg" => Sdg,
            "tdg" => Tdg,
            "h" => HAD,
            "cx" | "CX" => CNOT,
            "cz" => CZ,
            "swap" => SWAP,
            _ => return None,
        };
        Some(t)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ZPhase => "rz",
            NOT => "x",
            XPhase => "rx",
            Y => "y",
            Z => "z",
            S => "s",
            T => "t",
            Sdg => "sdg",
            Tdg => "tdg",
            HAD => "h",
            CNOT => "cx",
            CZ => "cz",
            SWAP => "swap",
        }
    }

    /// number of qubits the gate acts on
    pub fn num_qubits(&self) -> usize {
        match self {
            CNOT | CZ | SWAP => 2,
            _ => 1,
        }
    }

    /// Gates that are their own inverse
    pub fn is_self_inverse(&self) -> bool {
        matches!(self, NOT | Y | Z | HAD | CNOT | CZ | SWAP)
    }

    /// Gates whose qubits can be exchanged without changing the gate
    pub fn is_symmetric(&self) -> bool {
        matches!(self, CZ | SWAP)
    }
}

#[derive(PartialEq, Eq, Clone, Debug, Serialize, Deserialize)]
pub struct Gate {
    pub t: GType,
    pub qs: Vec<usize>,
    pub phase: Phase,
}

impl Gate {
    pub fn new(t: GType, qs: Vec<usize>) -> Gate {
        Gate {
            t,
            qs,
            phase: Phase::zero(),
        }
    }

    pub fn new_with_phase(t: GType, qs: Vec<usize>, phase: impl Into<Phase>) -> Gate {
        Gate {
            t,
            qs,
            phase: phase.into(),
        }
    }

    /// The phase of a gate that is diagonal in the Z basis, if it is one
    pub fn z_phase(&self) -> Option<Phase> {
        match self.t {
            ZPhase => Some(self.phase),
            Z => Some(Phase::one()),
            S => Some((1, 2).into()),
            Sdg => Some((-1, 2).into()),
            T => Some((1, 4).into()),
            Tdg => Some((-1, 4).into()),
            _ => None,
        }
    }

    pub fn is_clifford(&self) -> bool {
        match self.t {
            T | Tdg => false,
            ZPhase | XPhase => self.phase.is_clifford(),
            _ => true,
        }
    }

    pub fn adjoint(&mut self) {
        match self.t {
            ZPhase | XPhase => self.phase = -self.phase,
            S => self.t = Sdg,
            T => self.t = Tdg,
            Sdg => self.t = S,
            Tdg => self.t = T,
            _ => {}
        }
    }

    /// Add a spider of the given type to the end of the wire for `qubit`
    ///
    /// `qs[qubit]` holds the last vertex on each wire, and is moved along to
    /// the new spider.
    fn add_spider<G: GraphLike>(
        graph: &mut G,
        qs: &mut [V],
        qubit: usize,
        ty: VType,
        phase: impl Into<Phase>,
    ) -> V {
        let v0 = qs[qubit];
        let row = graph.row(v0) + 1.0;
        let v = graph.add_vertex_with_data(VData {
            ty,
            phase: phase.into(),
            qubit: qubit as f64,
            row,
        });
        graph.add_edge_with_type(v0, v, EType::N);
        qs[qubit] = v;
        v
    }

    /// Add a pair of spiders connected by an edge of the given type, at the
    /// same row
    fn add_pair<G: GraphLike>(
        graph: &mut G,
        qs: &mut [V],
        tys: (VType, VType),
        et: EType,
        q0: usize,
        q1: usize,
    ) {
        let v0 = Gate::add_spider(graph, qs, q0, tys.0, Phase::zero());
        let v1 = Gate::add_spider(graph, qs, q1, tys.1, Phase::zero());
        let row = graph.row(v0).max(graph.row(v1));
        graph.set_row(v0, row);
        graph.set_row(v1, row);
        graph.add_edge_with_type(v0, v1, et);
        graph.scalar_mut().mul_sqrt2_pow(1);
    }

    /// Add the gate to a graph whose wire ends are tracked in `qs`
    ///
    /// SWAP gates are realised by crossing the wires, so they add no vertices.
    pub fn add_to_graph(&self, graph: &mut impl GraphLike, qs: &mut [V]) {
        match self.t {
            ZPhase | Z | S | Sdg | T | Tdg => {
                let p = self.z_phase().unwrap_or_else(Phase::zero);
                Gate::add_spider(graph, qs, self.qs[0], VType::Z, p);
            }
            XPhase => {
                Gate::add_spider(graph, qs, self.qs[0], VType::X, self.phase);
            }
            NOT => {
                Gate::add_spider(graph, qs, self.qs[0], VType::X, Phase::one());
            }
            Y => {
                // Y = i X Z
                Gate::add_spider(graph, qs, self.qs[0], VType::Z, Phase::one());
                Gate::add_spider(graph, qs, self.qs[0], VType::X, Phase::one());
                graph.scalar_mut().mul_phase((1, 2));
            }
            HAD => {
                Gate::add_spider(graph, qs, self.qs[0], VType::H, Phase::zero());
            }
            CNOT => Gate::add_pair(
                graph,
                qs,
                (VType::Z, VType::X),
                EType::N,
                self.qs[0],
                self.qs[1],
            ),
            CZ => Gate::add_pair(
                graph,
                qs,
                (VType::Z, VType::Z),
                EType::H,
                self.qs[0],
                self.qs[1],
            ),
            SWAP => qs.swap(self.qs[0], self.qs[1]),
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.t.name())?;
        if matches!(self.t, ZPhase | XPhase) {
            write!(f, "({})", self.phase)?;
        }
        let qs: Vec<String> = self.qs.iter().map(|q| q.to_string()).collect();
        write!(f, " {}", qs.join(", "))
    }
}
