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

use crate::circuit::*;
use crate::gate::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Builder for random circuits over CNOT, CZ, H, S, T and arbitrary Z rotations
pub struct RandomCircuitBuilder {
    pub rng: StdRng,
    pub qubits: usize,
    pub depth: usize,
    pub p_cnot: f32,
    pub p_cz: f32,
    pub p_h: f32,
    pub p_s: f32,
    pub p_t: f32,
    pub p_rz: f32,
}

impl Circuit {
    pub fn random() -> RandomCircuitBuilder {
        RandomCircuitBuilder {
            rng: StdRng::from_os_rng(),
            qubits: 0,
            depth: 0,
            p_cnot: 0.0,
            p_cz: 0.0,
            p_h: 0.0,
            p_s: 0.0,
            p_t: 0.0,
            p_rz: 0.0,
        }
    }
}

impl RandomCircuitBuilder {
    pub fn seed(&mut self, seed: u64) -> &mut Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }
    pub fn qubits(&mut self, qubits: usize) -> &mut Self {
        self.qubits = qubits;
        self
    }
    pub fn depth(&mut self, depth: usize) -> &mut Self {
        self.depth = depth;
        self
    }
    pub fn p_cnot(&mut self, p_cnot: f32) -> &mut Self {
        self.p_cnot = p_cnot;
        self
    }
    pub fn p_cz(&mut self, p_cz: f32) -> &mut Self {
        self.p_cz = p_cz;
        self
    }
    pub fn p_h(&mut self, p_h: f32) -> &mut Self {
        self.p_h = p_h;
        self
    }
    pub fn p_s(&mut self, p_s: f32) -> &mut Self {
        self.p_s = p_s;
        self
    }
    pub fn p_t(&mut self, p_t: f32) -> &mut Self {
        self.p_t = p_t;
        self
    }
    pub fn p_rz(&mut self, p_rz: f32) -> &mut Self {
        self.p_rz = p_rz;
        self
    }

    /// Distribute the remaining probability evenly among Clifford (CNOT, H, S) gates
    pub fn with_cliffords(&mut self) -> &mut Self {
        let p = (1.0 - self.p_t - self.p_cz - self.p_rz) / 3.0;
        self.p_cnot = p;
        self.p_h = p;
        self.p_s = p;
        self
    }

    /// Convenience method for generating Clifford+T circuits
    ///
    /// Takes a probability of T gates, then distributes the rest
    /// of the probability evenly among CNOT, H, and S.
    pub fn clifford_t(&mut self, p_t: f32) -> &mut Self {
        self.p_t(p_t).with_cliffords()
    }

    /// Only CNOT gates and single-qubit Z rotations by multiples of π/8
    pub fn cnot_rz(&mut self, p_cnot: f32) -> &mut Self {
        self.p_cnot = p_cnot;
        self.p_cz = 0.0;
        self.p_h = 0.0;
        self.p_s = 0.0;
        self.p_t = 0.0;
        self.p_rz = 1.0 - p_cnot;
        self
    }

    pub fn uniform(&mut self) -> &mut Self {
        self.p_cnot = 0.2;
        self.p_cz = 0.2;
        self.p_h = 0.2;
        self.p_s = 0.2;
        self.p_t = 0.2;
        self.p_rz = 0.0;
        self
    }

    /// Build a circuit. Two-qubit gates are skipped on fewer than two qubits.
    pub fn build(&mut self) -> Circuit {
        let mut c = Circuit::new(self.qubits);
        if self.qubits == 0 {
            return c;
        }

        for _ in 0..self.depth {
            let p: f32 = self.rng.random();
            let q0 = self.rng.random_range(0..self.qubits);
            let q1 = if self.qubits > 1 {
                let q = self.rng.random_range(0..self.qubits - 1);
                Some(if q >= q0 { q + 1 } else { q })
            } else {
                None
            };

            let mut p0 = self.p_cnot;
            if p < p0 {
                if let Some(q1) = q1 {
                    c.push(Gate::new(CNOT, vec![q0, q1]));
                }
                continue;
            }

            p0 += self.p_cz;
            if p < p0 {
                if let Some(q1) = q1 {
                    c.push(Gate::new(CZ, vec![q0, q1]));
                }
                continue;
            }

            p0 += self.p_h;
            if p < p0 {
                c.push(Gate::new(HAD, vec![q0]));
                continue;
            }

            p0 += self.p_s;
            if p < p0 {
                c.push(Gate::new(S, vec![q0]));
                continue;
            }

            p0 += self.p_t;
            if p < p0 {
                c.push(Gate::new(T, vec![q0]));
                continue;
            }

            p0 += self.p_rz;
            if p < p0 {
                let k: i64 = self.rng.random_range(1..16);
                c.push(Gate::new_with_phase(ZPhase, vec![q0], (k, 8)));
            }
        }

        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_is_deterministic() {
        let c0 = Circuit::random().seed(42).qubits(4).depth(30).clifford_t(0.2).build();
        let c1 = Circuit::random().seed(42).qubits(4).depth(30).clifford_t(0.2).build();
        assert_eq!(c0, c1);
        assert_eq!(c0.num_qubits(), 4);
        assert!(c0.num_gates() <= 30);
    }

    #[test]
    fn clifford_only() {
        let c = Circuit::random().seed(7).qubits(3).depth(50).clifford_t(0.0).build();
        assert!(c.gates.iter().all(|g| g.is_clifford()));
        assert!(c.num_gates() > 40);
    }

    #[test]
    fn cnot_rz_gates() {
        let c = Circuit::random().seed(3).qubits(3).depth(40).cnot_rz(0.5).build();
        assert!(c.gates.iter().all(|g| g.t == CNOT || g.t == ZPhase));
        assert!(c
            .gates
            .iter()
            .all(|g| g.qs.len() < 2 || g.qs[0] != g.qs[1]));
    }

    #[test]
    fn single_qubit() {
        let c = Circuit::random().seed(1).qubits(1).depth(20).uniform().build();
        assert!(c.gates.iter().all(|g| g.qs == vec![0]));
    }
}
