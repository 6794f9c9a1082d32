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

use super::{det2, NativeCircuit, NativeGate};
use nalgebra::Matrix2;
use num::complex::Complex64;
use std::f64::consts::PI;

/// Rotations smaller than this are dropped
const ANGLE_EPS: f64 = 1e-12;

/// `U = e^{i phase} Rz(phi) Ry(theta) Rz(lam)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EulerAngles {
    pub theta: f64,
    pub phi: f64,
    pub lam: f64,
    pub phase: f64,
}

/// Wrap an angle into (-π, π], returning the number of 2π turns removed
fn wrap(x: f64) -> (f64, i64) {
    let k = ((x + PI) / (2.0 * PI)).ceil() as i64 - 1;
    let y = x - 2.0 * PI * k as f64;
    if y <= -PI {
        (y + 2.0 * PI, k - 1)
    } else {
        (y, k)
    }
}

impl EulerAngles {
    pub fn from_matrix(u: &Matrix2<Complex64>) -> EulerAngles {
        let mut phase = det2(u).arg() / 2.0;
        let v = u * Complex64::from_polar(1.0, -phase);
        let (a, b) = (v[(0, 0)], v[(1, 0)]);

        let theta = 2.0 * b.norm().atan2(a.norm());
        let (phi, k0) = wrap(b.arg() - a.arg());
        let (lam, k1) = wrap(-a.arg() - b.arg());

        // Rz(x + 2π) = -Rz(x)
        if (k0 + k1) % 2 != 0 {
            phase += PI;
        }

        EulerAngles {
            theta,
            phi,
            lam,
            phase,
        }
    }

    /// Gates on qubit `q` in time order. The phase is not included.
    pub fn to_gates(&self, q: usize) -> Vec<NativeGate> {
        let mut gates = Vec::with_capacity(3);
        if self.theta.abs() < ANGLE_EPS {
            let (z, _) = wrap(self.phi + self.lam);
            if z.abs() >= ANGLE_EPS {
                gates.push(NativeGate::Rz { q, theta: z });
            }
            return gates;
        }
        if self.lam.abs() >= ANGLE_EPS {
            gates.push(NativeGate::Rz { q, theta: self.lam });
        }
        gates.push(NativeGate::Ry {
            q,
            theta: self.theta,
        });
        if self.phi.abs() >= ANGLE_EPS {
            gates.push(NativeGate::Rz { q, theta: self.phi });
        }
        gates
    }

    /// Phase picked up by [EulerAngles::to_gates] when it folds the two
    /// Z rotations into one
    fn folded_phase(&self) -> f64 {
        if self.theta.abs() < ANGLE_EPS {
            let (_, k) = wrap(self.phi + self.lam);
            if k % 2 != 0 {
                return PI;
            }
        }
        0.0
    }
}

/// Append the Euler decomposition of `u` on qubit `q` to a circuit
pub(super) fn push_one_qubit(c: &mut NativeCircuit, u: &Matrix2<Complex64>, q: usize) {
    let angles = EulerAngles::from_matrix(u);
    for g in angles.to_gates(q) {
        c.push(g);
    }
    c.add_phase(angles.phase + angles.folded_phase());
}

/// Decompose a single-qubit unitary into `Rz Ry Rz` and a global phase
pub fn synthesize_one_qubit(u: &Matrix2<Complex64>) -> NativeCircuit {
    let mut c = NativeCircuit::new(1);
    push_one_qubit(&mut c, u, 0);
    c
}
