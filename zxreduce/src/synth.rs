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

//! Lowering of circuits to a native gate set.
//!
//! The native gate set is `Rz`, `Ry` and one entangling gate, either the
//! fixed-angle CX or the arbitrary-angle `Rxx`, chosen by [NativeTarget].
//! Single-qubit unitaries are decomposed into ZYZ Euler angles, and
//! two-qubit unitaries by the KAK (Cartan) decomposition, which needs at
//! most three entangling gates.
//!
//! Matrices follow the usual big-endian convention: the first qubit of a
//! block is the left tensor factor.

mod blocks;
mod euler;
mod kak;
mod target;

pub use blocks::lower;
pub use euler::{synthesize_one_qubit, EulerAngles};
pub use kak::{synthesize_two_qubit, KakDecomposition};
pub use target::{transpile, Transpiled};

use nalgebra::{Matrix2, Matrix4};
use num::complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The entangling gate of the native gate set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeTarget {
    #[default]
    Cx,
    Rxx,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Largest entry-wise error accepted for unitarity and reconstruction
    pub tolerance: f64,
    pub target: NativeTarget,
}

impl Default for SynthConfig {
    fn default() -> Self {
        SynthConfig {
            tolerance: 1e-9,
            target: NativeTarget::default(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SynthError {
    #[error("block is not unitary (deviation {deviation:e})")]
    UnsupportedBlock { deviation: f64 },
    #[error("could not diagonalize the magic-basis square of the block")]
    DiagonalizationFailed,
    #[error("synthesized block differs from its unitary by {error:e}")]
    VerificationFailed { error: f64 },
    #[error("{gate} is not a valid {target:?} gate")]
    UnsupportedGate {
        gate: NativeGate,
        target: NativeTarget,
    },
    #[error("qubits {a} and {b} are not coupled")]
    Disconnected { a: usize, b: usize },
}

/// A gate of the native gate set. Angles are in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NativeGate {
    /// `exp(-i theta Z / 2)`
    Rz { q: usize, theta: f64 },
    /// `exp(-i theta Y / 2)`
    Ry { q: usize, theta: f64 },
    Cx { c: usize, t: usize },
    /// `exp(-i theta XX / 2)`
    Rxx { a: usize, b: usize, theta: f64 },
}

impl NativeGate {
    pub fn is_entangling(&self) -> bool {
        matches!(self, NativeGate::Cx { .. } | NativeGate::Rxx { .. })
    }

    /// Relabel the qubits of the gate
    pub fn map_qubits(self, f: impl Fn(usize) -> usize) -> NativeGate {
        match self {
            NativeGate::Rz { q, theta } => NativeGate::Rz { q: f(q), theta },
            NativeGate::Ry { q, theta } => NativeGate::Ry { q: f(q), theta },
            NativeGate::Cx { c, t } => NativeGate::Cx { c: f(c), t: f(t) },
            NativeGate::Rxx { a, b, theta } => NativeGate::Rxx {
                a: f(a),
                b: f(b),
                theta,
            },
        }
    }
}

impl fmt::Display for NativeGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeGate::Rz { q, theta } => write!(f, "rz({theta}) {q}"),
            NativeGate::Ry { q, theta } => write!(f, "ry({theta}) {q}"),
            NativeGate::Cx { c, t } => write!(f, "cx {c} {t}"),
            NativeGate::Rxx { a, b, theta } => write!(f, "rxx({theta}) {a} {b}"),
        }
    }
}

/// A circuit over the native gate set, with a global phase in radians
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NativeCircuit {
    nqubits: usize,
    gates: Vec<NativeGate>,
    global_phase: f64,
}

impl NativeCircuit {
    pub fn new(nqubits: usize) -> NativeCircuit {
        NativeCircuit {
            nqubits,
            gates: Vec::new(),
            global_phase: 0.0,
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.nqubits
    }

    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    pub fn gates(&self) -> &[NativeGate] {
        &self.gates
    }

    pub fn global_phase(&self) -> f64 {
        self.global_phase
    }

    pub fn push(&mut self, g: NativeGate) {
        self.gates.push(g);
    }

    pub fn add_phase(&mut self, phase: f64) {
        self.global_phase += phase;
    }

    /// Append all gates of `other`, relabelling its qubits with `f`
    pub fn append_mapped(&mut self, other: &NativeCircuit, f: impl Fn(usize) -> usize) {
        self.gates
            .extend(other.gates.iter().map(|g| g.map_qubits(&f)));
        self.global_phase += other.global_phase;
    }

    pub fn num_entangling(&self) -> usize {
        self.gates.iter().filter(|g| g.is_entangling()).count()
    }

    /// The unitary of a circuit on at most two qubits, with qubit 0 as the
    /// left tensor factor
    pub fn two_qubit_unitary(&self) -> Option<Matrix4<Complex64>> {
        if self.nqubits > 2 {
            return None;
        }
        let mut u = Matrix4::identity();
        for g in &self.gates {
            let m = match *g {
                NativeGate::Rz { q, theta } => embed(&rz(theta), q),
                NativeGate::Ry { q, theta } => embed(&ry(theta), q),
                NativeGate::Cx { c: 0, t: 1 } => cx01(),
                NativeGate::Cx { c: 1, t: 0 } => cx10(),
                NativeGate::Rxx { theta, .. } => rxx(theta),
                NativeGate::Cx { .. } => return None,
            };
            u = m * u;
        }
        Some(u * Complex64::from_polar(1.0, self.global_phase))
    }
}

impl fmt::Display for NativeCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "native circuit on {} qubits, phase {}",
            self.nqubits, self.global_phase
        )?;
        for g in &self.gates {
            writeln!(f, "  {g}")?;
        }
        Ok(())
    }
}

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

pub(crate) fn kron(a: &Matrix2<Complex64>, b: &Matrix2<Complex64>) -> Matrix4<Complex64> {
    Matrix4::from_fn(|r, s| a[(r / 2, s / 2)] * b[(r % 2, s % 2)])
}

pub(crate) fn det2(m: &Matrix2<Complex64>) -> Complex64 {
    m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)]
}

/// A single-qubit matrix acting on qubit `q` of a pair
pub(crate) fn embed(m: &Matrix2<Complex64>, q: usize) -> Matrix4<Complex64> {
    if q == 0 {
        kron(m, &Matrix2::identity())
    } else {
        kron(&Matrix2::identity(), m)
    }
}

/// Largest entry-wise difference of two matrices
pub(crate) fn max_deviation<const N: usize>(
    a: &nalgebra::SMatrix<Complex64, N, N>,
    b: &nalgebra::SMatrix<Complex64, N, N>,
) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).norm())
        .fold(0.0, f64::max)
}

pub(crate) fn rz(theta: f64) -> Matrix2<Complex64> {
    Matrix2::new(
        Complex64::from_polar(1.0, -theta / 2.0),
        c(0.0, 0.0),
        c(0.0, 0.0),
        Complex64::from_polar(1.0, theta / 2.0),
    )
}

pub(crate) fn ry(theta: f64) -> Matrix2<Complex64> {
    let (s, co) = (theta / 2.0).sin_cos();
    Matrix2::new(c(co, 0.0), c(-s, 0.0), c(s, 0.0), c(co, 0.0))
}

pub(crate) fn had() -> Matrix2<Complex64> {
    let r = std::f64::consts::FRAC_1_SQRT_2;
    Matrix2::new(c(r, 0.0), c(r, 0.0), c(r, 0.0), c(-r, 0.0))
}

/// `diag(1, e^{i theta})`
pub(crate) fn phase_gate(theta: f64) -> Matrix2<Complex64> {
    Matrix2::new(
        c(1.0, 0.0),
        c(0.0, 0.0),
        c(0.0, 0.0),
        Complex64::from_polar(1.0, theta),
    )
}

pub(crate) fn cx01() -> Matrix4<Complex64> {
    let mut m = Matrix4::zeros();
    for (r, s) in [(0, 0), (1, 1), (2, 3), (3, 2)] {
        m[(r, s)] = c(1.0, 0.0);
    }
    m
}

pub(crate) fn cx10() -> Matrix4<Complex64> {
    let mut m = Matrix4::zeros();
    for (r, s) in [(0, 0), (1, 3), (2, 2), (3, 1)] {
        m[(r, s)] = c(1.0, 0.0);
    }
    m
}

pub(crate) fn swap() -> Matrix4<Complex64> {
    let mut m = Matrix4::zeros();
    for (r, s) in [(0, 0), (1, 2), (2, 1), (3, 3)] {
        m[(r, s)] = c(1.0, 0.0);
    }
    m
}

/// `exp(-i theta XX / 2)`
pub(crate) fn rxx(theta: f64) -> Matrix4<Complex64> {
    let (s, co) = (theta / 2.0).sin_cos();
    let mut m = Matrix4::identity() * c(co, 0.0);
    for (r, t) in [(0, 3), (1, 2), (2, 1), (3, 0)] {
        m[(r, t)] = c(0.0, -s);
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::*;
    use approx::assert_abs_diff_eq;

    fn assert_close(a: &Matrix4<Complex64>, b: &Matrix4<Complex64>) {
        assert_abs_diff_eq!(max_deviation(a, b), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn rxx_from_cx() {
        let mut c = NativeCircuit::new(2);
        c.push(NativeGate::Cx { c: 0, t: 1 });
        c.push(NativeGate::Rz { q: 1, theta: 0.3 });
        c.push(NativeGate::Cx { c: 0, t: 1 });
        let zz = c.two_qubit_unitary().unwrap();
        let hh = kron(&had(), &had());
        assert_close(&(hh * zz * hh), &rxx(0.3));
    }

    #[test]
    fn cx_orientation() {
        let h = kron(&had(), &had());
        assert_close(&(h * cx01() * h), &cx10());
        assert_close(&(cx01() * cx10() * cx01()), &swap());
    }

    #[test]
    fn unitary_matches_tensor() {
        let mut c = NativeCircuit::new(2);
        c.push(NativeGate::Ry { q: 0, theta: 0.7 });
        c.push(NativeGate::Cx { c: 1, t: 0 });
        c.push(NativeGate::Rz { q: 1, theta: -1.1 });
        c.push(NativeGate::Rxx { a: 0, b: 1, theta: 0.4 });
        c.add_phase(0.25);
        let u = c.two_qubit_unitary().unwrap();

        // tensor indices are (in0, in1, out0, out1)
        let t = c.to_tensor();
        for i in 0..4 {
            for o in 0..4 {
                let x = t[&[i >> 1, i & 1, o >> 1, o & 1][..]];
                assert_abs_diff_eq!((x - u[(o, i)]).norm(), 0.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn three_qubits_have_no_matrix() {
        let mut c = NativeCircuit::new(3);
        c.push(NativeGate::Cx { c: 0, t: 2 });
        assert_eq!(c.two_qubit_unitary(), None);
        assert_eq!(c.num_entangling(), 1);
    }

    #[test]
    fn config_serde() {
        let cfg: SynthConfig = serde_json::from_str(r#"{"target":"rxx"}"#).unwrap();
        assert_eq!(cfg.target, NativeTarget::Rxx);
        assert_eq!(cfg.tolerance, 1e-9);
    }
}
