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

//! Dense tensor simulation of diagrams and circuits.
//!
//! Tensors have one index of dimension 2 per boundary: first the inputs in
//! order, then the outputs in order. The entry at `(i, o)` is `<o|U|i>`.
//! This is exponential in the number of open wires and is only meant for
//! checking small examples.

use crate::circuit::Circuit;
use crate::gate::GType::*;
use crate::graph::*;
use crate::phase::Phase;
use crate::synth::{NativeCircuit, NativeGate};
use ndarray::parallel::prelude::*;
use ndarray::prelude::*;
use ndarray::*;
use num::complex::Complex64;
use num::{One, Zero};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::f64::consts::FRAC_1_SQRT_2;
use std::iter::FromIterator;

/// Tensors over floating point complex numbers
pub type Tensor = Array<Complex64, IxDyn>;

/// Absolute tolerance for tensor comparisons, scaled by the largest entry.
const TOLERANCE: f64 = 1e-8;

fn from_phase(p: impl Into<Phase>) -> Complex64 {
    Complex64::from_polar(1.0, p.into().to_radians())
}

/// Conversion of graphs and circuits to tensors
pub trait ToTensor {
    fn to_tensor(&self) -> Tensor;
}

pub trait QubitOps {
    fn ident(q: usize) -> Self;
    fn delta(q: usize) -> Self;
    fn cphase(p: impl Into<Phase>, q: usize) -> Self;
    fn hadamard() -> Self;
    fn delta_at(&mut self, qs: &[usize]);
    fn cphase_at(&mut self, p: impl Into<Phase>, qs: &[usize]);
    fn hadamard_at(&mut self, q: usize);

    /// Apply the 2x2 matrix `m` to index `q`, so that the linear map `M`
    /// read off the tensor becomes `M m`.
    fn apply_at(&mut self, q: usize, m: &[[Complex64; 2]; 2]);

    /// split into two non-overlapping pieces, where index q=0 and q=1
    fn slice_qubit_mut(
        &mut self,
        q: usize,
    ) -> (
        ArrayViewMut<'_, Complex64, IxDyn>,
        ArrayViewMut<'_, Complex64, IxDyn>,
    );
}

pub trait CompareTensors {
    /// Entrywise equality, up to floating point error
    fn approx_eq(t0: &Self, t1: &Self) -> bool;
    /// Equality up to a non-zero global scalar
    fn scalar_eq(t0: &Self, t1: &Self) -> bool;
    fn compare(x0: &impl ToTensor, x1: &impl ToTensor) -> bool;
    fn scalar_compare(x0: &impl ToTensor, x1: &impl ToTensor) -> bool;
}

impl CompareTensors for Tensor {
    fn approx_eq(t0: &Tensor, t1: &Tensor) -> bool {
        if t0.shape() != t1.shape() {
            return false;
        }
        let scale = t0
            .iter()
            .chain(t1.iter())
            .fold(1.0_f64, |m, a| m.max(a.norm()));
        Zip::from(t0)
            .and(t1)
            .all(|a, b| (a - b).norm() <= TOLERANCE * scale)
    }

    fn scalar_eq(t0: &Tensor, t1: &Tensor) -> bool {
        if t0.shape() != t1.shape() {
            return false;
        }

        // pick the largest entry of each tensor as the reference point
        let biggest = |t: &Tensor| {
            t.indexed_iter()
                .max_by(|(_, a), (_, b)| a.norm().total_cmp(&b.norm()))
                .map(|(ix, a)| (ix, *a))
        };
        let zero = |t: &Tensor| t.iter().all(|a| a.norm() <= TOLERANCE);

        match (zero(t0), zero(t1)) {
            (true, true) => true,
            (false, false) => {
                let Some((ix, a0)) = biggest(t0) else {
                    return false;
                };
                let a1 = t1[&ix];
                if a1.norm() <= TOLERANCE {
                    return false;
                }
                let t0s = t0 * (a1 / a0);
                Tensor::approx_eq(&t0s, t1)
            }
            _ => false,
        }
    }

    fn compare(x0: &impl ToTensor, x1: &impl ToTensor) -> bool {
        Tensor::approx_eq(&x0.to_tensor(), &x1.to_tensor())
    }

    fn scalar_compare(x0: &impl ToTensor, x1: &impl ToTensor) -> bool {
        Tensor::scalar_eq(&x0.to_tensor(), &x1.to_tensor())
    }
}

impl QubitOps for Tensor {
    fn slice_qubit_mut(
        &mut self,
        q: usize,
    ) -> (
        ArrayViewMut<'_, Complex64, IxDyn>,
        ArrayViewMut<'_, Complex64, IxDyn>,
    ) {
        let slice = |k: usize| -> SliceInfo<Vec<SliceInfoElem>, IxDyn, IxDyn> {
            SliceInfo::try_from(Vec::from_iter((0..self.ndim()).map(|i| {
                if i == q {
                    SliceInfoElem::from(k as isize)
                } else {
                    SliceInfoElem::from(..)
                }
            })))
            .expect("qubit slices are always valid")
        };
        let (slice0, slice1) = (slice(0), slice(1));
        self.multi_slice_mut((slice0.as_ref(), slice1.as_ref()))
    }

    fn ident(q: usize) -> Tensor {
        Tensor::from_shape_fn(vec![2; q * 2], |ix| {
            if (0..q).all(|i| ix[i] == ix[q + i]) {
                Complex64::one()
            } else {
                Complex64::zero()
            }
        })
    }

    fn delta(q: usize) -> Tensor {
        Tensor::from_shape_fn(vec![2; q], |ix| {
            if (0..q).all(|i| ix[i] == 0) || (0..q).all(|i| ix[i] == 1) {
                Complex64::one()
            } else {
                Complex64::zero()
            }
        })
    }

    fn cphase(p: impl Into<Phase>, q: usize) -> Tensor {
        let mut t = Tensor::ident(q);
        let qs: Vec<_> = (0..q).collect();
        t.cphase_at(p, &qs);
        t
    }

    fn hadamard() -> Tensor {
        let n = Complex64::new(FRAC_1_SQRT_2, 0.0);
        array![[n, n], [n, -n]].into_dyn()
    }

    fn delta_at(&mut self, qs: &[usize]) {
        let mut shape: Vec<usize> = vec![1; self.ndim()];
        for &q in qs {
            shape[q] = 2;
        }
        let del: Tensor = Tensor::delta(qs.len())
            .into_shape_with_order(shape)
            .expect("Bad indices for delta_at");
        *self *= &del;
    }

    fn cphase_at(&mut self, p: impl Into<Phase>, qs: &[usize]) {
        let f = from_phase(p);
        let mut shape: Vec<usize> = vec![1; self.ndim()];
        for &q in qs {
            shape[q] = 2;
        }
        let cp: Tensor = Tensor::from_shape_fn(vec![2; qs.len()], |ix| {
            if (0..qs.len()).all(|i| ix[i] == 1) {
                f
            } else {
                Complex64::one()
            }
        })
        .into_shape_with_order(shape)
        .expect("Bad indices for cphase_at");
        *self *= &cp;
    }

    fn hadamard_at(&mut self, q: usize) {
        let n = FRAC_1_SQRT_2;
        let (mut ma, mut mb) = self.slice_qubit_mut(q);
        par_azip!((a in &mut ma, b in &mut mb) {
            let a1 = *a;
            *a = (*a + *b) * n;
            *b = (a1 - *b) * n;
        });
    }

    fn apply_at(&mut self, q: usize, m: &[[Complex64; 2]; 2]) {
        let m = *m;
        let (mut ma, mut mb) = self.slice_qubit_mut(q);
        par_azip!((a in &mut ma, b in &mut mb) {
            let (s0, s1) = (*a, *b);
            *a = m[0][0] * s0 + m[1][0] * s1;
            *b = m[0][1] * s0 + m[1][1] * s1;
        });
    }
}

/// Replace every Hadamard node by a phase-free Z spider with a Hadamard edge
/// on one side, so the contraction below only sees Z spiders.
fn expand_hadamard_nodes(g: &mut impl GraphLike) {
    for v in g.vertex_vec() {
        if g.vertex_type(v) != VType::H {
            continue;
        }
        let nhd = g.incident_edge_vec(v);
        if nhd.len() != 2 {
            panic!("Hadamard node {v} must have arity 2, found {}", nhd.len());
        }
        let (b, et) = nhd[1];
        g.set_vertex_type(v, VType::Z);
        g.remove_edge(v, b);
        let w = g.add_vertex(VType::Z);
        g.set_row(w, (g.row(v) + g.row(b)) / 2.0);
        g.add_edge_with_type(v, w, EType::H);
        g.add_edge_with_type(w, b, et);
    }
}

impl<G: GraphLike + Clone> ToTensor for G {
    fn to_tensor(&self) -> Tensor {
        let mut g = self.clone();
        expand_hadamard_nodes(&mut g);
        g.x_to_z();

        // initialise the trivial tensor
        let mut a = Tensor::from_shape_vec(vec![], vec![Complex64::one()])
            .expect("a scalar has the empty shape");
        let inp = g.inputs().iter().copied();
        let mut mid: Vec<V> = g
            .vertices()
            .filter(|&v| g.vertex_type(v) != VType::B)
            .collect();
        // contracting in layout order keeps the open wires few
        mid.sort_by(|&v, &w| g.row(v).total_cmp(&g.row(w)));
        let outp = g.outputs().iter().copied();
        let mut vs: Vec<V> = inp.chain(mid).chain(outp).collect();

        if vs.len() < g.num_vertices() {
            panic!("All boundary vertices must be an input or an output");
        }

        vs.reverse();

        let mut indexv: VecDeque<V> = VecDeque::new();
        let mut seenv: FxHashMap<V, usize> = FxHashMap::default();

        for v in vs {
            let p = g.phase(v);

            // tensor product of a new spider (1, e^(i pi p)) with 'a'
            if p.is_zero() {
                a = stack![Axis(0), a, a];
            } else {
                let f = from_phase(p);
                a = stack![Axis(0), a, &a * f];
            }

            indexv.push_front(v);
            let mut deg_v = 0;

            for (w, et) in g.incident_edges(v) {
                if let Some(deg_w) = seenv.get_mut(&w) {
                    deg_v += 1;
                    *deg_w += 1;

                    let wi = indexv
                        .iter()
                        .position(|x| *x == w)
                        .expect("w should be in indexv");

                    if et == EType::N {
                        a.delta_at(&[0, wi]);
                    } else {
                        a.cphase_at(Phase::one(), &[0, wi]);
                        a *= Complex64::new(FRAC_1_SQRT_2, 0.0);
                    }

                    if g.vertex_type(w) != VType::B && g.degree(w) == *deg_w {
                        a = a.sum_axis(Axis(wi));
                        indexv.remove(wi);
                    }
                }
            }

            if g.vertex_type(v) != VType::B && g.degree(v) == deg_v {
                a = a.sum_axis(Axis(0));
                indexv.remove(0);
            }

            seenv.insert(v, deg_v);
        }

        a * g.scalar().to_complex()
    }
}

fn x_matrix() -> [[Complex64; 2]; 2] {
    let (o, l) = (Complex64::zero(), Complex64::one());
    [[o, l], [l, o]]
}

fn y_matrix() -> [[Complex64; 2]; 2] {
    let o = Complex64::zero();
    [[o, -Complex64::i()], [Complex64::i(), o]]
}

fn rz_matrix(theta: f64) -> [[Complex64; 2]; 2] {
    let o = Complex64::zero();
    [
        [Complex64::from_polar(1.0, -theta / 2.0), o],
        [o, Complex64::from_polar(1.0, theta / 2.0)],
    ]
}

fn ry_matrix(theta: f64) -> [[Complex64; 2]; 2] {
    let (c, s) = ((theta / 2.0).cos(), (theta / 2.0).sin());
    [
        [Complex64::new(c, 0.0), Complex64::new(-s, 0.0)],
        [Complex64::new(s, 0.0), Complex64::new(c, 0.0)],
    ]
}

fn cx_at(a: &mut Tensor, c: usize, t: usize) {
    a.hadamard_at(t);
    a.cphase_at(Phase::one(), &[c, t]);
    a.hadamard_at(t);
}

impl ToTensor for Circuit {
    fn to_tensor(&self) -> Tensor {
        let q = self.num_qubits();

        // start with the identity matrix
        let mut a = Tensor::ident(q);

        // gates are applied to the input indices, so they are applied last to first
        for g in self.gates.iter().rev() {
            match g.t {
                ZPhase => a.cphase_at(g.phase, &g.qs),
                Z | CZ => a.cphase_at(Phase::one(), &g.qs),
                S => a.cphase_at((1, 2), &g.qs),
                T => a.cphase_at((1, 4), &g.qs),
                Sdg => a.cphase_at((-1, 2), &g.qs),
                Tdg => a.cphase_at((-1, 4), &g.qs),
                HAD => a.hadamard_at(g.qs[0]),
                NOT => a.apply_at(g.qs[0], &x_matrix()),
                Y => a.apply_at(g.qs[0], &y_matrix()),
                XPhase => {
                    a.hadamard_at(g.qs[0]);
                    a.cphase_at(g.phase, &g.qs);
                    a.hadamard_at(g.qs[0]);
                }
                CNOT => cx_at(&mut a, g.qs[0], g.qs[1]),
                SWAP => a.swap_axes(g.qs[0], g.qs[1]),
            }
        }
        a
    }
}

impl ToTensor for NativeCircuit {
    fn to_tensor(&self) -> Tensor {
        let mut a = Tensor::ident(self.num_qubits());

        for g in self.gates().iter().rev() {
            match *g {
                NativeGate::Rz { q, theta } => a.apply_at(q, &rz_matrix(theta)),
                NativeGate::Ry { q, theta } => a.apply_at(q, &ry_matrix(theta)),
                NativeGate::Cx { c, t } => cx_at(&mut a, c, t),
                NativeGate::Rxx { a: q0, b: q1, theta } => {
                    // Rxx = (H ⊗ H) CX (1 ⊗ Rz) CX (H ⊗ H)
                    a.hadamard_at(q0);
                    a.hadamard_at(q1);
                    cx_at(&mut a, q0, q1);
                    a.apply_at(q1, &rz_matrix(theta));
                    cx_at(&mut a, q0, q1);
                    a.hadamard_at(q0);
                    a.hadamard_at(q1);
                }
            }
        }

        a * Complex64::from_polar(1.0, self.global_phase())
    }
}
