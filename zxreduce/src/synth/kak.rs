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

//! Two-qubit synthesis by the KAK decomposition
//!
//! Every two-qubit unitary can be written as
//!
//! ```text
//! U = e^{iφ} (K1l ⊗ K1r) exp(i(a XX + b YY + c ZZ)) (K2l ⊗ K2r)
//! ```
//!
//! In the magic basis the local gates become real orthogonal matrices and
//! the canonical gate in the middle becomes diagonal, so the decomposition
//! reduces to diagonalising `UpᵀUp` with a real orthogonal matrix. The
//! number of non-zero coefficients `(a, b, c)` is the number of entangling
//! gates needed.

use super::euler::push_one_qubit;
use super::*;
use log::trace;
use nalgebra::Matrix4;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4};

/// Attempts at diagonalising `UpᵀUp` before giving up
const DIAG_RETRIES: usize = 100;

/// Columns are the magic states `Φ+, iΦ-, iΨ+, Ψ-`
fn magic() -> Matrix4<Complex64> {
    let (r, i, o) = (
        Complex64::new(FRAC_1_SQRT_2, 0.0),
        Complex64::new(0.0, FRAC_1_SQRT_2),
        Complex64::new(0.0, 0.0),
    );
    Matrix4::new(
        r, i, o, o, //
        o, o, i, r, //
        o, o, i, -r, //
        r, -i, o, o,
    )
}

/// `exp(i(a XX + b YY + c ZZ))`
pub(crate) fn canonical(a: f64, b: f64, c: f64) -> Matrix4<Complex64> {
    let d = [a - b + c, -a + b + c, a + b - c, -a - b - c];
    let m = magic();
    let diag = Matrix4::from_diagonal(&nalgebra::Vector4::from_fn(|k, _| {
        Complex64::from_polar(1.0, d[k])
    }));
    m * diag * m.adjoint()
}

fn pauli_x() -> Matrix2<Complex64> {
    let (o, l) = (Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0));
    Matrix2::new(o, l, l, o)
}

fn pauli_y() -> Matrix2<Complex64> {
    let (o, i) = (Complex64::new(0.0, 0.0), Complex64::new(0.0, 1.0));
    Matrix2::new(o, -i, i, o)
}

fn pauli_z() -> Matrix2<Complex64> {
    phase_gate(std::f64::consts::PI)
}

/// `exp(i a X)`
fn exp_x(a: f64) -> Matrix2<Complex64> {
    let (s, c) = a.sin_cos();
    Matrix2::new(
        Complex64::new(c, 0.0),
        Complex64::new(0.0, s),
        Complex64::new(0.0, s),
        Complex64::new(c, 0.0),
    )
}

/// `exp(i c Z)`
fn exp_z(c: f64) -> Matrix2<Complex64> {
    rz(-2.0 * c)
}

/// `exp(-i π/4 X)`, which conjugates Y to Z
fn sqrt_x() -> Matrix2<Complex64> {
    exp_x(-FRAC_PI_4)
}

/// Split a local unitary `A ⊗ B` into its factors
fn factor_local(k: &Matrix4<Complex64>) -> (Matrix2<Complex64>, Matrix2<Complex64>) {
    let block = |r: usize, s: usize| -> Matrix2<Complex64> {
        k.fixed_view::<2, 2>(2 * r, 2 * s).into_owned()
    };

    // the largest block is well away from zero
    let mut best = (0, 0);
    let mut best_norm = 0.0;
    for r in 0..2 {
        for s in 0..2 {
            let n = block(r, s).norm();
            if n > best_norm {
                best = (r, s);
                best_norm = n;
            }
        }
    }

    let blk = block(best.0, best.1);
    let b = blk / det2(&blk).sqrt();
    let a = Matrix2::from_fn(|r, s| (block(r, s) * b.adjoint()).trace() / 2.0);
    (a, b)
}

/// The KAK decomposition of a two-qubit unitary, with the coefficients
/// reduced into `[-π/4, π/4]`
#[derive(Debug, Clone, PartialEq)]
pub struct KakDecomposition {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub global_phase: f64,
    pub k1l: Matrix2<Complex64>,
    pub k1r: Matrix2<Complex64>,
    pub k2l: Matrix2<Complex64>,
    pub k2r: Matrix2<Complex64>,
}

impl KakDecomposition {
    pub fn new(u: &Matrix4<Complex64>, tolerance: f64) -> Result<KakDecomposition, SynthError> {
        let deviation = if u.iter().all(|z| z.is_finite()) {
            max_deviation(&(u.adjoint() * u), &Matrix4::identity())
        } else {
            f64::INFINITY
        };
        if deviation > tolerance {
            return Err(SynthError::UnsupportedBlock { deviation });
        }

        let phase0 = u.determinant().arg() / 4.0;
        let us = u * Complex64::from_polar(1.0, -phase0);
        let m = magic();
        let up = m.adjoint() * us * m;
        let m2 = up.transpose() * up;

        // The real and imaginary parts of M2 commute, so a random real
        // combination of them shares their eigenvectors, unless it has
        // accidental degeneracies.
        let mut rng = StdRng::seed_from_u64(2023);
        let mut found = None;
        for attempt in 0..DIAG_RETRIES {
            let x: f64 = rng.random_range(-1.0..1.0);
            let y: f64 = rng.random_range(-1.0..1.0);
            let p = m2.map(|z| x * z.re + y * z.im).symmetric_eigen().eigenvectors;
            let pc = p.map(Complex64::from);
            let dm = pc.transpose() * m2 * pc;
            let off = (0..4)
                .flat_map(|r| (0..4).map(move |s| (r, s)))
                .filter(|(r, s)| r != s)
                .map(|(r, s)| dm[(r, s)].norm())
                .fold(0.0, f64::max);
            if off <= tolerance / 100.0 {
                found = Some((p, dm.diagonal()));
                break;
            }
            trace!("diagonalisation attempt {attempt} off by {off:e}");
        }
        let (mut p, lambda) = found.ok_or(SynthError::DiagonalizationFailed)?;

        let mut d = [0.0; 4];
        for k in 0..3 {
            d[k] = lambda[k].arg() / 2.0;
        }
        d[3] = -(d[0] + d[1] + d[2]);

        if p.determinant() < 0.0 {
            for r in 0..4 {
                p[(r, 3)] = -p[(r, 3)];
            }
        }
        let pc = p.map(Complex64::from);
        let dinv = Matrix4::from_diagonal(&nalgebra::Vector4::from_fn(|k, _| {
            Complex64::from_polar(1.0, -d[k])
        }));
        let o1 = (up * pc * dinv).map(|z| Complex64::from(z.re));

        let (mut k1l, mut k1r) = factor_local(&(m * o1 * m.adjoint()));
        let (mut k2l, mut k2r) = factor_local(&(m * pc.transpose() * m.adjoint()));

        let mut coeffs = [
            (d[0] + d[2]) / 2.0,
            (d[1] + d[2]) / 2.0,
            (d[0] + d[1]) / 2.0,
        ];

        // exp(i kπ/2 PP) = i^k (PP)^k, and the Paulis commute with the
        // canonical gate
        let mut global_phase = phase0;
        let mut pauli: Matrix2<Complex64> = Matrix2::identity();
        for (x, sigma) in coeffs.iter_mut().zip([pauli_x(), pauli_y(), pauli_z()]) {
            let k = (*x / FRAC_PI_2).round();
            *x -= k * FRAC_PI_2;
            global_phase += k * FRAC_PI_2;
            if (k as i64).rem_euclid(2) == 1 {
                pauli *= sigma;
            }
        }
        k2l = pauli * k2l;
        k2r = pauli * k2r;

        // normalise the factors into SU(2)
        for k in [&mut k1l, &mut k1r, &mut k2l, &mut k2r] {
            let det = det2(k);
            *k *= Complex64::from_polar(1.0, -det.arg() / 2.0);
            global_phase += det.arg() / 2.0;
        }

        let [a, b, c] = coeffs;
        Ok(KakDecomposition {
            a,
            b,
            c,
            global_phase,
            k1l,
            k1r,
            k2l,
            k2r,
        })
    }

    /// The unitary described by the decomposition
    pub fn unitary(&self) -> Matrix4<Complex64> {
        kron(&self.k1l, &self.k1r)
            * canonical(self.a, self.b, self.c)
            * kron(&self.k2l, &self.k2r)
            * Complex64::from_polar(1.0, self.global_phase)
    }

    /// Number of coefficients that are non-zero up to `eps`
    pub fn num_nonzero(&self, eps: f64) -> usize {
        [self.a, self.b, self.c]
            .iter()
            .filter(|x| x.abs() > eps)
            .count()
    }
}

/// A piece of a two-qubit circuit, in time order
enum Seg {
    Local(Matrix2<Complex64>, Matrix2<Complex64>),
    Cx,
    Rxx(f64),
}

use Seg::*;

fn ident() -> Matrix2<Complex64> {
    Matrix2::identity()
}

/// Conjugate a segment list: `g⊗g` first, then `inner`, then `g†⊗g†`
fn conjugated(g: Matrix2<Complex64>, inner: Vec<Seg>) -> Vec<Seg> {
    let mut segs = vec![Local(g, g)];
    segs.extend(inner);
    segs.push(Local(g.adjoint(), g.adjoint()));
    segs
}

/// `exp(i(a XX + c ZZ))` with two CX
fn two_cx(a: f64, c: f64) -> Vec<Seg> {
    vec![Cx, Local(exp_x(a), exp_z(c)), Cx]
}

/// `exp(i(a XX + b YY + c ZZ))` with three CX
fn three_cx(a: f64, b: f64, c: f64) -> Vec<Seg> {
    let (h, sdg, s) = (had(), phase_gate(-FRAC_PI_2), phase_gate(FRAC_PI_2));
    vec![
        Cx,
        Local(exp_x(a), exp_z(c)),
        Local(ident(), h),
        Cx,
        Local(ident(), h),
        Local(exp_x(-b), ident()),
        Local(ident(), sdg),
        Cx,
        Local(sdg, s),
    ]
}

/// Segments for the canonical gate over CX, and the phase they add
fn cx_segments(a: f64, b: f64, c: f64, eps: f64) -> (Vec<Seg>, f64) {
    let nz = |x: f64| x.abs() > eps;
    let count = [a, b, c].into_iter().filter(|&x| nz(x)).count();

    if count == 0 {
        return (vec![], 0.0);
    }

    if count == 1 {
        let x = a + b + c;
        if (x.abs() - FRAC_PI_4).abs() <= eps {
            // exp(isπ/4 ZZ) = e^{-isπ/4} (Rz(-sπ/2) ⊗ Rz(-sπ/2)) CZ
            let s = x.signum();
            let h = had();
            let z = rz(-s * FRAC_PI_2);
            let cz = vec![Local(ident(), h), Cx, Local(ident(), h), Local(z, z)];
            let segs = if nz(a) {
                conjugated(h, cz)
            } else if nz(b) {
                conjugated(sqrt_x(), cz)
            } else {
                cz
            };
            return (segs, -s * FRAC_PI_4);
        }
    }

    let segs = if count == 3 {
        three_cx(a, b, c)
    } else if !nz(b) {
        two_cx(a, c)
    } else if !nz(a) {
        // S swaps the roles of XX and YY
        conjugated(phase_gate(FRAC_PI_2), two_cx(b, c))
    } else {
        // exp(-iπ/4 X) swaps the roles of YY and ZZ
        conjugated(sqrt_x(), two_cx(a, b))
    };
    (segs, 0.0)
}

/// Segments for the canonical gate over Rxx
fn rxx_segments(a: f64, b: f64, c: f64, eps: f64) -> Vec<Seg> {
    let mut segs = vec![];
    if a.abs() > eps {
        segs.push(Rxx(-2.0 * a));
    }
    if b.abs() > eps {
        let s = phase_gate(FRAC_PI_2);
        segs.extend(conjugated(s.adjoint(), vec![Rxx(-2.0 * b)]));
    }
    if c.abs() > eps {
        segs.extend(conjugated(had(), vec![Rxx(-2.0 * c)]));
    }
    segs
}

/// Emit segments as native gates, merging runs of local gates
fn emit(segs: Vec<Seg>, phase: f64) -> NativeCircuit {
    let mut c = NativeCircuit::new(2);
    c.add_phase(phase);
    let (mut l, mut r) = (ident(), ident());
    for seg in segs {
        let g = match seg {
            Local(x, y) => {
                l = x * l;
                r = y * r;
                continue;
            }
            Cx => NativeGate::Cx { c: 0, t: 1 },
            Rxx(theta) => NativeGate::Rxx { a: 0, b: 1, theta },
        };
        push_one_qubit(&mut c, &l, 0);
        push_one_qubit(&mut c, &r, 1);
        (l, r) = (ident(), ident());
        c.push(g);
    }
    push_one_qubit(&mut c, &l, 0);
    push_one_qubit(&mut c, &r, 1);
    c
}

/// Synthesise a two-qubit unitary over the native gate set
///
/// The result uses at most three entangling gates and reproduces `u`,
/// including its global phase, to within `cfg.tolerance`.
pub fn synthesize_two_qubit(
    u: &Matrix4<Complex64>,
    cfg: &SynthConfig,
) -> Result<NativeCircuit, SynthError> {
    let kak = KakDecomposition::new(u, cfg.tolerance)?;
    let eps = cfg.tolerance / 10.0;
    let (a, b, c) = (kak.a, kak.b, kak.c);

    let (inner, extra) = match cfg.target {
        NativeTarget::Cx => cx_segments(a, b, c, eps),
        NativeTarget::Rxx => (rxx_segments(a, b, c, eps), 0.0),
    };
    let mut segs = vec![Local(kak.k2l, kak.k2r)];
    segs.extend(inner);
    segs.push(Local(kak.k1l, kak.k1r));

    let circ = emit(segs, kak.global_phase + extra);
    let error = circ
        .two_qubit_unitary()
        .map(|v| max_deviation(&v, u))
        .unwrap_or(f64::INFINITY);
    if error > cfg.tolerance {
        return Err(SynthError::VerificationFailed { error });
    }
    trace!(
        "kak ({a:.4}, {b:.4}, {c:.4}) with {} entangling gates",
        circ.num_entangling()
    );
    Ok(circ)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;
    use std::f64::consts::PI;

    fn random_local(rng: &mut StdRng) -> Matrix2<Complex64> {
        let mut a = || rng.random_range(-PI..PI);
        rz(a()) * ry(a()) * rz(a())
    }

    /// A random two-qubit unitary, as a product of random locals and a
    /// random canonical gate
    fn random_unitary(rng: &mut StdRng) -> Matrix4<Complex64> {
        let k1 = kron(&random_local(rng), &random_local(rng));
        let k2 = kron(&random_local(rng), &random_local(rng));
        let (a, b, c) = (
            rng.random_range(-PI..PI),
            rng.random_range(-PI..PI),
            rng.random_range(-PI..PI),
        );
        let phase = rng.random_range(-PI..PI);
        k1 * canonical(a, b, c) * k2 * Complex64::from_polar(1.0, phase)
    }

    fn check(u: &Matrix4<Complex64>, cfg: &SynthConfig) -> NativeCircuit {
        let c = synthesize_two_qubit(u, cfg).unwrap();
        assert!(c.num_entangling() <= 3);
        let v = c.two_qubit_unitary().unwrap();
        assert_abs_diff_eq!(max_deviation(&v, u), 0.0, epsilon = cfg.tolerance);
        c
    }

    #[test]
    fn magic_basis_is_unitary() {
        let m = magic();
        assert_abs_diff_eq!(
            max_deviation(&(m.adjoint() * m), &Matrix4::identity()),
            0.0,
            epsilon = 1e-15
        );
    }

    #[test]
    fn canonical_is_exp() {
        // exp(iπ/4 XX) = (I + i XX)/√2
        let u = canonical(FRAC_PI_4, 0.0, 0.0);
        let xx = kron(&pauli_x(), &pauli_x());
        let expected = (Matrix4::identity() + xx * Complex64::i()) * Complex64::new(FRAC_1_SQRT_2, 0.0);
        assert_abs_diff_eq!(max_deviation(&u, &expected), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn decomposition_reconstructs() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let u = random_unitary(&mut rng);
            let kak = KakDecomposition::new(&u, 1e-9).unwrap();
            for x in [kak.a, kak.b, kak.c] {
                assert!(x.abs() <= FRAC_PI_4 + 1e-12);
            }
            assert_abs_diff_eq!(max_deviation(&kak.unitary(), &u), 0.0, epsilon = 1e-9);
        }
    }

    #[rstest]
    #[case(NativeTarget::Cx)]
    #[case(NativeTarget::Rxx)]
    fn random_unitaries(#[case] target: NativeTarget) {
        let cfg = SynthConfig {
            target,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(1337);
        for _ in 0..1000 {
            let u = random_unitary(&mut rng);
            check(&u, &cfg);
        }
    }

    #[rstest]
    #[case(Matrix4::identity(), 0)]
    #[case(cx01(), 1)]
    #[case(cx10(), 1)]
    #[case(kron(&ident(), &had()) * cx01() * kron(&ident(), &had()), 1)]
    #[case(swap(), 3)]
    #[case(kron(&had(), &rz(0.3)), 0)]
    #[case(canonical(0.1, 0.0, 0.0), 2)]
    #[case(canonical(0.0, 0.2, -0.3), 2)]
    #[case(canonical(0.3, -0.2, 0.0), 2)]
    #[case(canonical(0.0, -FRAC_PI_4, 0.0), 1)]
    fn known_gates_cx(#[case] u: Matrix4<Complex64>, #[case] entangling: usize) {
        let c = check(&u, &SynthConfig::default());
        assert_eq!(c.num_entangling(), entangling);
    }

    #[rstest]
    #[case(Matrix4::identity(), 0)]
    #[case(cx01(), 1)]
    #[case(rxx(0.7), 1)]
    #[case(swap(), 3)]
    fn known_gates_rxx(#[case] u: Matrix4<Complex64>, #[case] entangling: usize) {
        let cfg = SynthConfig {
            target: NativeTarget::Rxx,
            ..Default::default()
        };
        let c = check(&u, &cfg);
        assert_eq!(c.num_entangling(), entangling);
    }

    #[test]
    fn non_unitary_block() {
        let u = Matrix4::identity() * Complex64::new(1.1, 0.0);
        let err = synthesize_two_qubit(&u, &SynthConfig::default()).unwrap_err();
        match err {
            SynthError::UnsupportedBlock { deviation } => {
                assert_abs_diff_eq!(deviation, 0.21, epsilon = 1e-12)
            }
            e => panic!("unexpected error {e}"),
        }
    }

    #[test]
    fn nan_block() {
        let u = Matrix4::identity() * Complex64::new(f64::NAN, 0.0);
        assert!(matches!(
            synthesize_two_qubit(&u, &SynthConfig::default()),
            Err(SynthError::UnsupportedBlock { .. })
        ));
    }

    #[test]
    fn locals_factor() {
        let mut rng = StdRng::seed_from_u64(5);
        let (a, b) = (random_local(&mut rng), random_local(&mut rng));
        let (a1, b1) = factor_local(&kron(&a, &b));
        assert_abs_diff_eq!(
            max_deviation(&kron(&a1, &b1), &kron(&a, &b)),
            0.0,
            epsilon = 1e-12
        );
    }
}
