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
use approx::AbsDiffEq;
use num::complex::Complex64;
use num::{One, Zero};
use std::f64::consts::SQRT_2;
use std::fmt;
use std::ops::{Mul, MulAssign};

/// The global scalar of a diagram.
///
/// A scalar is stored as `sqrt(2)^k * e^(i pi phase) * factor`. The power of
/// sqrt(2) and the phase are exact. The floating point `factor` is one for
/// every rewrite that only produces monomial scalars, and is used to absorb
/// values such as `1 + e^(i pi a)` for non-Clifford `a`.
#[derive(Debug, Clone, Copy)]
pub struct Scalar {
    sqrt2_pow: i32,
    phase: Phase,
    factor: Complex64,
}

impl Scalar {
    pub fn one() -> Self {
        Scalar {
            sqrt2_pow: 0,
            phase: Phase::zero(),
            factor: Complex64::one(),
        }
    }

    pub fn zero() -> Self {
        Scalar {
            sqrt2_pow: 0,
            phase: Phase::zero(),
            factor: Complex64::zero(),
        }
    }

    /// The scalar `sqrt(2)^p`.
    pub fn sqrt2_pow(p: i32) -> Self {
        Scalar {
            sqrt2_pow: p,
            ..Scalar::one()
        }
    }

    /// The scalar `e^(i pi p)`.
    pub fn from_phase(p: impl Into<Phase>) -> Self {
        Scalar {
            phase: p.into(),
            ..Scalar::one()
        }
    }

    pub fn from_complex(c: Complex64) -> Self {
        Scalar {
            factor: c,
            ..Scalar::one()
        }
    }

    /// The scalar `1 + e^(i pi p)`, exact whenever `p` is a multiple of 1/2.
    pub fn one_plus_phase(p: impl Into<Phase>) -> Self {
        let p: Phase = p.into();
        let r = p.to_rational();
        if p.is_zero() {
            Scalar::sqrt2_pow(2)
        } else if p.is_one() {
            Scalar::zero()
        } else if r == num::Rational64::new(1, 2) || r == num::Rational64::new(-1, 2) {
            let mut s = Scalar::sqrt2_pow(1);
            s.phase = Phase::new(r / 2);
            s
        } else {
            // 1 + e^(i pi p) = e^(i pi p/2) * 2cos(pi p/2)
            let half = Phase::new(r / 2);
            Scalar {
                sqrt2_pow: 0,
                phase: half,
                factor: Complex64::new(2.0 * half.to_radians().cos(), 0.0),
            }
        }
    }

    pub fn mul_sqrt2_pow(&mut self, p: i32) {
        self.sqrt2_pow += p;
    }

    pub fn mul_phase(&mut self, p: impl Into<Phase>) {
        self.phase += p.into();
    }

    pub fn power_of_sqrt2(&self) -> i32 {
        self.sqrt2_pow
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn factor(&self) -> Complex64 {
        self.factor
    }

    pub fn to_complex(&self) -> Complex64 {
        let mag = SQRT_2.powi(self.sqrt2_pow);
        Complex64::from_polar(mag, self.phase.to_radians()) * self.factor
    }

    pub fn is_zero(&self) -> bool {
        self.factor.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.sqrt2_pow == 0 && self.phase.is_zero() && self.factor.is_one()
    }

    pub fn conj(&self) -> Scalar {
        Scalar {
            sqrt2_pow: self.sqrt2_pow,
            phase: -self.phase,
            factor: self.factor.conj(),
        }
    }
}

impl Default for Scalar {
    fn default() -> Self {
        Scalar::one()
    }
}

impl Mul for Scalar {
    type Output = Scalar;

    fn mul(self, rhs: Scalar) -> Scalar {
        Scalar {
            sqrt2_pow: self.sqrt2_pow + rhs.sqrt2_pow,
            phase: self.phase + rhs.phase,
            factor: self.factor * rhs.factor,
        }
    }
}

impl Mul<&Scalar> for Scalar {
    type Output = Scalar;

    fn mul(self, rhs: &Scalar) -> Scalar {
        self * *rhs
    }
}

impl MulAssign for Scalar {
    fn mul_assign(&mut self, rhs: Scalar) {
        *self = *self * rhs;
    }
}

impl MulAssign<&Scalar> for Scalar {
    fn mul_assign(&mut self, rhs: &Scalar) {
        *self = *self * *rhs;
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }
        let mut parts = vec![];
        if self.sqrt2_pow != 0 {
            parts.push(format!("√2^{}", self.sqrt2_pow));
        }
        if !self.phase.is_zero() {
            parts.push(format!("e^(i{})", self.phase));
        }
        if !self.factor.is_one() {
            parts.push(format!("({})", self.factor));
        }
        if parts.is_empty() {
            write!(f, "1")
        } else {
            write!(f, "{}", parts.join(" * "))
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.abs_diff_eq(other, Self::default_epsilon())
    }
}

impl AbsDiffEq for Scalar {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        1e-10
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        (self.to_complex() - other.to_complex()).norm() <= epsilon
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    #[rstest]
    #[case((0, 1))]
    #[case((1, 1))]
    #[case((1, 2))]
    #[case((-1, 2))]
    #[case((1, 4))]
    #[case((-3, 4))]
    #[case((1, 3))]
    fn one_plus_phase_matches_float(#[case] p: (i64, i64)) {
        let p = Phase::from(p);
        let expected = Complex64::one() + Complex64::from_polar(1.0, p.to_radians());
        let s = Scalar::one_plus_phase(p);
        assert!((s.to_complex() - expected).norm() < 1e-12);
    }

    #[test]
    fn exact_cases_stay_monomial() {
        let s = Scalar::one_plus_phase(Phase::from((1, 2)));
        assert_eq!(s.power_of_sqrt2(), 1);
        assert_eq!(s.phase(), Phase::from((1, 4)));
        assert!(s.factor().is_one());
        assert!(Scalar::one_plus_phase(Phase::one()).is_zero());
    }

    #[test]
    fn products() {
        let mut s = Scalar::sqrt2_pow(3);
        s *= Scalar::sqrt2_pow(-1);
        s.mul_phase(Phase::from((1, 2)));
        assert_abs_diff_eq!(s, Scalar::from_complex(Complex64::new(0.0, 2.0)));
        assert!((s.conj().to_complex() - s.to_complex().conj()).norm() < 1e-12);
        assert_eq!(s * Scalar::zero(), Scalar::zero());
    }

    #[test]
    fn display() {
        assert_eq!(Scalar::one().to_string(), "1");
        assert_eq!(Scalar::zero().to_string(), "0");
        assert_eq!(Scalar::sqrt2_pow(-2).to_string(), "√2^-2");
    }
}
