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

//! Exact phases, stored as a rational number of half-turns.

use std::f64::consts::PI;
use std::fmt::{self, Display};
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use num::{One, Rational64, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

/// A phase, expressed in half-turns (multiples of pi).
///
/// The phase is always normalized to be in the range (-1,1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(i64, i64)", into = "(i64, i64)")]
pub struct Phase {
    r: Rational64,
}

impl Phase {
    /// Creates a new phase, normalized to (-1,1].
    pub fn new(r: impl Into<Rational64>) -> Self {
        Self { r: r.into() }.normalize()
    }

    pub fn to_rational(&self) -> Rational64 {
        self.r
    }

    /// Approximates a floating point number of half-turns by a rational phase.
    ///
    /// Returns `None` for non-finite input or values whose best rational
    /// approximation does not fit an `i64` fraction.
    pub fn from_f64(f: f64) -> Option<Self> {
        if !f.is_finite() {
            return None;
        }
        Rational64::approximate_float(f).map(Phase::new)
    }

    /// The phase as a floating point number of half-turns.
    pub fn to_f64(&self) -> f64 {
        self.r.to_f64().unwrap_or(0.0)
    }

    /// The phase as an angle in radians.
    pub fn to_radians(&self) -> f64 {
        self.to_f64() * PI
    }

    /// Normalizes the phase to be in the range (-1,1] by adding or subtracting multiples of 2.
    pub fn normalize(&self) -> Phase {
        let denom = *self.r.denom();
        let mut num = *self.r.numer();
        if -denom < num && num <= denom {
            return *self;
        }
        num = num.rem_euclid(2 * denom);
        if num > denom {
            num -= 2 * denom;
        }
        Phase {
            r: Rational64::new(num, denom),
        }
    }

    /// Returns `true` if the phase is a multiple of 1/2.
    pub fn is_clifford(&self) -> bool {
        self.r.denom().abs() <= 2
    }

    /// Returns `true` if the phase is either -1/2 or 1/2.
    pub fn is_proper_clifford(&self) -> bool {
        self.r.denom().abs() == 2
    }

    /// Returns `true` if the phase is 0 or 1.
    pub fn is_pauli(&self) -> bool {
        self.r.is_integer()
    }

    /// Returns `true` if the phase is an odd multiple of 1/4.
    pub fn is_t(&self) -> bool {
        self.r.denom().abs() == 4
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.r.is_zero() {
            write!(f, "0")
        } else if self.r.is_one() {
            write!(f, "π")
        } else {
            write!(f, "{}π", self.r)
        }
    }
}

impl From<Rational64> for Phase {
    fn from(r: Rational64) -> Phase {
        Phase::new(r)
    }
}

impl From<Phase> for Rational64 {
    fn from(phase: Phase) -> Rational64 {
        phase.to_rational()
    }
}

impl From<i64> for Phase {
    fn from(i: i64) -> Phase {
        Phase::new(Rational64::from_integer(i))
    }
}

impl From<(i64, i64)> for Phase {
    fn from((n, d): (i64, i64)) -> Phase {
        Phase::new(Rational64::new(n, d))
    }
}

impl From<Phase> for (i64, i64) {
    fn from(phase: Phase) -> (i64, i64) {
        (*phase.r.numer(), *phase.r.denom())
    }
}

impl Zero for Phase {
    fn zero() -> Self {
        Phase {
            r: Rational64::zero(),
        }
    }

    fn is_zero(&self) -> bool {
        self.r.is_zero()
    }
}

impl One for Phase {
    fn one() -> Self {
        Phase {
            r: Rational64::one(),
        }
    }

    fn is_one(&self) -> bool {
        self.r.is_one()
    }
}

impl Neg for Phase {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.r)
    }
}

impl Add for Phase {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.r + other.r)
    }
}

impl AddAssign for Phase {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Phase {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.r - other.r)
    }
}

impl SubAssign for Phase {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Mul for Phase {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        Self::new(self.r * other.r)
    }
}

impl Mul<i64> for Phase {
    type Output = Self;

    fn mul(self, other: i64) -> Self {
        Self::new(self.r * other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case((3, 1), (1, 1))]
    #[case((-1, 1), (1, 1))]
    #[case((5, 2), (1, 2))]
    #[case((-3, 2), (1, 2))]
    #[case((7, 4), (-1, 4))]
    #[case((2, 1), (0, 1))]
    fn normalizes_into_half_open_range(#[case] input: (i64, i64), #[case] expected: (i64, i64)) {
        assert_eq!(Phase::from(input), Phase::from(expected));
    }

    #[test]
    fn arithmetic_wraps() {
        let p = Phase::from((3, 4)) + Phase::from((1, 2));
        assert_eq!(p, Phase::from((-3, 4)));
        assert_eq!(-Phase::one(), Phase::one());
        assert_eq!(Phase::from((1, 4)) * 4, Phase::one());
    }

    #[test]
    fn products() {
        assert_eq!(Phase::from((1, 2)) * Phase::from((1, 2)), Phase::from((1, 4)));
        assert_eq!(Phase::from((3, 4)) * Phase::one(), Phase::from((3, 4)));
        assert!(Phase::one().is_one());
        assert!((Phase::from((1, 2)) * Phase::zero()).is_zero());
    }

    #[test]
    fn classification() {
        assert!(Phase::zero().is_pauli());
        assert!(Phase::one().is_pauli());
        assert!(Phase::from((1, 2)).is_proper_clifford());
        assert!(Phase::from((-1, 2)).is_clifford());
        assert!(!Phase::from((1, 2)).is_pauli());
        assert!(Phase::from((3, 4)).is_t());
        assert!(!Phase::from((1, 8)).is_clifford());
    }

    #[test]
    fn float_conversion() {
        assert_eq!(Phase::from_f64(0.25), Some(Phase::from((1, 4))));
        assert_eq!(Phase::from_f64(f64::NAN), None);
        assert!((Phase::from((1, 2)).to_radians() - PI / 2.0).abs() < 1e-12);
    }
}
