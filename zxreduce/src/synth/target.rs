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

use super::blocks::lower;
use super::*;
use crate::circuit::Circuit;
use std::ops::Deref;

impl NativeTarget {
    /// Whether `g` belongs to this gate set. Single-qubit rotations are
    /// always native.
    pub fn supports(&self, g: &NativeGate) -> bool {
        match g {
            NativeGate::Rz { .. } | NativeGate::Ry { .. } => true,
            NativeGate::Cx { .. } => *self == NativeTarget::Cx,
            NativeGate::Rxx { .. } => *self == NativeTarget::Rxx,
        }
    }

    /// Check that every gate of `c` is native and acts on valid, distinct qubits.
    pub fn check(&self, c: &NativeCircuit) -> Result<(), SynthError> {
        let n = c.num_qubits();
        for &gate in c.gates() {
            let ok = self.supports(&gate)
                && match gate {
                    NativeGate::Rz { q, .. } | NativeGate::Ry { q, .. } => q < n,
                    NativeGate::Cx { c: a, t: b } | NativeGate::Rxx { a, b, .. } => {
                        a < n && b < n && a != b
                    }
                };
            if !ok {
                return Err(SynthError::UnsupportedGate {
                    gate,
                    target: *self,
                });
            }
        }
        Ok(())
    }
}

/// A native circuit that is known to stay inside the gate set of its target
///
/// It can only be built by checking a circuit against a target, or by
/// [transpile]. It dereferences to the underlying [NativeCircuit].
#[derive(Debug, Clone, PartialEq)]
pub struct Transpiled {
    target: NativeTarget,
    circuit: NativeCircuit,
}

impl Transpiled {
    pub fn new(circuit: NativeCircuit, target: NativeTarget) -> Result<Transpiled, SynthError> {
        target.check(&circuit)?;
        Ok(Transpiled { target, circuit })
    }

    pub fn target(&self) -> NativeTarget {
        self.target
    }

    pub fn native(&self) -> &NativeCircuit {
        &self.circuit
    }

    pub fn into_inner(self) -> NativeCircuit {
        self.circuit
    }

    /// Check that every entangling gate acts on a pair of qubits that
    /// `connected` accepts. Lowering does not route, so this only reports
    /// the first offending pair.
    pub fn check_coupling(
        &self,
        connected: impl Fn(usize, usize) -> bool,
    ) -> Result<(), SynthError> {
        for g in self.circuit.gates() {
            if let NativeGate::Cx { c: a, t: b } | NativeGate::Rxx { a, b, .. } = *g {
                if !connected(a, b) {
                    return Err(SynthError::Disconnected { a, b });
                }
            }
        }
        Ok(())
    }
}

impl Deref for Transpiled {
    type Target = NativeCircuit;

    fn deref(&self) -> &NativeCircuit {
        &self.circuit
    }
}

/// [lower] a circuit and tag the result with its target
pub fn transpile(circuit: &Circuit, cfg: &SynthConfig) -> Result<Transpiled, SynthError> {
    Ok(Transpiled {
        target: cfg.target,
        circuit: lower(circuit, cfg)?,
    })
}
