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

//! Peephole cleanup of extracted circuits.
//!
//! Extraction leaves behind Hadamard pairs, split phases and CZs conjugated
//! by Hadamards. [basic_optimize] removes these with three local rewrites,
//! each between gates that are adjacent on every wire they share:
//!
//! - a self-inverse gate followed by the same gate cancels,
//! - consecutive Z-phase gates on a wire merge,
//! - `H(t) CZ(c,t) H(t)` becomes `CNOT(c,t)`.
//!
//! All rewrites are exact, so the global phase is preserved.

use crate::circuit::Circuit;
use crate::gate::*;
use crate::phase::Phase;
use log::debug;
use num::{One, Zero};

/// Index of the next gate after `i` acting on qubit `q`
fn next_on(gates: &[Option<Gate>], i: usize, q: usize) -> Option<usize> {
    gates
        .iter()
        .enumerate()
        .skip(i + 1)
        .find(|(_, g)| g.as_ref().is_some_and(|g| g.qs.contains(&q)))
        .map(|(j, _)| j)
}

/// Index of the next gate after `i` that is next on every qubit of gate `i`
fn next_adjacent(gates: &[Option<Gate>], i: usize) -> Option<usize> {
    let g = gates[i].as_ref()?;
    let mut js = g.qs.iter().map(|&q| next_on(gates, i, q));
    let j = js.next()??;
    js.all(|j1| j1 == Some(j)).then_some(j)
}

fn same_qubits(g: &Gate, h: &Gate) -> bool {
    g.qs == h.qs
        || (g.t.is_symmetric() && g.qs.len() == 2 && g.qs[0] == h.qs[1] && g.qs[1] == h.qs[0])
}

/// The simplest gate implementing a Z rotation, or `None` for the identity
fn z_gate(q: usize, p: Phase) -> Option<Gate> {
    let t = if p.is_zero() {
        return None;
    } else if p.is_one() {
        Z
    } else if p == Phase::from((1, 2)) {
        S
    } else if p == Phase::from((-1, 2)) {
        Sdg
    } else if p == Phase::from((1, 4)) {
        T
    } else if p == Phase::from((-1, 4)) {
        Tdg
    } else {
        return Some(Gate::new_with_phase(ZPhase, vec![q], p));
    };
    Some(Gate::new(t, vec![q]))
}

fn cancel_at(gates: &mut [Option<Gate>], i: usize) -> bool {
    let Some(j) = next_adjacent(gates, i) else {
        return false;
    };
    let (Some(g), Some(h)) = (&gates[i], &gates[j]) else {
        return false;
    };
    if g.t.is_self_inverse() && g.t == h.t && same_qubits(g, h) {
        gates[i] = None;
        gates[j] = None;
        true
    } else {
        false
    }
}

fn merge_phases_at(gates: &mut [Option<Gate>], i: usize) -> bool {
    let Some(g) = &gates[i] else {
        return false;
    };
    let (Some(p0), q) = (g.z_phase(), g.qs[0]) else {
        return false;
    };
    let Some(j) = next_on(gates, i, q) else {
        return false;
    };
    let Some(p1) = gates[j].as_ref().and_then(|h| h.z_phase()) else {
        return false;
    };
    gates[i] = None;
    gates[j] = z_gate(q, p0 + p1);
    true
}

fn had_cz_had_at(gates: &mut [Option<Gate>], i: usize) -> bool {
    let Some(g) = &gates[i] else {
        return false;
    };
    if g.t != HAD {
        return false;
    }
    let t = g.qs[0];
    let Some(j) = next_on(gates, i, t) else {
        return false;
    };
    let c = match &gates[j] {
        Some(h) if h.t == CZ => {
            if h.qs[0] == t {
                h.qs[1]
            } else {
                h.qs[0]
            }
        }
        _ => return false,
    };
    let Some(k) = next_on(gates, j, t) else {
        return false;
    };
    if !gates[k].as_ref().is_some_and(|h| h.t == HAD) {
        return false;
    }
    gates[i] = None;
    gates[j] = Some(Gate::new(CNOT, vec![c, t]));
    gates[k] = None;
    true
}

/// Apply the peephole rewrites until none match
///
/// Returns the number of rewrites applied.
pub fn basic_optimize(c: &mut Circuit) -> usize {
    let mut gates: Vec<Option<Gate>> = c.gates.drain(..).map(Some).collect();
    let before = gates.len();
    let mut count = 0;

    loop {
        let mut m = false;
        for i in 0..gates.len() {
            if cancel_at(&mut gates, i)
                || merge_phases_at(&mut gates, i)
                || had_cz_had_at(&mut gates, i)
            {
                count += 1;
                m = true;
            }
        }
        if !m {
            break;
        }
    }

    c.gates = gates.into_iter().flatten().collect();
    debug!(
        "peephole: {} rewrites, {} -> {} gates",
        count,
        before,
        c.num_gates()
    );
    count
}
