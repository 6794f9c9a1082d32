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

//! # Basic ZX-calculus rules
//!
//! These rules always come in triples of functions. For a rule X,
//! there is a function `check_X(&g, ...) -> bool` which checks
//! whether a rule is applicable at the given vertex or vertices,
//! `X_unchecked(&mut g, ...)` applies the rule without doing any
//! checking, and `X(&mut g, ...) -> Result<(), RuleMismatch>` is the
//! composition of the first two.
//!
//! Note calling `X_unchecked` is allowed to make unsound ZX-diagram
//! transformations, or even panic, if `check_X` doesn't return true.

use crate::graph::*;
use crate::phase::Phase;
use crate::rules::{Rule, RuleMismatch};
use crate::scalar::Scalar;
use num::complex::Complex64;
use num::{One, Rational64, Zero};
use rustc_hash::FxHashSet;

/// Define a checked rule that takes 1 vertex
macro_rules! checked_rule1 {
    ( $check:ident, $unchecked:ident, $name:ident, $rule:expr ) => {
        /// A checked implementation of the rule
        ///
        /// Leaves the graph untouched and returns a [RuleMismatch] if the
        /// vertex doesn't exist or the rule doesn't apply.
        pub fn $name(g: &mut impl GraphLike, v: V) -> Result<(), RuleMismatch> {
            if g.contains_vertex(v) && $check(g, v) {
                $unchecked(g, v);
                Ok(())
            } else {
                Err(RuleMismatch::new($rule, vec![v]))
            }
        }
    };
}

/// Define a checked rule that takes 2 vertices
macro_rules! checked_rule2 {
    ( $check:ident, $unchecked:ident, $name:ident, $rule:expr ) => {
        /// A checked implementation of the rule
        ///
        /// Leaves the graph untouched and returns a [RuleMismatch] if a
        /// vertex doesn't exist or the rule doesn't apply.
        pub fn $name(g: &mut impl GraphLike, v0: V, v1: V) -> Result<(), RuleMismatch> {
            if g.contains_vertex(v0) && g.contains_vertex(v1) && $check(g, v0, v1) {
                $unchecked(g, v0, v1);
                Ok(())
            } else {
                Err(RuleMismatch::new($rule, vec![v0, v1]))
            }
        }
    };
}

/// Check [spider_fusion_unchecked] applies
///
/// Both vertices must be Z or X, have the same type, and be connected
/// by a normal (i.e. non-Hadamard) edge.
///
/// ```
/// # use zxreduce::graph::*;
/// # use zxreduce::vec_graph::Graph;
/// # use zxreduce::basic_rules::check_spider_fusion;
/// let mut g = Graph::new();
/// let v0 = g.add_vertex(VType::Z);
/// let v1 = g.add_vertex(VType::Z);
/// let v2 = g.add_vertex(VType::X);
/// g.add_edge(v0, v1, EType::N).unwrap();
/// g.add_edge(v1, v2, EType::N).unwrap();
///
/// assert!(check_spider_fusion(&g, v0, v1));
/// assert!(!check_spider_fusion(&g, v1, v2));
/// ```
pub fn check_spider_fusion(g: &impl GraphLike, v0: V, v1: V) -> bool {
    v0 != v1
        && g.edge_type_opt(v0, v1) == Some(EType::N)
        && g.vertex_type(v0).is_spider()
        && g.vertex_type(v0) == g.vertex_type(v1)
        && g.neighbors(v1)
            .all(|w| w == v0 || g.vertex_type(w).is_spider() || !g.connected(v0, w))
}

/// Apply spider fusion
///
/// Note the first vertex is preserved by the fusion, and the second
/// is deleted.
pub fn spider_fusion_unchecked(g: &mut impl GraphLike, v0: V, v1: V) {
    for (v, et) in g.incident_edge_vec(v1) {
        if v != v0 {
            g.add_edge_smart(v0, v, et);
        }
    }

    g.add_to_phase(v0, g.phase(v1));
    g.remove_vertex(v1);
}

checked_rule2!(
    check_spider_fusion,
    spider_fusion_unchecked,
    spider_fusion,
    Rule::SpiderFusion
);

/// Check [pi_copy_unchecked] applies
pub fn check_pi_copy(g: &impl GraphLike, v: V) -> bool {
    let vt = g.vertex_type(v);
    // Find the opposite color of this spider, or fail
    // if it is not a colored spider.
    let ovt = match vt {
        VType::Z => VType::X,
        VType::X => VType::Z,
        _ => return false,
    };

    // No pi-copy on empty spiders.
    if g.degree(v) == 0 {
        return false;
    }

    // Every neighbor must be the same color and connected by
    // a hadamard edge or the opposite color and connected by a normal edge.
    g.incident_edges(v).all(|(n, et)| match et {
        EType::N => g.vertex_type(n) == ovt,
        EType::H => g.vertex_type(n) == vt,
    })
}

/// Apply a pi-copy
///
/// This will flip the phase of a spider by adding a pi phase
/// to all its neighbours, assuming that they are either the
/// same color and connected by a Hadamard edge, or the opposite
/// color and connected by a normal edge.
pub fn pi_copy_unchecked(g: &mut impl GraphLike, v: V) {
    let phase = g.phase(v);
    g.scalar_mut().mul_phase(phase);
    g.set_phase(v, -phase);

    for neighbor in g.neighbor_vec(v) {
        g.add_to_phase(neighbor, Phase::one());
    }
}

checked_rule1!(check_pi_copy, pi_copy_unchecked, pi_copy, Rule::PiCopy);

/// Check [remove_id_unchecked] applies
pub fn check_remove_id(g: &impl GraphLike, v: V) -> bool {
    if !(g.vertex_type(v).is_spider() && g.phase(v).is_zero() && g.degree(v) == 2) {
        return false;
    }
    let ns = g.neighbor_vec(v);
    !g.connected(ns[0], ns[1])
        || (g.vertex_type(ns[0]).is_spider() && g.vertex_type(ns[1]).is_spider())
}

/// Remove an arity-2 spider with phase 0
///
/// Removes the spider and connects its two neighbors. The type
/// of the resulting edge is the parity of the types of
/// original 2 edges, namely: {N,N} -> N, {N,H} -> H, and
/// {H, H} -> N.
pub fn remove_id_unchecked(g: &mut impl GraphLike, v: V) {
    let nhd = g.incident_edge_vec(v);
    let new_et = EType::merge(nhd[0].1, nhd[1].1);
    g.remove_vertex(v);
    g.add_edge_smart(nhd[0].0, nhd[1].0, new_et);
}

checked_rule1!(
    check_remove_id,
    remove_id_unchecked,
    remove_id,
    Rule::IdRemoval
);

/// Check [color_change_unchecked] applies
pub fn check_color_change(g: &impl GraphLike, v: V) -> bool {
    g.vertex_type(v).is_spider()
}

/// Change the color of a Z or X spider
///
/// All of the neighboring edge types are toggled, i.e. N -> H,
/// H -> N.
pub fn color_change_unchecked(g: &mut impl GraphLike, v: V) {
    let vt = g.vertex_type(v);
    g.set_vertex_type(v, if vt == VType::X { VType::Z } else { VType::X });
    for w in g.neighbor_vec(v) {
        g.toggle_edge_type(v, w);
    }
}

checked_rule1!(
    check_color_change,
    color_change_unchecked,
    color_change,
    Rule::ColorChange
);

/// Check [local_comp_unchecked] applies
///
/// The vertex must be Z, have a phase pi/2 or -pi/2, and be
/// surrounded by H-edges connected to other Z spiders.
pub fn check_local_comp(g: &impl GraphLike, v: V) -> bool {
    g.vertex_type(v) == VType::Z
        && g.phase(v).is_proper_clifford()
        && g.incident_edges(v)
            .all(|(v0, et)| g.vertex_type(v0) == VType::Z && et == EType::H)
}

/// Apply a local complementation
///
/// This is the version that deletes the targeted vertex. In
/// other words, it is an N-ary generalization of the Euler
/// decomposition rule.
pub fn local_comp_unchecked(g: &mut impl GraphLike, v: V) {
    let p = g.phase(v);

    // add a totally connected graph of the nhd of v
    let ns = g.neighbor_vec(v);
    for i in 0..ns.len() {
        g.add_to_phase(ns[i], -p);
        for j in (i + 1)..ns.len() {
            g.add_edge_smart(ns[i], ns[j], EType::H);
        }
    }
    g.remove_vertex(v);

    let x = ns.len() as i32;
    g.scalar_mut().mul_sqrt2_pow(((x - 1) * (x - 2)) / 2);
    g.scalar_mut()
        .mul_phase(Rational64::new(*p.to_rational().numer(), 4));
}

checked_rule1!(
    check_local_comp,
    local_comp_unchecked,
    local_comp,
    Rule::LocalComp
);

/// Check [pivot_unchecked] applies
///
/// Both vertices must be Z, have a phase 0 or pi, and be
/// surrounded by H-edges connected to other Z spiders.
pub fn check_pivot(g: &impl GraphLike, v0: V, v1: V) -> bool {
    v0 != v1
        && g.vertex_type(v0) == VType::Z
        && g.vertex_type(v1) == VType::Z
        && g.edge_type_opt(v0, v1) == Some(EType::H)
        && g.phase(v0).is_pauli()
        && g.phase(v1).is_pauli()
        && g.incident_edges(v0)
            .all(|(w, et)| g.vertex_type(w) == VType::Z && et == EType::H)
        && g.incident_edges(v1)
            .all(|(w, et)| g.vertex_type(w) == VType::Z && et == EType::H)
}

/// Apply pivoting to a pair of vertices
///
/// This is the version that deletes both vertices, so it is
/// effectively a generalised version of the strong complementarity
/// rule.
pub fn pivot_unchecked(g: &mut impl GraphLike, v0: V, v1: V) {
    let p0 = g.phase(v0);
    let p1 = g.phase(v1);

    // add a complete bipartite graph between the neighbors of v0
    // and the neighbors of v1
    let ns0 = g.neighbor_vec(v0);
    let ns1 = g.neighbor_vec(v1);
    for &n0 in &ns0 {
        g.add_to_phase(n0, p1);
        for &n1 in &ns1 {
            if n0 != v1 && n1 != v0 {
                // add_edge_smart handles self-loops on common neighbours
                g.add_edge_smart(n0, n1, EType::H);
            }
        }
    }

    for &n1 in &ns1 {
        g.add_to_phase(n1, p0);
    }

    g.remove_vertex(v0);
    g.remove_vertex(v1);

    let x = ns0.len() as i32;
    let y = ns1.len() as i32;
    g.scalar_mut().mul_sqrt2_pow((x - 2) * (y - 2));

    if !p0.is_zero() && !p1.is_zero() {
        g.scalar_mut().mul_phase(Phase::one());
    }
}

checked_rule2!(check_pivot, pivot_unchecked, pivot, Rule::Pivot);

/// Insert an identity spider so v is no longer adjancent to boundary b
///
/// If b is not a boundary, this is a noop. The new vertex will be connected
/// to v by a Hadamard edge.
pub fn unfuse_boundary(g: &mut impl GraphLike, v: V, b: V) {
    if g.vertex_type(b) != VType::B {
        return;
    }
    let vd = VData {
        ty: VType::Z,
        phase: Phase::zero(),
        row: g.row(v),
        qubit: g.qubit(v),
    };
    let v1 = g.add_vertex_with_data(vd);
    let et = g.edge_type(v, b);
    g.remove_edge(v, b);
    g.add_edge_with_type(v, v1, EType::H);
    g.add_edge_with_type(v1, b, et.opposite());
}

/// Unfuse a non-Pauli phase as a degree-1 phase gadget
///
/// If the vertex already has a Pauli phase, this is a noop.
pub fn unfuse_gadget(g: &mut impl GraphLike, v: V) {
    if g.phase(v).is_pauli() {
        return;
    }
    let vd1 = VData {
        ty: VType::Z,
        phase: Phase::zero(),
        row: g.row(v),
        qubit: -1.0,
    };

    let vd2 = VData {
        ty: VType::Z,
        phase: g.phase(v),
        row: g.row(v),
        qubit: -2.0,
    };
    let v1 = g.add_vertex_with_data(vd1);
    let v2 = g.add_vertex_with_data(vd2);
    g.set_phase(v, Phase::zero());
    g.add_edge_with_type(v, v1, EType::H);
    g.add_edge_with_type(v1, v2, EType::H);
}

/// Check gen_pivot applies
///
/// This checks that we can create a valid matching for the pivot rule
/// by gadgetizing any non-Pauli phases and inserting identities to make
/// both vertices interior. Note that repeatedly applying `gen_pivot` with
/// this checker will not always terminate.
pub fn check_gen_pivot(g: &impl GraphLike, v0: V, v1: V) -> bool {
    if v0 == v1 {
        return false;
    }
    if g.edge_type_opt(v0, v1) != Some(EType::H) {
        return false;
    }

    for &v in &[v0, v1] {
        if g.vertex_type(v) != VType::Z {
            return false;
        }
        for (w, et) in g.incident_edges(v) {
            let t = g.vertex_type(w);
            if !((t == VType::Z && et == EType::H) || t == VType::B) {
                return false;
            }
        }
    }

    true
}

// check that a vertex is interior, has phase 0 or pi, and is not
// a phase gadget
pub fn is_interior_pauli(g: &impl GraphLike, v: V) -> bool {
    g.phase(v).is_pauli()
        && g.neighbors(v)
            .all(|n| g.vertex_type(n) == VType::Z && g.degree(n) > 1)
}

// check that a vertex has phase 0 or pi and touches a boundary
pub fn is_boundary_pauli(g: &impl GraphLike, v: V) -> bool {
    g.phase(v).is_pauli() && g.neighbors(v).any(|n| g.vertex_type(n) == VType::B)
}

/// Check gen_pivot applies and at least one vertex is interior Pauli
///
/// Unlike `check_gen_pivot`, this guarantees applying `gen_pivot` will
/// strictly decrease the number of interior Pauli vertices, hence it
/// will terminate.
pub fn check_gen_pivot_reduce(g: &impl GraphLike, v0: V, v1: V) -> bool {
    check_gen_pivot(g, v0, v1) && (is_interior_pauli(g, v0) || is_interior_pauli(g, v1))
}

pub fn check_boundary_pivot(g: &impl GraphLike, v0: V, v1: V) -> bool {
    check_gen_pivot(g, v0, v1) && is_boundary_pauli(g, v0)
}

/// Generic version of the pivot rule
///
/// This version of the pivoting rule allows either of the vertices
/// to have non-Pauli phases and/or be connected to boundaries. To handle
/// these situations, some spiders are first unfused, such that interior
/// non-Pauli spiders produce phase gadgets and boundary non-Pauli spiders
/// produce phase gates on inputs/outputs.
pub fn gen_pivot_unchecked(g: &mut impl GraphLike, v0: V, v1: V) {
    let nhd0 = g.neighbor_vec(v0);
    unfuse_gadget(g, v0);
    for &n in &nhd0 {
        unfuse_boundary(g, v0, n);
    }

    let nhd1 = g.neighbor_vec(v1);
    unfuse_gadget(g, v1);
    for &n in &nhd1 {
        unfuse_boundary(g, v1, n);
    }

    pivot_unchecked(g, v0, v1);
}

checked_rule2!(
    check_gen_pivot_reduce,
    gen_pivot_unchecked,
    gen_pivot,
    Rule::GenPivot
);
checked_rule2!(
    check_boundary_pivot,
    gen_pivot_unchecked,
    boundary_pivot,
    Rule::GenPivot
);

/// Check [gadget_fusion_unchecked] applies
///
/// Both vertices must be phase-free gadget centres, i.e. Z spiders with
/// exactly one degree-1 neighbour, whose remaining neighbourhoods agree. All
/// edges must be Hadamard edges to Z spiders.
pub fn check_gadget_fusion(g: &impl GraphLike, v0: V, v1: V) -> bool {
    if v0 == v1 || g.connected(v0, v1) {
        return false;
    }

    let vs = [v0, v1];
    let mut nhd = [FxHashSet::default(), FxHashSet::default()];

    for i in 0..2 {
        if g.vertex_type(vs[i]) != VType::Z || !g.phase(vs[i]).is_zero() {
            return false;
        }
        let mut found_gphase = false;
        for (n, et) in g.incident_edges(vs[i]) {
            if et != EType::H || g.vertex_type(n) != VType::Z {
                return false;
            }
            if g.degree(n) == 1 {
                if found_gphase {
                    return false;
                }
                found_gphase = true;
            } else {
                nhd[i].insert(n);
            }
        }

        if !found_gphase {
            return false;
        }
    }

    nhd[0] == nhd[1]
}

/// Fuse the gadget at `v1` into the gadget at `v0`, adding the leaf phases
pub fn gadget_fusion_unchecked(g: &mut impl GraphLike, v0: V, v1: V) {
    let gphase0 = g
        .neighbors(v0)
        .find(|&n| g.degree(n) == 1)
        .expect("v0 isn't a gadget");
    let gphase1 = g
        .neighbors(v1)
        .find(|&n| g.degree(n) == 1)
        .expect("v1 isn't a gadget");
    g.add_to_phase(gphase0, g.phase(gphase1));
    g.remove_vertex(v1);
    g.remove_vertex(gphase1);

    let d = g.degree(v0) as i32;
    g.scalar_mut().mul_sqrt2_pow(2 - d);
}

checked_rule2!(
    check_gadget_fusion,
    gadget_fusion_unchecked,
    gadget_fusion,
    Rule::GadgetFusion
);

/// Check [gadget_pi_unchecked] applies
///
/// `v` must be the leaf of a phase gadget whose centre carries a pi phase.
pub fn check_gadget_pi(g: &impl GraphLike, v: V) -> bool {
    if g.vertex_type(v) != VType::Z || g.degree(v) != 1 {
        return false;
    }
    match g.incident_edges(v).next() {
        Some((w, EType::H)) => g.vertex_type(w) == VType::Z && g.phase(w).is_one(),
        _ => false,
    }
}

/// Move the pi phase off a gadget centre by copying it through the leaf
///
/// The leaf phase is negated and the centre becomes phase-free.
pub fn gadget_pi_unchecked(g: &mut impl GraphLike, v: V) {
    pi_copy_unchecked(g, v);
}

checked_rule1!(check_gadget_pi, gadget_pi_unchecked, gadget_pi, Rule::GadgetPi);

/// Check [remove_hadamard_node_unchecked] applies
///
/// The vertex must be a phase-free arity-2 Hadamard node. If its neighbours
/// are already connected, both must be Z or X spiders so the new edge can be
/// merged into the old one.
pub fn check_hadamard_node(g: &impl GraphLike, v: V) -> bool {
    if g.vertex_type(v) != VType::H || g.degree(v) != 2 || !g.phase(v).is_zero() {
        return false;
    }
    let ns = g.neighbor_vec(v);
    !g.connected(ns[0], ns[1])
        || (g.vertex_type(ns[0]).is_spider() && g.vertex_type(ns[1]).is_spider())
}

/// Replace a Hadamard node by a single edge of the toggled, merged type
pub fn remove_hadamard_node_unchecked(g: &mut impl GraphLike, v: V) {
    let nhd = g.incident_edge_vec(v);
    let et = EType::merge(nhd[0].1, nhd[1].1).opposite();
    g.remove_vertex(v);
    g.add_edge_smart(nhd[0].0, nhd[1].0, et);
}

checked_rule1!(
    check_hadamard_node,
    remove_hadamard_node_unchecked,
    remove_hadamard_node,
    Rule::HadamardNode
);

pub fn check_remove_single(g: &impl GraphLike, v: V) -> bool {
    g.degree(v) == 0 && g.vertex_type(v).is_spider()
}

/// Remove an isolated Z or X vertex and add it as a global scalar
pub fn remove_single_unchecked(g: &mut impl GraphLike, v: V) {
    let p = g.phase(v);
    *g.scalar_mut() *= Scalar::one_plus_phase(p);
    g.remove_vertex(v);
}

checked_rule1!(
    check_remove_single,
    remove_single_unchecked,
    remove_single,
    Rule::RemoveScalar
);

pub fn check_remove_pair(g: &impl GraphLike, v0: V, v1: V) -> bool {
    v0 != v1
        && g.degree(v0) == 1
        && g.degree(v1) == 1
        && g.vertex_type(v0).is_spider()
        && g.vertex_type(v1).is_spider()
        && g.connected(v0, v1)
}

/// Remove an isolated pair of connected Z or X vertices and add it as a global scalar
pub fn remove_pair_unchecked(g: &mut impl GraphLike, v0: V, v1: V) {
    let t0 = g.vertex_type(v0);
    let t1 = g.vertex_type(v1);
    let et = g.edge_type(v0, v1);
    let p0 = g.phase(v0);
    let p1 = g.phase(v1);

    // same color
    if (t0 == t1 && et == EType::N) || (t0 != t1 && et == EType::H) {
        *g.scalar_mut() *= Scalar::one_plus_phase(p0 + p1);
    // different colors
    } else {
        let p2 = Phase::one() + p0 + p1;
        let s: Complex64 = [Phase::zero(), p0, p1, p2]
            .iter()
            .map(|p| Complex64::from_polar(1.0, p.to_radians()))
            .sum();
        *g.scalar_mut() *= Scalar::from_complex(s);
        g.scalar_mut().mul_sqrt2_pow(-1);
    }

    g.remove_vertex(v0);
    g.remove_vertex(v1);
}

checked_rule2!(
    check_remove_pair,
    remove_pair_unchecked,
    remove_pair,
    Rule::RemovePair
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::*;
    use crate::vec_graph::Graph;
    use rstest::rstest;

    #[test]
    fn spider_fusion_simple() {
        let mut g = Graph::new();
        let vs = [
            g.add_vertex(VType::B),
            g.add_vertex(VType::B),
            g.add_vertex(VType::Z),
            g.add_vertex(VType::Z),
            g.add_vertex(VType::B),
            g.add_vertex(VType::B),
            g.add_vertex(VType::B),
        ];

        g.set_phase(vs[2], (1, 2));
        g.set_phase(vs[3], (1, 4));

        g.add_edge_with_type(vs[0], vs[2], EType::N);
        g.add_edge_with_type(vs[1], vs[2], EType::N);
        g.add_edge_with_type(vs[2], vs[3], EType::N);
        g.add_edge_with_type(vs[3], vs[4], EType::N);
        g.add_edge_with_type(vs[3], vs[5], EType::N);
        g.add_edge_with_type(vs[3], vs[6], EType::N);

        g.set_inputs(vec![vs[0], vs[1]]);
        g.set_outputs(vec![vs[4], vs[5], vs[6]]);

        let h = g.clone();
        assert_eq!(spider_fusion(&mut g, vs[2], vs[3]), Ok(()));

        assert_eq!(g.num_vertices(), 6);
        assert_eq!(g.num_edges(), 5);
        assert_eq!(g.degree(vs[2]), 5);
        assert!(Tensor::compare(&g, &h));
        assert_eq!(g.phase(vs[2]), Phase::from((3, 4)));
    }

    #[test]
    fn spider_fusion_smart() {
        // a spider fusion that creates parallel edges, which get
        // removed by complementarity
        let mut g = Graph::new();
        let vs = [
            g.add_vertex(VType::B),
            g.add_vertex(VType::B),
            g.add_vertex(VType::Z),
            g.add_vertex(VType::Z),
            g.add_vertex(VType::X),
            g.add_vertex(VType::B),
            g.add_vertex(VType::B),
        ];

        g.set_phase(vs[2], (1, 2));
        g.set_phase(vs[3], (1, 4));

        g.add_edge_with_type(vs[0], vs[2], EType::N);
        g.add_edge_with_type(vs[1], vs[2], EType::N);
        g.add_edge_with_type(vs[2], vs[3], EType::N);
        g.add_edge_with_type(vs[2], vs[4], EType::N);
        g.add_edge_with_type(vs[3], vs[4], EType::N);
        g.add_edge_with_type(vs[3], vs[5], EType::N);
        g.add_edge_with_type(vs[4], vs[6], EType::N);

        g.set_inputs(vec![vs[0], vs[1]]);
        g.set_outputs(vec![vs[5], vs[6]]);

        let h = g.clone();
        assert_eq!(spider_fusion(&mut g, vs[2], vs[3]), Ok(()));

        assert_eq!(g.num_vertices(), 6);
        assert_eq!(g.num_edges(), 4);
        assert_eq!(g.degree(vs[2]), 3);
        assert_eq!(g.degree(vs[4]), 1);
        assert_eq!(*g.scalar(), Scalar::sqrt2_pow(-2));
        assert!(Tensor::compare(&g, &h));
        assert_eq!(g.phase(vs[2]), Phase::from((3, 4)));
    }

    #[test]
    fn spider_fusion_mismatch() {
        let mut g = Graph::new();
        let z = g.add_vertex(VType::Z);
        let x = g.add_vertex(VType::X);
        g.add_edge_with_type(z, x, EType::N);
        let err = spider_fusion(&mut g, z, x).unwrap_err();
        assert_eq!(err.rule, Rule::SpiderFusion);
        assert_eq!(err.vertices, vec![z, x]);
        assert_eq!(g.num_vertices(), 2);

        assert!(remove_id(&mut g, 7).is_err());
    }

    #[test]
    fn local_comp_1() {
        let mut g = Graph::new();
        g.add_vertex(VType::Z);
        g.set_phase(0, (1, 2));
        g.add_vertex(VType::Z);
        g.add_vertex(VType::Z);
        g.add_vertex(VType::Z);
        g.add_vertex(VType::Z);
        g.add_edge_with_type(0, 1, EType::H);
        g.add_edge_with_type(0, 2, EType::H);
        g.add_edge_with_type(0, 3, EType::H);
        g.add_edge_with_type(0, 4, EType::H);

        let b1 = g.add_vertex(VType::B);
        let b2 = g.add_vertex(VType::B);
        let b3 = g.add_vertex(VType::B);
        let b4 = g.add_vertex(VType::B);
        g.add_edge_with_type(b1, 1, EType::H);
        g.add_edge_with_type(b2, 2, EType::H);
        g.add_edge_with_type(b3, 3, EType::H);
        g.add_edge_with_type(b4, 4, EType::H);
        g.set_inputs(vec![b1, b2]);
        g.set_outputs(vec![b3, b4]);

        let h = g.clone();
        assert!(local_comp(&mut g, 0).is_ok());

        assert_eq!(g.num_vertices(), 8);
        assert_eq!(g.num_edges(), 10);
        assert!(Tensor::compare(&g, &h));

        for i in 1..5 {
            assert_eq!(g.phase(i), Phase::from((-1, 2)));
        }

        assert_eq!(
            *g.scalar(),
            Scalar::sqrt2_pow((4 - 1) * (4 - 2) / 2) * Scalar::from_phase((1, 4))
        );

        assert!(local_comp(&mut g, 1).is_err());
    }

    #[test]
    fn pivot_1() {
        let mut g = Graph::new();

        for _ in 0..7 {
            g.add_vertex(VType::Z);
        }
        g.set_phase(3, 1);
        for i in 0..3 {
            g.add_edge_with_type(i, 3, EType::H);
        }
        g.add_edge_with_type(3, 4, EType::H);
        for i in 5..7 {
            g.add_edge_with_type(4, i, EType::H);
        }

        let mut h = g.clone();
        assert!(pivot(&mut h, 3, 4).is_ok());
        assert!(Tensor::compare(&g, &h));

        assert_eq!(h.num_vertices(), 5);
        assert_eq!(h.num_edges(), 6);
        assert_eq!(h.phase(0), Phase::zero());
        assert_eq!(h.phase(6), Phase::one());

        let mut inputs = Vec::new();
        let mut outputs = Vec::new();
        for i in 0..3 {
            let inp = g.add_vertex(VType::B);
            inputs.push(inp);
            g.add_edge_with_type(i, inp, EType::N);
        }

        for i in 5..7 {
            let outp = g.add_vertex(VType::B);
            outputs.push(outp);
            g.add_edge_with_type(i, outp, EType::N);
        }

        g.set_inputs(inputs);
        g.set_outputs(outputs);

        let mut h = g.clone();
        assert!(pivot(&mut h, 3, 4).is_ok());
        assert!(Tensor::compare(&g, &h));
    }

    #[test]
    fn pivot_2() {
        let mut g = Graph::new();

        for _ in 0..7 {
            g.add_vertex(VType::Z);
        }
        g.set_phase(3, 1);
        g.set_phase(4, 1);
        for i in 0..3 {
            g.add_edge_with_type(i, 3, EType::H);
        }
        g.add_edge_with_type(3, 4, EType::H);
        for i in 5..7 {
            g.add_edge_with_type(4, i, EType::H);
        }

        let h = g.clone();
        assert!(pivot(&mut g, 3, 4).is_ok());

        assert_eq!(g.num_vertices(), 5);
        assert_eq!(g.num_edges(), 6);
        assert_eq!(g.phase(0), Phase::one());
        assert_eq!(g.phase(6), Phase::one());
        assert!(Tensor::compare(&g, &h));
    }

    #[rstest]
    #[case(Phase::zero(), true)]
    #[case(Phase::one(), false)]
    #[case(Phase::from((1, 4)), false)]
    fn gen_pivot_1(#[case] p4: Phase, #[case] boundary: bool) {
        // 0,1,2 -H- 3 -H- 4 -H- 5,6, with 0,1,2 on inputs and 5,6 on outputs
        let mut g = Graph::new();

        for _ in 0..7 {
            g.add_vertex(VType::Z);
        }
        g.set_phase(4, p4);
        for i in 0..3 {
            g.add_edge_with_type(i, 3, EType::H);
        }
        g.add_edge_with_type(3, 4, EType::H);
        for i in 5..7 {
            g.add_edge_with_type(4, i, EType::H);
        }

        let mut inputs = vec![];
        for i in 0..3 {
            let b = g.add_vertex(VType::B);
            g.add_edge_with_type(b, i, EType::N);
            inputs.push(b);
        }
        if boundary {
            let b = g.add_vertex(VType::B);
            g.add_edge_with_type(b, 3, EType::H);
            inputs.push(b);
        }
        let mut outputs = vec![];
        for i in 5..7 {
            let b = g.add_vertex(VType::B);
            g.add_edge_with_type(i, b, EType::N);
            outputs.push(b);
        }
        g.set_inputs(inputs);
        g.set_outputs(outputs);

        if boundary || !p4.is_pauli() {
            let mut h = g.clone();
            assert!(pivot(&mut h, 3, 4).is_err(), "pivot should not match");
        }

        let mut h = g.clone();
        assert!(gen_pivot(&mut h, 3, 4).is_ok(), "gen_pivot should match");
        assert!(!h.contains_vertex(3) && !h.contains_vertex(4));
        assert!(Tensor::compare(&g, &h));
    }

    #[test]
    fn gadget_fusion_1() {
        // fuse gadgets of various sizes
        for n in 1..5 {
            let mut graph = Graph::new();
            let bs: Vec<_> = (0..n).map(|_| graph.add_vertex(VType::B)).collect();
            let vs: Vec<_> = (0..n).map(|_| graph.add_vertex(VType::Z)).collect();
            let gs: Vec<_> = (0..2).map(|_| graph.add_vertex(VType::Z)).collect();
            let ps: Vec<_> = (0..2).map(|_| graph.add_vertex(VType::Z)).collect();
            graph.set_inputs(bs.clone());

            for i in 0..n {
                graph.add_edge_with_type(bs[i], vs[i], EType::N);
            }
            for (&g, &p) in gs.iter().zip(ps.iter()) {
                graph.add_edge_with_type(g, p, EType::H);
                for &v in &vs {
                    graph.add_edge_with_type(v, g, EType::H);
                }
            }

            graph.set_phase(ps[0], (1, 4));
            graph.set_phase(ps[1], (1, 2));

            let h = graph.clone();

            assert!(gadget_fusion(&mut graph, gs[0], gs[1]).is_ok());
            assert_eq!(graph.phase(ps[0]), Phase::from((3, 4)));
            assert!(!graph.contains_vertex(ps[1]));
            assert!(Tensor::compare(&graph, &h));
        }
    }

    #[test]
    fn gadget_fusion_needs_phase_free_centres() {
        let mut g = Graph::new();
        let b = g.add_vertex(VType::B);
        let v = g.add_vertex(VType::Z);
        g.add_edge_with_type(b, v, EType::N);
        g.set_inputs(vec![b]);
        let mut centres = vec![];
        for _ in 0..2 {
            let c = g.add_vertex(VType::Z);
            let l = g.add_vertex_with_phase(VType::Z, (1, 4));
            g.add_edge_with_type(c, l, EType::H);
            g.add_edge_with_type(v, c, EType::H);
            centres.push(c);
        }
        g.set_phase(centres[1], 1);
        assert!(!check_gadget_fusion(&g, centres[0], centres[1]));
    }

    #[test]
    fn gadget_pi_flips_leaf() {
        let mut g = Graph::new();
        let bs: Vec<_> = (0..2).map(|_| g.add_vertex(VType::B)).collect();
        let vs: Vec<_> = (0..2).map(|_| g.add_vertex(VType::Z)).collect();
        for i in 0..2 {
            g.add_edge_with_type(bs[i], vs[i], EType::N);
        }
        let c = g.add_vertex_with_phase(VType::Z, 1);
        let l = g.add_vertex_with_phase(VType::Z, (1, 4));
        g.add_edge_with_type(c, l, EType::H);
        for &v in &vs {
            g.add_edge_with_type(v, c, EType::H);
        }
        g.set_inputs(bs);

        let h = g.clone();
        assert!(!check_gadget_pi(&g, c));
        assert!(gadget_pi(&mut g, l).is_ok());
        assert_eq!(g.phase(c), Phase::zero());
        assert_eq!(g.phase(l), Phase::from((-1, 4)));
        assert!(Tensor::compare(&g, &h));
        assert!(gadget_pi(&mut g, l).is_err());
    }

    #[rstest]
    #[case(EType::N, EType::N)]
    #[case(EType::N, EType::H)]
    #[case(EType::H, EType::H)]
    fn hadamard_node(#[case] e0: EType, #[case] e1: EType) {
        let mut g = Graph::new();
        let b0 = g.add_vertex(VType::B);
        let z = g.add_vertex_with_phase(VType::Z, (1, 4));
        let h = g.add_vertex(VType::H);
        let x = g.add_vertex(VType::X);
        let b1 = g.add_vertex(VType::B);
        g.add_edge_with_type(b0, z, EType::N);
        g.add_edge_with_type(z, h, e0);
        g.add_edge_with_type(h, x, e1);
        g.add_edge_with_type(x, b1, EType::N);
        g.set_inputs(vec![b0]);
        g.set_outputs(vec![b1]);

        let orig = g.clone();
        assert!(remove_hadamard_node(&mut g, h).is_ok());
        assert_eq!(g.num_vertices(), 4);
        assert_eq!(g.edge_type(z, x), EType::merge(e0, e1).opposite());
        assert!(Tensor::compare(&g, &orig));
    }

    #[test]
    fn hadamard_node_parallel() {
        // Z -H- Z plus a Hadamard node between the same spiders: the two
        // Hadamard connections cancel
        let mut g = Graph::new();
        let b0 = g.add_vertex(VType::B);
        let z0 = g.add_vertex(VType::Z);
        let z1 = g.add_vertex(VType::Z);
        let b1 = g.add_vertex(VType::B);
        let h = g.add_vertex(VType::H);
        g.add_edge_with_type(b0, z0, EType::N);
        g.add_edge_with_type(z1, b1, EType::N);
        g.add_edge_with_type(z0, z1, EType::H);
        g.add_edge_with_type(z0, h, EType::N);
        g.add_edge_with_type(h, z1, EType::N);
        g.set_inputs(vec![b0]);
        g.set_outputs(vec![b1]);

        let orig = g.clone();
        assert!(remove_hadamard_node(&mut g, h).is_ok());
        assert!(!g.connected(z0, z1));
        assert!(Tensor::compare(&g, &orig));

        // a Hadamard node between a boundary and a spider it already touches is rejected
        let mut g = Graph::new();
        let b = g.add_vertex(VType::B);
        let z = g.add_vertex(VType::Z);
        let h = g.add_vertex(VType::H);
        g.add_edge_with_type(b, z, EType::N);
        g.add_edge_with_type(b, h, EType::N);
        g.add_edge_with_type(h, z, EType::N);
        assert!(!check_hadamard_node(&g, h));
    }

    #[test]
    fn scalar_rules() {
        for &t in &[VType::Z, VType::X] {
            let mut g = Graph::new();
            g.add_vertex_with_phase(t, (1, 4));
            let mut h = g.clone();
            assert!(remove_single(&mut h, 0).is_ok());
            assert_eq!(h.num_vertices(), 0, "h still has vertices");
            assert!(Tensor::compare(&g, &h));
        }

        for &t0 in &[VType::Z, VType::X] {
            for &t1 in &[VType::Z, VType::X] {
                for &et in &[EType::N, EType::H] {
                    let mut g = Graph::new();
                    g.add_vertex_with_phase(t0, (1, 4));
                    g.add_vertex_with_phase(t1, (-1, 2));
                    g.add_edge_with_type(0, 1, et);
                    let mut h = g.clone();
                    assert!(remove_pair(&mut h, 0, 1).is_ok());
                    assert_eq!(h.num_vertices(), 0, "h still has vertices");
                    assert!(
                        Tensor::compare(&g, &h),
                        "Eq failed on case: {t0:?}, {t1:?}, {et:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn pi_copy_1() {
        let mut g = Graph::new();
        let vs = [
            g.add_vertex_with_phase(VType::Z, 1),
            g.add_vertex_with_phase(VType::Z, (1, 2)),
            g.add_vertex_with_phase(VType::X, (1, 4)),
            g.add_vertex_with_phase(VType::Z, 0),
            g.add_vertex_with_phase(VType::X, (3, 2)),
            g.add_vertex_with_phase(VType::Z, (3, 4)),
            g.add_vertex_with_phase(VType::B, 0),
        ];

        g.set_inputs(vec![vs[6]]);

        g.add_edge_smart(vs[0], vs[1], EType::H);
        g.add_edge_smart(vs[1], vs[2], EType::N);
        g.add_edge_smart(vs[2], vs[3], EType::H);
        g.add_edge_smart(vs[3], vs[4], EType::N);
        g.add_edge_smart(vs[4], vs[5], EType::N);
        g.add_edge_smart(vs[5], vs[6], EType::N);

        assert!(check_pi_copy(&g, vs[0]));
        assert!(check_pi_copy(&g, vs[1]));
        assert!(!check_pi_copy(&g, vs[2]));
        assert!(!check_pi_copy(&g, vs[3]));
        assert!(check_pi_copy(&g, vs[4]));
        assert!(!check_pi_copy(&g, vs[5]));
        assert!(!check_pi_copy(&g, vs[6]));

        let h = g.clone();
        for &v in &[vs[0], vs[1], vs[4]] {
            pi_copy_unchecked(&mut g, v);
            assert!(Tensor::compare(&g, &h));
        }
    }

    #[test]
    fn color_change_is_sound() {
        let mut g = Graph::new();
        let b0 = g.add_vertex(VType::B);
        let x = g.add_vertex_with_phase(VType::X, (1, 4));
        let b1 = g.add_vertex(VType::B);
        g.add_edge_with_type(b0, x, EType::N);
        g.add_edge_with_type(x, b1, EType::H);
        g.set_inputs(vec![b0]);
        g.set_outputs(vec![b1]);
        let h = g.clone();
        assert!(color_change(&mut g, x).is_ok());
        assert!(color_change(&mut g, b0).is_err());
        assert_eq!(g.vertex_type(x), VType::Z);
        assert!(Tensor::compare(&g, &h));
    }
}
