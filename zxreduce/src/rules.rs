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

//! # Rewrite dispatch
//!
//! [Rule] names every rewrite the simplifier knows about. A rule is matched
//! at a [Site] (one vertex, or a pair of vertices) and dispatched to the
//! corresponding triple in [crate::basic_rules].

use crate::basic_rules::*;
use crate::graph::*;
use crate::scalar::Scalar;
use num::Zero;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::mem;

/// The rewrites known to the simplifier.
///
/// `PiCopy` and `ColorChange` never reduce the diagram, so no default
/// priority list contains them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    SpiderFusion,
    IdRemoval,
    LocalComp,
    Pivot,
    GenPivot,
    HadamardNode,
    GadgetFusion,
    GadgetPi,
    RemoveScalar,
    RemovePair,
    PiCopy,
    ColorChange,
}

/// The order in which the full simplifier tries rules.
pub const DEFAULT_PRIORITY: [Rule; 10] = [
    Rule::HadamardNode,
    Rule::IdRemoval,
    Rule::SpiderFusion,
    Rule::Pivot,
    Rule::LocalComp,
    Rule::RemoveScalar,
    Rule::RemovePair,
    Rule::GenPivot,
    Rule::GadgetFusion,
    Rule::GadgetPi,
];

/// Rules that only touch interior Clifford spiders.
pub const INTERIOR_CLIFFORD: [Rule; 6] = [
    Rule::IdRemoval,
    Rule::SpiderFusion,
    Rule::Pivot,
    Rule::LocalComp,
    Rule::RemoveScalar,
    Rule::RemovePair,
];

/// Where a rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Site {
    One(V),
    Two(V, V),
}

impl Site {
    pub fn vertices(&self) -> Vec<V> {
        match *self {
            Site::One(v) => vec![v],
            Site::Two(v0, v1) => vec![v0, v1],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewriteMatch {
    pub rule: Rule,
    pub site: Site,
}

/// The result of applying one rewrite: which rule fired and the scalar it
/// multiplied into the diagram.
#[derive(Debug, Clone, Copy)]
pub struct Rewrite {
    pub rule: Rule,
    pub scalar: Scalar,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{rule} does not apply at {vertices:?}")]
pub struct RuleMismatch {
    pub rule: Rule,
    pub vertices: Vec<V>,
}

impl RuleMismatch {
    pub fn new(rule: Rule, vertices: Vec<V>) -> Self {
        RuleMismatch { rule, vertices }
    }
}

impl Rule {
    /// Number of vertices in a site for this rule.
    pub fn arity(&self) -> usize {
        match self {
            Rule::SpiderFusion
            | Rule::Pivot
            | Rule::GenPivot
            | Rule::GadgetFusion
            | Rule::RemovePair => 2,
            Rule::IdRemoval
            | Rule::LocalComp
            | Rule::HadamardNode
            | Rule::GadgetPi
            | Rule::RemoveScalar
            | Rule::PiCopy
            | Rule::ColorChange => 1,
        }
    }

    /// Whether every application makes the diagram smaller. Only these rules
    /// can be run to a fixed point; π-copy and colour change match any
    /// interior spider forever.
    pub fn is_reducing(&self) -> bool {
        !matches!(self, Rule::PiCopy | Rule::ColorChange)
    }

    /// Local match predicate. Returns `false` on missing vertices or a site of the wrong arity.
    pub fn check(&self, g: &impl GraphLike, site: Site) -> bool {
        match site {
            Site::One(v) => {
                g.contains_vertex(v)
                    && match self {
                        Rule::IdRemoval => check_remove_id(g, v),
                        Rule::LocalComp => check_local_comp(g, v),
                        Rule::HadamardNode => check_hadamard_node(g, v),
                        Rule::GadgetPi => check_gadget_pi(g, v),
                        Rule::RemoveScalar => check_remove_single(g, v),
                        Rule::PiCopy => check_pi_copy(g, v),
                        Rule::ColorChange => check_color_change(g, v),
                        _ => false,
                    }
            }
            Site::Two(v0, v1) => {
                g.contains_vertex(v0)
                    && g.contains_vertex(v1)
                    && match self {
                        Rule::SpiderFusion => check_spider_fusion(g, v0, v1),
                        Rule::Pivot => check_pivot(g, v0, v1),
                        Rule::GenPivot => check_gen_pivot_reduce(g, v0, v1),
                        Rule::GadgetFusion => check_gadget_fusion(g, v0, v1),
                        Rule::RemovePair => check_remove_pair(g, v0, v1),
                        _ => false,
                    }
            }
        }
    }

    /// Checks the rule, then applies it, returning the scalar it produced.
    pub fn apply(&self, g: &mut impl GraphLike, site: Site) -> Result<Rewrite, RuleMismatch> {
        if self.check(g, site) {
            Ok(self.apply_unchecked(g, site))
        } else {
            Err(RuleMismatch::new(*self, site.vertices()))
        }
    }

    /// Applies the rule without checking it.
    ///
    /// May panic or produce an unsound diagram if [Rule::check] is false.
    pub fn apply_unchecked(&self, g: &mut impl GraphLike, site: Site) -> Rewrite {
        let before = mem::replace(g.scalar_mut(), Scalar::one());
        match (self, site) {
            (Rule::IdRemoval, Site::One(v)) => remove_id_unchecked(g, v),
            (Rule::LocalComp, Site::One(v)) => local_comp_unchecked(g, v),
            (Rule::HadamardNode, Site::One(v)) => remove_hadamard_node_unchecked(g, v),
            (Rule::GadgetPi, Site::One(v)) => gadget_pi_unchecked(g, v),
            (Rule::RemoveScalar, Site::One(v)) => remove_single_unchecked(g, v),
            (Rule::PiCopy, Site::One(v)) => pi_copy_unchecked(g, v),
            (Rule::ColorChange, Site::One(v)) => color_change_unchecked(g, v),
            (Rule::SpiderFusion, Site::Two(v0, v1)) => spider_fusion_unchecked(g, v0, v1),
            (Rule::Pivot, Site::Two(v0, v1)) => pivot_unchecked(g, v0, v1),
            (Rule::GenPivot, Site::Two(v0, v1)) => gen_pivot_unchecked(g, v0, v1),
            (Rule::GadgetFusion, Site::Two(v0, v1)) => gadget_fusion_unchecked(g, v0, v1),
            (Rule::RemovePair, Site::Two(v0, v1)) => remove_pair_unchecked(g, v0, v1),
            (rule, site) => panic!("{rule} can't be applied at {site:?}"),
        }
        let delta = *g.scalar();
        *g.scalar_mut() = before * delta;
        Rewrite {
            rule: *self,
            scalar: delta,
        }
    }

    /// Candidate sites for this rule, in a deterministic order.
    ///
    /// Candidates are not guaranteed to match; callers recheck each one
    /// right before applying it, since earlier rewrites may invalidate it.
    pub fn candidates(&self, g: &impl GraphLike) -> Vec<Site> {
        match self {
            Rule::SpiderFusion | Rule::Pivot | Rule::GenPivot | Rule::RemovePair => g
                .edges()
                .filter(|&(s, t, _)| s != t)
                .map(|(s, t, _)| Site::Two(s, t))
                .collect(),
            Rule::GadgetFusion => gadget_candidates(g),
            Rule::GadgetPi => g
                .vertices()
                .filter(|&v| g.degree(v) == 1 && g.vertex_type(v) == VType::Z)
                .map(Site::One)
                .collect(),
            Rule::HadamardNode => g
                .vertices()
                .filter(|&v| g.vertex_type(v) == VType::H)
                .map(Site::One)
                .collect(),
            Rule::IdRemoval
            | Rule::LocalComp
            | Rule::RemoveScalar
            | Rule::PiCopy
            | Rule::ColorChange => g.vertices().map(Site::One).collect(),
        }
    }

    /// First matching site, if any.
    pub fn find(&self, g: &impl GraphLike) -> Option<RewriteMatch> {
        self.candidates(g)
            .into_iter()
            .find(|&site| self.check(g, site))
            .map(|site| RewriteMatch { rule: *self, site })
    }
}

/// Pairs of gadget centres that share a non-leaf neighbourhood. Each group is
/// paired against its first centre, which survives the fusions.
fn gadget_candidates(g: &impl GraphLike) -> Vec<Site> {
    let mut groups: FxHashMap<Vec<V>, Vec<V>> = FxHashMap::default();
    let mut keys: Vec<Vec<V>> = Vec::new();

    for v in g.vertices() {
        if g.degree(v) != 1 || g.vertex_type(v) != VType::Z {
            continue;
        }
        let Some(w) = g.neighbors(v).next() else {
            continue;
        };
        if g.vertex_type(w) != VType::Z || !g.phase(w).is_zero() {
            continue;
        }
        let mut nhd: Vec<V> = g.neighbors(w).filter(|&n| n != v).collect();
        nhd.sort();

        let group = groups.entry(nhd.clone()).or_default();
        if group.is_empty() {
            keys.push(nhd);
        }
        if !group.contains(&w) {
            group.push(w);
        }
    }

    let mut sites = Vec::new();
    for k in keys {
        let gs = &groups[&k];
        for &w in gs.iter().skip(1) {
            sites.push(Site::Two(gs[0], w));
        }
    }
    sites
}

impl RewriteMatch {
    pub fn apply(&self, g: &mut impl GraphLike) -> Result<Rewrite, RuleMismatch> {
        self.rule.apply(g, self.site)
    }
}
