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

use crate::budget::{Budget, Halt};
use crate::graph::*;
use crate::rules::{Rule, DEFAULT_PRIORITY};
use crate::scalar::Scalar;
use log::{debug, error, trace, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::mem;
use std::time::Duration;

/// Apply `rule` at every matching site until nothing matches.
///
/// Candidates are collected once per pass and rechecked right before each
/// application, since earlier rewrites in the same pass may have changed or
/// removed them. Rules that are not [Rule::is_reducing] get a single pass.
pub fn rule_simp(g: &mut impl GraphLike, rule: Rule) -> bool {
    let mut got_match = false;
    loop {
        let mut new_matches = false;
        for site in rule.candidates(g) {
            if rule.check(g, site) {
                rule.apply_unchecked(g, site);
                new_matches = true;
            }
        }
        got_match |= new_matches;
        if !new_matches || !rule.is_reducing() {
            break;
        }
    }
    got_match
}

pub fn id_simp(g: &mut impl GraphLike) -> bool {
    rule_simp(g, Rule::IdRemoval)
}

pub fn local_comp_simp(g: &mut impl GraphLike) -> bool {
    rule_simp(g, Rule::LocalComp)
}

pub fn spider_simp(g: &mut impl GraphLike) -> bool {
    rule_simp(g, Rule::SpiderFusion)
}

pub fn pivot_simp(g: &mut impl GraphLike) -> bool {
    rule_simp(g, Rule::Pivot)
}

pub fn gen_pivot_simp(g: &mut impl GraphLike) -> bool {
    rule_simp(g, Rule::GenPivot)
}

pub fn hadamard_simp(g: &mut impl GraphLike) -> bool {
    rule_simp(g, Rule::HadamardNode)
}

pub fn scalar_simp(g: &mut impl GraphLike) -> bool {
    let mut m = rule_simp(g, Rule::RemoveScalar);
    m = rule_simp(g, Rule::RemovePair) || m;
    m
}

/// Fuse all phase gadgets that act on the same set of spiders
pub fn fuse_gadgets(g: &mut impl GraphLike) -> bool {
    rule_simp(g, Rule::GadgetFusion)
}

/// Perform pi-copies to remove all pi phases from the
/// centers of phase gadgets.
pub fn remove_gadget_pi(g: &mut impl GraphLike) -> bool {
    rule_simp(g, Rule::GadgetPi)
}

/// Bring a diagram into graph-like form: no Hadamard nodes, only Z spiders,
/// and no plain edges between spiders.
pub fn to_graph_like(g: &mut impl GraphLike) {
    hadamard_simp(g);
    spider_simp(g);
    g.x_to_z();
    spider_simp(g);
}

pub fn interior_clifford_simp(g: &mut impl GraphLike) -> bool {
    to_graph_like(g);
    let mut got_match = false;
    let mut m = true;
    while m {
        m = id_simp(g);
        m = spider_simp(g) || m;
        m = pivot_simp(g) || m;
        m = local_comp_simp(g) || m;
        m = scalar_simp(g) || m;
        if m {
            got_match = true;
        }
    }

    got_match
}

pub fn clifford_simp(g: &mut impl GraphLike) -> bool {
    let mut got_match = false;
    let mut m = true;
    while m {
        m = interior_clifford_simp(g);
        m = gen_pivot_simp(g) || m;
        if m {
            got_match = true;
        }
    }

    got_match
}

pub fn full_simp(g: &mut impl GraphLike) -> bool {
    let mut got_match = false;
    let mut m = true;
    while m {
        m = clifford_simp(g);
        m = fuse_gadgets(g) || m;
        m = remove_gadget_pi(g) || m;
        if m {
            got_match = true;
        }
    }

    got_match
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimplifyMode {
    /// Run to the fixed point
    #[default]
    Full,
    /// Stop after the given number of rewrites
    Bounded(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplifyConfig {
    pub mode: SimplifyMode,
    /// Rules in the order they are tried on each sweep
    pub priority: Vec<Rule>,
    pub max_rewrites: Option<usize>,
    pub timeout_ms: Option<u64>,
}

impl Default for SimplifyConfig {
    fn default() -> Self {
        SimplifyConfig {
            mode: SimplifyMode::Full,
            priority: DEFAULT_PRIORITY.to_vec(),
            max_rewrites: None,
            timeout_ms: None,
        }
    }
}

impl SimplifyConfig {
    fn rewrite_limit(&self) -> Option<usize> {
        let bounded = match self.mode {
            SimplifyMode::Full => None,
            SimplifyMode::Bounded(n) => Some(n),
        };
        match (bounded, self.max_rewrites) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

/// What a simplifier run did.
#[derive(Debug, Clone)]
pub struct SimplifyReport {
    /// Number of rewrites applied after the graph-like prologue
    pub rewrites: usize,
    pub per_rule: BTreeMap<Rule, usize>,
    /// Product of the scalars produced by every rewrite in the run
    pub scalar: Scalar,
    /// Why the run stopped early, if it did
    pub halted: Option<Halt>,
    /// Sites that matched but then failed to apply. Non-zero only if a rule's
    /// check and its application disagree.
    pub mismatches: usize,
}

/// Priority-driven simplifier
///
/// Each sweep applies every rule in the configured priority order to its
/// own fixed point. Sweeps repeat until one matches nothing, or the rewrite
/// limit or budget is hit. The diagram is sound at every point where the run
/// can stop.
pub struct Simplifier<'a, G: GraphLike> {
    g: &'a mut G,
    config: SimplifyConfig,
    budget: Budget,
    rewrites: usize,
    mismatches: usize,
    per_rule: BTreeMap<Rule, usize>,
}

impl<'a, G: GraphLike> Simplifier<'a, G> {
    pub fn new(g: &'a mut G) -> Self {
        Simplifier {
            g,
            config: SimplifyConfig::default(),
            budget: Budget::unlimited(),
            rewrites: 0,
            mismatches: 0,
            per_rule: BTreeMap::new(),
        }
    }

    pub fn with_config(mut self, config: &SimplifyConfig) -> Self {
        self.config = config.clone();
        self
    }

    pub fn with_budget(mut self, budget: Budget) -> Self {
        self.budget = budget;
        self
    }

    pub fn run(mut self) -> SimplifyReport {
        let budget = match self.config.timeout_ms {
            Some(ms) => self.budget.clone().with_timeout(Duration::from_millis(ms)),
            None => self.budget.clone(),
        };
        let limit = self.config.rewrite_limit();
        let before = mem::replace(self.g.scalar_mut(), Scalar::one());

        to_graph_like(&mut *self.g);

        let (priority, skipped): (Vec<Rule>, Vec<Rule>) = self
            .config
            .priority
            .iter()
            .copied()
            .partition(|r| r.is_reducing());
        if !skipped.is_empty() {
            warn!("skipping rules with no fixed point: {skipped:?}");
        }
        let mut halted = None;
        'sweep: loop {
            let mut changed = false;
            for &rule in &priority {
                match self.saturate(rule, &budget, limit) {
                    Ok(m) => changed = changed || m,
                    Err(h) => {
                        halted = Some(h);
                        break 'sweep;
                    }
                }
            }
            if !changed {
                break;
            }
        }

        let delta = *self.g.scalar();
        *self.g.scalar_mut() = before * delta;

        debug!(
            "simplified to {} vertices, {} edges with {} rewrites {:?}",
            self.g.num_vertices(),
            self.g.num_edges(),
            self.rewrites,
            self.per_rule
        );
        if let Some(h) = halted {
            warn!("simplification halted after {} rewrites: {h}", self.rewrites);
        }

        SimplifyReport {
            rewrites: self.rewrites,
            per_rule: self.per_rule,
            scalar: delta,
            halted,
            mismatches: self.mismatches,
        }
    }

    /// Apply one rule to its fixed point, returning whether it matched.
    fn saturate(
        &mut self,
        rule: Rule,
        budget: &Budget,
        limit: Option<usize>,
    ) -> Result<bool, Halt> {
        let mut got_match = false;
        loop {
            let mut new_matches = false;
            for site in rule.candidates(&*self.g) {
                if !rule.check(&*self.g, site) {
                    continue;
                }
                if limit.is_some_and(|n| self.rewrites >= n) {
                    return Err(Halt::RewriteLimit);
                }
                budget.check()?;

                match rule.apply(&mut *self.g, site) {
                    Ok(rw) => {
                        trace!("{} at {:?}, scalar {}", rw.rule, site, rw.scalar);
                        self.rewrites += 1;
                        *self.per_rule.entry(rule).or_insert(0) += 1;
                        new_matches = true;
                    }
                    Err(e) => {
                        error!("{e}");
                        self.mismatches += 1;
                    }
                }
            }
            if !new_matches {
                return Ok(got_match);
            }
            got_match = true;
        }
    }
}
