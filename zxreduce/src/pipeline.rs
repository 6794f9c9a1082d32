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

//! End-to-end circuit optimisation.
//!
//! [optimize] turns a circuit into a ZX-diagram, simplifies it, extracts a
//! circuit back out and optionally cleans it up with the peephole pass.
//! [compile] additionally lowers the result to a native gate set.

use crate::budget::Budget;
use crate::circuit::Circuit;
use crate::config::EngineConfig;
use crate::extract::{ExtractError, Extraction, Extractor};
use crate::optimize_circuit::basic_optimize;
use crate::simplify::{SimplifyReport, Simplifier};
use crate::synth::{transpile, SynthError, Transpiled};
use crate::vec_graph::Graph;
use log::info;
use rayon::prelude::*;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),
    #[error("synthesis failed: {0}")]
    Synth(#[from] SynthError),
}

/// An optimised circuit. It implements the input circuit, up to a global
/// phase, once input `permutation[q]` is routed to output `q`.
#[derive(Debug, Clone)]
pub struct Optimized {
    pub circuit: Circuit,
    pub permutation: Vec<usize>,
    pub report: SimplifyReport,
}

impl Optimized {
    /// The circuit with the permutation realised by SWAP gates
    pub fn to_circuit_with_swaps(&self) -> Circuit {
        Extraction {
            circuit: self.circuit.clone(),
            permutation: self.permutation.clone(),
        }
        .to_circuit_with_swaps()
    }
}

/// An optimised circuit over the native gate set
#[derive(Debug, Clone)]
pub struct Compiled {
    pub circuit: Transpiled,
    pub permutation: Vec<usize>,
    pub report: SimplifyReport,
}

pub fn optimize(
    c: &Circuit,
    cfg: &EngineConfig,
    budget: &Budget,
) -> Result<Optimized, PipelineError> {
    let mut g: Graph = c.to_graph();

    let report = Simplifier::new(&mut g)
        .with_config(&cfg.simplify)
        .with_budget(budget.clone())
        .run();

    let Extraction {
        mut circuit,
        permutation,
    } = Extractor::new(&mut g)
        .with_config(cfg.extract)
        .with_budget(budget.clone())
        .extract()?;

    if cfg.peephole {
        basic_optimize(&mut circuit);
    }

    info!(
        "optimized {} -> {} gates ({} -> {} two-qubit), {} rewrites",
        c.num_gates(),
        circuit.num_gates(),
        c.num_two_qubit_gates(),
        circuit.num_two_qubit_gates(),
        report.rewrites
    );

    Ok(Optimized {
        circuit,
        permutation,
        report,
    })
}

/// [optimize], then lower to the native gate set of `cfg.synth.target`
pub fn compile(
    c: &Circuit,
    cfg: &EngineConfig,
    budget: &Budget,
) -> Result<Compiled, PipelineError> {
    let opt = optimize(c, cfg, budget)?;
    let native = transpile(&opt.circuit, &cfg.synth)?;
    info!(
        "compiled to {} native gates ({} entangling)",
        native.num_gates(),
        native.num_entangling()
    );
    Ok(Compiled {
        circuit: native,
        permutation: opt.permutation,
        report: opt.report,
    })
}

/// Optimise independent circuits in parallel
///
/// Each circuit gets its own diagram. The budget is shared, so cancelling
/// it halts every task.
pub fn optimize_batch(
    circuits: &[Circuit],
    cfg: &EngineConfig,
    budget: &Budget,
) -> Vec<Result<Optimized, PipelineError>> {
    circuits
        .par_iter()
        .map(|c| optimize(c, cfg, budget))
        .collect()
}
