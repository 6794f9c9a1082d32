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

use crate::extract::ExtractConfig;
use crate::simplify::SimplifyConfig;
use crate::synth::SynthConfig;
use serde::{Deserialize, Serialize};

/// Settings for every stage of the pipeline
///
/// Missing fields take their defaults when deserialising, so a partial
/// config such as `{"extract": {"fallback": "linear"}}` is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub simplify: SimplifyConfig,
    pub extract: ExtractConfig,
    pub synth: SynthConfig,
    /// Run the peephole pass on extracted circuits
    pub peephole: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            simplify: SimplifyConfig::default(),
            extract: ExtractConfig::default(),
            synth: SynthConfig::default(),
            peephole: true,
        }
    }
}
