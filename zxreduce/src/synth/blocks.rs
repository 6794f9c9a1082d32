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

use super::euler::push_one_qubit;
use super::kak::synthesize_two_qubit;
use super::*;
use crate::circuit::Circuit;
use crate::gate::*;
use log::debug;

/// The matrix of a single-qubit gate
fn one_qubit_matrix(g: &Gate) -> Matrix2<Complex64> {
    let (o, l, i) = (
        Complex64::new(0.0, 0.0),
        Complex64::new(1.0, 0.0),
        Complex64::new(0.0, 1.0),
    );
    match g.t {
        NOT => Matrix2::new(o, l, l, o),
        Y => Matrix2::new(o, -i, i, o),
        HAD => had(),
        XPhase => had() * phase_gate(g.phase.to_radians()) * had(),
        _ => phase_gate(g.z_phase().unwrap_or(g.phase).to_radians()),
    }
}

/// The matrix of a two-qubit gate on the block `(p, q)`
fn two_qubit_matrix(g: &Gate, p: usize) -> Matrix4<Complex64> {
    match g.t {
        CNOT if g.qs[0] == p => cx01(),
        CNOT => cx10(),
        CZ => {
            let mut m = Matrix4::identity();
            m[(3, 3)] = Complex64::new(-1.0, 0.0);
            m
        }
        _ => swap(),
    }
}

/// A run of gates on a pair of qubits, accumulated as a unitary
struct Block {
    p: usize,
    q: usize,
    u: Matrix4<Complex64>,
}

struct Lowering<'a> {
    cfg: &'a SynthConfig,
    out: NativeCircuit,
    blocks: Vec<Option<Block>>,
    block_of: Vec<Option<usize>>,
    pending: Vec<Matrix2<Complex64>>,
}

impl Lowering<'_> {
    fn flush_block(&mut self, b: usize) -> Result<(), SynthError> {
        let Some(block) = self.blocks[b].take() else {
            return Ok(());
        };
        let c = synthesize_two_qubit(&block.u, self.cfg)?;
        self.out
            .append_mapped(&c, |x| if x == 0 { block.p } else { block.q });
        self.block_of[block.p] = None;
        self.block_of[block.q] = None;
        Ok(())
    }

    fn flush_qubit(&mut self, q: usize) {
        let m = std::mem::replace(&mut self.pending[q], Matrix2::identity());
        push_one_qubit(&mut self.out, &m, q);
    }

    fn one_qubit(&mut self, g: &Gate) {
        let q = g.qs[0];
        let m = one_qubit_matrix(g);
        match self.block_of[q].and_then(|b| self.blocks[b].as_mut()) {
            Some(block) => block.u = embed(&m, if q == block.p { 0 } else { 1 }) * block.u,
            None => self.pending[q] = m * self.pending[q],
        }
    }

    fn two_qubit(&mut self, g: &Gate) -> Result<(), SynthError> {
        let (p, q) = (g.qs[0], g.qs[1]);

        if let Some(b) = self.block_of[p] {
            if self.block_of[q] == Some(b) {
                if let Some(block) = self.blocks[b].as_mut() {
                    block.u = two_qubit_matrix(g, block.p) * block.u;
                    return Ok(());
                }
            }
        }

        for x in [p, q] {
            if let Some(b) = self.block_of[x] {
                self.flush_block(b)?;
            }
        }

        let pre = kron(&self.pending[p], &self.pending[q]);
        self.pending[p] = Matrix2::identity();
        self.pending[q] = Matrix2::identity();
        let b = self.blocks.len();
        self.blocks.push(Some(Block {
            p,
            q,
            u: two_qubit_matrix(g, p) * pre,
        }));
        self.block_of[p] = Some(b);
        self.block_of[q] = Some(b);
        Ok(())
    }
}

/// Lower a circuit to the native gate set
///
/// Gates are collected into maximal blocks acting on one pair of qubits,
/// and runs of single-qubit gates on each qubit between blocks. Each block
/// is synthesised by [synthesize_two_qubit] and each run by its Euler
/// angles. The result equals the input circuit exactly, including its
/// global phase, and only uses gates of `cfg.target`.
pub fn lower(circuit: &Circuit, cfg: &SynthConfig) -> Result<NativeCircuit, SynthError> {
    let n = circuit.num_qubits();
    let mut st = Lowering {
        cfg,
        out: NativeCircuit::new(n),
        blocks: Vec::new(),
        block_of: vec![None; n],
        pending: vec![Matrix2::identity(); n],
    };

    for g in &circuit.gates {
        if g.qs.len() == 1 {
            st.one_qubit(g);
        } else {
            st.two_qubit(g)?;
        }
    }

    for b in 0..st.blocks.len() {
        st.flush_block(b)?;
    }
    for q in 0..n {
        st.flush_qubit(q);
    }

    cfg.target.check(&st.out)?;
    debug!(
        "lowered {} gates to {} native gates ({} entangling)",
        circuit.num_gates(),
        st.out.num_gates(),
        st.out.num_entangling()
    );
    Ok(st.out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::*;
    use rstest::rstest;

    fn lowers_exactly(c: &Circuit, cfg: &SynthConfig) -> NativeCircuit {
        let nc = lower(c, cfg).unwrap();
        assert!(Tensor::approx_eq(&nc.to_tensor(), &c.to_tensor()));
        assert!(nc.gates().iter().all(|g| cfg.target.supports(g)));
        nc
    }

    #[test]
    fn single_qubit_runs() {
        let mut c = Circuit::new(2);
        c.add_gate("h", vec![0]);
        c.add_gate("t", vec![0]);
        c.add_gate("s", vec![1]);
        c.add_gate_with_phase("rx", vec![0], (1, 3));
        let nc = lowers_exactly(&c, &SynthConfig::default());
        assert_eq!(nc.num_entangling(), 0);
        assert!(nc.num_gates() <= 4);
    }

    #[test]
    fn cnot_is_one_cx() {
        let mut c = Circuit::new(2);
        c.add_gate("cx", vec![1, 0]);
        let nc = lowers_exactly(&c, &SynthConfig::default());
        assert_eq!(nc.num_entangling(), 1);
    }

    #[test]
    fn blocks_merge() {
        // nine gates on one pair of qubits make a single block
        let mut c = Circuit::new(2);
        for _ in 0..3 {
            c.add_gate("cx", vec![0, 1]);
            c.add_gate("t", vec![1]);
            c.add_gate("cz", vec![1, 0]);
        }
        let nc = lowers_exactly(&c, &SynthConfig::default());
        assert!(nc.num_entangling() <= 3);
    }

    #[test]
    fn cancelling_block_is_free() {
        let mut c = Circuit::new(2);
        c.add_gate("cx", vec![0, 1]);
        c.add_gate("cx", vec![0, 1]);
        let nc = lowers_exactly(&c, &SynthConfig::default());
        assert_eq!(nc.num_gates(), 0);
    }

    #[test]
    fn swap_is_three_cx() {
        let mut c = Circuit::new(3);
        c.add_gate("swap", vec![2, 0]);
        let nc = lowers_exactly(&c, &SynthConfig::default());
        assert_eq!(nc.num_entangling(), 3);
    }

    #[test]
    fn interleaved_pairs() {
        let mut c = Circuit::new(3);
        c.add_gate("h", vec![2]);
        c.add_gate("cx", vec![0, 1]);
        c.add_gate("t", vec![1]);
        c.add_gate("cx", vec![1, 2]);
        c.add_gate("tdg", vec![2]);
        c.add_gate("cx", vec![0, 1]);
        c.add_gate("s", vec![0]);
        c.add_gate("cz", vec![0, 2]);
        lowers_exactly(&c, &SynthConfig::default());
    }

    #[rstest]
    #[case(NativeTarget::Cx)]
    #[case(NativeTarget::Rxx)]
    fn random_circuits(#[case] target: NativeTarget) {
        let cfg = SynthConfig {
            target,
            ..Default::default()
        };
        for seed in 0..10 {
            let c = Circuit::random()
                .seed(seed)
                .qubits(4)
                .depth(60)
                .p_t(0.2)
                .p_cz(0.1)
                .with_cliffords()
                .build();
            let nc = lowers_exactly(&c, &cfg);
            assert!(nc.num_entangling() <= 3 * c.num_two_qubit_gates());
        }
    }
}
