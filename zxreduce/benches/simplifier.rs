use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use zxreduce::budget::Budget;
use zxreduce::circuit::Circuit;
use zxreduce::extract::Extractor;
use zxreduce::simplify::{clifford_simp, full_simp, interior_clifford_simp, Simplifier};
use zxreduce::synth::{lower, SynthConfig};
use zxreduce::vec_graph::*;

fn simp_clifford_t(c: &mut Criterion) {
    // initial setup
    let circuit = Circuit::random()
        .seed(1337)
        .qubits(20)
        .depth(2000)
        .clifford_t(0.1)
        .build();
    let g: Graph = circuit.to_graph();

    let mut group = c.benchmark_group("clifford_t");
    group.sample_size(10); // 10 is the minimum, 100 is default

    group.bench_function("interior_clifford_simp", |b| {
        b.iter_batched_ref(
            || g.clone(), // clone the graph before timing
            |g1| {
                interior_clifford_simp(g1);
            },
            BatchSize::LargeInput,
        )
    });

    group.bench_function("clifford_simp", |b| {
        b.iter_batched_ref(
            || g.clone(),
            |g1| {
                clifford_simp(g1);
            },
            BatchSize::LargeInput,
        )
    });

    group.bench_function("full_simp", |b| {
        b.iter_batched_ref(
            || g.clone(),
            |g1| {
                full_simp(g1);
            },
            BatchSize::LargeInput,
        )
    });

    group.bench_function("simplifier", |b| {
        b.iter_batched_ref(
            || g.clone(),
            |g1| {
                Simplifier::new(g1).run();
            },
            BatchSize::LargeInput,
        )
    });

    let mut simplified = g.clone();
    full_simp(&mut simplified);
    group.bench_function("extract", |b| {
        b.iter_batched_ref(
            || simplified.clone(),
            |g1| {
                Extractor::new(g1).with_budget(Budget::unlimited()).extract()
            },
            BatchSize::LargeInput,
        )
    });

    group.bench_function("lower", |b| {
        let cfg = SynthConfig::default();
        b.iter(|| lower(&circuit, &cfg))
    });
}

criterion_group!(benches, simp_clifford_t);
criterion_main!(benches);
