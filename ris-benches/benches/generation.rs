//! RR-set generation benchmarks.
//!
//! Measures `RrSetGenerator::generate` on synthetic graphs across pool
//! sizes and worker counts. Generator construction, including the worker
//! pool, happens outside the timed loop.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
#![expect(
    clippy::shadow_reuse,
    reason = "Criterion bench_with_input closures rebind parameter names"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use ris_benches::{
    error::BenchSetupError,
    params::GenerationBenchParams,
    source::{SyntheticGraphConfig, generate_graph},
};
use ris_core::{DiffusionModel, RrSetGeneratorBuilder};

/// Seed used for graph synthesis and sampling.
const SEED: u64 = 42;

/// Graph sizes to benchmark.
const NODE_COUNTS: &[usize] = &[1_000, 10_000];

/// RR sets sampled per iteration.
const THETA: usize = 1_000;

/// Worker counts to compare.
const WORKERS: &[usize] = &[1, 4];

fn generate_rr_sets_impl(c: &mut Criterion, model: DiffusionModel) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group(format!("generate_{}", model.as_str().to_ascii_lowercase()));
    group.sample_size(20);

    for &node_count in NODE_COUNTS {
        let graph = generate_graph(&SyntheticGraphConfig {
            node_count,
            out_degree: 8,
            max_probability: 0.2,
            seed: SEED,
        })?;

        for &workers in WORKERS {
            let generator = RrSetGeneratorBuilder::new()
                .with_model(model)
                .with_workers(workers)
                .with_seed(SEED)
                .build(&graph)?;
            let params = GenerationBenchParams {
                node_count,
                theta: THETA,
                workers,
            };

            group.bench_with_input(
                BenchmarkId::from_parameter(&params),
                &THETA,
                |b, &theta| {
                    b.iter(|| generator.generate(theta));
                },
            );
        }
    }

    group.finish();
    Ok(())
}

fn generate_rr_sets(c: &mut Criterion) {
    for model in [DiffusionModel::IndependentCascade, DiffusionModel::LinearThreshold] {
        if let Err(err) = generate_rr_sets_impl(c, model) {
            panic!("generate_rr_sets benchmark setup failed: {err}");
        }
    }
}

criterion_group!(benches, generate_rr_sets);
criterion_main!(benches);
