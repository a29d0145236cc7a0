//! Benchmark diffusion-weight construction and SOR relaxation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use khanda_seg::{
    DiffusionWeights, LabelMode, PoissonConfig, PoissonSolver, PotentialField,
    SegmentationEngine, Spacing, VolumeBuffer, VolumeDims,
};

/// Smoothly varying intensity so content-adaptive weights stay nontrivial.
fn noisy_intensity(dims: VolumeDims, seed: u64) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..dims.n_voxels()).map(|_| rng.gen_range(0.0f32..1.0)).collect()
}

/// Two opposite-corner seeds, the rest free.
fn corner_seeds(dims: VolumeDims) -> Vec<u16> {
    let mut seeds = vec![0u16; dims.n_voxels()];
    seeds[0] = 1;
    seeds[dims.index(dims.width - 1, dims.height - 1, dims.depth - 1)] = 2;
    seeds
}

fn bench_weights_build(c: &mut Criterion) {
    let dims = VolumeDims::new(32, 32, 32);
    let intensity = noisy_intensity(dims, 7);

    c.bench_function("weights_build_32", |b| {
        b.iter(|| {
            let weights = DiffusionWeights::build(
                dims,
                Spacing::default(),
                black_box(&intensity),
                0.1,
                true,
            );
            black_box(weights)
        })
    });
}

fn bench_sor_relax_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("sor_relax");

    for size in [8usize, 16, 24].iter() {
        let dims = VolumeDims::new(*size, *size, *size);
        let intensity = noisy_intensity(dims, 11);
        let seeds = corner_seeds(dims);
        let weights = DiffusionWeights::build(dims, Spacing::default(), &intensity, 0.1, true);
        let solver = PoissonSolver::new(PoissonConfig {
            iterations: 20,
            ..PoissonConfig::default()
        });
        let mut field = PotentialField::from_seeds(dims, &seeds, &[1, 2]);

        // Warm up so every iteration sweeps a settled field.
        solver.relax(&mut field, &weights);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(solver.relax(&mut field, &weights)))
        });
    }

    group.finish();
}

fn bench_engine_poisson(c: &mut Criterion) {
    let dims = VolumeDims::new(16, 16, 16);
    let image = VolumeBuffer::filled(dims, 0.5f32);
    let mut seeds = VolumeBuffer::filled(dims, 0u16);
    seeds.set(0, 0, 0, 1);
    seeds.set(15, 15, 15, 2);
    let mut result = VolumeBuffer::filled(dims, 0u8);
    let engine = SegmentationEngine::with_defaults();

    c.bench_function("engine_poisson_16", |b| {
        b.iter(|| {
            let summary = engine
                .run_poisson(
                    black_box(&image),
                    black_box(&seeds),
                    &mut result,
                    LabelMode::MultiLabel,
                )
                .unwrap();
            black_box(summary)
        })
    });
}

criterion_group!(
    benches,
    bench_weights_build,
    bench_sor_relax_sizes,
    bench_engine_poisson
);
criterion_main!(benches);
