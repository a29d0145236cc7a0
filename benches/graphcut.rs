//! Benchmark graph construction and min-cut solves.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use khanda_seg::{
    AlphaExpansion, DataCost, DataCostTable, DinicSolver, ExpansionConfig, GridGraphBuilder,
    LabelMode, MinCutSolver, SegmentationEngine, SmoothCost, SmoothCostTable, SolverConfig,
    VolumeBuffer, VolumeDims,
};

/// Random per-voxel data costs for a fixed label count.
fn random_data(dims: VolumeDims, n_labels: usize, seed: u64) -> DataCost {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut table = DataCostTable::new(dims.n_voxels(), n_labels);
    for p in 0..dims.n_voxels() {
        for l in 0..n_labels {
            table.set(p, l as u8, rng.gen_range(0..1000));
        }
    }
    DataCost::Table(table)
}

fn bench_capacity_build(c: &mut Criterion) {
    let dims = VolumeDims::new(16, 16, 16);
    let data = random_data(dims, 3, 7);
    let smooth = SmoothCost::Table(SmoothCostTable::potts(3, 250));
    let labeling = vec![0u8; dims.n_voxels()];

    c.bench_function("capacity_build_16", |b| {
        b.iter(|| {
            let builder = GridGraphBuilder::new(dims, 1, black_box(&labeling), &data, &smooth);
            black_box(builder.build())
        })
    });
}

fn bench_maxflow_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("maxflow");

    for size in [8usize, 12, 16].iter() {
        let dims = VolumeDims::new(*size, *size, *size);
        let data = random_data(dims, 2, 11);
        let smooth = SmoothCost::Table(SmoothCostTable::potts(2, 250));
        let labeling = vec![0u8; dims.n_voxels()];
        let caps = GridGraphBuilder::new(dims, 1, &labeling, &data, &smooth).build();
        let mut solver = DinicSolver::new(dims, &SolverConfig::default());

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                solver.set_caps(black_box(caps.clone()));
                black_box(solver.compute_maxflow())
            })
        });
    }

    group.finish();
}

fn bench_expansion_cycle(c: &mut Criterion) {
    let dims = VolumeDims::new(10, 10, 10);
    let data = random_data(dims, 4, 23);
    let smooth = SmoothCost::Table(SmoothCostTable::potts(4, 250));
    let mut driver: AlphaExpansion<'_, DinicSolver> =
        AlphaExpansion::new(dims, 4, &data, &smooth, ExpansionConfig::default());

    // Converge first so every iteration measures a steady-state cycle.
    driver.run();

    c.bench_function("expansion_steady_cycle_10", |b| {
        b.iter(|| black_box(driver.perform_cycle()))
    });
}

fn bench_engine_graph_cut(c: &mut Criterion) {
    let dims = VolumeDims::new(8, 8, 8);
    let image = VolumeBuffer::filled(dims, 0.5f32);
    let mut seeds = VolumeBuffer::filled(dims, 0u16);
    seeds.set(0, 0, 0, 1);
    seeds.set(7, 7, 7, 2);
    let mut result = VolumeBuffer::filled(dims, 0u8);
    let engine = SegmentationEngine::with_defaults();

    c.bench_function("engine_graph_cut_8", |b| {
        b.iter(|| {
            let summary = engine
                .run_graph_cut(
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
    bench_capacity_build,
    bench_maxflow_sizes,
    bench_expansion_cycle,
    bench_engine_graph_cut
);
criterion_main!(benches);
