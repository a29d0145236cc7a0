//! Segmentation orchestrator: validates the volumes, derives cost terms
//! from image statistics and seed geometry, dispatches to the graph-cut
//! or Poisson path, and writes the result labeling.
//!
//! ```text
//! ImageSource ──┐
//! SeedSource  ──┼─> validate ─> candidates ─> costs ─> solve ─> LabelSink
//! config      ──┘
//! ```
//!
//! Both paths work on compact label indices internally and translate back
//! to the caller's seed ids (capped at 255) during write-back.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::SegmentationConfig;
use crate::core::{Connectivity, ImageSource, LabelSink, SeedSource, VolumeDims};
use crate::cost::{
    DataCost, DataCostTable, GaussianWeight, IntensityRange, SeedDistanceField, SmoothCost,
};
use crate::error::{Result, SegmentationError};
use crate::graphcut::{AlphaExpansion, DinicSolver, ExpansionConfig, LabelOrder};
use crate::poisson::{DiffusionWeights, PoissonSolver, PotentialField};

/// Terminal cost pinning a seeded voxel to its own label. Large enough to
/// dominate any smoothness saving, small enough that a full volume of
/// them stays far from i64 overflow.
const HARD_SEED_COST: i64 = 1_000_000_000;

/// Fixed-point scale from float weights and distances to integer
/// capacities.
const COST_SCALE: f64 = 1000.0;

/// Graph-cut path parameters.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphCutConfig {
    /// Neighborhood for the seed-distance data term.
    pub connectivity: Connectivity,
    /// Peak smoothness weight at zero intensity difference.
    pub amplitude: f64,
    /// Gaussian falloff width over the normalized intensity difference.
    pub sigma: f64,
    /// Alpha-expansion cycle cap.
    pub max_cycles: u32,
    /// Seed for a per-cycle random label order; sequential when unset.
    pub shuffle_seed: Option<u64>,
}

impl Default for GraphCutConfig {
    fn default() -> Self {
        Self {
            connectivity: Connectivity::Six,
            amplitude: 1.0,
            sigma: 0.1,
            max_cycles: 10,
            shuffle_seed: None,
        }
    }
}

/// Which seed ids form the candidate label set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LabelMode {
    /// Exactly two candidates supplied by the caller, background first.
    /// Seeds carrying any other id are ignored.
    Binary { background: u16, foreground: u16 },
    /// Candidates are the sorted distinct nonzero seed ids.
    MultiLabel,
}

/// Outcome of a graph-cut run.
#[derive(Clone, Copy, Debug)]
pub struct GraphCutSummary {
    pub labels: usize,
    pub cycles: u32,
    pub initial_energy: i64,
    pub final_energy: i64,
    pub converged: bool,
}

/// Outcome of a Poisson run.
#[derive(Clone, Copy, Debug)]
pub struct PoissonSummary {
    pub labels: usize,
    pub half_passes: u32,
    pub final_residual: f64,
}

/// Interactive segmentation engine over caller-owned volumes.
pub struct SegmentationEngine {
    config: SegmentationConfig,
}

impl SegmentationEngine {
    pub fn new(config: SegmentationConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(SegmentationConfig::default())
    }

    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Segment by alpha-expansion over a seed-distance data term and a
    /// Gaussian intensity smoothness term.
    pub fn run_graph_cut<I, S, O>(
        &self,
        image: &I,
        seeds: &S,
        result: &mut O,
        mode: LabelMode,
    ) -> Result<GraphCutSummary>
    where
        I: ImageSource,
        S: SeedSource,
        O: LabelSink,
    {
        let dims = validate(image.dims(), seeds.dims(), result.dims())?;
        let gc = self.config.graph_cut;
        debug!("[Engine] graph-cut over {} ({:?})", dims, mode);

        let intensity = collect_intensity(image, dims);
        let seed_flat = collect_seeds(seeds, dims);
        let candidates = candidate_labels(&seed_flat, mode)?;

        let seeded = seed_flat
            .iter()
            .any(|&s| s != 0 && candidates.contains(&s));
        if !seeded {
            // Binary mode with no matching seeds, or an all-zero seed
            // volume: fill with the first candidate (background) or 0.
            let fill = candidates.first().map_or(0u8, |&c| c.min(255) as u8);
            fill_result(result, dims, fill);
            debug!("[Engine] no usable seeds: filled with label {}", fill);
            return Ok(GraphCutSummary {
                labels: candidates.len(),
                cycles: 0,
                initial_energy: 0,
                final_energy: 0,
                converged: true,
            });
        }

        let field = SeedDistanceField::compute(
            dims,
            image.spacing(),
            gc.connectivity,
            &seed_flat,
            &candidates,
        );
        let data = DataCost::Table(build_data_table(dims, &seed_flat, &candidates, &field));

        let range = IntensityRange::robust(&intensity);
        let weight = GaussianWeight::new(gc.amplitude, gc.sigma);
        let smooth = build_smooth_cost(dims, &intensity, range, weight);

        let order = match gc.shuffle_seed {
            Some(seed) => LabelOrder::Random { seed },
            None => LabelOrder::Sequential,
        };
        let expansion_config = ExpansionConfig {
            max_cycles: gc.max_cycles,
            order,
            solver: self.config.solver,
        };

        let mut driver: AlphaExpansion<'_, DinicSolver> = AlphaExpansion::new(
            dims,
            candidates.len() as u8,
            &data,
            &smooth,
            expansion_config,
        )
        .with_labeling(initial_labeling(&seed_flat, &candidates));
        let outcome = driver.run();

        write_labels(result, dims, driver.labeling(), &candidates);
        debug!(
            "[Engine] graph-cut done: {} cycles, energy {} -> {}",
            outcome.cycles, outcome.initial_energy, outcome.final_energy
        );

        Ok(GraphCutSummary {
            labels: candidates.len(),
            cycles: outcome.cycles,
            initial_energy: outcome.initial_energy,
            final_energy: outcome.final_energy,
            converged: outcome.converged,
        })
    }

    /// Segment by relaxing per-label potential channels and taking the
    /// per-voxel arg-max.
    pub fn run_poisson<I, S, O>(
        &self,
        image: &I,
        seeds: &S,
        result: &mut O,
        mode: LabelMode,
    ) -> Result<PoissonSummary>
    where
        I: ImageSource,
        S: SeedSource,
        O: LabelSink,
    {
        let dims = validate(image.dims(), seeds.dims(), result.dims())?;
        let pc = self.config.poisson;
        debug!("[Engine] poisson over {} ({:?})", dims, mode);

        let intensity = collect_intensity(image, dims);
        let seed_flat = collect_seeds(seeds, dims);
        let candidates = candidate_labels(&seed_flat, mode)?;

        if candidates.is_empty() {
            fill_result(result, dims, 0);
            debug!("[Engine] no seed labels: filled with 0");
            return Ok(PoissonSummary {
                labels: 0,
                half_passes: 0,
                final_residual: 0.0,
            });
        }

        let range = IntensityRange::robust(&intensity);
        let beta = pc.beta.unwrap_or(self.config.graph_cut.sigma);
        let weights = DiffusionWeights::build(
            dims,
            image.spacing(),
            &normalize_intensity(&intensity, range),
            beta,
            pc.content_adaptive,
        );

        let mut field = PotentialField::from_seeds(dims, &seed_flat, &candidates);
        let stats = PoissonSolver::new(pc).relax(&mut field, &weights);

        for z in 0..dims.depth {
            for y in 0..dims.height {
                for x in 0..dims.width {
                    let p = dims.index(x, y, z);
                    let channel = field.argmax_channel(p);
                    let id = candidates[channel].min(255) as u8;
                    result.set_label(0, x as i32, y as i32, z as i32, id);
                }
            }
        }
        debug!(
            "[Engine] poisson done: {} half-passes, residual {:.6}",
            stats.half_passes, stats.final_residual
        );

        Ok(PoissonSummary {
            labels: candidates.len(),
            half_passes: stats.half_passes,
            final_residual: stats.final_residual,
        })
    }
}

/// All three volumes must agree on non-empty dimensions; runs abort here
/// before any allocation or write.
fn validate(image: VolumeDims, seeds: VolumeDims, result: VolumeDims) -> Result<VolumeDims> {
    if image != seeds || image != result {
        return Err(SegmentationError::ShapeMismatch {
            image,
            seeds,
            result,
        });
    }
    if image.is_empty() {
        return Err(SegmentationError::EmptyVolume(image));
    }
    Ok(image)
}

fn collect_intensity<I: ImageSource>(image: &I, dims: VolumeDims) -> Vec<f32> {
    let mut out = vec![0.0f32; dims.n_voxels()];
    for z in 0..dims.depth {
        for y in 0..dims.height {
            for x in 0..dims.width {
                out[dims.index(x, y, z)] = image
                    .value(0, x as i32, y as i32, z as i32)
                    .unwrap_or(0.0);
            }
        }
    }
    out
}

fn collect_seeds<S: SeedSource>(seeds: &S, dims: VolumeDims) -> Vec<u16> {
    let mut out = vec![0u16; dims.n_voxels()];
    for z in 0..dims.depth {
        for y in 0..dims.height {
            for x in 0..dims.width {
                out[dims.index(x, y, z)] = seeds.label(0, x as i32, y as i32, z as i32);
            }
        }
    }
    out
}

/// Candidate label ids in channel order.
fn candidate_labels(seeds: &[u16], mode: LabelMode) -> Result<Vec<u16>> {
    match mode {
        LabelMode::Binary {
            background,
            foreground,
        } => Ok(vec![background, foreground]),
        LabelMode::MultiLabel => {
            let mut ids: Vec<u16> = seeds.iter().copied().filter(|&s| s != 0).collect();
            ids.sort_unstable();
            ids.dedup();
            if ids.len() > 255 {
                return Err(SegmentationError::TooManyLabels { found: ids.len() });
            }
            Ok(ids)
        }
    }
}

/// Data term: seeded voxels are hard constraints; unseeded voxels pay a
/// cost proportional to their geodesic distance to the nearest seed of
/// each candidate label, capped at the hard cost.
fn build_data_table(
    dims: VolumeDims,
    seeds: &[u16],
    candidates: &[u16],
    field: &SeedDistanceField,
) -> DataCostTable {
    let n = dims.n_voxels();
    let k = candidates.len();
    let mut table = DataCostTable::new(n, k);

    for p in 0..n {
        let own = if seeds[p] == 0 {
            None
        } else {
            candidates.iter().position(|&c| c == seeds[p])
        };
        for l in 0..k {
            let cost = match own {
                Some(channel) if channel == l => 0,
                Some(_) => HARD_SEED_COST,
                None => {
                    let d = field.distance(l, p);
                    if d.is_finite() {
                        ((d * COST_SCALE).round() as i64).min(HARD_SEED_COST)
                    } else {
                        HARD_SEED_COST
                    }
                }
            };
            table.set(p, l as u8, cost);
        }
    }
    table
}

/// Smoothness term: Gaussian weight of the normalized intensity step
/// across each face, scaled to integers; zero for equal labels. The
/// closure resolves the lane by coordinate difference, so degenerate
/// widths do not alias axes.
fn build_smooth_cost(
    dims: VolumeDims,
    intensity: &[f32],
    range: IntensityRange,
    weight: GaussianWeight,
) -> SmoothCost {
    let n = dims.n_voxels();
    let mut lanes = [vec![0i64; n], vec![0i64; n], vec![0i64; n]];
    for z in 0..dims.depth {
        for y in 0..dims.height {
            for x in 0..dims.width {
                let p = dims.index(x, y, z);
                for axis in 0..3 {
                    let (nx, ny, nz) = match axis {
                        0 => (x + 1, y, z),
                        1 => (x, y + 1, z),
                        _ => (x, y, z + 1),
                    };
                    if nx >= dims.width || ny >= dims.height || nz >= dims.depth {
                        continue;
                    }
                    let q = dims.index(nx, ny, nz);
                    let delta = range.normalize(intensity[q] - intensity[p]);
                    lanes[axis][p] = (weight.evaluate(delta) * COST_SCALE).round() as i64;
                }
            }
        }
    }

    SmoothCost::Function(Box::new(move |p, q, la, lb| {
        if la == lb {
            return 0;
        }
        let (lo, hi) = if p < q { (p, q) } else { (q, p) };
        let (lx, ly, _) = dims.index_to_coord(lo);
        let (hx, hy, _) = dims.index_to_coord(hi);
        let axis = if hx == lx + 1 {
            0
        } else if hy == ly + 1 {
            1
        } else {
            2
        };
        lanes[axis][lo]
    }))
}

/// Seeded voxels start at their own compact label; everything else at 0.
fn initial_labeling(seeds: &[u16], candidates: &[u16]) -> Vec<u8> {
    seeds
        .iter()
        .map(|&s| {
            if s == 0 {
                0
            } else {
                candidates
                    .iter()
                    .position(|&c| c == s)
                    .map_or(0, |channel| channel as u8)
            }
        })
        .collect()
}

fn write_labels<O: LabelSink>(
    result: &mut O,
    dims: VolumeDims,
    labeling: &[u8],
    candidates: &[u16],
) {
    for z in 0..dims.depth {
        for y in 0..dims.height {
            for x in 0..dims.width {
                let p = dims.index(x, y, z);
                let id = candidates[labeling[p] as usize].min(255) as u8;
                result.set_label(0, x as i32, y as i32, z as i32, id);
            }
        }
    }
}

fn fill_result<O: LabelSink>(result: &mut O, dims: VolumeDims, label: u8) {
    for z in 0..dims.depth {
        for y in 0..dims.height {
            for x in 0..dims.width {
                result.set_label(0, x as i32, y as i32, z as i32, label);
            }
        }
    }
}

fn normalize_intensity(intensity: &[f32], range: IntensityRange) -> Vec<f32> {
    let span = range.span();
    if span <= f32::EPSILON {
        return vec![0.0; intensity.len()];
    }
    intensity.iter().map(|&v| (v - range.lo) / span).collect()
}

// ============================================================================
// Tests
// ============================================================================
