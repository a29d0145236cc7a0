//! Segment a synthetic sphere phantom with both engine paths.
//!
//! This example demonstrates:
//! - Building a bright-sphere-on-dark-background test volume
//! - Binary graph-cut segmentation from a handful of seeds
//! - Multi-label Poisson segmentation from the same seeds
//! - Rendering the middle slice of each result as ASCII art
//!
//! # Usage
//!
//! ```bash
//! cargo run --example sphere_phantom
//! ```

use khanda_seg::{
    LabelMode, Result, SegmentationEngine, VolumeBuffer, VolumeDims,
};

const DIMS: VolumeDims = VolumeDims {
    width: 20,
    height: 20,
    depth: 20,
};
const BACKGROUND: u16 = 1;
const FOREGROUND: u16 = 2;

/// Bright sphere (intensity 1.0) centered in a dark volume (0.1).
fn sphere_image() -> VolumeBuffer<f32> {
    let mut image = VolumeBuffer::filled(DIMS, 0.1f32);
    let center = (10.0f64, 10.0, 10.0);
    let radius = 5.5f64;
    for z in 0..DIMS.depth {
        for y in 0..DIMS.height {
            for x in 0..DIMS.width {
                let dx = x as f64 - center.0;
                let dy = y as f64 - center.1;
                let dz = z as f64 - center.2;
                if (dx * dx + dy * dy + dz * dz).sqrt() <= radius {
                    image.set(x, y, z, 1.0);
                }
            }
        }
    }
    image
}

/// One foreground seed at the sphere center, background seeds at the
/// corners and face centers.
fn phantom_seeds() -> VolumeBuffer<u16> {
    let mut seeds = VolumeBuffer::filled(DIMS, 0u16);
    seeds.set(10, 10, 10, FOREGROUND);
    let hi = DIMS.width - 1;
    for &x in &[0, hi] {
        for &y in &[0, hi] {
            for &z in &[0, hi] {
                seeds.set(x, y, z, BACKGROUND);
            }
        }
    }
    let mid = DIMS.width / 2;
    for (x, y, z) in [
        (0, mid, mid),
        (hi, mid, mid),
        (mid, 0, mid),
        (mid, hi, mid),
        (mid, mid, 0),
        (mid, mid, hi),
    ] {
        seeds.set(x, y, z, BACKGROUND);
    }
    seeds
}

/// Print the middle z-slice: `#` foreground, `.` background.
fn render_slice(title: &str, result: &VolumeBuffer<u8>) {
    println!("{} (z = {}):", title, DIMS.depth / 2);
    for y in 0..DIMS.height {
        let mut row = String::with_capacity(DIMS.width);
        for x in 0..DIMS.width {
            let label = *result.get(x, y, DIMS.depth / 2);
            row.push(if label == FOREGROUND as u8 { '#' } else { '.' });
        }
        println!("  {}", row);
    }
}

fn count_label(result: &VolumeBuffer<u8>, label: u8) -> usize {
    result.as_slice().iter().filter(|&&v| v == label).count()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let image = sphere_image();
    let seeds = phantom_seeds();
    let engine = SegmentationEngine::with_defaults();

    // Binary graph cut: every voxel becomes background or foreground.
    let mut cut_result = VolumeBuffer::filled(DIMS, 0u8);
    let cut = engine.run_graph_cut(
        &image,
        &seeds,
        &mut cut_result,
        LabelMode::Binary {
            background: BACKGROUND,
            foreground: FOREGROUND,
        },
    )?;
    log::info!(
        "Graph cut: {} labels, {} cycles, energy {} -> {}, converged = {}",
        cut.labels,
        cut.cycles,
        cut.initial_energy,
        cut.final_energy,
        cut.converged
    );
    log::info!(
        "Graph cut foreground: {} of {} voxels",
        count_label(&cut_result, FOREGROUND as u8),
        DIMS.n_voxels()
    );

    // Poisson diffusion over the same seeds.
    let mut poisson_result = VolumeBuffer::filled(DIMS, 0u8);
    let poisson = engine.run_poisson(&image, &seeds, &mut poisson_result, LabelMode::MultiLabel)?;
    log::info!(
        "Poisson: {} labels, {} half-passes, final residual {:.6}",
        poisson.labels,
        poisson.half_passes,
        poisson.final_residual
    );
    log::info!(
        "Poisson foreground: {} of {} voxels",
        count_label(&poisson_result, FOREGROUND as u8),
        DIMS.n_voxels()
    );

    render_slice("Graph cut", &cut_result);
    render_slice("Poisson", &poisson_result);

    Ok(())
}
