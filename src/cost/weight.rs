//! Gaussian edge weighting and robust intensity normalization.

/// Gaussian mapping of an intensity difference to an edge weight:
/// `w(Δ) = amplitude · exp(−0.5·(Δ/σ)²)`.
///
/// Large weights bind similar voxels together; the weight decays toward
/// zero across intensity edges, which is where cuts become cheap.
#[derive(Clone, Copy, Debug)]
pub struct GaussianWeight {
    /// Peak weight at zero intensity difference.
    pub amplitude: f64,
    /// Width of the Gaussian falloff.
    pub sigma: f64,
}

impl GaussianWeight {
    /// Create a weight function.
    pub fn new(amplitude: f64, sigma: f64) -> Self {
        Self { amplitude, sigma }
    }

    /// Evaluate the weight for an intensity difference.
    #[inline]
    pub fn evaluate(&self, delta: f64) -> f64 {
        if self.sigma == 0.0 {
            return if delta == 0.0 { self.amplitude } else { 0.0 };
        }
        let t = delta / self.sigma;
        self.amplitude * (-0.5 * t * t).exp()
    }
}

/// Robust intensity range of an image, taken at the 2% and 98% quantiles
/// so stray extreme voxels do not dominate the normalization.
#[derive(Clone, Copy, Debug)]
pub struct IntensityRange {
    /// Low quantile value.
    pub lo: f32,
    /// High quantile value.
    pub hi: f32,
}

impl IntensityRange {
    /// Estimate the range from raw intensities. Non-finite samples are
    /// ignored; an empty or constant image yields a degenerate range.
    pub fn robust(values: &[f32]) -> Self {
        let mut sorted: Vec<f32> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return Self { lo: 0.0, hi: 0.0 };
        }
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        Self {
            lo: percentile(&sorted, 2.0),
            hi: percentile(&sorted, 98.0),
        }
    }

    /// Width of the range.
    #[inline]
    pub fn span(&self) -> f32 {
        self.hi - self.lo
    }

    /// Normalize an intensity difference by the range span. A degenerate
    /// span maps every difference to 0 (maximal edge weight), which is the
    /// correct limit for a uniform image.
    #[inline]
    pub fn normalize(&self, delta: f32) -> f64 {
        let span = self.span();
        if span <= f32::EPSILON {
            0.0
        } else {
            (delta / span) as f64
        }
    }
}

fn percentile(sorted: &[f32], p: f64) -> f32 {
    let idx = (p / 100.0 * (sorted.len() - 1) as f64).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

// ============================================================================
// Tests
// ============================================================================
