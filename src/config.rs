//! Unified, YAML-loadable engine configuration.
//!
//! Every section falls back to its component's `Default` when absent,
//! so a config file only needs the fields it overrides:
//!
//! ```yaml
//! graph_cut:
//!   sigma: 0.05
//!   max_cycles: 6
//! poisson:
//!   iterations: 200
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::engine::GraphCutConfig;
use crate::error::Result;
use crate::graphcut::SolverConfig;
use crate::poisson::PoissonConfig;

/// Top-level configuration, one section per component.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    pub graph_cut: GraphCutConfig,
    pub poisson: PoissonConfig,
    pub solver: SolverConfig,
}

impl SegmentationConfig {
    /// Load a configuration from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Parse a configuration from a YAML string.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }
}

// ============================================================================
// Tests
// ============================================================================
