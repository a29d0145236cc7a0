//! Error types for the segmentation engine.

use thiserror::Error;

use crate::core::VolumeDims;

/// Segmentation engine error type.
#[derive(Error, Debug)]
pub enum SegmentationError {
    #[error("volume shape mismatch: image {image}, seeds {seeds}, result {result}")]
    ShapeMismatch {
        image: VolumeDims,
        seeds: VolumeDims,
        result: VolumeDims,
    },

    #[error("empty volume: {0}")]
    EmptyVolume(VolumeDims),

    #[error("too many distinct seed labels: {found} (limit 255)")]
    TooManyLabels { found: usize },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_yaml::Error> for SegmentationError {
    fn from(e: serde_yaml::Error) -> Self {
        SegmentationError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SegmentationError>;
