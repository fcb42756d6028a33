//! The model interface consumed by the evaluation runner.

use crate::error::{EvalError, Result};
use crate::types::BBoxCorners;

/// Detections for one input image: parallel boxes, scores and labels.
///
/// Boxes are in [x1, y1, x2, y2] corner form in the resized image space.
/// Entries must be sorted by descending score; the runner relies on that
/// order to stop scanning a sample once a score drops below the threshold.
#[derive(Debug, Clone, Default)]
pub struct ImageDetections {
    pub boxes: Vec<BBoxCorners>,
    pub scores: Vec<f64>,
    pub labels: Vec<i64>,
}

impl ImageDetections {
    /// Create an empty detection set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of detections.
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Whether there are no detections.
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Check that the boxes, scores and labels sequences line up.
    pub fn validate(&self) -> Result<()> {
        if self.boxes.len() != self.scores.len() || self.boxes.len() != self.labels.len() {
            return Err(EvalError::ModelOutput(format!(
                "parallel outputs disagree: {} boxes, {} scores, {} labels",
                self.boxes.len(),
                self.scores.len(),
                self.labels.len()
            )));
        }
        Ok(())
    }
}

/// A detection model driven by the runner.
///
/// Inference is batched: one [`ImageDetections`] entry per input image, in
/// input order. The runner currently submits single-image batches.
pub trait Model {
    /// The image representation this model accepts.
    type Image;

    /// Run inference on a batch of images.
    fn predict(&self, batch: &[Self::Image]) -> Result<Vec<ImageDetections>>;
}
