//! Metric primitives used by the built-in COCO scorer.

pub mod ap;
pub mod iou;

pub use ap::{average_precision, mean};
pub use iou::calculate_iou;
