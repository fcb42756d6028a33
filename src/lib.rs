//! # coco-eval-runner
//!
//! Run an object-detection model over a dataset and score it with the COCO
//! evaluation protocol.
//!
//! The crate is a thin pipeline around three injected collaborators:
//!
//! - a [`Dataset`] producing ordered samples, their images and ground truth,
//! - a [`Model`] running batched inference with score-sorted outputs,
//! - a [`Scorer`] turning accumulated results into summary statistics
//!   (a COCO-protocol implementation, [`CocoScorer`], is built in).
//!
//! For each sample the runner loads, preprocesses and resizes the image,
//! runs inference, rescales boxes back to original image space, converts
//! them to COCO `[x, y, width, height]` form, and keeps every detection at
//! or above the score threshold. Results and the processed image ids are
//! written as two JSON artifacts, then handed to the scorer.
//!
//! ## Quick Start
//!
//! ```rust
//! use coco_eval_runner::{evaluate, CocoScorer, EvalConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Bring your own Dataset and Model implementations:
//! // let dataset = MyDataset::open("val2017")?;
//! // let model = MyModel::load("detector.onnx")?;
//! let scorer = CocoScorer::new();
//! let config = EvalConfig::new();
//!
//! // match evaluate(&dataset, &model, &scorer, &config)? {
//! //     Some(summary) => println!("{summary}"),
//! //     None => println!("no detections above threshold"),
//! // }
//! # Ok(())
//! # }
//! ```
//!
//! ## Result format
//!
//! Formatted results follow the standard COCO results schema, bounding
//! boxes expressed as `(x, y, width, height)`:
//!
//! ```json
//! [
//!   {
//!     "image_id": 42,
//!     "category_id": 3,
//!     "score": 0.91,
//!     "bbox": [x, y, width, height]
//!   }
//! ]
//! ```
//!
//! Two files are produced per run, `{set_name}_bbox_results.json` and
//! `{set_name}_processed_image_ids.json`, overwritten on each run.

pub mod dataset;
pub mod error;
pub mod hook;
pub mod loader;
pub mod matching;
pub mod metrics;
pub mod model;
pub mod results;
pub mod runner;
pub mod scorer;
pub mod stats;
pub mod types;

// Re-export commonly used types and functions
pub use dataset::{DataFormat, Dataset};
pub use error::{EvalError, Result};
pub use hook::{hook_fn, DetectionHook, HookAction, HookFn, SentinelRelabel};
pub use loader::{load_from_file, load_from_string};
pub use model::{ImageDetections, Model};
pub use results::ResultSet;
pub use runner::{evaluate, evaluate_with_hook, EvalConfig};
pub use scorer::{CocoScorer, Scorer};
pub use stats::RunStats;
pub use types::{
    Annotation, BoundingBox, Category, CocoDataset, Detection, EvalSummary, Image, ResultRecord,
};
