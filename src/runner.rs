//! The evaluation runner: drive a model over a dataset, accumulate COCO
//! formatted results, persist them, and hand them to a scorer.

use crate::dataset::{DataFormat, Dataset};
use crate::error::{EvalError, Result};
use crate::hook::{DetectionHook, HookAction};
use crate::model::Model;
use crate::results::ResultSet;
use crate::scorer::Scorer;
use crate::stats::RunStats;
use crate::types::{to_original_xywh, Detection, EvalSummary, ResultRecord};
use indicatif::ProgressBar;
use std::path::PathBuf;
use tracing::{debug, info};

/// Configuration for one evaluation run.
#[derive(Debug, Clone)]
pub struct EvalConfig {
    /// Detections scoring below this are never emitted.
    pub score_threshold: f64,
    /// Optional allow-list of COCO category ids. When present, only matching
    /// results are emitted and scoring is restricted to these categories.
    pub category_filter: Option<Vec<u64>>,
    /// Memory layout requested from the dataset before inference.
    pub data_format: DataFormat,
    /// Directory the two JSON artifacts are written to.
    pub output_dir: PathBuf,
    /// Whether to draw a terminal progress bar.
    pub show_progress: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            score_threshold: 0.05,
            category_filter: None,
            data_format: DataFormat::default(),
            output_dir: PathBuf::from("."),
            show_progress: true,
        }
    }
}

impl EvalConfig {
    /// Create a configuration with the default score threshold of 0.05.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Evaluate a detection model over a dataset and score the results.
///
/// For each sample, in index order: load, preprocess and resize the image,
/// run single-image batched inference, rescale boxes back to original image
/// space, convert them to COCO [x, y, width, height] form, and accumulate
/// every detection at or above the score threshold (model outputs are sorted
/// by descending score, so the scan stops at the first miss). The sample's
/// image id is recorded as processed whether or not it emitted results.
///
/// If the whole run produces no results, returns `Ok(None)`: nothing is
/// written and no scoring is attempted. Otherwise the result set is
/// persisted as two JSON artifacts named after the dataset's
/// [`set_name`](Dataset::set_name) and the scorer's summary is returned.
///
/// # Errors
///
/// Faults from the dataset, the model, serialization or the filesystem are
/// propagated unchanged; there is no partial-failure recovery.
pub fn evaluate<D, M, S>(
    dataset: &D,
    model: &M,
    scorer: &S,
    config: &EvalConfig,
) -> Result<Option<EvalSummary>>
where
    D: Dataset,
    M: Model<Image = D::Image>,
    S: Scorer,
{
    evaluate_with_hook(dataset, model, scorer, config, None)
}

/// [`evaluate`] with an injected post-detection hook.
///
/// The hook inspects each above-threshold detection before it is formatted
/// and may keep it, force a different category id, or discard it. Use this
/// for dataset-specific corrections such as
/// [`SentinelRelabel`](crate::hook::SentinelRelabel) instead of
/// special-casing the loop.
pub fn evaluate_with_hook<D, M, S>(
    dataset: &D,
    model: &M,
    scorer: &S,
    config: &EvalConfig,
    hook: Option<&dyn DetectionHook>,
) -> Result<Option<EvalSummary>>
where
    D: Dataset,
    M: Model<Image = D::Image>,
    S: Scorer,
{
    validate_threshold(config.score_threshold)?;

    info!(
        samples = dataset.len(),
        set_name = dataset.set_name(),
        threshold = config.score_threshold,
        "starting COCO evaluation"
    );

    let progress = if config.show_progress {
        ProgressBar::new(dataset.len() as u64)
    } else {
        ProgressBar::hidden()
    };

    let mut results = ResultSet::new();
    let mut stats = RunStats::new();

    for index in 0..dataset.len() {
        let image = dataset.load_image(index)?;
        let image = dataset.preprocess_image(image);
        let (image, scale) = dataset.resize_image(image);
        let image = dataset.apply_data_format(image, config.data_format);

        let batch = [image];
        let outputs = model.predict(&batch)?;
        let detections = outputs.into_iter().next().ok_or_else(|| {
            EvalError::ModelOutput("model returned no entry for a one-image batch".to_string())
        })?;
        detections.validate()?;

        let image_id = dataset.image_id(index);
        let mut emitted = 0usize;

        for ((bbox, &score), &label) in detections
            .boxes
            .iter()
            .zip(detections.scores.iter())
            .zip(detections.labels.iter())
        {
            // outputs are sorted by descending score, so the first miss
            // ends this sample
            if score < config.score_threshold {
                break;
            }

            let detection = Detection {
                bbox: to_original_xywh(*bbox, scale),
                score,
                label,
            };

            let category_id = match hook.map(|h| h.inspect(&detection)) {
                Some(HookAction::Discard) => {
                    stats.discard_by_hook();
                    continue;
                }
                Some(HookAction::Relabel(category_id)) => {
                    stats.relabel_by_hook();
                    category_id
                }
                Some(HookAction::Keep) | None => dataset.label_to_category_id(label),
            };

            if let Some(filter) = &config.category_filter {
                if !filter.contains(&category_id) {
                    stats.filter_by_category();
                    continue;
                }
            }

            results.push(ResultRecord {
                image_id,
                category_id,
                score: detection.score,
                bbox: detection.bbox,
            });
            stats.emit();
            emitted += 1;
        }

        results.record_image(image_id);
        stats.process_image();
        debug!(index, image_id, emitted, "sample evaluated");
        progress.inc(1);
    }

    progress.finish_and_clear();
    info!(summary = %stats.summary_string(), "detection pass complete");

    if results.is_empty() {
        info!("no detections above threshold; skipping scoring");
        return Ok(None);
    }

    results.write(&config.output_dir, dataset.set_name())?;

    let summary = scorer.score(
        dataset.ground_truth(),
        &results.records,
        &results.image_ids,
        config.category_filter.as_deref(),
    )?;

    Ok(Some(summary))
}

/// Validate that a score threshold is in [0.0, 1.0].
fn validate_threshold(threshold: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(EvalError::InvalidThreshold(format!(
            "Threshold must be between 0.0 and 1.0, got {threshold}"
        )));
    }
    Ok(())
}
