//! Greedy matching of predicted results against ground truth.

use crate::error::Result;
use crate::metrics::iou::calculate_iou;
use crate::types::{Annotation, ResultRecord};
use std::collections::{HashMap, HashSet};

/// One prediction's matching outcome for a single image and category.
#[derive(Debug, Clone)]
pub struct Match {
    pub score: f64,
    pub iou: f64,
    pub is_true_positive: bool,
}

/// Match predictions to ground truth for a single image and category.
///
/// Predictions are considered in descending score order, capped at
/// `max_detections`, and each is greedily matched to the highest-IoU ground
/// truth not already claimed. A prediction is a true positive when its best
/// available IoU reaches `iou_threshold`.
///
/// Returns one [`Match`] per considered prediction, sorted by descending
/// score.
pub fn match_predictions(
    predictions: &[&ResultRecord],
    ground_truths: &[&Annotation],
    iou_threshold: f64,
    max_detections: usize,
) -> Result<Vec<Match>> {
    let gt_boxes = ground_truths
        .iter()
        .map(|ann| ann.to_bbox())
        .collect::<Result<Vec<_>>>()?;

    let mut order: Vec<usize> = (0..predictions.len()).collect();
    order.sort_by(|&a, &b| {
        predictions[b]
            .score
            .partial_cmp(&predictions[a].score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order.truncate(max_detections);

    let mut claimed: HashSet<usize> = HashSet::new();
    let mut matches = Vec::with_capacity(order.len());

    for &pred_idx in &order {
        let pred = predictions[pred_idx];
        let pred_box = pred.to_bbox();

        let mut best_iou = 0.0;
        let mut best_gt: Option<usize> = None;

        for (gt_idx, gt_box) in gt_boxes.iter().enumerate() {
            if claimed.contains(&gt_idx) {
                continue;
            }
            let iou = calculate_iou(&pred_box, gt_box);
            if iou > best_iou {
                best_iou = iou;
                best_gt = Some(gt_idx);
            }
        }

        let is_true_positive = if best_iou >= iou_threshold {
            if let Some(gt_idx) = best_gt {
                claimed.insert(gt_idx);
                true
            } else {
                false
            }
        } else {
            false
        };

        matches.push(Match {
            score: pred.score,
            iou: best_iou,
            is_true_positive,
        });
    }

    Ok(matches)
}

/// Group predicted results by (image_id, category_id).
pub fn group_records(records: &[ResultRecord]) -> HashMap<(u64, u64), Vec<&ResultRecord>> {
    let mut groups: HashMap<(u64, u64), Vec<&ResultRecord>> = HashMap::new();
    for record in records {
        groups
            .entry((record.image_id, record.category_id))
            .or_default()
            .push(record);
    }
    groups
}

/// Group ground-truth annotations by (image_id, category_id).
pub fn group_annotations(annotations: &[Annotation]) -> HashMap<(u64, u64), Vec<&Annotation>> {
    let mut groups: HashMap<(u64, u64), Vec<&Annotation>> = HashMap::new();
    for annotation in annotations {
        groups
            .entry((annotation.image_id, annotation.category_id))
            .or_default()
            .push(annotation);
    }
    groups
}

/// Build the cumulative precision-recall curve from score-sorted matches.
pub fn precision_recall_curve(matches: &[Match], total_ground_truths: usize) -> (Vec<f64>, Vec<f64>) {
    let mut precisions = Vec::with_capacity(matches.len());
    let mut recalls = Vec::with_capacity(matches.len());

    let mut tp = 0usize;
    let mut fp = 0usize;

    for m in matches {
        if m.is_true_positive {
            tp += 1;
        } else {
            fp += 1;
        }

        precisions.push(tp as f64 / (tp + fp) as f64);
        recalls.push(if total_ground_truths > 0 {
            tp as f64 / total_ground_truths as f64
        } else {
            0.0
        });
    }

    (precisions, recalls)
}
