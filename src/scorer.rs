//! Scoring of formatted results against ground truth.
//!
//! [`Scorer`] is the seam the runner hands its accumulated results to; the
//! built-in [`CocoScorer`] implements the standard COCO protocol (IoU sweep
//! 0.50:0.05:0.95, area ranges, detection caps) and produces the familiar
//! twelve-entry summary.

use crate::error::Result;
use crate::matching::{
    group_annotations, group_records, match_predictions, precision_recall_curve, Match,
};
use crate::metrics::ap::{average_precision, mean};
use crate::types::{Annotation, CocoDataset, EvalSummary, ResultRecord};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// An object-detection scorer.
///
/// Scoring is restricted to the given processed image ids and, when present,
/// to the given category ids.
pub trait Scorer {
    fn score(
        &self,
        ground_truth: &CocoDataset,
        results: &[ResultRecord],
        image_ids: &[u64],
        category_ids: Option<&[u64]>,
    ) -> Result<EvalSummary>;
}

/// An object size band, in squared pixels of box area.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AreaRange {
    min: f64,
    max: f64,
}

impl AreaRange {
    const ALL: AreaRange = AreaRange { min: 0.0, max: f64::INFINITY };
    const SMALL: AreaRange = AreaRange { min: 0.0, max: 32.0 * 32.0 };
    const MEDIUM: AreaRange = AreaRange { min: 32.0 * 32.0, max: 96.0 * 96.0 };
    const LARGE: AreaRange = AreaRange { min: 96.0 * 96.0, max: f64::INFINITY };

    fn contains(&self, area: f64) -> bool {
        area >= self.min && area < self.max
    }
}

/// Detection cap used for all AP statistics.
const AP_MAX_DETECTIONS: usize = 100;

/// COCO-protocol scorer.
///
/// Matches predictions greedily per image and category at each IoU
/// threshold, computes 101-point interpolated AP and best-recall AR, and
/// averages over categories and thresholds. Slices of the dataset with no
/// ground truth contribute `-1.0`, as in the reference protocol.
#[derive(Debug, Clone)]
pub struct CocoScorer {
    iou_thresholds: Vec<f64>,
}

impl Default for CocoScorer {
    fn default() -> Self {
        Self {
            // Standard sweep: 0.50:0.05:0.95
            iou_thresholds: (0..10).map(|i| 0.5 + 0.05 * i as f64).collect(),
        }
    }
}

impl CocoScorer {
    /// Create a scorer with the standard IoU threshold sweep.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scorer with custom IoU thresholds.
    pub fn with_iou_thresholds(iou_thresholds: Vec<f64>) -> Self {
        Self { iou_thresholds }
    }

    fn average_ap(
        &self,
        groups: &Groups<'_>,
        categories: &[u64],
        iou_thresholds: &[f64],
        area: AreaRange,
    ) -> Result<f64> {
        let mut values = Vec::new();

        for &category in categories {
            let images = groups.category_images(category);
            for &iou_threshold in iou_thresholds {
                let (matches, total_gt) =
                    groups.class_matches(&images, category, iou_threshold, area, AP_MAX_DETECTIONS)?;
                if total_gt == 0 {
                    continue;
                }
                let (precisions, recalls) = precision_recall_curve(&matches, total_gt);
                values.push(average_precision(&precisions, &recalls));
            }
        }

        if values.is_empty() {
            Ok(-1.0)
        } else {
            Ok(mean(&values))
        }
    }

    fn average_recall(
        &self,
        groups: &Groups<'_>,
        categories: &[u64],
        max_detections: usize,
        area: AreaRange,
    ) -> Result<f64> {
        let mut values = Vec::new();

        for &category in categories {
            let images = groups.category_images(category);
            for &iou_threshold in &self.iou_thresholds {
                let (matches, total_gt) =
                    groups.class_matches(&images, category, iou_threshold, area, max_detections)?;
                if total_gt == 0 {
                    continue;
                }
                let true_positives = matches.iter().filter(|m| m.is_true_positive).count();
                values.push(true_positives as f64 / total_gt as f64);
            }
        }

        if values.is_empty() {
            Ok(-1.0)
        } else {
            Ok(mean(&values))
        }
    }
}

impl Scorer for CocoScorer {
    fn score(
        &self,
        ground_truth: &CocoDataset,
        results: &[ResultRecord],
        image_ids: &[u64],
        category_ids: Option<&[u64]>,
    ) -> Result<EvalSummary> {
        let image_set: HashSet<u64> = image_ids.iter().copied().collect();

        let categories: Vec<u64> = match category_ids {
            Some(ids) => ids.to_vec(),
            None => {
                // evaluate every category the ground truth declares
                let mut ids: Vec<u64> = if ground_truth.categories.is_empty() {
                    ground_truth
                        .annotations
                        .iter()
                        .map(|ann| ann.category_id)
                        .collect::<HashSet<_>>()
                        .into_iter()
                        .collect()
                } else {
                    ground_truth.categories.iter().map(|c| c.id).collect()
                };
                ids.sort_unstable();
                ids
            }
        };

        let groups = Groups {
            gt: group_annotations(&ground_truth.annotations),
            pred: group_records(results),
            image_set,
        };

        let iou50 = [0.5];
        let iou75 = [0.75];

        let summary = EvalSummary {
            ap: self.average_ap(&groups, &categories, &self.iou_thresholds, AreaRange::ALL)?,
            ap50: self.average_ap(&groups, &categories, &iou50, AreaRange::ALL)?,
            ap75: self.average_ap(&groups, &categories, &iou75, AreaRange::ALL)?,
            ap_small: self.average_ap(&groups, &categories, &self.iou_thresholds, AreaRange::SMALL)?,
            ap_medium: self.average_ap(&groups, &categories, &self.iou_thresholds, AreaRange::MEDIUM)?,
            ap_large: self.average_ap(&groups, &categories, &self.iou_thresholds, AreaRange::LARGE)?,
            ar1: self.average_recall(&groups, &categories, 1, AreaRange::ALL)?,
            ar10: self.average_recall(&groups, &categories, 10, AreaRange::ALL)?,
            ar100: self.average_recall(&groups, &categories, 100, AreaRange::ALL)?,
            ar_small: self.average_recall(&groups, &categories, 100, AreaRange::SMALL)?,
            ar_medium: self.average_recall(&groups, &categories, 100, AreaRange::MEDIUM)?,
            ar_large: self.average_recall(&groups, &categories, 100, AreaRange::LARGE)?,
        };

        debug!(ap = summary.ap, ap50 = summary.ap50, ar100 = summary.ar100, "scoring complete");

        Ok(summary)
    }
}

/// Grouped ground truth and predictions, restricted to a set of image ids.
struct Groups<'a> {
    gt: HashMap<(u64, u64), Vec<&'a Annotation>>,
    pred: HashMap<(u64, u64), Vec<&'a ResultRecord>>,
    image_set: HashSet<u64>,
}

impl Groups<'_> {
    /// Images carrying ground truth or predictions for a category, limited
    /// to the processed image set.
    fn category_images(&self, category: u64) -> Vec<u64> {
        let mut images: HashSet<u64> = HashSet::new();
        for &(image_id, category_id) in self.gt.keys() {
            if category_id == category && self.image_set.contains(&image_id) {
                images.insert(image_id);
            }
        }
        for &(image_id, category_id) in self.pred.keys() {
            if category_id == category && self.image_set.contains(&image_id) {
                images.insert(image_id);
            }
        }
        let mut images: Vec<u64> = images.into_iter().collect();
        images.sort_unstable();
        images
    }

    /// Collect score-sorted matches and the ground-truth count for one
    /// category across the given images, within an area range.
    fn class_matches(
        &self,
        images: &[u64],
        category: u64,
        iou_threshold: f64,
        area: AreaRange,
        max_detections: usize,
    ) -> Result<(Vec<Match>, usize)> {
        let mut all_matches = Vec::new();
        let mut total_gt = 0usize;

        for &image in images {
            let key = (image, category);

            let gts: Vec<&Annotation> = self
                .gt
                .get(&key)
                .map(|anns| {
                    anns.iter()
                        .copied()
                        .filter(|ann| area.contains(ann.measured_area()))
                        .collect()
                })
                .unwrap_or_default();

            let preds: Vec<&ResultRecord> = self
                .pred
                .get(&key)
                .map(|records| {
                    records
                        .iter()
                        .copied()
                        .filter(|record| area.contains(record.bbox_area()))
                        .collect()
                })
                .unwrap_or_default();

            total_gt += gts.len();

            if !preds.is_empty() {
                all_matches.extend(match_predictions(&preds, &gts, iou_threshold, max_detections)?);
            }
        }

        all_matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok((all_matches, total_gt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;

    fn annotation(id: u64, image_id: u64, category_id: u64, bbox: Vec<f64>) -> Annotation {
        let area = Some(bbox[2] * bbox[3]);
        Annotation {
            id,
            image_id,
            category_id,
            bbox,
            area,
            iscrowd: None,
        }
    }

    fn record(image_id: u64, category_id: u64, score: f64, bbox: [f64; 4]) -> ResultRecord {
        ResultRecord {
            image_id,
            category_id,
            score,
            bbox,
        }
    }

    fn ground_truth(annotations: Vec<Annotation>, category_ids: &[u64]) -> CocoDataset {
        CocoDataset {
            images: None,
            annotations,
            categories: category_ids
                .iter()
                .map(|&id| Category {
                    id,
                    name: format!("category-{id}"),
                    supercategory: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_area_range_bounds() {
        assert!(AreaRange::SMALL.contains(100.0));
        assert!(!AreaRange::SMALL.contains(1024.0));
        assert!(AreaRange::MEDIUM.contains(1024.0));
        assert!(AreaRange::LARGE.contains(96.0 * 96.0));
        assert!(AreaRange::ALL.contains(1e9));
    }

    #[test]
    fn test_perfect_predictions() {
        let gt = ground_truth(
            vec![annotation(1, 1, 1, vec![10.0, 10.0, 50.0, 50.0])],
            &[1],
        );
        let results = vec![record(1, 1, 0.95, [10.0, 10.0, 50.0, 50.0])];

        let summary = CocoScorer::new().score(&gt, &results, &[1], None).unwrap();

        assert!((summary.ap - 1.0).abs() < 1e-10, "ap = {}", summary.ap);
        assert!((summary.ap50 - 1.0).abs() < 1e-10);
        assert!((summary.ar100 - 1.0).abs() < 1e-10);
        // 50x50 box is a medium object; no small or large ground truth
        assert_eq!(summary.ap_small, -1.0);
        assert!((summary.ap_medium - 1.0).abs() < 1e-10);
        assert_eq!(summary.ap_large, -1.0);
    }

    #[test]
    fn test_missed_predictions() {
        let gt = ground_truth(
            vec![annotation(1, 1, 1, vec![10.0, 10.0, 50.0, 50.0])],
            &[1],
        );
        let results = vec![record(1, 1, 0.95, [300.0, 300.0, 50.0, 50.0])];

        let summary = CocoScorer::new().score(&gt, &results, &[1], None).unwrap();
        assert!(summary.ap.abs() < 1e-10);
        assert!(summary.ar100.abs() < 1e-10);
    }

    #[test]
    fn test_image_restriction() {
        let gt = ground_truth(
            vec![
                annotation(1, 1, 1, vec![10.0, 10.0, 50.0, 50.0]),
                annotation(2, 2, 1, vec![10.0, 10.0, 50.0, 50.0]),
            ],
            &[1],
        );
        // only image 1 was processed; the unmatched gt on image 2 must not
        // drag recall down
        let results = vec![record(1, 1, 0.95, [10.0, 10.0, 50.0, 50.0])];

        let summary = CocoScorer::new().score(&gt, &results, &[1], None).unwrap();
        assert!((summary.ar100 - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_category_restriction() {
        let gt = ground_truth(
            vec![
                annotation(1, 1, 1, vec![10.0, 10.0, 50.0, 50.0]),
                annotation(2, 1, 2, vec![100.0, 100.0, 50.0, 50.0]),
            ],
            &[1, 2],
        );
        // category 2 has no prediction; restricting to category 1 should
        // still give a perfect score
        let results = vec![record(1, 1, 0.95, [10.0, 10.0, 50.0, 50.0])];

        let summary = CocoScorer::new()
            .score(&gt, &results, &[1], Some(&[1]))
            .unwrap();
        assert!((summary.ap - 1.0).abs() < 1e-10);

        let unrestricted = CocoScorer::new().score(&gt, &results, &[1], None).unwrap();
        assert!(unrestricted.ap < 1.0);
    }

    #[test]
    fn test_ar1_caps_detections() {
        let gt = ground_truth(
            vec![
                annotation(1, 1, 1, vec![0.0, 0.0, 50.0, 50.0]),
                annotation(2, 1, 1, vec![200.0, 200.0, 50.0, 50.0]),
            ],
            &[1],
        );
        let results = vec![
            record(1, 1, 0.95, [0.0, 0.0, 50.0, 50.0]),
            record(1, 1, 0.90, [200.0, 200.0, 50.0, 50.0]),
        ];

        let summary = CocoScorer::new().score(&gt, &results, &[1], None).unwrap();
        assert!((summary.ar1 - 0.5).abs() < 1e-10, "ar1 = {}", summary.ar1);
        assert!((summary.ar10 - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_no_ground_truth_yields_sentinels() {
        let gt = ground_truth(vec![], &[1]);
        let results = vec![record(1, 1, 0.95, [10.0, 10.0, 50.0, 50.0])];

        let summary = CocoScorer::new().score(&gt, &results, &[1], None).unwrap();
        assert_eq!(summary.ap, -1.0);
        assert_eq!(summary.ar100, -1.0);
    }
}
