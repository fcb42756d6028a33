//! Integration tests for the built-in COCO scorer.

use coco_eval_runner::{Annotation, Category, CocoDataset, CocoScorer, ResultRecord, Scorer};

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
fn test_perfect_predictions_across_images() {
    let gt = ground_truth(
        vec![
            annotation(1, 1, 1, vec![10.0, 10.0, 50.0, 50.0]),
            annotation(2, 1, 1, vec![100.0, 100.0, 50.0, 50.0]),
            annotation(3, 2, 1, vec![20.0, 20.0, 40.0, 40.0]),
        ],
        &[1],
    );
    let results = vec![
        record(1, 1, 0.95, [10.0, 10.0, 50.0, 50.0]),
        record(1, 1, 0.90, [100.0, 100.0, 50.0, 50.0]),
        record(2, 1, 0.85, [20.0, 20.0, 40.0, 40.0]),
    ];

    let summary = CocoScorer::new().score(&gt, &results, &[1, 2], None).unwrap();

    assert!((summary.ap - 1.0).abs() < 1e-10, "ap = {}", summary.ap);
    assert!((summary.ap50 - 1.0).abs() < 1e-10);
    assert!((summary.ap75 - 1.0).abs() < 1e-10);
    assert!((summary.ar100 - 1.0).abs() < 1e-10);
}

#[test]
fn test_low_score_false_positive_does_not_hurt_ap() {
    let gt = ground_truth(
        vec![annotation(1, 1, 1, vec![10.0, 10.0, 50.0, 50.0])],
        &[1],
    );
    // the true positive outranks the false positive, so full recall is
    // reached at precision 1.0
    let results = vec![
        record(1, 1, 0.95, [10.0, 10.0, 50.0, 50.0]),
        record(1, 1, 0.60, [300.0, 300.0, 50.0, 50.0]),
    ];

    let summary = CocoScorer::new().score(&gt, &results, &[1], None).unwrap();
    assert!((summary.ap50 - 1.0).abs() < 1e-10, "ap50 = {}", summary.ap50);
}

#[test]
fn test_high_score_false_positive_halves_ap() {
    let gt = ground_truth(
        vec![annotation(1, 1, 1, vec![10.0, 10.0, 50.0, 50.0])],
        &[1],
    );
    let results = vec![
        record(1, 1, 0.95, [300.0, 300.0, 50.0, 50.0]),
        record(1, 1, 0.60, [10.0, 10.0, 50.0, 50.0]),
    ];

    let summary = CocoScorer::new().score(&gt, &results, &[1], None).unwrap();
    // best precision at full recall is 1/2
    assert!((summary.ap50 - 0.5).abs() < 1e-10, "ap50 = {}", summary.ap50);
}

#[test]
fn test_loose_box_fails_high_iou_thresholds() {
    let gt = ground_truth(
        vec![annotation(1, 1, 1, vec![0.0, 0.0, 100.0, 100.0])],
        &[1],
    );
    // IoU of [0,0,100,78] vs [0,0,100,100] is 0.78: passes 0.50, fails 0.80+
    let results = vec![record(1, 1, 0.95, [0.0, 0.0, 100.0, 78.0])];

    let summary = CocoScorer::new().score(&gt, &results, &[1], None).unwrap();
    assert!((summary.ap50 - 1.0).abs() < 1e-10);
    assert!((summary.ap75 - 1.0).abs() < 1e-10);
    // 6 of 10 sweep thresholds accept the match
    assert!((summary.ap - 0.6).abs() < 1e-10, "ap = {}", summary.ap);
}

#[test]
fn test_multiple_categories_average() {
    let gt = ground_truth(
        vec![
            annotation(1, 1, 1, vec![10.0, 10.0, 50.0, 50.0]),
            annotation(2, 1, 2, vec![100.0, 100.0, 50.0, 50.0]),
        ],
        &[1, 2],
    );
    // category 1 perfect, category 2 missed entirely
    let results = vec![record(1, 1, 0.95, [10.0, 10.0, 50.0, 50.0])];

    let summary = CocoScorer::new().score(&gt, &results, &[1], None).unwrap();
    assert!((summary.ap - 0.5).abs() < 1e-10, "ap = {}", summary.ap);
    assert!((summary.ar100 - 0.5).abs() < 1e-10);
}

#[test]
fn test_unprocessed_images_are_ignored() {
    let gt = ground_truth(
        vec![
            annotation(1, 1, 1, vec![10.0, 10.0, 50.0, 50.0]),
            annotation(2, 5, 1, vec![10.0, 10.0, 50.0, 50.0]),
        ],
        &[1],
    );
    let results = vec![record(1, 1, 0.95, [10.0, 10.0, 50.0, 50.0])];

    // image 5 was never run, so its ground truth must not count
    let summary = CocoScorer::new().score(&gt, &results, &[1], None).unwrap();
    assert!((summary.ap - 1.0).abs() < 1e-10);
    assert!((summary.ar100 - 1.0).abs() < 1e-10);
}

#[test]
fn test_size_band_sentinels() {
    // a single 20x20 object: small band only
    let gt = ground_truth(vec![annotation(1, 1, 1, vec![0.0, 0.0, 20.0, 20.0])], &[1]);
    let results = vec![record(1, 1, 0.9, [0.0, 0.0, 20.0, 20.0])];

    let summary = CocoScorer::new().score(&gt, &results, &[1], None).unwrap();
    assert!((summary.ap_small - 1.0).abs() < 1e-10);
    assert_eq!(summary.ap_medium, -1.0);
    assert_eq!(summary.ap_large, -1.0);
    assert_eq!(summary.ar_medium, -1.0);
    assert_eq!(summary.ar_large, -1.0);
}

#[test]
fn test_custom_iou_thresholds() {
    let gt = ground_truth(vec![annotation(1, 1, 1, vec![0.0, 0.0, 100.0, 100.0])], &[1]);
    let results = vec![record(1, 1, 0.9, [0.0, 0.0, 100.0, 80.0])];

    let strict = CocoScorer::with_iou_thresholds(vec![0.9]);
    let summary = strict.score(&gt, &results, &[1], None).unwrap();
    assert!(summary.ap.abs() < 1e-10);

    let lenient = CocoScorer::with_iou_thresholds(vec![0.5]);
    let summary = lenient.score(&gt, &results, &[1], None).unwrap();
    assert!((summary.ap - 1.0).abs() < 1e-10);
}
