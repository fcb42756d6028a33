//! End-to-end evaluation on a tiny synthetic dataset.
//!
//! A real integration would wrap an actual image pipeline and inference
//! backend behind the `Dataset` and `Model` traits; here both are stubbed
//! with fixed boxes so the example runs anywhere.

use coco_eval_runner::{
    evaluate, Annotation, Category, CocoDataset, CocoScorer, Dataset, EvalConfig, ImageDetections,
    Model,
};

/// Two synthetic 640x480 "images", each with one annotated object.
struct SyntheticDataset {
    ground_truth: CocoDataset,
}

impl SyntheticDataset {
    fn new() -> Self {
        let annotations = vec![
            Annotation {
                id: 1,
                image_id: 100,
                category_id: 1,
                bbox: vec![50.0, 50.0, 120.0, 80.0],
                area: Some(120.0 * 80.0),
                iscrowd: None,
            },
            Annotation {
                id: 2,
                image_id: 101,
                category_id: 1,
                bbox: vec![200.0, 100.0, 60.0, 90.0],
                area: Some(60.0 * 90.0),
                iscrowd: None,
            },
        ];
        let categories = vec![Category {
            id: 1,
            name: "person".to_string(),
            supercategory: None,
        }];
        Self {
            ground_truth: CocoDataset {
                images: None,
                annotations,
                categories,
            },
        }
    }
}

impl Dataset for SyntheticDataset {
    type Image = usize;

    fn len(&self) -> usize {
        2
    }

    fn load_image(&self, index: usize) -> coco_eval_runner::Result<usize> {
        Ok(index)
    }

    fn preprocess_image(&self, image: usize) -> usize {
        image
    }

    fn resize_image(&self, image: usize) -> (usize, f64) {
        // pretend every image was upscaled 1.25x for the model
        (image, 1.25)
    }

    fn image_id(&self, index: usize) -> u64 {
        100 + index as u64
    }

    fn label_to_category_id(&self, label: i64) -> u64 {
        // single-class model: label 0 is "person"
        match label {
            0 => 1,
            _ => 0,
        }
    }

    fn set_name(&self) -> &str {
        "synthetic_demo"
    }

    fn ground_truth(&self) -> &CocoDataset {
        &self.ground_truth
    }
}

/// A "model" that answers with boxes near the ground truth, in the resized
/// (1.25x) coordinate space, sorted by descending score.
struct SyntheticModel;

impl Model for SyntheticModel {
    type Image = usize;

    fn predict(&self, batch: &[usize]) -> coco_eval_runner::Result<Vec<ImageDetections>> {
        Ok(batch
            .iter()
            .map(|&index| match index {
                0 => ImageDetections {
                    boxes: vec![
                        [62.5, 62.5, 212.5, 162.5],
                        [400.0, 300.0, 500.0, 380.0],
                    ],
                    scores: vec![0.92, 0.03],
                    labels: vec![0, 0],
                },
                _ => ImageDetections {
                    boxes: vec![[250.0, 125.0, 325.0, 237.5]],
                    scores: vec![0.88],
                    labels: vec![0],
                },
            })
            .collect())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let dataset = SyntheticDataset::new();
    let model = SyntheticModel;
    let scorer = CocoScorer::new();
    let config = EvalConfig {
        output_dir: std::env::temp_dir(),
        ..EvalConfig::default()
    };

    match evaluate(&dataset, &model, &scorer, &config)? {
        Some(summary) => {
            println!("{summary}");
            println!("stats vector: {:?}", summary.to_array());
        }
        None => println!("no detections above threshold"),
    }

    Ok(())
}
