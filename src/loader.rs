//! JSON loading utilities for COCO format ground truth.

use crate::error::{EvalError, Result};
use crate::types::CocoDataset;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load a COCO ground-truth dataset from a JSON file.
///
/// # Arguments
///
/// * `path` - Path to the COCO JSON file
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed, or fails structural
/// validation.
///
/// # Example
///
/// ```no_run
/// use coco_eval_runner::loader::load_from_file;
///
/// let ground_truth = load_from_file("instances_val.json").unwrap();
/// println!("Loaded {} annotations", ground_truth.annotations.len());
/// ```
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<CocoDataset> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let dataset: CocoDataset = serde_json::from_reader(reader)?;

    validate_dataset(&dataset)?;

    Ok(dataset)
}

/// Load a COCO ground-truth dataset from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON cannot be parsed or fails structural
/// validation.
///
/// # Example
///
/// ```
/// use coco_eval_runner::loader::load_from_string;
///
/// let json = r#"{
///     "annotations": [],
///     "categories": [{"id": 1, "name": "person"}]
/// }"#;
/// let ground_truth = load_from_string(json).unwrap();
/// ```
pub fn load_from_string(json_str: &str) -> Result<CocoDataset> {
    let dataset: CocoDataset = serde_json::from_str(json_str)?;
    validate_dataset(&dataset)?;
    Ok(dataset)
}

/// Validate that a COCO dataset has the required structure.
fn validate_dataset(dataset: &CocoDataset) -> Result<()> {
    if dataset.categories.is_empty() {
        return Err(EvalError::EmptyDataset(
            "Dataset must contain at least one category".to_string(),
        ));
    }

    for annotation in &dataset.annotations {
        if annotation.bbox.len() != 4 {
            return Err(EvalError::InvalidAnnotation(format!(
                "Annotation {} has invalid bbox length: {}",
                annotation.id,
                annotation.bbox.len()
            )));
        }

        if annotation.bbox[2] < 0.0 || annotation.bbox[3] < 0.0 {
            return Err(EvalError::InvalidBoundingBox(format!(
                "Annotation {} has negative dimensions",
                annotation.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_string() {
        let json = r#"{
            "annotations": [
                {
                    "id": 1,
                    "image_id": 1,
                    "category_id": 1,
                    "bbox": [10.0, 20.0, 30.0, 40.0]
                }
            ],
            "categories": [
                {
                    "id": 1,
                    "name": "person"
                }
            ]
        }"#;

        let dataset = load_from_string(json).unwrap();
        assert_eq!(dataset.annotations.len(), 1);
        assert_eq!(dataset.categories.len(), 1);
    }

    #[test]
    fn test_empty_categories() {
        let json = r#"{
            "annotations": [],
            "categories": []
        }"#;

        assert!(load_from_string(json).is_err());
    }

    #[test]
    fn test_invalid_bbox_length() {
        let json = r#"{
            "annotations": [
                {
                    "id": 1,
                    "image_id": 1,
                    "category_id": 1,
                    "bbox": [10.0, 20.0, 30.0]
                }
            ],
            "categories": [
                {
                    "id": 1,
                    "name": "person"
                }
            ]
        }"#;

        assert!(load_from_string(json).is_err());
    }

    #[test]
    fn test_negative_dimensions() {
        let json = r#"{
            "annotations": [
                {
                    "id": 1,
                    "image_id": 1,
                    "category_id": 1,
                    "bbox": [10.0, 20.0, -5.0, 40.0]
                }
            ],
            "categories": [
                {
                    "id": 1,
                    "name": "person"
                }
            ]
        }"#;

        assert!(load_from_string(json).is_err());
    }
}
