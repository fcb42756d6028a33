//! Core data types: COCO annotations, detections, formatted results and the
//! evaluation summary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Bounding box in [x1, y1, x2, y2] corner format.
pub type BBoxCorners = [f64; 4];

/// Bounding box in [x, y, width, height] format (MS COCO standard).
pub type BBoxXYWH = [f64; 4];

/// A bounding box in COCO format (x, y, width, height).
///
/// Coordinates are in LTWH (Left-Top-Width-Height) form where x/y is the
/// top-left corner of the box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Get the area of the bounding box.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Get the right coordinate (x + width).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Get the bottom coordinate (y + height).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if the bounding box is valid (positive dimensions).
    pub fn is_valid(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Convert a corner-format box back to original image space and to COCO
/// [x, y, width, height] form.
///
/// `scale` is the factor that was applied when the image was resized for
/// inference; dividing by it undoes the resize.
///
/// # Examples
///
/// ```
/// # use coco_eval_runner::types::to_original_xywh;
/// let xywh = to_original_xywh([0.0, 0.0, 10.0, 10.0], 2.0);
/// assert_eq!(xywh, [0.0, 0.0, 5.0, 5.0]);
/// ```
#[must_use]
pub fn to_original_xywh(bbox: BBoxCorners, scale: f64) -> BBoxXYWH {
    let x1 = bbox[0] / scale;
    let y1 = bbox[1] / scale;
    let x2 = bbox[2] / scale;
    let y2 = bbox[3] / scale;
    [x1, y1, x2 - x1, y2 - y1]
}

/// Convert a box from [x, y, width, height] to [x1, y1, x2, y2].
#[must_use]
pub fn xywh_to_corners(bbox: BBoxXYWH) -> BBoxCorners {
    [bbox[0], bbox[1], bbox[0] + bbox[2], bbox[1] + bbox[3]]
}

/// A category in the COCO dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supercategory: Option<String>,
}

/// An image entry in the COCO dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: u64,
    pub file_name: String,
    pub height: u32,
    pub width: u32,
}

/// A ground-truth annotation in COCO format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: u64,
    pub image_id: u64,
    pub category_id: u64,
    /// Bounding box in [x, y, width, height] format
    pub bbox: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iscrowd: Option<u8>,
}

impl Annotation {
    /// Convert the bbox array to a `BoundingBox` struct.
    pub fn to_bbox(&self) -> crate::error::Result<BoundingBox> {
        if self.bbox.len() != 4 {
            return Err(crate::error::EvalError::InvalidBoundingBox(format!(
                "Expected 4 values, got {}",
                self.bbox.len()
            )));
        }
        Ok(BoundingBox::new(
            self.bbox[0],
            self.bbox[1],
            self.bbox[2],
            self.bbox[3],
        ))
    }

    /// Get the annotation area, falling back to width * height.
    pub fn measured_area(&self) -> f64 {
        self.area.unwrap_or_else(|| {
            if self.bbox.len() == 4 {
                self.bbox[2] * self.bbox[3]
            } else {
                0.0
            }
        })
    }
}

/// A complete COCO ground-truth dataset.
///
/// This is the annotation handle the scorer matches predictions against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CocoDataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<Image>>,
    pub annotations: Vec<Annotation>,
    pub categories: Vec<Category>,
}

/// One raw model detection, rescaled to original image space.
///
/// `bbox` is in COCO [x, y, width, height] form, `label` is an index into
/// the model's own label space (not a COCO category id).
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub bbox: BBoxXYWH,
    pub score: f64,
    pub label: i64,
}

/// A formatted detection result ready for scoring and serialization.
///
/// Field order matches the COCO results schema: image id, category id,
/// score, bbox in [x, y, width, height] form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub image_id: u64,
    pub category_id: u64,
    pub score: f64,
    pub bbox: BBoxXYWH,
}

impl ResultRecord {
    /// Convert the bbox array to a `BoundingBox` struct.
    pub fn to_bbox(&self) -> BoundingBox {
        BoundingBox::new(self.bbox[0], self.bbox[1], self.bbox[2], self.bbox[3])
    }

    /// Get the area of the predicted box.
    pub fn bbox_area(&self) -> f64 {
        self.bbox[2] * self.bbox[3]
    }
}

/// The standard COCO detection summary: twelve AP/AR statistics.
///
/// Entries are `-1.0` when the corresponding slice of the dataset has no
/// ground truth to evaluate against.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvalSummary {
    /// AP averaged over IoU=0.50:0.95, all areas, 100 detections per image.
    pub ap: f64,
    /// AP at IoU=0.50.
    pub ap50: f64,
    /// AP at IoU=0.75.
    pub ap75: f64,
    /// AP for small objects (area < 32^2).
    pub ap_small: f64,
    /// AP for medium objects (32^2 <= area < 96^2).
    pub ap_medium: f64,
    /// AP for large objects (area >= 96^2).
    pub ap_large: f64,
    /// AR with at most 1 detection per image.
    pub ar1: f64,
    /// AR with at most 10 detections per image.
    pub ar10: f64,
    /// AR with at most 100 detections per image.
    pub ar100: f64,
    /// AR for small objects.
    pub ar_small: f64,
    /// AR for medium objects.
    pub ar_medium: f64,
    /// AR for large objects.
    pub ar_large: f64,
}

impl EvalSummary {
    /// Return the statistics as the fixed-size vector in the conventional
    /// COCO ordering.
    pub fn to_array(&self) -> [f64; 12] {
        [
            self.ap,
            self.ap50,
            self.ap75,
            self.ap_small,
            self.ap_medium,
            self.ap_large,
            self.ar1,
            self.ar10,
            self.ar100,
            self.ar_small,
            self.ar_medium,
            self.ar_large,
        ]
    }
}

impl fmt::Display for EvalSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            ("Average Precision  (AP)", "0.50:0.95", "   all", 100, self.ap),
            ("Average Precision  (AP)", "0.50     ", "   all", 100, self.ap50),
            ("Average Precision  (AP)", "0.75     ", "   all", 100, self.ap75),
            ("Average Precision  (AP)", "0.50:0.95", " small", 100, self.ap_small),
            ("Average Precision  (AP)", "0.50:0.95", "medium", 100, self.ap_medium),
            ("Average Precision  (AP)", "0.50:0.95", " large", 100, self.ap_large),
            ("Average Recall     (AR)", "0.50:0.95", "   all", 1, self.ar1),
            ("Average Recall     (AR)", "0.50:0.95", "   all", 10, self.ar10),
            ("Average Recall     (AR)", "0.50:0.95", "   all", 100, self.ar100),
            ("Average Recall     (AR)", "0.50:0.95", " small", 100, self.ar_small),
            ("Average Recall     (AR)", "0.50:0.95", "medium", 100, self.ar_medium),
            ("Average Recall     (AR)", "0.50:0.95", " large", 100, self.ar_large),
        ];
        for (name, iou, area, max_dets, value) in rows {
            writeln!(
                f,
                " {name} @[ IoU={iou} | area={area} | maxDets={max_dets:3} ] = {value:.3}"
            )?;
        }
        Ok(())
    }
}
