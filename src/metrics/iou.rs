//! Intersection over Union (IoU) calculation.

use crate::types::BoundingBox;

/// Calculate the Intersection over Union (IoU) between two bounding boxes.
///
/// IoU is the area of intersection divided by the area of union. Returns a
/// value between 0.0 (no overlap) and 1.0 (identical boxes).
///
/// # Example
///
/// ```
/// use coco_eval_runner::metrics::iou::calculate_iou;
/// use coco_eval_runner::types::BoundingBox;
///
/// let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
/// let b = BoundingBox::new(5.0, 5.0, 10.0, 10.0);
/// let iou = calculate_iou(&a, &b);
/// assert!(iou > 0.0 && iou < 1.0);
/// ```
pub fn calculate_iou(a: &BoundingBox, b: &BoundingBox) -> f64 {
    let x_left = a.x.max(b.x);
    let y_top = a.y.max(b.y);
    let x_right = a.right().min(b.right());
    let y_bottom = a.bottom().min(b.bottom());

    let intersection = (x_right - x_left).max(0.0) * (y_bottom - y_top).max(0.0);
    let union = a.area() + b.area() - intersection;

    if union <= 0.0 {
        return 0.0;
    }

    intersection / union
}
