//! Average Precision calculation with COCO-style 101-point interpolation.

/// Calculate Average Precision from a precision-recall curve.
///
/// Precision is sampled at 101 evenly spaced recall levels (0.0 to 1.0);
/// at each level the maximum precision over all points with recall at or
/// above that level is taken, matching the COCO protocol.
///
/// # Arguments
///
/// * `precisions` - Precision values along the curve (cumulative, sorted by
///   descending confidence)
/// * `recalls` - The matching recall values
///
/// # Example
///
/// ```
/// use coco_eval_runner::metrics::ap::average_precision;
///
/// let precisions = vec![1.0, 1.0, 0.67];
/// let recalls = vec![0.5, 1.0, 1.0];
/// let ap = average_precision(&precisions, &recalls);
/// assert!(ap > 0.0 && ap <= 1.0);
/// ```
pub fn average_precision(precisions: &[f64], recalls: &[f64]) -> f64 {
    if precisions.is_empty() || recalls.is_empty() {
        return 0.0;
    }

    let mut total = 0.0;
    for step in 0..=100 {
        let level = step as f64 / 100.0;
        let best = precisions
            .iter()
            .zip(recalls)
            .filter(|(_, &recall)| recall >= level)
            .map(|(&precision, _)| precision)
            .fold(0.0, f64::max);
        total += best;
    }

    total / 101.0
}

/// Mean of a set of metric values; 0.0 for an empty set.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
