//! Statistics tracking for the detection pass.
//!
//! These counters describe what happened to detections during a run. They
//! have no effect on the evaluation result and exist for logging only.

use serde::{Deserialize, Serialize};

/// Counters collected while iterating the dataset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Number of samples processed.
    pub images_processed: usize,

    /// Number of formatted results emitted.
    pub detections_emitted: usize,

    /// Number of detections dropped by the post-detection hook.
    pub discarded_by_hook: usize,

    /// Number of detections relabeled by the post-detection hook.
    pub relabeled_by_hook: usize,

    /// Number of detections dropped by the category filter.
    pub filtered_by_category: usize,
}

impl RunStats {
    /// Create a new `RunStats` with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a processed sample.
    pub fn process_image(&mut self) {
        self.images_processed += 1;
    }

    /// Record an emitted result.
    pub fn emit(&mut self) {
        self.detections_emitted += 1;
    }

    /// Record a detection dropped by the hook.
    pub fn discard_by_hook(&mut self) {
        self.discarded_by_hook += 1;
    }

    /// Record a detection relabeled by the hook.
    pub fn relabel_by_hook(&mut self) {
        self.relabeled_by_hook += 1;
    }

    /// Record a detection dropped by the category filter.
    pub fn filter_by_category(&mut self) {
        self.filtered_by_category += 1;
    }

    /// Total detections that were inspected but not emitted.
    pub fn total_dropped(&self) -> usize {
        self.discarded_by_hook + self.filtered_by_category
    }

    /// Get a formatted one-line summary of the statistics.
    pub fn summary_string(&self) -> String {
        format!(
            "RunStats {{ images: {}, emitted: {}, hook_discarded: {}, hook_relabeled: {}, filtered: {} }}",
            self.images_processed,
            self.detections_emitted,
            self.discarded_by_hook,
            self.relabeled_by_hook,
            self.filtered_by_category
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stats_are_zero() {
        let stats = RunStats::new();
        assert_eq!(stats.images_processed, 0);
        assert_eq!(stats.detections_emitted, 0);
        assert_eq!(stats.total_dropped(), 0);
    }

    #[test]
    fn test_counters() {
        let mut stats = RunStats::new();
        stats.process_image();
        stats.emit();
        stats.emit();
        stats.discard_by_hook();
        stats.relabel_by_hook();
        stats.filter_by_category();

        assert_eq!(stats.images_processed, 1);
        assert_eq!(stats.detections_emitted, 2);
        assert_eq!(stats.total_dropped(), 2);
    }

    #[test]
    fn test_summary_string() {
        let mut stats = RunStats::new();
        stats.process_image();
        stats.emit();

        let summary = stats.summary_string();
        assert!(summary.contains("images: 1"));
        assert!(summary.contains("emitted: 1"));
    }
}
