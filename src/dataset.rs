//! The dataset generator interface consumed by the evaluation runner.

use crate::error::Result;
use crate::types::CocoDataset;

/// Memory layout of the image tensor handed to the model.
///
/// This is an explicit configuration value rather than global backend state;
/// the runner passes it into [`Dataset::apply_data_format`] before inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataFormat {
    /// Height x width x channels (the common default).
    #[default]
    ChannelsLast,
    /// Channels x height x width.
    ChannelsFirst,
}

/// An ordered collection of evaluation samples.
///
/// The dataset owns image loading, preprocessing and resizing, the mapping
/// from model labels to COCO category ids, and the ground-truth annotations
/// used for scoring. The runner drives it strictly in index order.
pub trait Dataset {
    /// The image representation handed to the model.
    type Image;

    /// Number of samples in the dataset.
    fn len(&self) -> usize;

    /// Whether the dataset has no samples.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load the raw image for a sample.
    fn load_image(&self, index: usize) -> Result<Self::Image>;

    /// Apply model-specific preprocessing (normalization etc.).
    fn preprocess_image(&self, image: Self::Image) -> Self::Image;

    /// Resize the image for inference, returning the scale factor applied.
    fn resize_image(&self, image: Self::Image) -> (Self::Image, f64);

    /// Reorder the image memory layout for the requested format.
    ///
    /// The default implementation returns the image unchanged, which is
    /// correct for datasets that already produce channels-last tensors.
    fn apply_data_format(&self, image: Self::Image, format: DataFormat) -> Self::Image {
        let _ = format;
        image
    }

    /// COCO image id of a sample.
    fn image_id(&self, index: usize) -> u64;

    /// Map a model label to the corresponding COCO category id.
    fn label_to_category_id(&self, label: i64) -> u64;

    /// Human-readable name of this evaluation run, used as a prefix for the
    /// persisted result files.
    fn set_name(&self) -> &str;

    /// Ground-truth annotations for the whole dataset.
    fn ground_truth(&self) -> &CocoDataset;
}
