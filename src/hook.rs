//! Post-detection hooks: inject per-detection relabeling or filtering into
//! the evaluation loop without touching the core pipeline.

use crate::types::Detection;

/// What the runner should do with a detection after inspecting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookAction {
    /// Emit the detection with its label mapped through the dataset.
    Keep,
    /// Emit the detection but force this COCO category id.
    Relabel(u64),
    /// Drop the detection entirely.
    Discard,
}

/// A caller-supplied hook inspecting each detection before it is formatted.
///
/// Hooks see detections after rescaling to original image space, with the
/// bbox already in [x, y, width, height] form and the label still in the
/// model's own label space.
pub trait DetectionHook {
    fn inspect(&self, detection: &Detection) -> HookAction;
}

/// A [`DetectionHook`] wrapping a plain function or closure.
///
/// Built with [`hook_fn`].
#[derive(Debug, Clone, Copy)]
pub struct HookFn<F>(F);

/// Wrap a closure as a [`DetectionHook`].
///
/// # Example
///
/// ```
/// use coco_eval_runner::hook::{hook_fn, HookAction};
///
/// let drop_tiny = hook_fn(|d| {
///     if d.bbox[2] * d.bbox[3] < 1.0 {
///         HookAction::Discard
///     } else {
///         HookAction::Keep
///     }
/// });
/// ```
pub fn hook_fn<F>(f: F) -> HookFn<F>
where
    F: Fn(&Detection) -> HookAction,
{
    HookFn(f)
}

impl<F> DetectionHook for HookFn<F>
where
    F: Fn(&Detection) -> HookAction,
{
    fn inspect(&self, detection: &Detection) -> HookAction {
        (self.0)(detection)
    }
}

/// Keep a single model label, rewriting its category id; discard the rest.
///
/// This exists for single-category evaluations of models trained with a
/// wider label space, where the detector reports the right boxes under a
/// known-wrong label. Detections carrying `sentinel_label` are emitted with
/// `replacement_category`; every other detection is dropped.
#[derive(Debug, Clone, Copy)]
pub struct SentinelRelabel {
    sentinel_label: i64,
    replacement_category: u64,
}

impl SentinelRelabel {
    /// Create a hook that keeps only `sentinel_label` and emits it as
    /// `replacement_category`.
    pub fn new(sentinel_label: i64, replacement_category: u64) -> Self {
        Self {
            sentinel_label,
            replacement_category,
        }
    }
}

impl DetectionHook for SentinelRelabel {
    fn inspect(&self, detection: &Detection) -> HookAction {
        if detection.label == self.sentinel_label {
            HookAction::Relabel(self.replacement_category)
        } else {
            HookAction::Discard
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(label: i64) -> Detection {
        Detection {
            bbox: [0.0, 0.0, 10.0, 10.0],
            score: 0.9,
            label,
        }
    }

    #[test]
    fn test_sentinel_relabel_matches() {
        let hook = SentinelRelabel::new(2, 3);
        assert_eq!(hook.inspect(&detection(2)), HookAction::Relabel(3));
    }

    #[test]
    fn test_sentinel_relabel_discards_others() {
        let hook = SentinelRelabel::new(2, 3);
        assert_eq!(hook.inspect(&detection(0)), HookAction::Discard);
        assert_eq!(hook.inspect(&detection(5)), HookAction::Discard);
    }

    #[test]
    fn test_closure_hook() {
        let hook = hook_fn(|d: &Detection| {
            if d.score > 0.5 {
                HookAction::Keep
            } else {
                HookAction::Discard
            }
        });
        assert_eq!(hook.inspect(&detection(1)), HookAction::Keep);
    }
}
