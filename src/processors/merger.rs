//! Pairwise shape merging.

use std::sync::Arc;

use tracing::trace;

use crate::core::traits::MergeScorer;
use crate::domain::{Shape, ShapePair};

/// Scores and applies merges of two consecutive shapes.
///
/// The merger itself applies no geometric gating; callers reject
/// implausible pairs before consulting it.
pub struct ShapeMerger {
    scorer: Arc<dyn MergeScorer>,
}

impl ShapeMerger {
    /// Creates a merger around a scoring oracle.
    pub fn new(scorer: Arc<dyn MergeScorer>) -> Self {
        Self { scorer }
    }

    /// Returns the probability that the two shapes are fragments of one
    /// letter.
    pub fn check_merge(&self, first: &Shape, second: &Shape) -> f64 {
        let pair = ShapePair::new(first.clone(), second.clone());
        let prob = self.scorer.score_merge(&pair);
        trace!(%pair, prob, "merge scored");
        prob
    }

    /// Fuses the two shapes into one spanning their union rectangle.
    ///
    /// The merged shape takes its baselines from whichever input has the
    /// larger x-height, since the fragment with the fuller vertical extent
    /// carries the more reliable line placement.
    pub fn merge(&self, first: &Shape, second: &Shape) -> Shape {
        let pair = ShapePair::new(first.clone(), second.clone());
        let donor = if second.x_height() > first.x_height() {
            second
        } else {
            first
        };
        donor.with_rect(pair.rect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PageImage;
    use image::{GrayImage, Luma};

    struct FixedScorer(f64);

    impl MergeScorer for FixedScorer {
        fn score_merge(&self, _pair: &ShapePair) -> f64 {
            self.0
        }
    }

    fn blank_page() -> Arc<PageImage> {
        let image = GrayImage::from_pixel(64, 32, Luma([255u8]));
        Arc::new(PageImage::new(image, 127, true))
    }

    #[test]
    fn merge_reconstructs_a_split_parent() {
        let page = blank_page();
        let parent = page.shape(4, 0, 19, 15).with_baselines(12, 4);
        let left = parent.sub_shape(0, 7);
        let right = parent.sub_shape(8, parent.width() - 1);
        let merger = ShapeMerger::new(Arc::new(FixedScorer(1.0)));
        let merged = merger.merge(&left, &right);
        assert_eq!(merged.rect(), parent.rect());
        assert_eq!(merged.baseline(), parent.baseline());
        assert_eq!(merged.meanline(), parent.meanline());
    }

    #[test]
    fn merge_takes_baselines_from_the_taller_fragment() {
        let page = blank_page();
        // An apostrophe-like sliver next to a full letter body.
        let sliver = page.shape(0, 0, 3, 6).with_baselines(5, 3);
        let body = page.shape(5, 0, 14, 15).with_baselines(12, 4);
        let merger = ShapeMerger::new(Arc::new(FixedScorer(1.0)));
        let merged = merger.merge(&sliver, &body);
        assert_eq!(merged.baseline(), 12);
        assert_eq!(merged.meanline(), 4);
        assert_eq!(merged.rect().left, 0);
        assert_eq!(merged.rect().right, 14);
    }

    #[test]
    fn check_merge_reports_the_oracle_probability() {
        let page = blank_page();
        let a = page.shape(0, 0, 7, 15);
        let b = page.shape(9, 0, 15, 15);
        let merger = ShapeMerger::new(Arc::new(FixedScorer(0.35)));
        assert_eq!(merger.check_merge(&a, &b), 0.35);
    }
}
